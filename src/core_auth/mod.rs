pub mod account;
pub mod helper;
pub mod store;

pub use account::Account;
pub use store::AccountStore;
