pub mod listing;
pub mod resolver;

pub use resolver::PathResolver;
