mod core_cli;

pub use core_cli::{Cli, ClientCli, ClientCommand};
