//! espresso-cli: argument parsing and subcommands behind the `espresso` binary.

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Cli, Command};
pub use commands::run;
pub use error::CliError;
