mod commands;
mod config;
mod error;

pub use commands::{run, sync_documents};
pub use config::{CliConfig, Command};
pub use error::CliError;
