//! Command line interface for xbmcswift2-release.
//!
//! Parses arguments, builds the runtime configuration, and dispatches to the
//! command implementations.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, RuntimeConfig};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point; returns the process exit code
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}
