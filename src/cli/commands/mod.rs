//! Command execution functions coordinating the release workflow.
//!
//! Each command reports its own progress; this module turns failures into
//! an error message, recovery suggestions, and an exit code.

// Submodules
mod cleanup;
mod helpers;
mod release;
mod status;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use cleanup::execute_cleanup;
use release::{execute_local_release, execute_perform, execute_prepare, execute_release};
use status::execute_status;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);

    let result = match &args.command {
        Command::LocalRelease { target } => execute_local_release(*target, &args, &config).await,
        Command::Release { target } => execute_release(*target, &args, &config).await,
        Command::Prepare { target } => execute_prepare(*target, &args, &config).await,
        Command::Perform => execute_perform(&args, &config).await,
        Command::Status { json } => execute_status(*json, &config).map(|()| 0),
        Command::Clear => execute_cleanup(&config).map(|()| 0),
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            config.error_println(&format!("Command '{}' failed: {}", args.command.name(), e));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.println(&format!("  • {}", suggestion));
                }
            }
            if e.is_recoverable() {
                config.println(&format!(
                    "Once fixed, re-run: xbmcswift2-release {}",
                    args.command.name()
                ));
            }

            Ok(e.exit_code())
        }
    }
}
