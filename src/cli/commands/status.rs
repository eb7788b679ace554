//! Status command implementation.
//!
//! Displays the release session recorded in the marker file.

use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::state::{create_session_store, has_active_release};

/// Execute status command
pub(super) fn execute_status(json: bool, config: &RuntimeConfig) -> Result<()> {
    let release = &config.release;

    if !has_active_release(&release.source_dir, &release.marker_file) {
        if json {
            println!("{{\"status\": \"no_active_release\"}}");
        } else {
            config.println("No release in progress");
        }
        return Ok(());
    }

    let session = create_session_store(&release.source_dir, &release.marker_file).load()?;

    if json {
        let json_output = serde_json::to_string_pretty(&session)?;
        println!("{}", json_output);
        return Ok(());
    }

    config.println(&format!("📊 {}", session.summary()));
    config.indent(&format!("Session: {}", session.session_id));
    config.indent(&format!("Started: {}", session.started_at));
    config.indent(&format!(
        "Last change: {} ({}s after start)",
        session.updated_at,
        session.elapsed_time().num_seconds()
    ));
    if let Some(revision) = &session.source_revision {
        config.indent(&format!("Source commit: {}", revision));
    }
    if let Some(dist_path) = &session.dist_path {
        config.indent(&format!("Working copy: {}", dist_path.display()));
    }

    Ok(())
}
