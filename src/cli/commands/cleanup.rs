//! Clear command implementation.
//!
//! Removes the release session so a new release can start. The temporary
//! working copy is left on disk and reported.

use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::state::create_session_store;

use super::helpers::prompt_confirmation;

/// Execute clear command
pub(super) fn execute_cleanup(config: &RuntimeConfig) -> Result<()> {
    let store = create_session_store(&config.release.source_dir, &config.release.marker_file);

    if !store.exists() {
        config.println("No release in progress");
        return Ok(());
    }

    // an unreadable marker still has to be removable
    let session = store.load().ok();
    if let Some(session) = &session {
        config.println(&format!("About to discard: {}", session.summary()));
    }

    if !config.assume_yes && !prompt_confirmation("Discard the release in progress?")? {
        config.println("Clear cancelled");
        return Ok(());
    }

    store.clear()?;
    config.success_println("Release session cleared");
    if let Some(work_dir) = session.and_then(|s| s.work_dir) {
        config.indent(&format!("Working copy left at {}", work_dir.display()));
    }
    Ok(())
}
