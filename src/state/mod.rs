//! State management for release sessions.
//!
//! The session record doubles as the guard against overlapping releases:
//! its presence at the source repository root means a release is underway.

mod manager;
mod release_state;

pub use manager::SessionStore;
pub use release_state::{ReleaseSession, STATE_FORMAT_VERSION, SessionPhase};

use std::path::Path;

/// Create a session store for the marker file in `source_dir`
pub fn create_session_store(source_dir: &Path, marker_file: &str) -> SessionStore {
    SessionStore::new(source_dir.join(marker_file))
}

/// Quick check if a release is in progress in `source_dir`
pub fn has_active_release(source_dir: &Path, marker_file: &str) -> bool {
    source_dir.join(marker_file).exists()
}
