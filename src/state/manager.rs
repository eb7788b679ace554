//! Persistence of the release session in the marker file.
//!
//! The marker file is created with `O_CREAT | O_EXCL`, so two overlapping
//! prepares cannot both win. Later saves go through a temp file and rename.

use crate::error::{Result, StateError};
use crate::state::ReleaseSession;
use crate::target::Target;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Stores the active release session at a fixed path
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by the marker file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Marker file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a session exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Fail with `ReleaseInProgress` if a session already exists.
    ///
    /// A cheap precheck only; `begin` still claims the marker exclusively.
    pub fn ensure_idle(&self) -> Result<()> {
        if self.exists() {
            return Err(self.in_progress().into());
        }
        Ok(())
    }

    /// Claim the marker and start a session for `target`.
    ///
    /// Fails with `ReleaseInProgress` if the marker already exists.
    pub fn begin(&self, target: Target) -> Result<ReleaseSession> {
        let session = ReleaseSession::new(target);
        let serialized = serde_json::to_string_pretty(&session)?;

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(self.in_progress().into());
            }
            Err(e) => {
                return Err(StateError::SaveFailed {
                    reason: format!("Failed to create {}: {}", self.path.display(), e),
                }
                .into());
            }
        };

        let written = file
            .write_all(serialized.as_bytes())
            .and_then(|()| file.sync_all());
        if let Err(e) = written {
            // an empty marker would block every later release
            let _ = fs::remove_file(&self.path);
            return Err(StateError::SaveFailed {
                reason: format!("Failed to write {}: {}", self.path.display(), e),
            }
            .into());
        }

        log::debug!(
            "Started release session {} at {}",
            session.session_id,
            self.path.display()
        );
        Ok(session)
    }

    fn in_progress(&self) -> StateError {
        match self.load() {
            Ok(existing) => StateError::ReleaseInProgress {
                session_id: Some(existing.session_id.to_string()),
                target: Some(existing.target.to_string()),
                phase: Some(existing.phase.to_string()),
            },
            Err(_) => StateError::ReleaseInProgress {
                session_id: None,
                target: None,
                phase: None,
            },
        }
    }

    /// Replace the stored session with `session`
    pub fn save(&self, session: &ReleaseSession) -> Result<()> {
        session.validate()?;
        let serialized = serde_json::to_string_pretty(session)?;

        let temp_file_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_file_path).map_err(|e| StateError::SaveFailed {
                reason: format!("Failed to create temp file: {}", e),
            })?;
            file.write_all(serialized.as_bytes())
                .map_err(|e| StateError::SaveFailed {
                    reason: format!("Failed to write session: {}", e),
                })?;
            file.sync_all().map_err(|e| StateError::SaveFailed {
                reason: format!("Failed to sync file: {}", e),
            })?;
        }

        fs::rename(&temp_file_path, &self.path).map_err(|e| StateError::SaveFailed {
            reason: format!("Failed to rename temp file: {}", e),
        })?;
        Ok(())
    }

    /// Load the stored session
    pub fn load(&self) -> Result<ReleaseSession> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StateError::NotFound.into()),
            Err(e) => return Err(e.into()),
        };
        let session: ReleaseSession =
            serde_json::from_str(&content).map_err(|e| StateError::Corrupted {
                reason: format!("{}: {}", self.path.display(), e),
            })?;
        session.validate()?;
        Ok(session)
    }

    /// Remove the marker. A missing marker is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
