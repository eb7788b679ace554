//! Release session record and its phase machine.

use crate::error::{Result, StateError};
use crate::target::Target;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current version of the session file format
pub const STATE_FORMAT_VERSION: u32 = 1;

/// One release run, from prepare to publish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseSession {
    /// Version of the session file format
    pub format_version: u32,
    /// Unique ID for this release run
    pub session_id: uuid::Uuid,
    /// XBMC target being released
    pub target: Target,
    /// Distribution branch the release lands on
    pub branch: String,
    /// Current phase
    pub phase: SessionPhase,
    /// Source repository commit being packaged
    pub source_revision: Option<String>,
    /// Temporary directory holding the distribution clone
    pub work_dir: Option<PathBuf>,
    /// Distribution working copy
    pub dist_path: Option<PathBuf>,
    /// Version written into the descriptor
    pub version: Option<String>,
    /// Timestamp when the session started
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// Timestamp of the last phase change or update
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Phase of a release session.
///
/// A release that has not started has no session at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Cloning and assembling the distribution copy
    Preparing,
    /// Waiting for a human to edit the changelog
    AwaitingChangelogEdit,
    /// Ready to commit, tag and push
    Prepared,
    /// Published
    Completed,
}

impl SessionPhase {
    /// Phase that legally follows this one
    pub fn next(self) -> Option<SessionPhase> {
        match self {
            SessionPhase::Preparing => Some(SessionPhase::AwaitingChangelogEdit),
            SessionPhase::AwaitingChangelogEdit => Some(SessionPhase::Prepared),
            SessionPhase::Prepared => Some(SessionPhase::Completed),
            SessionPhase::Completed => None,
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Preparing => write!(f, "Preparing"),
            SessionPhase::AwaitingChangelogEdit => write!(f, "Awaiting changelog edit"),
            SessionPhase::Prepared => write!(f, "Prepared"),
            SessionPhase::Completed => write!(f, "Completed"),
        }
    }
}

impl ReleaseSession {
    /// Start a session for `target`
    pub fn new(target: Target) -> Self {
        let now = chrono::Utc::now();
        Self {
            format_version: STATE_FORMAT_VERSION,
            session_id: uuid::Uuid::new_v4(),
            target,
            branch: target.branch().to_string(),
            phase: SessionPhase::Preparing,
            source_revision: None,
            work_dir: None,
            dist_path: None,
            version: None,
            started_at: now,
            updated_at: now,
        }
    }

    /// Move to `phase`, which must directly follow the current one
    pub fn advance(&mut self, phase: SessionPhase) -> Result<()> {
        if self.phase.next() != Some(phase) {
            return Err(StateError::InvalidTransition {
                from: self.phase.to_string(),
                to: phase.to_string(),
            }
            .into());
        }
        self.phase = phase;
        self.touch();
        Ok(())
    }

    /// Fail unless the session is in `phase`
    pub fn require_phase(&self, phase: SessionPhase) -> Result<()> {
        if self.phase != phase {
            return Err(StateError::InvalidTransition {
                from: self.phase.to_string(),
                to: phase.next().map_or_else(|| phase.to_string(), |n| n.to_string()),
            }
            .into());
        }
        Ok(())
    }

    /// Mark the record as modified
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }

    /// Distribution working copy, once cloned
    pub fn dist_path(&self) -> Result<&Path> {
        self.dist_path.as_deref().ok_or_else(|| {
            StateError::Corrupted {
                reason: format!("session {} has no distribution path", self.session_id),
            }
            .into()
        })
    }

    /// Elapsed time since the session started
    pub fn elapsed_time(&self) -> chrono::Duration {
        self.updated_at - self.started_at
    }

    /// Validate state consistency
    pub fn validate(&self) -> Result<()> {
        if self.format_version != STATE_FORMAT_VERSION {
            return Err(StateError::VersionMismatch {
                expected: STATE_FORMAT_VERSION,
                found: self.format_version,
            }
            .into());
        }
        if self.branch != self.target.branch() {
            return Err(StateError::Corrupted {
                reason: format!(
                    "branch '{}' does not belong to target {}",
                    self.branch, self.target
                ),
            }
            .into());
        }
        Ok(())
    }

    /// One-line summary of the session
    pub fn summary(&self) -> String {
        let version = self.version.as_deref().unwrap_or("unversioned");
        format!(
            "Release {} for {} (branch {}) - {} - {} elapsed",
            version,
            self.target,
            self.branch,
            self.phase,
            format_duration(chrono::Utc::now() - self.started_at)
        )
    }
}

fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_preparing() {
        let session = ReleaseSession::new(Target::Leia);
        assert_eq!(session.phase, SessionPhase::Preparing);
        assert_eq!(session.branch, "master");
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_phases_advance_in_order() {
        let mut session = ReleaseSession::new(Target::Eden);
        session.advance(SessionPhase::AwaitingChangelogEdit).unwrap();
        session.advance(SessionPhase::Prepared).unwrap();
        session.advance(SessionPhase::Completed).unwrap();
        assert!(session.advance(SessionPhase::Completed).is_err());
    }

    #[test]
    fn test_cannot_skip_changelog_edit() {
        let mut session = ReleaseSession::new(Target::Eden);
        let err = session.advance(SessionPhase::Prepared).unwrap_err();
        assert!(err.to_string().contains("Preparing"));
        assert_eq!(session.phase, SessionPhase::Preparing);
    }

    #[test]
    fn test_validate_rejects_foreign_branch() {
        let mut session = ReleaseSession::new(Target::Dharma);
        session.branch = "master".to_string();
        assert!(session.validate().is_err());
    }

    #[test]
    fn test_serialized_target_is_lowercase() {
        let session = ReleaseSession::new(Target::Frodo);
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["target"], "frodo");
        assert_eq!(json["phase"], "Preparing");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_duration(chrono::Duration::seconds(125)), "2m 5s");
        assert_eq!(format_duration(chrono::Duration::seconds(3725)), "1h 2m 5s");
    }
}
