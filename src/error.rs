//! Error types for xbmcswift2 release operations.
//!
//! Every failure is fatal for the current run. The working copy is ephemeral, so
//! there is no rollback; errors carry enough context to decide how to restart.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Git operation errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Version string errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Addon descriptor errors
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    /// Filesystem helper errors
    #[error("Filesystem error: {0}")]
    Fs(#[from] FsError),

    /// Session state errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// The changelog editor exited with a failure status
    #[error("Changelog editing aborted: '{editor}' exited with status {}", .status.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    ChangelogAborted {
        /// Editor command
        editor: String,
        /// Exit code, absent when killed by a signal
        status: Option<i32>,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// No git executable on PATH
    #[error("git executable not found on PATH: {reason}")]
    NotInstalled {
        /// Lookup failure
        reason: String,
    },

    /// Git could not be started
    #[error("Failed to run '{command}': {source}")]
    SpawnFailed {
        /// Command line
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Git exited with a non-zero status
    #[error("'{command}' failed with status {}: {stderr}", .status.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    CommandFailed {
        /// Command line
        command: String,
        /// Exit code, absent when killed by a signal
        status: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// Git produced output we could not use
    #[error("Unexpected output from '{command}': {reason}")]
    UnexpectedOutput {
        /// Command line
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// Version string errors
#[derive(Error, Debug)]
pub enum VersionError {
    /// Invalid version format
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion {
        /// Version string
        version: String,
        /// Reason for the error
        reason: String,
    },
}

/// Addon descriptor (addon.xml) errors
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// Descriptor could not be read or written
    #[error("Failed to access {path}: {source}")]
    Io {
        /// Descriptor path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Descriptor is not well-formed XML
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Descriptor path
        path: PathBuf,
        /// XML error
        #[source]
        source: quick_xml::Error,
    },

    /// Root element is not `<addon>`
    #[error("Expected <addon> root element in {path}, found {found}")]
    UnexpectedRoot {
        /// Descriptor path
        path: PathBuf,
        /// What was found instead
        found: String,
    },

    /// Root element lacks a required attribute
    #[error("Missing '{attribute}' attribute on <addon> in {path}")]
    MissingAttribute {
        /// Descriptor path
        path: PathBuf,
        /// Attribute name
        attribute: &'static str,
    },
}

/// Filesystem helper errors
#[derive(Error, Debug)]
pub enum FsError {
    /// Copy destination already exists
    #[error("Destination {path} already exists")]
    DestinationExists {
        /// Destination path
        path: PathBuf,
    },

    /// Copy source is missing or not a directory
    #[error("Source directory {path} does not exist")]
    SourceMissing {
        /// Source path
        path: PathBuf,
    },

    /// Any other IO failure
    #[error("Failed to {operation} {path}: {source}")]
    Io {
        /// Operation being performed
        operation: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Session state errors
#[derive(Error, Debug)]
pub enum StateError {
    /// Another release holds the marker file
    #[error("Release in progress{}", describe_session(.session_id, .target, .phase))]
    ReleaseInProgress {
        /// Session id of the existing release, when readable
        session_id: Option<String>,
        /// Target of the existing release, when readable
        target: Option<String>,
        /// Phase of the existing release, when readable
        phase: Option<String>,
    },

    /// No session file present
    #[error("No release in progress.")]
    NotFound,

    /// Session file corrupted
    #[error("Session file corrupted: {reason}")]
    Corrupted {
        /// Reason for the error
        reason: String,
    },

    /// Session format version mismatch
    #[error("Session format mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected format version
        expected: u32,
        /// Found format version
        found: u32,
    },

    /// Illegal phase transition
    #[error("Cannot move release from {from} to {to}")]
    InvalidTransition {
        /// Current phase
        from: String,
        /// Requested phase
        to: String,
    },

    /// Failed to save session
    #[error("Failed to save session: {reason}")]
    SaveFailed {
        /// Reason for the error
        reason: String,
    },
}

fn describe_session(
    session_id: &Option<String>,
    target: &Option<String>,
    phase: &Option<String>,
) -> String {
    match (session_id, target, phase) {
        (Some(id), Some(target), Some(phase)) => {
            format!(" (session {id}, target {target}, phase {phase})")
        }
        _ => String::new(),
    }
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Unknown XBMC target name
    #[error("Invalid XBMC version '{given}', expected one of [{expected}]")]
    InvalidTarget {
        /// Name supplied by the user
        given: String,
        /// Accepted names
        expected: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::State(StateError::ReleaseInProgress { .. }) => vec![
                "Finish the outstanding release: xbmcswift2-release perform".to_string(),
                "Discard it: xbmcswift2-release clear".to_string(),
            ],
            ReleaseError::Git(GitError::NotInstalled { .. }) => {
                vec!["Install git and make sure it is on PATH".to_string()]
            }
            ReleaseError::Git(GitError::CommandFailed { command, .. })
                if command.starts_with("git push") =>
            {
                vec![
                    "Check SSH key configuration: ssh -T git@github.com".to_string(),
                    "Inspect the distribution working copy before re-running perform".to_string(),
                ]
            }
            ReleaseError::Git(GitError::CommandFailed { command, .. })
                if command.starts_with("git clone") =>
            {
                vec![
                    "Verify the distribution repository URL (--repo-url)".to_string(),
                    "Check SSH key configuration: ssh -T git@github.com".to_string(),
                ]
            }
            ReleaseError::ChangelogAborted { .. } => vec![
                "The release was cancelled; start again with prepare or release".to_string(),
            ],
            ReleaseError::State(StateError::Corrupted { .. })
            | ReleaseError::State(StateError::VersionMismatch { .. }) => vec![
                "Remove the session with: xbmcswift2-release clear".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable by re-running the same command
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ReleaseError::State(StateError::ReleaseInProgress { .. })
                | ReleaseError::Cli(CliError::InvalidTarget { .. })
                | ReleaseError::Version(VersionError::InvalidVersion { .. })
                | ReleaseError::Descriptor(_)
        )
    }

    /// Process exit code for this error.
    ///
    /// A failed git command or editor propagates its own status.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::Git(GitError::CommandFailed {
                status: Some(code), ..
            })
            | ReleaseError::ChangelogAborted {
                status: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}
