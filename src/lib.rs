//! # xbmcswift2 Release
//!
//! Packages the xbmcswift2 framework into the XBMC distribution repository.
//!
//! A release runs in two phases:
//!
//! - **Prepare**: clone the distribution repository into a temporary directory,
//!   check out the branch for the XBMC target, replace the vendored framework
//!   with the current source tree, stamp the source revision, bump the addon
//!   version, and stop for a changelog edit.
//! - **Perform**: stage, commit and tag the distribution copy, tag the source
//!   repository, push, and print the mailing-list announcement.
//!
//! ## Usage
//!
//! ```bash
//! xbmcswift2-release release dharma      # prepare + edit changelog + perform
//! xbmcswift2-release local-release eden  # prepare only, nothing is pushed
//! xbmcswift2-release prepare frodo       # stop after the changelog edit
//! xbmcswift2-release perform             # publish the prepared release
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod cli;
pub mod error;
pub mod git;
pub mod release;
pub mod state;
pub mod target;
pub mod utils;
pub mod version;

// Re-export main types for public API
pub use cli::Args;
pub use error::{ReleaseError, Result};
pub use git::{FakeVersionControl, GitCli, GitCommand, VersionControl};
pub use release::{Notification, ReleaseOutcome, Releaser};
pub use state::{ReleaseSession, SessionPhase, SessionStore};
pub use target::Target;
pub use version::{AddonDescriptor, VersionPrompt};

use std::path::{Path, PathBuf};

/// Configuration for release operations
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Source repository the framework is released from
    pub source_dir: PathBuf,
    /// Push URL of the distribution repository
    pub repo_url: String,
    /// Read-only URL announced to the mailing list
    pub public_url: String,
    /// Directory name of the distribution clone
    pub repo_dir: String,
    /// Remote name in the distribution clone
    pub remote: String,
    /// Editor command for the changelog
    pub editor: String,
    /// Framework package directory in the source repository
    pub package_dir: String,
    /// Directory of the distribution copy holding vendored packages
    pub dist_lib_dir: String,
    /// Sub-packages removed from the vendored copy
    pub stripped_packages: Vec<String>,
    /// Marker file guarding the source repository
    pub marker_file: String,
    /// File in the distribution copy recording the source revision
    pub revision_file: String,
    /// Changelog in the distribution copy
    pub changelog_file: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            repo_url: "git@github.com:predakanga/xbmcswift2-xbmc-dist.git".to_string(),
            public_url: "git://github.com/predakanga/xbmcswift2-xbmc-dist.git".to_string(),
            repo_dir: "xbmcswift2-xbmc-dist".to_string(),
            remote: "origin".to_string(),
            editor: "nano".to_string(),
            package_dir: "xbmcswift2".to_string(),
            dist_lib_dir: "lib".to_string(),
            stripped_packages: vec!["cli".to_string(), "mockxbmc".to_string()],
            marker_file: ".release".to_string(),
            revision_file: "xbmcswift2_version".to_string(),
            changelog_file: "changelog.txt".to_string(),
        }
    }
}

impl ReleaseConfig {
    /// Where the framework lives inside a distribution copy
    pub fn vendored_package_dir(&self, dist_path: &Path) -> PathBuf {
        dist_path.join(&self.dist_lib_dir).join(&self.package_dir)
    }
}
