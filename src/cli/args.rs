//! Command line argument parsing and validation.

use crate::ReleaseConfig;
use crate::target::Target;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Release xbmcswift2 into the XBMC distribution repository
#[derive(Parser, Debug)]
#[command(
    name = "xbmcswift2-release",
    version,
    about = "Release xbmcswift2 into the XBMC distribution repository",
    long_about = "Create a special distribution of xbmcswift2 for XBMC. The distribution
drops docs, tests and developer tooling and ships from its own repository.

Usage:
  xbmcswift2-release release dharma
  xbmcswift2-release local-release eden
  xbmcswift2-release prepare frodo && xbmcswift2-release perform"
)]
pub struct Args {
    /// Command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Source repository containing the xbmcswift2 package
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub source_dir: PathBuf,

    /// Push URL of the distribution repository
    #[arg(long, global = true, value_name = "URL", env = "RELEASE_REPO_URL")]
    pub repo_url: Option<String>,

    /// Read-only URL announced to the mailing list
    #[arg(long, global = true, value_name = "URL", env = "RELEASE_PUBLIC_URL")]
    pub public_url: Option<String>,

    /// Editor used for the changelog
    #[arg(long, global = true, value_name = "COMMAND", env = "RELEASE_EDITOR")]
    pub editor: Option<String>,

    /// Accept the suggested version (and confirmations) without asking
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Use this version instead of asking
    #[arg(long, global = true, value_name = "VERSION", conflicts_with = "yes")]
    pub set_version: Option<String>,

    /// Only print errors and the release announcement
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Prepare a distribution copy locally without publishing it
    LocalRelease {
        /// XBMC version to build for
        #[arg(value_enum, ignore_case = true)]
        target: Target,
    },

    /// Prepare, edit the changelog, and publish
    Release {
        /// XBMC version to build for
        #[arg(value_enum, ignore_case = true)]
        target: Target,
    },

    /// Prepare and edit the changelog, keeping the session for `perform`
    Prepare {
        /// XBMC version to build for
        #[arg(value_enum, ignore_case = true)]
        target: Target,
    },

    /// Publish a prepared release
    Perform,

    /// Show the release in progress
    Status {
        /// Print the session record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Discard the release in progress
    Clear,
}

impl Command {
    /// Name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::LocalRelease { .. } => "local-release",
            Command::Release { .. } => "release",
            Command::Prepare { .. } => "prepare",
            Command::Perform => "perform",
            Command::Status { .. } => "status",
            Command::Clear => "clear",
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Some(version) = &self.set_version {
            crate::version::validate_version(version).map_err(|e| e.to_string())?;
        }
        if let Some(editor) = &self.editor
            && editor.trim().is_empty()
        {
            return Err("Editor command must not be empty".to_string());
        }
        if let Some(url) = &self.repo_url
            && url.trim().is_empty()
        {
            return Err("Repository URL must not be empty".to_string());
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    /// Release settings after applying overrides
    pub release: ReleaseConfig,
    /// Skip confirmations
    pub assume_yes: bool,
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print a workflow step
    pub fn progress_println(&self, message: &str) {
        let _ = self.output.progress(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.output.is_quiet()
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let mut release = ReleaseConfig {
            source_dir: args.source_dir.clone(),
            ..ReleaseConfig::default()
        };
        if let Some(url) = &args.repo_url {
            release.repo_url = url.clone();
        }
        if let Some(url) = &args.public_url {
            release.public_url = url.clone();
        }
        if let Some(editor) = &args.editor {
            release.editor = editor.clone();
        }

        Self {
            output: super::OutputManager::new(args.quiet),
            release,
            assume_yes: args.yes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_is_case_insensitive() {
        let args = Args::try_parse_from(["xbmcswift2-release", "release", "DHARMA"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Release {
                target: Target::Dharma
            }
        ));
    }

    #[test]
    fn test_missing_target_is_rejected() {
        assert!(Args::try_parse_from(["xbmcswift2-release", "release"]).is_err());
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        assert!(Args::try_parse_from(["xbmcswift2-release", "local-release", "gotham"]).is_err());
    }

    #[test]
    fn test_overrides_reach_release_config() {
        let args = Args::try_parse_from([
            "xbmcswift2-release",
            "prepare",
            "eden",
            "--source-dir",
            "/src/xbmcswift2",
            "--editor",
            "vim",
            "--repo-url",
            "file:///tmp/dist.git",
        ])
        .unwrap();
        let config = RuntimeConfig::from(&args);
        assert_eq!(config.release.source_dir, PathBuf::from("/src/xbmcswift2"));
        assert_eq!(config.release.editor, "vim");
        assert_eq!(config.release.repo_url, "file:///tmp/dist.git");
        assert_eq!(config.release.remote, "origin");
    }

    #[test]
    fn test_yes_conflicts_with_set_version() {
        assert!(
            Args::try_parse_from([
                "xbmcswift2-release",
                "release",
                "eden",
                "--yes",
                "--set-version",
                "2.0"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_validate_rejects_bad_version() {
        let args = Args::try_parse_from([
            "xbmcswift2-release",
            "release",
            "eden",
            "--set-version",
            "",
        ])
        .unwrap();
        assert!(args.validate().is_err());
    }
}
