//! Version-control capability used by the release workflow.
//!
//! `GitCommand` names every git invocation the workflow can issue, so both
//! the real adapter and the in-memory fake agree on what "checkout" means.

use crate::error::Result;
use crate::target::DEFAULT_BRANCH;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

/// A single git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    /// `git clone <url> <dest>`
    Clone {
        /// Remote URL
        url: String,
        /// Directory to create
        dest: PathBuf,
    },
    /// `git rev-parse HEAD`
    RevParseHead,
    /// `git checkout <branch>` for a branch that already exists locally
    Switch {
        /// Branch name
        branch: String,
    },
    /// `git checkout -b <branch> <remote>/<branch>`
    CreateTrackingBranch {
        /// Branch name
        branch: String,
        /// Remote to track
        remote: String,
    },
    /// `git add -A`
    AddAll,
    /// `git commit -m <message>`
    Commit {
        /// Commit message
        message: String,
    },
    /// `git tag -a <name> -m <message>`
    Tag {
        /// Tag name
        name: String,
        /// Annotation
        message: String,
    },
    /// `git push --tags <remote> <branch>`
    Push {
        /// Remote name
        remote: String,
        /// Branch to push
        branch: String,
    },
}

impl GitCommand {
    /// Checkout for a freshly cloned working copy.
    ///
    /// The default branch is checked out by clone already; every other branch
    /// only exists on the remote and gets a local tracking branch.
    pub fn checkout(branch: &str, remote: &str) -> Self {
        if branch == DEFAULT_BRANCH {
            GitCommand::Switch {
                branch: branch.to_string(),
            }
        } else {
            GitCommand::CreateTrackingBranch {
                branch: branch.to_string(),
                remote: remote.to_string(),
            }
        }
    }

    /// Arguments passed to the git executable
    pub fn args(&self) -> Vec<String> {
        match self {
            GitCommand::Clone { url, dest } => vec![
                "clone".to_string(),
                url.clone(),
                dest.to_string_lossy().into_owned(),
            ],
            GitCommand::RevParseHead => vec!["rev-parse".to_string(), "HEAD".to_string()],
            GitCommand::Switch { branch } => vec!["checkout".to_string(), branch.clone()],
            GitCommand::CreateTrackingBranch { branch, remote } => vec![
                "checkout".to_string(),
                "-b".to_string(),
                branch.clone(),
                format!("{remote}/{branch}"),
            ],
            GitCommand::AddAll => vec!["add".to_string(), "-A".to_string()],
            GitCommand::Commit { message } => {
                vec!["commit".to_string(), "-m".to_string(), message.clone()]
            }
            GitCommand::Tag { name, message } => vec![
                "tag".to_string(),
                "-a".to_string(),
                name.clone(),
                "-m".to_string(),
                message.clone(),
            ],
            GitCommand::Push { remote, branch } => vec![
                "push".to_string(),
                "--tags".to_string(),
                remote.clone(),
                branch.clone(),
            ],
        }
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git")?;
        for arg in self.args() {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Version-control operations the release workflow needs
pub trait VersionControl {
    /// Clone `url` into `dest`
    fn clone_repo(&self, url: &str, dest: &Path) -> impl Future<Output = Result<()>>;

    /// Full hash of the commit checked out in `repo`
    fn head_revision(&self, repo: &Path) -> impl Future<Output = Result<String>>;

    /// Check out `branch`, creating a tracking branch from `remote` when needed
    fn checkout(&self, repo: &Path, branch: &str, remote: &str)
    -> impl Future<Output = Result<()>>;

    /// Stage every change, including deletions
    fn stage_all(&self, repo: &Path) -> impl Future<Output = Result<()>>;

    /// Commit the staged changes
    fn commit(&self, repo: &Path, message: &str) -> impl Future<Output = Result<()>>;

    /// Create an annotated tag at HEAD
    fn tag(&self, repo: &Path, name: &str, message: &str) -> impl Future<Output = Result<()>>;

    /// Push `branch` and all tags to `remote`
    fn push(&self, repo: &Path, remote: &str, branch: &str) -> impl Future<Output = Result<()>>;
}
