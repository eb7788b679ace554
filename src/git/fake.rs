//! In-memory `VersionControl` for exercising the workflow without git.
//!
//! Clones are materialized by copying a template directory, and every
//! operation is recorded so callers can assert on the exact command sequence.

use crate::error::{GitError, Result};
use crate::git::{GitCommand, VersionControl};
use crate::utils::fs::copy_dir;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// A git invocation captured by [`FakeVersionControl`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    /// Working directory the command ran in
    pub repo: PathBuf,
    /// The command itself
    pub command: GitCommand,
}

/// Recording, template-backed version control
pub struct FakeVersionControl {
    template: PathBuf,
    head: String,
    fail_on: Option<fn(&GitCommand) -> bool>,
    recorded: Mutex<Vec<RecordedCommand>>,
}

impl std::fmt::Debug for FakeVersionControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeVersionControl")
            .field("template", &self.template)
            .field("head", &self.head)
            .field("fails", &self.fail_on.is_some())
            .finish_non_exhaustive()
    }
}

impl FakeVersionControl {
    /// Clones will copy `template`; `head` is reported as every repo's HEAD
    pub fn new(template: impl Into<PathBuf>, head: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            head: head.into(),
            fail_on: None,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Make every command matching `predicate` fail with exit status 1
    pub fn failing_on(mut self, predicate: fn(&GitCommand) -> bool) -> Self {
        self.fail_on = Some(predicate);
        self
    }

    /// Commands issued so far, in order
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.lock().clone()
    }

    /// Commands issued against `repo`, in order
    pub fn commands_in(&self, repo: &Path) -> Vec<GitCommand> {
        self.lock()
            .iter()
            .filter(|r| r.repo == repo)
            .map(|r| r.command.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedCommand>> {
        // a poisoned log is still a usable log
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, repo: &Path, command: GitCommand) -> Result<()> {
        let failing = self.fail_on.is_some_and(|fail| fail(&command));
        let rendered = command.to_string();
        self.lock().push(RecordedCommand {
            repo: repo.to_path_buf(),
            command,
        });
        if failing {
            return Err(GitError::CommandFailed {
                command: rendered,
                status: Some(1),
                stderr: "simulated failure".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl VersionControl for FakeVersionControl {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let parent = dest.parent().unwrap_or(dest);
        self.record(
            parent,
            GitCommand::Clone {
                url: url.to_string(),
                dest: dest.to_path_buf(),
            },
        )?;
        copy_dir(&self.template, dest).await
    }

    async fn head_revision(&self, repo: &Path) -> Result<String> {
        self.record(repo, GitCommand::RevParseHead)?;
        Ok(self.head.clone())
    }

    async fn checkout(&self, repo: &Path, branch: &str, remote: &str) -> Result<()> {
        self.record(repo, GitCommand::checkout(branch, remote))
    }

    async fn stage_all(&self, repo: &Path) -> Result<()> {
        self.record(repo, GitCommand::AddAll)
    }

    async fn commit(&self, repo: &Path, message: &str) -> Result<()> {
        self.record(
            repo,
            GitCommand::Commit {
                message: message.to_string(),
            },
        )
    }

    async fn tag(&self, repo: &Path, name: &str, message: &str) -> Result<()> {
        self.record(
            repo,
            GitCommand::Tag {
                name: name.to_string(),
                message: message.to_string(),
            },
        )
    }

    async fn push(&self, repo: &Path, remote: &str, branch: &str) -> Result<()> {
        self.record(
            repo,
            GitCommand::Push {
                remote: remote.to_string(),
                branch: branch.to_string(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clone_copies_template_and_records() {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("remote");
        std::fs::create_dir_all(&template).unwrap();
        std::fs::write(template.join("addon.xml"), "<addon/>").unwrap();

        let vcs = FakeVersionControl::new(&template, "abc123");
        let dest = tmp.path().join("work/dist");
        vcs.clone_repo("git@example.com:dist.git", &dest).await.unwrap();

        assert!(dest.join("addon.xml").exists());
        assert_eq!(vcs.commands().len(), 1);
        assert_eq!(vcs.head_revision(&dest).await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn test_failing_command_is_still_recorded() {
        let vcs = FakeVersionControl::new("/unused", "abc")
            .failing_on(|c| matches!(c, GitCommand::Push { .. }));
        let repo = Path::new("/repo");
        vcs.stage_all(repo).await.unwrap();
        assert!(vcs.push(repo, "origin", "eden").await.is_err());
        assert_eq!(vcs.commands_in(repo).len(), 2);
    }
}
