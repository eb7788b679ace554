//! `VersionControl` backed by the git executable.
//!
//! Every operation spawns git synchronously from the workflow's point of view
//! and fails on a non-zero exit. Nothing is retried: a failing git command
//! usually needs a human to look at the repository.

use crate::error::{GitError, Result};
use crate::git::{GitCommand, VersionControl};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Git operations using the git command line
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    /// Find git on PATH
    pub fn locate() -> Result<Self> {
        let program = which::which("git").map_err(|e| GitError::NotInstalled {
            reason: e.to_string(),
        })?;
        log::debug!("Using git at {}", program.display());
        Ok(Self { program })
    }

    /// Use a specific git executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run `command` with `cwd` as working directory and return its stdout
    async fn run(&self, cwd: Option<&Path>, command: &GitCommand) -> Result<String> {
        let rendered = command.to_string();
        log::info!("[{}] {}", cwd.map_or_else(|| ".".into(), |p| p.display().to_string()), rendered);

        let mut cmd = Command::new(&self.program);
        cmd.args(command.args());
        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output().await.map_err(|source| GitError::SpawnFailed {
            command: rendered.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !stdout.trim().is_empty() {
            log::debug!("{}", stdout.trim_end());
        }

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: rendered,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(stdout)
    }
}

impl VersionControl for GitCli {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let command = GitCommand::Clone {
            url: url.to_string(),
            dest: dest.to_path_buf(),
        };
        self.run(dest.parent(), &command).await?;
        Ok(())
    }

    async fn head_revision(&self, repo: &Path) -> Result<String> {
        let command = GitCommand::RevParseHead;
        let stdout = self.run(Some(repo), &command).await?;
        let hash = stdout.trim();
        if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GitError::UnexpectedOutput {
                command: command.to_string(),
                reason: format!("'{hash}' is not a commit hash"),
            }
            .into());
        }
        Ok(hash.to_string())
    }

    async fn checkout(&self, repo: &Path, branch: &str, remote: &str) -> Result<()> {
        self.run(Some(repo), &GitCommand::checkout(branch, remote))
            .await?;
        Ok(())
    }

    async fn stage_all(&self, repo: &Path) -> Result<()> {
        self.run(Some(repo), &GitCommand::AddAll).await?;
        Ok(())
    }

    async fn commit(&self, repo: &Path, message: &str) -> Result<()> {
        let command = GitCommand::Commit {
            message: message.to_string(),
        };
        self.run(Some(repo), &command).await?;
        Ok(())
    }

    async fn tag(&self, repo: &Path, name: &str, message: &str) -> Result<()> {
        let command = GitCommand::Tag {
            name: name.to_string(),
            message: message.to_string(),
        };
        self.run(Some(repo), &command).await?;
        Ok(())
    }

    async fn push(&self, repo: &Path, remote: &str, branch: &str) -> Result<()> {
        let command = GitCommand::Push {
            remote: remote.to_string(),
            branch: branch.to_string(),
        };
        self.run(Some(repo), &command).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;

    #[tokio::test]
    async fn test_missing_program_fails_to_spawn() {
        let git = GitCli::with_program("/nonexistent/git-binary");
        let tmp = tempfile::tempdir().unwrap();
        let err = git.stage_all(tmp.path()).await.unwrap_err();
        match err {
            ReleaseError::Git(GitError::SpawnFailed { command, .. }) => {
                assert_eq!(command, "git add -A");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_reported_with_status() {
        let git = GitCli::with_program("false");
        let tmp = tempfile::tempdir().unwrap();
        let err = git.commit(tmp.path(), "message").await.unwrap_err();
        match err {
            ReleaseError::Git(GitError::CommandFailed { status, command, .. }) => {
                assert_eq!(status, Some(1));
                assert_eq!(command, "git commit -m message");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
