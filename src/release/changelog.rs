//! Interactive changelog editing between prepare and perform.

use crate::error::{CliError, ReleaseError, Result};
use std::path::Path;
use tokio::process::Command;

/// Open `changelog` in `editor` and wait for it to exit.
///
/// `editor` is a shell command, as with git's `core.editor`, so it may carry
/// quoted arguments. Exiting the editor with a failure status (`:cq` in vim)
/// cancels the release.
pub async fn open_in_editor(editor: &str, changelog: &Path) -> Result<()> {
    log::info!("Opening {} in {}", changelog.display(), editor);

    if editor.trim().is_empty() {
        return Err(CliError::InvalidArguments {
            reason: "editor command is empty".to_string(),
        }
        .into());
    }

    let status = editor_command(editor, changelog)
        .status()
        .await
        .map_err(|e| CliError::ExecutionFailed {
            command: editor.to_string(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(ReleaseError::ChangelogAborted {
            editor: editor.to_string(),
            status: status.code(),
        });
    }
    Ok(())
}

#[cfg(unix)]
fn editor_command(editor: &str, changelog: &Path) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(format!("{editor} \"$@\""))
        .arg(editor)
        .arg(changelog);
    cmd
}

#[cfg(not(unix))]
fn editor_command(editor: &str, changelog: &Path) -> Command {
    let mut parts = editor.split_whitespace();
    // non-empty, checked by the caller
    let mut cmd = Command::new(parts.next().unwrap_or(editor));
    cmd.args(parts).arg(changelog);
    cmd
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_editor() {
        let tmp = tempfile::tempdir().unwrap();
        open_in_editor("true", &tmp.path().join("changelog.txt"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failing_editor_aborts() {
        let tmp = tempfile::tempdir().unwrap();
        let err = open_in_editor("false", &tmp.path().join("changelog.txt"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::ChangelogAborted { status: Some(1), .. }
        ));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_editor_status_is_propagated() {
        let tmp = tempfile::tempdir().unwrap();
        let err = open_in_editor("sh -c 'exit 3'", &tmp.path().join("changelog.txt"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_editor_arguments_are_passed() {
        let tmp = tempfile::tempdir().unwrap();
        let changelog = tmp.path().join("changelog.txt");
        std::fs::write(&changelog, "entry").unwrap();
        open_in_editor("test -s", &changelog).await.unwrap();
    }

    #[tokio::test]
    async fn test_quoted_editor_arguments() {
        let tmp = tempfile::tempdir().unwrap();
        let changelog = tmp.path().join("change log.txt");
        std::fs::write(&changelog, "entry").unwrap();
        open_in_editor("grep -q 'entry'", &changelog).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_editor_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            open_in_editor("  ", tmp.path()).await.unwrap_err(),
            ReleaseError::Cli(CliError::InvalidArguments { .. })
        ));
    }
}
