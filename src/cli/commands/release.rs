//! Release command execution module.
//!
//! `release`, `local-release` and `prepare` share the prepare phase and the
//! changelog edit; `release` and `perform` publish.

use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::git::VersionControl;
use crate::release::{Releaser, open_in_editor};
use crate::state::ReleaseSession;
use crate::target::Target;
use crate::version::VersionPrompt;

use super::helpers::{ensure_no_release, git_releaser, print_notification};

/// Execute release command: prepare, edit changelog, perform
pub(super) async fn execute_release(
    target: Target,
    args: &Args,
    config: &RuntimeConfig,
) -> Result<i32> {
    ensure_no_release(config)?;
    let releaser = git_releaser(args, config)?;
    let session = prepare_with_changelog(&releaser, target, config).await?;

    let outcome = releaser.perform(session).await?;
    print_notification(&outcome);
    Ok(0)
}

/// Execute local-release command: prepare only, report where the copy is
pub(super) async fn execute_local_release(
    target: Target,
    args: &Args,
    config: &RuntimeConfig,
) -> Result<i32> {
    ensure_no_release(config)?;
    let releaser = git_releaser(args, config)?;
    let session = prepare_with_changelog(&releaser, target, config).await?;

    let dist_path = session.dist_path()?.to_path_buf();
    // nothing will be published, so the guard is not held
    releaser.abandon(&session)?;

    println!("Development release created at {}", dist_path.display());
    Ok(0)
}

/// Execute prepare command: stop with a session ready for `perform`
pub(super) async fn execute_prepare(
    target: Target,
    args: &Args,
    config: &RuntimeConfig,
) -> Result<i32> {
    ensure_no_release(config)?;
    let releaser = git_releaser(args, config)?;
    let session = prepare_with_changelog(&releaser, target, config).await?;

    config.success_println(&format!(
        "Release {} for {} prepared at {}",
        session.version.as_deref().unwrap_or("?"),
        session.target,
        session.dist_path()?.display()
    ));
    config.indent("Publish it with: xbmcswift2-release perform");
    Ok(0)
}

/// Execute perform command on the persisted session
pub(super) async fn execute_perform(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let releaser = git_releaser(args, config)?;
    let session = releaser.load_session()?;
    config.progress_println(&format!("Resuming {}", session.summary()));

    let outcome = releaser.perform(session).await?;
    print_notification(&outcome);
    Ok(0)
}

async fn prepare_with_changelog<V: VersionControl, P: VersionPrompt>(
    releaser: &Releaser<V, P>,
    target: Target,
    config: &RuntimeConfig,
) -> Result<ReleaseSession> {
    config.success_println(&format!(
        "🚀 Preparing xbmcswift2 release for {} (branch {})",
        target,
        target.branch()
    ));
    let mut session = releaser.prepare(target).await?;

    let changelog = releaser.changelog_path(&session)?;
    config.progress_println(&format!(
        "Opening {} for editing...",
        releaser.config().changelog_file
    ));
    if let Err(e) = open_in_editor(&releaser.config().editor, &changelog).await {
        if let Err(clear_err) = releaser.abandon(&session) {
            config.warning_println(&format!("Failed to discard session: {}", clear_err));
        }
        if let Ok(dist_path) = session.dist_path() {
            config.warning_println(&format!(
                "Distribution copy left at {}",
                dist_path.display()
            ));
        }
        return Err(e);
    }

    releaser.confirm_changelog(&mut session)?;
    Ok(session)
}
