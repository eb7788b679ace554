//! Shared helper functions for command execution.

use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::git::GitCli;
use crate::release::{ReleaseOutcome, Releaser};
use crate::state::create_session_store;
use crate::version::{AcceptSuggested, FixedVersion, InteractivePrompt, VersionPrompt};

/// Version prompt chosen from the command line
#[derive(Debug, Clone)]
pub(super) enum CliPrompt {
    Interactive(InteractivePrompt),
    Accept(AcceptSuggested),
    Fixed(FixedVersion),
}

impl CliPrompt {
    pub(super) fn from_args(args: &Args) -> Self {
        match (&args.set_version, args.yes) {
            (Some(version), _) => CliPrompt::Fixed(FixedVersion(version.clone())),
            (None, true) => CliPrompt::Accept(AcceptSuggested),
            (None, false) => CliPrompt::Interactive(InteractivePrompt),
        }
    }
}

impl VersionPrompt for CliPrompt {
    fn confirm_version(&self, current: &str, suggested: &str) -> Result<String> {
        match self {
            CliPrompt::Interactive(p) => p.confirm_version(current, suggested),
            CliPrompt::Accept(p) => p.confirm_version(current, suggested),
            CliPrompt::Fixed(p) => p.confirm_version(current, suggested),
        }
    }
}

/// Refuse to start while a release is in progress, before touching git
pub(super) fn ensure_no_release(config: &RuntimeConfig) -> Result<()> {
    create_session_store(&config.release.source_dir, &config.release.marker_file).ensure_idle()
}

/// Releaser driving the real git executable
pub(super) fn git_releaser(args: &Args, config: &RuntimeConfig) -> Result<Releaser<GitCli, CliPrompt>> {
    Ok(Releaser::new(
        GitCli::locate()?,
        CliPrompt::from_args(args),
        config.release.clone(),
        config.output().clone(),
    ))
}

/// Print the mailing-list announcement, even in quiet mode
pub(super) fn print_notification(outcome: &ReleaseOutcome) {
    let output = crate::cli::OutputManager::new(false);
    for line in outcome.notification().lines() {
        let _ = output.notice(line);
    }
}

/// Prompt user for confirmation with y/n input
pub(super) fn prompt_confirmation(prompt: &str) -> std::io::Result<bool> {
    use std::io::Write;

    print!("{} [y/N]: ", prompt);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(matches!(response.as_str(), "y" | "yes"))
}
