//! Two-phase release workflow.
//!
//! `prepare` assembles a distribution working copy and stops at the changelog
//! edit. The caller opens the changelog, confirms it, and then calls `perform`
//! to commit, tag and push. Every step is awaited in order.

mod changelog;
mod notification;

pub use changelog::open_in_editor;
pub use notification::Notification;

use crate::ReleaseConfig;
use crate::cli::OutputManager;
use crate::error::Result;
use crate::git::VersionControl;
use crate::state::{ReleaseSession, SessionPhase, SessionStore, create_session_store};
use crate::target::Target;
use crate::utils::fs::{copy_dir, remove_dir, write_file};
use crate::version::{AddonDescriptor, VersionPrompt, bump_minor, get_id, get_version};
use std::path::{Path, PathBuf};

/// Result of a published release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// Addon identifier from the descriptor
    pub addon_id: String,
    /// Released version
    pub version: String,
    /// Tag created in the distribution repository
    pub tag: String,
    /// Tag created in the source repository
    pub source_tag: String,
    /// XBMC target
    pub target: Target,
    /// Distribution branch that was pushed
    pub branch: String,
    /// Read-only URL of the distribution repository
    pub public_url: String,
    /// Source commit packaged in this release
    pub source_revision: String,
}

impl ReleaseOutcome {
    /// Mailing-list announcement for this release
    pub fn notification(&self) -> Notification {
        Notification::for_release(self)
    }
}

/// Commit message used in the distribution repository
pub fn commit_message(version: &str) -> String {
    format!("[xbmcswift2-release-script] prepare release {version}")
}

/// Drives a release through prepare and perform
#[derive(Debug)]
pub struct Releaser<V, P> {
    vcs: V,
    prompt: P,
    config: ReleaseConfig,
    output: OutputManager,
    store: SessionStore,
}

impl<V: VersionControl, P: VersionPrompt> Releaser<V, P> {
    /// Create a releaser working from `config.source_dir`
    pub fn new(vcs: V, prompt: P, config: ReleaseConfig, output: OutputManager) -> Self {
        let store = create_session_store(&config.source_dir, &config.marker_file);
        Self {
            vcs,
            prompt,
            config,
            output,
            store,
        }
    }

    /// Version-control backend
    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Active configuration
    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Session store guarding the source repository
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Session persisted by an earlier prepare
    pub fn load_session(&self) -> Result<ReleaseSession> {
        self.store.load()
    }

    /// Assemble a distribution working copy for `target`.
    ///
    /// Refuses to start while another session exists. On failure the session
    /// is dropped so the release can be restarted from scratch.
    pub async fn prepare(&self, target: Target) -> Result<ReleaseSession> {
        let mut session = self.store.begin(target)?;

        match self.assemble(&mut session).await {
            Ok(()) => Ok(session),
            Err(e) => {
                if let Some(work_dir) = &session.work_dir {
                    let _ = self.output.warn(&format!(
                        "Partial distribution copy left at {}",
                        work_dir.display()
                    ));
                }
                if let Err(clear_err) = self.store.clear() {
                    log::warn!("Failed to remove {}: {}", self.store.path().display(), clear_err);
                }
                Err(e)
            }
        }
    }

    async fn assemble(&self, session: &mut ReleaseSession) -> Result<()> {
        let source_dir = &self.config.source_dir;

        let revision = self.vcs.head_revision(source_dir).await?;
        self.step(&format!("Release using commit {revision}"));
        session.source_revision = Some(revision.clone());

        let work_dir = tempfile::Builder::new()
            .prefix("xbmcswift2-release-")
            .tempdir()?
            .keep();
        let dist_path = work_dir.join(&self.config.repo_dir);
        session.work_dir = Some(work_dir);
        session.dist_path = Some(dist_path.clone());
        session.touch();
        self.store.save(session)?;

        self.step("Cloning fresh copy of distribution repo...");
        self.vcs
            .clone_repo(&self.config.repo_url, &dist_path)
            .await?;

        self.step(&format!(
            "Using branch {} for the distribution repo...",
            session.branch
        ));
        self.vcs
            .checkout(&dist_path, &session.branch, &self.config.remote)
            .await?;

        // replace wholesale rather than merge
        self.step(&format!(
            "Removing old {0} dir and copying over current version...",
            self.config.package_dir
        ));
        let vendored = self.config.vendored_package_dir(&dist_path);
        remove_dir(&vendored).await?;
        copy_dir(&source_dir.join(&self.config.package_dir), &vendored).await?;

        self.step(&format!(
            "Removing unnecessary {} packages...",
            self.config.stripped_packages.join(" and ")
        ));
        for package in &self.config.stripped_packages {
            remove_dir(&vendored.join(package)).await?;
        }

        self.step(&format!(
            "Adding deployed git hash to {} file...",
            self.config.revision_file
        ));
        write_file(&dist_path.join(&self.config.revision_file), &revision).await?;

        self.step("Bumping version...");
        let version = self.bump_version(&dist_path)?;
        session.version = Some(version);

        session.advance(SessionPhase::AwaitingChangelogEdit)?;
        self.store.save(session)?;
        Ok(())
    }

    fn bump_version(&self, dist_path: &Path) -> Result<String> {
        let mut descriptor = AddonDescriptor::load(dist_path)?;
        let current = descriptor.version()?;
        // an unbumpable version still goes to the prompt so it can be overridden
        let suggested = match bump_minor(&current) {
            Ok(next) => next,
            Err(e) => {
                log::warn!("No version suggestion: {e}");
                let _ = self
                    .output
                    .warn(&format!("Cannot bump {current}; defaulting to the current version"));
                current.clone()
            }
        };
        let chosen = self.prompt.confirm_version(&current, &suggested)?;
        descriptor.set_version(&chosen)?;
        descriptor.save()?;
        log::info!("Version {current} -> {chosen}");
        Ok(chosen)
    }

    /// Changelog the human edits before perform
    pub fn changelog_path(&self, session: &ReleaseSession) -> Result<PathBuf> {
        Ok(session.dist_path()?.join(&self.config.changelog_file))
    }

    /// Resume after the changelog edit; the session becomes ready to perform
    pub fn confirm_changelog(&self, session: &mut ReleaseSession) -> Result<()> {
        session.advance(SessionPhase::Prepared)?;
        self.store.save(session)
    }

    /// Drop the session without publishing anything
    pub fn abandon(&self, session: &ReleaseSession) -> Result<()> {
        log::info!("Abandoning release session {}", session.session_id);
        self.store.clear()
    }

    /// Commit, tag and push a prepared session.
    ///
    /// On failure the session stays on disk; the working copy may need
    /// inspection before running perform again.
    pub async fn perform(&self, mut session: ReleaseSession) -> Result<ReleaseOutcome> {
        session.require_phase(SessionPhase::Prepared)?;
        let dist_path = session.dist_path()?.to_path_buf();
        let target = session.target;

        self.step("Staging all modified files in the distribution repo...");
        self.vcs.stage_all(&dist_path).await?;

        // the changelog edit may have touched addon.xml too
        let version = get_version(&dist_path)?;
        if session.version.as_deref() != Some(version.as_str()) {
            log::info!("Descriptor version changed to {version} since prepare");
            session.version = Some(version.clone());
        }

        self.step("Committing changes and tagging the release...");
        self.vcs
            .commit(&dist_path, &commit_message(&version))
            .await?;
        let tag = version.clone();
        self.vcs
            .tag(&dist_path, &tag, &format!("{} v{}", target.label(), version))
            .await?;

        let source_tag = format!("xbmc-{version}");
        self.vcs
            .tag(
                &self.config.source_dir,
                &source_tag,
                &format!("XBMC distribution v{version}"),
            )
            .await?;

        self.step("Pushing changes to remote...");
        self.vcs
            .push(&dist_path, &self.config.remote, &session.branch)
            .await?;

        let addon_id = get_id(&dist_path)?;
        session.advance(SessionPhase::Completed)?;
        self.store.clear()?;
        let _ = self.output.success("Release performed.");

        Ok(ReleaseOutcome {
            addon_id,
            version,
            tag,
            source_tag,
            target,
            branch: session.branch.clone(),
            public_url: self.config.public_url.clone(),
            source_revision: session.source_revision.clone().unwrap_or_default(),
        })
    }

    fn step(&self, message: &str) {
        log::debug!("{message}");
        let _ = self.output.progress(message);
    }
}
