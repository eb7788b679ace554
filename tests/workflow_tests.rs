//! End-to-end release workflow against the recording version control.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use xbmcswift2_release::cli::OutputManager;
use xbmcswift2_release::error::{ReleaseError, StateError};
use xbmcswift2_release::version::{AcceptSuggested, FixedVersion, VersionPrompt};
use xbmcswift2_release::{
    FakeVersionControl, GitCommand, ReleaseConfig, Releaser, SessionPhase, Target,
};

const HEAD: &str = "3f2c9a7d1b4e5f60718293a4b5c6d7e8f9a0b1c2";

fn fixture_dist() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/dist")
}

fn copy_fixture(dest: &Path) {
    for entry in walkdir::WalkDir::new(fixture_dist()) {
        let entry = entry.unwrap();
        let rel = entry.path().strip_prefix(fixture_dist()).unwrap();
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

/// Source repository with the package, its tests and its developer tooling
fn source_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let package = dir.path().join("xbmcswift2");
    fs::create_dir_all(package.join("cli")).unwrap();
    fs::create_dir_all(package.join("mockxbmc")).unwrap();
    fs::write(package.join("__init__.py"), "from .plugin import Plugin\n").unwrap();
    fs::write(package.join("plugin.py"), "class Plugin(object):\n    pass\n").unwrap();
    fs::write(package.join("cli").join("app.py"), "def main():\n    pass\n").unwrap();
    fs::write(package.join("mockxbmc").join("xbmc.py"), "LOGDEBUG = 0\n").unwrap();
    fs::create_dir_all(dir.path().join("tests")).unwrap();
    fs::write(dir.path().join("tests").join("test_plugin.py"), "").unwrap();
    dir
}

fn releaser<P: VersionPrompt>(
    source: &Path,
    vcs: FakeVersionControl,
    prompt: P,
) -> Releaser<FakeVersionControl, P> {
    let config = ReleaseConfig {
        source_dir: source.to_path_buf(),
        ..ReleaseConfig::default()
    };
    Releaser::new(vcs, prompt, config, OutputManager::new(true))
}

fn cleanup(work_dir: Option<&PathBuf>) {
    if let Some(dir) = work_dir {
        let _ = fs::remove_dir_all(dir);
    }
}

#[tokio::test]
async fn test_dharma_release_end_to_end() {
    let source = source_repo();
    let releaser = releaser(
        source.path(),
        FakeVersionControl::new(fixture_dist(), HEAD),
        AcceptSuggested,
    );

    let mut session = releaser.prepare(Target::Dharma).await.unwrap();
    assert_eq!(session.phase, SessionPhase::AwaitingChangelogEdit);
    assert_eq!(session.version.as_deref(), Some("1.4"));
    assert!(releaser.store().exists());

    let dist = session.dist_path().unwrap().to_path_buf();
    let vendored = dist.join("lib").join("xbmcswift2");
    assert!(vendored.join("plugin.py").is_file());
    assert!(!vendored.join("obsolete.py").exists());
    assert!(!vendored.join("cli").exists());
    assert!(!vendored.join("mockxbmc").exists());
    assert!(!dist.join("tests").exists());
    assert_eq!(fs::read_to_string(dist.join("xbmcswift2_version")).unwrap(), HEAD);

    let descriptor = fs::read_to_string(dist.join("addon.xml")).unwrap();
    assert!(descriptor.contains(r#"provider-name="Jonathan Beluch (jbel)" version="1.4">"#));
    assert!(descriptor.contains(r#"<import addon="xbmc.python" version="2.0"/>"#));

    let changelog = releaser.changelog_path(&session).unwrap();
    assert_eq!(changelog, dist.join("changelog.txt"));
    fs::write(&changelog, "Version 1.4\n- Dharma build\n").unwrap();
    releaser.confirm_changelog(&mut session).unwrap();
    assert_eq!(releaser.load_session().unwrap().phase, SessionPhase::Prepared);

    let work_dir = session.work_dir.clone();
    let outcome = releaser.perform(session).await.unwrap();
    assert_eq!(outcome.version, "1.4");
    assert_eq!(outcome.tag, "1.4");
    assert_eq!(outcome.source_tag, "xbmc-1.4");
    assert_eq!(outcome.addon_id, "script.module.xbmcswift2");
    assert_eq!(outcome.branch, "dharma");
    assert_eq!(outcome.source_revision, HEAD);
    assert!(!releaser.store().exists());

    let dist_commands = releaser.vcs().commands_in(&dist);
    assert_eq!(
        dist_commands,
        vec![
            GitCommand::CreateTrackingBranch {
                branch: "dharma".to_string(),
                remote: "origin".to_string(),
            },
            GitCommand::AddAll,
            GitCommand::Commit {
                message: "[xbmcswift2-release-script] prepare release 1.4".to_string(),
            },
            GitCommand::Tag {
                name: "1.4".to_string(),
                message: "DHARMA v1.4".to_string(),
            },
            GitCommand::Push {
                remote: "origin".to_string(),
                branch: "dharma".to_string(),
            },
        ]
    );
    assert_eq!(
        releaser.vcs().commands_in(source.path()),
        vec![
            GitCommand::RevParseHead,
            GitCommand::Tag {
                name: "xbmc-1.4".to_string(),
                message: "XBMC distribution v1.4".to_string(),
            },
        ]
    );

    let notification = outcome.notification().to_string();
    assert!(notification.contains("Subject: [git pull] script.module.xbmcswift2"));
    assert!(notification.contains("*version - 1.4"));
    assert!(notification.contains("*tag - 1.4"));
    assert!(notification.contains("*xbmc version - dharma"));
    assert!(notification.contains("*url - git://github.com/predakanga/xbmcswift2-xbmc-dist.git"));

    cleanup(work_dir.as_ref());
}

#[tokio::test]
async fn test_leia_uses_existing_master_branch() {
    let source = source_repo();
    let releaser = releaser(
        source.path(),
        FakeVersionControl::new(fixture_dist(), HEAD),
        FixedVersion("2.0.0".to_string()),
    );

    let session = releaser.prepare(Target::Leia).await.unwrap();
    let dist = session.dist_path().unwrap().to_path_buf();
    assert_eq!(
        releaser.vcs().commands_in(&dist),
        vec![GitCommand::Switch {
            branch: "master".to_string()
        }]
    );
    assert_eq!(session.version.as_deref(), Some("2.0.0"));

    releaser.abandon(&session).unwrap();
    assert!(!releaser.store().exists());
    cleanup(session.work_dir.as_ref());
}

#[tokio::test]
async fn test_fixed_version_overrides_unbumpable_version() {
    let template = TempDir::new().unwrap();
    let dist = template.path().join("dist");
    copy_fixture(&dist);
    let descriptor = dist.join("addon.xml");
    let xml = fs::read_to_string(&descriptor).unwrap();
    fs::write(&descriptor, xml.replace(r#"version="1.3">"#, r#"version="1.4-rc1">"#)).unwrap();

    let source = source_repo();
    let releaser = releaser(
        source.path(),
        FakeVersionControl::new(&dist, HEAD),
        FixedVersion("1.4".to_string()),
    );

    let session = releaser.prepare(Target::Frodo).await.unwrap();
    assert_eq!(session.version.as_deref(), Some("1.4"));
    let written = fs::read_to_string(session.dist_path().unwrap().join("addon.xml")).unwrap();
    assert!(written.contains(r#"version="1.4">"#));

    releaser.abandon(&session).unwrap();
    cleanup(session.work_dir.as_ref());
}

#[tokio::test]
async fn test_existing_marker_blocks_new_release() {
    let source = source_repo();
    let first = releaser(
        source.path(),
        FakeVersionControl::new(fixture_dist(), HEAD),
        AcceptSuggested,
    );
    let session = first.prepare(Target::Eden).await.unwrap();

    let second = releaser(
        source.path(),
        FakeVersionControl::new(fixture_dist(), HEAD),
        AcceptSuggested,
    );
    let err = second.prepare(Target::Frodo).await.unwrap_err();
    match err {
        ReleaseError::State(StateError::ReleaseInProgress { target, .. }) => {
            assert_eq!(target.as_deref(), Some("eden"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(second.vcs().commands().is_empty());
    // the first session is untouched
    assert_eq!(first.load_session().unwrap(), session);

    cleanup(session.work_dir.as_ref());
}

#[tokio::test]
async fn test_perform_requires_changelog_confirmation() {
    let source = source_repo();
    let releaser = releaser(
        source.path(),
        FakeVersionControl::new(fixture_dist(), HEAD),
        AcceptSuggested,
    );
    let session = releaser.prepare(Target::Frodo).await.unwrap();
    let work_dir = session.work_dir.clone();

    let err = releaser.perform(session).await.unwrap_err();
    assert!(matches!(
        err,
        ReleaseError::State(StateError::InvalidTransition { .. })
    ));
    assert!(
        !releaser
            .vcs()
            .commands()
            .iter()
            .any(|r| r.command == GitCommand::AddAll)
    );
    assert!(releaser.store().exists());

    cleanup(work_dir.as_ref());
}

#[tokio::test]
async fn test_failed_push_keeps_session() {
    let source = source_repo();
    let vcs = FakeVersionControl::new(fixture_dist(), HEAD)
        .failing_on(|command| matches!(command, GitCommand::Push { .. }));
    let releaser = releaser(source.path(), vcs, AcceptSuggested);

    let mut session = releaser.prepare(Target::Eden).await.unwrap();
    releaser.confirm_changelog(&mut session).unwrap();
    let work_dir = session.work_dir.clone();

    let err = releaser.perform(session).await.unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(matches!(err, ReleaseError::Git(_)));
    assert_eq!(releaser.load_session().unwrap().phase, SessionPhase::Prepared);

    cleanup(work_dir.as_ref());
}

#[tokio::test]
async fn test_failed_clone_releases_marker() {
    let source = source_repo();
    let vcs = FakeVersionControl::new(fixture_dist(), HEAD)
        .failing_on(|command| matches!(command, GitCommand::Clone { .. }));
    let releaser = releaser(source.path(), vcs, AcceptSuggested);

    let err = releaser.prepare(Target::Dharma).await.unwrap_err();
    assert!(matches!(err, ReleaseError::Git(_)));
    assert!(!releaser.store().exists());
}

#[tokio::test]
async fn test_missing_package_dir_fails() {
    let source = TempDir::new().unwrap();
    let releaser = releaser(
        source.path(),
        FakeVersionControl::new(fixture_dist(), HEAD),
        AcceptSuggested,
    );

    let err = releaser.prepare(Target::Dharma).await.unwrap_err();
    assert!(matches!(err, ReleaseError::Fs(_)));
    assert!(!releaser.store().exists());
}
