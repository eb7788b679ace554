//! File system helpers for assembling the distribution working copy.
//!
//! Thin wrappers over `tokio::fs` that log what they touch. Failures are
//! reported with the path involved so the operator can inspect it.

use crate::error::{FsError, Result};
use std::io;
use std::path::Path;
use tokio::fs;

fn io_error(operation: &'static str, path: &Path) -> impl FnOnce(io::Error) -> FsError {
    let path = path.to_path_buf();
    move |source| FsError::Io {
        operation,
        path,
        source,
    }
}

/// Removes a directory and its contents.
///
/// A missing directory is already in the desired state and is not an error.
pub async fn remove_dir(path: &Path) -> Result<()> {
    log::info!("Removing dir {}", path.display());
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("{} does not exist, nothing to remove", path.display());
            Ok(())
        }
        Err(e) => Err(io_error("remove", path)(e).into()),
    }
}

/// Makes a symbolic link mirroring `target`.
#[cfg(unix)]
fn symlink(target: &Path, dst: &Path, _is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, dst)
}

/// Makes a symbolic link mirroring `target`.
#[cfg(windows)]
fn symlink(target: &Path, dst: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        std::os::windows::fs::symlink_dir(target, dst)
    } else {
        std::os::windows::fs::symlink_file(target, dst)
    }
}

/// Recursively copies a directory tree, creating parent directories of the
/// destination as needed.
///
/// Preserves symlinks. Fails if the source is not a directory or if the
/// destination already exists.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    log::info!("Copying {} to {}", from.display(), to.display());
    if !from.is_dir() {
        return Err(FsError::SourceMissing {
            path: from.to_path_buf(),
        }
        .into());
    }
    if fs::symlink_metadata(to).await.is_ok() {
        return Err(FsError::DestinationExists {
            path: to.to_path_buf(),
        }
        .into());
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(io_error("create", parent))?;
    }

    for entry in walkdir::WalkDir::new(from) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_path_buf();
            FsError::Io {
                operation: "walk",
                path,
                source: e.into(),
            }
        })?;
        let rel_path = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| FsError::Io {
                operation: "walk",
                path: entry.path().to_path_buf(),
                source: io::Error::other(e),
            })?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target = fs::read_link(entry.path())
                .await
                .map_err(io_error("read link", entry.path()))?;
            symlink(&target, &dest_path, entry.path().is_dir())
                .map_err(io_error("link", &dest_path))?;
        } else if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .await
                .map_err(io_error("create", &dest_path))?;
        } else {
            fs::copy(entry.path(), &dest_path)
                .await
                .map_err(io_error("copy", entry.path()))?;
        }
    }

    Ok(())
}

/// Writes `contents` to `path`, replacing whatever was there.
pub async fn write_file(path: &Path, contents: &str) -> Result<()> {
    log::info!("Writing content to {}", path.display());
    fs::write(path, contents)
        .await
        .map_err(io_error("write", path))?;
    Ok(())
}
