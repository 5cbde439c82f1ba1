//! Compatibility symlink.
//!
//! The app-data path must end up as a symlink to the data directory no
//! matter what occupied it: nothing, a regular file, a stale symlink, or a
//! real directory.

use std::fs;
use std::io;
use std::os::unix::fs::{symlink, MetadataExt};
use std::path::{Path, PathBuf};

use crate::error::BootstrapError;

/// Make `link` a symlink pointing at `target`, replacing whatever is there.
///
/// Files and symlinks are replaced atomically via rename. A real directory
/// is removed first, unless `target` is that directory or lives inside it.
pub fn force_symlink(target: &Path, link: &Path) -> Result<(), BootstrapError> {
    let link_err = |source| BootstrapError::Link {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        source,
    };

    match fs::symlink_metadata(link) {
        Ok(meta) if meta.is_dir() => {
            if holds_target(link, target) {
                return Err(BootstrapError::LinkWouldDestroyData {
                    link: link.to_path_buf(),
                    target: target.to_path_buf(),
                });
            }
            tracing::debug!(link = %link.display(), "Removing directory in place of symlink");
            fs::remove_dir_all(link).map_err(link_err)?;
            symlink(target, link).map_err(link_err)?;
        }
        Ok(_) => replace_atomically(target, link).map_err(link_err)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            symlink(target, link).map_err(link_err)?;
        }
        Err(e) => return Err(link_err(e)),
    }

    tracing::debug!(link = %link.display(), target = %target.display(), "Symlink in place");
    Ok(())
}

/// Whether removing the directory `dir` would also remove `target`.
///
/// Compares `(dev, ino)` of `dir` against `target` and each of its
/// ancestors, so bind mounts of the same directory are caught along with
/// plain path nesting.
fn holds_target(dir: &Path, target: &Path) -> bool {
    let dir_meta = match fs::metadata(dir) {
        Ok(meta) => meta,
        Err(_) => return false,
    };
    let target = match fs::canonicalize(target) {
        Ok(path) => path,
        // No data there yet, nothing to lose.
        Err(_) => return false,
    };

    if let Ok(dir) = fs::canonicalize(dir) {
        if target.starts_with(&dir) {
            return true;
        }
    }

    target.ancestors().any(|ancestor| match fs::metadata(ancestor) {
        Ok(meta) => meta.dev() == dir_meta.dev() && meta.ino() == dir_meta.ino(),
        Err(_) => false,
    })
}

/// Create the new symlink beside `link` and rename it over the old entry.
fn replace_atomically(target: &Path, link: &Path) -> io::Result<()> {
    let staging = staging_path(link)?;
    // Leftover from an interrupted earlier run.
    match fs::remove_file(&staging) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    symlink(target, &staging)?;
    if let Err(e) = fs::rename(&staging, link) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }
    Ok(())
}

fn staging_path(link: &Path) -> io::Result<PathBuf> {
    let name = link.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "link path has no file name")
    })?;
    let mut staged = std::ffi::OsString::from(".");
    staged.push(name);
    staged.push(format!(".link-{}", std::process::id()));
    Ok(link.with_file_name(staged))
}
