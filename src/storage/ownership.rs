//! Recursive ownership changes.

use std::fs;
use std::io;
use std::os::unix::fs::lchown;
use std::path::Path;

use crate::process::identity::Identity;

/// Change the owner of `path` and, for directories, everything below it.
///
/// Symlinks are re-owned themselves and never followed. Every entry is
/// attempted; the first error encountered is returned at the end.
pub fn chown_tree(path: &Path, identity: &Identity) -> io::Result<()> {
    let mut first_error = None;
    walk(path, identity, &mut first_error);
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Change the owner of a single path without following symlinks.
pub fn chown_one(path: &Path, identity: &Identity) -> io::Result<()> {
    lchown(path, Some(identity.uid), Some(identity.gid))
}

fn walk(path: &Path, identity: &Identity, first_error: &mut Option<io::Error>) {
    if let Err(e) = chown_one(path, identity) {
        first_error.get_or_insert(e);
    }

    let is_dir = match fs::symlink_metadata(path) {
        Ok(meta) => meta.is_dir(),
        Err(e) => {
            first_error.get_or_insert(e);
            return;
        }
    };
    if !is_dir {
        return;
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            first_error.get_or_insert(e);
            return;
        }
    };
    for entry in entries {
        match entry {
            Ok(entry) => walk(&entry.path(), identity, first_error),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
}
