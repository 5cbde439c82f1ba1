//! First-run database seeding.
//!
//! The copy is no-clobber: the destination is created with `O_EXCL`, so a
//! file that appears between the existence check and the copy wins and the
//! copy quietly does nothing.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

use crate::error::BootstrapError;

/// What the seeding step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The database file was already there; nothing was read or written.
    AlreadyPresent,
    /// The seed template was copied.
    Seeded { bytes: u64 },
    /// The file appeared after the existence check; the copy was skipped.
    Raced,
}

impl SeedOutcome {
    /// Whether the database was absent when the step started.
    pub fn was_absent(self) -> bool {
        !matches!(self, SeedOutcome::AlreadyPresent)
    }
}

/// Copy `seed` to `db` if and only if `db` does not exist.
///
/// A missing or unreadable seed template is fatal. A failed copy removes the
/// partial file so the next start tries again.
pub fn seed_database(seed: &Path, db: &Path) -> Result<SeedOutcome, BootstrapError> {
    if matches!(db.try_exists(), Ok(true)) {
        tracing::debug!(db = %db.display(), "Database present, seeding skipped");
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let seed_missing = |source| BootstrapError::SeedMissing {
        path: seed.to_path_buf(),
        source,
    };
    let mut template = File::open(seed).map_err(seed_missing)?;
    let mode = template.metadata().map_err(seed_missing)?.permissions().mode() & 0o777;

    let mut dest = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(mode)
        .open(db)
    {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            tracing::debug!(db = %db.display(), "Database appeared concurrently, seeding skipped");
            return Ok(SeedOutcome::Raced);
        }
        Err(source) => {
            return Err(BootstrapError::SeedCopy {
                path: db.to_path_buf(),
                source,
            })
        }
    };

    let copied = io::copy(&mut template, &mut dest).and_then(|n| dest.sync_all().map(|_| n));
    match copied {
        Ok(bytes) => {
            tracing::info!(
                seed = %seed.display(),
                db = %db.display(),
                bytes,
                "Seeding database"
            );
            Ok(SeedOutcome::Seeded { bytes })
        }
        Err(source) => {
            drop(dest);
            let _ = fs::remove_file(db);
            Err(BootstrapError::SeedCopy {
                path: db.to_path_buf(),
                source,
            })
        }
    }
}
