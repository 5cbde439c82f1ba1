//! Error taxonomy for the bootstrap sequence.
//!
//! Whether an error aborts the bootstrap is decided by the step that raised
//! it, not by the variant; see [`crate::lifecycle::pipeline::Severity`].
//! `Chown` only comes out of tolerated steps and never leaves the pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::process::identity::IdentityError;

/// Errors raised by bootstrap steps and the handoff.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("cannot load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot create data directory {}: {source}", .path.display())]
    CreateDataDir { path: PathBuf, source: io::Error },

    #[error("cannot change owner of {}: {source}", .path.display())]
    Chown { path: PathBuf, source: io::Error },

    #[error("seed database {} is not readable: {source}", .path.display())]
    SeedMissing { path: PathBuf, source: io::Error },

    #[error("cannot copy seed database to {}: {source}", .path.display())]
    SeedCopy { path: PathBuf, source: io::Error },

    #[error("cannot link {} -> {}: {source}", .link.display(), .target.display())]
    Link {
        link: PathBuf,
        target: PathBuf,
        source: io::Error,
    },

    #[error(
        "refusing to replace {}: it holds the data directory {}",
        .link.display(),
        .target.display()
    )]
    LinkWouldDestroyData { link: PathBuf, target: PathBuf },

    #[error("cannot resolve server identity: {0}")]
    Identity(#[from] IdentityError),

    #[error("cannot exec {program}: {source}")]
    Exec { program: String, source: io::Error },

    #[error("cannot spawn {program}: {source}")]
    Spawn { program: String, source: io::Error },
}
