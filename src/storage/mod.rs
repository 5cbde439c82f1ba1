//! Storage provisioning subsystem.
//!
//! # Responsibilities
//! - Ensure the data directory exists (`data_dir.rs`)
//! - Re-own files for the unprivileged identity (`ownership.rs`)
//! - Seed the database from its template on first run (`seed.rs`)
//! - Point the legacy app-data path at the data directory (`link.rs`)
//!
//! # Design Decisions
//! - Every operation is idempotent; a restart repeats them safely
//! - Functions return fatal errors only; callers decide what is tolerable

pub mod data_dir;
pub mod link;
pub mod ownership;
pub mod seed;

pub use data_dir::ensure_data_dir;
pub use link::force_symlink;
pub use ownership::chown_tree;
pub use seed::{seed_database, SeedOutcome};
