//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment (PORT, WORKERS, ...)   optional TOML file
//!              \                      /
//!               → loader.rs (env > file > default)
//!               → BootstrapConfig (resolved, immutable)
//!               → passed by reference to every startup step
//! ```
//!
//! # Design Decisions
//! - Every option has a default so the launcher starts with zero configuration
//! - Values are passed through verbatim; the server validates its own flags
//! - An empty environment value counts as unset

pub mod loader;
pub mod schema;

pub use schema::BootstrapConfig;
pub use schema::FileConfig;
pub use schema::Setting;
