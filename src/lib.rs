//! Container entrypoint for the OTA web application.
//!
//! Provisions the data directory, seeds the database on first run, links the
//! legacy app-data path, then becomes the application server.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod process;
pub mod storage;

pub use config::BootstrapConfig;
pub use error::BootstrapError;
pub use lifecycle::{Bootstrap, StartupReport};
pub use process::{ExecLauncher, LaunchPlan, Launcher, SupervisedLauncher};
