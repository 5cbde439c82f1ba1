//! Server process handoff.
//!
//! # Data Flow
//! ```text
//! BootstrapConfig
//!     → command.rs (LaunchPlan: program + argv + identity spec)
//!     → identity.rs (name | uid | uid:gid → Identity)
//!     → launcher.rs (exec, or spawn + forward signals)
//! ```

pub mod command;
pub mod identity;
pub mod launcher;

pub use command::LaunchPlan;
pub use identity::Identity;
pub use launcher::{ExecLauncher, Launcher, SupervisedLauncher};
