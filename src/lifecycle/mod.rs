//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolved config → pipeline of steps (pipeline.rs) → LaunchPlan → handoff
//!
//! Signals (signals.rs, supervise mode only):
//!     SIGTERM/SIGINT/SIGHUP/SIGQUIT → forwarded to the server child
//! ```
//!
//! # Design Decisions
//! - Ordered startup: directory, seed, symlink, then the server
//! - Each step is either fatal or tolerated; nothing is retried
//! - The handoff is terminal and returns only on failure

pub mod pipeline;
pub mod signals;
pub mod startup;

pub use pipeline::{Severity, StepRecord, StepStatus};
pub use startup::{Bootstrap, StartupReport};
