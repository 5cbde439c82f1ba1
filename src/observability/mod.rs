//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config / lifecycle / storage / process
//!     → tracing macros (structured fields)
//!     → logging.rs subscriber
//!     → stderr
//! ```
//!
//! # Design Decisions
//! - Structured fields (path, step, program) rather than formatted strings
//! - The server owns stdout once it starts

pub mod logging;
