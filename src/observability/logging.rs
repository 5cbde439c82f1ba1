//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once, before the first step runs
//! - Keep stdout free for the server: all launcher output goes to stderr
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the default filter
//! - The default filter shows the launcher's info lines only, so tolerated
//!   failures (logged at debug) stay silent unless asked for

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "ota_bootstrap=info";

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
