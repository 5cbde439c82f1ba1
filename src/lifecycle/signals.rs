//! OS signal forwarding for supervise mode.
//!
//! # Responsibilities
//! - Register handlers for SIGTERM, SIGINT, SIGHUP and SIGQUIT
//! - Relay each received signal to the supervised server
//! - Return once the server exits
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The launcher never acts on a signal itself; the server decides

use std::io;
use std::process::ExitStatus;

use tokio::process::Child;
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Handlers for the signals relayed to the server.
///
/// Register before spawning, so a signal arriving while the child starts up
/// is queued for it instead of hitting the launcher's default disposition.
pub struct ForwardedSignals {
    term: Signal,
    int: Signal,
    hup: Signal,
    quit: Signal,
}

impl ForwardedSignals {
    /// Install the handlers. Needs a running Tokio runtime.
    pub fn register() -> io::Result<Self> {
        Ok(Self {
            term: signal(SignalKind::terminate())?,
            int: signal(SignalKind::interrupt())?,
            hup: signal(SignalKind::hangup())?,
            quit: signal(SignalKind::quit())?,
        })
    }
}

/// Wait for `child` to exit, forwarding termination-type signals to it.
pub async fn forward_until_exit(
    child: &mut Child,
    signals: &mut ForwardedSignals,
) -> io::Result<ExitStatus> {
    loop {
        let signo = tokio::select! {
            status = child.wait() => return status,
            _ = signals.term.recv() => libc::SIGTERM,
            _ = signals.int.recv() => libc::SIGINT,
            _ = signals.hup.recv() => libc::SIGHUP,
            _ = signals.quit.recv() => libc::SIGQUIT,
        };

        match child.id() {
            Some(pid) => {
                tracing::debug!(pid, signal = signo, "Forwarding signal to server");
                forward(pid, signo);
            }
            None => tracing::debug!(signal = signo, "Server already reaped, signal dropped"),
        }
    }
}

fn forward(pid: u32, signo: libc::c_int) {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: kill has no memory-safety preconditions. The pid belongs to our
    // unreaped child, so it cannot have been recycled.
    let rc = unsafe { libc::kill(pid, signo) };
    if rc != 0 {
        tracing::debug!(
            pid,
            error = %io::Error::last_os_error(),
            "Signal forwarding failed"
        );
    }
}
