//! Terminal handoff to the server process.
//!
//! # Modes
//! - [`ExecLauncher`]: replaces the process image. The server keeps our PID,
//!   so it receives container signals directly and becomes PID 1 when we were.
//! - [`SupervisedLauncher`]: spawns the server as a child, forwards signals to
//!   it and exits with its status. The server gets a new PID.

use std::convert::Infallible;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::ExitStatus;

use crate::error::BootstrapError;
use crate::lifecycle::signals::{forward_until_exit, ForwardedSignals};
use crate::process::command::LaunchPlan;
use crate::process::identity::Identity;

/// A terminal action that transfers control to the server.
pub trait Launcher {
    /// Start the server. Never returns on success.
    fn launch(&self, plan: &LaunchPlan) -> Result<Infallible, BootstrapError>;
}

/// Replaces the current process with the server.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecLauncher;

impl Launcher for ExecLauncher {
    fn launch(&self, plan: &LaunchPlan) -> Result<Infallible, BootstrapError> {
        let identity = Identity::resolve(&plan.user)?;

        tracing::debug!(
            program = %plan.program,
            identity = %identity,
            args = ?plan.args,
            "Handing off to server"
        );

        // exec only returns on failure.
        let source = plan.command(&identity).exec();
        Err(BootstrapError::Exec {
            program: plan.program.clone(),
            source,
        })
    }
}

/// Runs the server as a supervised child.
#[derive(Debug, Default, Clone, Copy)]
pub struct SupervisedLauncher;

impl SupervisedLauncher {
    /// Spawn the server, forward signals until it exits, and return the
    /// exit code the launcher should exit with.
    pub fn run(&self, plan: &LaunchPlan) -> Result<i32, BootstrapError> {
        let identity = Identity::resolve(&plan.user)?;
        let spawn_err = |source| BootstrapError::Spawn {
            program: plan.program.clone(),
            source,
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(spawn_err)?;

        runtime.block_on(async {
            let mut signals = ForwardedSignals::register().map_err(spawn_err)?;
            let mut child = tokio::process::Command::from(plan.command(&identity))
                .spawn()
                .map_err(spawn_err)?;

            tracing::debug!(
                program = %plan.program,
                identity = %identity,
                pid = child.id(),
                "Server started under supervision"
            );

            let status = forward_until_exit(&mut child, &mut signals)
                .await
                .map_err(spawn_err)?;
            let code = exit_code(status);
            tracing::info!(code, "Server exited");
            Ok::<_, BootstrapError>(code)
        })
    }
}

impl Launcher for SupervisedLauncher {
    /// Supervise the server, then exit the launcher with its status.
    fn launch(&self, plan: &LaunchPlan) -> Result<Infallible, BootstrapError> {
        let code = self.run(plan)?;
        std::process::exit(code)
    }
}

/// Shell convention: the exit code, or 128 + signal number.
pub fn exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}
