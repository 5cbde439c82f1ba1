//! Server command line.
//!
//! The server is gunicorn-compatible: bind address, worker and thread
//! counts, a fixed request timeout, access and error logs on the standard
//! streams, and the configured log level.

use std::process::Command;
use std::os::unix::process::CommandExt;

use serde::Serialize;

use crate::config::BootstrapConfig;
use crate::process::identity::Identity;

/// Request timeout handed to the server, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Log destination meaning "standard stream" for gunicorn.
const STD_STREAM: &str = "-";

/// Fully resolved server invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    /// Program name or path, looked up in `PATH` when bare.
    pub program: String,
    /// Arguments after the program name.
    pub args: Vec<String>,
    /// Identity spec the server runs as.
    pub user: String,
}

impl LaunchPlan {
    pub fn from_config(config: &BootstrapConfig) -> Self {
        let args = vec![
            "-b".to_string(),
            config.bind_address(),
            "-w".to_string(),
            config.workers.clone(),
            "--threads".to_string(),
            config.threads.clone(),
            "--timeout".to_string(),
            REQUEST_TIMEOUT_SECS.to_string(),
            "--access-logfile".to_string(),
            STD_STREAM.to_string(),
            "--error-logfile".to_string(),
            STD_STREAM.to_string(),
            "--log-level".to_string(),
            config.log_level.clone(),
            config.app_module.clone(),
        ];

        Self {
            program: config.server_bin.clone(),
            args,
            user: config.app_user.clone(),
        }
    }

    /// Build the command that runs this plan as `identity`.
    ///
    /// The uid/gid switch is skipped when the process already runs as the
    /// target uid; otherwise supplementary groups are dropped by the switch.
    pub fn command(&self, identity: &Identity) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command.envs(identity.env());
        if !identity.is_current() {
            command.gid(identity.gid).uid(identity.uid);
        }
        command
    }
}
