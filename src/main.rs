//! OTA bootstrap launcher.
//!
//! # Sequence
//!
//! ```text
//!   env + optional TOML ──▶ BootstrapConfig
//!                               │
//!          ┌────────────────────┼─────────────────────────────┐
//!          ▼                    ▼                             ▼
//!   ensure DATA_DIR     seed APP_DB_PATH from         link APP_DATA_DIR
//!   (+ chown, tolerated) SEED_DB_PATH if absent       → DATA_DIR
//!                       (+ chown, tolerated)
//!                               │
//!                               ▼
//!                exec gunicorn as APP_USER (or supervise it)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ota_bootstrap::config::loader;
use ota_bootstrap::observability::logging;
use ota_bootstrap::{Bootstrap, ExecLauncher, LaunchPlan, Launcher, SupervisedLauncher};

#[derive(Parser)]
#[command(name = "ota-bootstrap")]
#[command(about = "Container entrypoint for the OTA web application", long_about = None)]
struct Cli {
    /// Optional TOML file with option values; the environment still wins.
    #[arg(short, long, env = "BOOTSTRAP_CONFIG")]
    config: Option<PathBuf>,

    /// Print the resolved configuration and server command, change nothing.
    #[arg(long)]
    dry_run: bool,

    /// Run the server as a child and forward signals instead of exec.
    #[arg(long, env = "BOOTSTRAP_SUPERVISE")]
    supervise: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing::debug!("ota-bootstrap v{} starting", env!("CARGO_PKG_VERSION"));

    let file = match &cli.config {
        Some(path) => Some(loader::load_file(path).map_err(ota_bootstrap::BootstrapError::from)?),
        None => None,
    };
    let config = loader::from_env(file.as_ref());

    tracing::debug!(
        bind_address = %config.bind_address(),
        workers = %config.workers,
        threads = %config.threads,
        data_dir = %config.data_dir.display(),
        db_path = %config.db_path.display(),
        "Configuration loaded"
    );

    if cli.dry_run {
        let plan = LaunchPlan::from_config(&config);
        let out = serde_json::json!({ "config": config, "plan": plan });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(ExitCode::SUCCESS);
    }

    let bootstrap = Bootstrap::new(&config);
    let launcher: &dyn Launcher = if cli.supervise {
        &SupervisedLauncher
    } else {
        &ExecLauncher
    };
    match bootstrap.run(launcher)? {}
}
