//! Startup orchestration.
//!
//! # Order
//! ```text
//! ensure-data-dir   fatal
//! chown-data-dir    tolerated
//! seed-database     fatal
//! chown-database    tolerated (only when the file was absent)
//! link-app-data     fatal
//! ── handoff ──      fatal, terminal (see process::launcher)
//! ```
//!
//! # Design Decisions
//! - Fail fast: the first fatal error ends the bootstrap
//! - No retries; the container runtime restarts us if it wants to
//! - Identity lookups for chown are tolerated like the chown itself

use std::convert::Infallible;

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;
use crate::lifecycle::pipeline::{run_steps, Progress, Step, StepRecord};
use crate::process::{Identity, LaunchPlan, Launcher};
use crate::storage::{self, SeedOutcome};

/// State threaded through the startup steps.
pub struct StartupContext<'a> {
    pub config: &'a BootstrapConfig,
    pub seed: Option<SeedOutcome>,
}

/// Result of the preparation phase.
#[derive(Debug, Clone)]
pub struct StartupReport {
    pub steps: Vec<StepRecord>,
    pub seed: Option<SeedOutcome>,
    pub plan: LaunchPlan,
}

/// The startup steps, in order.
pub fn steps<'a>() -> [Step<StartupContext<'a>>; 5] {
    [
        Step::fatal("ensure-data-dir", ensure_data_dir),
        Step::tolerated("chown-data-dir", chown_data_dir),
        Step::fatal("seed-database", seed_database),
        Step::tolerated("chown-database", chown_database),
        Step::fatal("link-app-data", link_app_data),
    ]
}

/// One bootstrap run over a resolved configuration.
pub struct Bootstrap<'a> {
    config: &'a BootstrapConfig,
}

impl<'a> Bootstrap<'a> {
    pub fn new(config: &'a BootstrapConfig) -> Self {
        Self { config }
    }

    /// Run every step before the handoff.
    pub fn prepare(&self) -> Result<StartupReport, BootstrapError> {
        let mut ctx = StartupContext {
            config: self.config,
            seed: None,
        };
        let records = run_steps(&steps(), &mut ctx)?;

        Ok(StartupReport {
            steps: records,
            seed: ctx.seed,
            plan: LaunchPlan::from_config(self.config),
        })
    }

    /// Prepare, then hand off to the server. Does not return on success.
    pub fn run<L: Launcher + ?Sized>(&self, launcher: &L) -> Result<Infallible, BootstrapError> {
        let report = self.prepare()?;
        launcher.launch(&report.plan)
    }
}

fn ensure_data_dir(ctx: &mut StartupContext<'_>) -> Result<Progress, BootstrapError> {
    storage::ensure_data_dir(&ctx.config.data_dir)?;
    Ok(Progress::Done)
}

fn chown_data_dir(ctx: &mut StartupContext<'_>) -> Result<Progress, BootstrapError> {
    let identity = Identity::resolve(&ctx.config.app_user)?;
    let path = &ctx.config.data_dir;
    storage::chown_tree(path, &identity).map_err(|source| BootstrapError::Chown {
        path: path.clone(),
        source,
    })?;
    Ok(Progress::Done)
}

fn seed_database(ctx: &mut StartupContext<'_>) -> Result<Progress, BootstrapError> {
    let outcome = storage::seed_database(&ctx.config.seed_path, &ctx.config.db_path)?;
    ctx.seed = Some(outcome);
    Ok(match outcome {
        SeedOutcome::AlreadyPresent => Progress::Skipped,
        _ => Progress::Done,
    })
}

fn chown_database(ctx: &mut StartupContext<'_>) -> Result<Progress, BootstrapError> {
    if !ctx.seed.is_some_and(SeedOutcome::was_absent) {
        return Ok(Progress::Skipped);
    }
    let identity = Identity::resolve(&ctx.config.app_user)?;
    let path = &ctx.config.db_path;
    storage::ownership::chown_one(path, &identity).map_err(|source| BootstrapError::Chown {
        path: path.clone(),
        source,
    })?;
    Ok(Progress::Done)
}

fn link_app_data(ctx: &mut StartupContext<'_>) -> Result<Progress, BootstrapError> {
    storage::force_symlink(&ctx.config.data_dir, &ctx.config.app_data_dir)?;
    Ok(Progress::Done)
}
