//! Shared fixtures for bootstrap integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::fs;
use std::io;
use std::path::Path;

use ota_bootstrap::process::identity::{current_gid, current_uid};
use ota_bootstrap::{BootstrapConfig, BootstrapError, LaunchPlan, Launcher};
use tempfile::TempDir;

/// Contents of the seed template every sandbox starts with.
pub const SEED_BYTES: &[u8] = b"SQLite format 3\0seed-template";

/// A scratch filesystem laid out like the container:
/// `seed/ota.db`, `app/` (parent of the compat link), `data/` (absent).
pub struct Sandbox {
    pub dir: TempDir,
    pub config: BootstrapConfig,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("seed")).unwrap();
        fs::write(root.join("seed/ota.db"), SEED_BYTES).unwrap();
        fs::create_dir(root.join("app")).unwrap();

        let config = BootstrapConfig {
            data_dir: root.join("data"),
            app_data_dir: root.join("app/data"),
            db_path: root.join("data/ota.db"),
            seed_path: root.join("seed/ota.db"),
            app_user: current_identity(),
            ..BootstrapConfig::default()
        };
        Self { dir, config }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Environment the binary needs to provision this sandbox.
    pub fn env(&self) -> Vec<(&'static str, String)> {
        vec![
            ("DATA_DIR", self.config.data_dir.display().to_string()),
            ("APP_DATA_DIR", self.config.app_data_dir.display().to_string()),
            ("APP_DB_PATH", self.config.db_path.display().to_string()),
            ("SEED_DB_PATH", self.config.seed_path.display().to_string()),
            ("APP_USER", self.config.app_user.clone()),
        ]
    }

    /// Assert the compat link resolves to the data directory.
    pub fn assert_linked(&self) {
        let link = &self.config.app_data_dir;
        let meta = fs::symlink_metadata(link).unwrap();
        assert!(meta.file_type().is_symlink(), "{} is not a symlink", link.display());
        assert_eq!(
            fs::canonicalize(link).unwrap(),
            fs::canonicalize(&self.config.data_dir).unwrap()
        );
    }
}

/// `uid:gid` of the test process.
pub fn current_identity() -> String {
    format!("{}:{}", current_uid(), current_gid())
}

/// A launcher that records the plan instead of replacing the process.
#[derive(Default)]
pub struct RecordingLauncher {
    pub launched: RefCell<Option<LaunchPlan>>,
}

impl Launcher for RecordingLauncher {
    fn launch(&self, plan: &LaunchPlan) -> Result<Infallible, BootstrapError> {
        *self.launched.borrow_mut() = Some(plan.clone());
        Err(BootstrapError::Exec {
            program: plan.program.clone(),
            source: io::Error::other("recorded, not executed"),
        })
    }
}

impl RecordingLauncher {
    pub fn was_reached(&self) -> bool {
        self.launched.borrow().is_some()
    }
}

/// Whether anything, including a dangling symlink, occupies `path`.
pub fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
