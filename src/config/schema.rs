//! Configuration schema definitions.
//!
//! Every recognized option is listed once in [`Setting`], together with its
//! default and the effect it has on the bootstrap. [`BootstrapConfig`] is the
//! resolved, immutable result handed to every step.

use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A recognized configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    Port,
    Workers,
    Threads,
    LogLevel,
    DataDir,
    AppDataDir,
    AppDbPath,
    SeedDbPath,
    AppUser,
    AppModule,
    ServerBin,
}

impl Setting {
    /// All options, in the order they are documented.
    pub const ALL: [Setting; 11] = [
        Setting::Port,
        Setting::Workers,
        Setting::Threads,
        Setting::LogLevel,
        Setting::DataDir,
        Setting::AppDataDir,
        Setting::AppDbPath,
        Setting::SeedDbPath,
        Setting::AppUser,
        Setting::AppModule,
        Setting::ServerBin,
    ];

    /// Environment variable name.
    pub fn name(self) -> &'static str {
        match self {
            Setting::Port => "PORT",
            Setting::Workers => "WORKERS",
            Setting::Threads => "THREADS",
            Setting::LogLevel => "LOG_LEVEL",
            Setting::DataDir => "DATA_DIR",
            Setting::AppDataDir => "APP_DATA_DIR",
            Setting::AppDbPath => "APP_DB_PATH",
            Setting::SeedDbPath => "SEED_DB_PATH",
            Setting::AppUser => "APP_USER",
            Setting::AppModule => "APP_MODULE",
            Setting::ServerBin => "SERVER_BIN",
        }
    }

    /// Value used when neither the environment nor the config file sets it.
    pub fn default_value(self) -> &'static str {
        match self {
            Setting::Port => "8001",
            Setting::Workers => "2",
            Setting::Threads => "4",
            Setting::LogLevel => "info",
            Setting::DataDir => "/data",
            Setting::AppDataDir => "/app/data",
            Setting::AppDbPath => "/data/ota.db",
            Setting::SeedDbPath => "/seed/ota.db",
            Setting::AppUser => "appuser",
            Setting::AppModule => "app:create_app()",
            Setting::ServerBin => "gunicorn",
        }
    }

    /// What the option controls.
    pub fn effect(self) -> &'static str {
        match self {
            Setting::Port => "TCP port the server binds on 0.0.0.0",
            Setting::Workers => "number of server worker processes",
            Setting::Threads => "threads per worker",
            Setting::LogLevel => "server log level",
            Setting::DataDir => "durable data directory, created and chowned",
            Setting::AppDataDir => "compatibility path replaced by a symlink to DATA_DIR",
            Setting::AppDbPath => "live database file, seeded on first run",
            Setting::SeedDbPath => "read-only seed database template",
            Setting::AppUser => "unprivileged identity (name, uid or uid:gid)",
            Setting::AppModule => "WSGI entry point served by the server",
            Setting::ServerBin => "server program, looked up in PATH",
        }
    }

    /// Key used in the optional TOML config file.
    pub fn file_key(self) -> String {
        self.name().to_ascii_lowercase()
    }
}

/// Resolved bootstrap configuration.
///
/// Numeric-looking options stay strings: they are handed to the server
/// verbatim and never validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapConfig {
    pub port: String,
    pub workers: String,
    pub threads: String,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub app_data_dir: PathBuf,
    pub db_path: PathBuf,
    pub seed_path: PathBuf,
    pub app_user: String,
    pub app_module: String,
    pub server_bin: String,
}

impl BootstrapConfig {
    /// Build a config by asking `value` for every option.
    ///
    /// Path options keep their raw bytes. Text options that are not valid
    /// UTF-8 are converted lossily, since they end up in the server's argv
    /// as strings anyway.
    pub fn from_settings<F>(mut value: F) -> Self
    where
        F: FnMut(Setting) -> OsString,
    {
        let mut text = |setting| lossy(value(setting));
        Self {
            port: text(Setting::Port),
            workers: text(Setting::Workers),
            threads: text(Setting::Threads),
            log_level: text(Setting::LogLevel),
            app_user: text(Setting::AppUser),
            app_module: text(Setting::AppModule),
            server_bin: text(Setting::ServerBin),
            data_dir: PathBuf::from(value(Setting::DataDir)),
            app_data_dir: PathBuf::from(value(Setting::AppDataDir)),
            db_path: PathBuf::from(value(Setting::AppDbPath)),
            seed_path: PathBuf::from(value(Setting::SeedDbPath)),
        }
    }

    /// Address the server binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self::from_settings(|s| OsString::from(s.default_value()))
    }
}

fn lossy(value: OsString) -> String {
    value
        .into_string()
        .unwrap_or_else(|raw| raw.to_string_lossy().into_owned())
}

/// A scalar in the config file. Accepts `port = 9000` as well as
/// `port = "9000"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FileValue {
    Text(String),
    Integer(i64),
}

impl FileValue {
    pub fn into_string(self) -> String {
        match self {
            FileValue::Text(s) => s,
            FileValue::Integer(n) => n.to_string(),
        }
    }
}

/// Contents of the optional TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub port: Option<FileValue>,
    pub workers: Option<FileValue>,
    pub threads: Option<FileValue>,
    pub log_level: Option<FileValue>,
    pub data_dir: Option<FileValue>,
    pub app_data_dir: Option<FileValue>,
    pub app_db_path: Option<FileValue>,
    pub seed_db_path: Option<FileValue>,
    pub app_user: Option<FileValue>,
    pub app_module: Option<FileValue>,
    pub server_bin: Option<FileValue>,
}

impl FileConfig {
    /// Value the file gives for `setting`, if any. Empty strings count as unset.
    pub fn get(&self, setting: Setting) -> Option<String> {
        let slot = match setting {
            Setting::Port => &self.port,
            Setting::Workers => &self.workers,
            Setting::Threads => &self.threads,
            Setting::LogLevel => &self.log_level,
            Setting::DataDir => &self.data_dir,
            Setting::AppDataDir => &self.app_data_dir,
            Setting::AppDbPath => &self.app_db_path,
            Setting::SeedDbPath => &self.seed_db_path,
            Setting::AppUser => &self.app_user,
            Setting::AppModule => &self.app_module,
            Setting::ServerBin => &self.server_bin,
        };
        slot.clone()
            .map(FileValue::into_string)
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BootstrapConfig::default();
        assert_eq!(config.port, "8001");
        assert_eq!(config.workers, "2");
        assert_eq!(config.threads, "4");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.app_data_dir, PathBuf::from("/app/data"));
        assert_eq!(config.db_path, PathBuf::from("/data/ota.db"));
        assert_eq!(config.seed_path, PathBuf::from("/seed/ota.db"));
        assert_eq!(config.bind_address(), "0.0.0.0:8001");
    }

    #[test]
    fn test_file_keys_match_struct_fields() {
        let mut body = String::new();
        for setting in Setting::ALL {
            body.push_str(&format!("{} = \"x\"\n", setting.file_key()));
        }
        let file: FileConfig = toml::from_str(&body).unwrap();
        for setting in Setting::ALL {
            assert_eq!(file.get(setting).as_deref(), Some("x"), "{}", setting.name());
        }
    }

    #[test]
    fn test_file_accepts_integers() {
        let file: FileConfig = toml::from_str("port = 9000\nworkers = \"\"").unwrap();
        assert_eq!(file.get(Setting::Port).as_deref(), Some("9000"));
        assert_eq!(file.get(Setting::Workers), None);
    }

    #[test]
    fn test_file_rejects_unknown_keys() {
        assert!(toml::from_str::<FileConfig>("prot = 1").is_err());
    }
}
