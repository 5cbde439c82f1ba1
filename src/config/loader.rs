//! Configuration loading from the environment and an optional file.
//!
//! Precedence per option: non-empty environment value, then the config
//! file, then the built-in default.

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use crate::config::schema::{BootstrapConfig, FileConfig, Setting};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read a TOML config file.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Resolve every option through `lookup` (an environment stand-in), the
/// optional file, and the defaults.
///
/// Only a missing or empty value counts as unset. Values that are not valid
/// UTF-8 are kept as they are.
pub fn resolve<F>(file: Option<&FileConfig>, lookup: F) -> BootstrapConfig
where
    F: Fn(&str) -> Option<OsString>,
{
    BootstrapConfig::from_settings(|setting| {
        lookup(setting.name())
            .filter(|v| !v.is_empty())
            .or_else(|| file.and_then(|f| f.get(setting)).map(OsString::from))
            .unwrap_or_else(|| OsString::from(setting.default_value()))
    })
}

/// Resolve the configuration from the process environment.
pub fn from_env(file: Option<&FileConfig>) -> BootstrapConfig {
    let config = resolve(file, |name| std::env::var_os(name));

    for setting in Setting::ALL {
        tracing::debug!(
            option = setting.name(),
            from_env = std::env::var_os(setting.name()).is_some_and(|v| !v.is_empty()),
            "Option resolved"
        );
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    use std::path::PathBuf;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_unset_resolves_to_defaults() {
        let config = resolve(None, env(&[]));
        assert_eq!(config, BootstrapConfig::default());
    }

    #[test]
    fn test_env_overrides_each_option() {
        let config = resolve(
            None,
            env(&[
                ("PORT", "9000"),
                ("WORKERS", "8"),
                ("THREADS", "1"),
                ("LOG_LEVEL", "debug"),
                ("DATA_DIR", "/srv/data"),
                ("APP_DATA_DIR", "/srv/app/data"),
                ("APP_DB_PATH", "/srv/data/live.db"),
            ]),
        );
        assert_eq!(config.port, "9000");
        assert_eq!(config.workers, "8");
        assert_eq!(config.threads, "1");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.app_data_dir, PathBuf::from("/srv/app/data"));
        assert_eq!(config.db_path, PathBuf::from("/srv/data/live.db"));
        // Untouched options keep their defaults.
        assert_eq!(config.seed_path, PathBuf::from("/seed/ota.db"));
    }

    #[test]
    fn test_empty_env_counts_as_unset() {
        let config = resolve(None, env(&[("PORT", ""), ("LOG_LEVEL", "")]));
        assert_eq!(config.port, "8001");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_non_utf8_paths_are_kept() {
        let raw = OsStr::from_bytes(b"/srv/d\xffta");
        let config = resolve(None, |name| match name {
            "DATA_DIR" => Some(raw.to_os_string()),
            "APP_DB_PATH" => Some(OsStr::from_bytes(b"/srv/d\xffta/ota.db").to_os_string()),
            "PORT" => Some(OsStr::from_bytes(b"90\xff").to_os_string()),
            _ => None,
        });
        assert_eq!(config.data_dir.as_os_str(), raw);
        assert_eq!(
            config.db_path.as_os_str().as_bytes(),
            b"/srv/d\xffta/ota.db"
        );
        // Not the default.
        assert_eq!(config.port, "90\u{fffd}");
    }

    #[test]
    fn test_values_are_not_validated() {
        let config = resolve(None, env(&[("PORT", "not-a-port"), ("WORKERS", "-3")]));
        assert_eq!(config.port, "not-a-port");
        assert_eq!(config.workers, "-3");
        assert_eq!(config.bind_address(), "0.0.0.0:not-a-port");
    }

    #[test]
    fn test_env_beats_file_beats_default() {
        let file: FileConfig = toml::from_str("port = 7000\nworkers = 5").unwrap();
        let config = resolve(Some(&file), env(&[("PORT", "9000")]));
        assert_eq!(config.port, "9000");
        assert_eq!(config.workers, "5");
        assert_eq!(config.threads, "4");
    }

    #[test]
    fn test_load_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "port = [").unwrap();
        assert!(matches!(load_file(&bad), Err(ConfigError::Parse(_))));
    }
}
