//! Process configuration resolved from environment variables.
//!
//! # Invariants
//! - Resolved once per process; later environment changes are ignored.
//! - Blank values are treated as unset.

use rollbook_core::{default_log_level, init_logging, LoggingError};
use std::path::PathBuf;
use std::sync::OnceLock;

pub const DB_PATH_ENV: &str = "ROLLBOOK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "ROLLBOOK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ROLLBOOK_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "rollbook.sqlite3";

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging stays off when this is `None`.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging is disabled.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        init_logging(&self.log_level, &log_dir.to_string_lossy())?;
        Ok(true)
    }
}

/// Process-wide config, read from the environment on first use.
pub fn app_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(AppConfig::from_env)
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = AppConfig::from_lookup(lookup(&[(DB_PATH_ENV, "   ")]));
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("rollbook.sqlite3")
        );
        assert_eq!(config.log_level, rollbook_core::default_log_level());
        assert_eq!(config.log_dir, None);
        assert_eq!(config.init_logging(), Ok(false));
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let config = AppConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, " /var/lib/rollbook/db.sqlite3 "),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/var/log/rollbook"),
        ]));
        assert_eq!(
            config.db_path,
            PathBuf::from("/var/lib/rollbook/db.sqlite3")
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/rollbook")));
    }

    #[test]
    fn relative_log_dir_is_rejected_at_init() {
        let config = AppConfig::from_lookup(lookup(&[(LOG_DIR_ENV, "logs/dev")]));
        let error = config.init_logging().expect_err("relative log dir");
        assert!(error.to_string().contains("absolute"));
    }
}
