//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "engine.yaml";

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── engine.yaml   # server, attendance, leave and seed sections
/// ```
///
/// # Example
///
/// ```no_run
/// use hrms_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Listening on {}", loader.config().server.bind_address);
/// # Ok::<(), hrms_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing (`ConfigNotFound`)
    /// - the file contains invalid YAML (`ConfigParseError`)
    /// - a value fails validation (e.g. a malformed schedule time)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let file = path.as_ref().join(CONFIG_FILE_NAME);
        let config: EngineConfig = Self::load_yaml(&file)?;
        config.validate()?;
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hrms-engine-{}-{}", name, uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_missing_directory_returns_not_found() {
        let result = ConfigLoader::load("/nonexistent/hrms/config");
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_invalid_yaml_returns_parse_error() {
        let dir = temp_dir("bad-yaml");
        fs::write(dir.join(CONFIG_FILE_NAME), "attendance: [unclosed").unwrap();

        let result = ConfigLoader::load(&dir);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_reads_values() {
        let dir = temp_dir("values");
        fs::write(
            dir.join(CONFIG_FILE_NAME),
            r#"
server:
  bind_address: "0.0.0.0:8080"
attendance:
  default_scheduled_hours: 7.5
  utc_offset_minutes: 330
  history_limit: 31
leave:
  default_balances:
    casual: 10
    sick: 8
    earned: 15
seed:
  tokens:
    admin-token: EMP20240001
"#,
        )
        .unwrap();

        let loader = ConfigLoader::load(&dir).unwrap();
        let config = loader.config();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.attendance.default_scheduled_hours, Decimal::new(75, 1));
        assert_eq!(config.attendance.history_limit, 31);
        assert_eq!(config.leave.default_balances.sick, 8);
        assert_eq!(config.seed.tokens["admin-token"], "EMP20240001");
    }

    #[test]
    fn test_load_rejects_invalid_schedule() {
        let dir = temp_dir("bad-schedule");
        fs::write(
            dir.join(CONFIG_FILE_NAME),
            "attendance:\n  default_schedule:\n    start_time: \"9am\"\n    end_time: \"18:00\"\n",
        )
        .unwrap();

        let result = ConfigLoader::load(&dir);
        assert!(matches!(result, Err(EngineError::InvalidSchedule { .. })));
    }

    #[test]
    fn test_from_config_validates() {
        let mut config = EngineConfig::default();
        config.attendance.history_limit = 0;
        assert!(ConfigLoader::from_config(config).is_err());
    }
}
