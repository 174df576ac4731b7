//! Configuration management for recordbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::LoadPolicy;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "recordbook";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "RECORDBOOK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RECORDBOOK_`, sections split
///    by `__`, e.g. `RECORDBOOK_STORAGE__LOAD_POLICY=strict`)
/// 2. TOML config file at `~/.config/recordbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Validation configuration.
    pub validation: ValidationConfig,
}

/// Where and how the record files are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the record files.
    /// Defaults to `~/.local/share/recordbook`
    pub data_dir: Option<PathBuf>,
    /// Client file name, relative to `data_dir` unless absolute.
    pub clients_file: PathBuf,
    /// Airline file name, relative to `data_dir` unless absolute.
    pub airlines_file: PathBuf,
    /// Flight file name, relative to `data_dir` unless absolute.
    pub flights_file: PathBuf,
    /// How an unparsable record file is treated.
    pub load_policy: LoadPolicy,
}

/// Optional uniqueness checks on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject a client update that takes another client's phone number.
    pub unique_phone_on_update: bool,
    /// Reject a flight update that makes it collide with another flight.
    pub unique_flight_on_update: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Resolved at runtime
            clients_file: PathBuf::from("clients.json"),
            airlines_file: PathBuf::from("airlines.json"),
            flights_file: PathBuf::from("flights.json"),
            load_policy: LoadPolicy::Lenient,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            unique_phone_on_update: true,
            unique_flight_on_update: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `RECORDBOOK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a store file name is empty or two stores share
    /// a file.
    pub fn validate(&self) -> Result<()> {
        let files = [
            ("clients_file", &self.storage.clients_file),
            ("airlines_file", &self.storage.airlines_file),
            ("flights_file", &self.storage.flights_file),
        ];

        for (key, file) in files {
            if file.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("{key} cannot be empty"),
                });
            }
        }

        for (i, (key, file)) in files.iter().enumerate() {
            if let Some((other, _)) = files[i + 1..].iter().find(|(_, f)| f == file) {
                return Err(Error::ConfigValidation {
                    message: format!("{key} and {other} both point to {}", file.display()),
                });
            }
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the client file path.
    #[must_use]
    pub fn clients_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.clients_file)
    }

    /// Get the airline file path.
    #[must_use]
    pub fn airlines_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.airlines_file)
    }

    /// Get the flight file path.
    #[must_use]
    pub fn flights_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.flights_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.data_dir.is_none());
        assert_eq!(config.storage.load_policy, LoadPolicy::Lenient);
        assert!(config.validation.unique_phone_on_update);
        assert!(config.validation.unique_flight_on_update);
    }

    #[test]
    fn test_default_storage_config() {
        let storage = StorageConfig::default();

        assert_eq!(storage.clients_file, PathBuf::from("clients.json"));
        assert_eq!(storage.airlines_file, PathBuf::from("airlines.json"));
        assert_eq!(storage.flights_file, PathBuf::from("flights.json"));
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_file_name() {
        let mut config = Config::default();
        config.storage.flights_file = PathBuf::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("flights_file"));
    }

    #[test]
    fn test_validate_shared_file() {
        let mut config = Config::default();
        config.storage.airlines_file = PathBuf::from("clients.json");

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("clients_file and airlines_file"));
    }

    #[test]
    fn test_paths_default() {
        let config = Config::default();

        assert!(config.data_dir().to_string_lossy().contains("recordbook"));
        assert!(config.clients_path().ends_with("recordbook/clients.json"));
        assert!(config.flights_path().ends_with("flights.json"));
    }

    #[test]
    fn test_paths_custom() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/srv/records"));
        config.storage.airlines_file = PathBuf::from("/elsewhere/carriers.json");

        assert_eq!(
            config.clients_path(),
            PathBuf::from("/srv/records/clients.json")
        );
        assert_eq!(
            config.airlines_path(),
            PathBuf::from("/elsewhere/carriers.json")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("recordbook"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[storage]
data_dir = "/tmp/records"
load_policy = "strict"

[validation]
unique_phone_on_update = false
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/records")));
        assert_eq!(config.storage.load_policy, LoadPolicy::Strict);
        assert_eq!(config.storage.clients_file, PathBuf::from("clients.json"));
        assert!(!config.validation.unique_phone_on_update);
        assert!(config.validation.unique_flight_on_update);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nflights_file = \"clients.json\"\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_load_rejects_unknown_policy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nload_policy = \"sloppy\"\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigLoad(_)));
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("\"load_policy\":\"lenient\""));
        assert!(json.contains("unique_phone_on_update"));
    }
}
