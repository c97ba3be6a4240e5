//! # Configuration
//!
//! Store configuration: where the database lives and how the ledger behaves.
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! defaults ──► till.toml ──► TILL_* environment ──► validate()
//! ```
//!
//! ## Example `till.toml`
//! ```toml
//! [database]
//! path = "/var/lib/till/till.db"
//! max_connections = 5
//! busy_timeout_secs = 5
//!
//! [ledger]
//! allow_negative_stock = false
//! enforce_return_quantities = true
//! enforce_credit_limit = false
//! tax_rate_bps = 1700
//! ```
//!
//! ## Environment
//! | Variable                     | Overrides                         |
//! |------------------------------|-----------------------------------|
//! | `TILL_DB_PATH`               | `database.path`                   |
//! | `TILL_MAX_CONNECTIONS`       | `database.max_connections`        |
//! | `TILL_ALLOW_NEGATIVE_STOCK`  | `ledger.allow_negative_stock`     |
//! | `TILL_TAX_RATE_BPS`          | `ledger.tax_rate_bps`             |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use till_core::LedgerPolicy;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to `till.db` in the platform data directory.
    pub path: PathBuf,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Pool acquire timeout.
    pub connect_timeout_secs: u64,
    /// How long a writer waits on a locked database before failing.
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 30,
            busy_timeout_secs: 5,
        }
    }
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "till", "ledger")
        .map(|dirs| dirs.data_dir().join("till.db"))
        .unwrap_or_else(|| PathBuf::from("till.db"))
}

// =============================================================================
// TillConfig
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TillConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub ledger: LedgerPolicy,
}

impl TillConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading till config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load till config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> DbResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| DbError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| DbError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Till config saved");
        Ok(())
    }

    pub fn validate(&self) -> DbResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(DbError::InvalidConfig("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(DbError::InvalidConfig(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(DbError::InvalidConfig(
                "database.min_connections cannot exceed max_connections".into(),
            ));
        }

        self.ledger
            .validate()
            .map_err(|e| DbError::InvalidConfig(format!("ledger: {}", e)))?;

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("TILL_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(max) = std::env::var("TILL_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid TILL_MAX_CONNECTIONS"),
            }
        }

        if let Ok(flag) = std::env::var("TILL_ALLOW_NEGATIVE_STOCK") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.ledger.allow_negative_stock = true,
                "0" | "false" | "no" => self.ledger.allow_negative_stock = false,
                _ => warn!(value = %flag, "Ignoring invalid TILL_ALLOW_NEGATIVE_STOCK"),
            }
        }

        if let Ok(bps) = std::env::var("TILL_TAX_RATE_BPS") {
            match bps.parse::<u32>() {
                Ok(n) => {
                    debug!(tax_rate_bps = n, "Overriding tax rate from environment");
                    self.ledger.tax_rate_bps = n;
                }
                Err(_) => warn!(value = %bps, "Ignoring invalid TILL_TAX_RATE_BPS"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "till", "ledger")
            .map(|dirs| dirs.config_dir().join("till.toml"))
    }

    /// Builds the pool configuration these settings describe.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database.path.clone())
            .max_connections(self.database.max_connections)
            .min_connections(self.database.min_connections)
            .connect_timeout(Duration::from_secs(self.database.connect_timeout_secs))
            .busy_timeout(Duration::from_secs(self.database.busy_timeout_secs))
            .ledger_policy(self.ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = TillConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.ledger.allow_negative_stock);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[database]
path = "/tmp/till-test.db"
max_connections = 3

[ledger]
allow_negative_stock = false
tax_rate_bps = 1700
"#
        )
        .unwrap();

        let config = TillConfig::load(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.database.max_connections, 3);
        assert_eq!(config.database.busy_timeout_secs, 5);
        assert!(!config.ledger.allow_negative_stock);
        assert!(config.ledger.enforce_return_quantities);
        assert_eq!(config.ledger.tax_rate_bps, 1700);

        let db = config.db_config();
        assert_eq!(db.max_connections, 3);
        assert!(!db.policy.allow_negative_stock);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TillConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.database.min_connections, 1);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database\nmax_connections = ").unwrap();

        let err = TillConfig::load(Some(file.path().to_path_buf())).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validation() {
        let mut config = TillConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = TillConfig::default();
        config.ledger.tax_rate_bps = 50_000;
        assert!(matches!(config.validate(), Err(DbError::InvalidConfig(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("till.toml");

        let mut config = TillConfig::default();
        config.database.path = dir.path().join("till.db");
        config.ledger.enforce_credit_limit = true;
        config.save(Some(path.clone())).unwrap();

        let reloaded = TillConfig::load(Some(path)).unwrap();
        assert!(reloaded.ledger.enforce_credit_limit);
        assert_eq!(reloaded.database.path, dir.path().join("till.db"));
    }
}
