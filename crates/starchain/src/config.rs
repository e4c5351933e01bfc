//! Configuration for a Starchain instance, loadable from TOML.
//!
//! ```toml
//! [ledger]
//! path = "./db/ledger.db"
//! in_memory = false
//!
//! [registry]
//! window_ttl_secs = 300
//! sweep_interval_ms = 1000
//! require_verified_signature = true
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use starchain_registry::RegistryConfig;

use crate::error::ConfigError;

/// Default location of the ledger database.
pub const DEFAULT_LEDGER_PATH: &str = "./db/ledger.db";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarchainConfig {
    pub ledger: LedgerConfig,
    pub registry: RegistryConfig,
}

/// Where the chain lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// SQLite database file. Parent directories are created on open.
    pub path: PathBuf,
    /// Keep the chain in memory instead; `path` is ignored.
    pub in_memory: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LEDGER_PATH),
            in_memory: false,
        }
    }
}

impl LedgerConfig {
    /// An in-memory ledger.
    pub fn memory() -> Self {
        Self {
            in_memory: true,
            ..Default::default()
        }
    }

    /// A SQLite ledger at `path`.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            in_memory: false,
        }
    }
}

impl StarchainConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_toml_string()?).map_err(io_err)
    }

    /// Reject settings that parse but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.window_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "registry.window_ttl_secs must be greater than zero".into(),
            ));
        }
        if !self.ledger.in_memory && self.ledger.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("ledger.path must not be empty".into()));
        }
        Ok(())
    }
}
