//! Error types for the Starchain facade.

use std::path::PathBuf;

use starchain_ledger::LedgerError;
use starchain_registry::RegistryError;
use starchain_store::StoreError;
use thiserror::Error;

/// Errors loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`StarchainConfig`](crate::StarchainConfig).
    #[error("unable to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("unable to encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    /// The configuration parsed but is unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur when opening or using a Starchain instance.
#[derive(Debug, Error)]
pub enum StarchainError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Chain engine error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Registry error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl StarchainError {
    /// Whether the error means "the requested thing does not exist".
    pub fn is_not_found(&self) -> bool {
        match self {
            StarchainError::Ledger(err) => err.is_not_found(),
            StarchainError::Registry(err) => err.is_not_found(),
            _ => false,
        }
    }
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, StarchainError>;
