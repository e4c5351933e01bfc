//! Error types for the chain engine.

use starchain_store::StoreError;
use thiserror::Error;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No block exists at the requested height.
    #[error("block not found at height {0}")]
    BlockNotFound(u64),

    /// An operation needed the genesis block before `init` created it.
    #[error("genesis block does not exist; call init first")]
    MissingGenesis,

    /// The store disagrees with itself (e.g. the height counter points at a
    /// missing block).
    #[error("inconsistent ledger: {0}")]
    Inconsistent(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Whether the error means "the requested thing does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::BlockNotFound(_))
    }
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
