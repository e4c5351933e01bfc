//! Error types for the registry service.

use starchain_ledger::LedgerError;
use thiserror::Error;

use crate::window::ClaimError;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No registration window exists for the address.
    #[error("no registration window for {0}")]
    WindowNotFound(String),

    /// The address's registration window has lapsed.
    #[error("registration window for {0} has expired")]
    WindowExpired(String),

    /// Registration was attempted before a signature was accepted.
    #[error("signature for {0} has not been validated")]
    SignatureNotVerified(String),

    /// The star submission is malformed.
    #[error("invalid star submission: {0}")]
    InvalidSubmission(String),

    /// A star body could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Chain engine error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl RegistryError {
    /// Whether the error means "the requested thing does not exist".
    pub fn is_not_found(&self) -> bool {
        match self {
            RegistryError::WindowNotFound(_) => true,
            RegistryError::Ledger(err) => err.is_not_found(),
            _ => false,
        }
    }
}

impl From<ClaimError> for RegistryError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::NotFound(address) => RegistryError::WindowNotFound(address),
            ClaimError::Expired(address) => RegistryError::WindowExpired(address),
            ClaimError::Unverified(address) => RegistryError::SignatureNotVerified(address),
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
