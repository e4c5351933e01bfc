//! # Starchain
//!
//! A persistent, hash-linked, append-only ledger of registered stars, gated
//! by single-use, time-boxed address validation.
//!
//! ## Overview
//!
//! - **Chain**: blocks linked by content hash, starting from a genesis block
//! - **Registry**: addresses prove ownership by signing a challenge, then
//!   register one star per validation window
//! - **Storage**: SQLite on disk, or in memory for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use starchain::{Ed25519Verifier, StarSubmission, StarchainConfig};
//! use starchain::core::Keypair;
//!
//! async fn example() {
//!     starchain::init_logging();
//!
//!     let config = StarchainConfig::default();
//!     let registry = starchain::open(&config, Arc::new(Ed25519Verifier)).await.unwrap();
//!
//!     let keypair = Keypair::generate();
//!     let address = keypair.address();
//!     let window = registry.request_validation(&address);
//!     let signature = keypair.sign_message(&window.message);
//!     registry.validate(&address, &signature).unwrap();
//!
//!     let block = registry
//!         .register(&address, &StarSubmission::new("16h 29m 1.0s", "-26° 29' 24.9", "story"))
//!         .await
//!         .unwrap();
//!     println!("registered at height {}", block.height);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `starchain::core` - Blocks, hashing, signatures, clocks
//! - `starchain::store` - Storage abstraction, SQLite and memory stores
//! - `starchain::ledger` - The chain engine
//! - `starchain::registry` - Validation windows and star registration

pub mod backend;
pub mod config;
pub mod error;
pub mod service;

use tracing_subscriber::EnvFilter;

// Re-export component crates
pub use starchain_core as core;
pub use starchain_ledger as ledger;
pub use starchain_registry as registry;
pub use starchain_store as store;

pub use backend::LedgerBackend;
pub use config::{LedgerConfig, StarchainConfig, DEFAULT_LEDGER_PATH};
pub use error::{ConfigError, Result, StarchainError};
pub use service::{open, open_with_clock, StarRegistry};

// Re-export commonly used types
pub use starchain_core::{Block, Clock, Keypair, ManualClock, SystemClock};
pub use starchain_ledger::{Chain, ChainReport};
pub use starchain_registry::{
    Ed25519Verifier, RegistryConfig, SignatureVerifier, StarRecord, StarSubmission,
    ValidationOutcome, WindowStatus,
};

/// Install a `tracing` subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Does nothing if a global subscriber is already set.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
