//! # Starchain Registry
//!
//! Star registration gated by time-boxed address validation.
//!
//! An address first asks for a validation window, signs the window's
//! challenge message, and may then register exactly one star while the
//! window is live. Registered stars are appended to the chain as JSON
//! bodies and can be searched by hash, owner address, or height.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use starchain_core::Keypair;
//! use starchain_ledger::Chain;
//! use starchain_registry::{Ed25519Verifier, Registry, RegistryConfig, StarSubmission};
//! use starchain_store::MemoryStore;
//!
//! async fn example() {
//!     let chain = Arc::new(Chain::new(MemoryStore::new()));
//!     let registry = Registry::open(chain, Arc::new(Ed25519Verifier), RegistryConfig::default())
//!         .await
//!         .unwrap();
//!
//!     let keypair = Keypair::generate();
//!     let address = keypair.address();
//!     let window = registry.request_validation(&address);
//!     let signature = keypair.sign_message(&window.message);
//!     assert!(registry.validate(&address, &signature).unwrap().register_star);
//!
//!     let star = StarSubmission::new("16h 29m 1.0s", "-26° 29' 24.9", "a story");
//!     let block = registry.register(&address, &star).await.unwrap();
//!     assert_eq!(registry.search_by_address(&address).await.unwrap(), vec![block]);
//! }
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod star;
pub mod verifier;
pub mod window;

pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use registry::{Registry, SignatureStatus, ValidationOutcome, ValidationStatus, WindowStatus};
pub use star::{StarBody, StarEntry, StarRecord, StarSubmission};
pub use verifier::{Ed25519Verifier, SignatureVerifier};
pub use window::{ClaimError, RegistrationWindow, SweeperHandle, WindowCache, MESSAGE_SUFFIX};
