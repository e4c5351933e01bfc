//! # Starchain Testkit
//!
//! Testing utilities for Starchain.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Pinned block encodings and hashes
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use starchain_testkit::vectors::{all_vectors, block_from_vector};
//!
//! for vector in all_vectors() {
//!     let block = block_from_vector(&vector);
//!     assert_eq!(block.hash, vector.expected_hash);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use starchain_testkit::generators::{block_from_params, BlockParams};
//!
//! proptest! {
//!     #[test]
//!     fn sealed_blocks_verify(params: BlockParams) {
//!         prop_assert!(block_from_params(&params).verify_hash());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use starchain_registry::RegistryConfig;
//! use starchain_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_seed([1u8; 32]);
//! let registry = fixture.registry(RegistryConfig::default());
//! let address = fixture.validate(&registry);
//! assert!(registry.windows().get(&address).unwrap().signature_verified);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture, FIXTURE_EPOCH_MILLIS};
pub use generators::{block_from_params, chain_from_bodies, BlockParams};
pub use vectors::{all_vectors, block_from_vector, verify_all_vectors, GoldenVector};
