//! # Starchain Store
//!
//! Storage abstraction for the Starchain ledger. Provides a trait-based
//! interface for block persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The ledger is a key-value space: each integer height maps to one encoded
//! [`Block`](starchain_core::Block), and a reserved `"height"` key holds the
//! height of the most recent block. The [`LedgerStore`] trait hides the
//! backend, so the chain engine is storage-agnostic. The primary
//! implementation is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use starchain_store::{LedgerStore, SqliteStore};
//! use starchain_core::Block;
//!
//! async fn example() {
//!     let store = SqliteStore::open("db/ledger.db").unwrap();
//!
//!     let genesis = Block::genesis(1_536_000_000);
//!     store.commit_block(&genesis).await.unwrap();
//!     assert_eq!(store.get_height().await.unwrap(), Some(0));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **No chain rules**: linking and hashing are enforced by the chain engine
//! - **Atomic commit**: a block and the height counter are written together
//! - **Missing keys are not errors**: lookups return `Ok(None)`

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{LedgerStore, HEIGHT_KEY};
