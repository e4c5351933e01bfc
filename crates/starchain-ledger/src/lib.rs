//! # Starchain Ledger
//!
//! The chain engine: a persistent, hash-linked, append-only sequence of
//! blocks on top of any [`LedgerStore`](starchain_store::LedgerStore).
//!
//! ## Key Concepts
//!
//! - **Genesis**: [`Chain::init`] creates the height-0 block once; later
//!   calls are no-ops.
//! - **Linking**: every block at height `h > 0` carries the hash of block
//!   `h - 1`, and its own hash covers every other field.
//! - **Serialized appends**: concurrent [`Chain::append`] calls never share
//!   a height.
//! - **Validation as data**: [`Chain::validate_chain`] returns a
//!   [`ChainReport`] listing every defect instead of failing on the first.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use starchain_ledger::Chain;
//! use starchain_store::MemoryStore;
//!
//! async fn example() {
//!     let chain = Chain::new(MemoryStore::new());
//!     chain.init().await.unwrap();
//!
//!     let block = chain.append("some data").await.unwrap();
//!     assert_eq!(block.height, 1);
//!
//!     let report = chain.validate_chain().await.unwrap();
//!     assert!(report.is_valid());
//! }
//! ```

pub mod chain;
pub mod error;
pub mod validation;

pub use chain::{BlockCursor, Chain};
pub use error::{LedgerError, Result};
pub use validation::{validate_block, ChainDefect, ChainReport};
