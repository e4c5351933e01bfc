//! Store trait: the abstract interface for ledger persistence.
//!
//! Conceptually the ledger is a key-value store: integer heights map to
//! encoded blocks, and one reserved key holds the current chain height.
//! This trait allows the chain engine to be storage-agnostic.

use async_trait::async_trait;
use starchain_core::Block;

use crate::error::Result;

/// Reserved key under which the current chain height is stored.
pub const HEIGHT_KEY: &str = "height";

/// The LedgerStore trait: async interface for block persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **Plain key-value**: the store does not enforce chain linking; that is
///   the chain engine's job. `put_block` overwrites whatever is at a height.
/// - **Atomic commit**: [`LedgerStore::commit_block`] writes a block and the
///   height counter together, so a reader never observes one without the other.
///   Unlike `put_block` it never overwrites: an occupied height is a
///   [`StoreError::Conflict`](crate::StoreError::Conflict).
/// - **Errors propagate**: a missing key is `Ok(None)`, never an error.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Get the block stored at `height`.
    async fn get_block(&self, height: u64) -> Result<Option<Block>>;

    /// Store a block at its own height, replacing any existing entry.
    async fn put_block(&self, block: &Block) -> Result<()>;

    /// Get the stored chain height, if the counter has been written.
    async fn get_height(&self) -> Result<Option<u64>>;

    /// Overwrite the chain height counter.
    async fn put_height(&self, height: u64) -> Result<()>;

    /// Store a block at a free height and set the height counter to its
    /// height in one transaction. Fails with `StoreError::Conflict` if the
    /// height is taken.
    async fn commit_block(&self, block: &Block) -> Result<()>;

    /// All heights that currently hold a block, in ascending order.
    ///
    /// The reserved height counter is not part of this listing.
    async fn block_heights(&self) -> Result<Vec<u64>>;
}

#[async_trait]
impl<S: LedgerStore + ?Sized> LedgerStore for std::sync::Arc<S> {
    async fn get_block(&self, height: u64) -> Result<Option<Block>> {
        (**self).get_block(height).await
    }

    async fn put_block(&self, block: &Block) -> Result<()> {
        (**self).put_block(block).await
    }

    async fn get_height(&self) -> Result<Option<u64>> {
        (**self).get_height().await
    }

    async fn put_height(&self, height: u64) -> Result<()> {
        (**self).put_height(height).await
    }

    async fn commit_block(&self, block: &Block) -> Result<()> {
        (**self).commit_block(block).await
    }

    async fn block_heights(&self) -> Result<Vec<u64>> {
        (**self).block_heights().await
    }
}
