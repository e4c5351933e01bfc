//! The chain engine: append-only, hash-linked history over a [`LedgerStore`].
//!
//! The engine owns genesis bootstrapping, linked appends, and integrity
//! checks. It is the only writer of the height counter.

use std::sync::Arc;

use tokio::sync::Mutex;

use starchain_core::{Block, Clock, SystemClock};
use starchain_store::{LedgerStore, StoreError};

use crate::error::{LedgerError, Result};
use crate::validation::{validate_block, ChainDefect, ChainReport};

/// An append-only, hash-linked chain of blocks.
///
/// One `Chain` should exist per store. Appends are serialized by an internal
/// lock: the read of the current height, the construction of the next block,
/// and the commit of block plus height counter form one critical section, so
/// two concurrent appends can never claim the same height.
pub struct Chain<S: LedgerStore> {
    /// The storage backend.
    store: Arc<S>,
    /// Time source for block timestamps.
    clock: Arc<dyn Clock>,
    /// Serializes `init` and `append`.
    append_lock: Mutex<()>,
}

impl<S: LedgerStore> Chain<S> {
    /// Create a chain over `store` using the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Create a chain over `store` with an explicit clock.
    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(store),
            clock,
            append_lock: Mutex::new(()),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the clock used for block timestamps.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Write Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Make sure a genesis block exists, creating it if necessary.
    ///
    /// Idempotent across calls and process restarts: an existing block at
    /// height 0 is returned untouched.
    pub async fn init(&self) -> Result<Block> {
        let _guard = self.append_lock.lock().await;

        if let Some(genesis) = self.store.get_block(0).await? {
            tracing::debug!(hash = %genesis.hash, "genesis block already present");
            return Ok(genesis);
        }

        let genesis = Block::genesis(self.clock.now_secs());

        match self.store.get_height().await? {
            None => self.store.commit_block(&genesis).await?,
            Some(height) => {
                tracing::warn!(height, "height counter present without genesis; restoring genesis only");
                self.store.put_block(&genesis).await?;
            }
        }

        tracing::info!(hash = %genesis.hash, "created genesis block");
        Ok(genesis)
    }

    /// Append a new block carrying `body` and return it as persisted.
    ///
    /// Fails with [`LedgerError::MissingGenesis`] before [`Chain::init`].
    pub async fn append(&self, body: impl Into<String>) -> Result<Block> {
        let body = body.into();
        let _guard = self.append_lock.lock().await;

        if self.store.get_block(0).await?.is_none() {
            return Err(LedgerError::MissingGenesis);
        }

        let current = self.store.get_height().await?.ok_or_else(|| {
            LedgerError::Inconsistent("genesis exists but the height counter is missing".into())
        })?;

        let prev = self.store.get_block(current).await?.ok_or_else(|| {
            LedgerError::Inconsistent(format!("height counter is {} but that block is missing", current))
        })?;

        let block = Block::next(&prev, body, self.clock.now_secs());
        self.store.commit_block(&block).await?;

        // Read back so callers observe the durable value.
        let stored = self.store.get_block(block.height).await?.ok_or_else(|| {
            LedgerError::Inconsistent(format!("block {} vanished after commit", block.height))
        })?;

        tracing::info!(height = stored.height, hash = %stored.hash, "appended block");
        Ok(stored)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// The height of the latest block, or -1 for an empty chain.
    pub async fn height(&self) -> Result<i64> {
        match self.store.get_height().await? {
            Some(height) => i64::try_from(height)
                .map_err(|_| LedgerError::Inconsistent(format!("height {} out of range", height))),
            None => Ok(-1),
        }
    }

    /// Get the block at `height`.
    pub async fn block(&self, height: u64) -> Result<Block> {
        self.store
            .get_block(height)
            .await?
            .ok_or(LedgerError::BlockNotFound(height))
    }

    /// Get the latest block.
    pub async fn tip(&self) -> Result<Block> {
        match self.store.get_height().await? {
            Some(height) => self.block(height).await,
            None => Err(LedgerError::MissingGenesis),
        }
    }

    /// A lazy cursor over heights `0..=height`, fixed at creation time.
    pub async fn blocks(&self) -> Result<BlockCursor<'_, S>> {
        let height = self.height().await?;
        Ok(BlockCursor {
            chain: self,
            next: 0,
            end: u64::try_from(height).ok(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// Check a single block's content hash.
    pub fn validate_block(&self, block: &Block) -> bool {
        validate_block(block)
    }

    /// Scan every stored block and report all integrity defects.
    ///
    /// Checks each block's hash and its link to the block below it. Missing,
    /// undecodable, and above-tip blocks are reported too. The scan does not
    /// take the append lock; blocks appended mid-scan may or may not be seen.
    pub async fn validate_chain(&self) -> Result<ChainReport> {
        let tip = self.height().await?;
        let mut heights = self.store.block_heights().await?;
        if let Ok(top) = u64::try_from(tip) {
            heights.extend(0..=top);
        }
        heights.sort_unstable();
        heights.dedup();

        let mut report = ChainReport::default();
        let mut prev: Option<Block> = None;

        for height in heights {
            let block = match self.store.get_block(height).await {
                Ok(Some(block)) => block,
                Ok(None) => {
                    report.record(ChainDefect::Missing { height });
                    prev = None;
                    continue;
                }
                Err(StoreError::Serialization(e)) => {
                    report.record(ChainDefect::Corrupt {
                        height,
                        reason: e.to_string(),
                    });
                    prev = None;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            report.checked += 1;

            if i64::try_from(height).map_or(true, |h| h > tip) {
                report.record(ChainDefect::BeyondTip { height, tip });
            }

            if !validate_block(&block) {
                report.record(ChainDefect::InvalidHash { height });
            }

            if height > 0 {
                if let Some(below) = prev.as_ref().filter(|b| b.height + 1 == height) {
                    if block.previous_block_hash != below.hash {
                        report.record(ChainDefect::BrokenLink { height });
                    }
                }
            }

            prev = Some(block);
        }

        if report.is_valid() {
            tracing::info!(blocks = report.checked, "chain is valid");
        } else {
            tracing::warn!(
                blocks = report.checked,
                defects = report.defects.len(),
                "chain validation found defects"
            );
        }

        Ok(report)
    }
}

/// A restartable, finite cursor over the chain's blocks in height order.
///
/// The range is fixed when the cursor is created; blocks appended later are
/// not visited.
pub struct BlockCursor<'a, S: LedgerStore> {
    chain: &'a Chain<S>,
    next: u64,
    end: Option<u64>,
}

impl<S: LedgerStore> BlockCursor<'_, S> {
    /// Fetch the next block, or `None` once the range is exhausted.
    pub async fn next(&mut self) -> Option<Result<Block>> {
        let end = self.end?;
        if self.next > end {
            return None;
        }
        let height = self.next;
        self.next += 1;
        Some(self.chain.block(height).await)
    }

    /// Start again from genesis over the same range.
    pub fn rewind(&mut self) {
        self.next = 0;
    }

    /// Number of blocks not yet visited.
    pub fn remaining(&self) -> u64 {
        match self.end {
            Some(end) if self.next <= end => end - self.next + 1,
            _ => 0,
        }
    }
}
