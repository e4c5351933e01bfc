//! In-memory implementation of the LedgerStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence. Blocks are held in
//! their encoded form so the codec is exercised exactly as on disk.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use starchain_core::{decode_block, encode_block, Block};

use crate::error::{Result, StoreError};
use crate::traits::LedgerStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Encoded blocks indexed by height.
    blocks: BTreeMap<u64, Vec<u8>>,

    /// The reserved height counter.
    height: Option<u64>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn get_block(&self, height: u64) -> Result<Option<Block>> {
        let inner = self.read()?;
        match inner.blocks.get(&height) {
            Some(bytes) => Ok(Some(decode_block(bytes)?)),
            None => Ok(None),
        }
    }

    async fn put_block(&self, block: &Block) -> Result<()> {
        let encoded = encode_block(block)?;
        self.write()?.blocks.insert(block.height, encoded);
        Ok(())
    }

    async fn get_height(&self) -> Result<Option<u64>> {
        Ok(self.read()?.height)
    }

    async fn put_height(&self, height: u64) -> Result<()> {
        self.write()?.height = Some(height);
        Ok(())
    }

    async fn commit_block(&self, block: &Block) -> Result<()> {
        let encoded = encode_block(block)?;
        let mut inner = self.write()?;
        if inner.blocks.contains_key(&block.height) {
            return Err(StoreError::Conflict(block.height));
        }
        inner.blocks.insert(block.height, encoded);
        inner.height = Some(block.height);
        Ok(())
    }

    async fn block_heights(&self) -> Result<Vec<u64>> {
        Ok(self.read()?.blocks.keys().copied().collect())
    }
}
