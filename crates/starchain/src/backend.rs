//! The store a configured instance runs on.

use async_trait::async_trait;

use starchain_core::Block;
use starchain_store::{LedgerStore, MemoryStore, Result, SqliteStore};

use crate::config::LedgerConfig;

/// A ledger store chosen at runtime from [`LedgerConfig`].
pub enum LedgerBackend {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl LedgerBackend {
    /// Open the store `config` describes.
    pub fn open(config: &LedgerConfig) -> Result<Self> {
        if config.in_memory {
            Ok(LedgerBackend::Memory(MemoryStore::new()))
        } else {
            Ok(LedgerBackend::Sqlite(SqliteStore::open(&config.path)?))
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LedgerBackend::Sqlite(_) => "sqlite",
            LedgerBackend::Memory(_) => "memory",
        }
    }
}

#[async_trait]
impl LedgerStore for LedgerBackend {
    async fn get_block(&self, height: u64) -> Result<Option<Block>> {
        match self {
            LedgerBackend::Sqlite(store) => store.get_block(height).await,
            LedgerBackend::Memory(store) => store.get_block(height).await,
        }
    }

    async fn put_block(&self, block: &Block) -> Result<()> {
        match self {
            LedgerBackend::Sqlite(store) => store.put_block(block).await,
            LedgerBackend::Memory(store) => store.put_block(block).await,
        }
    }

    async fn get_height(&self) -> Result<Option<u64>> {
        match self {
            LedgerBackend::Sqlite(store) => store.get_height().await,
            LedgerBackend::Memory(store) => store.get_height().await,
        }
    }

    async fn put_height(&self, height: u64) -> Result<()> {
        match self {
            LedgerBackend::Sqlite(store) => store.put_height(height).await,
            LedgerBackend::Memory(store) => store.put_height(height).await,
        }
    }

    async fn commit_block(&self, block: &Block) -> Result<()> {
        match self {
            LedgerBackend::Sqlite(store) => store.commit_block(block).await,
            LedgerBackend::Memory(store) => store.commit_block(block).await,
        }
    }

    async fn block_heights(&self) -> Result<Vec<u64>> {
        match self {
            LedgerBackend::Sqlite(store) => store.block_heights().await,
            LedgerBackend::Memory(store) => store.block_heights().await,
        }
    }
}
