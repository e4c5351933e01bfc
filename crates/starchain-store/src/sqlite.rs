//! SQLite implementation of the LedgerStore trait.
//!
//! This is the durable storage backend. It uses rusqlite with bundled SQLite,
//! wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use starchain_core::{decode_block, encode_block, Block};

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{LedgerStore, HEIGHT_KEY};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened sqlite ledger");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking thread pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn to_sql_height(height: u64) -> Result<i64> {
    i64::try_from(height)
        .map_err(|_| StoreError::InvalidData(format!("height {} exceeds SQLite range", height)))
}

fn from_sql_height(value: i64) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("negative height {} in storage", value)))
}

fn write_block(conn: &Connection, block: &Block) -> Result<()> {
    let data = encode_block(block)?;
    conn.execute(
        "INSERT INTO blocks (height, data, written_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(height) DO UPDATE SET data = excluded.data, written_at = excluded.written_at",
        params![to_sql_height(block.height)?, data, now_millis()],
    )?;
    Ok(())
}

fn insert_block(conn: &Connection, block: &Block) -> Result<()> {
    let height = to_sql_height(block.height)?;
    let taken = conn
        .query_row("SELECT 1 FROM blocks WHERE height = ?1", params![height], |_| Ok(()))
        .optional()?
        .is_some();
    if taken {
        return Err(StoreError::Conflict(block.height));
    }

    // Plain INSERT: a concurrent writer on another connection still trips the
    // primary key.
    let data = encode_block(block)?;
    conn.execute(
        "INSERT INTO blocks (height, data, written_at) VALUES (?1, ?2, ?3)",
        params![height, data, now_millis()],
    )?;
    Ok(())
}

fn write_height(conn: &Connection, height: u64) -> Result<()> {
    conn.execute(
        "INSERT INTO ledger_meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![HEIGHT_KEY, to_sql_height(height)?],
    )?;
    Ok(())
}

#[async_trait]
impl LedgerStore for SqliteStore {
    async fn get_block(&self, height: u64) -> Result<Option<Block>> {
        let key = to_sql_height(height)?;

        self.blocking(move |conn| {
            let data: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT data FROM blocks WHERE height = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;

            match data {
                Some(bytes) => Ok(Some(decode_block(&bytes)?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn put_block(&self, block: &Block) -> Result<()> {
        let block = block.clone();
        self.blocking(move |conn| write_block(conn, &block)).await
    }

    async fn get_height(&self) -> Result<Option<u64>> {
        self.blocking(|conn| {
            let value: Option<i64> = conn
                .query_row(
                    "SELECT value FROM ledger_meta WHERE key = ?1",
                    params![HEIGHT_KEY],
                    |row| row.get(0),
                )
                .optional()?;

            value.map(from_sql_height).transpose()
        })
        .await
    }

    async fn put_height(&self, height: u64) -> Result<()> {
        self.blocking(move |conn| write_height(conn, height)).await
    }

    async fn commit_block(&self, block: &Block) -> Result<()> {
        let block = block.clone();

        self.blocking(move |conn| {
            let tx = conn.transaction()?;
            insert_block(&tx, &block)?;
            write_height(&tx, block.height)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn block_heights(&self) -> Result<Vec<u64>> {
        self.blocking(|conn| {
            let mut stmt = conn.prepare("SELECT height FROM blocks ORDER BY height ASC")?;
            let heights = stmt
                .query_map([], |row| row.get::<_, i64>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            heights.into_iter().map(from_sql_height).collect()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chain(len: u64) -> Vec<Block> {
        let mut blocks = vec![Block::genesis(1_234_567_890)];
        for h in 1..len {
            let prev = &blocks[(h - 1) as usize];
            let next = Block::next(prev, format!("payload {}", h), 1_234_567_890 + h as i64);
            blocks.push(next);
        }
        blocks
    }

    #[tokio::test]
    async fn test_put_and_get_block() {
        let store = SqliteStore::open_memory().unwrap();
        let genesis = Block::genesis(1_234_567_890);

        store.put_block(&genesis).await.unwrap();

        let retrieved = store.get_block(0).await.unwrap().unwrap();
        assert_eq!(retrieved, genesis);
        assert!(store.get_block(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_height_counter() {
        let store = SqliteStore::open_memory().unwrap();
        assert_eq!(store.get_height().await.unwrap(), None);

        store.put_height(0).await.unwrap();
        store.put_height(4).await.unwrap();
        assert_eq!(store.get_height().await.unwrap(), Some(4));
    }

    #[tokio::test]
    async fn test_commit_block_writes_both_keys() {
        let store = SqliteStore::open_memory().unwrap();

        for block in make_chain(3) {
            store.commit_block(&block).await.unwrap();
        }

        assert_eq!(store.get_height().await.unwrap(), Some(2));
        assert_eq!(store.block_heights().await.unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_commit_block_refuses_occupied_height() {
        let store = SqliteStore::open_memory().unwrap();
        let blocks = make_chain(2);
        store.commit_block(&blocks[0]).await.unwrap();
        store.commit_block(&blocks[1]).await.unwrap();

        let rival = Block::next(&blocks[0], "rival", 99);
        let err = store.commit_block(&rival).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(1)));

        assert_eq!(store.get_block(1).await.unwrap().unwrap(), blocks[1]);
        assert_eq!(store.get_height().await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_second_handle_cannot_overwrite_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.db");
        let blocks = make_chain(2);

        let first = SqliteStore::open(&path).unwrap();
        let second = SqliteStore::open(&path).unwrap();
        first.commit_block(&blocks[0]).await.unwrap();
        first.commit_block(&blocks[1]).await.unwrap();

        let stale = Block::next(&blocks[0], "from the other handle", 7);
        assert!(second.commit_block(&stale).await.is_err());
        assert_eq!(first.get_block(1).await.unwrap().unwrap(), blocks[1]);
    }

    #[tokio::test]
    async fn test_put_block_overwrites() {
        let store = SqliteStore::open_memory().unwrap();
        let genesis = Block::genesis(1);
        store.put_block(&genesis).await.unwrap();

        let mut tampered = genesis.clone();
        tampered.body = "rewritten".into();
        store.put_block(&tampered).await.unwrap();

        let retrieved = store.get_block(0).await.unwrap().unwrap();
        assert_eq!(retrieved.body, "rewritten");
        assert_eq!(store.block_heights().await.unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_serialization_error() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .blocking(|conn| {
                conn.execute(
                    "INSERT INTO blocks (height, data, written_at) VALUES (0, x'ff00', 0)",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let err = store.get_block(0).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_reopen_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger").join("chain.db");
        let blocks = make_chain(2);

        {
            let store = SqliteStore::open(&path).unwrap();
            for block in &blocks {
                store.commit_block(block).await.unwrap();
            }
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_height().await.unwrap(), Some(1));
        assert_eq!(store.get_block(1).await.unwrap().unwrap(), blocks[1]);
    }
}
