//! SQLite-backed chains survive a process restart.

use std::sync::Arc;

use starchain::store::{LedgerStore, SqliteStore};
use starchain::{Chain, LedgerConfig, RegistryConfig, StarSubmission, StarchainConfig};

fn sqlite_config(dir: &tempfile::TempDir) -> StarchainConfig {
    StarchainConfig {
        ledger: LedgerConfig::sqlite(dir.path().join("db").join("ledger.db")),
        registry: RegistryConfig {
            require_verified_signature: false,
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn chain_persists_across_reopen() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = sqlite_config(&dir);
    let accept = Arc::new(|_: &str, _: &str, _: &str| true);

    let (genesis, star) = {
        let registry = starchain::open(&config, accept.clone()).await?;
        let genesis = registry.search_by_height(0).await?;
        registry.request_validation("addr1");
        let star = registry
            .register("addr1", &StarSubmission::new("1h", "2d", "persisted"))
            .await?;
        registry.close();
        (genesis, star)
    };

    let registry = starchain::open(&config, accept).await?;
    assert_eq!(registry.chain().height().await?, 1);
    assert_eq!(registry.search_by_height(0).await?, genesis);
    assert_eq!(registry.search_by_hash(&star.hash).await?, Some(star.clone()));
    assert_eq!(registry.search_by_address("addr1").await?, vec![star]);

    let next = registry.chain().append("after restart").await?;
    assert_eq!(next.height, 2);
    assert!(registry.chain().validate_chain().await?.is_valid());
    Ok(())
}

#[tokio::test]
async fn init_is_idempotent_on_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("ledger.db");

    let first = Chain::new(SqliteStore::open(&path)?).init().await?;
    let second = Chain::new(SqliteStore::open(&path)?).init().await?;

    assert_eq!(first, second);
    let store = SqliteStore::open(&path)?;
    assert_eq!(store.get_height().await?, Some(0));
    assert_eq!(store.block_heights().await?, vec![0]);
    Ok(())
}

#[tokio::test]
async fn tampering_on_disk_is_detected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("ledger.db");

    let chain = Chain::new(SqliteStore::open(&path)?);
    chain.init().await?;
    for i in 0..4 {
        chain.append(format!("block {}", i)).await?;
    }

    let mut forged = chain.block(2).await?;
    forged.body = "rewritten history".into();
    chain.store().put_block(&forged).await?;

    let report = chain.validate_chain().await?;
    assert!(!report.is_valid());
    assert_eq!(report.errors(), vec!["Block 2 is invalid".to_string()]);

    // Re-sealing the forgery moves the defect to the link above it.
    chain.store().put_block(&forged.seal()).await?;
    let report = chain.validate_chain().await?;
    assert_eq!(
        report.errors(),
        vec!["Block 3 - previous hash is invalid.".to_string()]
    );
    Ok(())
}
