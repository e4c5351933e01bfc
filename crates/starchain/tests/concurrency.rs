//! Concurrent appends and registrations against a shared chain.

use std::collections::BTreeSet;
use std::sync::Arc;

use starchain::store::SqliteStore;
use starchain::{Chain, LedgerConfig, RegistryConfig, StarSubmission, StarchainConfig};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_get_distinct_heights() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let chain = Arc::new(Chain::new(SqliteStore::open(dir.path().join("ledger.db"))?));
    chain.init().await?;

    let a = tokio::spawn({
        let chain = chain.clone();
        async move { chain.append("left").await }
    });
    let b = tokio::spawn({
        let chain = chain.clone();
        async move { chain.append("right").await }
    });

    let a = a.await??;
    let b = b.await??;
    assert_ne!(a.height, b.height);
    assert_eq!(
        [a.height, b.height].into_iter().collect::<BTreeSet<_>>(),
        BTreeSet::from([1, 2])
    );

    assert_eq!(chain.height().await?, 2);
    assert!(chain.validate_chain().await?.is_valid());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_addresses_register_concurrently() -> anyhow::Result<()> {
    let config = StarchainConfig {
        ledger: LedgerConfig::memory(),
        registry: RegistryConfig {
            require_verified_signature: false,
            ..Default::default()
        },
    };
    let registry = Arc::new(starchain::open(&config, Arc::new(|_: &str, _: &str, _: &str| true)).await?);

    let mut handles = Vec::new();
    for i in 0..12 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            let address = format!("addr{}", i);
            registry.request_validation(&address);
            registry
                .register(&address, &StarSubmission::new("1h", "2d", format!("star {}", i)))
                .await
        }));
    }

    let mut heights = BTreeSet::new();
    for handle in handles {
        heights.insert(handle.await??.height);
    }

    assert_eq!(heights, (1..=12).collect::<BTreeSet<u64>>());
    assert_eq!(registry.chain().height().await?, 12);
    assert!(registry.chain().validate_chain().await?.is_valid());
    Ok(())
}
