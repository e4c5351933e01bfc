//! End-to-end registration through the facade.

use std::sync::Arc;
use std::time::Duration;

use starchain::registry::{RegistryError, SignatureStatus};
use starchain::{
    Clock, Ed25519Verifier, LedgerConfig, ManualClock, RegistryConfig, StarRecord,
    StarSubmission, StarchainConfig,
};
use starchain_testkit::{TestFixture, FIXTURE_EPOCH_MILLIS};

fn memory_config() -> StarchainConfig {
    StarchainConfig {
        ledger: LedgerConfig::memory(),
        registry: RegistryConfig::default(),
    }
}

fn sky_star() -> StarSubmission {
    StarSubmission::new(
        "16h 29m 1.0s",
        "-26° 29' 24.9",
        "Found star using https://www.google.com/sky/",
    )
    .with_magnitude(1.06)
    .with_constellation("Scorpius")
}

#[tokio::test]
async fn register_and_search_with_signed_challenge() -> anyhow::Result<()> {
    starchain::init_logging();

    let fixture = TestFixture::with_seed([5u8; 32]);
    let registry = starchain::open_with_clock(
        &memory_config(),
        Arc::new(Ed25519Verifier),
        fixture.clock.clone(),
    )
    .await?;
    let address = fixture.address();

    let window = registry.request_validation(&address);
    assert_eq!(window.request_time_stamp, FIXTURE_EPOCH_MILLIS);
    assert_eq!(
        window.message,
        format!("{}:{}:starRegistry", address, FIXTURE_EPOCH_MILLIS)
    );

    fixture.clock.advance(Duration::from_secs(5));
    let outcome = registry.validate(&address, &fixture.sign(&window.message))?;
    assert!(outcome.register_star);
    assert_eq!(outcome.status.message_signature, SignatureStatus::Valid);
    assert_eq!(outcome.status.window.validation_window, 295.0);

    let block = registry.register(&address, &sky_star()).await?;
    assert!(block.height > 0);
    assert!(!block.hash.is_empty());
    assert!(!block.previous_block_hash.is_empty());

    assert_eq!(registry.search_by_address(&address).await?, vec![block.clone()]);
    assert_eq!(registry.search_by_hash(&block.hash).await?, Some(block.clone()));
    assert_eq!(registry.search_by_height(block.height).await?, block);

    let record = StarRecord::from_block(&block)?;
    assert_eq!(record.body.address, address);
    assert_eq!(record.body.star.magnitude, Some(1.06));
    assert_eq!(
        record.body.star.story_decoded.as_deref(),
        Some("Found star using https://www.google.com/sky/")
    );

    assert!(registry.chain().validate_chain().await?.is_valid());
    registry.close();
    Ok(())
}

#[tokio::test]
async fn window_is_single_use() -> anyhow::Result<()> {
    let accept = |_: &str, address: &str, signature: &str| signature == format!("signed-by-{}", address);
    let registry = starchain::open(&memory_config(), Arc::new(accept)).await?;

    registry.request_validation("addr1");
    assert!(registry.validate("addr1", "signed-by-addr1")?.register_star);
    registry.register("addr1", &sky_star()).await?;

    let err = registry.validate("addr1", "signed-by-addr1").unwrap_err();
    assert!(matches!(err, RegistryError::WindowNotFound(_)));
    assert!(err.is_not_found());

    let err = registry.register("addr1", &sky_star()).await.unwrap_err();
    assert!(err.is_not_found());

    // A fresh window allows a second star.
    registry.request_validation("addr1");
    registry.validate("addr1", "signed-by-addr1")?;
    let second = registry.register("addr1", &sky_star()).await?;
    assert_eq!(second.height, 2);
    assert_eq!(registry.search_by_address("addr1").await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn failed_validation_allows_retry_until_expiry() -> anyhow::Result<()> {
    let clock = Arc::new(ManualClock::new(FIXTURE_EPOCH_MILLIS));
    let accept = |_: &str, _: &str, signature: &str| signature == "good";
    // Keep the sweeper out of the way so the lapsed window is still visible.
    let mut config = memory_config();
    config.registry.sweep_interval_ms = 3_600_000;
    let registry = starchain::open_with_clock(&config, Arc::new(accept), clock.clone()).await?;

    let first = registry.request_validation("addr1");
    let outcome = registry.validate("addr1", "bad")?;
    assert!(!outcome.register_star);
    assert_eq!(outcome.status.message_signature, SignatureStatus::Invalid);

    clock.advance(Duration::from_secs(100));
    let outcome = registry.validate("addr1", "good")?;
    assert!(outcome.register_star);
    assert_eq!(outcome.status.window.request_time_stamp, first.request_time_stamp);

    clock.advance(Duration::from_secs(200));
    let err = registry.register("addr1", &sky_star()).await.unwrap_err();
    assert!(matches!(err, RegistryError::WindowExpired(_)));
    assert_eq!(clock.now_millis() - first.request_time_stamp, 300_000);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn sweeper_forgets_abandoned_windows() -> anyhow::Result<()> {
    let clock = Arc::new(ManualClock::new(FIXTURE_EPOCH_MILLIS));
    let mut config = memory_config();
    config.registry.window_ttl_secs = 10;
    config.registry.sweep_interval_ms = 500;
    let registry =
        starchain::open_with_clock(&config, Arc::new(Ed25519Verifier), clock.clone()).await?;

    registry.request_validation("abandoned");
    assert_eq!(registry.windows().len(), 1);

    clock.advance(Duration::from_secs(10));
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(registry.windows().is_empty());
    let err = registry.validate("abandoned", "sig").unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}
