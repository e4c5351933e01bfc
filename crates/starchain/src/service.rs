//! Opening a configured registry.

use std::sync::Arc;

use starchain_core::{Clock, SystemClock};
use starchain_ledger::Chain;
use starchain_registry::{Registry, SignatureVerifier};

use crate::backend::LedgerBackend;
use crate::config::StarchainConfig;
use crate::error::Result;

/// A registry over whichever store the configuration selected.
pub type StarRegistry = Registry<LedgerBackend>;

/// Open the store, chain, and registry described by `config`.
///
/// Creates the genesis block if the chain is empty and starts the window
/// sweeper, so this must run inside a Tokio runtime.
pub async fn open(
    config: &StarchainConfig,
    verifier: Arc<dyn SignatureVerifier>,
) -> Result<StarRegistry> {
    open_with_clock(config, verifier, Arc::new(SystemClock)).await
}

/// Like [`open`], with an explicit time source.
pub async fn open_with_clock(
    config: &StarchainConfig,
    verifier: Arc<dyn SignatureVerifier>,
    clock: Arc<dyn Clock>,
) -> Result<StarRegistry> {
    config.validate()?;

    let store = LedgerBackend::open(&config.ledger)?;
    let backend = store.kind();
    let chain = Arc::new(Chain::with_clock(store, clock));
    let registry = Registry::open(chain, verifier, config.registry.clone()).await?;

    let height = registry.chain().height().await?;
    tracing::info!(
        backend,
        path = %config.ledger.path.display(),
        height,
        window_ttl_secs = config.registry.window_ttl_secs,
        "starchain opened"
    );

    Ok(registry)
}
