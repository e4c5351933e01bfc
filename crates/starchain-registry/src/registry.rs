//! The registry service: validation windows in front of the chain.
//!
//! Flow for one registration:
//!
//! 1. [`Registry::request_validation`] opens (or returns) the address's window.
//! 2. The address holder signs the window's message out of band.
//! 3. [`Registry::validate`] checks the signature and marks the window.
//! 4. [`Registry::register`] consumes the window and appends a star block.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use starchain_core::Block;
use starchain_ledger::Chain;
use starchain_store::LedgerStore;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::star::{StarBody, StarSubmission};
use crate::verifier::SignatureVerifier;
use crate::window::{RegistrationWindow, SweeperHandle, WindowCache};

/// A window as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStatus {
    pub address: String,
    pub request_time_stamp: i64,
    pub message: String,
    /// Seconds left before the window lapses.
    pub validation_window: f64,
}

impl WindowStatus {
    fn new(window: &RegistrationWindow, validation_window: f64) -> Self {
        Self {
            address: window.address.clone(),
            request_time_stamp: window.request_time_stamp,
            message: window.message.clone(),
            validation_window,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureStatus {
    Valid,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStatus {
    #[serde(flatten)]
    pub window: WindowStatus,
    pub message_signature: SignatureStatus,
}

/// Result of a signature check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Whether the address may now register a star.
    pub register_star: bool,
    pub status: ValidationStatus,
}

/// Star registry over a chain.
pub struct Registry<S: LedgerStore> {
    chain: Arc<Chain<S>>,
    windows: Arc<WindowCache>,
    verifier: Arc<dyn SignatureVerifier>,
    config: RegistryConfig,
    ready: OnceCell<()>,
    sweeper: Mutex<Option<SweeperHandle>>,
}

impl<S: LedgerStore> Registry<S> {
    /// Create a registry. The window cache shares the chain's clock.
    ///
    /// Nothing is started: the chain is initialized lazily on first use and
    /// the sweeper only runs after [`Registry::start_sweeper`].
    pub fn new(
        chain: Arc<Chain<S>>,
        verifier: Arc<dyn SignatureVerifier>,
        config: RegistryConfig,
    ) -> Self {
        let windows = Arc::new(WindowCache::new(config.window_ttl(), chain.clock().clone()));
        Self {
            chain,
            windows,
            verifier,
            config,
            ready: OnceCell::new(),
            sweeper: Mutex::new(None),
        }
    }

    /// Create a registry, make sure the chain has a genesis block, and start
    /// the window sweeper. Must be called from within a Tokio runtime.
    pub async fn open(
        chain: Arc<Chain<S>>,
        verifier: Arc<dyn SignatureVerifier>,
        config: RegistryConfig,
    ) -> Result<Self> {
        let registry = Self::new(chain, verifier, config);
        registry.ensure_ready().await?;
        registry.start_sweeper();
        Ok(registry)
    }

    pub fn chain(&self) -> &Arc<Chain<S>> {
        &self.chain
    }

    pub fn windows(&self) -> &Arc<WindowCache> {
        &self.windows
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Start evicting expired windows in the background. No-op if a sweeper
    /// is already running.
    pub fn start_sweeper(&self) {
        let mut sweeper = self.sweeper.lock().unwrap_or_else(PoisonError::into_inner);
        if sweeper.as_ref().map_or(true, SweeperHandle::is_finished) {
            *sweeper = Some(self.windows.spawn_sweeper(self.config.sweep_interval()));
            tracing::debug!(every_ms = self.config.sweep_interval_ms, "window sweeper started");
        }
    }

    /// Stop the background sweeper.
    pub fn close(&self) {
        let handle = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.stop();
            tracing::debug!("window sweeper stopped");
        }
    }

    async fn ensure_ready(&self) -> Result<()> {
        self.ready
            .get_or_try_init(|| async {
                self.chain.init().await?;
                Ok::<(), RegistryError>(())
            })
            .await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// Open a validation window for `address`, or report the live one.
    pub fn request_validation(&self, address: &str) -> WindowStatus {
        let window = self.windows.request(address);
        let remaining = window.remaining_window(self.windows.ttl(), self.windows.now_millis());
        WindowStatus::new(&window, remaining)
    }

    /// Check `signature` over the window's message.
    ///
    /// A failed check leaves the window in place so the caller can retry.
    pub fn validate(&self, address: &str, signature: &str) -> Result<ValidationOutcome> {
        let window = self
            .windows
            .get(address)
            .ok_or_else(|| RegistryError::WindowNotFound(address.to_string()))?;

        let remaining = window.remaining_window(self.windows.ttl(), self.windows.now_millis());
        let valid = if remaining <= 0.0 {
            tracing::info!(address, "validation attempted on expired window");
            false
        } else if !self.verifier.verify(&window.message, address, signature) {
            tracing::info!(address, "signature rejected");
            false
        } else if !self.windows.mark_verified(address, window.request_time_stamp) {
            // The window lapsed, was claimed, or was reopened while verifying.
            tracing::info!(address, "signature valid but its window is no longer current");
            false
        } else {
            tracing::info!(address, "signature validated");
            true
        };

        Ok(ValidationOutcome {
            register_star: valid,
            status: ValidationStatus {
                window: WindowStatus::new(&window, remaining),
                message_signature: if valid {
                    SignatureStatus::Valid
                } else {
                    SignatureStatus::Invalid
                },
            },
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a star block for `address`, consuming its window.
    ///
    /// If the append fails the window is put back.
    pub async fn register(&self, address: &str, submission: &StarSubmission) -> Result<Block> {
        submission.check()?;
        self.ensure_ready().await?;

        let body = StarBody::new(address, submission).to_json()?;
        let window = self
            .windows
            .claim(address, self.config.require_verified_signature)?;

        match self.chain.append(body).await {
            Ok(block) => {
                tracing::info!(address, height = block.height, hash = %block.hash, "star registered");
                Ok(block)
            }
            Err(err) => {
                tracing::warn!(address, error = %err, "star registration failed");
                self.windows.restore(window);
                Err(err.into())
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    /// Find the star block with `hash`. Genesis is never returned.
    pub async fn search_by_hash(&self, hash: &str) -> Result<Option<Block>> {
        self.ensure_ready().await?;
        let mut cursor = self.chain.blocks().await?;
        while let Some(block) = cursor.next().await {
            let block = block?;
            if !block.is_genesis() && block.hash == hash {
                return Ok(Some(block));
            }
        }
        Ok(None)
    }

    /// Every star block registered by `address`, in height order.
    pub async fn search_by_address(&self, address: &str) -> Result<Vec<Block>> {
        self.ensure_ready().await?;
        let mut found = Vec::new();
        let mut cursor = self.chain.blocks().await?;
        while let Some(block) = cursor.next().await {
            let block = block?;
            if block.is_genesis() {
                continue;
            }
            match StarBody::from_block(&block) {
                Ok(body) if body.address == address => found.push(block),
                Ok(_) => {}
                Err(_) => tracing::debug!(height = block.height, "skipping non-star block"),
            }
        }
        Ok(found)
    }

    /// The block at `height`.
    pub async fn search_by_height(&self, height: u64) -> Result<Block> {
        self.ensure_ready().await?;
        Ok(self.chain.block(height).await?)
    }
}

impl<S: LedgerStore> Drop for Registry<S> {
    fn drop(&mut self) {
        self.close();
    }
}
