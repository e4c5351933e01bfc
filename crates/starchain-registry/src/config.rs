//! Registry configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the registration window cache and registration rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// How long a registration window stays live, in seconds.
    pub window_ttl_secs: u64,

    /// How often the background sweeper evicts expired windows, in milliseconds.
    pub sweep_interval_ms: u64,

    /// Refuse to register a star unless `validate` accepted a signature for
    /// the current window.
    pub require_verified_signature: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            window_ttl_secs: 300,
            sweep_interval_ms: 1_000,
            require_verified_signature: true,
        }
    }
}

impl RegistryConfig {
    pub fn window_ttl(&self) -> Duration {
        Duration::from_secs(self.window_ttl_secs)
    }

    /// Never zero; `tokio::time::interval` rejects a zero period.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms.max(1))
    }
}
