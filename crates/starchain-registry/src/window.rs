//! Registration windows: time-boxed, single-use signature challenges.
//!
//! At most one live window exists per address. Windows expire a fixed TTL
//! after creation and are evicted by a background sweeper even if nobody
//! asks about them again.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;

use starchain_core::Clock;

/// Suffix appended to every challenge message.
pub const MESSAGE_SUFFIX: &str = "starRegistry";

/// A pending validation attempt for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationWindow {
    /// The identity being validated.
    pub address: String,

    /// Creation time (Unix milliseconds).
    pub request_time_stamp: i64,

    /// The challenge the address holder must sign.
    pub message: String,

    /// Set once a signature over `message` has been accepted.
    #[serde(default)]
    pub signature_verified: bool,
}

impl RegistrationWindow {
    /// Open a window for `address` at `now_millis`.
    pub fn new(address: impl Into<String>, now_millis: i64) -> Self {
        let address = address.into();
        let message = Self::challenge(&address, now_millis);
        Self {
            address,
            request_time_stamp: now_millis,
            message,
            signature_verified: false,
        }
    }

    /// The challenge text for `address` opened at `time_stamp`.
    pub fn challenge(address: &str, time_stamp: i64) -> String {
        format!("{}:{}:{}", address, time_stamp, MESSAGE_SUFFIX)
    }

    /// The instant (Unix milliseconds) this window stops being live.
    pub fn expires_at(&self, ttl: Duration) -> i64 {
        self.request_time_stamp
            .saturating_add(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX))
    }

    /// Seconds left before expiry. Negative once expired.
    pub fn remaining_window(&self, ttl: Duration, now_millis: i64) -> f64 {
        let elapsed = now_millis.saturating_sub(self.request_time_stamp) as f64 / 1000.0;
        ttl.as_secs_f64() - elapsed
    }

    /// Whether the window has lapsed at `now_millis`.
    pub fn is_expired(&self, ttl: Duration, now_millis: i64) -> bool {
        now_millis >= self.expires_at(ttl)
    }
}

/// Why a window could not be claimed for registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("no registration window for {0}")]
    NotFound(String),

    #[error("registration window for {0} has expired")]
    Expired(String),

    #[error("signature for {0} has not been validated")]
    Unverified(String),
}

#[derive(Default)]
struct CacheInner {
    windows: HashMap<String, RegistrationWindow>,
    /// Expiry index: (expires_at, address), ordered by deadline.
    expiries: BTreeSet<(i64, String)>,
}

impl CacheInner {
    fn insert(&mut self, window: RegistrationWindow, ttl: Duration) {
        self.expiries
            .insert((window.expires_at(ttl), window.address.clone()));
        self.windows.insert(window.address.clone(), window);
    }

    fn remove(&mut self, address: &str, ttl: Duration) -> Option<RegistrationWindow> {
        let window = self.windows.remove(address)?;
        self.expiries
            .remove(&(window.expires_at(ttl), window.address.clone()));
        Some(window)
    }
}

/// In-memory TTL cache of registration windows keyed by address.
///
/// Every check-then-act operation (create-if-absent, claim) runs inside one
/// critical section, so concurrent first requests for an address observe a
/// single window.
pub struct WindowCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    inner: Mutex<CacheInner>,
}

impl WindowCache {
    /// Create an empty cache whose windows live for `ttl`.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current time according to the cache's clock.
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the live window for `address`, creating one if there is none.
    ///
    /// An existing live window is returned unchanged; its timestamp is not
    /// refreshed. A lapsed window that the sweeper has not yet evicted is
    /// replaced.
    pub fn request(&self, address: &str) -> RegistrationWindow {
        let now = self.clock.now_millis();
        let mut inner = self.lock();

        if let Some(existing) = inner.windows.get(address) {
            if !existing.is_expired(self.ttl, now) {
                return existing.clone();
            }
            inner.remove(address, self.ttl);
        }

        let window = RegistrationWindow::new(address, now);
        inner.insert(window.clone(), self.ttl);
        tracing::debug!(address, expires_at = window.expires_at(self.ttl), "opened registration window");
        window
    }

    /// Look up the window for `address`, live or not yet evicted.
    pub fn get(&self, address: &str) -> Option<RegistrationWindow> {
        self.lock().windows.get(address).cloned()
    }

    /// Remove the window for `address`.
    pub fn invalidate(&self, address: &str) -> Option<RegistrationWindow> {
        let removed = self.lock().remove(address, self.ttl);
        if removed.is_some() {
            tracing::debug!(address, "invalidated registration window");
        }
        removed
    }

    /// Record that a signature over the window opened at `request_time_stamp`
    /// was accepted.
    ///
    /// Returns `false`, leaving the cache untouched, if that window is gone,
    /// has lapsed, or was replaced by a newer one.
    pub fn mark_verified(&self, address: &str, request_time_stamp: i64) -> bool {
        let now = self.clock.now_millis();
        let mut inner = self.lock();
        match inner.windows.get_mut(address) {
            Some(window)
                if window.request_time_stamp == request_time_stamp
                    && !window.is_expired(self.ttl, now) =>
            {
                window.signature_verified = true;
                true
            }
            _ => false,
        }
    }

    /// Atomically take the window for `address` for a registration.
    ///
    /// Expired and (when `require_verified`) unverified windows are left in
    /// place and reported as errors.
    pub fn claim(
        &self,
        address: &str,
        require_verified: bool,
    ) -> Result<RegistrationWindow, ClaimError> {
        let now = self.clock.now_millis();
        let mut inner = self.lock();

        let window = inner
            .windows
            .get(address)
            .ok_or_else(|| ClaimError::NotFound(address.to_string()))?;

        if window.is_expired(self.ttl, now) {
            return Err(ClaimError::Expired(address.to_string()));
        }
        if require_verified && !window.signature_verified {
            return Err(ClaimError::Unverified(address.to_string()));
        }

        inner
            .remove(address, self.ttl)
            .ok_or_else(|| ClaimError::NotFound(address.to_string()))
    }

    /// Put back a window taken by [`WindowCache::claim`] if its registration
    /// failed. Does nothing if a newer window already exists.
    pub fn restore(&self, window: RegistrationWindow) {
        let mut inner = self.lock();
        if !inner.windows.contains_key(&window.address) {
            tracing::debug!(address = %window.address, "restored registration window");
            inner.insert(window, self.ttl);
        }
    }

    /// Evict every window whose TTL has elapsed. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_millis();
        let mut inner = self.lock();

        let expired: Vec<String> = inner
            .expiries
            .iter()
            .take_while(|(deadline, _)| *deadline <= now)
            .map(|(_, address)| address.clone())
            .collect();

        for address in &expired {
            inner.remove(address, self.ttl);
            tracing::debug!(address = %address, "registration window expired");
        }

        expired.len()
    }

    /// Number of windows currently held.
    pub fn len(&self) -> usize {
        self.lock().windows.len()
    }

    /// Whether the cache holds no windows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn a task that calls [`WindowCache::sweep`] every `every`.
    ///
    /// The task holds only a weak reference and exits once the cache is
    /// dropped. Must be called from within a Tokio runtime.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> SweeperHandle {
        let cache: Weak<Self> = Arc::downgrade(self);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let evicted = cache.sweep();
                if evicted > 0 {
                    tracing::debug!(evicted, "swept expired registration windows");
                }
            }
        });

        SweeperHandle { handle }
    }
}

/// Owns the background sweeper task; stops it when dropped.
pub struct SweeperHandle {
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper.
    pub fn stop(self) {
        self.handle.abort();
    }

    /// Whether the sweeper task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
