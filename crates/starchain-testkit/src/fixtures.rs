//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a deterministic identity, a
//! hand-driven clock, and in-memory chains and registries wired to both.

use std::sync::Arc;

use starchain_core::{Keypair, ManualClock};
use starchain_ledger::Chain;
use starchain_registry::{Ed25519Verifier, Registry, RegistryConfig};
use starchain_store::MemoryStore;

/// Clock start for fixtures: 2018-06-26T08:00:00Z in milliseconds.
pub const FIXTURE_EPOCH_MILLIS: i64 = 1_530_000_000_000;

/// A test fixture with a keypair and a manual clock.
pub struct TestFixture {
    pub keypair: Keypair,
    pub clock: Arc<ManualClock>,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
            clock: Arc::new(ManualClock::new(FIXTURE_EPOCH_MILLIS)),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            clock: Arc::new(ManualClock::new(FIXTURE_EPOCH_MILLIS)),
        }
    }

    /// The registry address of this fixture's keypair.
    pub fn address(&self) -> String {
        self.keypair.address()
    }

    /// Sign `message` as this fixture's address.
    pub fn sign(&self, message: &str) -> String {
        self.keypair.sign_message(message)
    }

    /// An empty in-memory chain on the fixture clock.
    pub fn chain(&self) -> Arc<Chain<MemoryStore>> {
        Arc::new(Chain::with_clock(MemoryStore::new(), self.clock.clone()))
    }

    /// A registry over a fresh in-memory chain, verifying Ed25519 signatures.
    pub fn registry(&self, config: RegistryConfig) -> Registry<MemoryStore> {
        Registry::new(self.chain(), Arc::new(Ed25519Verifier), config)
    }

    /// Request a window for this fixture's address and sign its message.
    ///
    /// Returns the address, ready to register.
    pub fn validate(&self, registry: &Registry<MemoryStore>) -> String {
        let address = self.address();
        let window = registry.request_validation(&address);
        let signature = self.sign(&window.message);
        let outcome = registry
            .validate(&address, &signature)
            .unwrap_or_else(|err| panic!("fixture validation failed: {}", err));
        assert!(outcome.register_star, "fixture signature rejected");
        address
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures sharing one clock, for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    let clock = Arc::new(ManualClock::new(FIXTURE_EPOCH_MILLIS));
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&(i as u64).to_le_bytes());
            TestFixture {
                keypair: Keypair::from_seed(&seed),
                clock: clock.clone(),
            }
        })
        .collect()
}
