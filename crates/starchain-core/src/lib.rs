//! # Starchain Core
//!
//! Pure primitives for Starchain: blocks, content hashing, the durable block
//! codec, and Ed25519 message signatures.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`Block`] - One immutable, hash-linked ledger record
//! - [`Keypair`] - Signs registration challenges; its hex public key is an address
//! - [`Clock`] - Time source for block timestamps and registration windows
//!
//! ## Hashing
//!
//! A block's hash is Blake3 over the deterministic CBOR encoding of the block
//! with its `hash` field cleared. See the [`canonical`] module.

pub mod block;
pub mod canonical;
pub mod clock;
pub mod codec;
pub mod crypto;
pub mod error;

pub use block::{Block, GENESIS_BODY};
pub use canonical::{block_hash, canonical_block_bytes};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{decode_block, encode_block};
pub use crypto::{verify_message, Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::CoreError;
