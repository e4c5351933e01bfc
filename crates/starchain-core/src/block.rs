//! Block: one immutable entry in the ledger.
//!
//! A block is created once by the chain engine, sealed with its content hash,
//! and never edited afterwards. Integrity is self-verifying: the hash covers
//! every other field, so any mutation is detectable by recomputation.

use serde::{Deserialize, Serialize};

use crate::canonical::block_hash;

/// Body of the block at height 0.
pub const GENESIS_BODY: &str = "Genesis Block";

/// A single hash-linked ledger record.
///
/// Field names serialize in camelCase (`previousBlockHash`), matching the
/// JSON shape that registry clients read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Hex content hash of all other fields. Empty until sealed.
    pub hash: String,

    /// Position in the chain. Height 0 is the genesis block.
    pub height: u64,

    /// Opaque payload.
    pub body: String,

    /// Seconds since the Unix epoch, assigned at append time.
    pub time: i64,

    /// Hash of the block at `height - 1`. Empty for genesis.
    pub previous_block_hash: String,
}

impl Block {
    /// Create an unsealed block carrying `body`.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            hash: String::new(),
            height: 0,
            body: body.into(),
            time: 0,
            previous_block_hash: String::new(),
        }
    }

    /// Create the sealed genesis block.
    pub fn genesis(time: i64) -> Self {
        let mut block = Self::new(GENESIS_BODY);
        block.time = time;
        block.seal()
    }

    /// Create the sealed successor of `prev`.
    pub fn next(prev: &Block, body: impl Into<String>, time: i64) -> Self {
        let mut block = Self::new(body);
        block.height = prev.height + 1;
        block.previous_block_hash = prev.hash.clone();
        block.time = time;
        block.seal()
    }

    /// Compute the content hash of this block (ignoring the current `hash`).
    pub fn compute_hash(&self) -> String {
        block_hash(self)
    }

    /// Set `hash` to the computed content hash.
    pub fn seal(mut self) -> Self {
        self.hash = self.compute_hash();
        self
    }

    /// Check that the stored hash matches the block's content.
    pub fn verify_hash(&self) -> bool {
        !self.hash.is_empty() && self.hash == self.compute_hash()
    }

    /// Check whether this block sits at the genesis position.
    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    /// Check whether this block links to `prev`.
    pub fn links_to(&self, prev: &Block) -> bool {
        self.height == prev.height + 1 && self.previous_block_hash == prev.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_shape() {
        let genesis = Block::genesis(1_536_000_000);
        assert_eq!(genesis.height, 0);
        assert_eq!(genesis.body, GENESIS_BODY);
        assert_eq!(genesis.previous_block_hash, "");
        assert!(genesis.is_genesis());
        assert!(genesis.verify_hash());
    }

    #[test]
    fn test_next_links_to_prev() {
        let genesis = Block::genesis(100);
        let next = Block::next(&genesis, "payload", 101);

        assert_eq!(next.height, 1);
        assert_eq!(next.previous_block_hash, genesis.hash);
        assert!(next.links_to(&genesis));
        assert!(next.verify_hash());
        assert!(!genesis.links_to(&next));
    }

    #[test]
    fn test_mutation_breaks_hash() {
        let genesis = Block::genesis(100);
        let block = Block::next(&genesis, "payload", 101);

        let mut tampered = block.clone();
        tampered.body.push('!');
        assert!(!tampered.verify_hash());

        let mut tampered = block.clone();
        tampered.time += 1;
        assert!(!tampered.verify_hash());

        let mut tampered = block.clone();
        tampered.height = 7;
        assert!(!tampered.verify_hash());

        let mut tampered = block;
        tampered.previous_block_hash = "00".repeat(32);
        assert!(!tampered.verify_hash());
    }

    #[test]
    fn test_unsealed_block_does_not_verify() {
        assert!(!Block::new("data").verify_hash());
    }

    #[test]
    fn test_json_field_names() {
        let block = Block::genesis(5);
        let json = serde_json::to_value(&block).unwrap();
        assert!(json.get("previousBlockHash").is_some());
        assert_eq!(json["body"], GENESIS_BODY);
    }
}
