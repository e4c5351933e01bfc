//! Block and chain validation results.
//!
//! Integrity problems are reported as data, never as errors: a chain scan
//! keeps going past a bad block and collects every defect it finds.

use std::collections::BTreeSet;
use std::fmt;

use starchain_core::Block;

/// Check that a block's stored hash matches its content.
///
/// Pure: recomputes the hash over a copy with the hash cleared.
pub fn validate_block(block: &Block) -> bool {
    let valid = block.verify_hash();
    if !valid {
        tracing::debug!(
            height = block.height,
            stored = %block.hash,
            computed = %block.compute_hash(),
            "block hash mismatch"
        );
    }
    valid
}

/// One integrity problem found by a chain scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainDefect {
    /// The block's hash does not match its content.
    InvalidHash { height: u64 },

    /// The block's `previous_block_hash` does not match its predecessor.
    BrokenLink { height: u64 },

    /// The height counter covers this height but no block is stored.
    Missing { height: u64 },

    /// The stored bytes could not be decoded.
    Corrupt { height: u64, reason: String },

    /// A block is stored above the chain height.
    BeyondTip { height: u64, tip: i64 },
}

impl ChainDefect {
    /// The height this defect refers to.
    pub fn height(&self) -> u64 {
        match self {
            ChainDefect::InvalidHash { height }
            | ChainDefect::BrokenLink { height }
            | ChainDefect::Missing { height }
            | ChainDefect::Corrupt { height, .. }
            | ChainDefect::BeyondTip { height, .. } => *height,
        }
    }
}

impl fmt::Display for ChainDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainDefect::InvalidHash { height } => write!(f, "Block {} is invalid", height),
            ChainDefect::BrokenLink { height } => {
                write!(f, "Block {} - previous hash is invalid.", height)
            }
            ChainDefect::Missing { height } => write!(f, "Block {} is missing", height),
            ChainDefect::Corrupt { height, reason } => {
                write!(f, "Block {} could not be decoded: {}", height, reason)
            }
            ChainDefect::BeyondTip { height, tip } => {
                write!(f, "Block {} is above chain height {}", height, tip)
            }
        }
    }
}

/// Outcome of a full chain scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainReport {
    /// Number of stored blocks examined.
    pub checked: u64,
    /// Defects in scan order (ascending height).
    pub defects: Vec<ChainDefect>,
}

impl ChainReport {
    /// Whether the scan found no defects.
    pub fn is_valid(&self) -> bool {
        self.defects.is_empty()
    }

    /// Defect messages in scan order, without duplicates.
    pub fn errors(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.defects
            .iter()
            .map(ToString::to_string)
            .filter(|msg| seen.insert(msg.clone()))
            .collect()
    }

    /// Heights with at least one defect.
    pub fn defective_heights(&self) -> BTreeSet<u64> {
        self.defects.iter().map(ChainDefect::height).collect()
    }

    pub(crate) fn record(&mut self, defect: ChainDefect) {
        if !self.defects.contains(&defect) {
            tracing::warn!(%defect, "chain defect");
            self.defects.push(defect);
        }
    }
}
