//! Star records: the JSON bodies the registry writes to the ledger.
//!
//! A registered star is stored as
//! `{"address": ..., "star": {"ra", "dec", "story", "magnitude"?, "constellation"?}}`
//! with the story hex-encoded. The chain itself treats this as an opaque
//! string.

use serde::{Deserialize, Serialize};

use starchain_core::Block;

use crate::error::{RegistryError, Result};

/// A star as submitted for registration. `story` is plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSubmission {
    pub ra: String,
    pub dec: String,
    pub story: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constellation: Option<String>,
}

impl StarSubmission {
    pub fn new(ra: impl Into<String>, dec: impl Into<String>, story: impl Into<String>) -> Self {
        Self {
            ra: ra.into(),
            dec: dec.into(),
            story: story.into(),
            magnitude: None,
            constellation: None,
        }
    }

    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = Some(magnitude);
        self
    }

    pub fn with_constellation(mut self, constellation: impl Into<String>) -> Self {
        self.constellation = Some(constellation.into());
        self
    }

    /// Reject submissions missing their coordinates.
    pub fn check(&self) -> Result<()> {
        if self.ra.trim().is_empty() {
            return Err(RegistryError::InvalidSubmission("ra is required".into()));
        }
        if self.dec.trim().is_empty() {
            return Err(RegistryError::InvalidSubmission("dec is required".into()));
        }
        if let Some(magnitude) = self.magnitude {
            if !magnitude.is_finite() {
                return Err(RegistryError::InvalidSubmission(
                    "magnitude must be a finite number".into(),
                ));
            }
        }
        Ok(())
    }
}

/// The star as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarEntry {
    pub ra: String,
    pub dec: String,
    /// Hex-encoded story text.
    pub story: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constellation: Option<String>,
    /// Plain-text story, filled in when reading a record back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_decoded: Option<String>,
}

impl StarEntry {
    /// The story as text, if `story` is valid hex.
    pub fn decode_story(&self) -> Option<String> {
        hex::decode(&self.story)
            .ok()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// A ledger block body describing one registered star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarBody {
    pub address: String,
    pub star: StarEntry,
}

impl StarBody {
    /// Build the stored body for `submission` owned by `address`.
    pub fn new(address: impl Into<String>, submission: &StarSubmission) -> Self {
        Self {
            address: address.into(),
            star: StarEntry {
                ra: submission.ra.clone(),
                dec: submission.dec.clone(),
                story: hex::encode(submission.story.as_bytes()),
                magnitude: submission.magnitude,
                constellation: submission.constellation.clone(),
                story_decoded: None,
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a block body. Fails for bodies that are not star records,
    /// including the genesis body.
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn from_block(block: &Block) -> Result<Self> {
        Self::from_json(&block.body)
    }
}

/// A star block with its body decoded for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarRecord {
    pub hash: String,
    pub height: u64,
    pub body: StarBody,
    pub time: i64,
    pub previous_block_hash: String,
}

impl StarRecord {
    /// Decode `block`, including the hex story back to text.
    pub fn from_block(block: &Block) -> Result<Self> {
        let mut body = StarBody::from_block(block)?;
        body.star.story_decoded = body.star.decode_story();
        Ok(Self {
            hash: block.hash.clone(),
            height: block.height,
            body,
            time: block.time,
            previous_block_hash: block.previous_block_hash.clone(),
        })
    }
}
