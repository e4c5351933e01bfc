//! Golden test vectors for the block hash.
//!
//! These pin the canonical encoding and the content hash. Any change to
//! either breaks every stored chain, so these values must never be updated
//! casually.

use starchain_core::{canonical_block_bytes, Block};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub height: u64,
    pub body: &'static str,
    pub time: i64,
    pub previous_block_hash: &'static str,
    /// Expected canonical CBOR bytes (hex).
    pub expected_bytes: &'static str,
    /// Expected block hash (hex).
    pub expected_hash: &'static str,
}

const GENESIS_HASH: &str = "6896af9f24604a634ecf0f1c4fa505511505ba6707fb4da840cf1f0a03652d4d";
const SECOND_HASH: &str = "bddae745c2869bb2cabf740faeb84e5365e6c7d5d9bb651d0c35615194d4f152";

/// Get all golden test vectors.
///
/// The first three form a linked chain: genesis, a plain block, and a star
/// record.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "genesis",
            height: 0,
            body: "Genesis Block",
            time: 1_530_000_000,
            previous_block_hash: "",
            expected_bytes: "a500600100026d47656e6573697320426c6f636b031a5b31f2800460",
            expected_hash: GENESIS_HASH,
        },
        GoldenVector {
            name: "plain body linked to genesis",
            height: 1,
            body: "hello",
            time: 1_530_000_060,
            previous_block_hash: GENESIS_HASH,
            expected_bytes: "a500600101026568656c6c6f031a5b31f2bc047840\
                36383936616639663234363034613633346563663066316334666135303535\
                313135303562613637303766623464613834306366316630613033363532643464",
            expected_hash: SECOND_HASH,
        },
        GoldenVector {
            name: "star record",
            height: 2,
            body: r#"{"address":"addr1","star":{"ra":"16h 29m 1.0s","dec":"-26° 29' 24.9","story":"74686520646f672073746172"}}"#,
            time: 1_530_000_120,
            previous_block_hash: SECOND_HASH,
            expected_bytes: "",
            expected_hash: "50efdf1ea477ce6bb58761a6fdb6fbe0476fd33a669cabf3dfd633bdb1145b39",
        },
        GoldenVector {
            name: "all fields empty",
            height: 0,
            body: "",
            time: 0,
            previous_block_hash: "",
            expected_bytes: "a500600100026003000460",
            expected_hash: "ef34c6afcf7cc31e85212c5359e1f91ec035735940df37c65793ff2e496f23a7",
        },
        GoldenVector {
            name: "negative time",
            height: 7,
            body: "neg",
            time: -1,
            previous_block_hash: "x",
            expected_bytes: "a50060010702636e65670320046178",
            expected_hash: "1525b9e5934e85cdfccf50cd01bc686f2c968ef4d9e3832b68afe7f86160717a",
        },
        GoldenVector {
            name: "height needs eight bytes",
            height: 4_294_967_296,
            body: "big",
            time: 1_700_000_000,
            previous_block_hash: "",
            expected_bytes: "a50060011b00000001000000000263626967031a6553f1000460",
            expected_hash: "7e4cd297faf7b12842d3e1a1d092ef63523940353452ac6400f8ea55c32296bc",
        },
    ]
}

/// Build the sealed block a vector describes.
pub fn block_from_vector(vector: &GoldenVector) -> Block {
    Block {
        hash: String::new(),
        height: vector.height,
        body: vector.body.to_string(),
        time: vector.time,
        previous_block_hash: vector.previous_block_hash.to_string(),
    }
    .seal()
}

/// Check every vector. Returns `(name, matches, computed_hash)` per vector.
///
/// Vectors with no expected bytes are checked on the hash alone.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let block = block_from_vector(v);
            let bytes = hex::encode(canonical_block_bytes(&block));
            let bytes_match = v.expected_bytes.is_empty() || bytes == v.expected_bytes;
            let matches = bytes_match && block.hash == v.expected_hash;
            (v.name.to_string(), matches, block.hash)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, hash) in verify_all_vectors() {
            assert!(matches, "vector '{}' produced {}", name, hash);
        }
    }

    #[test]
    fn test_linked_vectors_form_a_chain() {
        let blocks: Vec<Block> = all_vectors().iter().take(3).map(block_from_vector).collect();
        assert!(blocks[0].is_genesis());
        assert!(blocks[1].links_to(&blocks[0]));
        assert!(blocks[2].links_to(&blocks[1]));
    }

    #[test]
    fn test_genesis_vector_matches_constructor() {
        let vector = &all_vectors()[0];
        assert_eq!(Block::genesis(vector.time), block_from_vector(vector));
    }
}
