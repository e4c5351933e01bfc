//! Canonical CBOR encoding of blocks for content hashing.
//!
//! The hash input follows RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//!
//! The `hash` field is always encoded as the empty string, so a block's
//! content hash equals the hash of the same block with its hash cleared.

use ciborium::value::Value;

use crate::block::Block;

/// Block field keys (integer keys for compact encoding).
mod keys {
    pub const HASH: u64 = 0;
    pub const HEIGHT: u64 = 1;
    pub const BODY: u64 = 2;
    pub const TIME: u64 = 3;
    pub const PREVIOUS_BLOCK_HASH: u64 = 4;
}

/// Domain prefix mixed into every block hash.
pub const HASH_DOMAIN: &[u8] = b"starchain-block-v1:";

/// Encode a block, with its hash cleared, to canonical CBOR bytes.
pub fn canonical_block_bytes(block: &Block) -> Vec<u8> {
    let value = block_to_cbor_value(block);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value);
    buf
}

/// Compute the hex content hash of a block.
pub fn block_hash(block: &Block) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(HASH_DOMAIN);
    hasher.update(&canonical_block_bytes(block));
    hasher.finalize().to_hex().to_string()
}

fn block_to_cbor_value(block: &Block) -> Value {
    Value::Map(vec![
        (
            Value::Integer(keys::HASH.into()),
            Value::Text(String::new()),
        ),
        (
            Value::Integer(keys::HEIGHT.into()),
            Value::Integer(block.height.into()),
        ),
        (
            Value::Integer(keys::BODY.into()),
            Value::Text(block.body.clone()),
        ),
        (
            Value::Integer(keys::TIME.into()),
            Value::Integer(block.time.into()),
        ),
        (
            Value::Integer(keys::PREVIOUS_BLOCK_HASH.into()),
            Value::Text(block.previous_block_hash.clone()),
        ),
    ])
}

/// Recursively encode a CBOR value.
///
/// Only the value types produced by [`block_to_cbor_value`] are supported.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Text(s) => encode_text(buf, s),
        Value::Map(entries) => encode_map_canonical(buf, entries),
        other => unreachable!("unsupported CBOR value in block encoding: {:?}", other),
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode a map canonically (major type 5).
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}
