//! Durable block encoding.
//!
//! Blocks are persisted as CBOR maps keyed by field name. Unlike the hash
//! input in [`crate::canonical`], this encoding carries the `hash` field and
//! is only required to round-trip, not to be canonical.

use crate::block::Block;
use crate::error::CoreError;

/// Encode a block for storage.
pub fn encode_block(block: &Block) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    ciborium::into_writer(block, &mut buf).map_err(|e| CoreError::EncodingError(e.to_string()))?;
    Ok(buf)
}

/// Decode a block previously produced by [`encode_block`].
pub fn decode_block(bytes: &[u8]) -> Result<Block, CoreError> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_block_keeps_hash() {
        let genesis = Block::genesis(42);
        let bytes = encode_block(&genesis).unwrap();
        let decoded = decode_block(&bytes).unwrap();
        assert_eq!(decoded, genesis);
        assert!(decoded.verify_hash());
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_block(&[0xff, 0x00, 0x13]).unwrap_err();
        assert!(matches!(err, CoreError::DecodingError(_)));
    }
}
