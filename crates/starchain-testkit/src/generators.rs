//! Proptest generators for property-based testing.

use proptest::prelude::*;

use starchain_core::{Block, Keypair};
use starchain_registry::StarSubmission;

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a registry address (a hex Ed25519 public key).
pub fn address() -> impl Strategy<Value = String> {
    keypair().prop_map(|kp| kp.address())
}

/// Generate a block body of at most `max_len` characters.
pub fn body(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..=max_len).prop_map(|chars| chars.into_iter().collect())
}

/// Generate a block timestamp in seconds.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800
}

/// Generate a hex hash-shaped string.
pub fn hash_hex() -> impl Strategy<Value = String> {
    any::<[u8; 32]>().prop_map(hex::encode)
}

/// Generate a star submission with optional fields sometimes present.
pub fn star_submission() -> impl Strategy<Value = StarSubmission> {
    (
        "[0-9]{1,2}h [0-9]{1,2}m [0-9]{1,2}\\.[0-9]s",
        "-?[0-9]{1,2}° [0-9]{1,2}' [0-9]{1,2}\\.[0-9]",
        body(64),
        proptest::option::of(-2.0f64..20.0),
        proptest::option::of("[A-Z][a-z]{2,12}"),
    )
        .prop_map(|(ra, dec, story, magnitude, constellation)| StarSubmission {
            ra,
            dec,
            story,
            magnitude,
            constellation,
        })
}

/// Parameters for generating a block.
#[derive(Debug, Clone)]
pub struct BlockParams {
    pub height: u64,
    pub body: String,
    pub time: i64,
    pub previous_block_hash: String,
}

impl Arbitrary for BlockParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<u64>(),
            body(256),
            any::<i64>(),
            prop_oneof![Just(String::new()), hash_hex()],
        )
            .prop_map(|(height, body, time, previous_block_hash)| BlockParams {
                height,
                body,
                time,
                previous_block_hash,
            })
            .boxed()
    }
}

/// Build the sealed block described by `params`.
pub fn block_from_params(params: &BlockParams) -> Block {
    Block {
        hash: String::new(),
        height: params.height,
        body: params.body.clone(),
        time: params.time,
        previous_block_hash: params.previous_block_hash.clone(),
    }
    .seal()
}

/// Build a linked chain of sealed blocks: genesis followed by `bodies`.
pub fn chain_from_bodies(bodies: &[String], start_time: i64) -> Vec<Block> {
    let mut blocks = vec![Block::genesis(start_time)];
    for (i, body) in bodies.iter().enumerate() {
        let prev = &blocks[i];
        let next = Block::next(prev, body.clone(), start_time + i as i64 + 1);
        blocks.push(next);
    }
    blocks
}
