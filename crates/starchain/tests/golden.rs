//! Golden block hashes, checked through a live chain.
//!
//! A chain driven by a manual clock must reproduce the pinned vectors
//! exactly: the hash function and encoding are part of the on-disk format.

use std::sync::Arc;
use std::time::Duration;

use starchain::store::MemoryStore;
use starchain::{Chain, ManualClock};
use starchain_testkit::vectors::{all_vectors, block_from_vector, verify_all_vectors};

#[test]
fn vectors_match_pinned_values() {
    for (name, matches, hash) in verify_all_vectors() {
        assert!(matches, "vector '{}' hashed to {}", name, hash);
    }
}

#[tokio::test]
async fn chain_reproduces_linked_vectors() -> anyhow::Result<()> {
    let vectors = all_vectors();
    let clock = Arc::new(ManualClock::new(vectors[0].time * 1000));
    let chain = Chain::with_clock(MemoryStore::new(), clock.clone());

    let genesis = chain.init().await?;
    assert_eq!(genesis, block_from_vector(&vectors[0]));

    clock.advance(Duration::from_secs(60));
    let second = chain.append(vectors[1].body).await?;
    assert_eq!(second, block_from_vector(&vectors[1]));

    clock.advance(Duration::from_secs(60));
    let third = chain.append(vectors[2].body).await?;
    assert_eq!(third.hash, vectors[2].expected_hash);

    assert!(chain.validate_chain().await?.is_valid());
    Ok(())
}

#[test]
fn star_vector_body_is_a_star_record() {
    let vector = &all_vectors()[2];
    let record = starchain::StarRecord::from_block(&block_from_vector(vector)).unwrap();
    assert_eq!(record.body.address, "addr1");
    assert_eq!(record.body.star.story_decoded.as_deref(), Some("the dog star"));
}
