//! Concurrent access tests
//!
//! Readers running alongside batch writers must observe each batch either
//! entirely or not at all.

// Allow unwrap() in tests for cleaner test code
#![allow(clippy::disallowed_methods)]

use feed_model::{AssetKey, PostMode, PriceData};
use feed_store::helpers::{create_test_feed, test_address};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

const BATCH: usize = 32;
const ROUNDS: u64 = 200;

fn batch_keys() -> Vec<AssetKey> {
    (0..BATCH)
        .map(|i| AssetKey::from_name(&format!("asset{}", i)).unwrap())
        .collect()
}

#[test]
fn test_readers_never_see_partial_batch() {
    let owner = test_address(1);
    let feed = create_test_feed(owner).unwrap();
    let keys = Arc::new(batch_keys());
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let feed = Arc::clone(&feed);
        let keys = Arc::clone(&keys);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for round in 1..=ROUNDS {
                // every record of round N carries id N
                let records = keys
                    .iter()
                    .map(|k| PriceData::new(*k, round * 10, round, round))
                    .collect();
                let report = feed.post_prices(&owner, records, PostMode::Strict).unwrap();
                assert!(report.all_accepted());
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|n| {
            let feed = Arc::clone(&feed);
            let keys = Arc::clone(&keys);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let reader = test_address(100 + n);
                let mut observed = 0u64;
                while !done.load(Ordering::SeqCst) {
                    let records = feed.get_price_data_bulk(&reader, &keys).unwrap();
                    let first_id = records[0].id;
                    assert!(
                        records.iter().all(|r| r.id == first_id),
                        "partial batch observed"
                    );
                    assert!(first_id >= observed, "ids went backwards");
                    observed = first_id;
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    let last = feed.get_price_data(&owner, &keys[BATCH - 1]).unwrap();
    assert_eq!(last.id, ROUNDS);
    assert_eq!(feed.stats().events_emitted, ROUNDS * BATCH as u64);
}

#[test]
fn test_concurrent_relayers_keep_newest() {
    let owner = test_address(1);
    let feed = create_test_feed(owner).unwrap();
    let relayers: Vec<_> = (10..14).map(test_address).collect();
    feed.add_relayers(&owner, &relayers).unwrap();

    let key = AssetKey::from_name("BTC").unwrap();
    let handles: Vec<_> = relayers
        .iter()
        .enumerate()
        .map(|(n, relayer)| {
            let feed = Arc::clone(&feed);
            let relayer = *relayer;
            thread::spawn(move || {
                // interleaved resolve times: relayer n posts n, n+4, n+8, ...
                for step in 0..50u64 {
                    let resolve_time = step * 4 + n as u64 + 1;
                    feed.post_prices(
                        &relayer,
                        vec![PriceData::new(key, resolve_time, n as u64, resolve_time)],
                        PostMode::Strict,
                    )
                    .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // strict mode leaves the globally newest record in place
    let stored = feed.get_price_data(&owner, &key).unwrap();
    assert_eq!(stored.resolve_time, 200);
    assert_eq!(stored.value, 200);
}
