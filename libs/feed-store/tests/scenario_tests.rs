//! End-to-end scenarios against the PriceFeed facade
//!
//! Covers the ownership handshake, role management, post/query round trips,
//! read gates and strict-mode freshness.

// Allow unwrap() in tests for cleaner test code
#![allow(clippy::disallowed_methods)]

use errors::FeedError;
use feed_model::{AssetKey, FeedEvent, MedianData, PostMode, PriceData, Role};
use feed_store::helpers::{create_test_feed, test_address};
use rand::Rng;

/// `n` records named asset0..asset{n-1} with random values and a shared resolve time
fn generate_prices(n: usize, id: u64, resolve_time: u64) -> Vec<PriceData> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|i| {
            PriceData::new(
                AssetKey::from_name(&format!("asset{}", i)).unwrap(),
                rng.gen_range(0..1_000_000_000),
                id,
                resolve_time,
            )
        })
        .collect()
}

fn generate_medians(n: usize, id: u64, resolve_time: u64) -> Vec<MedianData> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|i| {
            let values = (0..10).map(|_| rng.gen_range(0..1_000_000_000)).collect();
            MedianData::new(
                AssetKey::from_name(&format!("asset{}", i)).unwrap(),
                values,
                id,
                resolve_time,
            )
        })
        .collect()
}

fn keys_of(records: &[PriceData]) -> Vec<AssetKey> {
    records.iter().map(|r| r.asset_name).collect()
}

// ============================================================================
// Ownership & roles
// ============================================================================

#[test]
fn test_admin_ownership_transfer_and_relayer() {
    let deployer = test_address(1);
    let other_admin = test_address(2);
    let relayer = test_address(3);
    let feed = create_test_feed(deployer).unwrap();

    assert_eq!(feed.owner(), deployer);
    assert!(feed.has_role(Role::Relayer, &deployer));
    assert!(feed.has_role(Role::Admin, &deployer));
    assert!(!feed.has_role(Role::Relayer, &other_admin));
    assert!(!feed.has_role(Role::Admin, &relayer));

    feed.transfer_ownership(&deployer, other_admin).unwrap();
    assert_eq!(feed.owner(), deployer);
    assert_eq!(feed.pending_owner(), Some(other_admin));

    let err = feed.claim_ownership(&relayer).unwrap_err();
    assert!(matches!(err, FeedError::Unauthorized(_)));

    feed.claim_ownership(&other_admin).unwrap();
    assert_eq!(feed.owner(), other_admin);
    assert_eq!(feed.pending_owner(), None);

    assert!(!feed.has_role(Role::Relayer, &deployer));
    assert!(!feed.has_role(Role::Admin, &deployer));
    assert!(feed.has_role(Role::Relayer, &other_admin));
    assert!(feed.has_role(Role::Admin, &other_admin));

    // the old owner lost admin along with ownership
    assert!(feed
        .grant_role(&deployer, Role::Relayer, relayer)
        .is_err());
}

#[test]
fn test_non_owner_cannot_transfer() {
    let owner = test_address(1);
    let admin = test_address(2);
    let feed = create_test_feed(owner).unwrap();
    feed.grant_role(&owner, Role::Admin, admin).unwrap();

    let err = feed.transfer_ownership(&admin, admin).unwrap_err();
    assert!(matches!(err, FeedError::Unauthorized(_)));
    assert_eq!(feed.pending_owner(), None);
}

#[test]
fn test_claim_without_transfer() {
    let owner = test_address(1);
    let feed = create_test_feed(owner).unwrap();
    assert!(matches!(
        feed.claim_ownership(&owner),
        Err(FeedError::NoPendingTransfer)
    ));
}

#[test]
fn test_relayer_access_control() {
    let owner = test_address(1);
    let other_admin = test_address(2);
    let relayer = test_address(3);
    let feed = create_test_feed(owner).unwrap();

    assert!(matches!(
        feed.grant_role(&other_admin, Role::Relayer, relayer),
        Err(FeedError::Unauthorized(_))
    ));
    assert!(!feed.is_relayer(&relayer));

    feed.grant_role(&owner, Role::Relayer, relayer).unwrap();
    assert!(feed.is_relayer(&relayer));

    assert!(matches!(
        feed.revoke_role(&other_admin, Role::Relayer, relayer),
        Err(FeedError::Unauthorized(_))
    ));
    assert!(feed.is_relayer(&relayer));

    feed.revoke_role(&owner, Role::Relayer, relayer).unwrap();
    assert!(!feed.is_relayer(&relayer));
}

#[test]
fn test_bulk_relayer_management() {
    let owner = test_address(1);
    let feed = create_test_feed(owner).unwrap();
    let relayers = [test_address(10), test_address(11), test_address(12)];

    feed.add_relayers(&owner, &relayers).unwrap();
    assert!(relayers.iter().all(|r| feed.is_relayer(r)));

    feed.remove_relayers(&owner, &relayers[..2]).unwrap();
    assert!(!feed.is_relayer(&relayers[0]));
    assert!(!feed.is_relayer(&relayers[1]));
    assert!(feed.is_relayer(&relayers[2]));

    // a zero address anywhere rejects the whole call
    let err = feed
        .add_relayers(&owner, &[test_address(20), test_address(0)])
        .unwrap_err();
    assert!(matches!(err, FeedError::InvalidParameter { .. }));
    assert!(!feed.is_relayer(&test_address(20)));
}

// ============================================================================
// Post & query
// ============================================================================

#[test]
fn test_post_price_deviation_and_median_data() {
    let owner = test_address(1);
    let relayer = test_address(3);
    let reader = test_address(9);
    let feed = create_test_feed(owner).unwrap();
    feed.grant_role(&owner, Role::Relayer, relayer).unwrap();

    let prices = generate_prices(10, 1, 1_700_000_000);
    let report = feed
        .post_prices(&relayer, prices.clone(), PostMode::Force)
        .unwrap();
    assert!(report.all_accepted());
    assert_eq!(report.accepted, keys_of(&prices));

    let single = feed.get_price_data(&reader, &prices[0].asset_name).unwrap();
    assert_eq!(single, prices[0]);

    let all = feed.get_price_data_bulk(&reader, &keys_of(&prices)).unwrap();
    assert_eq!(all.len(), prices.len());
    for (got, posted) in all.iter().zip(&prices) {
        assert_eq!(got.value, posted.value);
        assert_eq!(got.id, posted.id);
        assert_eq!(got.resolve_time, posted.resolve_time);
        assert_eq!(got.asset_name, posted.asset_name);
    }

    let deviations = generate_prices(10, 2, 1_700_000_000);
    feed.post_deviations(&relayer, deviations.clone(), PostMode::Force)
        .unwrap();
    let got = feed
        .get_deviation_data_bulk(&reader, &keys_of(&deviations))
        .unwrap();
    assert_eq!(got, deviations);

    let medians = generate_medians(10, 3, 1_700_000_000);
    feed.post_medians(&relayer, medians.clone(), PostMode::Force)
        .unwrap();
    let keys: Vec<AssetKey> = medians.iter().map(|m| m.asset_name).collect();
    assert_eq!(feed.get_median_data_bulk(&reader, &keys).unwrap(), medians);
}

#[test]
fn test_non_relayer_post_leaves_store_unchanged() {
    let owner = test_address(1);
    let stranger = test_address(4);
    let feed = create_test_feed(owner).unwrap();
    let before = feed.snapshot();

    let prices = generate_prices(3, 1, 10);
    assert!(matches!(
        feed.post_prices(&stranger, prices.clone(), PostMode::Force),
        Err(FeedError::Unauthorized(_))
    ));
    assert!(matches!(
        feed.post_deviations(&stranger, prices, PostMode::Strict),
        Err(FeedError::Unauthorized(_))
    ));
    assert!(matches!(
        feed.post_medians(&stranger, generate_medians(2, 1, 10), PostMode::Force),
        Err(FeedError::Unauthorized(_))
    ));

    assert_eq!(feed.snapshot(), before);
}

#[test]
fn test_non_relayer_gets_unauthorized_before_batch_checks() {
    let owner = test_address(1);
    let stranger = test_address(4);
    let feed = create_test_feed(owner).unwrap();
    let before = feed.snapshot();

    // oversized batch
    let prices = generate_prices(300, 1, 10);
    assert!(matches!(
        feed.post_prices(&stranger, prices, PostMode::Force),
        Err(FeedError::Unauthorized(_))
    ));

    // wrong sample count
    let short = vec![MedianData::new(
        AssetKey::from_name("BTC").unwrap(),
        vec![1, 2],
        1,
        10,
    )];
    assert!(matches!(
        feed.post_medians(&stranger, short.clone(), PostMode::Force),
        Err(FeedError::Unauthorized(_))
    ));

    // a non-admin learns nothing from an invalid relayer list either
    assert!(matches!(
        feed.add_relayers(&stranger, &[test_address(0)]),
        Err(FeedError::Unauthorized(_))
    ));

    assert_eq!(feed.snapshot(), before);

    // the same median batch from a relayer hits the length check
    assert!(matches!(
        feed.post_medians(&owner, short, PostMode::Force),
        Err(FeedError::InvalidParameter { .. })
    ));
}

#[test]
fn test_absent_key_reads_zero_record() {
    let feed = create_test_feed(test_address(1)).unwrap();
    let key = AssetKey::from_name("never-posted").unwrap();

    assert_eq!(
        feed.get_price_data(&test_address(5), &key).unwrap(),
        PriceData::default()
    );
    assert_eq!(
        feed.get_median_data(&test_address(5), &key).unwrap(),
        MedianData::default()
    );
}

#[test]
fn test_strict_mode_skips_only_stale_records() {
    let owner = test_address(1);
    let feed = create_test_feed(owner).unwrap();

    let first = generate_prices(3, 1, 100);
    feed.post_prices(&owner, first.clone(), PostMode::Strict)
        .unwrap();

    let mut second = generate_prices(3, 2, 101);
    second[1].resolve_time = 100; // equal is stale
    let report = feed
        .post_prices(&owner, second.clone(), PostMode::Strict)
        .unwrap();

    assert_eq!(report.accepted, vec![second[0].asset_name, second[2].asset_name]);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].asset_name, second[1].asset_name);

    let stored = feed
        .get_price_data_bulk(&owner, &keys_of(&second))
        .unwrap();
    assert_eq!(stored[0], second[0]);
    assert_eq!(stored[1], first[1]);
    assert_eq!(stored[2], second[2]);

    // force mode overwrites regardless of age
    let older = vec![PriceData::new(second[0].asset_name, 1, 9, 1)];
    let report = feed.post_prices(&owner, older.clone(), PostMode::Force).unwrap();
    assert!(report.all_accepted());
    assert_eq!(
        feed.get_price_data(&owner, &second[0].asset_name).unwrap(),
        older[0]
    );
}

#[test]
fn test_feeds_are_independent() {
    let owner = test_address(1);
    let feed = create_test_feed(owner).unwrap();
    let key = AssetKey::from_name("BTC").unwrap();

    feed.post_prices(&owner, vec![PriceData::new(key, 100, 1, 50)], PostMode::Strict)
        .unwrap();
    // a deviation for the same key is not compared against the price
    let report = feed
        .post_deviations(&owner, vec![PriceData::new(key, 5, 1, 10)], PostMode::Strict)
        .unwrap();
    assert!(report.all_accepted());

    assert_eq!(feed.get_price_data(&owner, &key).unwrap().value, 100);
    assert_eq!(feed.get_deviation_data(&owner, &key).unwrap().value, 5);
}

// ============================================================================
// Gates
// ============================================================================

#[test]
fn test_whitelist_gate() {
    let owner = test_address(1);
    let whitelisted = test_address(7);
    let outsider = test_address(8);
    let feed = create_test_feed(owner).unwrap();

    let prices = generate_prices(4, 1, 10);
    feed.post_prices(&owner, prices.clone(), PostMode::Force)
        .unwrap();
    let keys = keys_of(&prices);
    let open = feed.get_price_data_bulk(&outsider, &keys).unwrap();

    feed.set_whitelist_status(&owner, true).unwrap();
    feed.whitelist_address(&owner, whitelisted).unwrap();
    assert!(feed.whitelist_enabled());
    assert!(feed.is_whitelisted(&whitelisted));

    assert!(matches!(
        feed.get_price_data_bulk(&outsider, &keys),
        Err(FeedError::Forbidden(_))
    ));
    assert!(matches!(
        feed.get_deviation_data(&outsider, &keys[0]),
        Err(FeedError::Forbidden(_))
    ));
    assert!(matches!(
        feed.get_reference_data(&outsider, &keys[0], &AssetKey::from_name("USD").unwrap()),
        Err(FeedError::Forbidden(_))
    ));
    assert_eq!(feed.get_price_data_bulk(&whitelisted, &keys).unwrap(), open);

    feed.remove_whitelisted_address(&owner, whitelisted).unwrap();
    assert!(feed.get_price_data_bulk(&whitelisted, &keys).is_err());

    feed.set_whitelist_status(&owner, false).unwrap();
    assert_eq!(feed.get_price_data_bulk(&outsider, &keys).unwrap(), open);
}

#[test]
fn test_median_gate_toggle() {
    let owner = test_address(1);
    let reader = test_address(6);
    let feed = create_test_feed(owner).unwrap();

    let medians = generate_medians(2, 1, 10);
    feed.post_medians(&owner, medians.clone(), PostMode::Force)
        .unwrap();
    let key = medians[0].asset_name;

    feed.set_median_status(&owner, true).unwrap();
    assert!(feed.median_query_disabled());
    assert!(matches!(
        feed.get_median_data(&reader, &key),
        Err(FeedError::Forbidden(_))
    ));
    assert!(feed.get_median_data_bulk(&reader, &[key]).is_err());
    // other feeds stay readable
    assert!(feed.get_price_data(&reader, &key).is_ok());

    feed.set_median_status(&owner, false).unwrap();
    assert_eq!(feed.get_median_data(&reader, &key).unwrap(), medians[0]);
}

#[test]
fn test_gates_are_admin_only() {
    let owner = test_address(1);
    let stranger = test_address(2);
    let feed = create_test_feed(owner).unwrap();

    assert!(matches!(
        feed.set_whitelist_status(&stranger, true),
        Err(FeedError::Unauthorized(_))
    ));
    assert!(matches!(
        feed.set_median_status(&stranger, true),
        Err(FeedError::Unauthorized(_))
    ));
    assert!(matches!(
        feed.whitelist_address(&stranger, stranger),
        Err(FeedError::Unauthorized(_))
    ));
    assert!(!feed.whitelist_enabled());
    assert!(!feed.median_query_disabled());
    assert!(!feed.is_whitelisted(&stranger));
}

// ============================================================================
// Events & bulk consistency
// ============================================================================

#[test]
fn test_bulk_matches_single_reads() {
    let owner = test_address(1);
    let feed = create_test_feed(owner).unwrap();
    let prices = generate_prices(8, 1, 10);
    feed.post_prices(&owner, prices.clone(), PostMode::Force)
        .unwrap();

    let mut keys = keys_of(&prices);
    keys.reverse();
    keys.push(AssetKey::from_name("missing").unwrap());

    let bulk = feed.get_price_data_bulk(&owner, &keys).unwrap();
    assert_eq!(bulk.len(), keys.len());
    for (key, got) in keys.iter().zip(&bulk) {
        assert_eq!(&feed.get_price_data(&owner, key).unwrap(), got);
    }
}

#[tokio::test]
async fn test_accepted_records_are_broadcast() {
    let owner = test_address(1);
    let feed = create_test_feed(owner).unwrap();
    let mut rx = feed.subscribe();

    let mut prices = generate_prices(3, 1, 10);
    feed.post_prices(&owner, prices.clone(), PostMode::Strict)
        .unwrap();
    prices[0].resolve_time = 5;
    feed.post_prices(&owner, prices[..1].to_vec(), PostMode::Strict)
        .unwrap();

    for expected in &prices[..3] {
        let envelope = rx.recv().await.unwrap();
        match envelope.event {
            FeedEvent::PricePosted { record } => assert_eq!(record.asset_name, expected.asset_name),
            other => panic!("unexpected event {:?}", other),
        }
    }
    // the stale record produced no event
    assert!(rx.try_recv().is_err());
}
