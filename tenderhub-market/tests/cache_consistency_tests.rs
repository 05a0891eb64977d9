//! Read-through population and invalidate-on-write.

use std::time::Duration;

use tenderhub_core::{Bid, ClientId, ContractorId, NewBid, Tender, TenderStatus};
use tenderhub_storage::{CacheKey, StorageTrait};
use tenderhub_test_utils::assertions::*;
use tenderhub_test_utils::fixtures::*;

#[test]
fn test_get_tenders_populates_cache_with_store_contents() {
    let market = market_with_memory();
    open_tender(&market, 1);
    open_tender(&market, 2);
    let cache = market.context().cache();
    assert_eq!(cache.get::<Vec<Tender>>(&CacheKey::tender_collection()), None);

    let listed = market.tenders().get_tenders().unwrap();

    let cached = cache
        .get::<Vec<Tender>>(&CacheKey::tender_collection())
        .unwrap();
    assert_eq!(cached, listed);
    assert_eq!(cached, market.context().store().tender_list().unwrap());
}

#[test]
fn test_second_read_served_from_cache() {
    let market = market_with_memory();
    open_tender(&market, 1);
    market.tenders().get_tenders().unwrap();
    let hits_before = market.context().cache().stats().hits;

    market.tenders().get_tenders().unwrap();
    assert_eq!(market.context().cache().stats().hits, hits_before + 1);
}

#[test]
fn test_tender_writes_invalidate_collection() {
    let market = market_with_memory();
    let key = CacheKey::tender_collection();
    let cache = market.context().cache();

    let tender = open_tender(&market, 1);
    assert_eq!(market.tenders().get_tenders().unwrap().len(), 1);

    // create
    let second = open_tender(&market, 1);
    assert!(cache.get::<Vec<Tender>>(&key).is_none());
    assert_eq!(market.tenders().get_tenders().unwrap().len(), 2);

    // update
    market
        .tenders()
        .update_tender(tender.tender_id, ClientId::new(1), TenderStatus::Closed)
        .unwrap();
    assert!(cache.get::<Vec<Tender>>(&key).is_none());
    let listed = market.tenders().get_tenders().unwrap();
    assert_eq!(listed[0].status, TenderStatus::Closed);

    // award
    let bid = place_bid(&market, second.tender_id, 2);
    market
        .tenders()
        .award_tender(second.tender_id, ClientId::new(1), bid.bid_id)
        .unwrap();
    assert!(cache.get::<Vec<Tender>>(&key).is_none());
    let listed = market.tenders().get_tenders().unwrap();
    assert_eq!(listed[1].status, TenderStatus::Awarded);

    // delete
    market
        .tenders()
        .delete_tender(tender.tender_id, ClientId::new(1))
        .unwrap();
    assert!(cache.get::<Vec<Tender>>(&key).is_none());
    assert_eq!(market.tenders().get_tenders().unwrap().len(), 1);
}

#[test]
fn test_bid_create_invalidates_bid_collection() {
    let market = market_with_memory();
    let tender = open_tender(&market, 1);
    assert!(market.bids().get_all_bids(tender.tender_id).unwrap().is_empty());

    place_bid(&market, tender.tender_id, 2);
    assert_eq!(market.bids().get_all_bids(tender.tender_id).unwrap().len(), 1);
}

#[test]
fn test_bid_create_clears_leftover_entry_for_its_id() {
    let market = market_with_memory();
    let tender = open_tender(&market, 1);

    let other = market_with_memory();
    let other_tender = open_tender(&other, 1);
    let leftover = other
        .bids()
        .create_bid(
            NewBid {
                price: 111.0,
                comments: "old".to_string(),
                ..sample_new_bid()
            },
            other_tender.tender_id,
            ContractorId::new(9),
        )
        .unwrap();
    assert_eq!(leftover.tender_id, tender.tender_id);
    market.context().cache().set(
        &CacheKey::bid(leftover.bid_id, tender.tender_id),
        &leftover,
        Duration::from_secs(600),
    );

    let bid = place_bid(&market, tender.tender_id, 2);
    assert_eq!(bid.bid_id, leftover.bid_id);
    assert_eq!(
        market.bids().get_bid_by_id(bid.bid_id, tender.tender_id).unwrap(),
        bid
    );
}

#[test]
fn test_bid_delete_invalidates_single_and_collection() {
    let market = market_with_memory();
    let tender = open_tender(&market, 1);
    let bid = place_bid(&market, tender.tender_id, 2);
    let cache = market.context().cache();

    // warm both views
    market
        .bids()
        .get_bid_by_id(bid.bid_id, tender.tender_id)
        .unwrap();
    market.bids().get_all_bids(tender.tender_id).unwrap();
    assert!(cache
        .get::<Bid>(&CacheKey::bid(bid.bid_id, tender.tender_id))
        .is_some());

    market
        .bids()
        .delete_bid(bid.bid_id, ContractorId::new(2))
        .unwrap();

    let result = market.bids().get_bid_by_id(bid.bid_id, tender.tender_id);
    assert_not_found(&result);
    assert!(market.bids().get_all_bids(tender.tender_id).unwrap().is_empty());
}

#[test]
fn test_tender_delete_invalidates_bid_views() {
    let market = market_with_memory();
    let tender = open_tender(&market, 1);
    let bid = place_bid(&market, tender.tender_id, 2);
    let cache = market.context().cache();

    market
        .bids()
        .get_bid_by_id(bid.bid_id, tender.tender_id)
        .unwrap();
    market.bids().get_all_bids(tender.tender_id).unwrap();

    market
        .tenders()
        .delete_tender(tender.tender_id, ClientId::new(1))
        .unwrap();

    assert!(cache
        .get::<Vec<Bid>>(&CacheKey::bid_collection(tender.tender_id))
        .is_none());
    assert!(cache
        .get::<Bid>(&CacheKey::bid(bid.bid_id, tender.tender_id))
        .is_none());
    assert_not_found(&market.bids().get_bid_by_id(bid.bid_id, tender.tender_id));
}

#[test]
fn test_not_found_is_not_cached() {
    let market = market_with_memory();
    let tender = open_tender(&market, 1);
    let result = market
        .bids()
        .get_bid_by_id(tenderhub_core::BidId::new(5), tender.tender_id);
    assert_not_found(&result);
    assert_eq!(market.context().cache().stats().entry_count, 0);
}

#[test]
fn test_corrupt_cache_entry_treated_as_miss() {
    let market = market_with_memory();
    open_tender(&market, 1);
    let key = CacheKey::tender_collection();
    market
        .context()
        .cache()
        .backend()
        .set(&key, b"not json at all", Duration::from_secs(600))
        .unwrap();

    let listed = market.tenders().get_tenders().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(
        market.context().cache().get::<Vec<Tender>>(&key),
        Some(listed)
    );
}

#[test]
fn test_cache_offline_never_fails_operations() {
    let flaky = flaky_market();
    flaky.cache.set_offline(true);
    let market = &flaky.market;

    let tender = open_tender(market, 1);
    let bid = place_bid(market, tender.tender_id, 2);
    assert_eq!(market.tenders().get_tenders().unwrap().len(), 1);
    assert_eq!(
        market
            .bids()
            .get_bid_by_id(bid.bid_id, tender.tender_id)
            .unwrap(),
        bid
    );
    assert_eq!(market.bids().get_all_bids(tender.tender_id).unwrap().len(), 1);
    market
        .tenders()
        .award_tender(tender.tender_id, ClientId::new(1), bid.bid_id)
        .unwrap();
    market
        .tenders()
        .delete_tender(tender.tender_id, ClientId::new(1))
        .unwrap();
}

#[test]
fn test_lost_invalidation_leaves_stale_entry_until_ttl() {
    let flaky = flaky_market();
    let market = &flaky.market;
    open_tender(market, 1);
    assert_eq!(market.tenders().get_tenders().unwrap().len(), 1);

    flaky.cache.set_offline(true);
    open_tender(market, 1);
    flaky.cache.set_offline(false);

    // The invalidation was dropped, so the old list is still served.
    assert_eq!(market.tenders().get_tenders().unwrap().len(), 1);
    assert_eq!(flaky.storage.inner().tender_count().unwrap(), 2);
}

#[test]
fn test_store_faults_propagate() {
    let flaky = flaky_market();
    let tender = open_tender(&flaky.market, 1);
    flaky.storage.set_offline(true);

    assert_internal(&flaky.market.tenders().get_tender_by_id(tender.tender_id));
    assert_internal(&flaky.market.tenders().is_tender_exists(tender.tender_id));
    assert_internal(&flaky.market.bids().get_all_bids(tender.tender_id));
    assert_internal(
        &flaky
            .market
            .tenders()
            .create_tender(sample_new_tender(), ClientId::new(1)),
    );
}

#[test]
fn test_failed_write_does_not_touch_cache() {
    let flaky = flaky_market();
    open_tender(&flaky.market, 1);
    flaky.market.tenders().get_tenders().unwrap();
    let key = CacheKey::tender_collection();

    flaky.storage.set_offline(true);
    let result = flaky
        .market
        .tenders()
        .create_tender(sample_new_tender(), ClientId::new(1));
    assert_internal(&result);
    flaky.storage.set_offline(false);

    assert!(flaky
        .market
        .context()
        .cache()
        .get::<Vec<Tender>>(&key)
        .is_some());
}
