//! Promotion store tests: idempotence, iteration filters, reset.

use espresso_core::traits::PromotionStore;
use espresso_core::types::{ArgumentTuple, IterationFilter, Pattern, PromotionRecord, Role};
use espresso_storage::StorageEngine;
use proptest::prelude::*;

fn engine() -> StorageEngine {
    StorageEngine::open_in_memory("reverb").unwrap()
}

fn instance(rel: &str, a: &str, b: &str, it: u32, score: f64) -> PromotionRecord {
    PromotionRecord::new(rel, ArgumentTuple::from([a, b]), it, score)
}

fn pattern(rel: &str, p: &str, it: u32, score: f64) -> PromotionRecord {
    PromotionRecord::new(rel, Pattern::from(p), it, score)
}

// ---- Idempotent promotion ----

#[test]
fn test_same_record_twice_stores_one() {
    let store = engine();
    let rec = instance("acq", "Google", "YouTube", 1, 0.4);
    assert_eq!(store.insert(&[rec.clone()]).unwrap(), 1);
    assert_eq!(store.insert(&[rec]).unwrap(), 0);
    assert_eq!(store.records("acq", Role::Instance).unwrap().len(), 1);
}

#[test]
fn test_reinsert_never_updates_existing_value() {
    let store = engine();
    store.insert(&[pattern("acq", "ARG1 bought ARG2", 1, 0.2)]).unwrap();
    let inserted = store
        .insert(&[pattern("acq", "ARG1 bought ARG2", 3, 0.9)])
        .unwrap();
    assert_eq!(inserted, 0);

    let records = store.records("acq", Role::Pattern).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].iteration, 1);
    assert_eq!(records[0].score, 0.2);
}

#[test]
fn test_relations_are_partitioned() {
    let store = engine();
    store
        .insert(&[
            instance("acq", "Google", "YouTube", 0, 1.0),
            instance("born", "Google", "YouTube", 0, 1.0),
        ])
        .unwrap();
    assert_eq!(store.instances("acq", IterationFilter::AtMost(0)).unwrap().len(), 1);
    assert_eq!(store.instances("born", IterationFilter::AtMost(0)).unwrap().len(), 1);
    assert_eq!(store.relations().unwrap(), vec!["acq", "born"]);
}

// ---- Iteration filters ----

#[test]
fn test_iteration_filters_and_ordering() {
    let store = engine();
    store
        .insert(&[
            instance("acq", "Google", "YouTube", 0, 1.0),
            instance("acq", "Microsoft", "Skype", 1, 0.3),
            instance("acq", "Facebook", "Instagram", 1, 0.7),
            instance("acq", "Amazon", "Twitch", 2, 0.5),
        ])
        .unwrap();

    let exactly = store.instances("acq", IterationFilter::Exactly(1)).unwrap();
    assert_eq!(exactly.len(), 2);
    // Score descending within an iteration.
    assert_eq!(exactly[0].value, ArgumentTuple::from(["Facebook", "Instagram"]));

    assert_eq!(store.instances("acq", IterationFilter::AtMost(1)).unwrap().len(), 3);
    assert_eq!(store.instances("acq", IterationFilter::Before(1)).unwrap().len(), 1);
    assert!(store.has_iteration("acq", Role::Instance, 2).unwrap());
    assert!(!store.has_iteration("acq", Role::Pattern, 0).unwrap());
}

// ---- Reset ----

#[test]
fn test_reset_clears_only_target_relation() {
    let store = engine();
    store
        .insert(&[
            instance("acq", "Google", "YouTube", 0, 1.0),
            pattern("acq", "ARG1 acquired ARG2", 1, 0.5),
            instance("born", "Alice", "Paris", 0, 1.0),
        ])
        .unwrap();
    assert_eq!(store.reset("acq").unwrap(), 2);
    assert!(store.records("acq", Role::Instance).unwrap().is_empty());
    assert!(store.records("acq", Role::Pattern).unwrap().is_empty());
    assert_eq!(store.records("born", Role::Instance).unwrap().len(), 1);
    store.ensure_indexes("acq", Role::Instance).unwrap();
}

proptest! {
    #[test]
    fn prop_repeated_inserts_store_each_value_once(
        values in proptest::collection::vec(("[a-c]", "[x-z]", 0u32..4), 1..30)
    ) {
        let store = engine();
        let records: Vec<PromotionRecord> = values
            .iter()
            .map(|(a, b, it)| instance("r", a, b, *it, 0.5))
            .collect();
        store.insert(&records).unwrap();
        store.insert(&records).unwrap();

        let mut distinct: Vec<(String, String)> =
            values.iter().map(|(a, b, _)| (a.clone(), b.clone())).collect();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(store.records("r", Role::Instance).unwrap().len(), distinct.len());
    }
}
