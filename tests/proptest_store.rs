//! Property-based tests for the record store and score aggregation.

use proptest::prelude::*;
use sbom_compliance::compliance::standards::NtiaKey;
use sbom_compliance::compliance::{score_of, CheckKey, Record, RecordStore, ScoreTally};
use std::collections::HashSet;

fn key() -> impl Strategy<Value = NtiaKey> {
    (0..NtiaKey::all().len()).prop_map(|i| NtiaKey::all()[i])
}

fn record() -> impl Strategy<Value = Record<NtiaKey>> {
    (
        key(),
        "(doc|a|b|c|d|e)",
        "[a-z]{0,6}",
        prop_oneof![Just(0.0), Just(10.0), 0.0..=10.0f64],
        any::<bool>(),
    )
        .prop_map(|(k, id, value, score, required)| Record::new(k, id, value, score, required))
}

fn store_of(records: &[Record<NtiaKey>]) -> RecordStore<NtiaKey> {
    records.iter().cloned().collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn every_record_is_reachable_from_each_index(records in prop::collection::vec(record(), 0..60)) {
        let store = store_of(&records);
        prop_assert_eq!(store.len(), records.len());

        for r in &records {
            prop_assert!(store.by_check_key(r.check_key()).contains(&r));
            prop_assert!(store.by_id(r.id()).contains(&r));
            prop_assert!(store.by_check_key_and_id(r.check_key(), r.id()).contains(&r));
        }

        let per_key: usize = NtiaKey::all().iter().map(|k| store.by_check_key(*k).len()).sum();
        prop_assert_eq!(per_key, records.len());
    }

    #[test]
    fn all_ids_are_distinct_and_complete(records in prop::collection::vec(record(), 0..60)) {
        let store = store_of(&records);
        let ids = store.all_ids();

        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len());

        let expected: HashSet<&str> = records.iter().map(Record::id).collect();
        prop_assert_eq!(unique, expected);
    }

    #[test]
    fn empty_lookups_score_zero(records in prop::collection::vec(record(), 0..20)) {
        let store = store_of(&records);
        prop_assert_eq!(store.score_of_element("not-an-element"), 0.0);
        prop_assert_eq!(store.score_of_attribute(NtiaKey::CompName, "not-an-element"), 0.0);
    }

    #[test]
    fn score_matches_bucket_means(records in prop::collection::vec(record(), 1..40)) {
        let required: Vec<f64> = records.iter().filter(|r| r.required()).map(Record::score).collect();
        let optional: Vec<f64> = records.iter().filter(|r| !r.required()).map(Record::score).collect();

        let expected = match (required.is_empty(), optional.is_empty()) {
            (false, false) => (mean(&required) + mean(&optional)) / 2.0,
            (false, true) => mean(&required),
            (true, false) => mean(&optional),
            (true, true) => 0.0,
        };
        prop_assert!((score_of(&records) - expected).abs() < 1e-9);
    }

    #[test]
    fn scores_stay_within_record_bounds(records in prop::collection::vec(record(), 1..40)) {
        let lo = records.iter().map(Record::score).fold(f64::INFINITY, f64::min);
        let hi = records.iter().map(Record::score).fold(f64::NEG_INFINITY, f64::max);
        let total = score_of(&records);
        prop_assert!(total >= lo - 1e-9 && total <= hi + 1e-9);
    }

    #[test]
    fn document_score_pools_every_record(records in prop::collection::vec(record(), 0..60)) {
        let store = store_of(&records);
        let pooled = ScoreTally::from_records(&records);
        let document = store.score_of_document();

        prop_assert!((document.total - pooled.total()).abs() < 1e-9);
        prop_assert!((document.required - pooled.required_avg()).abs() < 1e-9);
        prop_assert!((document.optional - pooled.optional_avg()).abs() < 1e-9);
    }

    #[test]
    fn insertion_order_does_not_change_scores(records in prop::collection::vec(record(), 0..40)) {
        let forward = store_of(&records);
        let mut reversed_records = records.clone();
        reversed_records.reverse();
        let reversed = store_of(&reversed_records);

        for id in forward.all_ids() {
            prop_assert!((forward.score_of_element(id) - reversed.score_of_element(id)).abs() < 1e-9);
        }
        prop_assert!(
            (forward.score_of_document().total - reversed.score_of_document().total).abs() < 1e-9
        );
    }
}

#[test]
fn pooled_document_score_differs_from_mean_of_elements() {
    let mut store = RecordStore::new();
    store.add(Record::new(NtiaKey::CompName, "x", "x", 10.0, true));
    store.add(Record::new(NtiaKey::CompName, "y", "y", 0.0, true));
    store.add(Record::new(NtiaKey::CompName, "z", "z", 10.0, true));
    store.add(Record::new(NtiaKey::CompVersion, "z", "1.0", 10.0, true));

    let mean_of_elements = ["x", "y", "z"]
        .iter()
        .map(|id| store.score_of_element(id))
        .sum::<f64>()
        / 3.0;

    assert!((store.score_of_document().total - 7.5).abs() < 1e-9);
    assert!((mean_of_elements - 20.0 / 3.0).abs() < 1e-9);
}
