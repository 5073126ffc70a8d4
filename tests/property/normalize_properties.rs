//! Property-based tests for the normalizer

use proptest::prelude::*;
use quizwheel::normalize::{IdentityScheme, Normalizer, RunToken};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

/// Arbitrary-ish source record: a mix of recognized and unrecognized keys with scalar,
/// null, and nested values.
fn record() -> impl Strategy<Value = Value> {
    let scalar = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ];
    let key = prop_oneof![
        Just("id"),
        Just("_id"),
        Just("title"),
        Just("question"),
        Just("text"),
        Just("description"),
        Just("answer"),
        Just("isRead"),
        Just("is_read"),
        Just("other"),
    ];
    prop_oneof![
        4 => proptest::collection::vec((key, scalar), 0..6).prop_map(|pairs| {
            let mut map = Map::new();
            for (k, v) in pairs {
                map.insert(k.to_string(), v);
            }
            Value::Object(map)
        }),
        1 => Just(Value::Null),
        1 => "[a-z]{0,5}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn output_length_matches_input(records in proptest::collection::vec(record(), 0..40), raw in any::<u64>()) {
        let token = RunToken::from_raw(raw);
        for scheme in [IdentityScheme::Run, IdentityScheme::Content] {
            let normalizer = Normalizer::with_scheme(scheme);
            let questions = normalizer.normalize(&Value::Array(records.clone()), token);
            prop_assert_eq!(questions.len(), records.len());
        }
    }

    #[test]
    fn ids_are_unique_within_a_run(records in proptest::collection::vec(record(), 0..40), raw in any::<u64>()) {
        let token = RunToken::from_raw(raw);
        for scheme in [IdentityScheme::Run, IdentityScheme::Content] {
            let questions = Normalizer::with_scheme(scheme).normalize_records(&records, token);
            let ids: HashSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();
            prop_assert_eq!(ids.len(), questions.len());
        }
    }

    #[test]
    fn normalization_is_deterministic(records in proptest::collection::vec(record(), 0..20), raw in any::<u64>()) {
        let token = RunToken::from_raw(raw);
        let normalizer = Normalizer::default();
        prop_assert_eq!(
            normalizer.normalize_records(&records, token),
            normalizer.normalize_records(&records, token)
        );
    }

    #[test]
    fn run_ids_never_cross_runs(records in proptest::collection::vec(record(), 1..20), raw in 0u64..u64::MAX / 2) {
        let normalizer = Normalizer::default();
        let first = normalizer.normalize_records(&records, RunToken::from_raw(raw));
        let second = normalizer.normalize_records(&records, RunToken::from_raw(raw + 1));
        let first_ids: HashSet<&str> = first.iter().map(|q| q.id.as_str()).collect();
        prop_assert!(second.iter().all(|q| !first_ids.contains(q.id.as_str())));
    }

    #[test]
    fn non_array_input_yields_nothing(value in record().prop_filter("not an array", |v| !v.is_array())) {
        prop_assert!(Normalizer::default().normalize(&value, RunToken::from_raw(1)).is_empty());
    }
}
