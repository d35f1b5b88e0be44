//! Algebraic laws of matching, checked over generated value trees.

use std::collections::BTreeMap;

use alike::{actual, is_alike, match_values, Expected, Value};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9..1.0e9f64).prop_map(Value::Float),
        "[a-z]{0,8}".prop_map(Value::Str),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4).prop_map(Value::Map),
        ]
    })
}

fn map_strategy() -> impl Strategy<Value = BTreeMap<String, Value>> {
    prop::collection::btree_map("[a-z]{1,4}", value_strategy(), 0..5)
}

// The expected structure mirroring a value: containers recurse, leaves
// become equality checks.
fn to_expected(value: &Value) -> Expected {
    match value {
        Value::Map(entries) => Expected::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_expected(v)))
                .collect(),
        ),
        Value::List(items) => Expected::Seq(items.iter().map(to_expected).collect()),
        other => Expected::Literal(other.clone()),
    }
}

proptest! {
    #[test]
    fn every_value_is_alike_itself(value in value_strategy()) {
        prop_assert!(is_alike(Expected::Literal(value.clone()), value));
    }

    #[test]
    fn every_value_matches_its_own_structure(value in value_strategy()) {
        prop_assert!(is_alike(to_expected(&value), value.clone()));
    }

    #[test]
    fn extra_actual_keys_never_fail(base in map_strategy(), extras in map_strategy()) {
        let expected = to_expected(&Value::Map(base.clone()));
        // grow the actual side; colliding keys keep the base value
        let mut merged = extras;
        for (k, v) in base {
            merged.insert(k, v);
        }
        prop_assert!(is_alike(expected, Value::Map(merged)));
    }

    #[test]
    fn matching_is_repeatable(
        expected_value in value_strategy(),
        actual_value in value_strategy(),
    ) {
        let expected = to_expected(&expected_value);
        let first = match_values(&expected, &actual_value);
        let second = match_values(&expected, &actual_value);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn integer_ordering_matches_the_primitive(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(actual().gt(b).evaluate(&Value::Int(a)).is_pass(), a > b);
        prop_assert_eq!(actual().le(b).evaluate(&Value::Int(a)).is_pass(), a <= b);
        prop_assert_eq!(actual().eq(b).evaluate(&Value::Int(a)).is_pass(), a == b);
    }
}
