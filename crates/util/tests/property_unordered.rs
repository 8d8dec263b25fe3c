use proptest::prelude::*;
use roam_util::{canonical, structural_hash, unordered_equal};
use serde_json::{json, Value};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        prop_oneof![Just(0.0f64), Just(-0.0f64), -1.0e6f64..1.0e6].prop_map(|f| json!(f)),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-c]", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn equality_is_reflexive(v in tree()) {
        prop_assert!(unordered_equal(&v, &v));
    }

    #[test]
    fn reversing_an_array_keeps_equality_and_hash(items in prop::collection::vec(tree(), 0..6)) {
        let forward = Value::Array(items.clone());
        let backward = Value::Array(items.into_iter().rev().collect());
        prop_assert!(unordered_equal(&forward, &backward));
        prop_assert_eq!(structural_hash(&forward), structural_hash(&backward));
    }

    #[test]
    fn equal_trees_hash_equal(a in tree(), b in tree()) {
        if unordered_equal(&a, &b) {
            prop_assert_eq!(structural_hash(&a), structural_hash(&b));
        }
    }

    #[test]
    fn canonical_text_parses_back(v in tree()) {
        let text = canonical::to_string(&v);
        let parsed: Value = serde_json::from_str(&text).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed, v);
    }
}
