use serde_json::Value;

/// Deep equality where arrays are compared as multisets.
///
/// Two arrays are equal when they have the same length and every element of
/// one can be paired with a distinct, equal element of the other. Element
/// equality is itself order-insensitive, so nested collections follow the
/// same rule.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use roam_util::json_equal::unordered_equal;
///
/// assert!(unordered_equal(&json!({"caps": ["A", "B"]}), &json!({"caps": ["B", "A"]})));
/// assert!(!unordered_equal(&json!(["A", "A"]), &json!(["A", "B"])));
/// ```
pub fn unordered_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(arr_a), Value::Array(arr_b)) => multiset_equal(arr_a, arr_b),
        (Value::Object(obj_a), Value::Object(obj_b)) => {
            obj_a.len() == obj_b.len()
                && obj_a
                    .iter()
                    .all(|(key, val_a)| obj_b.get(key).is_some_and(|val_b| unordered_equal(val_a, val_b)))
        }
        _ => false,
    }
}

fn multiset_equal(a: &[Value], b: &[Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    'outer: for item in a {
        for (j, candidate) in b.iter().enumerate() {
            if !used[j] && unordered_equal(item, candidate) {
                used[j] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitives() {
        assert!(unordered_equal(&json!(null), &json!(null)));
        assert!(unordered_equal(&json!("x"), &json!("x")));
        assert!(!unordered_equal(&json!(1), &json!("1")));
        assert!(!unordered_equal(&json!(true), &json!(false)));
    }

    #[test]
    fn arrays_ignore_position() {
        assert!(unordered_equal(&json!([1, 2, 3]), &json!([3, 1, 2])));
        assert!(!unordered_equal(&json!([1, 2]), &json!([1, 2, 2])));
    }

    #[test]
    fn duplicates_are_counted() {
        assert!(!unordered_equal(&json!(["x", "x", "y"]), &json!(["x", "y", "y"])));
        assert!(unordered_equal(&json!(["x", "y", "x"]), &json!(["x", "x", "y"])));
    }

    #[test]
    fn nested_collections() {
        let a = json!({"elements": [{"c": [1, 2]}, {"c": [3]}]});
        let b = json!({"elements": [{"c": [3]}, {"c": [2, 1]}]});
        assert!(unordered_equal(&a, &b));
    }

    #[test]
    fn objects_need_same_keys() {
        assert!(!unordered_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!unordered_equal(&json!({"a": 1}), &json!({"b": 1})));
        assert!(unordered_equal(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
    }
}
