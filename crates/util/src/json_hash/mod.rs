//! Order-insensitive structural hash code for JSON trees.
//!
//! A 32-bit djb2-style mix with per-type discriminators. Unlike a positional
//! hash, array elements are hashed independently and combined with a
//! commutative sum, and object members are mixed in key order, so the result
//! agrees with [`unordered_equal`](crate::json_equal::unordered_equal):
//! trees that compare equal always hash equal.
//!
//! This is a fast in-memory code for hash maps and equality fast paths. It
//! is not a change token; use a cryptographic digest for that.

use serde_json::{Map, Number, Value};

pub const START_STATE: u32 = 5381;

pub const NULL_CONST: u32 = 982_452_847;
pub const TRUE_CONST: u32 = 982_453_247;
pub const FALSE_CONST: u32 = 982_454_243;
pub const ARRAY_CONST: u32 = 982_452_259;
pub const STRING_CONST: u32 = 982_453_601;
pub const OBJECT_CONST: u32 = 982_454_533;
pub const NUMBER_CONST: u32 = 982_455_007;
pub const FLOAT_CONST: u32 = 982_455_409;

/// `state * 33 + num` with wrapping arithmetic.
pub fn update_num(state: u32, num: u32) -> u32 {
    state.wrapping_shl(5).wrapping_add(state).wrapping_add(num)
}

pub fn update_str(mut state: u32, s: &str) -> u32 {
    state = update_num(state, STRING_CONST);
    state = update_num(state, s.len() as u32);
    for b in s.bytes() {
        state = update_num(state, u32::from(b));
    }
    state
}

pub fn update_json(state: u32, json: &Value) -> u32 {
    match json {
        Value::Null => update_num(state, NULL_CONST),
        Value::Bool(b) => update_num(state, if *b { TRUE_CONST } else { FALSE_CONST }),
        Value::Number(n) => update_number(state, n),
        Value::String(s) => update_str(state, s),
        Value::Array(arr) => {
            let mut state = update_num(state, ARRAY_CONST);
            state = update_num(state, arr.len() as u32);
            let sum = arr
                .iter()
                .fold(0u32, |acc, item| acc.wrapping_add(update_json(START_STATE, item)));
            update_num(state, sum)
        }
        Value::Object(map) => update_json_object(state, map),
    }
}

/// Integers hash by value and floats by their bit pattern, so 1 and 1.0 stay
/// apart exactly as `Number` equality keeps them. `-0.0` equals `0.0` and is
/// folded onto it.
fn update_number(state: u32, n: &Number) -> u32 {
    let state = update_num(state, NUMBER_CONST);
    if let Some(i) = n.as_i64() {
        return update_str(state, &i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return update_str(state, &u.to_string());
    }
    let f = n.as_f64().unwrap_or_default();
    let bits = if f == 0.0 { 0 } else { f.to_bits() };
    let state = update_num(state, FLOAT_CONST);
    let state = update_num(state, (bits >> 32) as u32);
    update_num(state, bits as u32)
}

fn update_json_object(state: u32, map: &Map<String, Value>) -> u32 {
    let mut state = update_num(state, OBJECT_CONST);
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    for key in keys {
        state = update_str(state, key);
        state = update_json(state, &map[key.as_str()]);
    }
    state
}

/// Hash any JSON tree.
pub fn structural_hash(json: &Value) -> u32 {
    update_json(START_STATE, json)
}
