//! Typed access to the members of a wire object.
//!
//! [`FieldReader`] is what resource parsers read through: every getter
//! returns `Ok(None)` for an absent member (an explicit `null` counts as
//! absent), `Err` for a member of the wrong shape, and records the key as
//! consumed so [`FieldReader::finish`] can reject members nobody asked for.
//!
//! [`FieldWriter`] is the serializer side: it keeps insertion order and
//! omits absent optional members instead of writing `null`.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::timestamp::{self, Timestamp};

// ── Reader ────────────────────────────────────────────────────────────────

pub struct FieldReader<'a> {
    map: &'a Map<String, Value>,
    consumed: HashSet<&'static str>,
}

impl<'a> FieldReader<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self {
            map,
            consumed: HashSet::new(),
        }
    }

    fn take(&mut self, key: &'static str) -> Option<&'a Value> {
        self.consumed.insert(key);
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(val) => Some(val),
        }
    }

    pub fn string(&mut self, key: &'static str) -> Result<Option<String>, ParseError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(wrong_type(key, "a string", other)),
        }
    }

    pub fn bool(&mut self, key: &'static str) -> Result<Option<bool>, ParseError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(wrong_type(key, "a boolean", other)),
        }
    }

    pub fn u64(&mut self, key: &'static str) -> Result<Option<u64>, ParseError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| ParseError::new(format!("{key} must be a non-negative integer, got {n}"))),
            Some(other) => Err(wrong_type(key, "a number", other)),
        }
    }

    pub fn f64(&mut self, key: &'static str) -> Result<Option<f64>, ParseError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| ParseError::new(format!("{key} is not representable as a number: {n}"))),
            Some(other) => Err(wrong_type(key, "a number", other)),
        }
    }

    pub fn timestamp(&mut self, key: &'static str) -> Result<Option<Timestamp>, ParseError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::String(s)) => timestamp::parse(s)
                .map(Some)
                .map_err(|e| ParseError::new(format!("{key}: {e}"))),
            Some(other) => Err(wrong_type(key, "a timestamp string", other)),
        }
    }

    pub fn object(&mut self, key: &'static str) -> Result<Option<Map<String, Value>>, ParseError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(other) => Err(wrong_type(key, "an object", other)),
        }
    }

    /// Any serde-decodable member: enums, nested value objects.
    pub fn value<T: DeserializeOwned>(&mut self, key: &'static str) -> Result<Option<T>, ParseError> {
        match self.take(key) {
            None => Ok(None),
            Some(val) => serde_json::from_value(val.clone())
                .map(Some)
                .map_err(|e| ParseError::new(format!("invalid {key}: {e}"))),
        }
    }

    pub fn list<T: DeserializeOwned>(&mut self, key: &'static str) -> Result<Option<Vec<T>>, ParseError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    serde_json::from_value(item.clone())
                        .map_err(|e| ParseError::new(format!("invalid {key}[{i}]: {e}")))
                })
                .collect::<Result<Vec<T>, ParseError>>()
                .map(Some),
            Some(other) => Err(wrong_type(key, "an array", other)),
        }
    }

    /// Fails on the first member (in document order) that no getter consumed.
    pub fn finish(self) -> Result<(), ParseError> {
        match self.map.keys().find(|k| !self.consumed.contains(k.as_str())) {
            Some(key) => Err(ParseError::new(format!("unknown field '{key}'"))),
            None => Ok(()),
        }
    }
}

fn wrong_type(key: &str, expected: &str, got: &Value) -> ParseError {
    ParseError::new(format!("{key} must be {expected}, got {}", describe(got)))
}

pub(crate) fn describe(val: &Value) -> &'static str {
    match val {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Writer ────────────────────────────────────────────────────────────────

pub struct FieldWriter<'a> {
    out: &'a mut Map<String, Value>,
}

impl<'a> FieldWriter<'a> {
    pub fn new(out: &'a mut Map<String, Value>) -> Self {
        Self { out }
    }

    pub fn put<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(val) => {
                self.out.insert(key.to_owned(), val);
            }
            // Only reachable for maps with non-string keys, which no
            // resource field uses.
            Err(err) => tracing::error!(field = key, %err, "field could not be rendered"),
        }
    }

    pub fn put_opt<T: Serialize>(&mut self, key: &str, value: Option<&T>) {
        if let Some(value) = value {
            self.put(key, value);
        }
    }

    pub fn put_str(&mut self, key: &str, value: &str) {
        self.out.insert(key.to_owned(), Value::String(value.to_owned()));
    }

    pub fn put_opt_str(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.put_str(key, value);
        }
    }

    pub fn put_timestamp(&mut self, key: &str, value: &Timestamp) {
        self.out.insert(key.to_owned(), Value::String(timestamp::format(value)));
    }

    pub fn put_opt_timestamp(&mut self, key: &str, value: Option<&Timestamp>) {
        if let Some(value) = value {
            self.put_timestamp(key, value);
        }
    }

    /// Optional collections are omitted when empty.
    pub fn put_list<T: Serialize>(&mut self, key: &str, items: &[T]) {
        if !items.is_empty() {
            self.put(key, items);
        }
    }

    /// Mandatory collections are always written.
    pub fn put_required_list<T: Serialize>(&mut self, key: &str, items: &[T]) {
        self.put(key, items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(val: Value) -> Map<String, Value> {
        match val {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn explicit_null_reads_as_absent() {
        let map = obj(json!({"floor_level": null}));
        let mut fields = FieldReader::new(&map);
        assert_eq!(fields.string("floor_level").unwrap(), None);
        assert!(fields.finish().is_ok());
    }

    #[test]
    fn wrong_shape_names_the_field() {
        let map = obj(json!({"kwh": "lots"}));
        let mut fields = FieldReader::new(&map);
        let err = fields.f64("kwh").unwrap_err();
        assert_eq!(err.message(), "kwh must be a number, got a string");
    }

    #[test]
    fn unconsumed_members_are_rejected() {
        let map = obj(json!({"id": "E1", "colour": "red"}));
        let mut fields = FieldReader::new(&map);
        fields.string("id").unwrap();
        assert_eq!(fields.finish().unwrap_err().message(), "unknown field 'colour'");
    }

    #[test]
    fn list_errors_carry_the_index() {
        let map = obj(json!({"levels": [1, "two"]}));
        let mut fields = FieldReader::new(&map);
        let err = fields.list::<u32>("levels").unwrap_err();
        assert!(err.message().starts_with("invalid levels[1]:"), "{}", err.message());
    }

    #[test]
    fn negative_version_is_rejected() {
        let map = obj(json!({"version": -1}));
        let mut fields = FieldReader::new(&map);
        assert!(fields.u64("version").is_err());
    }

    #[test]
    fn writer_omits_absent_and_empty() {
        let mut map = Map::new();
        let mut out = FieldWriter::new(&mut map);
        out.put_str("id", "E1");
        out.put_opt_str("floor_level", None);
        out.put_list::<String>("capabilities", &[]);
        out.put_required_list::<String>("connectors", &[]);
        assert_eq!(Value::Object(map), json!({"id": "E1", "connectors": []}));
    }
}
