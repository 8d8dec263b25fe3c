//! Canonical serializer.
//!
//! Renders a resource as an ordered JSON object:
//!
//! ```text
//! country_code, party_id        (ownership info)
//! id
//! version                       (version info)
//! <type fields>                 (fixed order per type)
//! extensions                    (vendor extensions, when present)
//! created                       (created timestamp)
//! last_updated
//! ```
//!
//! The order is part of the contract: the change token is computed over it.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::FieldWriter;
use crate::resource::Resource;

/// Which optional sections to emit. Every section is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeFlags {
    pub include_ownership_info: bool,
    pub include_version_info: bool,
    pub include_created: bool,
    pub include_vendor_extensions: bool,
}

impl SerializeFlags {
    pub const FULL: SerializeFlags = SerializeFlags {
        include_ownership_info: true,
        include_version_info: true,
        include_created: true,
        include_vendor_extensions: true,
    };

    pub const MINIMAL: SerializeFlags = SerializeFlags {
        include_ownership_info: false,
        include_version_info: false,
        include_created: false,
        include_vendor_extensions: false,
    };
}

impl Default for SerializeFlags {
    fn default() -> Self {
        Self::FULL
    }
}

/// Final rewrite of the produced tree. Runs after all standard fields.
pub type Customizer<R> = Arc<dyn Fn(&R, Map<String, Value>) -> Map<String, Value> + Send + Sync>;

pub struct SerializeOptions<R> {
    pub flags: SerializeFlags,
    pub customizer: Option<Customizer<R>>,
}

impl<R> SerializeOptions<R> {
    pub fn new(flags: SerializeFlags) -> Self {
        Self {
            flags,
            customizer: None,
        }
    }

    pub fn with_customizer<F>(mut self, customizer: F) -> Self
    where
        F: Fn(&R, Map<String, Value>) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.customizer = Some(Arc::new(customizer));
        self
    }
}

impl<R> Default for SerializeOptions<R> {
    fn default() -> Self {
        Self::new(SerializeFlags::default())
    }
}

impl<R> Clone for SerializeOptions<R> {
    fn clone(&self) -> Self {
        Self {
            flags: self.flags,
            customizer: self.customizer.clone(),
        }
    }
}

impl<R> fmt::Debug for SerializeOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializeOptions")
            .field("flags", &self.flags)
            .field("customizer", &self.customizer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Serialize `resource` into its canonical object.
pub fn serialize_map<R: Resource>(resource: &R, options: &SerializeOptions<R>) -> Map<String, Value> {
    let mut map = Map::new();
    {
        let mut out = FieldWriter::new(&mut map);
        let meta = resource.meta();
        meta.write_head(&mut out, &options.flags);
        resource.write_fields(&mut out);
        meta.write_tail(&mut out, &options.flags);
    }
    match &options.customizer {
        Some(customize) => customize(resource, map),
        None => map,
    }
}

/// Serialize `resource` into its canonical tree.
pub fn serialize<R: Resource>(resource: &R, options: &SerializeOptions<R>) -> Value {
    Value::Object(serialize_map(resource, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_to_full() {
        assert_eq!(SerializeFlags::default(), SerializeFlags::FULL);
    }

    #[test]
    fn flags_deserialize_with_missing_members_defaulted() {
        let flags: SerializeFlags = serde_json::from_str(r#"{"include_created": false}"#).unwrap();
        assert!(!flags.include_created);
        assert!(flags.include_ownership_info);
        assert!(flags.include_version_info);
        assert!(flags.include_vendor_extensions);
    }
}
