//! Fields every resource carries: identity, timestamps, vendor extensions.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::fields::{FieldReader, FieldWriter};
use crate::identity::{Identity, PartyId, UrlIdentity};
use crate::resource::Warnings;
use crate::serialize::SerializeFlags;
use crate::timestamp::{self, Timestamp};

pub const COUNTRY_CODE: &str = "country_code";
pub const PARTY_ID: &str = "party_id";
pub const ID: &str = "id";
pub const VERSION: &str = "version";
pub const EXTENSIONS: &str = "extensions";
pub const CREATED: &str = "created";
pub const LAST_UPDATED: &str = "last_updated";

/// Identity fields; protected for every resource type.
pub const IDENTITY_FIELDS: &[&str] = &[COUNTRY_CODE, PARTY_ID, ID, VERSION];

/// Version assumed when a document carries none.
pub const INITIAL_VERSION: u64 = 1;

#[derive(Debug, Clone)]
pub struct Meta {
    identity: Identity,
    created: Timestamp,
    last_updated: Timestamp,
    extensions: Option<Arc<Map<String, Value>>>,
}

impl Meta {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn created(&self) -> Timestamp {
        self.created
    }

    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    pub fn extensions(&self) -> Option<&Map<String, Value>> {
        self.extensions.as_deref()
    }

    /// Writes the leading identity block.
    pub(crate) fn write_head(&self, out: &mut FieldWriter<'_>, flags: &SerializeFlags) {
        if flags.include_ownership_info {
            out.put_str(COUNTRY_CODE, &self.identity.party.country_code);
            out.put_str(PARTY_ID, &self.identity.party.party_id);
        }
        out.put_str(ID, &self.identity.id);
        if flags.include_version_info {
            out.put(VERSION, &self.identity.version);
        }
    }

    /// Writes the trailing block that follows the type's own fields.
    pub(crate) fn write_tail(&self, out: &mut FieldWriter<'_>, flags: &SerializeFlags) {
        if flags.include_vendor_extensions {
            out.put_opt(EXTENSIONS, self.extensions.as_deref());
        }
        if flags.include_created {
            out.put_timestamp(CREATED, &self.created);
        }
        out.put_timestamp(LAST_UPDATED, &self.last_updated);
    }
}

/// Staging form of [`Meta`]; embedded in every resource builder.
#[derive(Debug, Clone, Default)]
pub struct MetaBuilder {
    pub country_code: Option<String>,
    pub party_id: Option<String>,
    pub id: Option<String>,
    pub version: Option<u64>,
    pub created: Option<Timestamp>,
    pub last_updated: Option<Timestamp>,
    pub extensions: Option<Arc<Map<String, Value>>>,
}

impl MetaBuilder {
    pub fn from_meta(meta: &Meta) -> Self {
        Self {
            country_code: Some(meta.identity.party.country_code.clone()),
            party_id: Some(meta.identity.party.party_id.clone()),
            id: Some(meta.identity.id.clone()),
            version: Some(meta.identity.version),
            created: Some(meta.created),
            last_updated: Some(meta.last_updated),
            extensions: meta.extensions.clone(),
        }
    }

    pub fn set_party(&mut self, party: PartyId) {
        self.country_code = Some(party.country_code);
        self.party_id = Some(party.party_id);
    }

    /// Reads the meta members and cross-checks them against the identity
    /// supplied out of band.
    pub(crate) fn read(&mut self, fields: &mut FieldReader<'_>, url: &UrlIdentity) -> Result<(), ParseError> {
        let country_code = fields.string(COUNTRY_CODE)?;
        let party_id = fields.string(PARTY_ID)?;
        let id = fields.string(ID)?;

        match (&url.party, country_code, party_id) {
            (Some(expected), None, None) => self.set_party(expected.clone()),
            (Some(expected), country_code, party_id) => {
                let body = PartyId::new(country_code.unwrap_or_default(), party_id.unwrap_or_default());
                if &body != expected {
                    return Err(ParseError::new(format!(
                        "party identifier mismatch: url '{expected}' vs body '{body}'"
                    )));
                }
                self.set_party(body);
            }
            (None, country_code, party_id) => {
                self.country_code = country_code;
                self.party_id = party_id;
            }
        }

        match (&url.id, id) {
            (Some(expected), Some(body)) if &body != expected => {
                return Err(ParseError::new(format!(
                    "resource identifier mismatch: url '{expected}' vs body '{body}'"
                )));
            }
            (Some(expected), None) => self.id = Some(expected.clone()),
            (_, id) => self.id = id,
        }

        self.version = fields.u64(VERSION)?;
        self.extensions = fields.object(EXTENSIONS)?.map(Arc::new);
        self.created = fields.timestamp(CREATED)?;
        self.last_updated = fields.timestamp(LAST_UPDATED)?;
        Ok(())
    }

    /// Validates and freezes; pushes a warning per problem.
    ///
    /// A missing `created` takes `last_updated` and vice versa; when both are
    /// missing both are "now".
    pub fn finish(self, warnings: &mut Warnings) -> Option<Meta> {
        let before = warnings.len();
        let country_code = non_empty(self.country_code, "country code must not be empty", warnings);
        let party_id = non_empty(self.party_id, "party identifier must not be empty", warnings);
        let id = non_empty(self.id, "resource identifier must not be empty", warnings);

        if let Some(cc) = &country_code {
            if cc.chars().count() != 2 {
                warnings.push(format!("country code '{cc}' must be exactly 2 characters"));
            }
        }
        if let Some(pid) = &party_id {
            if pid.chars().count() != 3 {
                warnings.push(format!("party identifier '{pid}' must be exactly 3 characters"));
            }
        }

        let (created, last_updated) = match (self.created, self.last_updated) {
            (Some(c), Some(u)) => (c, u),
            (Some(c), None) => (c, c),
            (None, Some(u)) => (u, u),
            (None, None) => {
                let now = timestamp::now();
                (now, now)
            }
        };

        if warnings.len() > before {
            return None;
        }
        Some(Meta {
            identity: Identity::new(PartyId::new(country_code?, party_id?), id?, self.version.unwrap_or(INITIAL_VERSION)),
            created,
            last_updated,
            extensions: self.extensions,
        })
    }
}

/// `Some` only for a present, non-empty string; otherwise records `msg`.
pub fn non_empty(value: Option<String>, msg: &str, warnings: &mut Warnings) -> Option<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Some(s),
        _ => {
            warnings.push(msg);
            None
        }
    }
}

/// `Some` only for a present value; otherwise records `msg`.
pub fn require<T>(value: Option<T>, msg: &str, warnings: &mut Warnings) -> Option<T> {
    if value.is_none() {
        warnings.push(msg);
    }
    value
}

/// The shared collection, or an empty one when absent.
pub fn list_or_empty<T>(items: Option<Arc<[T]>>) -> Arc<[T]> {
    items.unwrap_or_else(|| Arc::from(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read(doc: Value, url: &UrlIdentity) -> Result<MetaBuilder, ParseError> {
        let Value::Object(map) = doc else { unreachable!() };
        let mut fields = FieldReader::new(&map);
        let mut builder = MetaBuilder::default();
        builder.read(&mut fields, url)?;
        Ok(builder)
    }

    #[test]
    fn url_identity_fills_missing_body_identity() {
        let url = UrlIdentity::new(PartyId::new("DE", "GEF"), "E1");
        let builder = read(json!({"last_updated": "2024-01-01T00:00:00Z"}), &url).unwrap();
        assert_eq!(builder.country_code.as_deref(), Some("DE"));
        assert_eq!(builder.party_id.as_deref(), Some("GEF"));
        assert_eq!(builder.id.as_deref(), Some("E1"));
    }

    #[test]
    fn url_party_mismatch_is_rejected() {
        let url = UrlIdentity::party(PartyId::new("DE", "GEF"));
        let err = read(json!({"country_code": "NL", "party_id": "GEF", "id": "E1"}), &url).unwrap_err();
        assert_eq!(err.message(), "party identifier mismatch: url 'DE*GEF' vs body 'NL*GEF'");
    }

    #[test]
    fn url_id_mismatch_is_rejected() {
        let url = UrlIdentity::new(PartyId::new("DE", "GEF"), "E1");
        let err = read(json!({"id": "E2"}), &url).unwrap_err();
        assert_eq!(err.message(), "resource identifier mismatch: url 'E1' vs body 'E2'");
    }

    #[test]
    fn missing_timestamp_takes_the_other() {
        let ts = timestamp::parse("2024-01-01T00:00:00Z").unwrap();
        let builder = MetaBuilder {
            country_code: Some("DE".into()),
            party_id: Some("GEF".into()),
            id: Some("E1".into()),
            last_updated: Some(ts),
            ..MetaBuilder::default()
        };
        let mut warnings = Warnings::default();
        let meta = builder.finish(&mut warnings).unwrap();
        assert_eq!(meta.created(), ts);
        assert_eq!(meta.identity().version, INITIAL_VERSION);
    }

    #[test]
    fn missing_identity_collects_every_warning() {
        let mut warnings = Warnings::default();
        assert!(MetaBuilder::default().finish(&mut warnings).is_none());
        assert_eq!(
            warnings.into_vec(),
            [
                "country code must not be empty",
                "party identifier must not be empty",
                "resource identifier must not be empty",
            ]
        );
    }
}
