//! The `Resource` / `ResourceBuilder` contract and the generic wire parser.
//!
//! A resource type supplies its own fields (how to write them in canonical
//! order, how to read them into its builder, how the builder validates);
//! everything else (identity, timestamps, extensions, hashing, patching,
//! comparison) is implemented once in this crate.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::fields::{FieldReader, FieldWriter};
use crate::identity::{Identity, PartyId, UrlIdentity};
use crate::meta::{Meta, MetaBuilder};
use crate::serialize::SerializeOptions;
use crate::snapshot::Snapshot;
use crate::timestamp::Timestamp;

// ── Warnings ──────────────────────────────────────────────────────────────

/// Human-readable validation findings collected by a builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn push(&mut self, msg: impl Into<String>) {
        self.0.push(msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

// ── Traits ────────────────────────────────────────────────────────────────

pub trait Resource: Clone + fmt::Debug + Send + Sync + Sized + 'static {
    type Builder: ResourceBuilder<Resource = Self>;

    /// Short lowercase type name, used in messages and log fields.
    const KIND: &'static str;

    /// Whether every successful patch bumps the version number.
    const VERSIONED: bool = false;

    /// Paths a patch may not touch, in addition to the identity fields.
    /// Nested paths are written `outer/inner`.
    const PROTECTED_FIELDS: &'static [&'static str] = &[];

    fn meta(&self) -> &Meta;

    /// Writes the type's own fields, in canonical order, omitting absent
    /// optional ones.
    fn write_fields(&self, out: &mut FieldWriter<'_>);

    /// Reads the type's own fields into `builder`. Shape errors fail here;
    /// missing mandatory fields are left for the builder to report.
    fn read_fields(builder: &mut Self::Builder, fields: &mut FieldReader<'_>) -> Result<(), ParseError>;

    fn to_builder(&self) -> Self::Builder;

    /// Options the change token is computed with. Full fidelity by default.
    fn hash_options() -> SerializeOptions<Self> {
        SerializeOptions::default()
    }

    fn identity(&self) -> &Identity {
        self.meta().identity()
    }

    fn last_updated(&self) -> Timestamp {
        self.meta().last_updated()
    }

    fn created(&self) -> Timestamp {
        self.meta().created()
    }

    fn try_parse(json: &Value, url: &UrlIdentity) -> Result<Snapshot<Self>, ParseError> {
        try_parse(json, url)
    }

    fn try_parse_str(text: &str, url: &UrlIdentity) -> Result<Snapshot<Self>, ParseError> {
        try_parse_str(text, url)
    }
}

pub trait ResourceBuilder: Default + Sized {
    type Resource: Resource<Builder = Self>;

    fn meta_mut(&mut self) -> &mut MetaBuilder;

    /// Validates every field, pushing one warning per problem, and returns the
    /// resource only when this builder added no warnings.
    fn finish(self, warnings: &mut Warnings) -> Option<Self::Resource>;

    /// Freezes the builder into a published snapshot, or reports why not.
    fn to_immutable(self) -> (Option<Snapshot<Self::Resource>>, Warnings) {
        let mut warnings = Warnings::default();
        match self.finish(&mut warnings) {
            Some(resource) if warnings.is_empty() => (Some(Snapshot::new(resource)), warnings),
            _ => (None, warnings),
        }
    }

    fn party(mut self, party: PartyId) -> Self {
        self.meta_mut().set_party(party);
        self
    }

    fn id(mut self, id: impl Into<String>) -> Self {
        self.meta_mut().id = Some(id.into());
        self
    }

    fn version(mut self, version: u64) -> Self {
        self.meta_mut().version = Some(version);
        self
    }

    fn created(mut self, created: Timestamp) -> Self {
        self.meta_mut().created = Some(created);
        self
    }

    fn last_updated(mut self, last_updated: Timestamp) -> Self {
        self.meta_mut().last_updated = Some(last_updated);
        self
    }

    fn extensions(mut self, extensions: Map<String, Value>) -> Self {
        self.meta_mut().extensions = Some(extensions.into());
        self
    }
}

// ── Wire parser ───────────────────────────────────────────────────────────

/// Parses a wire document, cross-checking it against the identity supplied
/// out of band, and runs the full builder validation.
pub fn try_parse<R: Resource>(json: &Value, url: &UrlIdentity) -> Result<Snapshot<R>, ParseError> {
    let map = json
        .as_object()
        .ok_or_else(|| ParseError::new(format!("{} document must be a JSON object", R::KIND)))?;

    let mut fields = FieldReader::new(map);
    let mut builder = R::Builder::default();
    builder.meta_mut().read(&mut fields, url)?;
    R::read_fields(&mut builder, &mut fields)?;
    fields.finish()?;

    match builder.to_immutable() {
        (Some(snapshot), _) => Ok(snapshot),
        (None, warnings) => Err(ParseError::new(warnings.to_string())),
    }
}

/// Like [`try_parse`], for raw text. Malformed JSON is a parse error too.
pub fn try_parse_str<R: Resource>(text: &str, url: &UrlIdentity) -> Result<Snapshot<R>, ParseError> {
    let json: Value =
        serde_json::from_str(text).map_err(|e| ParseError::new(format!("malformed {} document: {e}", R::KIND)))?;
    try_parse(&json, url)
}
