//! Merge-patch engine (RFC 7396 with protected fields and monotonic
//! timestamps).
//!
//! The engine works on the canonical tree of the current snapshot rather than
//! on the typed resource, so one implementation serves every resource type:
//!
//! 1. merge the patch document into a private copy of the tree, refusing
//!    any protected path;
//! 2. stamp or check `last_updated`;
//! 3. bump the version of versioned types;
//! 4. re-run the wire parser over the result, so a patched resource is held
//!    to exactly the rules of one received from the wire.
//!
//! The current snapshot is never touched. Every failure is returned as a
//! [`PatchError`] carrying the caller's trace id.

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{PatchError, PatchErrorKind};
use crate::fields::describe;
use crate::identity::UrlIdentity;
use crate::meta::{IDENTITY_FIELDS, LAST_UPDATED, VERSION};
use crate::resource::Resource;
use crate::serialize::{serialize_map, SerializeOptions};
use crate::snapshot::Snapshot;
use crate::timestamp;
use crate::trace::TraceId;

// ── Options ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PatchOptions {
    /// Accept an explicit `last_updated` that does not move forward.
    pub allow_downgrade: bool,
    pub trace_id: TraceId,
}

impl PatchOptions {
    pub fn new(trace_id: impl Into<TraceId>) -> Self {
        Self {
            allow_downgrade: false,
            trace_id: trace_id.into(),
        }
    }

    pub fn allow_downgrade(mut self, allow: bool) -> Self {
        self.allow_downgrade = allow;
        self
    }
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self::new(TraceId::generate())
    }
}

// ── Protected paths ───────────────────────────────────────────────────────

/// Field paths a patch may not touch. A path is a top-level member name or
/// nested names joined with `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedFields {
    paths: Vec<&'static str>,
}

impl ProtectedFields {
    pub fn new(paths: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    /// Identity fields plus the type's own protected paths.
    pub fn of<R: Resource>() -> Self {
        Self::new(IDENTITY_FIELDS.iter().chain(R::PROTECTED_FIELDS).copied())
    }

    pub fn contains(&self, path: &[&str]) -> bool {
        self.paths.iter().any(|p| p.split('/').eq(path.iter().copied()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.paths.iter().copied()
    }
}

/// The merge hit a protected path (named `a/b` for nested ones).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("protected field '{0}'")]
pub struct ProtectedFieldViolation(pub String);

// ── Tree merge ────────────────────────────────────────────────────────────

/// Merge `patch` into `target`, member by member in document order:
///
/// - a protected path fails immediately;
/// - `null` removes the member;
/// - an object merged onto an object recurses;
/// - an object onto anything else (or nothing) becomes that object with its
///   `null` members dropped;
/// - any other value replaces the member.
///
/// On error `target` may be partially merged; callers merge into a copy.
pub fn merge(
    target: &mut Map<String, Value>,
    patch: &Map<String, Value>,
    protected: &ProtectedFields,
) -> Result<(), ProtectedFieldViolation> {
    let mut path = Vec::new();
    merge_at(target, patch, protected, &mut path)
}

fn merge_at<'p>(
    target: &mut Map<String, Value>,
    patch: &'p Map<String, Value>,
    protected: &ProtectedFields,
    path: &mut Vec<&'p str>,
) -> Result<(), ProtectedFieldViolation> {
    for (key, value) in patch {
        path.push(key.as_str());
        if protected.contains(path) {
            return Err(ProtectedFieldViolation(path.join("/")));
        }
        match value {
            Value::Null => {
                target.shift_remove(key);
            }
            Value::Object(sub_patch) => match target.get_mut(key) {
                Some(Value::Object(existing)) => merge_at(existing, sub_patch, protected, path)?,
                _ => {
                    let mut fresh = Map::new();
                    merge_at(&mut fresh, sub_patch, protected, path)?;
                    target.insert(key.clone(), Value::Object(fresh));
                }
            },
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
        path.pop();
    }
    Ok(())
}

// ── Engine ────────────────────────────────────────────────────────────────

/// Apply `patch` to `current`, producing a new snapshot.
pub fn apply<R: Resource>(current: &Snapshot<R>, patch: &Value, options: &PatchOptions) -> Result<Snapshot<R>, PatchError> {
    let result = apply_inner(current, patch, options);
    match &result {
        Ok(next) => debug!(
            trace_id = %options.trace_id,
            kind = R::KIND,
            id = %next.identity(),
            etag = %next.etag(),
            "merge patch applied"
        ),
        Err(err) => warn!(
            trace_id = %options.trace_id,
            kind = R::KIND,
            id = %current.identity(),
            error = err.label(),
            "merge patch rejected: {}",
            err.kind
        ),
    }
    result
}

/// Like [`apply`], for raw patch text. Malformed text is a validation error.
pub fn apply_str<R: Resource>(current: &Snapshot<R>, patch: &str, options: &PatchOptions) -> Result<Snapshot<R>, PatchError> {
    match serde_json::from_str::<Value>(patch) {
        Ok(doc) => apply(current, &doc, options),
        Err(e) => {
            let err = PatchError::new(
                PatchErrorKind::Validation(format!("malformed patch document: {e}")),
                options.trace_id.clone(),
            );
            warn!(trace_id = %options.trace_id, kind = R::KIND, error = err.label(), "merge patch rejected: {}", err.kind);
            Err(err)
        }
    }
}

fn apply_inner<R: Resource>(current: &Snapshot<R>, patch: &Value, options: &PatchOptions) -> Result<Snapshot<R>, PatchError> {
    let fail = |kind: PatchErrorKind| PatchError::new(kind, options.trace_id.clone());

    let Value::Object(patch) = patch else {
        return Err(fail(PatchErrorKind::Validation(format!(
            "patch document must be a JSON object, got {}",
            describe(patch)
        ))));
    };

    let mut working = serialize_map(current.resource(), &SerializeOptions::default());
    merge(&mut working, patch, &ProtectedFields::of::<R>()).map_err(|v| fail(PatchErrorKind::ProtectedField(v.0)))?;

    match patch.get(LAST_UPDATED) {
        None => {
            working.insert(LAST_UPDATED.to_owned(), Value::String(timestamp::format(&timestamp::now())));
        }
        Some(Value::String(text)) => {
            let requested = timestamp::parse(text).map_err(|e| fail(PatchErrorKind::Validation(format!("{LAST_UPDATED}: {e}"))))?;
            let current_ts = current.last_updated();
            if !options.allow_downgrade && requested <= current_ts {
                return Err(fail(PatchErrorKind::Monotonicity {
                    current: current_ts,
                    requested,
                }));
            }
        }
        Some(other) => {
            return Err(fail(PatchErrorKind::Validation(format!(
                "{LAST_UPDATED} must be a timestamp string, got {}",
                describe(other)
            ))));
        }
    }

    if R::VERSIONED {
        working.insert(VERSION.to_owned(), json!(current.identity().version.saturating_add(1)));
    }

    R::try_parse(&Value::Object(working), &UrlIdentity::from(current.identity()))
        .map_err(|e| fail(PatchErrorKind::Structural(e.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(val: Value) -> Map<String, Value> {
        match val {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn rfc7396_examples() {
        // Appendix A of RFC 7396, restricted to object roots.
        let cases = [
            (json!({"a": "b"}), json!({"a": "c"}), json!({"a": "c"})),
            (json!({"a": "b"}), json!({"b": "c"}), json!({"a": "b", "b": "c"})),
            (json!({"a": "b"}), json!({"a": null}), json!({})),
            (json!({"a": "b", "b": "c"}), json!({"a": null}), json!({"b": "c"})),
            (json!({"a": ["b"]}), json!({"a": "c"}), json!({"a": "c"})),
            (json!({"a": "c"}), json!({"a": ["b"]}), json!({"a": ["b"]})),
            (
                json!({"a": {"b": "c"}}),
                json!({"a": {"b": "d", "c": null}}),
                json!({"a": {"b": "d"}}),
            ),
            (json!({"a": [{"b": "c"}]}), json!({"a": [1]}), json!({"a": [1]})),
            (json!({"e": null}), json!({"a": 1}), json!({"e": null, "a": 1})),
            (json!({}), json!({"a": {"bb": {"ccc": null}}}), json!({"a": {"bb": {}}})),
        ];
        for (target, patch, expected) in cases {
            let mut target = obj(target);
            merge(&mut target, &obj(patch.clone()), &ProtectedFields::default()).unwrap();
            assert_eq!(Value::Object(target), expected, "patch {patch}");
        }
    }

    #[test]
    fn protected_top_level_field_is_named() {
        let mut target = obj(json!({"id": "E1", "status": "AVAILABLE"}));
        let err = merge(&mut target, &obj(json!({"status": "CHARGING", "id": "E2"})), &ProtectedFields::new(["id"]))
            .unwrap_err();
        assert_eq!(err, ProtectedFieldViolation("id".into()));
    }

    #[test]
    fn nested_protection_only_applies_to_its_path() {
        let protected = ProtectedFields::new(["cdr_token/uid"]);
        let mut target = obj(json!({"cdr_token": {"uid": "U1", "contract_id": "C1"}, "uid": "top"}));
        merge(&mut target, &obj(json!({"uid": "free", "cdr_token": {"contract_id": "C2"}})), &protected).unwrap();
        assert_eq!(target["cdr_token"]["contract_id"], json!("C2"));

        let err = merge(&mut target, &obj(json!({"cdr_token": {"uid": "U2"}})), &protected).unwrap_err();
        assert_eq!(err.0, "cdr_token/uid");
    }

    #[test]
    fn nested_protection_applies_when_replacing_a_non_object() {
        let protected = ProtectedFields::new(["cdr_token/uid"]);
        let mut target = obj(json!({"cdr_token": "scalar"}));
        let err = merge(&mut target, &obj(json!({"cdr_token": {"uid": "U2"}})), &protected).unwrap_err();
        assert_eq!(err.0, "cdr_token/uid");
    }

    #[test]
    fn protected_paths_match_whole_segments() {
        let protected = ProtectedFields::new(["id", "cdr_token/uid"]);
        assert!(protected.contains(&["id"]));
        assert!(protected.contains(&["cdr_token", "uid"]));
        assert!(!protected.contains(&["cdr_token"]));
        assert!(!protected.contains(&["identity"]));
        assert!(!protected.contains(&["uid"]));
    }
}
