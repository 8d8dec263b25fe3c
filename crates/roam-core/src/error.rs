//! Error types shared by the parser, the merge-patch engine and the handle.

use thiserror::Error;

use crate::timestamp::{self, Timestamp};
use crate::trace::TraceId;

// ── Parse ─────────────────────────────────────────────────────────────────

/// The wire parser rejected a document. Carries the human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseError(pub String);

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

// ── Patch ─────────────────────────────────────────────────────────────────

/// Why a patch (or a full replacement) was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchErrorKind {
    /// Malformed input, or an identity mismatch between two sources.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The patch touched a field the resource type protects.
    #[error("protected field '{0}' must not be patched")]
    ProtectedField(String),
    /// The requested `last_updated` does not move forward.
    #[error(
        "last_updated {} is not later than the current {}",
        timestamp::format(.requested),
        timestamp::format(.current)
    )]
    Monotonicity {
        current: Timestamp,
        requested: Timestamp,
    },
    /// The patched tree no longer parses as a valid resource.
    #[error("patched resource is invalid: {0}")]
    Structural(String),
}

/// A refused patch, tagged with the trace id of the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (trace {trace_id})")]
pub struct PatchError {
    pub kind: PatchErrorKind,
    pub trace_id: TraceId,
}

impl PatchError {
    pub fn new(kind: PatchErrorKind, trace_id: TraceId) -> Self {
        Self { kind, trace_id }
    }

    pub fn kind(&self) -> &PatchErrorKind {
        &self.kind
    }

    /// Short machine-friendly label, used in log fields.
    pub fn label(&self) -> &'static str {
        match self.kind {
            PatchErrorKind::Validation(_) => "validation",
            PatchErrorKind::ProtectedField(_) => "protected_field",
            PatchErrorKind::Monotonicity { .. } => "monotonicity",
            PatchErrorKind::Structural(_) => "structural",
        }
    }
}
