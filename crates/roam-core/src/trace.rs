//! Correlation identifiers for patch operations.

use std::fmt;

use rand::Rng;

/// Opaque correlation id attached to every patch outcome.
///
/// Normally supplied by the caller's own trace-id source; [`TraceId::generate`]
/// covers callers that have none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceId(String);

impl TraceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A random 64-bit id rendered as 16 hex digits.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self(format!("{:016x}", rng.gen::<u64>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TraceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TraceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
