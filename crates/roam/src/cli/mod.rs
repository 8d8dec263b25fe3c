//! Command-line tools for roaming resources.
//!
//! Provides the core logic used by the binary entry points:
//! - `roam-patch`: apply a merge-patch to a resource read from stdin
//! - `roam-etag`: print the change token of a resource read from stdin

use std::fmt;
use std::str::FromStr;

use roam_core::{ParseError, PatchError, PatchOptions, Resource, UrlIdentity};
use roam_util::canonical;
use thiserror::Error;
use tracing::debug;

use crate::{Cdr, Evse, Session, Tariff, Token};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown resource kind '{0}' (expected one of evse, tariff, token, session, cdr)")]
    UnknownKind(String),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Patch(#[from] PatchError),
}

// ── Kinds ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Evse,
    Tariff,
    Token,
    Session,
    Cdr,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [Self::Evse, Self::Tariff, Self::Token, Self::Session, Self::Cdr];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Evse => Evse::KIND,
            Self::Tariff => Tariff::KIND,
            Self::Token => Token::KIND,
            Self::Session => Session::KIND,
            Self::Cdr => Cdr::KIND,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, CliError> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| CliError::UnknownKind(s.to_owned()))
    }
}

// ── Commands ──────────────────────────────────────────────────────────────

/// A resource rendered for output: canonical JSON text plus its change token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    pub document: String,
    pub etag: String,
}

/// Parse `document` as a resource of `kind`, apply `patch` to it and render
/// the result.
pub fn patch(kind: ResourceKind, document: &str, patch: &str, options: &PatchOptions) -> Result<CliOutput, CliError> {
    match kind {
        ResourceKind::Evse => patch_as::<Evse>(document, patch, options),
        ResourceKind::Tariff => patch_as::<Tariff>(document, patch, options),
        ResourceKind::Token => patch_as::<Token>(document, patch, options),
        ResourceKind::Session => patch_as::<Session>(document, patch, options),
        ResourceKind::Cdr => patch_as::<Cdr>(document, patch, options),
    }
}

/// Parse `document` as a resource of `kind` and return its change token.
pub fn etag(kind: ResourceKind, document: &str) -> Result<String, CliError> {
    match kind {
        ResourceKind::Evse => etag_as::<Evse>(document),
        ResourceKind::Tariff => etag_as::<Tariff>(document),
        ResourceKind::Token => etag_as::<Token>(document),
        ResourceKind::Session => etag_as::<Session>(document),
        ResourceKind::Cdr => etag_as::<Cdr>(document),
    }
}

/// Split `roam-patch` arguments into kind, patch text and the downgrade flag.
/// Returns `None` for a wrong number of positionals or any other flag.
pub fn parse_patch_args(args: &[String]) -> Option<(&str, &str, bool)> {
    let mut allow_downgrade = false;
    let mut positional = Vec::with_capacity(2);
    for arg in args {
        match arg.as_str() {
            "--allow-downgrade" => allow_downgrade = true,
            flag if flag.starts_with("--") => return None,
            value => positional.push(value),
        }
    }
    match positional.as_slice() {
        [kind, patch] => Some((*kind, *patch, allow_downgrade)),
        _ => None,
    }
}

fn patch_as<R: Resource>(document: &str, patch: &str, options: &PatchOptions) -> Result<CliOutput, CliError> {
    let current = R::try_parse_str(document, &UrlIdentity::none())?;
    debug!(kind = R::KIND, id = %current.identity(), etag = %current.etag(), "resource parsed");
    let next = roam_core::apply_str(&current, patch, options)?;
    Ok(CliOutput {
        document: canonical::to_string(&next.to_canonical()),
        etag: next.etag().to_string(),
    })
}

fn etag_as<R: Resource>(document: &str) -> Result<String, CliError> {
    let snapshot = R::try_parse_str(document, &UrlIdentity::none())?;
    debug!(kind = R::KIND, id = %snapshot.identity(), "resource parsed");
    Ok(snapshot.etag().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVSE: &str = r#"{"country_code":"DE","party_id":"GEF","id":"E1","status":"AVAILABLE","connectors":[{"id":"1","standard":"IEC_62196_T2","format":"SOCKET","power_type":"AC_3_PHASE","max_voltage":400,"max_amperage":32}],"last_updated":"2024-01-01T00:00:00Z"}"#;

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("EVSE".parse::<ResourceKind>().unwrap(), ResourceKind::Evse);
        assert_eq!("cdr".parse::<ResourceKind>().unwrap(), ResourceKind::Cdr);
        for kind in ResourceKind::ALL {
            assert_eq!(kind.to_string().parse::<ResourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "location".parse::<ResourceKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown resource kind 'location' (expected one of evse, tariff, token, session, cdr)"
        );
    }

    #[test]
    fn patch_renders_canonical_document() {
        let options = PatchOptions::new("cli-test");
        let out = patch(
            ResourceKind::Evse,
            EVSE,
            r#"{"status":"CHARGING","last_updated":"2024-01-02T00:00:00Z"}"#,
            &options,
        )
        .unwrap();
        assert!(out.document.contains(r#""status":"CHARGING""#), "{}", out.document);
        assert!(out.document.contains(r#""last_updated":"2024-01-02T00:00:00Z""#));
        assert_eq!(out.etag, etag(ResourceKind::Evse, &out.document).unwrap());
    }

    #[test]
    fn protected_patch_is_reported_with_trace() {
        let options = PatchOptions::new("cli-test");
        let err = patch(ResourceKind::Evse, EVSE, r#"{"id":"E2"}"#, &options).unwrap_err();
        assert_eq!(err.to_string(), "protected field 'id' must not be patched (trace cli-test)");
    }

    #[test]
    fn patch_args_accept_only_the_downgrade_flag() {
        let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let plain = args(&["evse", "{}"]);
        assert_eq!(parse_patch_args(&plain), Some(("evse", "{}", false)));
        let flagged = args(&["--allow-downgrade", "evse", "{}"]);
        assert_eq!(parse_patch_args(&flagged), Some(("evse", "{}", true)));

        assert_eq!(parse_patch_args(&args(&["evse", "{}", "--allow-downgrad"])), None);
        assert_eq!(parse_patch_args(&args(&["evse"])), None);
        assert_eq!(parse_patch_args(&args(&["evse", "{}", "extra"])), None);
    }

    #[test]
    fn etag_is_stable() {
        assert_eq!(etag(ResourceKind::Evse, EVSE).unwrap(), etag(ResourceKind::Evse, EVSE).unwrap());
        assert!(matches!(etag(ResourceKind::Evse, "{"), Err(CliError::Parse(_))));
    }
}
