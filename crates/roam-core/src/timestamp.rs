//! UTC timestamps in their RFC 3339 wire form.
//!
//! Formatting keeps exactly as many fractional digits as the value needs, so
//! a formatted timestamp parses back to the same instant.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::ParseError;

pub type Timestamp = DateTime<Utc>;

pub fn now() -> Timestamp {
    Utc::now()
}

pub fn format(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse(text: &str) -> Result<Timestamp, ParseError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ParseError::new(format!("invalid timestamp '{text}': {e}")))
}
