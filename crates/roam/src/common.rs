//! Value types shared by several resources, and the validation helpers
//! their builders use.

use roam_core::{Timestamp, Warnings};
use serde::{Deserialize, Serialize};

/// Text in a given language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayText {
    pub language: String,
    pub text: String,
}

impl DisplayText {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Price {
    pub excl_vat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incl_vat: Option<f64>,
}

impl Price {
    pub fn excl_vat(excl_vat: f64) -> Self {
        Self {
            excl_vat,
            incl_vat: None,
        }
    }

    pub fn with_vat(excl_vat: f64, incl_vat: f64) -> Self {
        Self {
            excl_vat,
            incl_vat: Some(incl_vat),
        }
    }

    pub(crate) fn validate(&self, name: &str, warnings: &mut Warnings) {
        non_negative(&format!("{name}.excl_vat"), self.excl_vat, warnings);
        if let Some(incl) = self.incl_vat {
            non_negative(&format!("{name}.incl_vat"), incl, warnings);
            if incl < self.excl_vat {
                warnings.push(format!("{name}.incl_vat must not be lower than {name}.excl_vat"));
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeoCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinates {
    pub(crate) fn validate(&self, warnings: &mut Warnings) {
        if !(-90.0..=90.0).contains(&self.latitude) {
            warnings.push(format!("latitude {} is out of range [-90, 90]", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            warnings.push(format!("longitude {} is out of range [-180, 180]", self.longitude));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    AdHocUser,
    AppUser,
    Other,
    Rfid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthMethod {
    AuthRequest,
    Command,
    Whitelist,
}

/// The token a session or CDR was authorized with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CdrToken {
    pub uid: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub contract_id: String,
}

impl CdrToken {
    pub(crate) fn validate(&self, warnings: &mut Warnings) {
        if self.uid.trim().is_empty() {
            warnings.push("cdr_token.uid must not be empty");
        }
        if self.contract_id.trim().is_empty() {
            warnings.push("cdr_token.contract_id must not be empty");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CdrDimensionType {
    Current,
    Energy,
    EnergyExport,
    EnergyImport,
    MaxCurrent,
    MinCurrent,
    MaxPower,
    MinPower,
    ParkingTime,
    Power,
    ReservationTime,
    StateOfCharge,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CdrDimension {
    #[serde(rename = "type")]
    pub dimension_type: CdrDimensionType,
    pub volume: f64,
}

/// A stretch of a charging session during which one tariff applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChargingPeriod {
    pub start_date_time: Timestamp,
    pub dimensions: Vec<CdrDimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tariff_id: Option<String>,
}

impl ChargingPeriod {
    pub(crate) fn validate(&self, index: usize, warnings: &mut Warnings) {
        if self.dimensions.is_empty() {
            warnings.push(format!("charging_periods[{index}] must have at least one dimension"));
        }
    }
}

// ── Validation helpers ────────────────────────────────────────────────────

/// An ISO 4217 code: three upper-case ASCII letters.
pub(crate) fn currency(value: Option<String>, warnings: &mut Warnings) -> Option<String> {
    match value {
        None => {
            warnings.push("currency must not be empty");
            None
        }
        Some(code) if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) => Some(code),
        Some(code) => {
            warnings.push(format!("currency '{code}' must be a 3-letter ISO 4217 code"));
            None
        }
    }
}

pub(crate) fn non_negative(name: &str, value: f64, warnings: &mut Warnings) {
    if !value.is_finite() || value < 0.0 {
        warnings.push(format!("{name} must be a non-negative number"));
    }
}

pub(crate) fn period(start: Option<Timestamp>, end: Option<Timestamp>, warnings: &mut Warnings) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            warnings.push("end_date_time must not be before start_date_time");
        }
    }
}

/// Like [`period`], but an empty window is rejected too.
pub(crate) fn strict_period(start: Option<Timestamp>, end: Option<Timestamp>, warnings: &mut Warnings) {
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            warnings.push("end_date_time must be after start_date_time");
        }
    }
}
