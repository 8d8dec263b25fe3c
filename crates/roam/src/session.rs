//! Charging sessions as seen while they run.
//!
//! Versioned: every accepted patch bumps `version`. The token uid and the
//! start time identify the session to the other party and can not be patched.

use std::sync::Arc;

use roam_core::meta::{list_or_empty, non_empty, require};
use roam_core::{FieldReader, FieldWriter, Meta, MetaBuilder, ParseError, Resource, ResourceBuilder, Timestamp, Warnings};
use serde::{Deserialize, Serialize};

use crate::common::{self, AuthMethod, CdrToken, ChargingPeriod, Price};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Active,
    Completed,
    Invalid,
    Pending,
    Reservation,
}

const START_DATE_TIME: &str = "start_date_time";
const END_DATE_TIME: &str = "end_date_time";
const KWH: &str = "kwh";
const CDR_TOKEN: &str = "cdr_token";
const AUTH_METHOD: &str = "auth_method";
const LOCATION_ID: &str = "location_id";
const EVSE_UID: &str = "evse_uid";
const CONNECTOR_ID: &str = "connector_id";
const CURRENCY: &str = "currency";
const CHARGING_PERIODS: &str = "charging_periods";
const TOTAL_COST: &str = "total_cost";
const STATUS: &str = "status";

#[derive(Debug, Clone)]
pub struct Session {
    meta: Meta,
    start_date_time: Timestamp,
    end_date_time: Option<Timestamp>,
    kwh: f64,
    cdr_token: CdrToken,
    auth_method: AuthMethod,
    location_id: Option<String>,
    evse_uid: Option<String>,
    connector_id: String,
    currency: String,
    charging_periods: Arc<[ChargingPeriod]>,
    total_cost: Option<Price>,
    status: SessionStatus,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn start_date_time(&self) -> Timestamp {
        self.start_date_time
    }

    pub fn end_date_time(&self) -> Option<Timestamp> {
        self.end_date_time
    }

    pub fn kwh(&self) -> f64 {
        self.kwh
    }

    pub fn cdr_token(&self) -> &CdrToken {
        &self.cdr_token
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    pub fn location_id(&self) -> Option<&str> {
        self.location_id.as_deref()
    }

    pub fn evse_uid(&self) -> Option<&str> {
        self.evse_uid.as_deref()
    }

    pub fn connector_id(&self) -> &str {
        &self.connector_id
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn charging_periods(&self) -> &[ChargingPeriod] {
        &self.charging_periods
    }

    pub fn total_cost(&self) -> Option<&Price> {
        self.total_cost.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }
}

impl Resource for Session {
    type Builder = SessionBuilder;

    const KIND: &'static str = "session";
    const VERSIONED: bool = true;
    const PROTECTED_FIELDS: &'static [&'static str] = &["cdr_token/uid", START_DATE_TIME];

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn write_fields(&self, out: &mut FieldWriter<'_>) {
        out.put_timestamp(START_DATE_TIME, &self.start_date_time);
        out.put_opt_timestamp(END_DATE_TIME, self.end_date_time.as_ref());
        out.put(KWH, &self.kwh);
        out.put(CDR_TOKEN, &self.cdr_token);
        out.put(AUTH_METHOD, &self.auth_method);
        out.put_opt_str(LOCATION_ID, self.location_id.as_deref());
        out.put_opt_str(EVSE_UID, self.evse_uid.as_deref());
        out.put_str(CONNECTOR_ID, &self.connector_id);
        out.put_str(CURRENCY, &self.currency);
        out.put_list(CHARGING_PERIODS, &self.charging_periods);
        out.put_opt(TOTAL_COST, self.total_cost.as_ref());
        out.put(STATUS, &self.status);
    }

    fn read_fields(builder: &mut SessionBuilder, fields: &mut FieldReader<'_>) -> Result<(), ParseError> {
        builder.start_date_time = fields.timestamp(START_DATE_TIME)?;
        builder.end_date_time = fields.timestamp(END_DATE_TIME)?;
        builder.kwh = fields.f64(KWH)?;
        builder.cdr_token = fields.value(CDR_TOKEN)?;
        builder.auth_method = fields.value(AUTH_METHOD)?;
        builder.location_id = fields.string(LOCATION_ID)?;
        builder.evse_uid = fields.string(EVSE_UID)?;
        builder.connector_id = fields.string(CONNECTOR_ID)?;
        builder.currency = fields.string(CURRENCY)?;
        builder.charging_periods = fields.list(CHARGING_PERIODS)?.map(Arc::from);
        builder.total_cost = fields.value(TOTAL_COST)?;
        builder.status = fields.value(STATUS)?;
        Ok(())
    }

    fn to_builder(&self) -> SessionBuilder {
        SessionBuilder {
            meta: MetaBuilder::from_meta(&self.meta),
            start_date_time: Some(self.start_date_time),
            end_date_time: self.end_date_time,
            kwh: Some(self.kwh),
            cdr_token: Some(self.cdr_token.clone()),
            auth_method: Some(self.auth_method),
            location_id: self.location_id.clone(),
            evse_uid: self.evse_uid.clone(),
            connector_id: Some(self.connector_id.clone()),
            currency: Some(self.currency.clone()),
            charging_periods: Some(Arc::clone(&self.charging_periods)),
            total_cost: self.total_cost,
            status: Some(self.status),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    meta: MetaBuilder,
    start_date_time: Option<Timestamp>,
    end_date_time: Option<Timestamp>,
    kwh: Option<f64>,
    cdr_token: Option<CdrToken>,
    auth_method: Option<AuthMethod>,
    location_id: Option<String>,
    evse_uid: Option<String>,
    connector_id: Option<String>,
    currency: Option<String>,
    charging_periods: Option<Arc<[ChargingPeriod]>>,
    total_cost: Option<Price>,
    status: Option<SessionStatus>,
}

impl SessionBuilder {
    pub fn start_date_time(mut self, start: Timestamp) -> Self {
        self.start_date_time = Some(start);
        self
    }

    pub fn end_date_time(mut self, end: Timestamp) -> Self {
        self.end_date_time = Some(end);
        self
    }

    pub fn kwh(mut self, kwh: f64) -> Self {
        self.kwh = Some(kwh);
        self
    }

    pub fn cdr_token(mut self, token: CdrToken) -> Self {
        self.cdr_token = Some(token);
        self
    }

    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    pub fn location_id(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    pub fn evse_uid(mut self, evse_uid: impl Into<String>) -> Self {
        self.evse_uid = Some(evse_uid.into());
        self
    }

    pub fn connector_id(mut self, connector_id: impl Into<String>) -> Self {
        self.connector_id = Some(connector_id.into());
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn charging_periods(mut self, periods: impl Into<Arc<[ChargingPeriod]>>) -> Self {
        self.charging_periods = Some(periods.into());
        self
    }

    pub fn total_cost(mut self, cost: Price) -> Self {
        self.total_cost = Some(cost);
        self
    }

    pub fn status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }
}

impl ResourceBuilder for SessionBuilder {
    type Resource = Session;

    fn meta_mut(&mut self) -> &mut MetaBuilder {
        &mut self.meta
    }

    fn finish(self, warnings: &mut Warnings) -> Option<Session> {
        let before = warnings.len();
        let meta = self.meta.finish(warnings);
        let start = require(self.start_date_time, "start_date_time must be set", warnings);
        common::period(start, self.end_date_time, warnings);
        let kwh = require(self.kwh, "kwh must be set", warnings);
        if let Some(kwh) = kwh {
            common::non_negative(KWH, kwh, warnings);
        }
        let cdr_token = require(self.cdr_token, "cdr_token must be set", warnings);
        if let Some(token) = &cdr_token {
            token.validate(warnings);
        }
        let auth_method = require(self.auth_method, "auth_method must be set", warnings);
        let connector_id = non_empty(self.connector_id, "connector_id must not be empty", warnings);
        let currency = common::currency(self.currency, warnings);
        let charging_periods = list_or_empty(self.charging_periods);
        for (i, period) in charging_periods.iter().enumerate() {
            period.validate(i, warnings);
        }
        if let Some(cost) = &self.total_cost {
            cost.validate(TOTAL_COST, warnings);
        }
        let status = require(self.status, "status must be set", warnings);

        if warnings.len() > before {
            return None;
        }
        Some(Session {
            meta: meta?,
            start_date_time: start?,
            end_date_time: self.end_date_time,
            kwh: kwh?,
            cdr_token: cdr_token?,
            auth_method: auth_method?,
            location_id: self.location_id,
            evse_uid: self.evse_uid,
            connector_id: connector_id?,
            currency: currency?,
            charging_periods,
            total_cost: self.total_cost,
            status: status?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TokenType;
    use roam_core::{timestamp, PartyId};

    fn token() -> CdrToken {
        CdrToken {
            uid: "012345678".into(),
            token_type: TokenType::Rfid,
            contract_id: "DE8ACC12E46L89".into(),
        }
    }

    #[test]
    fn builds_active_session() {
        let (snapshot, warnings) = Session::builder()
            .party(PartyId::new("NL", "TNM"))
            .id("S1")
            .start_date_time(timestamp::parse("2024-03-01T10:00:00Z").unwrap())
            .kwh(0.0)
            .cdr_token(token())
            .auth_method(AuthMethod::Whitelist)
            .connector_id("1")
            .currency("EUR")
            .status(SessionStatus::Active)
            .to_immutable();
        assert!(warnings.is_empty(), "{warnings}");
        let session = snapshot.unwrap();
        assert_eq!(session.identity().version, 1);
        assert!(session.to_canonical().get("charging_periods").is_none());
    }

    #[test]
    fn negative_energy_and_blank_token_are_flagged() {
        let mut bad = token();
        bad.uid = " ".into();
        let (snapshot, warnings) = Session::builder()
            .party(PartyId::new("NL", "TNM"))
            .id("S1")
            .start_date_time(timestamp::parse("2024-03-01T10:00:00Z").unwrap())
            .kwh(-1.0)
            .cdr_token(bad)
            .auth_method(AuthMethod::Whitelist)
            .connector_id("1")
            .currency("EUR")
            .status(SessionStatus::Active)
            .to_immutable();
        assert!(snapshot.is_none());
        assert_eq!(
            warnings.into_vec(),
            ["kwh must be a non-negative number", "cdr_token.uid must not be empty"]
        );
    }
}
