//! Charge detail records: the billed outcome of a finished session.
//!
//! The charging periods and the total cost are what the other party bills
//! against, so a patch may amend anything else but never those.

use std::sync::Arc;

use roam_core::meta::{list_or_empty, require};
use roam_core::{FieldReader, FieldWriter, Meta, MetaBuilder, ParseError, Resource, ResourceBuilder, Timestamp, Warnings};

use crate::common::{self, AuthMethod, CdrToken, ChargingPeriod, Price};

const START_DATE_TIME: &str = "start_date_time";
const END_DATE_TIME: &str = "end_date_time";
const CDR_TOKEN: &str = "cdr_token";
const AUTH_METHOD: &str = "auth_method";
const CURRENCY: &str = "currency";
const TOTAL_COST: &str = "total_cost";
const TOTAL_ENERGY: &str = "total_energy";
const TOTAL_TIME: &str = "total_time";
const CHARGING_PERIODS: &str = "charging_periods";
const REMARK: &str = "remark";

#[derive(Debug, Clone)]
pub struct Cdr {
    meta: Meta,
    start_date_time: Timestamp,
    end_date_time: Timestamp,
    cdr_token: CdrToken,
    auth_method: AuthMethod,
    currency: String,
    total_cost: Price,
    total_energy: f64,
    total_time: f64,
    charging_periods: Arc<[ChargingPeriod]>,
    remark: Option<String>,
}

impl Cdr {
    pub fn builder() -> CdrBuilder {
        CdrBuilder::default()
    }

    pub fn start_date_time(&self) -> Timestamp {
        self.start_date_time
    }

    pub fn end_date_time(&self) -> Timestamp {
        self.end_date_time
    }

    pub fn cdr_token(&self) -> &CdrToken {
        &self.cdr_token
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn total_cost(&self) -> &Price {
        &self.total_cost
    }

    pub fn total_energy(&self) -> f64 {
        self.total_energy
    }

    /// Hours.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn charging_periods(&self) -> &[ChargingPeriod] {
        &self.charging_periods
    }

    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }
}

impl Resource for Cdr {
    type Builder = CdrBuilder;

    const KIND: &'static str = "cdr";
    const VERSIONED: bool = true;
    const PROTECTED_FIELDS: &'static [&'static str] = &[CHARGING_PERIODS, TOTAL_COST];

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn write_fields(&self, out: &mut FieldWriter<'_>) {
        out.put_timestamp(START_DATE_TIME, &self.start_date_time);
        out.put_timestamp(END_DATE_TIME, &self.end_date_time);
        out.put(CDR_TOKEN, &self.cdr_token);
        out.put(AUTH_METHOD, &self.auth_method);
        out.put_str(CURRENCY, &self.currency);
        out.put(TOTAL_COST, &self.total_cost);
        out.put(TOTAL_ENERGY, &self.total_energy);
        out.put(TOTAL_TIME, &self.total_time);
        out.put_required_list(CHARGING_PERIODS, &self.charging_periods);
        out.put_opt_str(REMARK, self.remark.as_deref());
    }

    fn read_fields(builder: &mut CdrBuilder, fields: &mut FieldReader<'_>) -> Result<(), ParseError> {
        builder.start_date_time = fields.timestamp(START_DATE_TIME)?;
        builder.end_date_time = fields.timestamp(END_DATE_TIME)?;
        builder.cdr_token = fields.value(CDR_TOKEN)?;
        builder.auth_method = fields.value(AUTH_METHOD)?;
        builder.currency = fields.string(CURRENCY)?;
        builder.total_cost = fields.value(TOTAL_COST)?;
        builder.total_energy = fields.f64(TOTAL_ENERGY)?;
        builder.total_time = fields.f64(TOTAL_TIME)?;
        builder.charging_periods = fields.list(CHARGING_PERIODS)?.map(Arc::from);
        builder.remark = fields.string(REMARK)?;
        Ok(())
    }

    fn to_builder(&self) -> CdrBuilder {
        CdrBuilder {
            meta: MetaBuilder::from_meta(&self.meta),
            start_date_time: Some(self.start_date_time),
            end_date_time: Some(self.end_date_time),
            cdr_token: Some(self.cdr_token.clone()),
            auth_method: Some(self.auth_method),
            currency: Some(self.currency.clone()),
            total_cost: Some(self.total_cost),
            total_energy: Some(self.total_energy),
            total_time: Some(self.total_time),
            charging_periods: Some(Arc::clone(&self.charging_periods)),
            remark: self.remark.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CdrBuilder {
    meta: MetaBuilder,
    start_date_time: Option<Timestamp>,
    end_date_time: Option<Timestamp>,
    cdr_token: Option<CdrToken>,
    auth_method: Option<AuthMethod>,
    currency: Option<String>,
    total_cost: Option<Price>,
    total_energy: Option<f64>,
    total_time: Option<f64>,
    charging_periods: Option<Arc<[ChargingPeriod]>>,
    remark: Option<String>,
}

impl CdrBuilder {
    pub fn start_date_time(mut self, start: Timestamp) -> Self {
        self.start_date_time = Some(start);
        self
    }

    pub fn end_date_time(mut self, end: Timestamp) -> Self {
        self.end_date_time = Some(end);
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

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn total_cost(mut self, cost: Price) -> Self {
        self.total_cost = Some(cost);
        self
    }

    pub fn total_energy(mut self, kwh: f64) -> Self {
        self.total_energy = Some(kwh);
        self
    }

    pub fn total_time(mut self, hours: f64) -> Self {
        self.total_time = Some(hours);
        self
    }

    pub fn charging_periods(mut self, periods: impl Into<Arc<[ChargingPeriod]>>) -> Self {
        self.charging_periods = Some(periods.into());
        self
    }

    pub fn remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }
}

impl ResourceBuilder for CdrBuilder {
    type Resource = Cdr;

    fn meta_mut(&mut self) -> &mut MetaBuilder {
        &mut self.meta
    }

    fn finish(self, warnings: &mut Warnings) -> Option<Cdr> {
        let before = warnings.len();
        let meta = self.meta.finish(warnings);
        let start = require(self.start_date_time, "start_date_time must be set", warnings);
        let end = require(self.end_date_time, "end_date_time must be set", warnings);
        common::period(start, end, warnings);
        let cdr_token = require(self.cdr_token, "cdr_token must be set", warnings);
        if let Some(token) = &cdr_token {
            token.validate(warnings);
        }
        let auth_method = require(self.auth_method, "auth_method must be set", warnings);
        let currency = common::currency(self.currency, warnings);
        let total_cost = require(self.total_cost, "total_cost must be set", warnings);
        if let Some(cost) = &total_cost {
            cost.validate(TOTAL_COST, warnings);
        }
        let total_energy = require(self.total_energy, "total_energy must be set", warnings);
        if let Some(kwh) = total_energy {
            common::non_negative(TOTAL_ENERGY, kwh, warnings);
        }
        let total_time = require(self.total_time, "total_time must be set", warnings);
        if let Some(hours) = total_time {
            common::non_negative(TOTAL_TIME, hours, warnings);
        }
        let charging_periods = list_or_empty(self.charging_periods);
        if charging_periods.is_empty() {
            warnings.push("charging_periods must not be empty");
        }
        for (i, period) in charging_periods.iter().enumerate() {
            period.validate(i, warnings);
        }

        if warnings.len() > before {
            return None;
        }
        Some(Cdr {
            meta: meta?,
            start_date_time: start?,
            end_date_time: end?,
            cdr_token: cdr_token?,
            auth_method: auth_method?,
            currency: currency?,
            total_cost: total_cost?,
            total_energy: total_energy?,
            total_time: total_time?,
            charging_periods,
            remark: self.remark,
        })
    }
}
