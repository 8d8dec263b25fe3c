//! Tariffs: how a charging session is priced.

use std::sync::Arc;

use roam_core::meta::{list_or_empty, require};
use roam_core::{FieldReader, FieldWriter, Meta, MetaBuilder, ParseError, Resource, ResourceBuilder, Timestamp, Warnings};
use serde::{Deserialize, Serialize};

use crate::common::{self, DisplayText, Price};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TariffType {
    AdHocPayment,
    ProfileCheap,
    ProfileFast,
    ProfileGreen,
    Regular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TariffDimensionType {
    Energy,
    Flat,
    ParkingTime,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceComponent {
    #[serde(rename = "type")]
    pub dimension_type: TariffDimensionType,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<f64>,
    pub step_size: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffRestrictions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_kwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_kwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub day_of_week: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffElement {
    pub price_components: Vec<PriceComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<TariffRestrictions>,
}

impl TariffElement {
    pub fn new(price_components: Vec<PriceComponent>) -> Self {
        Self {
            price_components,
            restrictions: None,
        }
    }
}

const CURRENCY: &str = "currency";
const TYPE: &str = "type";
const TARIFF_ALT_TEXT: &str = "tariff_alt_text";
const TARIFF_ALT_URL: &str = "tariff_alt_url";
const MIN_PRICE: &str = "min_price";
const MAX_PRICE: &str = "max_price";
const ELEMENTS: &str = "elements";
const START_DATE_TIME: &str = "start_date_time";
const END_DATE_TIME: &str = "end_date_time";

#[derive(Debug, Clone)]
pub struct Tariff {
    meta: Meta,
    currency: String,
    tariff_type: Option<TariffType>,
    tariff_alt_text: Arc<[DisplayText]>,
    tariff_alt_url: Option<String>,
    min_price: Option<Price>,
    max_price: Option<Price>,
    elements: Arc<[TariffElement]>,
    start_date_time: Option<Timestamp>,
    end_date_time: Option<Timestamp>,
}

impl Tariff {
    pub fn builder() -> TariffBuilder {
        TariffBuilder::default()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn tariff_type(&self) -> Option<TariffType> {
        self.tariff_type
    }

    pub fn tariff_alt_text(&self) -> &[DisplayText] {
        &self.tariff_alt_text
    }

    pub fn tariff_alt_url(&self) -> Option<&str> {
        self.tariff_alt_url.as_deref()
    }

    pub fn min_price(&self) -> Option<&Price> {
        self.min_price.as_ref()
    }

    pub fn max_price(&self) -> Option<&Price> {
        self.max_price.as_ref()
    }

    pub fn elements(&self) -> &[TariffElement] {
        &self.elements
    }

    pub fn start_date_time(&self) -> Option<Timestamp> {
        self.start_date_time
    }

    pub fn end_date_time(&self) -> Option<Timestamp> {
        self.end_date_time
    }
}

impl Resource for Tariff {
    type Builder = TariffBuilder;

    const KIND: &'static str = "tariff";
    const VERSIONED: bool = true;
    const PROTECTED_FIELDS: &'static [&'static str] = &[CURRENCY];

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn write_fields(&self, out: &mut FieldWriter<'_>) {
        out.put_str(CURRENCY, &self.currency);
        out.put_opt(TYPE, self.tariff_type.as_ref());
        out.put_list(TARIFF_ALT_TEXT, &self.tariff_alt_text);
        out.put_opt_str(TARIFF_ALT_URL, self.tariff_alt_url.as_deref());
        out.put_opt(MIN_PRICE, self.min_price.as_ref());
        out.put_opt(MAX_PRICE, self.max_price.as_ref());
        out.put_required_list(ELEMENTS, &self.elements);
        out.put_opt_timestamp(START_DATE_TIME, self.start_date_time.as_ref());
        out.put_opt_timestamp(END_DATE_TIME, self.end_date_time.as_ref());
    }

    fn read_fields(builder: &mut TariffBuilder, fields: &mut FieldReader<'_>) -> Result<(), ParseError> {
        builder.currency = fields.string(CURRENCY)?;
        builder.tariff_type = fields.value(TYPE)?;
        builder.tariff_alt_text = fields.list(TARIFF_ALT_TEXT)?.map(Arc::from);
        builder.tariff_alt_url = fields.string(TARIFF_ALT_URL)?;
        builder.min_price = fields.value(MIN_PRICE)?;
        builder.max_price = fields.value(MAX_PRICE)?;
        builder.elements = fields.list(ELEMENTS)?.map(Arc::from);
        builder.start_date_time = fields.timestamp(START_DATE_TIME)?;
        builder.end_date_time = fields.timestamp(END_DATE_TIME)?;
        Ok(())
    }

    fn to_builder(&self) -> TariffBuilder {
        TariffBuilder {
            meta: MetaBuilder::from_meta(&self.meta),
            currency: Some(self.currency.clone()),
            tariff_type: self.tariff_type,
            tariff_alt_text: Some(Arc::clone(&self.tariff_alt_text)),
            tariff_alt_url: self.tariff_alt_url.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            elements: Some(Arc::clone(&self.elements)),
            start_date_time: self.start_date_time,
            end_date_time: self.end_date_time,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TariffBuilder {
    meta: MetaBuilder,
    currency: Option<String>,
    tariff_type: Option<TariffType>,
    tariff_alt_text: Option<Arc<[DisplayText]>>,
    tariff_alt_url: Option<String>,
    min_price: Option<Price>,
    max_price: Option<Price>,
    elements: Option<Arc<[TariffElement]>>,
    start_date_time: Option<Timestamp>,
    end_date_time: Option<Timestamp>,
}

impl TariffBuilder {
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn tariff_type(mut self, tariff_type: TariffType) -> Self {
        self.tariff_type = Some(tariff_type);
        self
    }

    pub fn tariff_alt_text(mut self, texts: impl Into<Arc<[DisplayText]>>) -> Self {
        self.tariff_alt_text = Some(texts.into());
        self
    }

    pub fn tariff_alt_url(mut self, url: impl Into<String>) -> Self {
        self.tariff_alt_url = Some(url.into());
        self
    }

    pub fn min_price(mut self, price: Price) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn max_price(mut self, price: Price) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn elements(mut self, elements: impl Into<Arc<[TariffElement]>>) -> Self {
        self.elements = Some(elements.into());
        self
    }

    pub fn start_date_time(mut self, start: Timestamp) -> Self {
        self.start_date_time = Some(start);
        self
    }

    pub fn end_date_time(mut self, end: Timestamp) -> Self {
        self.end_date_time = Some(end);
        self
    }
}

impl ResourceBuilder for TariffBuilder {
    type Resource = Tariff;

    fn meta_mut(&mut self) -> &mut MetaBuilder {
        &mut self.meta
    }

    fn finish(self, warnings: &mut Warnings) -> Option<Tariff> {
        let before = warnings.len();
        let meta = self.meta.finish(warnings);
        let currency = common::currency(self.currency, warnings);

        let elements = require(self.elements, "elements must not be empty", warnings);
        if let Some(elements) = &elements {
            if elements.is_empty() {
                warnings.push("elements must not be empty");
            }
            for (i, element) in elements.iter().enumerate() {
                if element.price_components.is_empty() {
                    warnings.push(format!("elements[{i}] must have at least one price component"));
                }
                for component in &element.price_components {
                    common::non_negative(&format!("elements[{i}].price"), component.price, warnings);
                }
            }
        }

        if let Some(price) = &self.min_price {
            price.validate(MIN_PRICE, warnings);
        }
        if let Some(price) = &self.max_price {
            price.validate(MAX_PRICE, warnings);
        }
        if let (Some(min), Some(max)) = (&self.min_price, &self.max_price) {
            if max.excl_vat < min.excl_vat {
                warnings.push("max_price must not be lower than min_price");
            }
        }
        common::strict_period(self.start_date_time, self.end_date_time, warnings);

        if warnings.len() > before {
            return None;
        }
        Some(Tariff {
            meta: meta?,
            currency: currency?,
            tariff_type: self.tariff_type,
            tariff_alt_text: list_or_empty(self.tariff_alt_text),
            tariff_alt_url: self.tariff_alt_url,
            min_price: self.min_price,
            max_price: self.max_price,
            elements: elements?,
            start_date_time: self.start_date_time,
            end_date_time: self.end_date_time,
        })
    }
}
