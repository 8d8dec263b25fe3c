//! Charging equipment (EVSE) records.
//!
//! Not versioned. The connector list is structural: it is managed through
//! full replacement, never through a merge-patch.

use std::sync::Arc;

use roam_core::meta::{list_or_empty, require};
use roam_core::{FieldReader, FieldWriter, Meta, MetaBuilder, ParseError, Resource, ResourceBuilder, Warnings};
use serde::{Deserialize, Serialize};

use crate::common::{DisplayText, GeoCoordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvseStatus {
    Available,
    Blocked,
    Charging,
    Inoperative,
    #[serde(rename = "OUTOFORDER")]
    OutOfOrder,
    Planned,
    Removed,
    Reserved,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    ChargingProfileCapable,
    CreditCardPayable,
    DebitCardPayable,
    Reservable,
    RfidReader,
    RemoteStartStopCapable,
    UnlockCapable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorStandard {
    #[serde(rename = "CHADEMO")]
    Chademo,
    #[serde(rename = "DOMESTIC_F")]
    DomesticF,
    #[serde(rename = "IEC_62196_T2")]
    Iec62196T2,
    #[serde(rename = "IEC_62196_T2_COMBO")]
    Iec62196T2Combo,
    #[serde(rename = "TESLA_S")]
    TeslaS,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorFormat {
    Socket,
    Cable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerType {
    #[serde(rename = "AC_1_PHASE")]
    Ac1Phase,
    #[serde(rename = "AC_3_PHASE")]
    Ac3Phase,
    #[serde(rename = "DC")]
    Dc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Connector {
    pub id: String,
    pub standard: ConnectorStandard,
    pub format: ConnectorFormat,
    pub power_type: PowerType,
    pub max_voltage: u32,
    pub max_amperage: u32,
}

const STATUS: &str = "status";
const EVSE_ID: &str = "evse_id";
const CAPABILITIES: &str = "capabilities";
const CONNECTORS: &str = "connectors";
const FLOOR_LEVEL: &str = "floor_level";
const COORDINATES: &str = "coordinates";
const PHYSICAL_REFERENCE: &str = "physical_reference";
const DIRECTIONS: &str = "directions";

#[derive(Debug, Clone)]
pub struct Evse {
    meta: Meta,
    status: EvseStatus,
    evse_id: Option<String>,
    capabilities: Arc<[Capability]>,
    connectors: Arc<[Connector]>,
    floor_level: Option<String>,
    coordinates: Option<GeoCoordinates>,
    physical_reference: Option<String>,
    directions: Arc<[DisplayText]>,
}

impl Evse {
    pub fn builder() -> EvseBuilder {
        EvseBuilder::default()
    }

    pub fn status(&self) -> EvseStatus {
        self.status
    }

    pub fn evse_id(&self) -> Option<&str> {
        self.evse_id.as_deref()
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn floor_level(&self) -> Option<&str> {
        self.floor_level.as_deref()
    }

    pub fn coordinates(&self) -> Option<&GeoCoordinates> {
        self.coordinates.as_ref()
    }

    pub fn physical_reference(&self) -> Option<&str> {
        self.physical_reference.as_deref()
    }

    pub fn directions(&self) -> &[DisplayText] {
        &self.directions
    }
}

impl Resource for Evse {
    type Builder = EvseBuilder;

    const KIND: &'static str = "evse";
    const PROTECTED_FIELDS: &'static [&'static str] = &[CONNECTORS];

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn write_fields(&self, out: &mut FieldWriter<'_>) {
        out.put(STATUS, &self.status);
        out.put_opt_str(EVSE_ID, self.evse_id.as_deref());
        out.put_list(CAPABILITIES, &self.capabilities);
        out.put_required_list(CONNECTORS, &self.connectors);
        out.put_opt_str(FLOOR_LEVEL, self.floor_level.as_deref());
        out.put_opt(COORDINATES, self.coordinates.as_ref());
        out.put_opt_str(PHYSICAL_REFERENCE, self.physical_reference.as_deref());
        out.put_list(DIRECTIONS, &self.directions);
    }

    fn read_fields(builder: &mut EvseBuilder, fields: &mut FieldReader<'_>) -> Result<(), ParseError> {
        builder.status = fields.value(STATUS)?;
        builder.evse_id = fields.string(EVSE_ID)?;
        builder.capabilities = fields.list(CAPABILITIES)?.map(Arc::from);
        builder.connectors = fields.list(CONNECTORS)?.map(Arc::from);
        builder.floor_level = fields.string(FLOOR_LEVEL)?;
        builder.coordinates = fields.value(COORDINATES)?;
        builder.physical_reference = fields.string(PHYSICAL_REFERENCE)?;
        builder.directions = fields.list(DIRECTIONS)?.map(Arc::from);
        Ok(())
    }

    fn to_builder(&self) -> EvseBuilder {
        EvseBuilder {
            meta: MetaBuilder::from_meta(&self.meta),
            status: Some(self.status),
            evse_id: self.evse_id.clone(),
            capabilities: Some(Arc::clone(&self.capabilities)),
            connectors: Some(Arc::clone(&self.connectors)),
            floor_level: self.floor_level.clone(),
            coordinates: self.coordinates,
            physical_reference: self.physical_reference.clone(),
            directions: Some(Arc::clone(&self.directions)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvseBuilder {
    meta: MetaBuilder,
    status: Option<EvseStatus>,
    evse_id: Option<String>,
    capabilities: Option<Arc<[Capability]>>,
    connectors: Option<Arc<[Connector]>>,
    floor_level: Option<String>,
    coordinates: Option<GeoCoordinates>,
    physical_reference: Option<String>,
    directions: Option<Arc<[DisplayText]>>,
}

impl EvseBuilder {
    pub fn status(mut self, status: EvseStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn evse_id(mut self, evse_id: impl Into<String>) -> Self {
        self.evse_id = Some(evse_id.into());
        self
    }

    pub fn capabilities(mut self, capabilities: impl Into<Arc<[Capability]>>) -> Self {
        self.capabilities = Some(capabilities.into());
        self
    }

    pub fn connectors(mut self, connectors: impl Into<Arc<[Connector]>>) -> Self {
        self.connectors = Some(connectors.into());
        self
    }

    pub fn floor_level(mut self, floor_level: impl Into<String>) -> Self {
        self.floor_level = Some(floor_level.into());
        self
    }

    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(GeoCoordinates { latitude, longitude });
        self
    }

    pub fn physical_reference(mut self, physical_reference: impl Into<String>) -> Self {
        self.physical_reference = Some(physical_reference.into());
        self
    }

    pub fn directions(mut self, directions: impl Into<Arc<[DisplayText]>>) -> Self {
        self.directions = Some(directions.into());
        self
    }
}

impl ResourceBuilder for EvseBuilder {
    type Resource = Evse;

    fn meta_mut(&mut self) -> &mut MetaBuilder {
        &mut self.meta
    }

    fn finish(self, warnings: &mut Warnings) -> Option<Evse> {
        let before = warnings.len();
        let meta = self.meta.finish(warnings);
        let status = require(self.status, "status must be set", warnings);
        let connectors = list_or_empty(self.connectors);
        if connectors.is_empty() {
            warnings.push("connectors must not be empty");
        }
        for (i, connector) in connectors.iter().enumerate() {
            if connector.id.trim().is_empty() {
                warnings.push(format!("connectors[{i}].id must not be empty"));
            }
        }
        if let Some(coordinates) = &self.coordinates {
            coordinates.validate(warnings);
        }
        if warnings.len() > before {
            return None;
        }

        Some(Evse {
            meta: meta?,
            status: status?,
            evse_id: self.evse_id,
            capabilities: list_or_empty(self.capabilities),
            connectors,
            floor_level: self.floor_level,
            coordinates: self.coordinates,
            physical_reference: self.physical_reference,
            directions: list_or_empty(self.directions),
        })
    }
}
