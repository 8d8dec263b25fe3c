#![allow(dead_code)]

use roam::{Resource, Snapshot, UrlIdentity};
use roam_core::{timestamp, Timestamp};
use serde_json::{json, Value};

pub const T0: &str = "2024-01-01T00:00:00Z";

pub fn ts(text: &str) -> Timestamp {
    timestamp::parse(text).unwrap()
}

pub fn parse<R: Resource>(doc: &Value) -> Snapshot<R> {
    R::try_parse(doc, &UrlIdentity::none()).unwrap_or_else(|e| panic!("fixture does not parse: {e}"))
}

/// The minimal EVSE used by the walkthrough scenarios.
pub fn evse_minimal() -> Value {
    json!({
        "country_code": "DE",
        "party_id": "GEF",
        "id": "E1",
        "status": "AVAILABLE",
        "connectors": [connector()],
        "last_updated": T0
    })
}

pub fn connector() -> Value {
    json!({
        "id": "1",
        "standard": "IEC_62196_T2",
        "format": "SOCKET",
        "power_type": "AC_3_PHASE",
        "max_voltage": 400,
        "max_amperage": 32
    })
}

pub fn evse() -> Value {
    json!({
        "country_code": "DE",
        "party_id": "GEF",
        "id": "E1",
        "status": "AVAILABLE",
        "evse_id": "DE*GEF*E1",
        "capabilities": ["RFID_READER", "REMOTE_START_STOP_CAPABLE"],
        "connectors": [connector()],
        "floor_level": "-1",
        "coordinates": {"latitude": 50.77, "longitude": 6.08},
        "directions": [{"language": "en", "text": "Second bay on the left"}],
        "extensions": {"acme": {"slot": 7, "tags": ["fast", "covered"]}},
        "created": "2023-12-01T08:00:00Z",
        "last_updated": "2024-01-01T12:00:00Z"
    })
}

pub fn tariff() -> Value {
    json!({
        "country_code": "DE",
        "party_id": "GEF",
        "id": "T1",
        "version": 3,
        "currency": "EUR",
        "type": "REGULAR",
        "tariff_alt_text": [{"language": "en", "text": "0.35 EUR/kWh"}],
        "min_price": {"excl_vat": 1.0, "incl_vat": 1.19},
        "elements": [{
            "price_components": [{"type": "ENERGY", "price": 0.35, "vat": 19.0, "step_size": 1}],
            "restrictions": {"start_time": "08:00", "end_time": "20:00", "day_of_week": ["MONDAY", "TUESDAY"]}
        }],
        "start_date_time": "2024-01-01T00:00:00Z",
        "created": "2023-12-01T08:00:00Z",
        "last_updated": "2024-01-01T12:00:00Z"
    })
}

pub fn token() -> Value {
    json!({
        "country_code": "NL",
        "party_id": "TNM",
        "id": "012345678",
        "type": "RFID",
        "contract_id": "NL8ACC12E46L89",
        "visual_number": "DF000-2001-8999-1",
        "issuer": "TheNewMotion",
        "group_id": "DF000-2001-8999",
        "valid": true,
        "whitelist": "ALLOWED",
        "language": "nl",
        "energy_contract": {"supplier_name": "Greenpower", "contract_id": "0123456789"},
        "last_updated": "2024-02-27T15:56:46Z"
    })
}

pub fn cdr_token() -> Value {
    json!({"uid": "012345678", "type": "RFID", "contract_id": "NL8ACC12E46L89"})
}

pub fn session() -> Value {
    json!({
        "country_code": "BE",
        "party_id": "BEC",
        "id": "S101",
        "version": 2,
        "start_date_time": "2024-03-01T10:00:00Z",
        "kwh": 11.5,
        "cdr_token": cdr_token(),
        "auth_method": "WHITELIST",
        "location_id": "LOC1",
        "evse_uid": "3256",
        "connector_id": "1",
        "currency": "EUR",
        "charging_periods": [{
            "start_date_time": "2024-03-01T10:00:00Z",
            "dimensions": [{"type": "ENERGY", "volume": 11.5}],
            "tariff_id": "T1"
        }],
        "total_cost": {"excl_vat": 4.0, "incl_vat": 4.84},
        "status": "ACTIVE",
        "last_updated": "2024-03-01T11:00:00Z"
    })
}

pub fn cdr() -> Value {
    json!({
        "country_code": "BE",
        "party_id": "BEC",
        "id": "C12345",
        "start_date_time": "2024-03-01T10:00:00Z",
        "end_date_time": "2024-03-01T11:30:00Z",
        "cdr_token": cdr_token(),
        "auth_method": "WHITELIST",
        "currency": "EUR",
        "total_cost": {"excl_vat": 4.0, "incl_vat": 4.84},
        "total_energy": 15.342,
        "total_time": 1.5,
        "charging_periods": [{
            "start_date_time": "2024-03-01T10:00:00Z",
            "dimensions": [{"type": "ENERGY", "volume": 15.342}, {"type": "TIME", "volume": 1.5}]
        }],
        "remark": "charged to full",
        "last_updated": "2024-03-01T12:00:00Z"
    })
}
