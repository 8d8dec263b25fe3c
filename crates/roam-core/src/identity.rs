//! Resource identity: issuing party, resource id and version.

use std::fmt;

/// The issuing party of a resource (`country_code` + `party_id`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartyId {
    pub country_code: String,
    pub party_id: String,
}

impl PartyId {
    pub fn new(country_code: impl Into<String>, party_id: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            party_id: party_id.into(),
        }
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.country_code, self.party_id)
    }
}

/// Identity of a snapshot. The derived order (party, id, version) is the
/// leading part of the snapshot comparator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity {
    pub party: PartyId,
    pub id: String,
    pub version: u64,
}

impl Identity {
    pub fn new(party: PartyId, id: impl Into<String>, version: u64) -> Self {
        Self {
            party,
            id: id.into(),
            version,
        }
    }

    /// Same party and resource id, regardless of version.
    pub fn same_resource(&self, other: &Identity) -> bool {
        self.party == other.party && self.id == other.id
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.party, self.id, self.version)
    }
}

/// Identity supplied out of band (e.g. taken from a request path).
///
/// Every component that is `Some` must agree with the document body; when the
/// body omits a component the out-of-band value is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlIdentity {
    pub party: Option<PartyId>,
    pub id: Option<String>,
}

impl UrlIdentity {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(party: PartyId, id: impl Into<String>) -> Self {
        Self {
            party: Some(party),
            id: Some(id.into()),
        }
    }

    pub fn party(party: PartyId) -> Self {
        Self {
            party: Some(party),
            id: None,
        }
    }
}

impl From<&Identity> for UrlIdentity {
    fn from(identity: &Identity) -> Self {
        Self::new(identity.party.clone(), identity.id.clone())
    }
}
