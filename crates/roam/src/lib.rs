//! roam: the roaming resource types built on `roam-core`.
//!
//! Five resources share one serializer, change-token calculator and
//! merge-patch engine:
//! - [`evse::Evse`]: charging equipment status;
//! - [`tariff::Tariff`]: pricing;
//! - [`token::Token`]: authorization tokens;
//! - [`session::Session`]: running charging sessions;
//! - [`cdr::Cdr`]: billed charge detail records.
//!
//! The [`cli`] module holds the logic behind the `roam-patch` and
//! `roam-etag` binaries.

pub mod cdr;
pub mod cli;
pub mod common;
pub mod evse;
pub mod session;
pub mod tariff;
pub mod token;

pub use cdr::{Cdr, CdrBuilder};
pub use evse::{Evse, EvseBuilder, EvseStatus};
pub use session::{Session, SessionBuilder, SessionStatus};
pub use tariff::{Tariff, TariffBuilder};
pub use token::{Token, TokenBuilder};

pub use roam_core::{
    ETag, PartyId, PatchError, PatchErrorKind, PatchOptions, Resource, ResourceBuilder, ResourceHandle,
    SerializeFlags, SerializeOptions, Snapshot, TraceId, UrlIdentity, Warnings,
};
