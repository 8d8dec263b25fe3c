//! Core machinery for versioned roaming resources.
//!
//! Every resource type gets, from one generic implementation:
//! - a canonical serializer with optional sections and a customization hook
//!   ([`serialize`]);
//! - a content hash exposed as an opaque change token ([`etag`]);
//! - an RFC 7396 merge-patch engine with protected fields and monotonic
//!   `last_updated` ([`merge_patch`]);
//! - builder validation that reports warnings instead of failing
//!   ([`resource::ResourceBuilder`]);
//! - a total order and structural equality over snapshots ([`snapshot`]).
//!
//! Resource types themselves live in the `roam` crate.

pub mod error;
pub mod etag;
pub mod fields;
pub mod handle;
pub mod identity;
pub mod merge_patch;
pub mod meta;
pub mod resource;
pub mod serialize;
pub mod snapshot;
pub mod timestamp;
pub mod trace;

pub use error::{ParseError, PatchError, PatchErrorKind};
pub use etag::ETag;
pub use fields::{FieldReader, FieldWriter};
pub use handle::ResourceHandle;
pub use identity::{Identity, PartyId, UrlIdentity};
pub use merge_patch::{apply, apply_str, merge, PatchOptions, ProtectedFieldViolation, ProtectedFields};
pub use meta::{Meta, MetaBuilder};
pub use resource::{try_parse, try_parse_str, Resource, ResourceBuilder, Warnings};
pub use serialize::{serialize, serialize_map, Customizer, SerializeFlags, SerializeOptions};
pub use snapshot::{Snapshot, SnapshotKey};
pub use timestamp::Timestamp;
pub use trace::TraceId;
