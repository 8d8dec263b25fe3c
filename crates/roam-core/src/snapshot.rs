//! Published, immutable resource values and their comparator.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use roam_util::{structural_hash, unordered_equal};
use serde_json::Value;

use crate::etag::ETag;
use crate::identity::Identity;
use crate::resource::Resource;
use crate::serialize::{serialize, SerializeOptions};
use crate::timestamp::Timestamp;

/// An immutable, validated resource value plus its change token.
///
/// Cloning is cheap: the resource is shared. The change token is computed
/// when the snapshot is constructed; the structural hash code is computed on
/// first use and cached.
pub struct Snapshot<R: Resource> {
    resource: Arc<R>,
    etag: ETag,
    hash_code: OnceLock<u32>,
}

/// Sort key of a snapshot: identity, then `last_updated`, then the change
/// token as the final tie-break. The derived order is the snapshot order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotKey {
    pub identity: Identity,
    pub last_updated: Timestamp,
    pub etag: ETag,
}

impl<R: Resource> Snapshot<R> {
    pub(crate) fn new(resource: R) -> Self {
        let etag = ETag::compute(&resource, &R::hash_options());
        Self {
            resource: Arc::new(resource),
            etag,
            hash_code: OnceLock::new(),
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn etag(&self) -> &ETag {
        &self.etag
    }

    pub fn serialize(&self, options: &SerializeOptions<R>) -> Value {
        serialize(self.resource(), options)
    }

    /// Full-fidelity canonical tree, without any customization hook.
    pub fn to_canonical(&self) -> Value {
        self.serialize(&SerializeOptions::default())
    }

    /// Order-insensitive structural hash of the canonical tree.
    pub fn hash_code(&self) -> u32 {
        *self.hash_code.get_or_init(|| structural_hash(&self.to_canonical()))
    }

    pub fn sort_key(&self) -> SnapshotKey {
        SnapshotKey {
            identity: self.identity().clone(),
            last_updated: self.last_updated(),
            etag: self.etag.clone(),
        }
    }

    /// Total order used for deterministic indexing.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.identity()
            .cmp(other.identity())
            .then_with(|| self.last_updated().cmp(&other.last_updated()))
            .then_with(|| self.etag.cmp(&other.etag))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<R: Resource> Deref for Snapshot<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.resource
    }
}

impl<R: Resource> Clone for Snapshot<R> {
    fn clone(&self) -> Self {
        Self {
            resource: Arc::clone(&self.resource),
            etag: self.etag.clone(),
            hash_code: self.hash_code.clone(),
        }
    }
}

/// Structural equality: identity, every scalar field, and every collection
/// compared by membership rather than position.
impl<R: Resource> PartialEq for Snapshot<R> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.identity() != other.identity() || self.hash_code() != other.hash_code() {
            return false;
        }
        unordered_equal(&self.to_canonical(), &other.to_canonical())
    }
}

impl<R: Resource> Eq for Snapshot<R> {}

impl<R: Resource> Hash for Snapshot<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl<R: Resource> fmt::Debug for Snapshot<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("kind", &R::KIND)
            .field("identity", self.identity())
            .field("last_updated", &self.last_updated())
            .field("etag", &self.etag)
            .finish()
    }
}
