//! Live handle on one resource: the current snapshot plus the lock that
//! serializes updates to it.

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{PatchError, PatchErrorKind};
use crate::etag::ETag;
use crate::merge_patch::{self, PatchOptions};
use crate::resource::Resource;
use crate::snapshot::Snapshot;

/// Holds the current snapshot of a single resource.
///
/// Updates (`patch`, `replace`) run one at a time per handle. Readers only
/// take the read lock long enough to clone the shared snapshot, so they never
/// wait for a patch computation in progress.
pub struct ResourceHandle<R: Resource> {
    current: RwLock<Snapshot<R>>,
    writer: Mutex<()>,
}

impl<R: Resource> ResourceHandle<R> {
    pub fn new(snapshot: Snapshot<R>) -> Self {
        Self {
            current: RwLock::new(snapshot),
            writer: Mutex::new(()),
        }
    }

    pub fn current(&self) -> Snapshot<R> {
        self.current.read().clone()
    }

    pub fn etag(&self) -> ETag {
        self.current.read().etag().clone()
    }

    /// Apply a merge-patch to the current snapshot and publish the result.
    /// On error the current snapshot stays published.
    pub fn patch(&self, patch: &Value, options: &PatchOptions) -> Result<Snapshot<R>, PatchError> {
        let _writer = self.writer.lock();
        let base = self.current();
        let next = merge_patch::apply(&base, patch, options)?;
        *self.current.write() = next.clone();
        Ok(next)
    }

    /// Publish a complete new snapshot of the same resource.
    ///
    /// The party and resource id must match the current snapshot, and
    /// `last_updated` must move forward unless `allow_downgrade` is set.
    pub fn replace(&self, next: Snapshot<R>, options: &PatchOptions) -> Result<Snapshot<R>, PatchError> {
        let _writer = self.writer.lock();
        let base = self.current();
        let fail = |kind: PatchErrorKind| {
            let err = PatchError::new(kind, options.trace_id.clone());
            warn!(trace_id = %options.trace_id, kind = R::KIND, id = %base.identity(), error = err.label(), "replacement rejected: {}", err.kind);
            err
        };

        if !next.identity().same_resource(base.identity()) {
            return Err(fail(PatchErrorKind::Validation(format!(
                "identity mismatch: current '{}' vs replacement '{}'",
                base.identity(),
                next.identity()
            ))));
        }
        if !options.allow_downgrade && next.last_updated() <= base.last_updated() {
            return Err(fail(PatchErrorKind::Monotonicity {
                current: base.last_updated(),
                requested: next.last_updated(),
            }));
        }

        debug!(trace_id = %options.trace_id, kind = R::KIND, id = %next.identity(), etag = %next.etag(), "snapshot replaced");
        *self.current.write() = next.clone();
        Ok(next)
    }

    pub fn into_current(self) -> Snapshot<R> {
        self.current.into_inner()
    }
}
