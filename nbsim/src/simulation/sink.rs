//! Snapshots and the sink they are delivered to
//!
//! A [`Snapshot`] is the JSON array of every body at one instant, encoded
//! once and shared by reference count, so fanning it out to many viewers
//! never re-serializes. A [`SnapshotSink`] is whatever the tick loop hands
//! each snapshot to; it may have zero or many destinations behind it.

use std::fmt;
use std::sync::Arc;

use tracing::error;

use crate::simulation::states::Body;

/// The literal snapshot of an empty simulation
pub const EMPTY_SNAPSHOT: &str = "[]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Arc<str>);

impl Snapshot {
    pub fn empty() -> Self {
        Snapshot(Arc::from(EMPTY_SNAPSHOT))
    }

    pub fn from_bodies(bodies: &[Body]) -> Self {
        if bodies.is_empty() {
            return Self::empty();
        }
        match serde_json::to_string(bodies) {
            Ok(json) => Snapshot(Arc::from(json)),
            Err(err) => {
                error!(%err, "failed to encode snapshot");
                Self::empty()
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode back into bodies
    pub fn bodies(&self) -> Result<Vec<Body>, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Receiver of every snapshot the tick loop produces
///
/// `deliver` is called from the tick thread and must not block: a sink that
/// fans out to slow destinations has to buffer or drop rather than wait.
pub trait SnapshotSink: Send + Sync {
    fn deliver(&self, snapshot: &Snapshot);
}

/// Sink with no destinations
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn deliver(&self, _snapshot: &Snapshot) {}
}

impl<T: SnapshotSink + ?Sized> SnapshotSink for Arc<T> {
    fn deliver(&self, snapshot: &Snapshot) {
        (**self).deliver(snapshot)
    }
}
