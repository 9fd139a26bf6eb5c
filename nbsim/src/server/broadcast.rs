//! Broadcast sink: fans each snapshot out to every connected viewer.
//!
//! Built on `tokio::sync::broadcast`. Every viewer session owns its own
//! receiver, so joining or leaving never touches a shared iteration, and
//! `deliver` never waits on a viewer: one that falls more than `capacity`
//! snapshots behind loses the oldest ones (it lags) while everyone else,
//! and the tick loop, carry on.

use tokio::sync::broadcast;

use crate::simulation::sink::{Snapshot, SnapshotSink};

#[derive(Debug)]
pub struct Broadcaster {
    tx: broadcast::Sender<Snapshot>,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        // tokio panics on a zero-capacity channel
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    pub fn viewer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl SnapshotSink for Broadcaster {
    fn deliver(&self, snapshot: &Snapshot) {
        // Err only means nobody is watching right now
        let _ = self.tx.send(snapshot.clone());
    }
}
