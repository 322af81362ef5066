//! Latest published snapshot.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::Snapshot;
use crate::error::Result;

/// Single-cell store holding the most recent [`Snapshot`].
///
/// Cloning shares the cell. Readers get an `Arc` to an immutable snapshot and
/// keep seeing the previous value until a new one is published.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    latest: Arc<RwLock<Option<Arc<Snapshot>>>>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest.read().clone()
    }

    /// Replace the current snapshot.
    ///
    /// A timestamp older than the current one is raised to it, so published
    /// timestamps never go backwards.
    pub fn publish(&self, mut snapshot: Snapshot) -> Arc<Snapshot> {
        let mut latest = self.latest.write();
        if let Some(current) = latest.as_ref() {
            if snapshot.timestamp < current.timestamp {
                snapshot.timestamp = current.timestamp;
            }
        }
        let snapshot = Arc::new(snapshot);
        *latest = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// JSON document for downstream readers; `null` before the first publish.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.latest().as_deref())?)
    }
}
