use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{Location, Snapshot};
use crate::repository::SnapshotRepository;

/// In-memory repository. Used by tests and as a seed source; holds
/// whatever locations and snapshots it was constructed with, in whatever
/// order they were pushed.
#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    locations: Vec<Location>,
    snapshots: Vec<Snapshot>,
}

impl MemoryRepository {
    pub fn new(locations: Vec<Location>, snapshots: Vec<Snapshot>) -> Self {
        Self { locations, snapshots }
    }

    pub fn push_location(&mut self, location: Location) {
        self.locations.push(location);
    }

    pub fn push_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }
}

#[async_trait]
impl SnapshotRepository for MemoryRepository {
    async fn get_snapshots(
        &self,
        location_id: u32,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> anyhow::Result<Vec<Snapshot>> {
        Ok(self
            .snapshots
            .iter()
            .filter(|s| {
                s.location_id == location_id
                    && start.is_none_or(|from| s.recorded_at >= from)
                    && end.is_none_or(|until| s.recorded_at <= until)
            })
            .cloned()
            .collect())
    }

    async fn resolve_location(&self, name: &str) -> anyhow::Result<Option<Location>> {
        Ok(self.locations.iter().find(|l| l.name == name).cloned())
    }

    async fn list_locations(&self) -> anyhow::Result<Vec<Location>> {
        Ok(self.locations.clone())
    }
}
