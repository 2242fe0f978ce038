use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{Location, Snapshot};

pub mod archive;
pub mod memory;

/// Read side of the snapshot store, as the analytics engine sees it.
///
/// Implementations may return snapshots in any order and may return an
/// empty sequence; neither is an error. A location with zero history is
/// an empty result. Anything else that goes wrong is the
/// implementation's own error, passed through to callers unchanged.
#[async_trait]
pub trait SnapshotRepository: Send + Sync + Debug {
    /// Snapshots for a location, optionally bounded by an inclusive
    /// timestamp range.
    async fn get_snapshots(
        &self,
        location_id: u32,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> anyhow::Result<Vec<Snapshot>>;

    /// Exact-match lookup of a location by name. `Ok(None)` when the name
    /// has no registration; the core never fuzzy-matches.
    async fn resolve_location(&self, name: &str) -> anyhow::Result<Option<Location>>;

    /// All registered locations.
    async fn list_locations(&self) -> anyhow::Result<Vec<Location>>;
}
