use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::model::{Location, Snapshot};
use crate::repository::SnapshotRepository;

/// On-disk shape of the archive file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ArchiveFile {
    locations: Vec<Location>,
    snapshots: Vec<Snapshot>,
}

/// JSON-file-backed snapshot store.
///
/// This is the persistence collaborator the analytics engine reads
/// through [`SnapshotRepository`]; the write side (`register_location`,
/// `append_snapshot`) is used only by ingest, never by the engine.
/// The whole archive is loaded per call; history sizes here are CLI
/// scale, not database scale.
#[derive(Debug, Clone)]
pub struct ArchiveRepository {
    path: PathBuf,
}

impl ArchiveRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Archive under the platform data directory, e.g.
    /// `~/.local/share/skystats/archive.json` on Linux.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skystats", "skystats")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;
        Ok(dirs.data_dir().join("archive.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<ArchiveFile> {
        if !self.path.exists() {
            // First run: nothing recorded yet.
            return Ok(ArchiveFile::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read archive file: {}", self.path.display()))?;

        let archive: ArchiveFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse archive file: {}", self.path.display()))?;

        debug!(
            "loaded archive: {} locations, {} snapshots",
            archive.locations.len(),
            archive.snapshots.len()
        );
        Ok(archive)
    }

    fn save(&self, archive: &ArchiveFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create archive directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string_pretty(archive).context("Failed to serialize archive")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write archive file: {}", self.path.display()))?;

        Ok(())
    }

    /// Returns the existing location with this exact name, or registers a
    /// new one with the next free id.
    pub fn register_location(
        &self,
        name: &str,
        country: &str,
        lat: f64,
        lon: f64,
    ) -> Result<Location> {
        let mut archive = self.load()?;

        if let Some(existing) = archive.locations.iter().find(|l| l.name == name) {
            return Ok(existing.clone());
        }

        let id = archive.locations.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let location = Location {
            id,
            name: name.to_string(),
            country: country.to_string(),
            lat,
            lon,
            created_at: Utc::now(),
        };
        info!("registering location '{name}' (id {id})");
        archive.locations.push(location.clone());
        self.save(&archive)?;
        Ok(location)
    }

    /// Appends one observation, assigning it the next free snapshot id.
    pub fn append_snapshot(&self, mut snapshot: Snapshot) -> Result<Snapshot> {
        let mut archive = self.load()?;

        if !archive.locations.iter().any(|l| l.id == snapshot.location_id) {
            return Err(anyhow!(
                "no registered location with id {}",
                snapshot.location_id
            ));
        }

        snapshot.id = archive.snapshots.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        archive.snapshots.push(snapshot.clone());
        self.save(&archive)?;
        debug!(
            "appended snapshot {} for location {}",
            snapshot.id, snapshot.location_id
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl SnapshotRepository for ArchiveRepository {
    async fn get_snapshots(
        &self,
        location_id: u32,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> anyhow::Result<Vec<Snapshot>> {
        let archive = self.load()?;
        Ok(archive
            .snapshots
            .into_iter()
            .filter(|s| {
                s.location_id == location_id
                    && start.is_none_or(|from| s.recorded_at >= from)
                    && end.is_none_or(|until| s.recorded_at <= until)
            })
            .collect())
    }

    async fn resolve_location(&self, name: &str) -> anyhow::Result<Option<Location>> {
        let archive = self.load()?;
        Ok(archive.locations.into_iter().find(|l| l.name == name))
    }

    async fn list_locations(&self) -> anyhow::Result<Vec<Location>> {
        Ok(self.load()?.locations)
    }
}
