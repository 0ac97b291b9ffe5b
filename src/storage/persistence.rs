//! Snapshot persistence layer: the flush-to-disk half of the store.

use crate::core::{Item, Location, Result, StoreError};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const SNAPSHOT_FILE_NAME: &str = "shoplist.snapshot";
const SNAPSHOT_VERSION: u32 = 1;

// ============================================================================
// Store Snapshot
// ============================================================================

/// Full serialized state of a store: every live location and item plus
/// the counters needed to resume id/slot assignment.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub locations: Vec<Location>,
    pub items: Vec<Item>,
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub created_at: u64,
    pub next_slot: u64,
    pub location_count: usize,
    pub item_count: usize,
}

impl StoreSnapshot {
    pub fn new(locations: Vec<Location>, items: Vec<Item>, next_slot: u64) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let metadata = SnapshotMetadata {
            created_at,
            next_slot,
            location_count: locations.len(),
            item_count: items.len(),
        };

        Self {
            version: SNAPSHOT_VERSION,
            locations,
            items,
            metadata,
        }
    }
}

// ============================================================================
// Snapshot Manager
// ============================================================================

/// Writes and reads store snapshots. Saves go through a temp file and
/// an atomic rename so a crash mid-flush never corrupts the previous
/// snapshot.
pub struct SnapshotManager {
    snapshot_path: PathBuf,
}

impl SnapshotManager {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            snapshot_path: data_dir.as_ref().join(SNAPSHOT_FILE_NAME),
        }
    }

    pub fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        if let Some(parent) = self.snapshot_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::IoError(format!("Failed to create snapshot directory: {}", e))
            })?;
        }
        let serialized = rmp_serde::to_vec(snapshot).map_err(|e| {
            StoreError::SerializationError(format!("Failed to serialize snapshot: {}", e))
        })?;

        let temp_path = self.snapshot_path.with_extension("tmp");
        let temp_file = File::create(&temp_path)
            .map_err(|e| StoreError::IoError(format!("Failed to create temp file: {}", e)))?;
        let mut writer = BufWriter::new(temp_file);
        writer
            .write_all(&serialized)
            .map_err(|e| StoreError::IoError(format!("Failed to write snapshot: {}", e)))?;
        writer
            .flush()
            .map_err(|e| StoreError::IoError(format!("Failed to flush snapshot: {}", e)))?;
        writer
            .get_mut()
            .sync_all()
            .map_err(|e| StoreError::IoError(format!("Failed to sync snapshot: {}", e)))?;
        fs::rename(&temp_path, &self.snapshot_path)
            .map_err(|e| StoreError::IoError(format!("Failed to rename snapshot: {}", e)))?;
        Ok(())
    }

    pub fn load(&self) -> Result<Option<StoreSnapshot>> {
        if !self.snapshot_path.exists() {
            return Ok(None);
        }
        let mut file = File::open(&self.snapshot_path)
            .map_err(|e| StoreError::IoError(format!("Failed to open snapshot: {}", e)))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| StoreError::IoError(format!("Failed to read snapshot: {}", e)))?;
        let snapshot: StoreSnapshot = rmp_serde::from_slice(&data).map_err(|e| {
            StoreError::SerializationError(format!("Failed to deserialize snapshot: {}", e))
        })?;
        Ok(Some(snapshot))
    }

    pub fn exists(&self) -> bool {
        self.snapshot_path.exists()
    }

    pub fn delete(&self) -> Result<()> {
        if self.snapshot_path.exists() {
            fs::remove_file(&self.snapshot_path)
                .map_err(|e| StoreError::IoError(format!("Failed to delete snapshot: {}", e)))?;
        }
        Ok(())
    }
}
