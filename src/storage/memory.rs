use super::persistence::{SnapshotManager, StoreSnapshot};
use crate::core::{Item, ItemId, Location, LocationId, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Keyed in-memory entity store.
///
/// Deletes are two-phase: `delete_*` only marks a tombstone, and
/// `reconcile` drops tombstoned records for good. Point lookups
/// (`get_*`) treat tombstoned records as gone immediately, while the
/// `*_pending` scans still surface them. This mirrors the deferred
/// deletion of the durable layer: an independent reader refreshing off
/// its own snapshot can observe a record that is already doomed, and
/// callers that must not allow that window run `reconcile` before
/// handing control back.
pub struct MemoryStore {
    locations: HashMap<LocationId, Location>,
    items: HashMap<ItemId, Item>,
    dead_locations: HashSet<LocationId>,
    dead_items: HashSet<ItemId>,
    next_slot: u64,
    snapshots: Option<SnapshotManager>,
}

impl MemoryStore {
    /// Volatile store. `flush` is a no-op.
    pub fn new() -> Self {
        Self {
            locations: HashMap::new(),
            items: HashMap::new(),
            dead_locations: HashSet::new(),
            dead_items: HashSet::new(),
            next_slot: 0,
            snapshots: None,
        }
    }

    /// Durable store backed by a snapshot file in `data_dir`. Recovers
    /// the previous state when a snapshot exists.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let manager = SnapshotManager::new(data_dir);
        let mut store = Self::new();
        if let Some(snapshot) = manager.load()? {
            log::debug!(
                "recovered snapshot: {} locations, {} items",
                snapshot.metadata.location_count,
                snapshot.metadata.item_count
            );
            store.locations = snapshot
                .locations
                .into_iter()
                .map(|loc| (loc.id, loc))
                .collect();
            store.items = snapshot
                .items
                .into_iter()
                .map(|item| (item.id, item))
                .collect();
            store.next_slot = snapshot.metadata.next_slot;
        }
        store.snapshots = Some(manager);
        Ok(store)
    }

    /// Hands out the next insertion slot, used by locations as the
    /// stable sort tie-break.
    pub fn allocate_slot(&mut self) -> u64 {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }

    // ------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------

    pub fn insert_location(&mut self, location: Location) {
        self.dead_locations.remove(&location.id);
        self.locations.insert(location.id, location);
    }

    pub fn get_location(&self, id: LocationId) -> Option<&Location> {
        if self.dead_locations.contains(&id) {
            return None;
        }
        self.locations.get(&id)
    }

    pub fn get_location_mut(&mut self, id: LocationId) -> Option<&mut Location> {
        if self.dead_locations.contains(&id) {
            return None;
        }
        self.locations.get_mut(&id)
    }

    pub fn fetch_locations<P>(&self, predicate: P) -> Vec<Location>
    where
        P: Fn(&Location) -> bool,
    {
        self.locations
            .values()
            .filter(|loc| !self.dead_locations.contains(&loc.id))
            .filter(|loc| predicate(loc))
            .cloned()
            .collect()
    }

    pub fn count_locations<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Location) -> bool,
    {
        self.locations
            .values()
            .filter(|loc| !self.dead_locations.contains(&loc.id))
            .filter(|loc| predicate(loc))
            .count()
    }

    /// Tombstones a location. Returns false when the id is unknown or
    /// already tombstoned.
    pub fn delete_location(&mut self, id: LocationId) -> bool {
        if !self.locations.contains_key(&id) || self.dead_locations.contains(&id) {
            return false;
        }
        self.dead_locations.insert(id);
        true
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    pub fn insert_item(&mut self, item: Item) {
        self.dead_items.remove(&item.id);
        self.items.insert(item.id, item);
    }

    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        if self.dead_items.contains(&id) {
            return None;
        }
        self.items.get(&id)
    }

    pub fn get_item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        if self.dead_items.contains(&id) {
            return None;
        }
        self.items.get_mut(&id)
    }

    pub fn fetch_items<P>(&self, predicate: P) -> Vec<Item>
    where
        P: Fn(&Item) -> bool,
    {
        self.items
            .values()
            .filter(|item| !self.dead_items.contains(&item.id))
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Scan that still includes tombstoned records. Models the stale
    /// snapshot an independent reader may hold between a delete and the
    /// following reconcile.
    pub fn fetch_items_pending<P>(&self, predicate: P) -> Vec<Item>
    where
        P: Fn(&Item) -> bool,
    {
        self.items
            .values()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    pub fn count_items<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Item) -> bool,
    {
        self.items
            .values()
            .filter(|item| !self.dead_items.contains(&item.id))
            .filter(|item| predicate(item))
            .count()
    }

    /// Tombstones an item. Returns false when the id is unknown or
    /// already tombstoned.
    pub fn delete_item(&mut self, id: ItemId) -> bool {
        if !self.items.contains_key(&id) || self.dead_items.contains(&id) {
            return false;
        }
        self.dead_items.insert(id);
        true
    }

    // ------------------------------------------------------------------
    // Reconciliation and durability
    // ------------------------------------------------------------------

    /// Drops every tombstoned record immediately. After this returns no
    /// scan, pending or not, can observe a deleted entity.
    pub fn reconcile(&mut self) {
        for id in self.dead_locations.drain() {
            self.locations.remove(&id);
        }
        for id in self.dead_items.drain() {
            self.items.remove(&id);
        }
    }

    /// Writes the current live state out as a snapshot. No-op for
    /// volatile stores. Tombstoned records are never flushed.
    pub fn flush(&self) -> Result<()> {
        let Some(manager) = &self.snapshots else {
            return Ok(());
        };
        let locations = self.fetch_locations(|_| true);
        let items = self.fetch_items(|_| true);
        let snapshot = StoreSnapshot::new(locations, items, self.next_slot);
        manager.save(&snapshot)
    }

    pub fn is_durable(&self) -> bool {
        self.snapshots.is_some()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
