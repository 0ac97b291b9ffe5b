use super::{sentinel_id, ItemRelations};
use crate::core::{
    Color, Location, LocationId, Result, StoreError, SENTINEL_VISITATION_ORDER,
};
use crate::draft::LocationDraft;
use crate::signals::{ChangeBus, ChangeEvent};
use crate::storage::MemoryStore;
use std::sync::{Arc, RwLock};

/// Owns the location entity set: CRUD, the single-sentinel invariant,
/// and visitation-order validation.
pub struct LocationRegistry {
    store: Arc<RwLock<MemoryStore>>,
    bus: ChangeBus,
}

impl LocationRegistry {
    pub fn new(store: Arc<RwLock<MemoryStore>>, bus: ChangeBus) -> Self {
        Self { store, bus }
    }

    /// Idempotent startup step: creates the sentinel location when it
    /// is absent. Must run before any other operation; the rest of the
    /// system is unsound without exactly one sentinel.
    pub fn ensure_sentinel_exists(&self) -> Result<LocationId> {
        let mut store = self.store.write()?;
        let sentinels = store.fetch_locations(|loc| loc.is_sentinel());
        match sentinels.len() {
            1 => Ok(sentinels[0].id),
            0 => {
                let slot = store.allocate_slot();
                let sentinel = Location::sentinel(slot);
                let id = sentinel.id;
                log::debug!("creating sentinel location {}", id);
                store.insert_location(sentinel);
                store.flush()?;
                Ok(id)
            }
            n => Err(StoreError::InvariantViolation(format!(
                "{} sentinel locations present, expected at most one",
                n
            ))),
        }
    }

    /// The unique sentinel location.
    pub fn sentinel(&self) -> Result<Location> {
        let store = self.store.read()?;
        let id = sentinel_id(&store)?;
        store
            .get_location(id)
            .cloned()
            .ok_or_else(|| StoreError::InvariantViolation("sentinel location missing".to_string()))
    }

    /// Creates a location with explicit fields. The reserved sentinel
    /// order is refused; only the startup path may assign it.
    pub fn create(&self, name: &str, visitation_order: i32, color: Color) -> Result<Location> {
        if name.trim().is_empty() {
            return Err(StoreError::ValidationFailure(
                "location name must not be empty".to_string(),
            ));
        }
        if visitation_order == SENTINEL_VISITATION_ORDER {
            return Err(StoreError::ProtectedEntity(
                "the sentinel visitation order is reserved".to_string(),
            ));
        }

        let mut store = self.store.write()?;
        let slot = store.allocate_slot();
        let location = Location::new(name, visitation_order, color, slot);
        store.insert_location(location.clone());
        store.flush()?;
        Ok(location)
    }

    /// Applies field changes to an existing location, then signals
    /// every observer so items referencing it refresh their derived
    /// values. The visitation order may never move into or out of the
    /// sentinel value through this path.
    pub fn update(
        &self,
        id: LocationId,
        name: &str,
        visitation_order: i32,
        color: Color,
    ) -> Result<()> {
        if name.trim().is_empty() {
            return Err(StoreError::ValidationFailure(
                "location name must not be empty".to_string(),
            ));
        }

        {
            let mut store = self.store.write()?;
            let location = store
                .get_location_mut(id)
                .ok_or_else(|| StoreError::NotFound(format!("location {}", id)))?;

            if location.is_sentinel() && visitation_order != SENTINEL_VISITATION_ORDER {
                return Err(StoreError::ProtectedEntity(
                    "the sentinel location's visitation order cannot be changed".to_string(),
                ));
            }
            if !location.is_sentinel() && visitation_order == SENTINEL_VISITATION_ORDER {
                return Err(StoreError::ProtectedEntity(
                    "the sentinel visitation order is reserved".to_string(),
                ));
            }

            location.name = name.to_string();
            location.visitation_order = visitation_order;
            location.color = color;
            store.flush()?;
        }

        self.bus.location_changed(id);
        Ok(())
    }

    /// Commits a staged location edit: updates the target when the
    /// draft carries an id, creates a new location otherwise. A draft
    /// whose target no longer exists is refused rather than silently
    /// recreated.
    pub fn commit(&self, draft: &LocationDraft) -> Result<LocationId> {
        if !draft.can_commit() {
            return Err(StoreError::ValidationFailure(
                "location name must not be empty".to_string(),
            ));
        }

        match draft.id {
            Some(id) => {
                self.update(id, &draft.name, draft.visitation_order, draft.color)?;
                Ok(id)
            }
            None => {
                let location = self.create(&draft.name, draft.visitation_order, draft.color)?;
                Ok(location.id)
            }
        }
    }

    /// Deletes a location under the delete-and-reassign protocol:
    /// every referencing item moves to the sentinel first (item-side
    /// invalidation runs through the relationship manager), the
    /// sentinel's observers are signalled, and only then is the
    /// location removed and the store flushed. The sentinel itself can
    /// never be deleted.
    pub fn delete(&self, id: LocationId, items: &ItemRelations) -> Result<()> {
        let sentinel = {
            let store = self.store.read()?;
            let location = store
                .get_location(id)
                .ok_or_else(|| StoreError::NotFound(format!("location {}", id)))?;
            if location.is_sentinel() {
                return Err(StoreError::ProtectedEntity(
                    "the sentinel location cannot be deleted".to_string(),
                ));
            }
            sentinel_id(&store)?
        };

        let moved = items.reassign_all(id, sentinel)?;
        if moved > 0 {
            log::debug!("moved {} items from {} to the sentinel", moved, id);
        }
        // the sentinel gained items; its observers must hear about it
        // before the delete settles
        self.bus.location_changed(sentinel);

        {
            let mut store = self.store.write()?;
            store.delete_location(id);
            store.reconcile();
            store.flush()?;
        }

        self.bus.publish(ChangeEvent::LocationDeleted(id));
        Ok(())
    }

    /// All locations in visitation order, ties broken by insertion.
    /// The sentinel always sorts last; `user_only` drops it entirely.
    pub fn all(&self, user_only: bool) -> Result<Vec<Location>> {
        let store = self.store.read()?;
        let mut locations = store.fetch_locations(|loc| !(user_only && loc.is_sentinel()));
        locations.sort_by_key(Location::route_key);
        Ok(locations)
    }

    pub fn get(&self, id: LocationId) -> Result<Option<Location>> {
        let store = self.store.read()?;
        Ok(store.get_location(id).cloned())
    }

    pub fn count(&self) -> Result<usize> {
        let store = self.store.read()?;
        Ok(store.count_locations(|_| true))
    }

    /// Number of items currently referencing this location (derived,
    /// never stored).
    pub fn item_count(&self, id: LocationId) -> Result<usize> {
        let store = self.store.read()?;
        Ok(store.count_items(|item| item.location == id))
    }
}
