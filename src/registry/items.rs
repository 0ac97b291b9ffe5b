use super::sentinel_id;
use crate::core::{
    Color, Item, ItemId, ItemView, LocationId, Result, StoreError, UNRESOLVED_NAME,
};
use crate::draft::ItemDraft;
use crate::signals::{ChangeBus, ChangeEvent};
use crate::storage::MemoryStore;
use chrono::Utc;
use std::sync::{Arc, RwLock};

/// Owns the item entity set and the item-location relationship: every
/// item references exactly one existing location at every observable
/// point, and deleting either side never leaves a dangling reference.
pub struct ItemRelations {
    store: Arc<RwLock<MemoryStore>>,
    bus: ChangeBus,
}

impl ItemRelations {
    pub fn new(store: Arc<RwLock<MemoryStore>>, bus: ChangeBus) -> Self {
        Self { store, bus }
    }

    /// Creates an item with defaults (on the list, available, quantity
    /// one, sentinel location) and the given name.
    pub fn create(&self, name: &str) -> Result<Item> {
        let draft = ItemDraft {
            name: name.to_string(),
            ..ItemDraft::new()
        };
        let id = self.commit(&draft)?;
        self.require(id)
    }

    /// Commits a staged item edit as one logical update with a single
    /// flush. A draft without a target id creates a new item; a draft
    /// whose target no longer exists is refused rather than silently
    /// recreated.
    pub fn commit(&self, draft: &ItemDraft) -> Result<ItemId> {
        if !draft.can_commit() {
            return Err(StoreError::ValidationFailure(
                "item name must not be empty".to_string(),
            ));
        }
        if draft.quantity == 0 {
            return Err(StoreError::ValidationFailure(
                "item quantity must be positive".to_string(),
            ));
        }

        let mut moved_locations = None;
        let id = {
            let mut store = self.store.write()?;

            // resolve the draft's location before touching anything so
            // a bad reference leaves the entity unchanged
            let target_location = match draft.location {
                Some(loc) => {
                    if store.get_location(loc).is_none() {
                        return Err(StoreError::NotFound(format!("location {}", loc)));
                    }
                    loc
                }
                None => sentinel_id(&store)?,
            };

            match draft.id {
                Some(id) => {
                    let item = store
                        .get_item_mut(id)
                        .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))?;

                    if item.on_list && !draft.on_list {
                        item.date_last_purchased = Some(Utc::now());
                    }
                    item.name = draft.name.clone();
                    item.quantity = draft.quantity;
                    item.on_list = draft.on_list;
                    item.is_available = draft.is_available;
                    if item.location != target_location {
                        moved_locations = Some((item.location, target_location));
                        item.location = target_location;
                    }
                    store.flush()?;
                    id
                }
                None => {
                    let mut item = Item::new(draft.name.clone(), target_location);
                    item.quantity = draft.quantity;
                    item.on_list = draft.on_list;
                    item.is_available = draft.is_available;
                    let id = item.id;
                    store.insert_item(item);
                    store.flush()?;
                    moved_locations = Some((target_location, target_location));
                    id
                }
            }
        };

        self.bus.item_changed(id);
        if let Some((previous, current)) = moved_locations {
            self.bus.location_changed(previous);
            if current != previous {
                self.bus.location_changed(current);
            }
        }
        Ok(id)
    }

    /// Moves an item to another location. Both the previous and the
    /// new location are signalled, since each has derived counts and
    /// item lists that just changed.
    pub fn set_location(&self, id: ItemId, new_location: LocationId) -> Result<()> {
        let previous = {
            let mut store = self.store.write()?;
            if store.get_location(new_location).is_none() {
                return Err(StoreError::NotFound(format!("location {}", new_location)));
            }
            let item = store
                .get_item_mut(id)
                .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))?;
            let previous = item.location;
            item.location = new_location;
            store.flush()?;
            previous
        };

        self.bus.item_changed(id);
        self.bus.location_changed(previous);
        if new_location != previous {
            self.bus.location_changed(new_location);
        }
        Ok(())
    }

    /// Sets the on-list flag. Moving off the list stamps the purchase
    /// date in the same update, so no observer can see `on_list ==
    /// false` alongside a stale purchase date. Moving back on leaves
    /// the stamp alone.
    pub fn set_on_list(&self, id: ItemId, value: bool) -> Result<()> {
        {
            let mut store = self.store.write()?;
            let item = store
                .get_item_mut(id)
                .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))?;
            if item.on_list && !value {
                item.date_last_purchased = Some(Utc::now());
            }
            item.on_list = value;
            store.flush()?;
        }
        self.bus.item_changed(id);
        Ok(())
    }

    /// Flips the on-list flag and returns the new value.
    pub fn toggle_on_list(&self, id: ItemId) -> Result<bool> {
        let current = self.require(id)?.on_list;
        self.set_on_list(id, !current)?;
        Ok(!current)
    }

    pub fn set_availability(&self, id: ItemId, value: bool) -> Result<()> {
        {
            let mut store = self.store.write()?;
            let item = store
                .get_item_mut(id)
                .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))?;
            item.is_available = value;
            store.flush()?;
        }
        self.bus.item_changed(id);
        Ok(())
    }

    /// Flips the availability flag and returns the new value.
    pub fn toggle_availability(&self, id: ItemId) -> Result<bool> {
        let current = self.require(id)?.is_available;
        self.set_availability(id, !current)?;
        Ok(!current)
    }

    pub fn mark_available(&self, id: ItemId) -> Result<()> {
        self.set_availability(id, true)
    }

    pub fn rename(&self, id: ItemId, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(StoreError::ValidationFailure(
                "item name must not be empty".to_string(),
            ));
        }
        {
            let mut store = self.store.write()?;
            let item = store
                .get_item_mut(id)
                .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))?;
            item.name = name.to_string();
            store.flush()?;
        }
        self.bus.item_changed(id);
        Ok(())
    }

    pub fn set_quantity(&self, id: ItemId, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(StoreError::ValidationFailure(
                "item quantity must be positive".to_string(),
            ));
        }
        {
            let mut store = self.store.write()?;
            let item = store
                .get_item_mut(id)
                .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))?;
            item.quantity = quantity;
            store.flush()?;
        }
        self.bus.item_changed(id);
        Ok(())
    }

    /// Deletes an item. The location reference is cleared to the
    /// sentinel before removal, and the store is reconciled before
    /// control returns, so no reader can dereference the dead record
    /// afterwards. Deleting an unknown or already-deleted id is a
    /// no-op.
    pub fn delete(&self, id: ItemId) -> Result<()> {
        let previous = {
            let mut store = self.store.write()?;
            let Some(item) = store.get_item(id) else {
                return Ok(());
            };
            let previous = item.location;
            let sentinel = sentinel_id(&store)?;
            if let Some(item) = store.get_item_mut(id) {
                item.location = sentinel;
            }
            store.delete_item(id);
            // reconcile before returning: a reader refreshing off its
            // own snapshot must never see the dead record
            store.reconcile();
            store.flush()?;
            previous
        };

        self.bus.publish(ChangeEvent::ItemDeleted(id));
        self.bus.location_changed(previous);
        Ok(())
    }

    /// Bulk "everything is purchased": one pass, one flush.
    pub fn move_all_off_list(&self) -> Result<usize> {
        let moved = {
            let mut store = self.store.write()?;
            let now = Utc::now();
            let ids: Vec<ItemId> = store
                .fetch_items(|item| item.on_list)
                .into_iter()
                .map(|item| item.id)
                .collect();
            for &id in &ids {
                if let Some(item) = store.get_item_mut(id) {
                    item.on_list = false;
                    item.date_last_purchased = Some(now);
                }
            }
            store.flush()?;
            ids
        };

        for &id in &moved {
            self.bus.item_changed(id);
        }
        Ok(moved.len())
    }

    /// Moves every item referencing `from` onto `to`. Part of the
    /// location delete protocol; the caller owns ordering and the
    /// final flush. Returns the number of items moved.
    pub(crate) fn reassign_all(&self, from: LocationId, to: LocationId) -> Result<usize> {
        let moved = {
            let mut store = self.store.write()?;
            let ids: Vec<ItemId> = store
                .fetch_items(|item| item.location == from)
                .into_iter()
                .map(|item| item.id)
                .collect();
            for &id in &ids {
                if let Some(item) = store.get_item_mut(id) {
                    item.location = to;
                }
            }
            ids
        };

        for &id in &moved {
            self.bus.item_changed(id);
        }
        Ok(moved.len())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn get(&self, id: ItemId) -> Result<Option<Item>> {
        let store = self.store.read()?;
        Ok(store.get_item(id).cloned())
    }

    fn require(&self, id: ItemId) -> Result<Item> {
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))
    }

    /// Every item, sorted by name.
    pub fn all(&self) -> Result<Vec<Item>> {
        let store = self.store.read()?;
        let mut items = store.fetch_items(|_| true);
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    /// Items filtered by list membership, sorted by name.
    pub fn fetch(&self, on_list: bool) -> Result<Vec<Item>> {
        let store = self.store.read()?;
        let mut items = store.fetch_items(|item| item.on_list == on_list);
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    /// Items at a location, sorted by name.
    pub fn at_location(&self, location: LocationId) -> Result<Vec<Item>> {
        let store = self.store.read()?;
        let mut items = store.fetch_items(|item| item.location == location);
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    pub fn count(&self) -> Result<usize> {
        let store = self.store.read()?;
        Ok(store.count_items(|_| true))
    }

    /// Read-time resolution of an item plus the display values derived
    /// from its live location. Never served from a cache; a location
    /// edit is visible on the very next call. An unresolvable location
    /// (possible only mid-transition) degrades to placeholder values
    /// instead of failing.
    pub fn view(&self, id: ItemId) -> Result<ItemView> {
        let store = self.store.read()?;
        let item = store
            .get_item(id)
            .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))?;

        let (location_name, visitation_order, color) = match store.get_location(item.location) {
            Some(location) => (
                location.name.clone(),
                location.visitation_order,
                location.color,
            ),
            None => (UNRESOLVED_NAME.to_string(), 0, Color::NEUTRAL),
        };

        Ok(ItemView {
            id: item.id,
            name: item.name.clone(),
            quantity: item.quantity,
            on_list: item.on_list,
            is_available: item.is_available,
            date_last_purchased: item.date_last_purchased,
            location: item.location,
            location_name,
            visitation_order,
            color,
        })
    }
}
