use crate::core::{
    Color, Item, ItemId, ItemView, Location, LocationId, Result,
};
use crate::draft::{ItemDraft, LocationDraft};
use crate::registry::{ItemRelations, LocationRegistry};
use crate::signals::{ChangeBus, ChangeEvent};
use crate::storage::MemoryStore;
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, RwLock};

/// The presentation layer's single entry point.
///
/// Owns the store, the change bus, and both entity managers. Opening a
/// list always establishes the sentinel location before anything else
/// runs, so every item has somewhere to point.
///
/// # Examples
///
/// ```
/// use shoplist::{Color, ShoppingList};
///
/// # fn main() -> shoplist::Result<()> {
/// let list = ShoppingList::in_memory()?;
///
/// let dairy = list.create_location("Dairy", 10, Color::NEUTRAL)?;
/// let milk = list.create_item("Milk")?;
/// list.set_item_location(milk.id, dairy.id)?;
///
/// // the shopping route: locations in visitation order
/// let route = list.locations(false)?;
/// assert_eq!(route.first().unwrap().name, "Dairy");
///
/// // deleting a location can never orphan an item
/// list.delete_location(dairy.id)?;
/// let view = list.view(milk.id)?;
/// assert_eq!(view.location_name, "Unknown Location");
/// # Ok(())
/// # }
/// ```
pub struct ShoppingList {
    store: Arc<RwLock<MemoryStore>>,
    bus: ChangeBus,
    locations: LocationRegistry,
    items: ItemRelations,
}

impl ShoppingList {
    /// Volatile list; nothing is written to disk.
    pub fn in_memory() -> Result<Self> {
        Self::bootstrap(MemoryStore::new())
    }

    /// Durable list backed by a snapshot file in `data_dir`, recovered
    /// when one already exists.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        Self::bootstrap(MemoryStore::open(data_dir)?)
    }

    fn bootstrap(store: MemoryStore) -> Result<Self> {
        let store = Arc::new(RwLock::new(store));
        let bus = ChangeBus::new();
        let locations = LocationRegistry::new(Arc::clone(&store), bus.clone());
        let items = ItemRelations::new(Arc::clone(&store), bus.clone());

        // startup invariant: exactly one sentinel, created on first run
        locations.ensure_sentinel_exists()?;

        Ok(Self {
            store,
            bus,
            locations,
            items,
        })
    }

    // ------------------------------------------------------------------
    // Signals
    // ------------------------------------------------------------------

    /// Change notification stream for UI refresh, keyed by entity id.
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        self.bus.subscribe()
    }

    // ------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------

    /// Locations in visitation order. `user_only` excludes the
    /// sentinel.
    pub fn locations(&self, user_only: bool) -> Result<Vec<Location>> {
        self.locations.all(user_only)
    }

    pub fn location(&self, id: LocationId) -> Result<Option<Location>> {
        self.locations.get(id)
    }

    pub fn sentinel(&self) -> Result<Location> {
        self.locations.sentinel()
    }

    pub fn location_count(&self) -> Result<usize> {
        self.locations.count()
    }

    pub fn items_at(&self, location: LocationId) -> Result<Vec<Item>> {
        self.items.at_location(location)
    }

    pub fn item_count_at(&self, location: LocationId) -> Result<usize> {
        self.locations.item_count(location)
    }

    pub fn create_location(&self, name: &str, visitation_order: i32, color: Color) -> Result<Location> {
        self.locations.create(name, visitation_order, color)
    }

    /// Commits a staged location edit (create or update).
    pub fn commit_location(&self, draft: &LocationDraft) -> Result<LocationId> {
        self.locations.commit(draft)
    }

    pub fn delete_location(&self, id: LocationId) -> Result<()> {
        self.locations.delete(id, &self.items)
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Items filtered by list membership, sorted by name.
    pub fn items(&self, on_list: bool) -> Result<Vec<Item>> {
        self.items.fetch(on_list)
    }

    pub fn all_items(&self) -> Result<Vec<Item>> {
        self.items.all()
    }

    pub fn item(&self, id: ItemId) -> Result<Option<Item>> {
        self.items.get(id)
    }

    pub fn item_count(&self) -> Result<usize> {
        self.items.count()
    }

    /// Read-time item view with display values derived from the live
    /// location.
    pub fn view(&self, id: ItemId) -> Result<ItemView> {
        self.items.view(id)
    }

    pub fn create_item(&self, name: &str) -> Result<Item> {
        self.items.create(name)
    }

    /// Commits a staged item edit (create or update).
    pub fn commit_item(&self, draft: &ItemDraft) -> Result<ItemId> {
        self.items.commit(draft)
    }

    pub fn delete_item(&self, id: ItemId) -> Result<()> {
        self.items.delete(id)
    }

    pub fn set_item_location(&self, id: ItemId, location: LocationId) -> Result<()> {
        self.items.set_location(id, location)
    }

    pub fn toggle_on_list(&self, id: ItemId) -> Result<bool> {
        self.items.toggle_on_list(id)
    }

    pub fn toggle_availability(&self, id: ItemId) -> Result<bool> {
        self.items.toggle_availability(id)
    }

    pub fn mark_available(&self, id: ItemId) -> Result<()> {
        self.items.mark_available(id)
    }

    pub fn rename_item(&self, id: ItemId, name: &str) -> Result<()> {
        self.items.rename(id, name)
    }

    pub fn set_item_quantity(&self, id: ItemId, quantity: u32) -> Result<()> {
        self.items.set_quantity(id, quantity)
    }

    /// Marks every on-list item purchased in one pass with a single
    /// flush. Returns the number of items moved.
    pub fn move_all_items_off_list(&self) -> Result<usize> {
        self.items.move_all_off_list()
    }

    // ------------------------------------------------------------------
    // Advanced access
    // ------------------------------------------------------------------

    pub fn registry(&self) -> &LocationRegistry {
        &self.locations
    }

    pub fn relations(&self) -> &ItemRelations {
        &self.items
    }

    /// Forces a flush of the current state. Mutating operations flush
    /// on their own; this exists for lifecycle hooks (e.g. app moving
    /// to the background).
    pub fn flush(&self) -> Result<()> {
        let store = self.store.read()?;
        store.flush()
    }
}
