use super::{
    Color, ItemId, LocationId, SENTINEL_LOCATION_NAME, SENTINEL_VISITATION_ORDER,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A place items are bought at. Locations carry a user-defined
/// visitation order that drives the shopping route; the single sentinel
/// location holds the reserved maximum order and represents "no real
/// location chosen."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub visitation_order: i32,
    pub color: Color,
    /// Insertion counter, used as the stable tie-break when two
    /// locations share a visitation order.
    pub slot: u64,
}

impl Location {
    pub fn new(name: impl Into<String>, visitation_order: i32, color: Color, slot: u64) -> Self {
        Self {
            id: LocationId::new(),
            name: name.into(),
            visitation_order,
            color,
            slot,
        }
    }

    /// Builds the one sentinel location. Called only from the startup
    /// path that establishes the sentinel invariant.
    pub fn sentinel(slot: u64) -> Self {
        Self::new(
            SENTINEL_LOCATION_NAME,
            SENTINEL_VISITATION_ORDER,
            Color::NEUTRAL,
            slot,
        )
    }

    pub fn is_sentinel(&self) -> bool {
        self.visitation_order == SENTINEL_VISITATION_ORDER
    }

    /// Route ordering: visitation order ascending, insertion slot as
    /// the tie-break. The sentinel always sorts last.
    pub fn route_key(&self) -> (i32, u64) {
        (self.visitation_order, self.slot)
    }
}

/// A shopping item. Always references exactly one existing location;
/// items with no real location chosen reference the sentinel.
///
/// Display values borrowed from the location (name, color, sort key)
/// are never stored here. They are computed at read time so a location
/// edit can never leave stale derived data behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub on_list: bool,
    pub is_available: bool,
    /// Set the first time the item moves off the list; never cleared.
    pub date_last_purchased: Option<DateTime<Utc>>,
    pub location: LocationId,
}

impl Item {
    pub fn new(name: impl Into<String>, location: LocationId) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            quantity: 1,
            on_list: true,
            is_available: true,
            date_last_purchased: None,
            location,
        }
    }
}

/// A fully resolved, read-time view of an item: the item's own fields
/// plus the display values derived from its live location.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub on_list: bool,
    pub is_available: bool,
    pub date_last_purchased: Option<DateTime<Utc>>,
    pub location: LocationId,
    pub location_name: String,
    pub visitation_order: i32,
    pub color: Color,
}
