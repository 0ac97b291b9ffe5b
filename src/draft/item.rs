use crate::core::{Item, ItemId, LocationId};

/// Draft copy of an item's editable fields.
///
/// `id == None` means committing creates a new item; `Some(id)` means
/// committing updates that item. `location == None` defers the choice
/// to the sentinel location at commit time, so a draft can be built
/// without a store lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub id: Option<ItemId>,
    pub name: String,
    pub quantity: u32,
    pub location: Option<LocationId>,
    pub on_list: bool,
    pub is_available: bool,
}

impl ItemDraft {
    /// Defaults for a brand-new item headed for the shopping list.
    pub fn new() -> Self {
        Self {
            id: None,
            name: String::new(),
            quantity: 1,
            location: None,
            on_list: true,
            is_available: true,
        }
    }

    /// Same defaults, but the item starts off the list. Used when
    /// adding something already purchased.
    pub fn new_off_list() -> Self {
        Self {
            on_list: false,
            ..Self::new()
        }
    }

    /// Seeds a draft from a live item's current field values.
    pub fn for_item(item: &Item) -> Self {
        Self {
            id: Some(item.id),
            name: item.name.clone(),
            quantity: item.quantity,
            location: Some(item.location),
            on_list: item.on_list,
            is_available: item.is_available,
        }
    }

    /// Minimal save-ability rule: the name must be non-empty. Callers
    /// must check this before offering a commit action.
    pub fn can_commit(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self::new()
    }
}
