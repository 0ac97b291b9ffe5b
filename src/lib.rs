// ============================================================================
// shoplist Library
// ============================================================================

pub mod core;
pub mod draft;
pub mod facade;
pub mod registry;
pub mod signals;
pub mod storage;

// Re-export main types for convenience
pub use crate::core::{
    Color, Item, ItemId, ItemView, Location, LocationId, Result, StoreError,
    DEFAULT_VISITATION_ORDER, SENTINEL_LOCATION_NAME, SENTINEL_VISITATION_ORDER,
};
pub use draft::{ItemDraft, LocationDraft};
pub use facade::ShoppingList;
pub use registry::{ItemRelations, LocationRegistry};
pub use signals::{ChangeBus, ChangeEvent};
pub use storage::MemoryStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_list_starts_with_sentinel() {
        let list = ShoppingList::in_memory().unwrap();
        assert_eq!(list.location_count().unwrap(), 1);
        let sentinel = list.sentinel().unwrap();
        assert_eq!(sentinel.name, SENTINEL_LOCATION_NAME);
        assert_eq!(sentinel.visitation_order, SENTINEL_VISITATION_ORDER);
    }

    #[test]
    fn test_create_and_fetch_item() {
        let list = ShoppingList::in_memory().unwrap();
        let item = list.create_item("Milk").unwrap();

        let on_list = list.items(true).unwrap();
        assert_eq!(on_list.len(), 1);
        assert_eq!(on_list[0].id, item.id);
        assert_eq!(item.location, list.sentinel().unwrap().id);
    }

    #[test]
    fn test_draft_commit_round_trip() {
        let list = ShoppingList::in_memory().unwrap();
        let mut draft = ItemDraft::new();
        draft.name = "Eggs".to_string();
        draft.quantity = 12;

        let id = list.commit_item(&draft).unwrap();
        let item = list.item(id).unwrap().unwrap();
        assert_eq!(item.name, "Eggs");
        assert_eq!(item.quantity, 12);
    }
}
