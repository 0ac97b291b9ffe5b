/// Staged edit transaction tests
///
/// Drafts mutate freely without touching live entities, refuse to
/// commit with an empty name, collapse add and modify into one commit
/// path, and surface NotFound when their target vanished mid-edit.

use shoplist::{Color, ItemDraft, ItemId, LocationDraft, ShoppingList, StoreError};

#[test]
fn test_commit_of_a_create_draft_produces_a_fresh_item() {
    let list = ShoppingList::in_memory().unwrap();
    let existing = list.create_item("Milk").unwrap();

    let mut draft = ItemDraft::new();
    draft.name = "Eggs".to_string();
    let id = list.commit_item(&draft).unwrap();

    assert_ne!(id, existing.id);
    let item = list.item(id).unwrap().unwrap();
    assert_eq!(item.name, "Eggs");
    assert!(item.on_list);
    assert_eq!(item.location, list.sentinel().unwrap().id);
}

#[test]
fn test_commit_applies_all_draft_fields_at_once() {
    let list = ShoppingList::in_memory().unwrap();
    let dairy = list.create_location("Dairy", 10, Color::NEUTRAL).unwrap();
    let item = list.create_item("Milk").unwrap();

    let mut draft = ItemDraft::for_item(&item);
    draft.name = "Whole Milk".to_string();
    draft.quantity = 2;
    draft.is_available = false;
    draft.location = Some(dairy.id);
    let id = list.commit_item(&draft).unwrap();
    assert_eq!(id, item.id);

    let updated = list.item(item.id).unwrap().unwrap();
    assert_eq!(updated.name, "Whole Milk");
    assert_eq!(updated.quantity, 2);
    assert!(!updated.is_available);
    assert_eq!(updated.location, dairy.id);
}

#[test]
fn test_empty_name_cannot_commit_and_live_item_is_unchanged() {
    // begin an edit, blank the name: commit is refused
    let list = ShoppingList::in_memory().unwrap();
    let item = list.create_item("Milk").unwrap();
    let before = list.item(item.id).unwrap().unwrap();

    let mut draft = ItemDraft::for_item(&item);
    draft.name = String::new();
    assert!(!draft.can_commit());

    let err = list.commit_item(&draft).unwrap_err();
    assert!(matches!(err, StoreError::ValidationFailure(_)));
    assert_eq!(list.item(item.id).unwrap().unwrap(), before);
}

#[test]
fn test_discarded_draft_never_touches_the_live_item() {
    let list = ShoppingList::in_memory().unwrap();
    let item = list.create_item("Milk").unwrap();
    let before = list.item(item.id).unwrap().unwrap();

    {
        let mut draft = ItemDraft::for_item(&item);
        draft.name = "Something Else".to_string();
        draft.quantity = 99;
        draft.on_list = false;
        // dropped without commit
    }

    assert_eq!(list.item(item.id).unwrap().unwrap(), before);
}

#[test]
fn test_commit_against_a_deleted_item_is_not_found() {
    let list = ShoppingList::in_memory().unwrap();
    let item = list.create_item("Milk").unwrap();
    let mut draft = ItemDraft::for_item(&item);
    draft.name = "Whole Milk".to_string();

    // the item disappears while the edit is in flight
    list.delete_item(item.id).unwrap();

    let err = list.commit_item(&draft).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(list.item_count().unwrap(), 0);
}

#[test]
fn test_commit_with_a_dangling_location_is_refused_before_mutation() {
    let list = ShoppingList::in_memory().unwrap();
    let dairy = list.create_location("Dairy", 10, Color::NEUTRAL).unwrap();
    let item = list.create_item("Milk").unwrap();

    let mut draft = ItemDraft::for_item(&item);
    draft.location = Some(dairy.id);
    draft.name = "Whole Milk".to_string();
    let before = list.item(item.id).unwrap().unwrap();

    list.delete_location(dairy.id).unwrap();

    let err = list.commit_item(&draft).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(
        list.item(item.id).unwrap().unwrap(),
        before,
        "a failed commit must not partially apply"
    );
}

#[test]
fn test_commit_zero_quantity_is_refused() {
    let list = ShoppingList::in_memory().unwrap();
    let mut draft = ItemDraft::new();
    draft.name = "Milk".to_string();
    draft.quantity = 0;

    let err = list.commit_item(&draft).unwrap_err();
    assert!(matches!(err, StoreError::ValidationFailure(_)));
    assert_eq!(list.item_count().unwrap(), 0);
}

#[test]
fn test_off_list_creation_draft() {
    let list = ShoppingList::in_memory().unwrap();
    let mut draft = ItemDraft::new_off_list();
    draft.name = "Soap".to_string();
    let id = list.commit_item(&draft).unwrap();

    let item = list.item(id).unwrap().unwrap();
    assert!(!item.on_list);
    // created off-list, never purchased through a transition
    assert!(item.date_last_purchased.is_none());
}

#[test]
fn test_location_draft_create_and_update_share_the_commit_path() {
    let list = ShoppingList::in_memory().unwrap();

    let mut draft = LocationDraft::new();
    draft.name = "Dairy".to_string();
    draft.visitation_order = 10;
    let id = list.commit_location(&draft).unwrap();

    let created = list.location(id).unwrap().unwrap();
    assert_eq!(created.name, "Dairy");
    assert_eq!(created.visitation_order, 10);

    let mut edit = LocationDraft::for_location(&created);
    edit.name = "Dairy & Cheese".to_string();
    edit.color = Color::new(0.9, 0.9, 0.2, 1.0);
    let same_id = list.commit_location(&edit).unwrap();
    assert_eq!(same_id, id);

    let updated = list.location(id).unwrap().unwrap();
    assert_eq!(updated.name, "Dairy & Cheese");
    assert_eq!(updated.color, Color::new(0.9, 0.9, 0.2, 1.0));
    assert_eq!(list.location_count().unwrap(), 2);
}

#[test]
fn test_location_draft_with_empty_name_is_refused() {
    let list = ShoppingList::in_memory().unwrap();
    let draft = LocationDraft::new();
    assert!(!draft.can_commit());

    let err = list.commit_location(&draft).unwrap_err();
    assert!(matches!(err, StoreError::ValidationFailure(_)));
    assert_eq!(list.location_count().unwrap(), 1);
}

#[test]
fn test_commit_against_a_deleted_location_is_not_found() {
    let list = ShoppingList::in_memory().unwrap();
    let dairy = list.create_location("Dairy", 10, Color::NEUTRAL).unwrap();
    let mut draft = LocationDraft::for_location(&dairy);
    draft.name = "Dairy 2".to_string();

    list.delete_location(dairy.id).unwrap();

    let err = list.commit_location(&draft).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn test_moving_an_item_notifies_both_locations() {
    let list = ShoppingList::in_memory().unwrap();
    let dairy = list.create_location("Dairy", 10, Color::NEUTRAL).unwrap();
    let bakery = list.create_location("Bakery", 20, Color::NEUTRAL).unwrap();
    let item = list.create_item("Croissant").unwrap();
    list.set_item_location(item.id, dairy.id).unwrap();

    let rx = list.subscribe();
    let mut draft = ItemDraft::for_item(&list.item(item.id).unwrap().unwrap());
    draft.location = Some(bakery.id);
    list.commit_item(&draft).unwrap();

    let events: Vec<_> = rx.try_iter().collect();
    assert!(events.contains(&shoplist::ChangeEvent::ItemChanged(item.id)));
    assert!(events.contains(&shoplist::ChangeEvent::LocationChanged(dairy.id)));
    assert!(events.contains(&shoplist::ChangeEvent::LocationChanged(bakery.id)));
}

#[test]
fn test_unknown_target_id_draft_does_not_resurrect() {
    let list = ShoppingList::in_memory().unwrap();
    let phantom = ItemId::new();
    let draft = ItemDraft {
        id: Some(phantom),
        name: "Ghost".to_string(),
        ..ItemDraft::new()
    };

    assert!(matches!(
        list.commit_item(&draft).unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert_eq!(list.item_count().unwrap(), 0);
}
