//! Entity registries: location CRUD with the sentinel invariant, and
//! the item-location relationship manager with the delete-and-reassign
//! protocol.

pub mod items;
pub mod locations;

pub use items::ItemRelations;
pub use locations::LocationRegistry;

use crate::core::{LocationId, Result, StoreError};
use crate::storage::MemoryStore;

/// Resolves the unique sentinel location. Anything other than exactly
/// one sentinel means the registry is unsound.
pub(crate) fn sentinel_id(store: &MemoryStore) -> Result<LocationId> {
    let sentinels = store.fetch_locations(|loc| loc.is_sentinel());
    match sentinels.len() {
        1 => Ok(sentinels[0].id),
        0 => Err(StoreError::InvariantViolation(
            "sentinel location missing".to_string(),
        )),
        n => Err(StoreError::InvariantViolation(format!(
            "{} sentinel locations present, expected exactly one",
            n
        ))),
    }
}
