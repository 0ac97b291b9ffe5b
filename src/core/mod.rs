pub mod entity;
pub mod error;
pub mod types;

pub use entity::{Item, ItemView, Location};
pub use error::{Result, StoreError};
pub use types::{
    Color, ItemId, LocationId, DEFAULT_VISITATION_ORDER, SENTINEL_LOCATION_NAME,
    SENTINEL_VISITATION_ORDER, UNRESOLVED_NAME,
};
