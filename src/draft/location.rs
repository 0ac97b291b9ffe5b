use crate::core::{Color, Location, LocationId, DEFAULT_VISITATION_ORDER};

/// Draft copy of a location's editable fields.
///
/// `id == None` means committing creates a new location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDraft {
    pub id: Option<LocationId>,
    pub name: String,
    pub visitation_order: i32,
    pub color: Color,
}

impl LocationDraft {
    /// Defaults for a brand-new location.
    pub fn new() -> Self {
        Self {
            id: None,
            name: String::new(),
            visitation_order: DEFAULT_VISITATION_ORDER,
            color: Color::DRAFT_DEFAULT,
        }
    }

    /// Seeds a draft from a live location's current field values.
    pub fn for_location(location: &Location) -> Self {
        Self {
            id: Some(location.id),
            name: location.name.clone(),
            visitation_order: location.visitation_order,
            color: location.color,
        }
    }

    pub fn can_commit(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

impl Default for LocationDraft {
    fn default() -> Self {
        Self::new()
    }
}
