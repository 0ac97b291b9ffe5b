use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Reserved visitation order of the sentinel ("Unknown") location.
/// Exactly one location carries this value at all times after startup.
pub const SENTINEL_VISITATION_ORDER: i32 = i32::MAX;

/// Display name the sentinel location is created with.
pub const SENTINEL_LOCATION_NAME: &str = "Unknown Location";

/// Visitation order assigned to new locations when the caller does not
/// pick one. High enough to land near the end of the route, far from
/// the sentinel value.
pub const DEFAULT_VISITATION_ORDER: i32 = 50;

/// Placeholder shown when a derived display value cannot be resolved
/// because the backing location is mid-deletion.
pub const UNRESOLVED_NAME: &str = "Not Available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(Uuid);

impl LocationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// RGBA display color. All channels live in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub opacity: f64,
}

impl Color {
    /// Neutral gray carried by the sentinel location and used as the
    /// fallback for unresolvable derived colors.
    pub const NEUTRAL: Color = Color {
        red: 0.5,
        green: 0.5,
        blue: 0.5,
        opacity: 0.5,
    };

    /// Default color seeded into a new location draft.
    pub const DRAFT_DEFAULT: Color = Color {
        red: 0.25,
        green: 0.25,
        blue: 0.25,
        opacity: 0.40,
    };

    pub fn new(red: f64, green: f64, blue: f64, opacity: f64) -> Self {
        Self {
            red: red.clamp(0.0, 1.0),
            green: green.clamp(0.0, 1.0),
            blue: blue.clamp(0.0, 1.0),
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_channels_are_clamped() {
        let color = Color::new(1.5, -0.2, 0.3, 2.0);
        assert_eq!(color.red, 1.0);
        assert_eq!(color.green, 0.0);
        assert_eq!(color.blue, 0.3);
        assert_eq!(color.opacity, 1.0);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(ItemId::new(), ItemId::new());
        assert_ne!(LocationId::new(), LocationId::new());
    }
}
