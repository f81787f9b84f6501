//! Location dimension records.

use serde::{Deserialize, Serialize};

use crate::grid::{GridBounds, GridRow, span};
use crate::{LocationType, MatchType};

/// One addressable place in the facility (a row of the location
/// dimension table).
///
/// `location_code` is the only externally stable identifier;
/// `location_id` is a surrogate assigned when the table is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Surrogate primary key.
    pub location_id: i64,
    /// Unique external key (e.g. `"FAB116406"`, `"FAB1-ST05"`, `"FAB-1F"`).
    pub location_code: String,
    /// What kind of place this is.
    pub location_type: LocationType,
    /// Human-readable room name, when known.
    #[serde(default)]
    pub room_name: Option<String>,
    /// Normalized building code.
    #[serde(default)]
    pub building: Option<String>,
    /// Normalized level code.
    #[serde(default)]
    pub level: Option<String>,
    /// Northernmost row of the footprint.
    #[serde(default)]
    pub grid_row_min: Option<GridRow>,
    /// Southernmost row of the footprint.
    #[serde(default)]
    pub grid_row_max: Option<GridRow>,
    /// Lowest column of the footprint.
    #[serde(default)]
    pub grid_col_min: Option<f64>,
    /// Highest column of the footprint.
    #[serde(default)]
    pub grid_col_max: Option<f64>,
    /// Code of the sibling room whose footprint was copied onto this one,
    /// when the bounds were inferred rather than surveyed.
    #[serde(default)]
    pub grid_inferred_from: Option<String>,
}

impl LocationRecord {
    /// Creates a record with no building, level, or grid information.
    #[must_use]
    pub fn new(location_id: i64, location_code: &str, location_type: LocationType) -> Self {
        Self {
            location_id,
            location_code: location_code.to_string(),
            location_type,
            room_name: None,
            building: None,
            level: None,
            grid_row_min: None,
            grid_row_max: None,
            grid_col_min: None,
            grid_col_max: None,
            grid_inferred_from: None,
        }
    }

    /// Sets the building and level.
    #[must_use]
    pub fn with_building_level(mut self, building: &str, level: Option<&str>) -> Self {
        self.building = Some(building.to_string());
        self.level = level.map(str::to_string);
        self
    }

    /// Sets the room name.
    #[must_use]
    pub fn with_room_name(mut self, name: &str) -> Self {
        self.room_name = Some(name.to_string());
        self
    }

    /// Sets the row footprint.
    #[must_use]
    pub const fn with_rows(mut self, min: GridRow, max: GridRow) -> Self {
        self.grid_row_min = Some(min);
        self.grid_row_max = Some(max);
        self
    }

    /// Sets the column footprint.
    #[must_use]
    pub const fn with_cols(mut self, min: f64, max: f64) -> Self {
        self.grid_col_min = Some(min);
        self.grid_col_max = Some(max);
        self
    }

    /// Marks the footprint as copied from another room.
    #[must_use]
    pub fn with_inferred_from(mut self, code: &str) -> Self {
        self.grid_inferred_from = Some(code.to_string());
        self
    }

    /// Whether the record has any grid footprint.
    #[must_use]
    pub fn has_grid(&self) -> bool {
        self.row_span().is_some() || self.col_span().is_some()
    }
}

impl GridBounds for LocationRecord {
    fn row_span(&self) -> Option<(GridRow, GridRow)> {
        span(self.grid_row_min, self.grid_row_max)
    }

    fn col_span(&self) -> Option<(f64, f64)> {
        span(self.grid_col_min, self.grid_col_max)
    }
}

/// A room whose footprint intersects a query grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMatch {
    /// Code of the matching room.
    pub location_code: String,
    /// Display name of the room, when known.
    pub room_name: Option<String>,
    /// How the room matched.
    pub match_type: MatchType,
}
