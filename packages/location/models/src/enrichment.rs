//! Location enrichment results.

use serde::{Deserialize, Serialize};

use crate::{GridCompleteness, GridSpec, LocationSource, MatchQuality, RoomMatch};

/// The outcome of resolving one raw record's location.
///
/// Built once per input row by the hierarchy resolver and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEnrichmentResult {
    /// Resolved location id, or `None` when even the site fallback is
    /// missing from the dimension table.
    pub dim_location_id: Option<i64>,
    /// Canonical building code.
    pub building_normalized: Option<String>,
    /// Canonical level code.
    pub level_normalized: Option<String>,
    /// `"{building}-{level}"` when both are known.
    pub building_level: Option<String>,
    /// The parsed grid reference.
    pub grid: GridSpec,
    /// Rooms whose footprint intersects the grid, strongest matches first.
    pub affected_rooms: Vec<RoomMatch>,
    /// `affected_rooms.len()`.
    pub affected_rooms_count: usize,
    /// Which grid axes were populated.
    pub grid_completeness: GridCompleteness,
    /// Aggregate quality of `affected_rooms`.
    pub match_quality: MatchQuality,
    /// Whether a human should review this row.
    pub location_review_flag: bool,
    /// Which precedence tier produced `dim_location_id`.
    pub location_source: Option<LocationSource>,
}

impl LocationEnrichmentResult {
    /// Flattens the result into the output column layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the affected rooms cannot be JSON-encoded.
    pub fn to_row(&self) -> Result<EnrichedLocationRow, serde_json::Error> {
        let affected_rooms = if self.affected_rooms.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&self.affected_rooms)?)
        };

        Ok(EnrichedLocationRow {
            dim_location_id: self.dim_location_id,
            building_level: self.building_level.clone(),
            building_normalized: self.building_normalized.clone(),
            level_normalized: self.level_normalized.clone(),
            grid_row_min: self.grid.row_min.map(|r| r.to_string()),
            grid_row_max: self.grid.row_max.map(|r| r.to_string()),
            grid_col_min: self.grid.col_min,
            grid_col_max: self.grid.col_max,
            grid_normalized: self.grid.normalized(),
            affected_rooms,
            affected_rooms_count: self.affected_rooms_count,
            grid_completeness: self.grid_completeness,
            match_quality: self.match_quality,
            location_review_flag: self.location_review_flag,
            location_source: self.location_source,
        })
    }
}

/// Flat output row written by the fact-table layer. Field order is the
/// output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedLocationRow {
    /// Resolved location id.
    pub dim_location_id: Option<i64>,
    /// `"{building}-{level}"`.
    pub building_level: Option<String>,
    /// Canonical building code.
    pub building_normalized: Option<String>,
    /// Canonical level code.
    pub level_normalized: Option<String>,
    /// Northernmost row.
    pub grid_row_min: Option<String>,
    /// Southernmost row.
    pub grid_row_max: Option<String>,
    /// Lowest column.
    pub grid_col_min: Option<f64>,
    /// Highest column.
    pub grid_col_max: Option<f64>,
    /// Canonical grid text (e.g. `"C-F/11-22"`).
    pub grid_normalized: Option<String>,
    /// JSON array of `{location_code, room_name, match_type}`.
    pub affected_rooms: Option<String>,
    /// Number of affected rooms.
    pub affected_rooms_count: usize,
    /// Which grid axes were populated.
    pub grid_completeness: GridCompleteness,
    /// Aggregate match quality.
    pub match_quality: MatchQuality,
    /// Whether a human should review this row.
    pub location_review_flag: bool,
    /// Precedence tier of the resolved id.
    pub location_source: Option<LocationSource>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchType;

    #[test]
    fn flattens_rooms_to_json() {
        let grid = GridSpec::from_bounds(
            "B/5",
            Some(("B".parse().unwrap(), "B".parse().unwrap())),
            Some((5.0, 5.0)),
            false,
        );
        let result = LocationEnrichmentResult {
            dim_location_id: Some(3),
            building_normalized: Some("FAB".to_string()),
            level_normalized: Some("1F".to_string()),
            building_level: Some("FAB-1F".to_string()),
            grid,
            affected_rooms: vec![RoomMatch {
                location_code: "FAB116101".to_string(),
                room_name: Some("CLEAN ROOM".to_string()),
                match_type: MatchType::Full,
            }],
            affected_rooms_count: 1,
            grid_completeness: GridCompleteness::Full,
            match_quality: MatchQuality::Precise,
            location_review_flag: false,
            location_source: Some(LocationSource::GridSingleFull),
        };

        let row = result.to_row().unwrap();
        assert_eq!(row.grid_row_min.as_deref(), Some("B"));
        assert_eq!(row.grid_normalized.as_deref(), Some("B/5"));
        assert_eq!(
            row.affected_rooms.as_deref(),
            Some(
                r#"[{"location_code":"FAB116101","room_name":"CLEAN ROOM","match_type":"FULL"}]"#
            )
        );
    }

    #[test]
    fn empty_room_list_is_null() {
        let result = LocationEnrichmentResult {
            dim_location_id: None,
            building_normalized: None,
            level_normalized: None,
            building_level: None,
            grid: GridSpec::empty(""),
            affected_rooms: Vec::new(),
            affected_rooms_count: 0,
            grid_completeness: GridCompleteness::None,
            match_quality: MatchQuality::None,
            location_review_flag: false,
            location_source: None,
        };
        let row = result.to_row().unwrap();
        assert!(row.affected_rooms.is_none());
        assert!(row.grid_normalized.is_none());
    }
}
