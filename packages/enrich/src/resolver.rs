//! The location hierarchy resolver.
//!
//! Resolution tries a fixed sequence of tiers and stops at the first one
//! that yields a location id:
//!
//! 1. `ROOM_DIRECT`: an explicit room, stair or elevator code.
//! 2. `GRID_SINGLE_FULL` / `GRIDLINE` / `GRID_SINGLE_PARTIAL`: the grid
//!    overlaps exactly one room on the level.
//! 3. `LEVEL`: the building + level record.
//! 4. `BUILDING`: the building-wide record.
//! 5. `SITE`: the site-wide record.
//!
//! A later tier is never preferred over an earlier one, even when it looks
//! more specific.

use std::sync::Arc;

use fab_locate_dimension::LocationDimension;
use fab_locate_location_models::{
    GridCompleteness, GridPatternKind, GridSpec, LocationEnrichmentResult, LocationSource,
    MatchQuality, MatchType, RoomMatch,
};
use fab_locate_normalize::{
    building_level, clean_text, extract_location_codes, is_null_sentinel, normalize_building,
    normalize_level,
};
use serde::{Deserialize, Serialize};

use crate::config::EnrichConfig;

/// The location fields of one source row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInput {
    /// Free-text building.
    #[serde(default)]
    pub building: Option<String>,
    /// Free-text level.
    #[serde(default)]
    pub level: Option<String>,
    /// Free-text grid reference.
    #[serde(default)]
    pub grid: Option<String>,
    /// Explicit room, stair or elevator code.
    #[serde(default)]
    pub room_code: Option<String>,
    /// Source label (`"RABA"`, `"TBM"`, ...). Selects the grid dialect.
    #[serde(default)]
    pub source: String,
}

impl LocationInput {
    /// Creates an input with only a source label.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..Self::default()
        }
    }

    /// Sets the building.
    #[must_use]
    pub fn with_building(mut self, building: &str) -> Self {
        self.building = Some(building.to_string());
        self
    }

    /// Sets the level.
    #[must_use]
    pub fn with_level(mut self, level: &str) -> Self {
        self.level = Some(level.to_string());
        self
    }

    /// Sets the grid text.
    #[must_use]
    pub fn with_grid(mut self, grid: &str) -> Self {
        self.grid = Some(grid.to_string());
        self
    }

    /// Sets the room code.
    #[must_use]
    pub fn with_room_code(mut self, room_code: &str) -> Self {
        self.room_code = Some(room_code.to_string());
        self
    }
}

/// Which grid axes are populated, falling back to whether the level is
/// known.
#[must_use]
pub const fn grid_completeness(grid: &GridSpec, level_known: bool) -> GridCompleteness {
    match (grid.has_rows(), grid.has_cols()) {
        (true, true) => GridCompleteness::Full,
        (true, false) => GridCompleteness::RowOnly,
        (false, true) => GridCompleteness::ColOnly,
        (false, false) if level_known => GridCompleteness::LevelOnly,
        (false, false) => GridCompleteness::None,
    }
}

/// Aggregate quality of a room-match list.
#[must_use]
pub fn match_quality(rooms: &[RoomMatch]) -> MatchQuality {
    if rooms.is_empty() {
        return MatchQuality::None;
    }
    let full = rooms
        .iter()
        .filter(|m| m.match_type == MatchType::Full)
        .count();
    if full == rooms.len() {
        MatchQuality::Precise
    } else if full == 0 {
        MatchQuality::Partial
    } else {
        MatchQuality::Mixed
    }
}

/// Resolves free-text locations against a shared [`LocationDimension`].
///
/// Cheap to clone and safe to share across threads; each call is a pure
/// function of its input and the snapshot.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    dimension: Arc<LocationDimension>,
    config: EnrichConfig,
}

impl LocationResolver {
    /// Creates a resolver over a dimension snapshot.
    #[must_use]
    pub const fn new(dimension: Arc<LocationDimension>, config: EnrichConfig) -> Self {
        Self { dimension, config }
    }

    /// The dimension snapshot.
    #[must_use]
    pub fn dimension(&self) -> &LocationDimension {
        &self.dimension
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// Returns a resolver over a different snapshot with the same
    /// configuration.
    #[must_use]
    pub fn with_dimension(&self, dimension: Arc<LocationDimension>) -> Self {
        Self {
            dimension,
            config: self.config.clone(),
        }
    }

    /// Resolves one row's location.
    ///
    /// Never fails. A table without a SITE record leaves
    /// `dim_location_id` and `location_source` empty for rows no other
    /// tier resolves.
    #[must_use]
    pub fn enrich_location(&self, input: &LocationInput) -> LocationEnrichmentResult {
        let building = input.building.as_deref().and_then(normalize_building);
        let level = input.level.as_deref().and_then(normalize_level);

        let dialect = self.config.dialect_for(&input.source);
        let grid = input
            .grid
            .as_deref()
            .map_or_else(|| GridSpec::empty(""), |raw| dialect.parse(raw));

        let affected_rooms = match level.as_deref() {
            Some(level) if grid.has_rows() || grid.has_cols() => {
                self.dimension.affected_rooms(level, &grid)
            }
            _ => Vec::new(),
        };

        let grid_completeness = grid_completeness(&grid, level.is_some());
        let match_quality = match_quality(&affected_rooms);
        let location_review_flag =
            self.config
                .review
                .needs_review(affected_rooms.len(), match_quality, grid_completeness);

        let resolved = self.resolve(
            input.room_code.as_deref(),
            &grid,
            &affected_rooms,
            building.as_deref(),
            level.as_deref(),
        );

        match resolved {
            Some((id, tier)) => log::debug!(
                "{} row {:?}: {tier} -> {id}",
                input.source,
                grid.raw_text
            ),
            None => log::debug!(
                "{} row {:?}: unresolved, no SITE record",
                input.source,
                grid.raw_text
            ),
        }

        LocationEnrichmentResult {
            dim_location_id: resolved.map(|(id, _)| id),
            building_level: building_level(building.as_deref(), level.as_deref()),
            building_normalized: building,
            level_normalized: level,
            grid,
            affected_rooms_count: affected_rooms.len(),
            affected_rooms,
            grid_completeness,
            match_quality,
            location_review_flag,
            location_source: resolved.map(|(_, tier)| tier),
        }
    }

    fn resolve(
        &self,
        room_code: Option<&str>,
        grid: &GridSpec,
        affected_rooms: &[RoomMatch],
        building: Option<&str>,
        level: Option<&str>,
    ) -> Option<(i64, LocationSource)> {
        let direct = room_code
            .and_then(|code| self.lookup_code(code))
            .or_else(|| self.lookup_named_grid(room_code, grid));
        if let Some(id) = direct {
            return Some((id, LocationSource::RoomDirect));
        }

        if let [single] = affected_rooms
            && let Some(id) = self.dimension.lookup_by_code(&single.location_code)
        {
            let tier = match single.match_type {
                MatchType::Full => LocationSource::GridSingleFull,
                MatchType::Gridline => LocationSource::Gridline,
                MatchType::Partial => LocationSource::GridSinglePartial,
            };
            return Some((id, tier));
        }

        if let (Some(building), Some(level)) = (building, level)
            && let Some(id) = self.dimension.lookup_level(building, level)
        {
            return Some((id, LocationSource::Level));
        }

        if let Some(id) = building.and_then(|b| self.dimension.lookup_building(b)) {
            return Some((id, LocationSource::Building));
        }

        self.dimension
            .site_id()
            .map(|id| (id, LocationSource::Site))
    }

    /// Looks up a code as written, then every equivalent spelling. Only
    /// room, stair and elevator records match; level, building and site
    /// codes are left to their own tiers.
    fn lookup_code(&self, raw: &str) -> Option<i64> {
        let cleaned = clean_text(raw);
        if is_null_sentinel(&cleaned) {
            return None;
        }

        self.lookup_direct(&cleaned).or_else(|| {
            extract_location_codes(&cleaned)
                .iter()
                .flat_map(|candidate| &candidate.variants)
                .find_map(|variant| self.lookup_direct(variant))
        })
    }

    fn lookup_direct(&self, code: &str) -> Option<i64> {
        self.dimension
            .get_by_code(code)
            .filter(|record| record.location_type.is_direct_target())
            .map(|record| record.location_id)
    }

    /// A `NAMED` grid token stands in for a missing room code.
    fn lookup_named_grid(&self, room_code: Option<&str>, grid: &GridSpec) -> Option<i64> {
        if !self.config.resolve_named_grid || grid.pattern_kind != GridPatternKind::Named {
            return None;
        }
        if room_code.is_some_and(|code| !is_null_sentinel(&clean_text(code))) {
            return None;
        }
        self.lookup_code(grid.named_location.as_deref()?)
    }
}

#[cfg(test)]
mod tests {
    use fab_locate_location_models::{GridRow, LocationRecord, LocationType};

    use super::*;

    fn row(s: &str) -> GridRow {
        s.parse().unwrap()
    }

    fn room(id: i64, code: &str, level: &str, rows: (&str, &str), cols: (f64, f64)) -> LocationRecord {
        LocationRecord::new(id, code, LocationType::Room)
            .with_building_level("FAB", Some(level))
            .with_rows(row(rows.0), row(rows.1))
            .with_cols(cols.0, cols.1)
    }

    fn records(with_site: bool, with_level_1f: bool) -> Vec<LocationRecord> {
        let mut records = vec![
            LocationRecord::new(2, "FAB", LocationType::Building).with_building_level("FAB", None),
            LocationRecord::new(4, "FAB-2F", LocationType::Level)
                .with_building_level("FAB", Some("2F")),
            room(10, "R1", "1F", ("A", "C"), (1.0, 10.0)).with_room_name("CLEAN ROOM 1"),
            room(11, "R2", "1F", ("D", "F"), (1.0, 10.0)),
            room(12, "R5", "1F", ("A", "C"), (12.0, 20.0)),
            room(20, "FAB126401", "2F", ("G", "H"), (5.0, 8.0)),
            room(21, "FAB126402", "2F", ("J", "K"), (5.0, 8.0)),
            LocationRecord::new(30, "FAB1-ST21", LocationType::Stair)
                .with_building_level("FAB", Some("1F")),
            LocationRecord::new(31, "FAB1-EL02", LocationType::Elevator)
                .with_building_level("FAB", Some("1F")),
        ];
        if with_site {
            records.push(LocationRecord::new(1, "SITE", LocationType::Site));
        }
        if with_level_1f {
            records.push(
                LocationRecord::new(3, "FAB-1F", LocationType::Level)
                    .with_building_level("FAB", Some("1F")),
            );
        }
        records
    }

    fn resolver_with(records: Vec<LocationRecord>, config: EnrichConfig) -> LocationResolver {
        let dimension = LocationDimension::from_records(records).unwrap();
        LocationResolver::new(Arc::new(dimension), config)
    }

    fn resolver() -> LocationResolver {
        resolver_with(records(true, true), EnrichConfig::default())
    }

    #[test]
    fn explicit_room_code_resolves_directly() {
        let result = resolver().enrich_location(
            &LocationInput::new("RABA")
                .with_building("FAB")
                .with_level("2F")
                .with_room_code("FAB126401"),
        );
        assert_eq!(result.location_source, Some(LocationSource::RoomDirect));
        assert_eq!(result.dim_location_id, Some(20));
        assert_eq!(result.building_level.as_deref(), Some("FAB-2F"));
        assert_eq!(result.grid_completeness, GridCompleteness::LevelOnly);
    }

    #[test]
    fn garbage_grid_falls_through_to_level() {
        let input = LocationInput::new("TBM")
            .with_building("FAB")
            .with_level("1F")
            .with_grid("INVALID_GARBAGE");

        let result = resolver().enrich_location(&input);
        assert_eq!(result.grid.pattern_kind, GridPatternKind::Unparsed);
        assert_eq!(result.grid_completeness, GridCompleteness::LevelOnly);
        assert_eq!(result.location_source, Some(LocationSource::Level));
        assert_eq!(result.dim_location_id, Some(3));

        let without_level = resolver_with(records(true, false), EnrichConfig::default());
        let result = without_level.enrich_location(&input);
        assert_eq!(result.location_source, Some(LocationSource::Building));

        let mut bare = records(true, false);
        bare.retain(|r| r.location_type != LocationType::Building);
        let result = resolver_with(bare, EnrichConfig::default()).enrich_location(&input);
        assert_eq!(result.location_source, Some(LocationSource::Site));
        assert_eq!(result.dim_location_id, Some(1));
    }

    #[test]
    fn no_level_and_no_grid_is_none_completeness() {
        let result = resolver().enrich_location(
            &LocationInput::new("TBM")
                .with_building("FAB")
                .with_grid("INVALID_GARBAGE"),
        );
        assert_eq!(result.grid_completeness, GridCompleteness::None);
        assert!(!result.location_review_flag);
        assert_eq!(result.location_source, Some(LocationSource::Building));
    }

    #[test]
    fn room_code_beats_a_grid_that_resolves_elsewhere() {
        let result = resolver().enrich_location(
            &LocationInput::new("RABA")
                .with_building("FAB")
                .with_level("1F")
                .with_grid("B/5")
                .with_room_code("FAB126401"),
        );
        assert_eq!(result.affected_rooms.len(), 1);
        assert_eq!(result.affected_rooms[0].location_code, "R1");
        assert_eq!(result.location_source, Some(LocationSource::RoomDirect));
        assert_eq!(result.dim_location_id, Some(20));
    }

    #[test]
    fn resolution_is_deterministic() {
        let resolver = resolver();
        let input = LocationInput::new("RABA")
            .with_building("Main Fab")
            .with_level("Level 1")
            .with_grid("E");
        let first = resolver.enrich_location(&input);
        for _ in 0..5 {
            assert_eq!(resolver.enrich_location(&input), first);
        }
    }

    #[test]
    fn single_full_match() {
        let result = resolver().enrich_location(
            &LocationInput::new("RABA")
                .with_building("FAB")
                .with_level("1F")
                .with_grid("B/5"),
        );
        assert_eq!(result.grid.pattern_kind, GridPatternKind::Point);
        assert_eq!(result.affected_rooms_count, 1);
        assert_eq!(result.match_quality, MatchQuality::Precise);
        assert_eq!(result.grid_completeness, GridCompleteness::Full);
        assert_eq!(result.location_source, Some(LocationSource::GridSingleFull));
        assert_eq!(result.dim_location_id, Some(10));
        assert!(!result.location_review_flag);
    }

    #[test]
    fn single_partial_match() {
        let result = resolver().enrich_location(
            &LocationInput::new("RABA")
                .with_building("FAB")
                .with_level("1F")
                .with_grid("E"),
        );
        assert_eq!(result.grid_completeness, GridCompleteness::RowOnly);
        assert_eq!(result.match_quality, MatchQuality::Partial);
        assert_eq!(result.location_source, Some(LocationSource::GridSinglePartial));
        assert_eq!(result.dim_location_id, Some(11));
    }

    #[test]
    fn single_gridline_match() {
        let result = resolver().enrich_location(
            &LocationInput::new("RABA")
                .with_building("FAB")
                .with_level("1F")
                .with_grid("GL-15"),
        );
        assert!(result.grid.gridline);
        assert_eq!(result.grid_completeness, GridCompleteness::ColOnly);
        assert_eq!(result.affected_rooms[0].match_type, MatchType::Gridline);
        assert_eq!(result.location_source, Some(LocationSource::Gridline));
        assert_eq!(result.dim_location_id, Some(12));
    }

    #[test]
    fn several_matches_fall_back_to_level() {
        let result = resolver().enrich_location(
            &LocationInput::new("RABA")
                .with_building("FAB")
                .with_level("1F")
                .with_grid("B"),
        );
        let codes: Vec<&str> = result
            .affected_rooms
            .iter()
            .map(|m| m.location_code.as_str())
            .collect();
        assert_eq!(codes, ["R1", "R5"]);
        assert_eq!(result.affected_rooms_count, 2);
        assert_eq!(result.location_source, Some(LocationSource::Level));
    }

    #[test]
    fn grid_without_level_skips_overlap() {
        let result = resolver().enrich_location(
            &LocationInput::new("RABA")
                .with_building("FAB")
                .with_grid("B/5"),
        );
        assert!(result.affected_rooms.is_empty());
        assert_eq!(result.match_quality, MatchQuality::None);
        assert_eq!(result.grid_completeness, GridCompleteness::Full);
        assert_eq!(result.location_source, Some(LocationSource::Building));
    }

    #[test]
    fn building_is_ignored_for_overlap() {
        let result = resolver().enrich_location(
            &LocationInput::new("RABA")
                .with_building("SUE")
                .with_level("1F")
                .with_grid("B/5"),
        );
        assert_eq!(result.building_normalized.as_deref(), Some("SUE"));
        assert_eq!(result.location_source, Some(LocationSource::GridSingleFull));
        assert_eq!(result.dim_location_id, Some(10));
    }

    #[test]
    fn room_code_variants_are_tried() {
        let resolver = resolver();
        let by_variant = |code: &str| {
            resolver
                .enrich_location(&LocationInput::new("RABA").with_room_code(code))
                .dim_location_id
        };
        assert_eq!(by_variant("FAB126401A"), Some(20));
        assert_eq!(by_variant("fab26401"), Some(20));
        assert_eq!(by_variant("Stair 21"), Some(30));
        assert_eq!(by_variant("STR-21"), Some(30));
        assert_eq!(by_variant("Elevator 2"), Some(31));
        assert_eq!(by_variant("N/A"), Some(1));
    }

    #[test]
    fn room_code_naming_a_level_uses_its_own_tier() {
        let resolver = resolver();
        let tier = |code: &str| {
            let result = resolver.enrich_location(
                &LocationInput::new("RABA")
                    .with_building("FAB")
                    .with_level("1F")
                    .with_room_code(code),
            );
            (result.dim_location_id, result.location_source)
        };
        assert_eq!(tier("SITE"), (Some(3), Some(LocationSource::Level)));
        assert_eq!(tier("FAB"), (Some(3), Some(LocationSource::Level)));
        assert_eq!(tier("FAB-1F"), (Some(3), Some(LocationSource::Level)));
        assert_eq!(tier("R1"), (Some(10), Some(LocationSource::RoomDirect)));

        let site_only = resolver
            .enrich_location(&LocationInput::new("RABA").with_room_code("SITE"));
        assert_eq!(site_only.location_source, Some(LocationSource::Site));
    }

    #[test]
    fn named_grid_resolves_without_room_code() {
        let input = LocationInput::new("RABA")
            .with_building("FAB")
            .with_level("1F")
            .with_grid("STR-21");

        let result = resolver().enrich_location(&input);
        assert_eq!(result.grid.pattern_kind, GridPatternKind::Named);
        assert_eq!(result.location_source, Some(LocationSource::RoomDirect));
        assert_eq!(result.dim_location_id, Some(30));

        let config = EnrichConfig {
            resolve_named_grid: false,
            ..EnrichConfig::default()
        };
        let result = resolver_with(records(true, true), config).enrich_location(&input);
        assert_eq!(result.location_source, Some(LocationSource::Level));
    }

    #[test]
    fn missing_site_leaves_the_row_unresolved() {
        let result = resolver_with(records(false, false), EnrichConfig::default())
            .enrich_location(&LocationInput::new("RABA").with_building("Warehouse 7"));
        assert_eq!(result.dim_location_id, None);
        assert_eq!(result.location_source, None);
        assert_eq!(result.building_normalized.as_deref(), Some("WAREHOUSE 7"));
    }

    #[test]
    fn tbm_dialect_is_chosen_by_source() {
        let resolver = resolver();
        let tbm = resolver.enrich_location(&LocationInput::new("tbm").with_grid("S62"));
        assert_eq!(tbm.grid.pattern_kind, GridPatternKind::Area);
        assert_eq!(tbm.grid.named_location.as_deref(), Some("S62"));

        let raba = resolver.enrich_location(&LocationInput::new("RABA").with_grid("S62"));
        assert_eq!(raba.grid.pattern_kind, GridPatternKind::Unparsed);
    }

    #[test]
    fn level_only_rows_are_flagged() {
        let result = resolver().enrich_location(
            &LocationInput::new("RABA")
                .with_building("FAB")
                .with_level("1st floor"),
        );
        assert_eq!(result.level_normalized.as_deref(), Some("1F"));
        assert_eq!(result.grid.pattern_kind, GridPatternKind::Empty);
        assert_eq!(result.grid_completeness, GridCompleteness::LevelOnly);
        assert!(result.location_review_flag);
    }

    #[test]
    fn quality_from_match_types() {
        let m = |code: &str, match_type| RoomMatch {
            location_code: code.to_string(),
            room_name: None,
            match_type,
        };
        assert_eq!(match_quality(&[]), MatchQuality::None);
        assert_eq!(
            match_quality(&[m("A", MatchType::Full), m("B", MatchType::Full)]),
            MatchQuality::Precise
        );
        assert_eq!(
            match_quality(&[m("A", MatchType::Full), m("B", MatchType::Partial)]),
            MatchQuality::Mixed
        );
        assert_eq!(
            match_quality(&[m("A", MatchType::Gridline), m("B", MatchType::Partial)]),
            MatchQuality::Partial
        );
    }

    #[test]
    fn resolver_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LocationResolver>();

        let resolver = Arc::new(resolver());
        let handles: Vec<_> = ["B/5", "E", "GL-15"]
            .into_iter()
            .map(|grid| {
                let resolver = Arc::clone(&resolver);
                std::thread::spawn(move || {
                    resolver
                        .enrich_location(
                            &LocationInput::new("RABA")
                                .with_building("FAB")
                                .with_level("1F")
                                .with_grid(grid),
                        )
                        .dim_location_id
                })
            })
            .collect();
        let ids: Vec<Option<i64>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(ids, [Some(10), Some(11), Some(12)]);
    }
}
