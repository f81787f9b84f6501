#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Read-only location dimension store.
//!
//! Loads the canonical location table (rooms, stairs, elevators, levels,
//! buildings and the single site record) once, indexes it by code and id,
//! and answers the lookups the hierarchy resolver needs. A
//! [`LocationDimension`] is immutable; share it behind an `Arc` and call
//! [`LocationDimension::reload`] to get a fresh snapshot.

pub mod overlap;
pub mod paths;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use fab_locate_location_models::{GridSpec, LocationRecord, LocationType, RoomMatch};

/// Errors that can occur when loading the dimension table.
#[derive(Debug, thiserror::Error)]
pub enum DimensionError {
    /// The backing file could not be opened.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The CSV header could not be read.
    #[error("CSV error reading {path}: {source}")]
    Csv {
        /// File path, or `"<reader>"` for in-memory input.
        path: String,
        /// Underlying error.
        source: csv::Error,
    },

    /// Two records share a location code.
    #[error("Duplicate location_code: {0}")]
    DuplicateCode(String),

    /// Two records share a location id.
    #[error("Duplicate location_id: {0}")]
    DuplicateId(i64),

    /// More than one SITE record.
    #[error("Multiple SITE records: {first} and {second}")]
    MultipleSiteRecords {
        /// Code of the first SITE record.
        first: String,
        /// Code of the second SITE record.
        second: String,
    },

    /// [`LocationDimension::reload`] was called on a table built in memory.
    #[error("Dimension table has no backing file to reload from")]
    NoBackingFile,
}

/// Record counts, logged when a table is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionStats {
    /// All records.
    pub total: usize,
    /// `ROOM` records.
    pub rooms: usize,
    /// Rooms with any grid footprint.
    pub rooms_with_grid: usize,
    /// Rooms whose footprint was copied from a sibling.
    pub inferred_grids: usize,
    /// `LEVEL` records.
    pub levels: usize,
    /// `BUILDING` records.
    pub buildings: usize,
    /// `STAIR` records.
    pub stairs: usize,
    /// `ELEVATOR` records.
    pub elevators: usize,
    /// Whether the SITE fallback exists.
    pub has_site: bool,
}

/// Normalizes a code for index lookups.
fn code_key(code: &str) -> String {
    code.trim().to_uppercase()
}

fn eq_ignore_case(value: Option<&str>, expected: &str) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
}

/// Swaps `min`/`max` when they arrive reversed.
fn order_bounds<T: PartialOrd>(code: &str, axis: &str, min: &mut Option<T>, max: &mut Option<T>) {
    if let (Some(lo), Some(hi)) = (min.as_ref(), max.as_ref())
        && lo > hi
    {
        log::warn!("{code}: reversed {axis} bounds, swapping");
        std::mem::swap(min, max);
    }
}

/// The in-memory location dimension table.
#[derive(Debug, Clone)]
pub struct LocationDimension {
    records: Vec<LocationRecord>,
    by_code: BTreeMap<String, usize>,
    by_id: BTreeMap<i64, usize>,
    site: Option<usize>,
    source: Option<PathBuf>,
}

impl LocationDimension {
    /// Builds a table from records.
    ///
    /// Reversed grid bounds are swapped with a warning. A missing SITE
    /// record is allowed but logged, since every fallback chain ends there.
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicate code or id, or more than one SITE
    /// record.
    pub fn from_records(records: Vec<LocationRecord>) -> Result<Self, DimensionError> {
        let mut by_code = BTreeMap::new();
        let mut by_id = BTreeMap::new();
        let mut site: Option<usize> = None;
        let mut cleaned = Vec::with_capacity(records.len());

        for (index, mut record) in records.into_iter().enumerate() {
            order_bounds(
                &record.location_code,
                "row",
                &mut record.grid_row_min,
                &mut record.grid_row_max,
            );
            order_bounds(
                &record.location_code,
                "column",
                &mut record.grid_col_min,
                &mut record.grid_col_max,
            );

            if by_code
                .insert(code_key(&record.location_code), index)
                .is_some()
            {
                return Err(DimensionError::DuplicateCode(record.location_code));
            }
            if by_id.insert(record.location_id, index).is_some() {
                return Err(DimensionError::DuplicateId(record.location_id));
            }

            if record.location_type == LocationType::Site {
                if let Some(first) = site {
                    let first: &LocationRecord = &cleaned[first];
                    return Err(DimensionError::MultipleSiteRecords {
                        first: first.location_code.clone(),
                        second: record.location_code,
                    });
                }
                site = Some(index);
            }

            cleaned.push(record);
        }

        if site.is_none() {
            log::warn!("Location dimension has no SITE record; unresolved rows will have no id");
        }

        let dimension = Self {
            records: cleaned,
            by_code,
            by_id,
            site,
            source: None,
        };

        let stats = dimension.stats();
        log::info!(
            "Loaded {} locations ({} rooms, {} with grid, {} inferred; {} levels, {} buildings, {} stairs, {} elevators)",
            stats.total,
            stats.rooms,
            stats.rooms_with_grid,
            stats.inferred_grids,
            stats.levels,
            stats.buildings,
            stats.stairs,
            stats.elevators,
        );

        Ok(dimension)
    }

    /// Parses a table from CSV.
    ///
    /// Extra columns are ignored and empty cells are null. Rows that fail
    /// to deserialize are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be read or the records fail
    /// validation (see [`Self::from_records`]).
    pub fn from_reader(reader: impl Read) -> Result<Self, DimensionError> {
        let records = read_records(reader, "<reader>")?;
        Self::from_records(records)
    }

    /// Loads a table from a CSV file, remembering the path for
    /// [`Self::reload`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn from_csv_path(path: &Path) -> Result<Self, DimensionError> {
        log::info!("Loading location dimension from {}", path.display());

        let file = std::fs::File::open(path).map_err(|e| DimensionError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let records = read_records(file, &path.display().to_string())?;

        let mut dimension = Self::from_records(records)?;
        dimension.source = Some(path.to_path_buf());
        Ok(dimension)
    }

    /// Loads the table from [`paths::dimension_path`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn load_default() -> Result<Self, DimensionError> {
        Self::from_csv_path(&paths::dimension_path())
    }

    /// Builds a fresh snapshot from the same backing file.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError::NoBackingFile`] for tables built in
    /// memory, or any load error.
    pub fn reload(&self) -> Result<Self, DimensionError> {
        let path = self.source.as_ref().ok_or(DimensionError::NoBackingFile)?;
        Self::from_csv_path(path)
    }

    /// Path the table was loaded from, if any.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// All records, in load order.
    #[must_use]
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record with the given id.
    #[must_use]
    pub fn get(&self, location_id: i64) -> Option<&LocationRecord> {
        self.by_id.get(&location_id).map(|&i| &self.records[i])
    }

    /// Record with the given code (case-insensitive).
    #[must_use]
    pub fn get_by_code(&self, code: &str) -> Option<&LocationRecord> {
        self.by_code.get(&code_key(code)).map(|&i| &self.records[i])
    }

    /// Id of the record with the given code.
    #[must_use]
    pub fn lookup_by_code(&self, code: &str) -> Option<i64> {
        self.get_by_code(code).map(|r| r.location_id)
    }

    /// Id of the SITE record.
    #[must_use]
    pub fn site_id(&self) -> Option<i64> {
        self.site.map(|i| self.records[i].location_id)
    }

    /// Id of the level record for `building` + `level`.
    ///
    /// Tries the `"{building}-{level}"` code first, then any `LEVEL`
    /// record carrying that building and level.
    #[must_use]
    pub fn lookup_level(&self, building: &str, level: &str) -> Option<i64> {
        if let Some(record) = self.get_by_code(&format!("{building}-{level}"))
            && record.location_type == LocationType::Level
        {
            return Some(record.location_id);
        }

        self.records
            .iter()
            .find(|r| {
                r.location_type == LocationType::Level
                    && eq_ignore_case(r.building.as_deref(), building)
                    && eq_ignore_case(r.level.as_deref(), level)
            })
            .map(|r| r.location_id)
    }

    /// Id of the building-wide record for `building`.
    #[must_use]
    pub fn lookup_building(&self, building: &str) -> Option<i64> {
        if let Some(record) = self.get_by_code(building)
            && record.location_type == LocationType::Building
        {
            return Some(record.location_id);
        }

        self.records
            .iter()
            .find(|r| {
                r.location_type == LocationType::Building
                    && eq_ignore_case(r.building.as_deref(), building)
            })
            .map(|r| r.location_id)
    }

    /// Resolves a building/level pair.
    ///
    /// Returns the level record when both are known. With
    /// `allow_fallback`, falls back to the building-wide record and then
    /// the SITE record.
    #[must_use]
    pub fn lookup_by_building_level(
        &self,
        building: Option<&str>,
        level: Option<&str>,
        allow_fallback: bool,
    ) -> Option<i64> {
        let exact = building
            .zip(level)
            .and_then(|(building, level)| self.lookup_level(building, level));
        if exact.is_some() || !allow_fallback {
            return exact;
        }

        building
            .and_then(|building| self.lookup_building(building))
            .or_else(|| self.site_id())
    }

    /// Rooms on `level` whose footprint intersects `query`.
    ///
    /// Building is ignored: rooms are scanned by level alone. Returns an
    /// empty list when the query has no grid axis.
    #[must_use]
    pub fn affected_rooms(&self, level: &str, query: &GridSpec) -> Vec<RoomMatch> {
        if !query.has_rows() && !query.has_cols() {
            return Vec::new();
        }

        let rooms = self.records.iter().filter(|r| {
            r.location_type == LocationType::Room && eq_ignore_case(r.level.as_deref(), level)
        });

        let matches = overlap::match_rooms(query, query.gridline, rooms);
        log::trace!(
            "{} rooms on {level} match {:?}",
            matches.len(),
            query.raw_text
        );
        matches
    }

    /// Record counts by type.
    #[must_use]
    pub fn stats(&self) -> DimensionStats {
        let mut stats = DimensionStats {
            total: self.records.len(),
            has_site: self.site.is_some(),
            ..DimensionStats::default()
        };

        for record in &self.records {
            match record.location_type {
                LocationType::Room => {
                    stats.rooms += 1;
                    if record.has_grid() {
                        stats.rooms_with_grid += 1;
                    }
                    if record.grid_inferred_from.is_some() {
                        stats.inferred_grids += 1;
                    }
                }
                LocationType::Level => stats.levels += 1,
                LocationType::Building => stats.buildings += 1,
                LocationType::Stair => stats.stairs += 1,
                LocationType::Elevator => stats.elevators += 1,
                _ => {}
            }
        }

        stats
    }
}

fn read_records(reader: impl Read, label: &str) -> Result<Vec<LocationRecord>, DimensionError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Surface a bad header as an error instead of a stream of skipped rows.
    reader.headers().map_err(|e| DimensionError::Csv {
        path: label.to_string(),
        source: e,
    })?;

    let mut records = Vec::new();
    let mut skipped = 0u64;

    for (line, result) in reader.deserialize::<LocationRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                log::warn!("{label}: skipping row {}: {e}", line + 2);
            }
        }
    }

    if skipped > 0 {
        log::warn!("{label}: skipped {skipped} malformed rows");
    }

    Ok(records)
}
