#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared location types for the construction-site location engine.
//!
//! Every source (inspection reports, work plans, schedule exports) resolves
//! its free-text location fields into the types defined here: a parsed
//! [`GridSpec`], a reference to a canonical [`LocationRecord`], and a
//! [`LocationEnrichmentResult`] describing how the resolution was made.
//!
//! This crate contains only data types and simple conversions. It has no
//! regexes and no I/O.

pub mod enrichment;
pub mod grid;
pub mod p6;
pub mod record;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use enrichment::{EnrichedLocationRow, LocationEnrichmentResult};
pub use grid::{GridBounds, GridRow, GridSpec, InvalidGridRowError, MAX_COLUMN, MIN_COLUMN};
pub use p6::{P6LocationResult, P6LocationSource, P6Task};
pub use record::{LocationRecord, RoomMatch};

/// How a grid string was classified by the parser.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GridPatternKind {
    /// Single row and single column (`"G/10"`).
    Point,
    /// Row range and/or column range (`"C-F/11-22"`).
    Range,
    /// Row information only (`"G"`, `"G/H"`, `"GL-N"`).
    RowOnly,
    /// Column information only (`"33"`, `"CL 5-12"`).
    ColOnly,
    /// Refers to a named entity such as a room, stair or elevator.
    Named,
    /// Whole-building or whole-floor reference with no grid information.
    Area,
    /// Non-empty text that no rule recognized.
    Unparsed,
    /// Empty input or a "no grid" sentinel.
    Empty,
}

impl GridPatternKind {
    /// Whether this kind carries grid bounds.
    #[must_use]
    pub const fn is_grid(self) -> bool {
        matches!(
            self,
            Self::Point | Self::Range | Self::RowOnly | Self::ColOnly
        )
    }
}

/// Kind of place a [`LocationRecord`] represents.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    /// A room with a physical grid footprint
    Room,
    /// An elevator shaft
    Elevator,
    /// A stairwell
    Stair,
    /// A named gridline
    Gridline,
    /// A whole floor of a building
    Level,
    /// A whole building
    Building,
    /// A named area that is not a room
    Area,
    /// The site-wide terminal fallback
    Site,
    /// Anything the reference table could not classify
    #[serde(other)]
    Undefined,
}

impl LocationType {
    /// Room, stair or elevator: the places an explicit room code can name.
    #[must_use]
    pub const fn is_direct_target(self) -> bool {
        matches!(self, Self::Room | Self::Stair | Self::Elevator)
    }
}

/// How a single room overlapped the query grid.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    /// Row and column ranges both overlap.
    Full,
    /// Only one axis could be compared.
    Partial,
    /// Only one axis could be compared and the query was a gridline
    /// reference.
    Gridline,
}

/// Which grid axes a parsed reference populated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GridCompleteness {
    /// Both row and column bounds.
    Full,
    /// Row bounds only.
    RowOnly,
    /// Column bounds only.
    ColOnly,
    /// No grid, but the level is known.
    LevelOnly,
    /// Neither grid nor level.
    None,
}

/// Aggregate quality of the affected-room list.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchQuality {
    /// Every match is [`MatchType::Full`].
    Precise,
    /// At least one full and at least one non-full match.
    Mixed,
    /// No full matches.
    Partial,
    /// No matches at all.
    None,
}

/// The precedence tier that produced a resolved location id.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationSource {
    /// Explicit room (or stair/elevator) code.
    RoomDirect,
    /// Exactly one room overlapped on both axes.
    GridSingleFull,
    /// Exactly one room overlapped on a single axis.
    GridSinglePartial,
    /// Exactly one room overlapped a gridline-only reference.
    Gridline,
    /// Building + level record.
    Level,
    /// Building-wide record.
    Building,
    /// Site-wide fallback.
    Site,
}

impl LocationSource {
    /// Returns all tiers in precedence order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::RoomDirect,
            Self::GridSingleFull,
            Self::GridSinglePartial,
            Self::Gridline,
            Self::Level,
            Self::Building,
            Self::Site,
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn enums_use_screaming_snake_case() {
        assert_eq!(GridPatternKind::RowOnly.to_string(), "ROW_ONLY");
        assert_eq!(LocationSource::GridSingleFull.as_ref(), "GRID_SINGLE_FULL");
        assert_eq!(
            LocationType::from_str("ELEVATOR").ok(),
            Some(LocationType::Elevator)
        );
        assert_eq!(GridCompleteness::LevelOnly.to_string(), "LEVEL_ONLY");
    }

    #[test]
    fn unknown_location_type_deserializes_as_undefined() {
        let parsed: LocationType = serde_json::from_str("\"LOADING_DOCK\"").unwrap();
        assert_eq!(parsed, LocationType::Undefined);
    }

    #[test]
    fn grid_kinds() {
        assert!(GridPatternKind::Point.is_grid());
        assert!(GridPatternKind::ColOnly.is_grid());
        assert!(!GridPatternKind::Named.is_grid());
        assert!(!GridPatternKind::Empty.is_grid());
    }

    #[test]
    fn direct_targets() {
        assert!(LocationType::Room.is_direct_target());
        assert!(LocationType::Stair.is_direct_target());
        assert!(LocationType::Elevator.is_direct_target());
        assert!(!LocationType::Level.is_direct_target());
        assert!(!LocationType::Site.is_direct_target());
    }
}
