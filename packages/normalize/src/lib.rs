#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalization of the non-grid parts of a location: building names,
//! level names and embedded room/stair/elevator codes.
//!
//! Every function here is total. Bad input never errors; at worst it comes
//! back cleaned and unrecognized.

pub mod building;
pub mod codes;
pub mod level;

use std::sync::LazyLock;

use regex::Regex;

pub use building::{AliasError, building_codes, known_building, normalize_building};
pub use codes::{CodeCandidate, LocationCodes, extract_location_codes};
pub use level::normalize_level;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Values that mean "no value" in source spreadsheets.
const NULL_SENTINELS: &[&str] = &["", "N/A", "NA", "NONE", "NULL", "NAN", "NIL", "-", "--"];

/// Trims, uppercases and collapses internal whitespace.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    WHITESPACE_RE
        .replace_all(raw.trim(), " ")
        .to_uppercase()
}

/// Whether cleaned text is empty or a null sentinel.
#[must_use]
pub fn is_null_sentinel(cleaned: &str) -> bool {
    NULL_SENTINELS.contains(&cleaned)
}

/// Joins a normalized building and level into the `"{building}-{level}"`
/// display form used as the level record's location code.
#[must_use]
pub fn building_level(building: Option<&str>, level: Option<&str>) -> Option<String> {
    Some(format!("{}-{}", building?, level?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn very_long_repeated_input_is_total() {
        const SEEDS: &[&str] = &[
            "A", "~", "GL-", "A/1,", "FAB1", "LEVEL ", "\u{e9}", "FAB12640", "STAIR ",
            "ELEV. ", "1ST ", "B", " ", "L-",
        ];
        for seed in SEEDS {
            let raw = seed.repeat(200_000);
            let _ = normalize_building(&raw);
            let _ = normalize_level(&raw);
            let codes = extract_location_codes(&raw);
            for candidate in codes.iter() {
                assert!(!candidate.variants.is_empty(), "{seed:?}");
            }
        }
    }

    #[test]
    fn cleans_text() {
        assert_eq!(clean_text("  main\t fab \n"), "MAIN FAB");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn sentinels() {
        for value in ["", "N/A", "NA", "NONE", "NULL", "NAN", "-"] {
            assert!(is_null_sentinel(value), "{value}");
        }
        assert!(!is_null_sentinel("FAB"));
    }

    #[test]
    fn joins_building_level() {
        assert_eq!(building_level(Some("FAB"), Some("1F")).as_deref(), Some("FAB-1F"));
        assert_eq!(building_level(Some("FAB"), None), None);
        assert_eq!(building_level(None, Some("1F")), None);
    }
}
