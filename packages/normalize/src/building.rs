//! Building name normalization.
//!
//! Canonical building codes and their aliases live in
//! `aliases/buildings.toml`, embedded at compile time via [`include_str!`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::{clean_text, is_null_sentinel};

/// The alias table, embedded at compile time.
const BUILDINGS_TOML: &str = include_str!("../aliases/buildings.toml");

/// Aliases shorter than this are never matched by containment.
const MIN_CONTAINMENT_LEN: usize = 3;

/// One canonical building and the spellings that map to it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildingAliases {
    /// Canonical code (e.g. `"FAB"`).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Uppercase spellings seen in source documents.
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AliasFile {
    building: Vec<BuildingAliases>,
}

/// Errors from loading a building alias table.
#[derive(Debug, thiserror::Error)]
pub enum AliasError {
    /// The document is not valid TOML or is missing required fields.
    #[error("invalid alias table: {0}")]
    Toml(#[from] toml::de::Error),

    /// Two entries share a canonical code.
    #[error("duplicate building code {0:?}")]
    DuplicateCode(String),
}

/// Parses an alias table from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed, missing required fields, or
/// lists the same building code twice.
pub fn parse_alias_toml(toml_str: &str) -> Result<Vec<BuildingAliases>, AliasError> {
    let buildings = toml::de::from_str::<AliasFile>(toml_str)?.building;

    let mut seen = BTreeMap::new();
    for building in &buildings {
        if seen.insert(building.code.as_str(), ()).is_some() {
            return Err(AliasError::DuplicateCode(building.code.clone()));
        }
    }

    Ok(buildings)
}

struct AliasTable {
    buildings: Vec<BuildingAliases>,
    /// Cleaned alias → canonical code.
    exact: BTreeMap<String, String>,
    /// `(alias, code)` pairs for containment, longest alias first.
    contained: Vec<(String, String)>,
}

impl AliasTable {
    fn new(buildings: Vec<BuildingAliases>) -> Self {
        let mut exact = BTreeMap::new();
        let mut contained = Vec::new();

        for building in &buildings {
            let code = building.code.clone();
            let spellings = std::iter::once(&building.code).chain(&building.aliases);
            for alias in spellings {
                let alias = clean_text(alias);
                if alias.len() >= MIN_CONTAINMENT_LEN {
                    contained.push((alias.clone(), code.clone()));
                }
                exact.entry(alias).or_insert_with(|| code.clone());
            }
        }

        contained.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        contained.dedup();

        Self {
            buildings,
            exact,
            contained,
        }
    }

    fn lookup(&self, cleaned: &str) -> Option<&str> {
        if let Some(code) = self.exact.get(cleaned) {
            return Some(code.as_str());
        }
        self.contained
            .iter()
            .find(|(alias, _)| contains_word(cleaned, alias))
            .map(|(_, code)| code.as_str())
    }
}

static TABLE: LazyLock<AliasTable> = LazyLock::new(|| {
    let buildings = parse_alias_toml(BUILDINGS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse buildings.toml: {e}"));
    AliasTable::new(buildings)
});

/// Whether `needle` occurs in `haystack` on word boundaries, so `SUE`
/// matches `"SUE L2"` but not `"ISSUE"`.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Normalizes a building name to its canonical code.
///
/// Returns `None` only for empty or null-sentinel input. Unrecognized
/// names come back cleaned (uppercased, whitespace collapsed) rather than
/// dropped, since they may still be valid codes the table does not know.
#[must_use]
pub fn normalize_building(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    if is_null_sentinel(&cleaned) {
        return None;
    }

    match TABLE.lookup(&cleaned) {
        Some(code) => Some(code.to_string()),
        None => {
            log::trace!("unrecognized building {cleaned:?}");
            Some(cleaned)
        }
    }
}

/// Like [`normalize_building`], but only returns recognized codes.
#[must_use]
pub fn known_building(raw: &str) -> Option<&'static str> {
    let table: &'static AliasTable = &TABLE;
    table.lookup(&clean_text(raw))
}

/// Every canonical building code, in table order.
#[must_use]
pub fn building_codes() -> Vec<&'static str> {
    let table: &'static AliasTable = &TABLE;
    table.buildings.iter().map(|b| b.code.as_str()).collect()
}

/// The full alias table.
#[must_use]
pub fn buildings() -> &'static [BuildingAliases] {
    let table: &'static AliasTable = &TABLE;
    &table.buildings
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn embedded_table_parses() {
        let buildings = parse_alias_toml(BUILDINGS_TOML).unwrap();
        assert!(!buildings.is_empty());
        for building in &buildings {
            assert!(!building.name.is_empty(), "{}", building.code);
            assert_eq!(building.code, clean_text(&building.code));
        }
    }

    #[test]
    fn rejects_bad_alias_tables() {
        assert!(matches!(
            parse_alias_toml("building = 3"),
            Err(AliasError::Toml(_))
        ));

        let duplicated = r#"
            [[building]]
            code = "FAB"
            name = "Fab"

            [[building]]
            code = "FAB"
            name = "Fab again"
        "#;
        assert!(matches!(
            parse_alias_toml(duplicated),
            Err(AliasError::DuplicateCode(code)) if code == "FAB"
        ));
    }

    #[test]
    fn codes_are_unique() {
        let mut codes = building_codes();
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
    }

    #[test]
    fn every_code_maps_to_itself() {
        for code in building_codes() {
            assert_eq!(normalize_building(code).as_deref(), Some(code));
        }
    }

    #[test]
    fn exact_aliases() {
        assert_eq!(normalize_building("FAB1").as_deref(), Some("FAB"));
        assert_eq!(normalize_building("main fab").as_deref(), Some("FAB"));
        assert_eq!(normalize_building("  T1   FAB ").as_deref(), Some("FAB"));
        assert_eq!(normalize_building("Support East").as_deref(), Some("SUE"));
        assert_eq!(normalize_building("SUPPORT WEST").as_deref(), Some("SUW"));
    }

    #[test]
    fn containment_prefers_longest_alias() {
        assert_eq!(normalize_building("FAB INTERSTITIAL NORTH").as_deref(), Some("FIZ"));
        assert_eq!(normalize_building("SUE L2 mech room").as_deref(), Some("SUE"));
        assert_eq!(normalize_building("Main Fab - cleanroom").as_deref(), Some("FAB"));
    }

    #[test]
    fn containment_respects_word_boundaries() {
        assert_eq!(normalize_building("ISSUE LOG").as_deref(), Some("ISSUE LOG"));
        assert!(known_building("PREFAB SHOP").is_none());
    }

    #[test]
    fn unknown_passes_through_cleaned() {
        assert_eq!(normalize_building(" warehouse  7 ").as_deref(), Some("WAREHOUSE 7"));
        assert!(known_building("WAREHOUSE 7").is_none());
    }

    #[test]
    fn null_inputs() {
        assert_eq!(normalize_building(""), None);
        assert_eq!(normalize_building("  "), None);
        assert_eq!(normalize_building("N/A"), None);
        assert_eq!(normalize_building("null"), None);
    }

    proptest! {
        #[test]
        fn prop_normalize_building_is_idempotent(raw in "[A-Za-z0-9 ./&-]{0,24}") {
            if let Some(once) = normalize_building(&raw) {
                prop_assert_eq!(normalize_building(&once), Some(once.clone()));
            }
        }

        #[test]
        fn prop_normalize_building_is_total(raw in "\\PC{0,64}") {
            let _ = normalize_building(&raw);
            let _ = known_building(&raw);
        }
    }
}
