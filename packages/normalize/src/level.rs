//! Level (floor) normalization.
//!
//! Canonical level codes are `"{n}F"` for numbered floors, `"B1"`/`"B2"`
//! for basements, `"ROOF"` and `"OUTSIDE"`.

use std::sync::LazyLock;

use regex::Regex;

use crate::{clean_text, is_null_sentinel};

const BASEMENT_1: &[&str] = &[
    "B1",
    "B01",
    "B1F",
    "B-1",
    "BASEMENT",
    "BASEMENT 1",
    "BASEMENT1",
    "BSMT",
    "BSMT 1",
    "UG",
    "UNDERGROUND",
    "LOWER LEVEL",
    "LL",
    "CELLAR",
];

const BASEMENT_2: &[&str] = &[
    "B2",
    "B02",
    "B2F",
    "B-2",
    "BASEMENT 2",
    "BASEMENT2",
    "BSMT 2",
    "SUB BASEMENT",
    "SUB-BASEMENT",
];

const ROOF: &[&str] = &[
    "ROOF",
    "RF",
    "ROOFTOP",
    "ROOF TOP",
    "PENTHOUSE",
    "PH",
    "ROOF LEVEL",
];

const OUTSIDE: &[&str] = &[
    "OUTSIDE",
    "EXTERIOR",
    "EXT",
    "GROUND",
    "GRADE",
    "AT GRADE",
    "ON GRADE",
    "YARD",
    "OUTDOOR",
    "OUTDOORS",
    "SITE",
];

const ORDINAL_WORDS: &[&str] = &[
    "FIRST", "SECOND", "THIRD", "FOURTH", "FIFTH", "SIXTH", "SEVENTH", "EIGHTH", "NINTH", "TENTH",
];

/// `LEVEL 2`, `LVL-2`, `FLOOR 3`, `FL 3`.
static WORD_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:LEVEL|LVL|LEV|LV|FLOOR|FLR|FL)\s*[-#.:]?\s*(?P<rest>\S.*)$")
        .expect("valid regex")
});

/// `L2`, `L-2`, `L 02`.
static L_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^L\s*-?\s*(?P<rest>\d.*)$").expect("valid regex"));

/// `3RD FLOOR`, `2 LEVEL`.
static WORD_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<rest>.+?)\s*(?:FLOOR|FLR|LEVEL)$").expect("valid regex")
});

/// `1ST`, `2ND`, `3RD`, `4TH`.
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0*(?P<n>\d{1,2})\s*(?:ST|ND|RD|TH)$").expect("valid regex"));

/// `1`, `01`, `1F`, `01F`, `F1`.
static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:0*(?P<n>\d{1,2})\s*F|F\s*0*(?P<m>\d{1,2})|0*(?P<k>\d{1,2}))$")
        .expect("valid regex")
});

/// Maps a level that needs no prefix stripping.
fn direct(text: &str) -> Option<String> {
    let matches = |table: &[&str]| table.contains(&text);

    if matches(BASEMENT_1) {
        return Some("B1".to_string());
    }
    if matches(BASEMENT_2) {
        return Some("B2".to_string());
    }
    if matches(ROOF) {
        return Some("ROOF".to_string());
    }
    if matches(OUTSIDE) {
        return Some("OUTSIDE".to_string());
    }

    if let Some(pos) = ORDINAL_WORDS.iter().position(|w| *w == text) {
        return Some(format!("{}F", pos + 1));
    }

    let caps = ORDINAL_RE
        .captures(text)
        .or_else(|| NUMERIC_RE.captures(text))?;
    let digits = caps
        .name("n")
        .or_else(|| caps.name("m"))
        .or_else(|| caps.name("k"))?;
    let n: u32 = digits.as_str().parse().ok()?;
    Some(format!("{n}F"))
}

/// Strips one prefix or suffix word, if present.
fn strip(text: &str) -> Option<String> {
    [&*WORD_PREFIX_RE, &*L_PREFIX_RE, &*WORD_SUFFIX_RE]
        .iter()
        .find_map(|re| re.captures(text))
        .map(|caps| caps["rest"].trim().to_string())
}

/// Normalizes a level to its canonical code.
///
/// Returns `None` only for empty or null-sentinel input. Anything not
/// recognized comes back cleaned but otherwise unchanged.
#[must_use]
pub fn normalize_level(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    if is_null_sentinel(&cleaned) {
        return None;
    }

    if let Some(code) = direct(&cleaned) {
        return Some(code);
    }

    // "LEVEL 3RD FLOOR" needs two passes.
    let mut text = cleaned.clone();
    for _ in 0..2 {
        let Some(stripped) = strip(&text) else {
            break;
        };
        if let Some(code) = direct(&stripped) {
            return Some(code);
        }
        text = stripped;
    }

    log::trace!("unrecognized level {cleaned:?}");
    Some(cleaned)
}

/// Floor number of a `"{n}F"` code.
#[must_use]
pub fn floor_number(level: &str) -> Option<u32> {
    level.strip_suffix('F')?.parse().ok()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn level(raw: &str) -> Option<String> {
        normalize_level(raw)
    }

    #[test]
    fn numbered_floors() {
        for raw in ["1", "01", "1F", "01F", "F1", "LEVEL 1", "Lvl 1", "L1", "L-1", "FLOOR 1", "1st", "First", "1st floor"] {
            assert_eq!(level(raw).as_deref(), Some("1F"), "{raw}");
        }
        assert_eq!(level("3rd Floor").as_deref(), Some("3F"));
        assert_eq!(level("Level 02").as_deref(), Some("2F"));
        assert_eq!(level("seventh").as_deref(), Some("7F"));
        assert_eq!(level("12").as_deref(), Some("12F"));
    }

    #[test]
    fn basements() {
        for raw in ["B1", "Basement", "Basement 1", "BSMT", "UG", "underground", "lower level"] {
            assert_eq!(level(raw).as_deref(), Some("B1"), "{raw}");
        }
        for raw in ["B2", "BASEMENT 2", "Sub-basement"] {
            assert_eq!(level(raw).as_deref(), Some("B2"), "{raw}");
        }
        assert_eq!(level("Basement Level").as_deref(), Some("B1"));
    }

    #[test]
    fn roof_and_outside() {
        for raw in ["ROOF", "RF", "rooftop", "Penthouse", "Roof Level"] {
            assert_eq!(level(raw).as_deref(), Some("ROOF"), "{raw}");
        }
        for raw in ["outside", "Exterior", "GROUND", "Ground Floor", "at grade", "outdoors"] {
            assert_eq!(level(raw).as_deref(), Some("OUTSIDE"), "{raw}");
        }
    }

    #[test]
    fn unknown_passes_through_cleaned() {
        assert_eq!(level(" mezzanine  north ").as_deref(), Some("MEZZANINE NORTH"));
        assert_eq!(level("LEVEL X").as_deref(), Some("LEVEL X"));
    }

    #[test]
    fn null_inputs() {
        assert_eq!(level(""), None);
        assert_eq!(level("NA"), None);
        assert_eq!(level("none"), None);
    }

    #[test]
    fn floor_numbers() {
        assert_eq!(floor_number("3F"), Some(3));
        assert_eq!(floor_number("B1"), None);
        assert_eq!(floor_number("ROOF"), None);
    }

    #[test]
    fn canonical_codes_are_fixed_points() {
        for code in ["1F", "2F", "3F", "4F", "5F", "6F", "7F", "B1", "B2", "ROOF", "OUTSIDE"] {
            assert_eq!(level(code).as_deref(), Some(code));
        }
    }

    proptest! {
        #[test]
        fn prop_normalize_level_is_idempotent(raw in "[A-Za-z0-9 .#:-]{0,20}") {
            if let Some(once) = normalize_level(&raw) {
                prop_assert_eq!(normalize_level(&once), Some(once.clone()));
            }
        }

        #[test]
        fn prop_normalize_level_is_total(raw in "\\PC{0,64}") {
            let _ = normalize_level(&raw);
        }
    }
}
