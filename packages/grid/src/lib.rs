#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Free-text grid reference parser.
//!
//! Turns strings such as `"G/10"`, `"C/11 - C/22"`, `"GL-33/K-N"` or
//! `"SUW 5-6/L-N"` into a [`GridSpec`] with sorted row and column bounds.
//! Parsing is total: anything unrecognized comes back as
//! [`GridPatternKind::Unparsed`] or [`GridPatternKind::Empty`] with no
//! bounds, never as an error.
//!
//! Two dialects are provided. [`parse_grid`] handles inspection reports and
//! schedule exports; [`parse_tbm_grid`] additionally understands the level
//! prefixes, sectors and room names found in daily work plans.

pub mod clean;
pub mod rule;
pub mod standard;
pub mod tbm;

use std::sync::LazyLock;

use fab_locate_location_models::{GridPatternKind, GridSpec};
use strum_macros::{AsRefStr, Display, EnumString};

pub use clean::clean;
pub use rule::{GridMatch, GridRule, Rewrite};

/// Upper bound on rewrite passes. Every rewrite strictly shortens the
/// text, so this is only reached by inputs stacking many decorations.
const MAX_REWRITE_PASSES: usize = 4;

/// Which grid dialect to parse with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GridDialect {
    /// Inspection reports, weekly reports and schedule exports.
    Standard,
    /// Daily work plans.
    Tbm,
}

impl GridDialect {
    /// Parses `raw` with this dialect.
    #[must_use]
    pub fn parse(self, raw: &str) -> GridSpec {
        self.parser().parse(raw)
    }

    /// The shared parser for this dialect.
    #[must_use]
    pub fn parser(self) -> &'static GridParser {
        match self {
            Self::Standard => &STANDARD,
            Self::Tbm => &TBM,
        }
    }
}

static STANDARD: LazyLock<GridParser> = LazyLock::new(GridParser::standard);
static TBM: LazyLock<GridParser> = LazyLock::new(GridParser::tbm);

/// An ordered rule table plus the screens and rewrites that run before
/// it.
#[derive(Debug)]
pub struct GridParser {
    dialect: GridDialect,
    screens: Vec<GridRule>,
    rewrites: Vec<Rewrite>,
    rules: Vec<GridRule>,
}

impl GridParser {
    /// The general dialect.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            dialect: GridDialect::Standard,
            screens: standard::screens(),
            rewrites: Vec::new(),
            rules: standard::rules(),
        }
    }

    /// The work-plan dialect: work-plan screens, rewrites and rules ahead
    /// of the standard tables.
    #[must_use]
    pub fn tbm() -> Self {
        Self {
            dialect: GridDialect::Tbm,
            screens: tbm::screens().into_iter().chain(standard::screens()).collect(),
            rewrites: tbm::rewrites(),
            rules: tbm::rules().into_iter().chain(standard::rules()).collect(),
        }
    }

    /// Which dialect this parser implements.
    #[must_use]
    pub const fn dialect(&self) -> GridDialect {
        self.dialect
    }

    /// The ordered grid rules, after screens and rewrites.
    #[must_use]
    pub fn rules(&self) -> &[GridRule] {
        &self.rules
    }

    /// The screens that run before the grid rules.
    #[must_use]
    pub fn screens(&self) -> &[GridRule] {
        &self.screens
    }

    /// Parses a grid string.
    #[must_use]
    pub fn parse(&self, raw: &str) -> GridSpec {
        self.parse_traced(raw).0
    }

    /// Parses a grid string and reports the name of the rule that matched,
    /// or `None` when the input was empty or nothing matched.
    #[must_use]
    pub fn parse_traced(&self, raw: &str) -> (GridSpec, Option<&'static str>) {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            return (GridSpec::empty(cleaned), None);
        }

        if let Some(hit) = first_match(&self.screens, &cleaned) {
            return hit.finish(&cleaned);
        }

        let rewritten = self.rewrite(&cleaned);
        if rewritten != cleaned {
            if rewritten.is_empty() {
                return (GridSpec::area(cleaned, None), None);
            }
            if let Some(hit) = first_match(&self.screens, &rewritten) {
                return hit.finish(&cleaned);
            }
        }

        if let Some(hit) = first_match(&self.rules, &rewritten) {
            return hit.finish(&cleaned);
        }

        log::trace!("grid {cleaned:?}: no {} rule matched", self.dialect);
        (GridSpec::unparsed(cleaned), None)
    }

    fn rewrite(&self, text: &str) -> String {
        let mut current = text.to_string();
        for _ in 0..MAX_REWRITE_PASSES {
            let Some((name, next)) = self
                .rewrites
                .iter()
                .find_map(|rewrite| rewrite.apply(&current).map(|next| (rewrite.name(), next)))
            else {
                break;
            };
            log::trace!("grid {current:?}: {name} -> {next:?}");
            current = next;
        }
        current
    }
}

struct Hit {
    rule: &'static str,
    found: GridMatch,
}

impl Hit {
    fn finish(self, cleaned: &str) -> (GridSpec, Option<&'static str>) {
        log::trace!("grid {cleaned:?}: matched {}", self.rule);
        (self.found.into_spec(cleaned), Some(self.rule))
    }
}

fn first_match(rules: &[GridRule], text: &str) -> Option<Hit> {
    rules.iter().find_map(|rule| {
        rule.apply(text).map(|found| Hit {
            rule: rule.name(),
            found,
        })
    })
}

/// Parses a grid string from inspection reports, weekly reports and
/// schedule exports.
#[must_use]
pub fn parse_grid(raw: &str) -> GridSpec {
    STANDARD.parse(raw)
}

/// Parses a grid string from a daily work plan.
#[must_use]
pub fn parse_tbm_grid(raw: &str) -> GridSpec {
    TBM.parse(raw)
}

/// [`parse_grid`] for optional input; `None` is an empty reference.
#[must_use]
pub fn parse_grid_opt(raw: Option<&str>) -> GridSpec {
    raw.map_or_else(|| GridSpec::empty(""), parse_grid)
}

/// Whether `spec` carries any usable grid bounds.
#[must_use]
pub const fn has_bounds(spec: &GridSpec) -> bool {
    spec.pattern_kind.is_grid()
}

/// Classifies `raw` without keeping the bounds.
#[must_use]
pub fn classify(raw: &str) -> GridPatternKind {
    parse_grid(raw).pattern_kind
}

#[cfg(test)]
mod tests {
    use fab_locate_location_models::GridRow;
    use proptest::prelude::*;

    use super::*;

    fn row(s: &str) -> Option<GridRow> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn very_long_repeated_input_is_total() {
        const SEEDS: &[&str] = &[
            "A", "~", "GL-", "A/1,", "FAB1", "LEVEL ", "\u{e9}", "/", "1", "-", "G 10-",
            "ROW G COL ", "L1- ", "STAIR ",
        ];
        for seed in SEEDS {
            let raw = seed.repeat(200_000);
            for spec in [parse_grid(&raw), parse_tbm_grid(&raw)] {
                if let (Some(min), Some(max)) = (spec.row_min, spec.row_max) {
                    assert!(min <= max, "{seed:?}");
                }
                if let (Some(min), Some(max)) = (spec.col_min, spec.col_max) {
                    assert!(min <= max, "{seed:?}");
                }
            }
        }
    }

    fn assert_grid(
        spec: &GridSpec,
        kind: GridPatternKind,
        rows: (Option<GridRow>, Option<GridRow>),
        cols: (Option<f64>, Option<f64>),
    ) {
        assert_eq!(spec.pattern_kind, kind, "{}", spec.raw_text);
        assert_eq!((spec.row_min, spec.row_max), rows, "{}", spec.raw_text);
        assert_eq!((spec.col_min, spec.col_max), cols, "{}", spec.raw_text);
    }

    #[test]
    fn point() {
        assert_grid(
            &parse_grid("G/10"),
            GridPatternKind::Point,
            (row("G"), row("G")),
            (Some(10.0), Some(10.0)),
        );
        assert_grid(
            &parse_grid("10/G"),
            GridPatternKind::Point,
            (row("G"), row("G")),
            (Some(10.0), Some(10.0)),
        );
        assert_grid(
            &parse_grid("g10"),
            GridPatternKind::Point,
            (row("G"), row("G")),
            (Some(10.0), Some(10.0)),
        );
    }

    #[test]
    fn point_to_point_range() {
        let spec = parse_grid("C/11 - C/22");
        assert_grid(
            &spec,
            GridPatternKind::Range,
            (row("C"), row("C")),
            (Some(11.0), Some(22.0)),
        );
        assert_eq!(spec.normalized().as_deref(), Some("C/11-22"));
        assert_eq!(spec.raw_text, "C/11 - C/22");
    }

    #[test]
    fn unicode_dash_range() {
        assert_grid(
            &parse_grid("C/11 \u{2013} F/22"),
            GridPatternKind::Range,
            (row("C"), row("F")),
            (Some(11.0), Some(22.0)),
        );
    }

    #[test]
    fn full_ranges() {
        assert_grid(
            &parse_grid("C-F/11-22"),
            GridPatternKind::Range,
            (row("C"), row("F")),
            (Some(11.0), Some(22.0)),
        );
        assert_grid(
            &parse_grid("C11-F22"),
            GridPatternKind::Range,
            (row("C"), row("F")),
            (Some(11.0), Some(22.0)),
        );
        assert_grid(
            &parse_grid("5-6/L-N"),
            GridPatternKind::Range,
            (row("L"), row("N")),
            (Some(5.0), Some(6.0)),
        );
    }

    #[test]
    fn reversed_ranges_are_sorted() {
        assert_grid(
            &parse_grid("N-29-23"),
            GridPatternKind::Range,
            (row("N"), row("N")),
            (Some(23.0), Some(29.0)),
        );
        assert_grid(
            &parse_grid("F-C/22-11"),
            GridPatternKind::Range,
            (row("C"), row("F")),
            (Some(11.0), Some(22.0)),
        );
    }

    #[test]
    fn gridline_with_row_range() {
        let spec = parse_grid("GL-33/K-N");
        assert_grid(
            &spec,
            GridPatternKind::Range,
            (row("K"), row("N")),
            (Some(33.0), Some(33.0)),
        );
        assert!(spec.gridline);
    }

    #[test]
    fn building_prefixed_range() {
        assert_grid(
            &parse_grid("SUW 5-6/L-N"),
            GridPatternKind::Range,
            (row("L"), row("N")),
            (Some(5.0), Some(6.0)),
        );
    }

    #[test]
    fn two_letter_shorthand() {
        assert_grid(
            &parse_grid("LM 6,4"),
            GridPatternKind::Range,
            (row("L"), row("M")),
            (Some(4.0), Some(6.0)),
        );
    }

    #[test]
    fn fractional_rows() {
        assert_grid(
            &parse_grid("G.3~H.8"),
            GridPatternKind::RowOnly,
            (row("G.3"), row("H.8")),
            (None, None),
        );
        assert_grid(
            &parse_grid("F.5/10"),
            GridPatternKind::Point,
            (row("F.5"), row("F.5")),
            (Some(10.0), Some(10.0)),
        );
    }

    #[test]
    fn row_only_forms() {
        for text in ["G", "ROW G", "G LINE"] {
            assert_grid(
                &parse_grid(text),
                GridPatternKind::RowOnly,
                (row("G"), row("G")),
                (None, None),
            );
        }
        for text in ["G/H", "G-H", "H-G"] {
            assert_grid(
                &parse_grid(text),
                GridPatternKind::RowOnly,
                (row("G"), row("H")),
                (None, None),
            );
        }
        let spec = parse_grid("GL-N");
        assert_eq!(spec.pattern_kind, GridPatternKind::RowOnly);
        assert!(spec.gridline);
    }

    #[test]
    fn col_only_forms() {
        assert_grid(
            &parse_grid("33"),
            GridPatternKind::ColOnly,
            (None, None),
            (Some(33.0), Some(33.0)),
        );
        assert_grid(
            &parse_grid("29-30"),
            GridPatternKind::ColOnly,
            (None, None),
            (Some(29.0), Some(30.0)),
        );
        assert_grid(
            &parse_grid("CL 5-12"),
            GridPatternKind::ColOnly,
            (None, None),
            (Some(5.0), Some(12.0)),
        );
        assert_grid(
            &parse_grid("COL 11"),
            GridPatternKind::ColOnly,
            (None, None),
            (Some(11.0), Some(11.0)),
        );
        let spec = parse_grid("GL-33");
        assert_eq!(spec.pattern_kind, GridPatternKind::ColOnly);
        assert!(spec.gridline);
        assert_eq!(parse_grid("Grid line 5").col_min, Some(5.0));
    }

    #[test]
    fn equipment_column_hints() {
        assert_eq!(parse_grid("CE8P").col_min, Some(8.0));
        assert_eq!(parse_grid("FE15").col_max, Some(15.0));
        assert_eq!(parse_grid("FE15").pattern_kind, GridPatternKind::ColOnly);
    }

    #[test]
    fn lists_become_bounding_spans() {
        assert_grid(
            &parse_grid("G/10, H/12"),
            GridPatternKind::Range,
            (row("G"), row("H")),
            (Some(10.0), Some(12.0)),
        );
        assert_grid(
            &parse_grid("E, C, D"),
            GridPatternKind::RowOnly,
            (row("C"), row("E")),
            (None, None),
        );
        assert_grid(
            &parse_grid("G/10,11,14"),
            GridPatternKind::Range,
            (row("G"), row("G")),
            (Some(10.0), Some(14.0)),
        );
    }

    #[test]
    fn embedded_in_free_text() {
        assert_grid(
            &parse_grid("Near the pump, G/10 east side"),
            GridPatternKind::Point,
            (row("G"), row("G")),
            (Some(10.0), Some(10.0)),
        );
    }

    #[test]
    fn named_look_alikes() {
        let stair = parse_grid("STR-21");
        assert_eq!(stair.pattern_kind, GridPatternKind::Named);
        assert_eq!(stair.named_location.as_deref(), Some("STR-21"));
        assert!(stair.row_min.is_none() && stair.col_min.is_none());

        for text in ["B-104", "FAB116406", "Stair 21", "Elevator 3", "FAB1-ST05"] {
            assert_eq!(parse_grid(text).pattern_kind, GridPatternKind::Named, "{text}");
        }
    }

    #[test]
    fn sentinels() {
        for text in ["", "   ", "N/A", "none", "TBD", "-", "?"] {
            assert_eq!(parse_grid(text).pattern_kind, GridPatternKind::Empty, "{text}");
        }
        for text in ["ALL", "Various", "SITE WIDE", "whole floor", "FAB"] {
            assert_eq!(parse_grid(text).pattern_kind, GridPatternKind::Area, "{text}");
        }
        assert_eq!(parse_grid_opt(None).pattern_kind, GridPatternKind::Empty);
    }

    #[test]
    fn garbage_is_unparsed() {
        let spec = parse_grid("INVALID_GARBAGE");
        assert_eq!(spec.pattern_kind, GridPatternKind::Unparsed);
        assert!(!has_bounds(&spec));
        assert_eq!(classify("Q/99"), GridPatternKind::Unparsed);
    }

    #[test]
    fn traced_parse_reports_rule() {
        let (spec, rule) = GridDialect::Standard.parser().parse_traced("GL-33/K-N");
        assert_eq!(rule, Some("gridline_col_row_range"));
        assert!(spec.gridline);
        assert_eq!(GridDialect::Standard.parser().parse_traced("junk text").1, None);
    }

    #[test]
    fn tbm_strips_level_prefixes() {
        assert_grid(
            &parse_tbm_grid("L1- G/10"),
            GridPatternKind::Point,
            (row("G"), row("G")),
            (Some(10.0), Some(10.0)),
        );
        assert_grid(
            &parse_tbm_grid("2F C-F/11-22"),
            GridPatternKind::Range,
            (row("C"), row("F")),
            (Some(11.0), Some(22.0)),
        );
        assert_grid(
            &parse_tbm_grid("G/10 L3"),
            GridPatternKind::Point,
            (row("G"), row("G")),
            (Some(10.0), Some(10.0)),
        );
    }

    #[test]
    fn tbm_multi_level_and_sector_are_area() {
        for text in ["L1,2,3,4", "L1-L4", "1F~4F", "ALL LEVELS", "L2"] {
            assert_eq!(parse_tbm_grid(text).pattern_kind, GridPatternKind::Area, "{text}");
        }
        let sector = parse_tbm_grid("S62");
        assert_eq!(sector.pattern_kind, GridPatternKind::Area);
        assert_eq!(sector.named_location.as_deref(), Some("S62"));
    }

    #[test]
    fn tbm_named_spaces() {
        assert_eq!(parse_tbm_grid("ELEC ROOM").pattern_kind, GridPatternKind::Named);
        assert_eq!(parse_tbm_grid("2F Restroom").pattern_kind, GridPatternKind::Named);
        assert_eq!(
            parse_tbm_grid("ELEC ROOM G/10").pattern_kind,
            GridPatternKind::Point
        );
    }

    #[test]
    fn tbm_only_forms() {
        let expect = |text: &str, rows: (Option<GridRow>, Option<GridRow>), cols| {
            let spec = parse_tbm_grid(text);
            assert_eq!((spec.row_min, spec.row_max), rows, "{text}");
            assert_eq!((spec.col_min, spec.col_max), cols, "{text}");
        };
        expect("G@10", (row("G"), row("G")), (Some(10.0), Some(10.0)));
        expect("R:G C:10", (row("G"), row("G")), (Some(10.0), Some(10.0)));
        expect("10-15 G-H", (row("G"), row("H")), (Some(10.0), Some(15.0)));
        expect("G-H 10-15", (row("G"), row("H")), (Some(10.0), Some(15.0)));
        expect("10G", (row("G"), row("G")), (Some(10.0), Some(10.0)));
        expect("BETWEEN GL-5 AND GL-8", (None, None), (Some(5.0), Some(8.0)));
    }

    #[test]
    fn tbm_matches_standard_on_plain_grids() {
        for text in ["G/10", "C/11 - C/22", "GL-33/K-N", "33", "G/H"] {
            assert_eq!(parse_tbm_grid(text).normalized(), parse_grid(text).normalized(), "{text}");
        }
    }

    proptest! {
        #[test]
        fn prop_parse_is_total_and_sorted(raw in "\\PC{0,40}") {
            for spec in [parse_grid(&raw), parse_tbm_grid(&raw)] {
                if let (Some(a), Some(b)) = (spec.row_min, spec.row_max) {
                    prop_assert!(a <= b);
                }
                if let (Some(a), Some(b)) = (spec.col_min, spec.col_max) {
                    prop_assert!(a <= b);
                }
                if !spec.pattern_kind.is_grid() {
                    prop_assert!(!spec.has_rows() && !spec.has_cols());
                }
            }
        }

        #[test]
        fn prop_grid_like_text_is_total(
            r1 in "[A-Na-n]", r2 in "[A-N]", c1 in 0u32..40, c2 in 0u32..40,
            sep in prop::sample::select(vec!["/", "-", "~", " ", ",", " - "]),
        ) {
            let raw = format!("{r1}{sep}{c1}{sep}{r2}{sep}{c2}");
            let spec = parse_grid(&raw);
            if let (Some(a), Some(b)) = (spec.col_min, spec.col_max) {
                prop_assert!(a <= b);
                prop_assert!(a >= 1.0 && b <= 34.0);
            }
        }
    }
}
