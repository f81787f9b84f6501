//! Rule tables for the general grid dialect used by inspection reports,
//! weekly reports and schedule exports.
//!
//! Rules are tried in order and the first one whose extractor accepts the
//! match wins, so more specific formats come first. New formats are added
//! by inserting a row at the right position.

use crate::rule::{
    GridRule, area, area_token, bounds, col_list, empty, gridline, gridline_row_list, named,
    point_list, row_list, row_list_with_col, row_with_col_list, two_letter,
};

/// Screens run on the cleaned text before any grid rule. They catch
/// sentinels and codes that would otherwise look like grid references
/// (`B-104` is a lab, not row B column 104).
#[must_use]
pub fn screens() -> Vec<GridRule> {
    vec![
        GridRule::new(
            "empty_sentinel",
            r"^(?:N/?A|NONE|NULL|NAN|NIL|TBD|TBA|UNKNOWN|-+|\?+)$",
            empty,
        ),
        GridRule::new(
            "area_sentinel",
            r"^(?:ALL|VARIOUS|MULTIPLE|SITE\s*WIDE|BUILDING|WHOLE BUILDING|ENTIRE BUILDING|ALL GRIDS|ALL AREAS|ENTIRE FLOOR|WHOLE FLOOR|FULL FLOOR|THROUGHOUT|GENERAL)$",
            area,
        ),
        GridRule::new(
            "area_building_only",
            r"^(?P<code>{BLDG}|SUPPORT (?:EAST|WEST|NORTH))$",
            area_token,
        ),
        GridRule::new(
            "area_floor_reference",
            r"^(?P<code>\d{1,2}F|(?:LEVEL|FLOOR) \d{1,2}|ROOF)$",
            area_token,
        ),
        GridRule::new("lab_address", r"^(?P<code>[A-Z]-\d{3,}[A-Z]?)$", named),
        GridRule::new(
            "room_code",
            r"^(?:ROOM|RM)?\s*#?\s*(?P<code>FAB1?\d{5,6}[A-Z]?)\b.*$",
            named,
        ),
        GridRule::new(
            "stair_code",
            r"^(?P<code>(?:FAB1-ST|STR)\s*-?\s*\d{1,3})\b.*$",
            named,
        ),
        GridRule::new(
            "elevator_code",
            r"^(?P<code>(?:FAB1-EL|ELV)\s*-?\s*\d{1,3})\b.*$",
            named,
        ),
        GridRule::new(
            "stair_words",
            r"^(?P<code>STAIR(?:S|WELL|WAY)?\s*#?\s*\d{1,3}[A-Z]?)\b.*$",
            named,
        ),
        GridRule::new(
            "elevator_words",
            r"^(?P<code>(?:ELEVATOR|ELEV\.?)\s*#?\s*\d{1,3})\b.*$",
            named,
        ),
    ]
}

/// The ordered grid rule table.
#[must_use]
pub fn rules() -> Vec<GridRule> {
    let mut rules = Vec::new();
    rules.extend(tilde_rules());
    rules.extend(list_rules());
    rules.extend(building_prefixed_rules());
    rules.extend(two_letter_rules());
    rules.extend(gridline_rules());
    rules.extend(canonical_rules());
    rules.extend(row_only_rules());
    rules.extend(col_only_rules());
    rules.extend(fallback_rules());
    rules
}

/// Tilde ranges from spreadsheet exports (`C/11~F/22`, `G.3~H.8`).
fn tilde_rules() -> Vec<GridRule> {
    vec![
        GridRule::new("tilde_point_pair", r"^{R1}{S}{C1}{T}{R2}{S}{C2}$", bounds),
        GridRule::new("tilde_col_row_pair", r"^{C1}{S}{R1}{T}{C2}{S}{R2}$", bounds),
        GridRule::new("tilde_compact_pair", r"^{L1}{C1}{T}{L2}{C2}$", bounds),
        GridRule::new("tilde_row_range", r"^{R1}{T}{R2}$", bounds),
        GridRule::new("tilde_col_range", r"^{C1}{T}{C2}$", bounds),
    ]
}

/// Comma-separated ranges and lists.
fn list_rules() -> Vec<GridRule> {
    vec![
        GridRule::new(
            "comma_row_range_col_range",
            r"^{R1}{RG}{R2}\s*,\s*{C1}{RG}{C2}$",
            bounds,
        ),
        GridRule::new(
            "comma_col_range_row_range",
            r"^{C1}{RG}{C2}\s*,\s*{R1}{RG}{R2}$",
            bounds,
        ),
        GridRule::new("comma_row_col_range", r"^{R1}\s*,\s*{C1}{RG}{C2}$", bounds),
        GridRule::new("comma_row_range_col", r"^{R1}{RG}{R2}\s*,\s*{C1}$", bounds),
        GridRule::new("comma_row_col", r"^{R1}\s*,\s*{C1}$", bounds),
        GridRule::new("comma_col_row", r"^{C1}\s*,\s*{R1}$", bounds),
        GridRule::new(
            "point_list",
            r"^(?P<list>{ROW}{S}{COL}(?:{SEP}{ROW}{S}{COL})+)$",
            point_list,
        ),
        GridRule::new(
            "row_with_col_list",
            r"^{R1}{S}(?P<list>{COL}(?:{SEP}{COL})+)$",
            row_with_col_list,
        ),
        GridRule::new(
            "row_list_with_col",
            r"^(?P<list>{ROW}(?:{SEP}{ROW})+){S}{C1}$",
            row_list_with_col,
        ),
        GridRule::new("row_list", r"^(?P<list>{ROW}(?:{SEP}{ROW})+)$", row_list),
        GridRule::new("col_list", r"^(?P<list>{COL}(?:{SEP}{COL})+)$", col_list),
    ]
}

/// Ranges prefixed with a building code (`SUW 5-6/L-N`).
fn building_prefixed_rules() -> Vec<GridRule> {
    vec![
        GridRule::new(
            "building_col_range_row_range",
            r"^{BLDG}[\s:-]+{C1}{RG}{C2}{S}{R1}{RG}{R2}$",
            bounds,
        ),
        GridRule::new(
            "building_row_range_col_range",
            r"^{BLDG}[\s:-]+{R1}{RG}{R2}{S}{C1}{RG}{C2}$",
            bounds,
        ),
        GridRule::new(
            "building_col_range_row",
            r"^{BLDG}[\s:-]+{C1}{RG}{C2}{S}{R1}$",
            bounds,
        ),
        GridRule::new(
            "building_col_row_range",
            r"^{BLDG}[\s:-]+{C1}{S}{R1}{RG}{R2}$",
            bounds,
        ),
        GridRule::new(
            "building_row_range_col",
            r"^{BLDG}[\s:-]+{R1}{RG}{R2}{S}{C1}$",
            bounds,
        ),
        GridRule::new(
            "building_row_col_range",
            r"^{BLDG}[\s:-]+{R1}{S}{C1}{RG}{C2}$",
            bounds,
        ),
        GridRule::new("building_row_col", r"^{BLDG}[\s:-]+{R1}{S}{C1}$", bounds),
        GridRule::new("building_col_row", r"^{BLDG}[\s:-]+{C1}{S}{R1}$", bounds),
    ]
}

/// Two-letter row shorthand (`LM 6,4` is rows L-M, columns 4-6).
fn two_letter_rules() -> Vec<GridRule> {
    vec![
        GridRule::new(
            "two_letter_col_pair",
            r"^{L1}{L2}\s+{C1}\s*[,&]\s*{C2}$",
            two_letter,
        ),
        GridRule::new(
            "two_letter_col_range",
            r"^{L1}{L2}\s+{C1}{RG}{C2}$",
            two_letter,
        ),
        GridRule::new("two_letter_col", r"^{L1}{L2}\s+{C1}$", two_letter),
    ]
}

/// `GL-` gridline references carrying both axes.
fn gridline_rules() -> Vec<GridRule> {
    vec![
        GridRule::new(
            "gridline_col_row_range",
            r"^{GL}{C1}{S}{R1}{RG}{R2}$",
            gridline,
        ),
        GridRule::new(
            "gridline_row_col_range",
            r"^{GL}{R1}{S}{C1}{RG}{C2}$",
            gridline,
        ),
        GridRule::new("gridline_col_row", r"^{GL}{C1}{S}{R1}$", gridline),
        GridRule::new("gridline_row_col", r"^{GL}{R1}{S}{C1}$", gridline),
        GridRule::new(
            "gridline_row_and_col",
            r"^{GL}{R1}(?:{AND}|{S}){GL}{C1}$",
            gridline,
        ),
        GridRule::new(
            "gridline_col_and_row",
            r"^{GL}{C1}(?:{AND}|{S}){GL}{R1}$",
            gridline,
        ),
        GridRule::new("gridline_compact", r"^{GL}{L1}{N1}$", gridline),
    ]
}

/// Canonical row/column point and range forms.
fn canonical_rules() -> Vec<GridRule> {
    vec![
        GridRule::new("row_col_point", r"^{R1}{S}{C1}$", bounds),
        GridRule::new("point_range_point", r"^{R1}{S}{C1}{RG}{R2}{S}{C2}$", bounds),
        GridRule::new("row_range_col_range", r"^{R1}{RG}{R2}{S}{C1}{RG}{C2}$", bounds),
        GridRule::new("row_range_col", r"^{R1}{RG}{R2}{S}{C1}$", bounds),
        GridRule::new("row_col_range", r"^{R1}{S}{C1}{RG}{C2}$", bounds),
        GridRule::new("col_row_point", r"^{C1}{S}{R1}$", bounds),
        GridRule::new("col_point_range_point", r"^{C1}{S}{R1}{RG}{C2}{S}{R2}$", bounds),
        GridRule::new("col_range_row_range", r"^{C1}{RG}{C2}{S}{R1}{RG}{R2}$", bounds),
        GridRule::new("col_range_row", r"^{C1}{RG}{C2}{S}{R1}$", bounds),
        GridRule::new("col_row_range", r"^{C1}{S}{R1}{RG}{R2}$", bounds),
        GridRule::new("compact_pair_range", r"^{L1}{C1}{RG}{L2}{C2}$", bounds),
        GridRule::new("row_dash_col_range", r"^{L1}{D}{C1}{D}{C2}$", bounds),
        GridRule::new("row_dash_col", r"^{L1}{D}{C1}$", bounds),
        GridRule::new("compact_point", r"^{L1}{C1}$", bounds),
        GridRule::new("compact_col_range", r"^{L1}{C1}{RG}{C2}$", bounds),
        GridRule::new(
            "row_col_keywords",
            r"^ROWS?\s*{R1}(?:{RG}{R2})?\s*[,/]?\s*COL(?:UMN)?S?\s*{C1}(?:{RG}{C2})?$",
            bounds,
        ),
        GridRule::new(
            "col_row_keywords",
            r"^COL(?:UMN)?S?\s*{C1}(?:{RG}{C2})?\s*[,/]?\s*ROWS?\s*{R1}(?:{RG}{R2})?$",
            bounds,
        ),
        GridRule::new("row_space_col", r"^{R1}\s+{C1}$", bounds),
        GridRule::new("row_space_col_range", r"^{R1}\s+{C1}{RG}{C2}$", bounds),
        GridRule::new("row_range_space_col_range", r"^{R1}{RG}{R2}\s+{C1}{RG}{C2}$", bounds),
        GridRule::new("row_range_space_col", r"^{R1}{RG}{R2}\s+{C1}$", bounds),
    ]
}

/// References that only carry rows (`G`, `G/H`, `GL-N`, `ROW G`).
fn row_only_rules() -> Vec<GridRule> {
    vec![
        GridRule::new("gridline_row", r"^{GL}{R1}$", gridline),
        GridRule::new("gridline_row_range", r"^{GL}{R1}{RG}(?:{GL})?{R2}$", gridline),
        GridRule::new(
            "gridline_row_list",
            r"^{GL}(?P<list>{ROW}(?:{SEP}{ROW})+)$",
            gridline_row_list,
        ),
        GridRule::new("row_single", r"^{R1}$", bounds),
        GridRule::new("row_slash_row", r"^{R1}{S}{R2}$", bounds),
        GridRule::new("row_range", r"^{R1}{RG}{R2}$", bounds),
        GridRule::new("row_keyword", r"^ROWS?\s*[-#]?\s*{R1}(?:{RG}{R2})?$", bounds),
        GridRule::new("row_line_suffix", r"^{R1}(?:{RG}{R2})?\s+LINES?$", bounds),
        GridRule::new("row_line_prefix", r"^LINES?\s+{R1}(?:{RG}{R2})?$", bounds),
    ]
}

/// References that only carry columns (`33`, `29-30`, `CL 5-12`).
fn col_only_rules() -> Vec<GridRule> {
    vec![
        GridRule::new("gridline_col", r"^{GL}{C1}$", gridline),
        GridRule::new("gridline_col_range", r"^{GL}{C1}{RG}(?:{GL})?{C2}$", gridline),
        GridRule::new(
            "col_line",
            r"^(?:CL|COL(?:UMN)?S?)\s*[-#.]?\s*{C1}(?:{RG}{C2})?$",
            bounds,
        ),
        GridRule::new("col_single", r"^{C1}$", bounds),
        GridRule::new("col_range", r"^{C1}{RG}{C2}$", bounds),
        GridRule::new("col_slash_range", r"^{C1}{S}{C2}$", bounds),
        GridRule::new("col_line_suffix", r"^{C1}(?:{RG}{C2})?\s+LINES?$", bounds),
        GridRule::new("col_line_prefix", r"^LINES?\s+{C1}(?:{RG}{C2})?$", bounds),
    ]
}

/// Equipment tags that encode a column (`CE8P`, `FE15`) and grid tokens
/// embedded in longer free text.
fn fallback_rules() -> Vec<GridRule> {
    vec![
        GridRule::new(
            "equipment_col_hint",
            r"^(?:CE|FE|AE|PE|ME|EE)\s*-?\s*{N1}[A-Z]{0,2}$",
            bounds,
        ),
        GridRule::new(
            "embedded_point_range_point",
            r"\b{R1}{S}{C1}{D}{R2}{S}{C2}\b",
            bounds,
        ),
        GridRule::new("embedded_range", r"\b{R1}{D}{R2}{S}{C1}{D}{C2}\b", bounds),
        GridRule::new("embedded_row_col_range", r"\b{R1}{S}{C1}{D}{C2}\b", bounds),
        GridRule::new("embedded_row_range_col", r"\b{R1}{D}{R2}{S}{C1}\b", bounds),
        GridRule::new("embedded_point", r"\b{R1}{S}{C1}\b", bounds),
        GridRule::new("embedded_gridline_col", r"\b{GL}{C1}\b", gridline),
        GridRule::new("embedded_gridline_row", r"\b{GL}{L1}\b", gridline),
    ]
}
