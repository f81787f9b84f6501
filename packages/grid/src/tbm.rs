//! Extra rules for the daily work-plan (TBM) dialect.
//!
//! Work plans are typed by foremen on site, so the grid column often also
//! carries the level (`"L1- G/10"`, `"1F C-F/11"`), whole-floor references
//! (`"L1,2,3,4"`, `"ALL LEVELS"`), sectors (`"S62"`) and room names
//! (`"ELEC ROOM"`). These rules run before the standard table.

use crate::rule::{
    GridRule, Rewrite, area_token, bounds, gridline, named_without_grid, row_with_col_list,
    sector,
};

/// Screens specific to work plans.
#[must_use]
pub fn screens() -> Vec<GridRule> {
    vec![
        GridRule::new(
            "all_levels",
            r"^(?P<code>ALL\s+(?:LEVELS|FLOORS|LVLS?))$",
            area_token,
        ),
        GridRule::new(
            "multi_level_list",
            r"^(?P<code>L\d{1,2}(?:\s*[,&]\s*L?\d{1,2})+)(?:\s.*)?$",
            area_token,
        ),
        GridRule::new(
            "multi_level_range",
            r"^(?P<code>L\d{1,2}\s*[-~]\s*L\d{1,2})(?:\s.*)?$",
            area_token,
        ),
        GridRule::new(
            "multi_floor_range",
            r"^(?P<code>\d{1,2}F\s*[-~]\s*\d{1,2}F)(?:\s.*)?$",
            area_token,
        ),
        GridRule::new(
            "multi_floor_list",
            r"^(?P<code>\d{1,2}F(?:\s*[,&/]\s*\d{1,2}F)+)(?:\s.*)?$",
            area_token,
        ),
        GridRule::new(
            "level_only",
            r"^(?P<code>L\d{1,2}|(?:LV|LVL|LEVEL)\s*\d{1,2}|\d{1,2}F|B[12]F?|RF|ROOF)$",
            area_token,
        ),
        GridRule::new("sector", r"^(?:S|SECTOR\s*|SEC\.?\s*)(?P<code>\d{1,3})$", sector),
        GridRule::new(
            "sector_list",
            r"^(?P<code>S\d{1,3}(?:\s*[,&/]\s*S?\d{1,3})+)$",
            area_token,
        ),
        GridRule::new(
            "named_vertical",
            r"^.*\b(?:STAIRS?|STAIRWELL|STAIRWAY|ELEVATORS?|ELEV|LIFT|SHAFTS?)\b.*$",
            named_without_grid,
        ),
        GridRule::new(
            "named_room",
            r"^.*\b(?:ELEC(?:TRICAL)?|MECH(?:ANICAL)?|IT|UPS|IDF|MDF|TELECOM|COMMS?)\s*(?:ROOM|RM|CLOSET)S?\b.*$",
            named_without_grid,
        ),
        GridRule::new(
            "named_space",
            r"^.*\b(?:RESTROOMS?|TOILETS?|BATHROOMS?|LOBBY|CORRIDORS?|HALLWAYS?|LOCKER ROOM|BREAK ROOM)\b.*$",
            named_without_grid,
        ),
    ]
}

/// Rewrites that strip level and building decorations around the grid.
#[must_use]
pub fn rewrites() -> Vec<Rewrite> {
    vec![
        Rewrite::new(
            "level_prefix",
            r"^(?:L\d{1,2}|(?:LV|LVL|LEVEL)\s*\d{1,2})(?:\s*[:,]\s*|\s*-\s+|\s+)(?P<rest>.+)$",
        ),
        Rewrite::new(
            "floor_prefix",
            r"^(?:\d{1,2}F|(?:FLOOR|FL)\s*\d{1,2})(?:\s*[:,]\s*|\s*-\s*|\s+)(?P<rest>.+)$",
        ),
        Rewrite::new(
            "basement_roof_prefix",
            r"^(?:(?:B[12]F|RF|ROOF|BASEMENT\s*\d?)(?:\s*[:,-]\s*|\s+)|B[12]\s*[:,]\s*)(?P<rest>.+)$",
        ),
        Rewrite::new("building_prefix", r"^{BLDG}(?:\s*[:,-]\s*|\s+)(?P<rest>.+)$"),
        Rewrite::new(
            "level_suffix",
            r"^(?P<rest>.+?)(?:\s+|\s*,\s*)(?:L|LV|LVL|LEVEL\s*)\d{1,2}$",
        ),
        Rewrite::new("floor_suffix", r"^(?P<rest>.+?)(?:\s+|\s*,\s*)\d{1,2}F$"),
    ]
}

/// Grid forms seen only in work plans.
#[must_use]
pub fn rules() -> Vec<GridRule> {
    vec![
        GridRule::new("at_row_col", r"^{R1}\s*@\s*{C1}$", bounds),
        GridRule::new("at_col_row", r"^{C1}\s*@\s*{R1}$", bounds),
        GridRule::new(
            "rc_labels",
            r"^R\s*[:=]\s*{R1}(?:{RG}{R2})?\s*[,/]?\s*C\s*[:=]\s*{C1}(?:{RG}{C2})?$",
            bounds,
        ),
        GridRule::new("colon_point", r"^{R1}\s*:\s*{C1}$", bounds),
        GridRule::new("row_times_col", r"^{R1}\s*[X×*]\s*{C1}$", bounds),
        GridRule::new(
            "col_range_space_row_range",
            r"^{C1}{RG}{C2}\s+{R1}{RG}{R2}$",
            bounds,
        ),
        GridRule::new("col_range_space_row", r"^{C1}{RG}{C2}\s+{R1}$", bounds),
        GridRule::new("col_space_row_range", r"^{C1}\s+{R1}{RG}{R2}$", bounds),
        GridRule::new("col_space_row", r"^{C1}\s+{R1}$", bounds),
        GridRule::new("col_row_compact", r"^{N1}{L1}$", bounds),
        GridRule::new(
            "row_space_col_list",
            r"^{R1}\s+(?P<list>{COL}(?:{SEP}{COL})+)$",
            row_with_col_list,
        ),
        GridRule::new(
            "between_rows_and_cols",
            r"^BETWEEN\s+{R1}(?:{AND}|{RG}){R2}\s*[,/]?\s*(?:AND\s+)?{C1}(?:{AND}|{RG}){C2}$",
            bounds,
        ),
        GridRule::new(
            "between_gridline_cols",
            r"^BETWEEN\s+{GL}{C1}(?:{AND}|{RG})(?:{GL})?{C2}$",
            gridline,
        ),
        GridRule::new(
            "between_gridline_rows",
            r"^BETWEEN\s+{GL}{R1}(?:{AND}|{RG})(?:{GL})?{R2}$",
            gridline,
        ),
        GridRule::new(
            "between_cols",
            r"^BETWEEN\s+{C1}(?:{AND}|{RG}){C2}$",
            bounds,
        ),
        GridRule::new(
            "between_rows",
            r"^BETWEEN\s+{R1}(?:{AND}|{RG}){R2}$",
            bounds,
        ),
        GridRule::new(
            "near_gridline_col",
            r"^(?:NEAR|BY|AT|ALONG)\s+{GL}{C1}$",
            gridline,
        ),
        GridRule::new(
            "near_gridline_row",
            r"^(?:NEAR|BY|AT|ALONG)\s+{GL}{R1}$",
            gridline,
        ),
    ]
}
