#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location extraction for P6 schedule tasks.
//!
//! Schedule tasks carry no grid column. Their location is spread over the
//! WBS path, the task name, activity code assignments and the task code,
//! so extraction scans all of them with a fixed type precedence:
//!
//! `ROOM > STAIR > ELEVATOR > GRIDLINE > LEVEL > BUILDING > SITE`
//!
//! For each type in turn the sources are scanned in the order WBS tiers,
//! task name, activity codes, task code; the first hit wins and its source
//! is recorded for audit.

use std::sync::LazyLock;

use fab_locate_dimension::LocationDimension;
use fab_locate_grid::parse_grid;
use fab_locate_location_models::{LocationType, P6LocationResult, P6LocationSource, P6Task};
use fab_locate_normalize::{
    CodeCandidate, LocationCodes, clean_text, extract_location_codes, known_building,
    normalize_level,
};
use regex::Regex;

/// Code of the project-wide default location.
pub const DEFAULT_LOCATION_CODE: &str = "SITE";

/// Activity code types that name a building.
const BUILDING_CODE_TYPES: &[&str] = &["BUILDING", "BLDG", "AREA"];

/// Activity code types that name a level.
const LEVEL_CODE_TYPES: &[&str] = &["LEVEL", "FLOOR", "LVL"];

/// `GL-33`, `GL N`, `GRIDLINE N`, `GRID LINE 5`.
static GRIDLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:GL|GRID\s*LINE)\s*[-#:.]?\s*(?P<token>[A-N](?:\.\d{1,2})?|\d{1,2}(?:\.5)?)\b",
    )
    .expect("valid regex")
});

/// Level mentions inside longer text.
static LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:LEVEL|LVL|FLOOR|FLR)\s*[-#.]?\s*\d{1,2}|L\d{1,2}|\d{1,2}(?:ST|ND|RD|TH)\s+(?:FLOOR|FLR|LEVEL)|\d{1,2}F|B[12]|BASEMENT(?:\s*[12])?|ROOF)\b",
    )
    .expect("valid regex")
});

static CANONICAL_LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{1,2}F|B[12]|ROOF|OUTSIDE)$").expect("valid regex"));

/// One text field of a task, with the codes found in it.
struct Scanned<'a> {
    source: P6LocationSource,
    text: &'a str,
    codes: LocationCodes,
}

fn scan(task: &P6Task) -> Vec<Scanned<'_>> {
    let wbs = task
        .wbs_path
        .iter()
        .map(|tier| (P6LocationSource::Wbs, tier.as_str()));
    let name = std::iter::once((P6LocationSource::TaskName, task.task_name.as_str()));
    let codes = task
        .activity_codes
        .values()
        .map(|value| (P6LocationSource::ActivityCode, value.as_str()));
    let code = std::iter::once((P6LocationSource::TaskCode, task.task_code.as_str()));

    wbs.chain(name)
        .chain(codes)
        .chain(code)
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(source, text)| Scanned {
            source,
            text,
            codes: extract_location_codes(text),
        })
        .collect()
}

/// A level only if it normalizes to a canonical code.
fn canonical_level(raw: &str) -> Option<String> {
    normalize_level(raw).filter(|level| CANONICAL_LEVEL_RE.is_match(level))
}

/// First canonical level mentioned in free text.
fn level_in_text(text: &str) -> Option<String> {
    LEVEL_RE
        .find_iter(text)
        .find_map(|m| canonical_level(m.as_str()))
}

fn is_code_type(code_type: &str, types: &[&str]) -> bool {
    types.contains(&clean_text(code_type).as_str())
}

/// Building from `Building`/`Bldg`/`Area` activity codes, then WBS tiers,
/// then the task name. Only recognized building codes count.
fn find_building(task: &P6Task) -> Option<(String, P6LocationSource)> {
    let from_codes = task
        .activity_codes
        .iter()
        .filter(|(code_type, _)| is_code_type(code_type, BUILDING_CODE_TYPES))
        .find_map(|(_, value)| known_building(value))
        .map(|b| (b, P6LocationSource::ActivityCode));

    from_codes
        .or_else(|| {
            task.wbs_path
                .iter()
                .find_map(|tier| known_building(tier))
                .map(|b| (b, P6LocationSource::Wbs))
        })
        .or_else(|| known_building(&task.task_name).map(|b| (b, P6LocationSource::TaskName)))
        .map(|(building, source)| (building.to_string(), source))
}

/// Level from `Level`/`Floor` activity codes, then WBS tiers, then the
/// task name.
fn find_level(task: &P6Task) -> Option<(String, P6LocationSource)> {
    let from_codes = task
        .activity_codes
        .iter()
        .filter(|(code_type, _)| is_code_type(code_type, LEVEL_CODE_TYPES))
        .find_map(|(_, value)| canonical_level(value).or_else(|| level_in_text(value)))
        .map(|l| (l, P6LocationSource::ActivityCode));

    from_codes
        .or_else(|| {
            task.wbs_path
                .iter()
                .find_map(|tier| level_in_text(tier))
                .map(|l| (l, P6LocationSource::Wbs))
        })
        .or_else(|| level_in_text(&task.task_name).map(|l| (l, P6LocationSource::TaskName)))
}

fn first_code<'a>(
    scanned: &'a [Scanned<'_>],
    pick: impl Fn(&LocationCodes) -> &[CodeCandidate],
) -> Option<(&'a CodeCandidate, P6LocationSource)> {
    scanned
        .iter()
        .find_map(|s| pick(&s.codes).first().map(|c| (c, s.source)))
}

fn first_gridline(scanned: &[Scanned<'_>]) -> Option<(String, P6LocationSource)> {
    scanned.iter().find_map(|s| {
        GRIDLINE_RE
            .captures(s.text)
            .map(|caps| (caps["token"].to_uppercase(), s.source))
    })
}

/// Extracts the most specific location a task names.
///
/// Never fails; a task with no usable location text resolves to the
/// project-wide [`DEFAULT_LOCATION_CODE`].
#[must_use]
pub fn extract_p6_location(task: &P6Task) -> P6LocationResult {
    let scanned = scan(task);
    let building = find_building(task);
    let level = find_level(task);
    let building_code = building.as_ref().map(|(b, _)| b.clone());
    let level_code = level.as_ref().map(|(l, _)| l.clone());

    let result = |location_type, location_code: String, level: Option<String>, source| {
        P6LocationResult {
            location_type,
            location_code,
            building: building_code.clone(),
            level,
            grid: None,
            location_source: source,
        }
    };

    if let Some((room, source)) = first_code(&scanned, |c| c.rooms.as_slice()) {
        let level = level_code.clone().or_else(|| room.implied_level());
        log::trace!("{}: room {} from {source}", task.task_code, room.canonical);
        return result(LocationType::Room, room.canonical.clone(), level, source);
    }

    if let Some((stair, source)) = first_code(&scanned, |c| c.stairs.as_slice()) {
        log::trace!("{}: stair {} from {source}", task.task_code, stair.canonical);
        return result(LocationType::Stair, stair.canonical.clone(), level_code, source);
    }

    if let Some((elevator, source)) = first_code(&scanned, |c| c.elevators.as_slice()) {
        log::trace!("{}: elevator {} from {source}", task.task_code, elevator.canonical);
        return result(
            LocationType::Elevator,
            elevator.canonical.clone(),
            level_code,
            source,
        );
    }

    if let Some((token, source)) = first_gridline(&scanned) {
        let code = format!("GL-{token}");
        log::trace!("{}: gridline {code} from {source}", task.task_code);
        return P6LocationResult {
            grid: Some(parse_grid(&code)),
            ..result(LocationType::Gridline, code, level_code, source)
        };
    }

    if let Some((level, source)) = level {
        let code = building_code
            .as_deref()
            .map_or_else(|| level.clone(), |b| format!("{b}-{level}"));
        return result(LocationType::Level, code, Some(level), source);
    }

    if let Some((building, source)) = building {
        return result(LocationType::Building, building, None, source);
    }

    log::trace!("{}: no location, using project default", task.task_code);
    result(
        LocationType::Site,
        DEFAULT_LOCATION_CODE.to_string(),
        None,
        P6LocationSource::Default,
    )
}

/// Resolves an extracted location to a dimension id.
///
/// Codes are tried as written and then in every equivalent spelling. A
/// gridline that overlaps exactly one room on a known level resolves to
/// that room. Anything left falls back to the level, the building and
/// finally the SITE record.
#[must_use]
pub fn resolve_p6_location_id(
    result: &P6LocationResult,
    dimension: &LocationDimension,
) -> Option<i64> {
    let by_code = match result.location_type {
        LocationType::Site | LocationType::Level | LocationType::Building => None,
        _ => dimension.lookup_by_code(&result.location_code).or_else(|| {
            extract_location_codes(&result.location_code)
                .iter()
                .flat_map(|candidate| &candidate.variants)
                .find_map(|variant| dimension.lookup_by_code(variant))
        }),
    };

    let by_grid = || {
        let grid = result.grid.as_ref()?;
        let level = result.level.as_deref()?;
        match dimension.affected_rooms(level, grid).as_slice() {
            [single] => dimension.lookup_by_code(&single.location_code),
            _ => None,
        }
    };

    by_code.or_else(by_grid).or_else(|| {
        dimension.lookup_by_building_level(
            result.building.as_deref(),
            result.level.as_deref(),
            true,
        )
    })
}
