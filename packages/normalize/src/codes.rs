//! Room, stair and elevator code extraction.
//!
//! Source documents refer to the same place in several spellings: a room
//! as `FAB116109A` or `FAB116109`, a stair as `Stair 21`, `STR-21` or
//! `FAB1-ST21`. Each recognized code is reported with the list of
//! equivalent spellings to try against the location dimension, canonical
//! form first.

use std::sync::LazyLock;

use fab_locate_location_models::LocationType;
use regex::Regex;

/// Room codes: `FAB116406`, `FAB16406`, `FAB116109A`.
static ROOM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bFAB1?(?P<digits>\d{5,6})(?P<suffix>[A-Z])?\b").expect("valid regex")
});

/// Stair codes: `Stair 21`, `Stairwell 4`, `STR-21`, `ST-05`, `FAB1-ST05`.
static STAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:FAB1\s*-\s*ST|STAIRWELL|STAIRWAY|STAIRS|STAIR|STR|ST)\s*[-#.]?\s*(?P<n>\d{1,3})\b",
    )
    .expect("valid regex")
});

/// Elevator codes: `Elevator 22`, `Elev. 3`, `ELV-22`, `EL-3`, `FAB1-EL02`.
static ELEVATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:FAB1\s*-\s*EL|ELEVATOR|ELEV|ELV|EL)\s*[-#.]?\s*(?P<n>\d{1,3})\b")
        .expect("valid regex")
});

/// One location code found in free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCandidate {
    /// `Room`, `Stair` or `Elevator`.
    pub kind: LocationType,
    /// Canonical code (`FAB116109A`, `FAB1-ST21`, `FAB1-EL02`).
    pub canonical: String,
    /// Equivalent spellings to try, canonical first, without duplicates.
    pub variants: Vec<String>,
}

impl CodeCandidate {
    fn room(digits: &str, suffix: Option<&str>) -> Self {
        let base = format!("FAB1{digits}");
        let suffix = suffix.map(str::to_ascii_uppercase).unwrap_or_default();
        let canonical = format!("{base}{suffix}");
        Self {
            kind: LocationType::Room,
            variants: dedup([canonical.clone(), base]),
            canonical,
        }
    }

    fn numbered(kind: LocationType, number: u32) -> Self {
        let (canonical, legacy) = match kind {
            LocationType::Elevator => ("FAB1-EL", "ELV-"),
            _ => ("FAB1-ST", "STR-"),
        };
        let canonical = format!("{canonical}{number:02}");
        Self {
            kind,
            variants: dedup([
                canonical.clone(),
                format!("{legacy}{number:02}"),
                format!("{legacy}{number}"),
            ]),
            canonical,
        }
    }

    /// Level encoded in a FAB room code: the digit after `FAB1` is the
    /// floor, so `FAB126401` is on `2F`. `None` for stairs, elevators and
    /// floor digit `0`.
    #[must_use]
    pub fn implied_level(&self) -> Option<String> {
        if self.kind != LocationType::Room {
            return None;
        }
        let floor = self.canonical.strip_prefix("FAB1")?.chars().next()?;
        match floor.to_digit(10)? {
            0 => None,
            n => Some(format!("{n}F")),
        }
    }
}

fn dedup<const N: usize>(values: [String; N]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(N);
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Every location code found in a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationCodes {
    /// Room codes in order of first occurrence.
    pub rooms: Vec<CodeCandidate>,
    /// Stair codes in order of first occurrence.
    pub stairs: Vec<CodeCandidate>,
    /// Elevator codes in order of first occurrence.
    pub elevators: Vec<CodeCandidate>,
}

impl LocationCodes {
    /// Whether no code was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.stairs.is_empty() && self.elevators.is_empty()
    }

    /// The best candidate: first room, else first stair, else first
    /// elevator.
    #[must_use]
    pub fn primary_code(&self) -> Option<&CodeCandidate> {
        self.iter().next()
    }

    /// All candidates in priority order (rooms, stairs, elevators).
    pub fn iter(&self) -> impl Iterator<Item = &CodeCandidate> {
        self.rooms
            .iter()
            .chain(&self.stairs)
            .chain(&self.elevators)
    }
}

fn push_unique(list: &mut Vec<CodeCandidate>, candidate: CodeCandidate) {
    if !list.iter().any(|c| c.canonical == candidate.canonical) {
        list.push(candidate);
    }
}

/// Extracts room, stair and elevator codes from free text.
///
/// Never fails; text with no recognizable code yields an empty result.
#[must_use]
pub fn extract_location_codes(text: &str) -> LocationCodes {
    let mut codes = LocationCodes::default();

    for caps in ROOM_RE.captures_iter(text) {
        let suffix = caps.name("suffix").map(|m| m.as_str());
        push_unique(&mut codes.rooms, CodeCandidate::room(&caps["digits"], suffix));
    }

    for (re, kind, list) in [
        (&*STAIR_RE, LocationType::Stair, &mut codes.stairs),
        (&*ELEVATOR_RE, LocationType::Elevator, &mut codes.elevators),
    ] {
        for caps in re.captures_iter(text) {
            let Ok(number) = caps["n"].parse::<u32>() else {
                continue;
            };
            push_unique(list, CodeCandidate::numbered(kind, number));
        }
    }

    codes
}
