//! Text cleanup applied before any grid rule runs.
//!
//! Grid strings arrive with whatever decoration the author felt like
//! adding: `"Grid: C/11 – C/22 (approx.)"`, `"LOCATION G/10 area"`,
//! `"grid line 5"`. Cleaning reduces these to the bare reference so the
//! rule tables only deal with the grid syntax itself.

use std::sync::LazyLock;

use regex::Regex;

/// Runs of whitespace.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Trailing punctuation.
static TRAILING_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s.,;:]+$").expect("valid regex"));

/// A trailing parenthetical note (`"G/10 (NEAR DOOR)"`).
static TRAILING_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^()]*\)?$").expect("valid regex"));

/// Trailing descriptive qualifiers.
static TRAILING_QUALIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+(?:AREA|ZONE|VICINITY|APPROX(?:IMATELY)?|APPROX\.)$").expect("valid regex")
});

/// `GRID LINE 5`, `GRIDLINES: N` → `GL-5`, `GL-N`.
static GRID_LINE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^GRID\s*LINES?(?:\s*[:#-]\s*|\s+)(?P<rest>.+)$").expect("valid regex")
});

/// `GRID`, `GRIDS`, `LOC`, `LOCATION` followed by a separator.
static WORD_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:GRIDS?|LOC(?:ATION)?)(?:\s*[:#-]\s*|\s+)(?P<rest>.+)$")
        .expect("valid regex")
});

/// `G/L ` followed by more text.
static GL_SLASH_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^G/L\s+(?P<rest>.+)$").expect("valid regex"));

/// Upper bound on strip passes. Each pass removes at least one character
/// so this only guards against pathological inputs.
const MAX_PASSES: usize = 8;

/// Maps unicode dash and tilde look-alikes to ASCII.
fn map_char(c: char) -> char {
    match c {
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' | '\u{FE63}' | '\u{FF0D}' => '-',
        '\u{FF5E}' | '\u{301C}' | '\u{223C}' | '\u{02DC}' => '~',
        '\u{FF0F}' => '/',
        '\u{FF0C}' => ',',
        _ => c,
    }
}

/// Cleans a raw grid string.
///
/// Uppercases, maps unicode dashes/tildes to ASCII, collapses whitespace
/// and strips descriptive prefixes, trailing qualifiers, trailing
/// parenthetical notes and trailing punctuation until nothing changes.
#[must_use]
pub fn clean(raw: &str) -> String {
    let mapped: String = raw.trim().to_uppercase().chars().map(map_char).collect();
    let mut text = WHITESPACE_RE.replace_all(&mapped, " ").trim().to_string();

    for _ in 0..MAX_PASSES {
        let next = strip_once(&text);
        if next == text {
            break;
        }
        text = next;
    }

    text
}

fn strip_once(text: &str) -> String {
    let text = TRAILING_PUNCT_RE.replace(text, "");
    let text = match TRAILING_PAREN_RE.find(&text) {
        Some(m) if m.start() > 0 => text[..m.start()].to_string(),
        _ => text.into_owned(),
    };
    let text = TRAILING_QUALIFIER_RE.replace(&text, "");

    if let Some(caps) = GRID_LINE_PREFIX_RE.captures(&text) {
        return format!("GL-{}", &caps["rest"]);
    }
    if let Some(caps) = WORD_PREFIX_RE.captures(&text) {
        return caps["rest"].to_string();
    }
    if let Some(caps) = GL_SLASH_PREFIX_RE.captures(&text) {
        return caps["rest"].to_string();
    }

    text.trim().to_string()
}
