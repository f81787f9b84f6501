//! Rule machinery shared by every grid dialect.
//!
//! A [`GridRule`] pairs a regex with an extractor function. Rule patterns
//! are written with short placeholders (`{R1}`, `{C1}`, `{S}` ...) that
//! expand to the row/column sub-patterns below, so each rule reads like the
//! format it recognizes. Extractors read the named groups `r1`, `r2`, `c1`,
//! `c2` (or `list` / `code`) and return a [`GridMatch`], or `None` when the
//! captured values turn out not to be valid grid coordinates, in which case
//! the parser moves on to the next rule.

use std::sync::LazyLock;

use fab_locate_location_models::{GridRow, GridSpec, MAX_COLUMN, MIN_COLUMN};
use regex::{Captures, Regex};

/// Placeholder expansions used in rule patterns.
const PLACEHOLDERS: &[(&str, &str)] = &[
    ("{R1}", r"(?P<r1>[A-N](?:\.\d{1,2})?)"),
    ("{R2}", r"(?P<r2>[A-N](?:\.\d{1,2})?)"),
    ("{C1}", r"(?P<c1>\d{1,2}(?:\.\d{1,2})?)"),
    ("{C2}", r"(?P<c2>\d{1,2}(?:\.\d{1,2})?)"),
    ("{L1}", r"(?P<r1>[A-N])"),
    ("{L2}", r"(?P<r2>[A-N])"),
    ("{N1}", r"(?P<c1>\d{1,2})"),
    ("{N2}", r"(?P<c2>\d{1,2})"),
    ("{ROW}", r"[A-N](?:\.\d{1,2})?"),
    ("{COL}", r"\d{1,2}(?:\.\d{1,2})?"),
    ("{BLDG}", r"(?:FAB1?|SUE|SUW|SUP|FIZ|CUB|GCS|OB1|OB2|YARD)"),
    ("{GL}", r"GL\s*[-.]?\s*"),
    ("{RG}", r"(?:\s*[-~]\s*|\s+(?:TO|THRU|THROUGH)\s+)"),
    ("{AND}", r"(?:\s*[&+]\s*|\s+AND\s+)"),
    ("{SEP}", r"(?:\s*[,;&+]\s*|\s+AND\s+)"),
    ("{S}", r"\s*/\s*"),
    ("{D}", r"\s*-\s*"),
    ("{T}", r"\s*~\s*"),
];

/// Separator between items of a comma/ampersand list.
static LIST_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:[,;&+]|\bAND\b)\s*").expect("valid regex"));

/// A grid token somewhere inside free text.
static GRID_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-N](?:\.\d{1,2})?\s*/\s*\d{1,2}\b|\bGL\s*-?\s*(?:[A-N]\b|\d)")
        .expect("valid regex")
});

/// Expands rule placeholders into a full regex pattern.
#[must_use]
pub fn expand(template: &str) -> String {
    PLACEHOLDERS
        .iter()
        .fold(template.to_string(), |acc, (key, value)| {
            acc.replace(key, value)
        })
}

/// What a rule recognized.
#[derive(Debug, Clone, PartialEq)]
pub enum GridMatch {
    /// Grid bounds. Either axis may be absent but not both.
    Bounds {
        /// Row range (unsorted).
        rows: Option<(GridRow, GridRow)>,
        /// Column range (unsorted).
        cols: Option<(f64, f64)>,
        /// Whether the reference was a `GL-` gridline.
        gridline: bool,
    },
    /// A named, non-grid entity.
    Named(String),
    /// A whole-building / whole-floor reference.
    Area(Option<String>),
    /// A "no grid" sentinel.
    Empty,
}

impl GridMatch {
    /// Converts the match into a [`GridSpec`] for `raw`.
    #[must_use]
    pub fn into_spec(self, raw: &str) -> GridSpec {
        match self {
            Self::Bounds {
                rows,
                cols,
                gridline,
            } => GridSpec::from_bounds(raw, rows, cols, gridline),
            Self::Named(token) => GridSpec::named(raw, token),
            Self::Area(token) => GridSpec::area(raw, token),
            Self::Empty => GridSpec::empty(raw),
        }
    }
}

/// Extracts a [`GridMatch`] from a successful regex match.
pub type Extractor = fn(&Captures<'_>) -> Option<GridMatch>;

/// One entry of an ordered rule table.
pub struct GridRule {
    name: &'static str,
    regex: Regex,
    extract: Extractor,
}

impl GridRule {
    /// Compiles a rule from a placeholder pattern.
    ///
    /// # Panics
    ///
    /// Panics if the expanded pattern is not a valid regex. Rule tables are
    /// static and every rule is compiled by the unit tests.
    #[must_use]
    pub fn new(name: &'static str, pattern: &str, extract: Extractor) -> Self {
        let regex = Regex::new(&expand(pattern))
            .unwrap_or_else(|e| panic!("invalid pattern for grid rule {name}: {e}"));
        Self {
            name,
            regex,
            extract,
        }
    }

    /// Stable rule name, used in traces and tests.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The expanded regex.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Applies the rule to cleaned text.
    #[must_use]
    pub fn apply(&self, text: &str) -> Option<GridMatch> {
        let caps = self.regex.captures(text)?;
        (self.extract)(&caps)
    }
}

impl std::fmt::Debug for GridRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridRule")
            .field("name", &self.name)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

/// A rewrite that replaces the whole text with its `rest` group.
pub struct Rewrite {
    name: &'static str,
    regex: Regex,
}

impl Rewrite {
    /// Compiles a rewrite. The pattern must define a `rest` group.
    ///
    /// # Panics
    ///
    /// Panics if the expanded pattern is not a valid regex.
    #[must_use]
    pub fn new(name: &'static str, pattern: &str) -> Self {
        let regex = Regex::new(&expand(pattern))
            .unwrap_or_else(|e| panic!("invalid pattern for rewrite {name}: {e}"));
        Self { name, regex }
    }

    /// Stable rewrite name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the rewritten text, or `None` when the rewrite does not
    /// apply.
    #[must_use]
    pub fn apply(&self, text: &str) -> Option<String> {
        let caps = self.regex.captures(text)?;
        caps.name("rest").map(|m| m.as_str().trim().to_string())
    }
}

impl std::fmt::Debug for Rewrite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rewrite")
            .field("name", &self.name)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

// ── Value parsing ────────────────────────────────────────────────────────

/// Parses a row token.
pub(crate) fn parse_row(text: &str) -> Option<GridRow> {
    text.parse().ok()
}

/// Parses a column token, rejecting numbers off the site grid.
pub(crate) fn parse_col(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    (MIN_COLUMN..=MAX_COLUMN).contains(&value).then_some(value)
}

/// Reads an optional `(first, second)` pair of named groups through
/// `parse`. A missing second group repeats the first. Returns
/// `Some(None)` when neither group participated and `None` when a
/// captured value is invalid.
#[allow(clippy::option_option)]
fn pair<T: Copy>(
    caps: &Captures<'_>,
    first: &str,
    second: &str,
    parse: fn(&str) -> Option<T>,
) -> Option<Option<(T, T)>> {
    let Some(a) = caps.name(first) else {
        return Some(None);
    };
    let a = parse(a.as_str())?;
    let b = match caps.name(second) {
        Some(m) => parse(m.as_str())?,
        None => a,
    };
    Some(Some((a, b)))
}

fn list_items(text: &str) -> impl Iterator<Item = &str> {
    LIST_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn span_of<T: Copy + PartialOrd>(values: &[T]) -> Option<(T, T)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), &v| {
        (
            if v < lo { v } else { lo },
            if v > hi { v } else { hi },
        )
    }))
}

fn rows_from_list(text: &str) -> Option<(GridRow, GridRow)> {
    let rows: Option<Vec<GridRow>> = list_items(text).map(parse_row).collect();
    span_of(&rows?)
}

fn cols_from_list(text: &str) -> Option<(f64, f64)> {
    let cols: Option<Vec<f64>> = list_items(text).map(parse_col).collect();
    span_of(&cols?)
}

fn whole(caps: &Captures<'_>) -> String {
    caps.get(0)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn token(caps: &Captures<'_>) -> String {
    caps.name("code")
        .map_or_else(|| whole(caps), |m| m.as_str().trim().to_string())
}

// ── Extractors ───────────────────────────────────────────────────────────

fn grid_bounds(caps: &Captures<'_>, gridline: bool) -> Option<GridMatch> {
    let rows = pair(caps, "r1", "r2", parse_row)?;
    let cols = pair(caps, "c1", "c2", parse_col)?;
    if rows.is_none() && cols.is_none() {
        return None;
    }
    Some(GridMatch::Bounds {
        rows,
        cols,
        gridline,
    })
}

/// Row/column bounds from the `r1`/`r2`/`c1`/`c2` groups.
pub(crate) fn bounds(caps: &Captures<'_>) -> Option<GridMatch> {
    grid_bounds(caps, false)
}

/// Like [`bounds`] for `GL-` gridline references.
pub(crate) fn gridline(caps: &Captures<'_>) -> Option<GridMatch> {
    grid_bounds(caps, true)
}

/// Two-letter row shorthand (`LM 6,4`). `GL` and `CL` are gridline and
/// column-line prefixes, not row pairs.
pub(crate) fn two_letter(caps: &Captures<'_>) -> Option<GridMatch> {
    let r1 = caps.name("r1")?.as_str();
    let r2 = caps.name("r2")?.as_str();
    if matches!((r1, r2), ("G" | "C", "L")) {
        return None;
    }
    bounds(caps)
}

/// Rows from a `list` group (`C, D, E`).
pub(crate) fn row_list(caps: &Captures<'_>) -> Option<GridMatch> {
    let rows = rows_from_list(caps.name("list")?.as_str())?;
    Some(GridMatch::Bounds {
        rows: Some(rows),
        cols: None,
        gridline: false,
    })
}

/// Gridline rows from a `list` group (`GL-C, D`).
pub(crate) fn gridline_row_list(caps: &Captures<'_>) -> Option<GridMatch> {
    let rows = rows_from_list(caps.name("list")?.as_str())?;
    Some(GridMatch::Bounds {
        rows: Some(rows),
        cols: None,
        gridline: true,
    })
}

/// Columns from a `list` group (`11, 12, 15`).
pub(crate) fn col_list(caps: &Captures<'_>) -> Option<GridMatch> {
    let cols = cols_from_list(caps.name("list")?.as_str())?;
    Some(GridMatch::Bounds {
        rows: None,
        cols: Some(cols),
        gridline: false,
    })
}

/// A single row plus a column list (`G/10,11,12`).
pub(crate) fn row_with_col_list(caps: &Captures<'_>) -> Option<GridMatch> {
    let row = parse_row(caps.name("r1")?.as_str())?;
    let cols = cols_from_list(caps.name("list")?.as_str())?;
    Some(GridMatch::Bounds {
        rows: Some((row, row)),
        cols: Some(cols),
        gridline: false,
    })
}

/// A row list plus a single column (`G,H/10`).
pub(crate) fn row_list_with_col(caps: &Captures<'_>) -> Option<GridMatch> {
    let rows = rows_from_list(caps.name("list")?.as_str())?;
    let col = parse_col(caps.name("c1")?.as_str())?;
    Some(GridMatch::Bounds {
        rows: Some(rows),
        cols: Some((col, col)),
        gridline: false,
    })
}

/// Bounding box of a list of `ROW/COL` points (`G/10, H/12`).
pub(crate) fn point_list(caps: &Captures<'_>) -> Option<GridMatch> {
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    for item in list_items(caps.name("list")?.as_str()) {
        let (row, col) = item.split_once('/')?;
        rows.push(parse_row(row)?);
        cols.push(parse_col(col)?);
    }
    Some(GridMatch::Bounds {
        rows: Some(span_of(&rows)?),
        cols: Some(span_of(&cols)?),
        gridline: false,
    })
}

/// A "no grid" sentinel.
pub(crate) const fn empty(_caps: &Captures<'_>) -> Option<GridMatch> {
    Some(GridMatch::Empty)
}

/// A whole-building / whole-floor reference without a token.
pub(crate) const fn area(_caps: &Captures<'_>) -> Option<GridMatch> {
    Some(GridMatch::Area(None))
}

/// A whole-building / whole-floor reference keeping the matched token.
pub(crate) fn area_token(caps: &Captures<'_>) -> Option<GridMatch> {
    Some(GridMatch::Area(Some(token(caps))))
}

/// A named entity; keeps the `code` group or the whole match.
pub(crate) fn named(caps: &Captures<'_>) -> Option<GridMatch> {
    Some(GridMatch::Named(token(caps)))
}

/// A named entity, unless the text also carries a grid token, in which
/// case later rules get a chance to extract the grid.
pub(crate) fn named_without_grid(caps: &Captures<'_>) -> Option<GridMatch> {
    if GRID_TOKEN_RE.is_match(&whole(caps)) {
        return None;
    }
    named(caps)
}

/// A sector code (`S62`, `SECTOR 62`) normalized to `S{digits}`.
pub(crate) fn sector(caps: &Captures<'_>) -> Option<GridMatch> {
    let digits = caps.name("code")?.as_str();
    Some(GridMatch::Area(Some(format!("S{digits}"))))
}
