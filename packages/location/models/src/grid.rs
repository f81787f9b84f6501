//! Grid coordinate types.
//!
//! The site uses one grid system across every building: letter rows `A`-`N`
//! running north to south (with fractional intermediate lines such as
//! `F.5`) and numeric columns `1`-`34` running east to west.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GridPatternKind;

/// Lowest column number on the site grid.
pub const MIN_COLUMN: f64 = 1.0;

/// Highest column number on the site grid.
pub const MAX_COLUMN: f64 = 34.0;

/// A grid row letter with an optional fractional suffix.
///
/// Ordering is by `(letter, fraction)`, so `F < F.5 < G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridRow {
    letter: char,
    /// Fractional part in hundredths (`F.5` is 50, `F.25` is 25).
    hundredths: u8,
}

impl GridRow {
    /// First row letter on the site grid.
    pub const FIRST: char = 'A';
    /// Last row letter on the site grid.
    pub const LAST: char = 'N';

    /// Creates a whole row. Returns `None` outside `A`-`N`.
    #[must_use]
    pub fn new(letter: char) -> Option<Self> {
        let letter = letter.to_ascii_uppercase();
        (Self::FIRST..=Self::LAST)
            .contains(&letter)
            .then_some(Self {
                letter,
                hundredths: 0,
            })
    }

    /// The base row letter.
    #[must_use]
    pub const fn letter(self) -> char {
        self.letter
    }

    /// Whether this is an intermediate line such as `F.5`.
    #[must_use]
    pub const fn is_fractional(self) -> bool {
        self.hundredths > 0
    }
}

/// Error returned when text is not a valid grid row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGridRowError {
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for InvalidGridRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid grid row {:?}: expected a letter A-N with an optional .N suffix",
            self.value
        )
    }
}

impl std::error::Error for InvalidGridRowError {}

impl FromStr for GridRow {
    type Err = InvalidGridRowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidGridRowError {
            value: s.to_string(),
        };
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(err)?;
        let row = Self::new(letter).ok_or_else(err)?;

        let rest = chars.as_str();
        if rest.is_empty() {
            return Ok(row);
        }

        let digits = rest.strip_prefix('.').ok_or_else(err)?;
        if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let value: u8 = digits.parse().map_err(|_| err())?;
        let hundredths = if digits.len() == 1 { value * 10 } else { value };

        Ok(Self {
            letter: row.letter,
            hundredths,
        })
    }
}

impl fmt::Display for GridRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hundredths {
            0 => write!(f, "{}", self.letter),
            h if h % 10 == 0 => write!(f, "{}.{}", self.letter, h / 10),
            h => write!(f, "{}.{h:02}", self.letter),
        }
    }
}

impl TryFrom<String> for GridRow {
    type Error = InvalidGridRowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GridRow> for String {
    fn from(row: GridRow) -> Self {
        row.to_string()
    }
}

/// Anything that carries a row range and a column range on the site grid.
///
/// Implemented by parsed query grids ([`GridSpec`]) and by reference
/// locations ([`crate::LocationRecord`]) so overlap logic can treat both
/// sides the same way.
pub trait GridBounds {
    /// Inclusive `(min, max)` row range. A single populated bound is
    /// treated as a one-row range.
    fn row_span(&self) -> Option<(GridRow, GridRow)>;

    /// Inclusive `(min, max)` column range. A single populated bound is
    /// treated as a one-column range.
    fn col_span(&self) -> Option<(f64, f64)>;
}

pub(crate) fn span<T: Copy>(min: Option<T>, max: Option<T>) -> Option<(T, T)> {
    match (min, max) {
        (Some(a), Some(b)) => Some((a, b)),
        (Some(a), None) | (None, Some(a)) => Some((a, a)),
        (None, None) => None,
    }
}

/// A parsed grid reference.
///
/// Constructed fresh for every input string and never mutated afterwards.
/// When both bounds of a dimension are present they are always sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Northernmost row.
    pub row_min: Option<GridRow>,
    /// Southernmost row.
    pub row_max: Option<GridRow>,
    /// Lowest column.
    pub col_min: Option<f64>,
    /// Highest column.
    pub col_max: Option<f64>,
    /// Classification of the input.
    pub pattern_kind: GridPatternKind,
    /// The cleaned input text, kept for audit.
    pub raw_text: String,
    /// Whether the bounds came from a `GL-` gridline reference.
    #[serde(default)]
    pub gridline: bool,
    /// The recognized token for named and area references.
    #[serde(default)]
    pub named_location: Option<String>,
}

impl GridSpec {
    fn without_bounds(raw: impl Into<String>, pattern_kind: GridPatternKind) -> Self {
        Self {
            row_min: None,
            row_max: None,
            col_min: None,
            col_max: None,
            pattern_kind,
            raw_text: raw.into(),
            gridline: false,
            named_location: None,
        }
    }

    /// Empty input or a "no grid" sentinel.
    #[must_use]
    pub fn empty(raw: impl Into<String>) -> Self {
        Self::without_bounds(raw, GridPatternKind::Empty)
    }

    /// Text that no rule recognized.
    #[must_use]
    pub fn unparsed(raw: impl Into<String>) -> Self {
        Self::without_bounds(raw, GridPatternKind::Unparsed)
    }

    /// A whole-building or whole-floor reference.
    #[must_use]
    pub fn area(raw: impl Into<String>, token: Option<String>) -> Self {
        Self {
            named_location: token,
            ..Self::without_bounds(raw, GridPatternKind::Area)
        }
    }

    /// A reference to a named entity (room, stair, elevator, lab).
    #[must_use]
    pub fn named(raw: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            named_location: Some(token.into()),
            ..Self::without_bounds(raw, GridPatternKind::Named)
        }
    }

    /// Builds a grid result from extracted bounds.
    ///
    /// Both ranges are sorted so `min <= max`, and the pattern kind is
    /// derived from which axes are present. With no bounds at all the
    /// result is [`GridPatternKind::Unparsed`].
    #[must_use]
    pub fn from_bounds(
        raw: impl Into<String>,
        rows: Option<(GridRow, GridRow)>,
        cols: Option<(f64, f64)>,
        gridline: bool,
    ) -> Self {
        let rows = rows.map(|(a, b)| if a <= b { (a, b) } else { (b, a) });
        let cols = cols.map(|(a, b)| if a <= b { (a, b) } else { (b, a) });

        let pattern_kind = match (rows, cols) {
            (Some((r1, r2)), Some((c1, c2))) => {
                if r1 == r2 && (c2 - c1).abs() < f64::EPSILON {
                    GridPatternKind::Point
                } else {
                    GridPatternKind::Range
                }
            }
            (Some(_), None) => GridPatternKind::RowOnly,
            (None, Some(_)) => GridPatternKind::ColOnly,
            (None, None) => return Self::unparsed(raw),
        };

        Self {
            row_min: rows.map(|(a, _)| a),
            row_max: rows.map(|(_, b)| b),
            col_min: cols.map(|(a, _)| a),
            col_max: cols.map(|(_, b)| b),
            pattern_kind,
            raw_text: raw.into(),
            gridline,
            named_location: None,
        }
    }

    /// Whether any row bound is populated.
    #[must_use]
    pub const fn has_rows(&self) -> bool {
        self.row_min.is_some() || self.row_max.is_some()
    }

    /// Whether any column bound is populated.
    #[must_use]
    pub const fn has_cols(&self) -> bool {
        self.col_min.is_some() || self.col_max.is_some()
    }

    /// Canonical display form, e.g. `"G/10"`, `"C-F/11-22"`, `"G-H"` or
    /// `"11-22"`. `None` for references without grid bounds.
    #[must_use]
    pub fn normalized(&self) -> Option<String> {
        let rows = self.row_span().map(|(a, b)| {
            if a == b {
                a.to_string()
            } else {
                format!("{a}-{b}")
            }
        });
        let cols = self.col_span().map(|(a, b)| {
            if (b - a).abs() < f64::EPSILON {
                format_column(a)
            } else {
                format!("{}-{}", format_column(a), format_column(b))
            }
        });

        match (rows, cols) {
            (Some(r), Some(c)) => Some(format!("{r}/{c}")),
            (Some(r), None) => Some(r),
            (None, Some(c)) => Some(c),
            (None, None) => None,
        }
    }
}

impl GridBounds for GridSpec {
    fn row_span(&self) -> Option<(GridRow, GridRow)> {
        span(self.row_min, self.row_max)
    }

    fn col_span(&self) -> Option<(f64, f64)> {
        span(self.col_min, self.col_max)
    }
}

/// Formats a column number without a trailing `.0`.
#[must_use]
pub fn format_column(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
