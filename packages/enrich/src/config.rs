//! Resolver configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at
//! all) yields [`EnrichConfig::default`].
//!
//! ```toml
//! resolve_named_grid = true
//! tbm_sources = ["TBM"]
//!
//! [review]
//! max_rooms_not_precise = 10
//! max_rooms_partial = 5
//! max_rooms_mixed = 8
//! flag_level_only = true
//! ```

use std::path::Path;

use fab_locate_grid::GridDialect;
use fab_locate_location_models::{GridCompleteness, MatchQuality};
use serde::{Deserialize, Serialize};

/// Errors that can occur when loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or has fields of the wrong type.
    #[error("Invalid enrichment config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// When a resolved row should be flagged for human review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewThresholds {
    /// Flag when more rooms than this matched and not all were full
    /// matches.
    pub max_rooms_not_precise: usize,
    /// Flag `PARTIAL` quality with more rooms than this.
    pub max_rooms_partial: usize,
    /// Flag `MIXED` quality with more rooms than this.
    pub max_rooms_mixed: usize,
    /// Flag rows with a level but no grid.
    pub flag_level_only: bool,
}

impl Default for ReviewThresholds {
    fn default() -> Self {
        Self {
            max_rooms_not_precise: 10,
            max_rooms_partial: 5,
            max_rooms_mixed: 8,
            flag_level_only: true,
        }
    }
}

impl ReviewThresholds {
    /// Whether a row with these room-match characteristics needs review.
    #[must_use]
    pub fn needs_review(
        &self,
        rooms: usize,
        quality: MatchQuality,
        completeness: GridCompleteness,
    ) -> bool {
        (rooms > self.max_rooms_not_precise && quality != MatchQuality::Precise)
            || (quality == MatchQuality::Partial && rooms > self.max_rooms_partial)
            || (quality == MatchQuality::Mixed && rooms > self.max_rooms_mixed)
            || (self.flag_level_only && completeness == GridCompleteness::LevelOnly)
    }
}

/// Configuration for [`crate::LocationResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Review flag thresholds.
    pub review: ReviewThresholds,
    /// Try a `NAMED` grid token (`STR-21`, `FAB116406`) as a location
    /// code when no room code was supplied.
    pub resolve_named_grid: bool,
    /// Source labels whose grid text is parsed with the work-plan
    /// dialect. Compared case-insensitively.
    pub tbm_sources: Vec<String>,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            review: ReviewThresholds::default(),
            resolve_named_grid: true,
            tbm_sources: vec!["TBM".to_string()],
        }
    }
}

impl EnrichConfig {
    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a field has the wrong
    /// type.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded enrichment config from {}", path.display());
        Ok(config)
    }

    /// The grid dialect for rows from `source`.
    #[must_use]
    pub fn dialect_for(&self, source: &str) -> GridDialect {
        let source = source.trim();
        if self
            .tbm_sources
            .iter()
            .any(|s| s.trim().eq_ignore_ascii_case(source))
        {
            GridDialect::Tbm
        } else {
            GridDialect::Standard
        }
    }
}
