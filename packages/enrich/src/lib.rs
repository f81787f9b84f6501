#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location enrichment.
//!
//! Combines the grid parser, the building/level normalizers and the
//! location dimension into one call per source row:
//! [`LocationResolver::enrich_location`] turns free-text building, level,
//! grid and room code fields into a [`LocationEnrichmentResult`] with a
//! resolved location id, the affected rooms and quality flags.
//!
//! [`LocationEnrichmentResult`]: fab_locate_location_models::LocationEnrichmentResult

pub mod batch;
pub mod config;
pub mod progress;
pub mod resolver;

pub use batch::{BatchError, BatchOutcome, CoverageSummary, enrich_batch, read_inputs, write_rows};
pub use config::{ConfigError, EnrichConfig, ReviewThresholds};
pub use progress::{LogProgress, NullProgress, ProgressCallback};
pub use resolver::{LocationInput, LocationResolver, grid_completeness, match_quality};
