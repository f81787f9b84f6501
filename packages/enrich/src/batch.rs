//! Batch enrichment and coverage reporting.
//!
//! A batch whose rows all come back without a location id almost always
//! means the dimension table is missing its SITE record rather than that
//! every row is bad, so [`CoverageSummary::log`] reports that case as an
//! error.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use fab_locate_location_models::{LocationEnrichmentResult, LocationSource};

use crate::progress::ProgressCallback;
use crate::resolver::{LocationInput, LocationResolver};

/// Errors from reading inputs or writing enriched rows.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The affected-room list could not be JSON-encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Flushing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-batch resolution counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageSummary {
    /// Rows processed.
    pub total: usize,
    /// Rows with a location id.
    pub resolved: usize,
    /// Rows per precedence tier.
    pub by_source: BTreeMap<LocationSource, usize>,
    /// Rows flagged for review.
    pub review_flagged: usize,
    /// Rows with at least one affected room.
    pub with_rooms: usize,
}

impl CoverageSummary {
    /// Tallies a set of results.
    #[must_use]
    pub fn from_results(results: &[LocationEnrichmentResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.record(result);
        }
        summary
    }

    fn record(&mut self, result: &LocationEnrichmentResult) {
        self.total += 1;
        if result.dim_location_id.is_some() {
            self.resolved += 1;
        }
        if let Some(source) = result.location_source {
            *self.by_source.entry(source).or_default() += 1;
        }
        if result.location_review_flag {
            self.review_flagged += 1;
        }
        if result.affected_rooms_count > 0 {
            self.with_rooms += 1;
        }
    }

    /// Rows resolved by `source`.
    #[must_use]
    pub fn count(&self, source: LocationSource) -> usize {
        self.by_source.get(&source).copied().unwrap_or(0)
    }

    /// Share of rows with a location id, `0.0..=100.0`. An empty batch is
    /// fully covered.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn coverage_percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.resolved as f64 / self.total as f64 * 100.0
    }

    /// Share of rows resolved more precisely than the SITE fallback.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn specific_percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        let specific = self.resolved - self.count(LocationSource::Site);
        specific as f64 / self.total as f64 * 100.0
    }

    /// A non-empty batch where nothing resolved. Points at a broken
    /// dimension table, not bad rows.
    #[must_use]
    pub const fn is_systemic_failure(&self) -> bool {
        self.total > 0 && self.resolved == 0
    }

    /// Logs the summary.
    pub fn log(&self, label: &str) {
        if self.is_systemic_failure() {
            log::error!(
                "{label}: 0 of {} rows resolved to a location; check the dimension table for a SITE record",
                self.total
            );
            return;
        }

        log::info!(
            "{label}: {}/{} rows resolved ({:.1}%, {:.1}% above SITE), {} flagged for review",
            self.resolved,
            self.total,
            self.coverage_percent(),
            self.specific_percent(),
            self.review_flagged,
        );
        for (source, count) in &self.by_source {
            log::debug!("{label}:   {source}: {count}");
        }
    }
}

/// Results of [`enrich_batch`].
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// One result per input row, in input order.
    pub rows: Vec<LocationEnrichmentResult>,
    /// Coverage tallies for the batch.
    pub coverage: CoverageSummary,
}

/// Resolves every input row and tallies coverage.
///
/// Rows are independent; callers that want parallelism can split the
/// input and run several batches against clones of the same resolver.
pub fn enrich_batch(
    resolver: &LocationResolver,
    inputs: &[LocationInput],
    progress: &dyn ProgressCallback,
) -> BatchOutcome {
    progress.batch_started(inputs.len());

    let mut coverage = CoverageSummary::default();
    let mut rows = Vec::with_capacity(inputs.len());

    for input in inputs {
        let result = resolver.enrich_location(input);
        coverage.record(&result);
        progress.row_resolved(result.location_source);
        rows.push(result);
    }

    coverage.log("enrich");
    progress.batch_finished(&coverage);

    BatchOutcome { rows, coverage }
}

/// Reads location inputs from CSV with `building`, `level`, `grid`,
/// `room_code` and `source` columns. Missing columns are null, extra
/// columns are ignored, and rows that fail to decode are skipped with a
/// warning.
///
/// # Errors
///
/// Returns an error if the header cannot be read.
pub fn read_inputs(reader: impl Read) -> Result<Vec<LocationInput>, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    reader.headers()?;

    let mut inputs = Vec::new();
    for (line, result) in reader.deserialize::<LocationInput>().enumerate() {
        match result {
            Ok(input) => inputs.push(input),
            Err(e) => log::warn!("skipping input row {}: {e}", line + 2),
        }
    }
    Ok(inputs)
}

/// Writes results as CSV in the enriched output column layout.
///
/// # Errors
///
/// Returns an error if a row cannot be encoded or the writer fails.
pub fn write_rows<W: Write>(writer: W, results: &[LocationEnrichmentResult]) -> Result<(), BatchError> {
    let mut writer = csv::Writer::from_writer(writer);
    for result in results {
        writer.serialize(result.to_row()?)?;
    }
    writer.flush()?;
    Ok(())
}
