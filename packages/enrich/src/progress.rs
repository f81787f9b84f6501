//! Progress hooks for batch enrichment.
//!
//! [`enrich_batch`](crate::batch::enrich_batch) reports every row's tier
//! through a [`ProgressCallback`] and hands it the final
//! [`CoverageSummary`]. All hooks default to doing nothing, so an
//! implementation only overrides what it shows.

use std::sync::atomic::{AtomicUsize, Ordering};

use fab_locate_location_models::LocationSource;

use crate::batch::CoverageSummary;

/// Receives per-row resolution events from a batch.
///
/// `Send + Sync` so one reporter can watch batches running on several
/// threads.
pub trait ProgressCallback: Send + Sync {
    /// A batch of `rows` inputs is starting.
    fn batch_started(&self, _rows: usize) {}

    /// One row finished. `source` is the tier that resolved it, or `None`
    /// when nothing did.
    fn row_resolved(&self, _source: Option<LocationSource>) {}

    /// The batch finished with these tallies.
    fn batch_finished(&self, _coverage: &CoverageSummary) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressCallback for NullProgress {}

/// Logs running coverage at `info!` every `interval` rows.
#[derive(Debug)]
pub struct LogProgress {
    label: String,
    interval: usize,
    rows: AtomicUsize,
    resolved: AtomicUsize,
    site_only: AtomicUsize,
}

impl LogProgress {
    /// Creates a reporter. An `interval` of zero is treated as one.
    #[must_use]
    pub fn new(label: &str, interval: usize) -> Self {
        Self {
            label: label.to_string(),
            interval: interval.max(1),
            rows: AtomicUsize::new(0),
            resolved: AtomicUsize::new(0),
            site_only: AtomicUsize::new(0),
        }
    }

    /// Rows seen so far.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.load(Ordering::Relaxed)
    }

    /// Rows that got a location id.
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.resolved.load(Ordering::Relaxed)
    }

    /// Rows that only reached the SITE fallback.
    #[must_use]
    pub fn site_only(&self) -> usize {
        self.site_only.load(Ordering::Relaxed)
    }
}

impl ProgressCallback for LogProgress {
    fn batch_started(&self, rows: usize) {
        log::info!("{}: resolving {rows} rows", self.label);
    }

    fn row_resolved(&self, source: Option<LocationSource>) {
        match source {
            Some(LocationSource::Site) => {
                self.resolved.fetch_add(1, Ordering::Relaxed);
                self.site_only.fetch_add(1, Ordering::Relaxed);
            }
            Some(_) => {
                self.resolved.fetch_add(1, Ordering::Relaxed);
            }
            None => {}
        }

        let rows = self.rows.fetch_add(1, Ordering::Relaxed) + 1;
        if rows % self.interval == 0 {
            log::info!(
                "{}: {rows} rows, {} resolved, {} at SITE only",
                self.label,
                self.resolved(),
                self.site_only(),
            );
        }
    }

    fn batch_finished(&self, coverage: &CoverageSummary) {
        log::info!(
            "{}: finished {} rows ({:.1}% resolved)",
            self.label,
            coverage.total,
            coverage.coverage_percent(),
        );
    }
}
