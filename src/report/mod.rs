//! Per-zone interval distributions.
//!
//! Groups `(interval value, zone)` pairs by zone, smooths each group into a
//! density curve and writes the curves plus a run report to disk.

mod kde;
mod samples;
mod writer;

pub use kde::{Distribution, ZoneCurve};
pub use samples::{SampleDrops, ZoneSamples};
pub use writer::{curve_path, write_curves_csv, write_outputs, write_run_report, RUN_REPORT_FILE};

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::models::Interval;
use crate::normalize::NormalizeReport;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Samples kept and dropped for one interval
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntervalSummary {
    pub samples: usize,
    pub zones: usize,
    pub dropped: SampleDrops,
}

impl IntervalSummary {
    pub fn from_samples(samples: &ZoneSamples) -> Self {
        Self {
            samples: samples.len(),
            zones: samples.zones().len(),
            dropped: samples.drops(),
        }
    }
}

/// Everything that was skipped, degraded or kept during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub normalize: NormalizeReport,
    pub intervals: BTreeMap<Interval, IntervalSummary>,
}
