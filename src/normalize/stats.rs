//! Counters for skipped lines and degraded fields.

use std::collections::BTreeMap;

use serde::Serialize;

use super::fields::FieldError;
use super::line::LineError;

/// Why a raw line produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    FieldCount,
}

impl From<&LineError> for SkipReason {
    fn from(err: &LineError) -> Self {
        match err {
            LineError::FieldCount { .. } => SkipReason::FieldCount,
        }
    }
}

/// Why a field was degraded to absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradeReason {
    InvalidDate,
    InvalidTime,
    InvalidCoordinate,
}

impl From<&FieldError> for DegradeReason {
    fn from(err: &FieldError) -> Self {
        match err {
            FieldError::InvalidDate { .. } => DegradeReason::InvalidDate,
            FieldError::InvalidTime { .. } => DegradeReason::InvalidTime,
            FieldError::InvalidCoordinate { .. } => DegradeReason::InvalidCoordinate,
        }
    }
}

/// Tally of one pass over a raw record source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub lines_read: u64,
    /// Records yielded
    pub records: u64,
    pub skipped: BTreeMap<SkipReason, u64>,
    /// Fields degraded to absent, by reason
    pub degraded: BTreeMap<DegradeReason, u64>,
    /// Records without a coordinate
    pub without_coordinate: u64,
    /// Records with a coordinate but no containing zone
    pub unzoned: u64,
    /// Set when reading the source failed and iteration stopped early
    pub read_error: Option<String>,
}

impl NormalizeReport {
    pub fn record_skip(&mut self, err: &LineError) {
        *self.skipped.entry(err.into()).or_default() += 1;
    }

    pub fn record_issue(&mut self, err: &FieldError) {
        *self.degraded.entry(err.into()).or_default() += 1;
    }

    pub fn total_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    pub fn total_degraded(&self) -> u64 {
        self.degraded.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut report = NormalizeReport::default();
        report.record_skip(&LineError::FieldCount { found: 3 });
        report.record_skip(&LineError::FieldCount { found: 18 });
        report.record_issue(&FieldError::InvalidTime {
            stage: "dispatched",
            value: "12:00".to_string(),
        });

        assert_eq!(report.total_skipped(), 2);
        assert_eq!(report.skipped[&SkipReason::FieldCount], 2);
        assert_eq!(report.total_degraded(), 1);
        assert_eq!(report.degraded.get(&DegradeReason::InvalidCoordinate), None);
    }

    #[test]
    fn test_serializes_reason_keys() {
        let mut report = NormalizeReport::default();
        report.record_skip(&LineError::FieldCount { found: 1 });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["skipped"]["field_count"], 1);
        assert!(json["read_error"].is_null());
    }
}
