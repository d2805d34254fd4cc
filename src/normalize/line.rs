//! Single raw line -> normalized record.

use thiserror::Error;

use super::fields::{decode_coordinate, elapsed_seconds, parse_stage_time, FieldError};
use crate::models::record::field;
use crate::models::{CallRecord, Interval, Stage, RAW_FIELD_COUNT};
use crate::zones::ZoneIndex;

/// A raw line that could not be turned into a record at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("expected {RAW_FIELD_COUNT} tab-separated fields, found {found}")]
    FieldCount { found: usize },
}

/// A normalized record plus the fields that were degraded to absent
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub record: CallRecord,
    pub issues: Vec<FieldError>,
}

/// Stage timestamps of one record, indexed by `Stage`
struct StageTimes([Option<chrono::NaiveDateTime>; 8]);

impl StageTimes {
    fn get(&self, stage: Stage) -> Option<chrono::NaiveDateTime> {
        self.0[stage as usize]
    }

    fn elapsed(&self, interval: Interval) -> Option<u32> {
        let (start, end) = interval.stages();
        elapsed_seconds(self.get(start), self.get(end))
    }
}

/// Normalize one raw record line.
///
/// Only a wrong field count rejects the line; any field that fails to
/// decode is absent in the record and reported in `issues`.
pub fn parse_line(line: &str, zones: Option<&ZoneIndex>) -> Result<ParsedLine, LineError> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    if fields.len() != RAW_FIELD_COUNT {
        return Err(LineError::FieldCount {
            found: fields.len(),
        });
    }

    let mut issues = Vec::new();
    // stage clock times are on the day the call started
    let date = fields[field::START_TIME];

    let mut times = StageTimes([None; 8]);
    for stage in Stage::all() {
        match parse_stage_time(*stage, date, fields[stage.field_index()]) {
            Ok(t) => times.0[*stage as usize] = t,
            Err(e) => issues.push(e),
        }
    }

    let coordinate = decode_coordinate(fields[field::LATITUDE], fields[field::LONGITUDE])
        .unwrap_or_else(|e| {
            issues.push(e);
            None
        });

    let zone = match (zones, coordinate) {
        (Some(index), Some(c)) => index.zone_of(c).map(str::to_string),
        _ => None,
    };

    let record = CallRecord {
        id: fields[field::ID].trim().to_string(),
        t1: times.elapsed(Interval::T1),
        t2: times.elapsed(Interval::T2),
        t3: times.elapsed(Interval::T3),
        coordinate,
        zone,
    };

    Ok(ParsedLine { record, issues })
}
