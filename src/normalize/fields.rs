//! Field-level decoding: stage timestamps, coordinates and intervals.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use thiserror::Error;

use crate::models::{Coordinate, Stage};

const SECONDS_PER_DAY: i64 = 86_400;

/// Characters before the implicit decimal point in raw coordinates
const COORDINATE_DEGREE_DIGITS: usize = 3;

/// A field that could not be decoded and was degraded to absent
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("invalid date {value:?} for {stage} time {time:?}")]
    InvalidDate {
        stage: &'static str,
        value: String,
        time: String,
    },

    #[error("invalid {stage} time {value:?}, expected HHMMSS")]
    InvalidTime { stage: &'static str, value: String },

    #[error("invalid coordinate ({lat:?}, {lng:?})")]
    InvalidCoordinate { lat: String, lng: String },
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{2})(\d{2})(\d{2})$").expect("valid time pattern"))
}

/// Combine the record date with an `HHMMSS` stage time.
///
/// Only the first 10 characters of the trimmed `date` are used, so a
/// trailing time of day (`"2020-01-01 11:59:00"`) is ignored. A blank time
/// is absent, not an error.
pub fn parse_stage_time(
    stage: Stage,
    date: &str,
    time: &str,
) -> Result<Option<NaiveDateTime>, FieldError> {
    let time = time.trim();
    if time.is_empty() {
        return Ok(None);
    }

    let invalid_time = || FieldError::InvalidTime {
        stage: stage.name(),
        value: time.to_string(),
    };

    let caps = time_pattern().captures(time).ok_or_else(invalid_time)?;
    let part = |i: usize| caps[i].parse::<u32>().map_err(|_| invalid_time());
    let time_of_day = NaiveTime::from_hms_opt(part(1)?, part(2)?, part(3)?).ok_or_else(invalid_time)?;

    let date_str: String = date.trim().chars().take(10).collect();
    let date_str = date_str.trim();
    let day = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| FieldError::InvalidDate {
        stage: stage.name(),
        value: date_str.to_string(),
        time: time.to_string(),
    })?;

    Ok(Some(day.and_time(time_of_day)))
}

/// Decode a raw latitude/longitude pair.
///
/// Raw values carry an implicit decimal point after the third character
/// (`"030123"` is 30.123). Longitude is negated for the western hemisphere.
pub fn decode_coordinate(lat: &str, lng: &str) -> Result<Option<Coordinate>, FieldError> {
    let (lat, lng) = (lat.trim(), lng.trim());
    if lat.is_empty() || lng.is_empty() {
        return Ok(None);
    }

    let invalid = || FieldError::InvalidCoordinate {
        lat: lat.to_string(),
        lng: lng.to_string(),
    };

    let lat_value = decode_fixed_point(lat).ok_or_else(invalid)?;
    let lng_value = decode_fixed_point(lng).ok_or_else(invalid)?;

    Ok(Some(Coordinate {
        lat: lat_value,
        lng: -lng_value,
    }))
}

fn decode_fixed_point(raw: &str) -> Option<f64> {
    if !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // all ASCII, so byte slicing is on char boundaries
    let split = raw.len().min(COORDINATE_DEGREE_DIGITS);
    let (degrees, fraction) = raw.split_at(split);
    if fraction.is_empty() {
        degrees.parse().ok()
    } else {
        format!("{degrees}.{fraction}").parse().ok()
    }
}

/// Elapsed whole seconds from `start` to `end`.
///
/// Stage times share the record's date, so a stage past midnight appears
/// earlier than its predecessor; the difference is taken modulo one day.
pub fn elapsed_seconds(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Option<u32> {
    let (start, end) = (start?, end?);
    let seconds = (end - start).num_seconds().rem_euclid(SECONDS_PER_DAY);
    u32::try_from(seconds).ok()
}
