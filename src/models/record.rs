//! Normalized call-for-service record.

use serde::{Deserialize, Serialize};

/// Number of tab-separated fields in a raw 911 record line.
pub const RAW_FIELD_COUNT: usize = 17;

/// Position of each field in a raw record line.
pub mod field {
    pub const ID: usize = 0;
    pub const CRIME_CODE: usize = 1;
    pub const CRIME_DESCRIPTION: usize = 2;
    pub const DATE: usize = 3;
    pub const START_TIME: usize = 4;
    pub const END_TIME: usize = 5;
    pub const CALL_RECEIVED: usize = 6;
    pub const LATITUDE: usize = 14;
    pub const LONGITUDE: usize = 15;
    pub const TEXT: usize = 16;
}

/// Stages of call handling, in the order they appear in a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Call received by 911
    CallReceived,
    /// Call entered into the dispatch system
    Entered,
    Dispatched,
    EnRoute,
    Arrived,
    Transport,
    Booked,
    Cleared,
}

impl Stage {
    /// All stages in raw field order
    pub fn all() -> &'static [Stage] {
        &[
            Stage::CallReceived,
            Stage::Entered,
            Stage::Dispatched,
            Stage::EnRoute,
            Stage::Arrived,
            Stage::Transport,
            Stage::Booked,
            Stage::Cleared,
        ]
    }

    /// Column index of this stage's time string in a raw record
    pub fn field_index(&self) -> usize {
        field::CALL_RECEIVED + *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::CallReceived => "call_received",
            Stage::Entered => "entered",
            Stage::Dispatched => "dispatched",
            Stage::EnRoute => "en_route",
            Stage::Arrived => "arrived",
            Stage::Transport => "transport",
            Stage::Booked => "booked",
            Stage::Cleared => "cleared",
        }
    }
}

/// Response-time interval between two call stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// Call received -> dispatched
    T1,
    /// Dispatched -> arrived
    T2,
    /// Arrived -> cleared
    T3,
}

impl Interval {
    pub fn all() -> &'static [Interval] {
        &[Interval::T1, Interval::T2, Interval::T3]
    }

    /// The (start, end) stages this interval spans
    pub fn stages(&self) -> (Stage, Stage) {
        match self {
            Interval::T1 => (Stage::CallReceived, Stage::Dispatched),
            Interval::T2 => (Stage::Dispatched, Stage::Arrived),
            Interval::T3 => (Stage::Arrived, Stage::Cleared),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interval::T1 => write!(f, "t1"),
            Interval::T2 => write!(f, "t2"),
            Interval::T3 => write!(f, "t3"),
        }
    }
}

/// Geographic coordinate (lat/lng)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// A normalized call-for-service record.
///
/// Every field except the identifier is independently optional: a missing
/// stage time only removes the intervals that depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    /// Seconds from call received to dispatch
    pub t1: Option<u32>,
    /// Seconds from dispatch to arrival
    pub t2: Option<u32>,
    /// Seconds from arrival to cleared
    pub t3: Option<u32>,
    pub coordinate: Option<Coordinate>,
    /// ID of the zone containing `coordinate`
    pub zone: Option<String>,
}

impl CallRecord {
    pub fn interval(&self, interval: Interval) -> Option<u32> {
        match interval {
            Interval::T1 => self.t1,
            Interval::T2 => self.t2,
            Interval::T3 => self.t3,
        }
    }

    pub fn lat(&self) -> Option<f64> {
        self.coordinate.map(|c| c.lat)
    }

    pub fn lng(&self) -> Option<f64> {
        self.coordinate.map(|c| c.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_field_indices() {
        assert_eq!(Stage::CallReceived.field_index(), 6);
        assert_eq!(Stage::Dispatched.field_index(), 8);
        assert_eq!(Stage::Arrived.field_index(), 10);
        assert_eq!(Stage::Cleared.field_index(), 13);
        assert_eq!(Stage::Cleared.field_index() + 1, field::LATITUDE);
    }

    #[test]
    fn test_interval_selection() {
        let record = CallRecord {
            id: "1".to_string(),
            t1: Some(150),
            t2: None,
            t3: Some(1200),
            coordinate: None,
            zone: None,
        };
        assert_eq!(record.interval(Interval::T1), Some(150));
        assert_eq!(record.interval(Interval::T2), None);
        assert_eq!(record.interval(Interval::T3), Some(1200));
        assert_eq!(record.lat(), None);
    }
}
