//! Callzone - 911 response-time distributions by dispatch zone
//!
//! This library normalizes raw calls-for-service records, assigns each call
//! to a zone by point-in-polygon lookup and builds per-zone distributions of
//! the t1/t2/t3 response intervals.

pub mod config;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod zones;

pub use models::{CallRecord, Coordinate, Interval, Stage};
pub use normalize::{NormalizeReport, Normalizer};
pub use zones::{ZoneError, ZoneIndex};
