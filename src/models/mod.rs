//! Core data models for call-for-service records.

pub mod record;

pub use record::{CallRecord, Coordinate, Interval, Stage, RAW_FIELD_COUNT};
