//! Raw 911 record normalization.
//!
//! Splits tab-separated call-for-service lines, decodes stage timestamps and
//! coordinates, derives the t1/t2/t3 response intervals and assigns a zone.

mod fields;
mod line;
mod normalizer;
mod stats;

pub use fields::{decode_coordinate, elapsed_seconds, parse_stage_time, FieldError};
pub use line::{parse_line, LineError, ParsedLine};
pub use normalizer::{Normalizer, Outcomes};
pub use stats::{DegradeReason, NormalizeReport, SkipReason};
