//! Grouping of interval samples by zone.

use std::cmp::Ordering;

use hashbrown::{HashMap, HashSet};
use serde::Serialize;
use tracing::info;

use super::kde::{Distribution, ZoneCurve};
use crate::models::{CallRecord, Interval};

/// Samples that did not make it into a zone group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SampleDrops {
    pub no_value: u64,
    /// Zero-second intervals, left out like absent ones
    pub zero_value: u64,
    pub no_zone: u64,
    pub excluded_zone: u64,
}

/// Interval values grouped by zone
#[derive(Debug, Clone)]
pub struct ZoneSamples {
    interval: Interval,
    by_zone: HashMap<String, Vec<u32>>,
    excluded: HashSet<String>,
    drops: SampleDrops,
}

impl ZoneSamples {
    pub fn new<I, S>(interval: Interval, excluded_zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interval,
            by_zone: HashMap::new(),
            excluded: excluded_zones.into_iter().map(Into::into).collect(),
            drops: SampleDrops::default(),
        }
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Add this group's interval from a normalized record
    pub fn add_record(&mut self, record: &CallRecord) {
        self.push(record.interval(self.interval), record.zone.as_deref());
    }

    /// Add one `(value, zone)` pair; pairs missing either half are dropped,
    /// as are zero values
    pub fn push(&mut self, value: Option<u32>, zone: Option<&str>) {
        let Some(value) = value else {
            self.drops.no_value += 1;
            return;
        };
        if value == 0 {
            self.drops.zero_value += 1;
            return;
        }
        let Some(zone) = zone else {
            self.drops.no_zone += 1;
            return;
        };
        if self.excluded.contains(zone) {
            self.drops.excluded_zone += 1;
            return;
        }

        self.by_zone.entry_ref(zone).or_default().push(value);
    }

    pub fn drops(&self) -> SampleDrops {
        self.drops
    }

    /// Total samples kept across all zones
    pub fn len(&self) -> usize {
        self.by_zone.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_zone.is_empty()
    }

    pub fn samples(&self, zone: &str) -> Option<&[u32]> {
        self.by_zone.get(zone).map(Vec::as_slice)
    }

    /// Zone IDs in report order: numeric IDs ascending, then the rest
    pub fn zones(&self) -> Vec<&str> {
        let mut zones: Vec<&str> = self.by_zone.keys().map(String::as_str).collect();
        zones.sort_by(|a, b| compare_zone_ids(a, b));
        zones
    }

    /// Smooth every zone's samples into a density curve
    pub fn curves(&self, grid_points: usize) -> Vec<ZoneCurve> {
        self.zones()
            .into_iter()
            .map(|zone| {
                let samples = &self.by_zone[zone];
                let values: Vec<f64> = samples.iter().map(|v| f64::from(*v)).collect();
                let max = samples.iter().copied().max().unwrap_or_default();

                info!(
                    "{} zone {}: {} samples, max {}",
                    self.interval,
                    zone,
                    samples.len(),
                    max
                );

                ZoneCurve {
                    zone: zone.to_string(),
                    count: samples.len(),
                    max,
                    distribution: Distribution::smooth(&values, grid_points),
                }
            })
            .collect()
    }
}

fn compare_zone_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
