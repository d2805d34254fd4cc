//! Normalize a record source and build per-zone interval curves.

use std::io::BufRead;

use tracing::info;

use crate::models::{CallRecord, Interval};
use crate::normalize::Normalizer;
use crate::report::{IntervalSummary, RunReport, ZoneCurve, ZoneSamples};

pub const DEFAULT_GRID_POINTS: usize = 200;

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Zones left out of every distribution
    pub excluded_zones: Vec<String>,
    /// Points per smoothed curve
    pub grid_points: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            excluded_zones: Vec::new(),
            grid_points: DEFAULT_GRID_POINTS,
        }
    }
}

/// Curves for each interval plus the run report
#[derive(Debug, Clone)]
pub struct Analysis {
    pub curves: Vec<(Interval, Vec<ZoneCurve>)>,
    pub report: RunReport,
}

/// Drain the normalizer, grouping t1/t2/t3 by zone.
///
/// `on_record` sees every normalized record as it is produced.
pub fn analyze<R, F>(
    mut normalizer: Normalizer<'_, R>,
    options: &AnalysisOptions,
    mut on_record: F,
) -> Analysis
where
    R: BufRead,
    F: FnMut(&CallRecord),
{
    let mut groups: Vec<ZoneSamples> = Interval::all()
        .iter()
        .map(|interval| ZoneSamples::new(*interval, options.excluded_zones.iter().cloned()))
        .collect();

    for record in normalizer.by_ref() {
        on_record(&record);
        for group in &mut groups {
            group.add_record(&record);
        }
    }

    let normalize = normalizer.into_report();
    info!(
        "Normalized {} records from {} lines ({} skipped, {} fields degraded)",
        normalize.records,
        normalize.lines_read,
        normalize.total_skipped(),
        normalize.total_degraded()
    );

    let mut report = RunReport {
        normalize,
        ..RunReport::default()
    };
    let curves = groups
        .iter()
        .map(|group| {
            report
                .intervals
                .insert(group.interval(), IntervalSummary::from_samples(group));
            (group.interval(), group.curves(options.grid_points))
        })
        .collect();

    Analysis { curves, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::ZoneIndex;
    use std::io::Cursor;

    const ZONES: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"ID": 1},
         "geometry": {"type": "Polygon", "coordinates": [[[-97.2, 30.0], [-97.0, 30.0], [-97.0, 30.2], [-97.2, 30.2], [-97.2, 30.0]]]}},
        {"type": "Feature", "properties": {"ID": 50},
         "geometry": {"type": "Polygon", "coordinates": [[[-97.0, 30.0], [-96.8, 30.0], [-96.8, 30.2], [-97.0, 30.2], [-97.0, 30.0]]]}}
    ]}"#;

    fn raw_line(dispatched: &str, arrived: &str, lng: &str) -> String {
        [
            "1", "", "", "2020-01-01", "2020-01-01 11:59:00", "", "120000", "", dispatched, "",
            arrived, "", "", "123000", "0301000", lng, "",
        ]
        .join("\t")
    }

    #[test]
    fn test_analyze() {
        let index = ZoneIndex::from_geojson(ZONES).unwrap();
        let input = [
            raw_line("120230", "121000", "0971000"),
            raw_line("120100", "", "0971000"),
            raw_line("120100", "121000", "0969000"),
            "garbage".to_string(),
            raw_line("120100", "121000", "0990000"),
        ]
        .join("\n");

        let options = AnalysisOptions {
            excluded_zones: vec!["50".to_string()],
            grid_points: 16,
        };
        let mut seen = 0;
        let analysis = analyze(
            Normalizer::new(Cursor::new(input), Some(&index)),
            &options,
            |_| seen += 1,
        );

        assert_eq!(seen, 4);
        let report = &analysis.report;
        assert_eq!(report.normalize.records, 4);
        assert_eq!(report.normalize.total_skipped(), 1);
        assert_eq!(report.normalize.unzoned, 1);

        let t1 = &report.intervals[&Interval::T1];
        assert_eq!(t1.samples, 2);
        assert_eq!(t1.zones, 1);
        assert_eq!(t1.dropped.excluded_zone, 1);
        assert_eq!(t1.dropped.no_zone, 1);

        let t2 = &report.intervals[&Interval::T2];
        assert_eq!(t2.samples, 1);
        assert_eq!(t2.dropped.no_value, 1);

        let (interval, t1_curves) = &analysis.curves[0];
        assert_eq!(*interval, Interval::T1);
        assert_eq!(t1_curves.len(), 1);
        assert_eq!(t1_curves[0].zone, "1");
        assert_eq!(t1_curves[0].count, 2);
        assert_eq!(t1_curves[0].max, 150);
        assert_eq!(t1_curves[0].distribution.points.len(), 16);
    }
}
