//! CSV and JSON output for distribution reports.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::{ReportError, RunReport, ZoneCurve};
use crate::models::Interval;

pub const RUN_REPORT_FILE: &str = "report.json";

#[derive(Debug, Serialize)]
struct CurveRow<'a> {
    interval: String,
    zone: &'a str,
    label: &'a str,
    count: usize,
    x: f64,
    density: f64,
}

/// Path of the curve file for an interval, e.g. `<dir>/t1.csv`
pub fn curve_path(output_dir: &Path, interval: Interval) -> PathBuf {
    output_dir.join(format!("{interval}.csv"))
}

/// Write one row per curve point: `interval,zone,label,count,x,density`
pub fn write_curves_csv(
    path: &Path,
    interval: Interval,
    curves: &[ZoneCurve],
) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;

    for curve in curves {
        let label = curve.label();
        for &(x, density) in &curve.distribution.points {
            writer.serialize(CurveRow {
                interval: interval.to_string(),
                zone: &curve.zone,
                label: &label,
                count: curve.count,
                x,
                density,
            })?;
        }
    }

    writer.flush()?;
    info!("Wrote {} curves to {}", curves.len(), path.display());

    Ok(())
}

/// Write the run report as pretty JSON
pub fn write_run_report(path: &Path, report: &RunReport) -> Result<(), ReportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    info!("Wrote run report to {}", path.display());
    Ok(())
}

/// Write every interval's curves plus the run report into `output_dir`
pub fn write_outputs(
    output_dir: &Path,
    curves: &[(Interval, Vec<ZoneCurve>)],
    report: &RunReport,
) -> Result<(), ReportError> {
    fs::create_dir_all(output_dir)?;
    for (interval, interval_curves) in curves {
        write_curves_csv(&curve_path(output_dir, *interval), *interval, interval_curves)?;
    }
    write_run_report(&output_dir.join(RUN_REPORT_FILE), report)
}
