//! Response-time distribution study.
//!
//! Normalizes raw 911 records, assigns zones and writes one smoothed t1/t2/t3
//! distribution per zone.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use callzone::config::{Config, Overrides};
use callzone::normalize::Normalizer;
use callzone::pipeline::analyze;
use callzone::report::write_outputs;
use callzone::zones::ZoneIndex;

#[derive(Parser, Debug)]
#[command(name = "tdist")]
#[command(about = "Per-zone distributions of 911 response intervals")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raw tab-separated records (.gz is decompressed)
    #[arg(long)]
    raw: Option<PathBuf>,

    /// Zone boundaries as a GeoJSON FeatureCollection
    #[arg(long)]
    boundaries: Option<PathBuf>,

    /// Directory for curve CSVs and the run report
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Zone ID to leave out of the distributions (repeatable)
    #[arg(long = "exclude-zone")]
    exclude_zones: Vec<String>,

    /// Points per smoothed curve
    #[arg(long)]
    grid_points: Option<usize>,

    /// Disable the progress spinner
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    let settings = config.resolve(Overrides {
        raw: args.raw,
        boundaries: args.boundaries,
        output_dir: args.output_dir,
        exclude_zones: args.exclude_zones,
        grid_points: args.grid_points,
    })?;

    info!("Callzone response-time study");
    info!("Raw records: {}", settings.raw.display());

    let zones = ZoneIndex::load(&settings.boundaries).with_context(|| {
        format!(
            "Failed to build zone index from {}",
            settings.boundaries.display()
        )
    })?;
    info!("Zone index ready with {} zones", zones.len());

    let reader = open_raw(&settings.raw)?;

    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} records ({per_sec})")?,
    );

    let analysis = analyze(
        Normalizer::new(reader, Some(&zones)),
        &settings.analysis_options(),
        |_| pb.inc(1),
    );
    pb.finish_with_message("Processing complete");

    if let Some(err) = &analysis.report.normalize.read_error {
        anyhow::bail!(
            "Reading {} failed after {} lines: {}",
            settings.raw.display(),
            analysis.report.normalize.lines_read,
            err
        );
    }

    write_outputs(&settings.output_dir, &analysis.curves, &analysis.report)
        .context("Failed to write report")?;

    info!("Results written to {}", settings.output_dir.display());

    Ok(())
}

/// Open the raw record file, gunzipping `.gz` files
fn open_raw(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open raw records {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}
