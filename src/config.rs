//! Run configuration: input sources, output directory and report options.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::{AnalysisOptions, DEFAULT_GRID_POINTS};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

/// Config file layout. Every value can be overridden from the command line.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct InputConfig {
    /// Tab-separated raw records, optionally gzipped
    pub raw: Option<PathBuf>,
    /// GeoJSON FeatureCollection of zones
    pub boundaries: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
    pub exclude_zones: Vec<String>,
    pub grid_points: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            exclude_zones: Vec::new(),
            grid_points: DEFAULT_GRID_POINTS,
        }
    }
}

/// Command-line overrides, applied on top of the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub raw: Option<PathBuf>,
    pub boundaries: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub exclude_zones: Vec<String>,
    pub grid_points: Option<usize>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub raw: PathBuf,
    pub boundaries: PathBuf,
    pub output_dir: PathBuf,
    pub exclude_zones: Vec<String>,
    pub grid_points: usize,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides and check that every required path is set.
    ///
    /// Excluded zones from both sources are merged.
    pub fn resolve(self, overrides: Overrides) -> Result<RunSettings, ConfigError> {
        let mut exclude_zones = self.output.exclude_zones;
        for zone in overrides.exclude_zones {
            if !exclude_zones.contains(&zone) {
                exclude_zones.push(zone);
            }
        }

        Ok(RunSettings {
            raw: overrides
                .raw
                .or(self.input.raw)
                .ok_or(ConfigError::Missing("raw input path"))?,
            boundaries: overrides
                .boundaries
                .or(self.input.boundaries)
                .ok_or(ConfigError::Missing("boundaries path"))?,
            output_dir: overrides
                .output_dir
                .or(self.output.dir)
                .ok_or(ConfigError::Missing("output directory"))?,
            exclude_zones,
            grid_points: overrides.grid_points.unwrap_or(self.output.grid_points),
        })
    }
}

impl RunSettings {
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            excluded_zones: self.exclude_zones.clone(),
            grid_points: self.grid_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[input]
raw = "data/raw_data.txt.gz"
boundaries = "data/apd_zone.geojson"

[output]
dir = "out"
exclude_zones = ["50"]
grid_points = 128
"#;

    #[test]
    fn test_full_config() {
        let settings = Config::from_toml(FULL)
            .unwrap()
            .resolve(Overrides::default())
            .unwrap();
        assert_eq!(settings.raw, PathBuf::from("data/raw_data.txt.gz"));
        assert_eq!(settings.boundaries, PathBuf::from("data/apd_zone.geojson"));
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!(settings.exclude_zones, vec!["50"]);
        assert_eq!(settings.grid_points, 128);
    }

    #[test]
    fn test_overrides_win_independently() {
        let overrides = Overrides {
            output_dir: Some(PathBuf::from("elsewhere")),
            exclude_zones: vec!["50".to_string(), "7".to_string()],
            grid_points: Some(10),
            ..Overrides::default()
        };
        let settings = Config::from_toml(FULL).unwrap().resolve(overrides).unwrap();
        assert_eq!(settings.raw, PathBuf::from("data/raw_data.txt.gz"));
        assert_eq!(settings.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(settings.exclude_zones, vec!["50", "7"]);
        assert_eq!(settings.grid_points, 10);
        assert_eq!(settings.analysis_options().grid_points, 10);
    }

    #[test]
    fn test_cli_only() {
        let overrides = Overrides {
            raw: Some(PathBuf::from("raw.txt")),
            boundaries: Some(PathBuf::from("zones.geojson")),
            output_dir: Some(PathBuf::from("out")),
            ..Overrides::default()
        };
        let settings = Config::default().resolve(overrides).unwrap();
        assert_eq!(settings.grid_points, DEFAULT_GRID_POINTS);
        assert!(settings.exclude_zones.is_empty());
    }

    #[test]
    fn test_missing_path() {
        let err = Config::from_toml("[input]\nraw = \"raw.txt\"\n")
            .unwrap()
            .resolve(Overrides::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("boundaries path")));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("[output]\ngrid_points = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load_from_file("/nonexistent/callzone.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/callzone.toml"));
    }
}
