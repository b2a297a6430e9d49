//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.benchplot.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".benchplot.toml";

/// Smallest chart dimensions that still leave room for axes and legend.
pub const MIN_WIDTH: u32 = 320;
pub const MIN_HEIGHT: u32 = 200;
/// Upper bound on either chart dimension.
pub const MAX_DIMENSION: u32 = 10_000;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input file settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Output artifact settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Chart appearance.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Print the per-thread-count summary after rendering.
    #[serde(default)]
    pub summary: bool,
}

/// Input file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the benchmark results CSV.
    #[serde(default = "default_input")]
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input(),
        }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from("results.csv")
}

/// Output artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path the SVG chart is written to (overwritten on each run).
    #[serde(default = "default_output")]
    pub path: PathBuf,

    /// Print a terminal preview of the chart after saving it.
    #[serde(default)]
    pub show: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output(),
            show: false,
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("results.svg")
}

/// Chart appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart title.
    #[serde(default = "default_title")]
    pub title: String,

    /// X axis label.
    #[serde(default = "default_x_label")]
    pub x_label: String,

    /// Y axis label.
    #[serde(default = "default_y_label")]
    pub y_label: String,

    /// Image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Bar colours, one per method, cycled when there are more methods.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            x_label: default_x_label(),
            y_label: default_y_label(),
            width: default_width(),
            height: default_height(),
            palette: default_palette(),
        }
    }
}

fn default_title() -> String {
    "Benchmark: Average Time per Method vs. Thread Count".to_string()
}

fn default_x_label() -> String {
    "Number of Threads (0 indicates Parallel Mode)".to_string()
}

fn default_y_label() -> String {
    "Average Time (ms)".to_string()
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    600
}

pub(crate) fn default_palette() -> Vec<String> {
    vec![
        "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
        "#bcbd22", "#17becf",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.input.path = input.clone();
        }
        if let Some(ref output) = args.output {
            self.output.path = output.clone();
        }

        if let Some(ref title) = args.title {
            self.chart.title = title.clone();
        }
        if let Some(width) = args.width {
            self.chart.width = width;
        }
        if let Some(height) = args.height {
            self.chart.height = height;
        }

        // Flags only ever switch features on
        if args.show {
            self.output.show = true;
        }
        if args.summary {
            self.general.summary = true;
        }
    }

    /// Check the merged settings before any work is done.
    pub fn validate(&self) -> Result<()> {
        let chart = &self.chart;

        if !(MIN_WIDTH..=MAX_DIMENSION).contains(&chart.width) {
            bail!(
                "Chart width must be between {} and {} pixels, got {}",
                MIN_WIDTH,
                MAX_DIMENSION,
                chart.width
            );
        }
        if !(MIN_HEIGHT..=MAX_DIMENSION).contains(&chart.height) {
            bail!(
                "Chart height must be between {} and {} pixels, got {}",
                MIN_HEIGHT,
                MAX_DIMENSION,
                chart.height
            );
        }

        if let Some(bad) = chart.palette.iter().find(|c| !is_hex_color(c)) {
            bail!("Invalid palette colour: {:?} (expected #rrggbb)", bad);
        }

        if !has_svg_extension(&self.output.path) {
            bail!(
                "Output path must end in .svg: {}",
                self.output.path.display()
            );
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

/// True if the path has an `svg` extension (case-insensitive).
pub fn has_svg_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.path, PathBuf::from("results.csv"));
        assert_eq!(config.output.path, PathBuf::from("results.svg"));
        assert_eq!(config.chart.y_label, "Average Time (ms)");
        assert!(config.chart.x_label.contains("0 indicates Parallel Mode"));
        assert!(!config.output.show);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r##"
[general]
summary = true

[input]
path = "bench/out.csv"

[output]
path = "bench/out.svg"
show = true

[chart]
title = "Summation"
width = 800
palette = ["#000000", "#ffffff"]
"##;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.summary);
        assert_eq!(config.input.path, PathBuf::from("bench/out.csv"));
        assert_eq!(config.output.path, PathBuf::from("bench/out.svg"));
        assert!(config.output.show);
        assert_eq!(config.chart.title, "Summation");
        assert_eq!(config.chart.width, 800);
        assert_eq!(config.chart.height, 600);
        assert_eq!(config.chart.palette, vec!["#000000", "#ffffff"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[chart]\nheight = 480\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.chart.height, 480);
        assert_eq!(config.chart.width, 1000);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[chart\nheight = ").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_validate_dimensions() {
        let mut config = Config::default();
        config.chart.width = 100;
        assert!(config.validate().is_err());

        config.chart.width = MAX_DIMENSION;
        config.chart.height = MAX_DIMENSION + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_palette_and_output() {
        let mut config = Config::default();
        config.chart.palette = vec!["blue".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.path = PathBuf::from("results.png");
        assert!(config.validate().is_err());

        config.output.path = PathBuf::from("out/Chart.SVG");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[chart]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.chart.palette.len(), 10);
    }
}
