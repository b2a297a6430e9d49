//! Command-line interface argument parsing.
//!
//! Every flag is optional. Run without arguments, the tool reads
//! `results.csv` and writes `results.svg` in the working directory.

use crate::config::{MAX_DIMENSION, MIN_HEIGHT, MIN_WIDTH};
use clap::Parser;
use std::path::PathBuf;

/// Benchplot - average benchmark timings and chart them
///
/// Reads a CSV of benchmark runs (columns Method, Threads, Time_ms),
/// averages the time per method and thread count, and renders a grouped
/// bar chart. A thread count of 0 denotes parallel mode.
///
/// Examples:
///   benchplot
///   benchplot --input runs/results.csv --output runs/results.svg
///   benchplot --show --summary
///   benchplot --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Benchmark results CSV to read [default: results.csv]
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// SVG file to write the chart to [default: results.svg]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .benchplot.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Chart title
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Chart width in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Chart height in pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Print a terminal preview of the chart after saving it
    #[arg(long)]
    pub show: bool,

    /// Print the fastest method per thread count and sample counts
    #[arg(long)]
    pub summary: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .benchplot.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    ///
    /// Usage errors exit with status 1; `--help` and `--version` exit 0.
    pub fn parse_args() -> Self {
        Self::try_parse().unwrap_or_else(|e| {
            let _ = e.print();
            std::process::exit(parse_exit_code(&e))
        })
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(width) = self.width {
            check_dimension("width", width, MIN_WIDTH)?;
        }
        if let Some(height) = self.height {
            check_dimension("height", height, MIN_HEIGHT)?;
        }

        if let Some(ref output) = self.output {
            if !crate::config::has_svg_extension(output) {
                return Err(format!(
                    "Output file must have an .svg extension: {}",
                    output.display()
                ));
            }
        }

        if let Some(ref input) = self.input {
            if input.is_dir() {
                return Err(format!("Input path is a directory: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// Exit status for a failed parse: 0 for help/version output, 1 otherwise.
fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

fn check_dimension(name: &str, value: u32, min: u32) -> Result<(), String> {
    if (min..=MAX_DIMENSION).contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "Chart {} must be between {} and {} pixels, got {}",
            name, min, MAX_DIMENSION, value
        ))
    }
}
