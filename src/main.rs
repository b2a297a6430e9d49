//! Benchplot - benchmark results chart generator
//!
//! Reads a CSV of benchmark runs, averages execution time per method and
//! thread count, and renders the averages as a grouped bar chart.
//!
//! Exit codes:
//!   0 - Chart written
//!   1 - Input could not be read or parsed, or any other runtime error

mod analysis;
mod chart;
mod cli;
mod config;
mod loader;
mod models;

use anyhow::{Context, Result};
use chart::ChartStyle;
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use loader::DataLoadError;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config(Path::new(DEFAULT_CONFIG_FILE)) {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Initialize logging
    init_logging(&args);

    info!("Benchplot v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = execute(&args) {
        report_failure(&e);
        std::process::exit(1);
    }
}

/// Print a failure the way the user should see it.
///
/// A [`DataLoadError`] is the expected failure mode and gets a plain
/// message; anything else is printed with its full context chain.
fn report_failure(e: &anyhow::Error) {
    if let Some(load_error) = e.downcast_ref::<DataLoadError>() {
        error!("Failed to load results: {}", load_error);
        eprintln!("Error reading {}", load_error);
    } else {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
    }
}

/// Handle --init-config: generate a default configuration file.
fn handle_init_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            path.display()
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {} with default settings.", path.display());
    println!("   Edit it to customize input/output paths and chart appearance.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Resolve configuration and run the pipeline.
fn execute(args: &Args) -> Result<()> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);
    config.validate()?;

    run(&config, args.quiet)
}

/// Run the complete pipeline: load, aggregate, pivot, render, save.
fn run(config: &Config, quiet: bool) -> Result<()> {
    let input = &config.input.path;
    let output = &config.output.path;

    // Step 1: Load the results
    if !quiet {
        println!("📥 Reading benchmark results: {}", input.display());
    }
    let dataset = loader::load(input)?;

    // Step 2: Average per (method, threads)
    let table = analysis::aggregate(&dataset);

    // Step 3: Reshape into threads x methods
    let matrix = analysis::pivot(&table);
    if dataset.is_empty() {
        warn!("No benchmark records in {}", input.display());
    }

    // Step 4: Render and save
    let style = ChartStyle::from(&config.chart);
    let chart = chart::render(&matrix, &style);
    chart.save(output)?;

    if !quiet {
        println!("\n📊 Results:");
        println!("   Records: {}", dataset.len());
        println!("   Methods: {}", matrix.methods().len());
        println!("   Thread counts: {}", matrix.threads().len());
        println!("\n✅ Chart saved to: {}", output.display());
    }

    if config.general.summary {
        println!("\n{}", analysis::generate_summary_text(&table, &matrix));
    }

    if config.output.show {
        println!();
        chart.show();
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;
    use std::path::PathBuf;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.input.path = dir.join("results.csv");
        config.output.path = dir.join("results.svg");
        config
    }

    #[test]
    fn test_run_writes_chart() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(
            &config.input.path,
            "Method,Threads,Time_ms\nA,1,10\nA,1,20\nB,1,30\nA,0,5\n",
        )
        .unwrap();

        run(&config, true).unwrap();

        let svg = std::fs::read_to_string(&config.output.path).unwrap();
        assert_eq!(svg.matches("class=\"bar\"").count(), 3);
        assert!(svg.contains("A, 1 threads: 15.00 ms"));
    }

    #[test]
    fn test_run_header_only_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.input.path, "Method,Threads,Time_ms\n").unwrap();

        run(&config, true).unwrap();

        let svg = std::fs::read_to_string(&config.output.path).unwrap();
        assert!(svg.contains("No data"));
    }

    #[test]
    fn test_run_missing_input_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.output.path, "previous chart").unwrap();

        let err = run(&config, true).unwrap_err();
        assert!(err.downcast_ref::<DataLoadError>().is_some());

        let content = std::fs::read_to_string(&config.output.path).unwrap();
        assert_eq!(content, "previous chart");
    }

    #[test]
    fn test_run_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        assert!(run(&config, true).is_err());
        assert!(!config.output.path.exists());
    }

    #[test]
    fn test_run_missing_column_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.input.path, "Method,Time_ms\nA,1\n").unwrap();

        let err = run(&config, true).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataLoadError>(),
            Some(DataLoadError::MissingColumn {
                column: "Threads",
                ..
            })
        ));
    }

    #[test]
    fn test_execute_uses_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("runs.csv");
        let output = dir.path().join("out").join("runs.svg");
        std::fs::write(&input, "Method,Threads,Time_ms\nreduce,4,2.5\n").unwrap();

        let config_path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &config_path,
            format!(
                "[input]\npath = {:?}\n\n[output]\npath = {:?}\n\n[chart]\ntitle = \"From config\"\n",
                input.display().to_string(),
                output.display().to_string()
            ),
        )
        .unwrap();

        let mut args = make_args();
        args.config = Some(config_path);
        args.quiet = true;
        args.width = Some(640);

        execute(&args).unwrap();

        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains("From config"));
        assert!(svg.contains("width=\"640\""));
    }

    #[test]
    fn test_execute_rejects_invalid_config() {
        let mut args = make_args();
        args.config = Some(PathBuf::from("/nonexistent/.benchplot.toml"));
        assert!(execute(&args).is_err());
    }

    #[test]
    fn test_init_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        handle_init_config(&path).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.output.path, PathBuf::from("results.svg"));

        // Refuses to overwrite an existing file
        assert!(handle_init_config(&path).is_err());
    }
}
