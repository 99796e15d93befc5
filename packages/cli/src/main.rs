#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for census annualization and population projection.
//!
//! Reads `popcast.toml` (if present), the census JSON, and any configured
//! auxiliary tables, then runs one of the subcommands below. Set `RUST_LOG`
//! to control log output.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use popcast_census::HistoricalBaseline;
use popcast_census_models::{AnnualSeries, MigrationEstimate, VitalEvents};
use popcast_cli::config::{Config, load_config};
use popcast_cli::input::load_baseline;
use popcast_cli::run::{
    ProjectionRun, ProjectionSettings, preset_report, run_preview, run_projection,
};
use popcast_projection::export::{export_filename, write_projection_csv};
use serde::Serialize;

/// Annualize census data and project population.
#[derive(Parser)]
#[command(name = "popcast")]
#[command(about = "Annualize census data and project population")]
struct Cli {
    /// Configuration file (defaults to `popcast.toml` when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Census JSON file, overriding the configured path.
    #[arg(long, global = true)]
    census: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run a projection and export it as CSV.
    Project {
        /// Years beyond the last census year.
        #[arg(long)]
        horizon: Option<u32>,

        /// Scenario (status, pessimistic, pronatalist, custom).
        #[arg(long)]
        scenario: Option<String>,

        /// Method (demographic, fixedIndex, subtractPerYear, rateBased).
        #[arg(long)]
        method: Option<String>,

        /// Method parameter, or `auto` to derive it from history.
        #[arg(long, allow_hyphen_values = true)]
        param: Option<String>,

        /// Custom scenario birth rate, per mille.
        #[arg(long, allow_negative_numbers = true)]
        cbr: Option<f64>,

        /// Custom scenario death rate, per mille.
        #[arg(long, allow_negative_numbers = true)]
        cdr: Option<f64>,

        /// Custom scenario net migration, persons per year.
        #[arg(long, allow_negative_numbers = true)]
        mig_net: Option<f64>,

        /// Export path (default: `<output_dir>/projection_<base>_<final>.csv`).
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the CSV to stdout instead of a file.
        #[arg(long)]
        stdout: bool,

        /// Print the full run (display series, axis, chart) as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the status-quo preset and the named scenarios.
    Presets {
        /// Trailing window averaged into the preset.
        #[arg(long)]
        trailing_years: Option<usize>,
    },

    /// Print the annualized series, auxiliary counts, and migration.
    Baseline,

    /// Run the default 15-year demographic preview.
    Preview,
}

/// JSON shape of the `baseline` subcommand.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BaselineReport<'a> {
    series: &'a AnnualSeries,
    events: &'a VitalEvents,
    migration: BTreeMap<i32, MigrationEstimate>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(census) = cli.census {
        config.census = census;
    }
    let baseline = load_baseline(&config)?;

    match cli.command {
        Commands::Project {
            horizon,
            scenario,
            method,
            param,
            cbr,
            cdr,
            mig_net,
            output,
            stdout,
            json,
        } => {
            let projection = &mut config.projection;
            if let Some(horizon) = horizon {
                projection.horizon_years = horizon;
            }
            if let Some(scenario) = scenario {
                projection.scenario = scenario;
            }
            if let Some(method) = method {
                projection.method = method;
            }
            if param.is_some() {
                projection.method_param = param;
            }
            projection.cbr = cbr.or(projection.cbr);
            projection.cdr = cdr.or(projection.cdr);
            projection.mig_net = mig_net.or(projection.mig_net);

            let settings = ProjectionSettings::from_config(&config.projection)?;
            let run = run_projection(&baseline, &settings)?;
            emit_run(&config, &run, output, stdout, json)?;
        }
        Commands::Presets { trailing_years } => {
            let trailing = trailing_years.unwrap_or(config.projection.trailing_years);
            let report = preset_report(&baseline, trailing);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Baseline => cmd_baseline(&baseline)?,
        Commands::Preview => {
            let run = run_preview(&baseline)?;
            emit_run(&config, &run, None, true, false)?;
        }
    }

    Ok(())
}

fn cmd_baseline(baseline: &HistoricalBaseline) -> Result<(), Box<dyn std::error::Error>> {
    let report = BaselineReport {
        series: &baseline.series,
        events: &baseline.events,
        migration: baseline.migration.preferred(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Writes the CSV export and prints the summary.
fn emit_run(
    config: &Config,
    run: &ProjectionRun,
    output: Option<PathBuf>,
    stdout: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if stdout {
        let handle = std::io::stdout().lock();
        write_projection_csv(&run.result, handle)?;
        eprintln!("{}", run.summary);
    } else {
        let path = output.unwrap_or_else(|| config.output_dir.join(export_filename(&run.result)));
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&path)?);
        write_projection_csv(&run.result, &mut writer)?;
        writer.flush()?;
        log::info!("Wrote {} rows to {}", run.result.years.len(), path.display());
        println!("{}", run.summary);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(run)?);
    }

    Ok(())
}
