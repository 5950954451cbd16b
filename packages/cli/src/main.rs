#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the India district population pipeline.
//!
//! `reconcile` runs the full pass and writes the reconciled `GeoJSON`,
//! national trend CSV, and diagnostics. `coverage`, `verify`, and `sanity`
//! check the inputs without writing anything. With no subcommand the tool
//! falls back to an interactive menu.
//!
//! Logging goes through [`india_pop_cli_utils::init_logger`], so `RUST_LOG`
//! controls verbosity and log lines never tear the progress bar.

mod commands;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use india_pop_projection_models::{YearMode, YearSelection};
use india_pop_reconcile::config::ReconcileConfig;

/// Reconcile district boundaries with survey and projection data.
#[derive(Parser)]
#[command(name = "india_pop_cli")]
#[command(about = "Project India's district populations from state projections and survey weights")]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute. Opens the interactive menu when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the outputs.
    Reconcile {
        /// Override the configured year selection.
        #[arg(long, value_enum)]
        years: Option<YearsArg>,
    },

    /// Report how many boundary names match survey district names.
    Coverage,

    /// Compare the survey-derived national population with the official
    /// projection.
    Verify,

    /// Total one indicator's headcount across districts.
    Sanity {
        /// Indicator ID to total.
        #[arg(long, default_value_t = 1)]
        indicator: i64,
    },
}

/// Named year sets accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum YearsArg {
    /// Every year 2011-2036.
    Full,
    /// 2011, 2021, 2025, 2031, 2036.
    Milestones,
}

impl From<YearsArg> for YearSelection {
    fn from(value: YearsArg) -> Self {
        Self::Mode(match value {
            YearsArg::Full => YearMode::Full,
            YearsArg::Milestones => YearMode::Milestones,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = india_pop_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = ReconcileConfig::load_or_default(cli.config.as_deref())?;

    let Some(command) = cli.command else {
        return interactive::run(&mut config, &multi);
    };

    match command {
        Commands::Reconcile { years } => {
            if let Some(years) = years {
                config.years = years.into();
            }
            commands::reconcile(&config, &multi)?;
        }
        Commands::Coverage => commands::coverage(&config)?,
        Commands::Verify => commands::verify(&config)?,
        Commands::Sanity { indicator } => commands::sanity(&config, indicator)?,
    }

    Ok(())
}
