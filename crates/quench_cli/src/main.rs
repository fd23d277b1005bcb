//! Quench CLI - Jet Energy-Loss Monte Carlo Driver
//!
//! Operational entry point for the quench workspace.
//!
//! # Commands
//!
//! - `quench run` - Simulate events and write parton/hadron tables
//! - `quench cases` - Show the physics-case matrix a run sweeps
//! - `quench check` - Validate the configuration and build every model
//! - `quench summarise --partons <csv>` - Flow harmonics and R_AA per case
//!
//! # Configuration
//!
//! Settings come from `quench.toml` (or `--config`), then `QUENCH_*`
//! environment variables, then command-line flags, each layer overriding the
//! previous one.
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate wires the reference models
//! from `quench_models` into the `quench_engine` orchestrator and owns
//! logging, persistence and interruption.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

mod commands;
mod config;
mod error;
mod interrupt;
mod logging;
mod output;

pub use error::{CliError, Result};

use config::{build_config, CliArgs, LogLevel};
use interrupt::InterruptFlag;

/// Quench jet energy-loss Monte Carlo
#[derive(Parser)]
#[command(name = "quench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "quench.toml", env = "QUENCH_CONFIG")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate events and write the result tables
    Run {
        /// Number of events (media) to generate; 0 runs until interrupted
        #[arg(short = 'n', long)]
        events: Option<usize>,

        /// Scattering draws per event
        #[arg(short, long)]
        samples: Option<usize>,

        /// Master random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Run identifier (output subdirectory and file prefix)
        #[arg(long)]
        identifier: Option<String>,

        /// Results directory
        #[arg(short, long)]
        results_dir: Option<PathBuf>,

        /// Events simulated in parallel
        #[arg(short, long)]
        workers: Option<usize>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(long)]
        log_level: Option<String>,

        /// Hadronise every run regardless of the configuration
        #[arg(long)]
        hadronise: bool,
    },

    /// Show the physics-case matrix
    Cases,

    /// Check configuration and model parameters
    Check,

    /// Compute flow harmonics and nuclear modification from parton tables
    Summarise {
        /// Parton result files (CSV)
        #[arg(short, long, required = true, num_args = 1..)]
        partons: Vec<PathBuf>,

        /// Lower edge of the pT range (GeV)
        #[arg(long, default_value = "0.0")]
        pt_min: f64,

        /// Upper edge of the pT range (GeV)
        #[arg(long, default_value = "50.0")]
        pt_max: f64,

        /// Number of uniform pT bins
        #[arg(short, long, default_value = "10")]
        bins: usize,

        /// Flow harmonic orders
        #[arg(long, value_delimiter = ',', default_value = "2,3")]
        orders: Vec<u32>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Config file to load: the given path if it exists, none if the default
/// file is absent.
fn config_file(path: &str) -> anyhow::Result<Option<PathBuf>> {
    let path = Path::new(path);
    if path.exists() {
        Ok(Some(path.to_path_buf()))
    } else if path == Path::new("quench.toml") {
        Ok(None)
    } else {
        Err(CliError::FileNotFound(path.display().to_string()).into())
    }
}

fn level(verbose: bool, configured: LogLevel) -> LogLevel {
    if verbose {
        LogLevel::Debug
    } else {
        configured
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut args = CliArgs {
        config_file: config_file(&cli.config)?,
        ..CliArgs::default()
    };

    match cli.command {
        Commands::Run {
            events,
            samples,
            seed,
            identifier,
            results_dir,
            workers,
            log_level,
            hadronise,
        } => {
            args.num_events = events;
            args.num_oversample = samples;
            args.seed = seed;
            args.identifier = identifier;
            args.results_dir = results_dir;
            args.workers = workers;
            args.log_level = log_level;
            args.hadronise = hadronise;

            let mut config = build_config(&args).context("failed to load configuration")?;
            commands::run::resolve_identity(&mut config);

            let identifier = config.run.identifier.clone().unwrap_or_default();
            let log_file = config.output_dir().join(format!("log_{}.log", identifier));
            logging::init_tracing(level(cli.verbose, config.run.log_level), Some(&log_file))?;
            if args.config_file.is_none() {
                warn!("No configuration file found; using defaults");
            }

            let interrupt = InterruptFlag::new();
            interrupt.listen_for_ctrl_c();

            let report = commands::run::run(&config, &interrupt)
                .with_context(|| format!("run {} failed", identifier))?;
            if report.interrupted {
                info!(identifier = %report.identifier, "Stopped early; rerun with a new identifier to continue");
            }
            Ok(())
        }
        Commands::Cases => {
            let config = build_config(&args).context("failed to load configuration")?;
            logging::init_tracing(level(cli.verbose, config.run.log_level), None)?;
            commands::cases::run(&config)?;
            Ok(())
        }
        Commands::Check => {
            let config = build_config(&args).context("failed to load configuration")?;
            logging::init_tracing(level(cli.verbose, config.run.log_level), None)?;
            commands::check::run(&config)?;
            Ok(())
        }
        Commands::Summarise {
            partons,
            pt_min,
            pt_max,
            bins,
            orders,
            output,
        } => {
            logging::init_tracing(level(cli.verbose, LogLevel::Info), None)?;
            let options = commands::summarise::SummaryOptions {
                pt_min,
                pt_max,
                bins,
                orders,
            };
            commands::summarise::run(&partons, &options, output.as_deref())
                .context("failed to summarise parton tables")?;
            Ok(())
        }
    }
}
