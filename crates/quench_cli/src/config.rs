//! Run configuration management
//!
//! Loads the run configuration from a TOML file, environment variables and
//! command-line overrides. Every field has a default, so an empty file (or no
//! file at all) describes a valid run.
//!
//! ```toml
//! [run]
//! num_events = 10
//! samples = 50
//! seed = 1234
//!
//! [jet]
//! pt_hat_min = 20.0
//! process = "dijet"
//!
//! [mode]
//! hadronise = true
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use quench_core::types::ConfigurationError;
use quench_engine::cases::{CaseMatrix, Couplings, PhysicsCase, DRIFT_MULTIPLIERS};
use quench_engine::hadronise::RetrierConfig;
use quench_engine::orchestrator::{OrchestratorConfig, DEFAULT_NUM_PHI};
use quench_engine::sampler::SamplerConfig;
use quench_models::evolution::StepParams;
use quench_models::fragmentation::{BetaFragmentation, BetaShape};
use quench_models::generator::ToyGeneratorParams;
use quench_models::hadroniser::StringHadroniserParams;
use quench_models::medium::GlauberParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of rows per output part.
pub const DEFAULT_PART_SIZE: usize = 10_000;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error(transparent)]
    Model(#[from] ConfigurationError),
}

/// Log levels accepted by the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// `[run]`: size, seeding and output of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    /// Number of media (collision events) to generate; zero generates events
    /// until the run is interrupted.
    pub num_events: usize,
    /// Scattering draws per event.
    #[serde(rename = "samples", alias = "num_oversample")]
    pub num_oversample: usize,
    /// Master seed; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Run identifier; generated when absent.
    pub identifier: Option<String>,
    /// Directory under which `<identifier>/` is created.
    pub results_dir: PathBuf,
    /// Parton rows per output part before a new part starts.
    pub part_size: usize,
    /// Events simulated in parallel.
    pub workers: usize,
    /// Log level.
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            num_events: 1,
            num_oversample: 10,
            seed: None,
            identifier: None,
            results_dir: PathBuf::from("results"),
            part_size: DEFAULT_PART_SIZE,
            workers: 1,
            log_level: LogLevel::Info,
        }
    }
}

/// `[mode]`: pipeline switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeSection {
    /// Sample production points from the medium instead of the origin.
    pub vary_point: bool,
    /// Hadronise every run.
    pub hadronise: bool,
    /// Keep per-parton trajectories.
    pub keep_trajectories: bool,
    /// Azimuthal offsets per draw (odd).
    pub num_phi: usize,
    /// Drift-strength multipliers for the cases with drift.
    pub drift_multipliers: Vec<f64>,
}

impl Default for ModeSection {
    fn default() -> Self {
        Self {
            vary_point: true,
            hadronise: false,
            keep_trajectories: false,
            num_phi: DEFAULT_NUM_PHI,
            drift_multipliers: DRIFT_MULTIPLIERS.to_vec(),
        }
    }
}

/// `[fragmentation]`: Beta shapes and lower cut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentationSection {
    /// Lower clamp on sampled fractions.
    pub z_min: f64,
    /// Quark shape.
    pub quark: BetaShape,
    /// Gluon shape.
    pub gluon: BetaShape,
}

impl Default for FragmentationSection {
    fn default() -> Self {
        Self {
            z_min: 1e-3,
            quark: BetaFragmentation::QUARK_SHAPE,
            gluon: BetaFragmentation::GLUON_SHAPE,
        }
    }
}

impl FragmentationSection {
    /// Builds the sampler.
    pub fn sampler(&self) -> Result<BetaFragmentation, ConfigurationError> {
        BetaFragmentation::new(self.quark, self.gluon, self.z_min)
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Run size and output.
    pub run: RunSection,
    /// Hard-process sampling.
    pub jet: SamplerConfig,
    /// Pipeline switches.
    pub mode: ModeSection,
    /// Hadronisation retry budget and hadron cuts.
    pub hadronisation: RetrierConfig,
    /// Coupling constants.
    pub constants: Couplings,
    /// Glauber medium.
    pub medium: GlauberParams,
    /// Energy-loss integrator.
    pub evolution: StepParams,
    /// Fragmentation sampler.
    pub fragmentation: FragmentationSection,
    /// Reference hard-process generator.
    pub generator: ToyGeneratorParams,
    /// Reference hadroniser.
    pub hadroniser: StringHadroniserParams,
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `QUENCH_*` overrides read through `lookup`.
    ///
    /// Unset variables leave the current value in place.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("QUENCH_NUM_EVENTS") {
            self.run.num_events = parse_env("QUENCH_NUM_EVENTS", &value)?;
        }
        if let Some(value) = lookup("QUENCH_SAMPLES") {
            self.run.num_oversample = parse_env("QUENCH_SAMPLES", &value)?;
        }
        if let Some(value) = lookup("QUENCH_SEED") {
            self.run.seed = Some(parse_env("QUENCH_SEED", &value)?);
        }
        if let Some(value) = lookup("QUENCH_RESULTS_DIR") {
            self.run.results_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("QUENCH_LOG_LEVEL") {
            self.run.log_level = LogLevel::from_str(&value)?;
        }
        if let Some(value) = lookup("QUENCH_WORKERS") {
            self.run.workers = parse_env("QUENCH_WORKERS", &value)?;
        }
        Ok(())
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(num_events) = cli.num_events {
            self.run.num_events = num_events;
        }
        if let Some(samples) = cli.num_oversample {
            self.run.num_oversample = samples;
        }
        if let Some(seed) = cli.seed {
            self.run.seed = Some(seed);
        }
        if let Some(identifier) = &cli.identifier {
            self.run.identifier = Some(identifier.clone());
        }
        if let Some(results_dir) = &cli.results_dir {
            self.run.results_dir = results_dir.clone();
        }
        if let Some(workers) = cli.workers {
            self.run.workers = workers;
        }
        if let Some(log_level) = &cli.log_level {
            self.run.log_level = LogLevel::from_str(log_level)?;
        }
        if cli.hadronise {
            self.mode.hadronise = true;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("samples", self.run.num_oversample),
            ("part_size", self.run.part_size),
            ("workers", self.run.workers),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    name,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(identifier) = &self.run.identifier {
            if identifier.is_empty() || identifier.contains(['/', '\\']) {
                return Err(ConfigError::InvalidValue {
                    name: "identifier",
                    reason: format!("'{}' is not a valid directory name", identifier),
                });
            }
        }

        self.orchestrator_config()?;
        self.medium.validate()?;
        self.evolution.validate()?;
        self.generator.validate()?;
        self.hadroniser.validate()?;
        self.fragmentation.sampler()?;
        Ok(())
    }

    /// Engine configuration for one orchestrator.
    pub fn orchestrator_config(&self) -> Result<OrchestratorConfig, ConfigurationError> {
        OrchestratorConfig::builder()
            .num_phi(self.mode.num_phi)
            .vary_point(self.mode.vary_point)
            .hadronise(self.mode.hadronise)
            .keep_trajectories(self.mode.keep_trajectories)
            .couplings(self.constants)
            .sampler(self.jet)
            .retrier(self.hadronisation)
            .case_matrix(self.case_matrix()?)
            .build()
    }

    /// The standard cases expanded over the configured drift multipliers.
    pub fn case_matrix(&self) -> Result<CaseMatrix, ConfigurationError> {
        CaseMatrix::new(PhysicsCase::STANDARD.to_vec(), self.mode.drift_multipliers.clone())
    }

    /// Directory holding this run's output files.
    ///
    /// Falls back to `results_dir` itself until an identifier is set.
    pub fn output_dir(&self) -> PathBuf {
        match &self.run.identifier {
            Some(identifier) => self.run.results_dir.join(identifier),
            None => self.run.results_dir.clone(),
        }
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::EnvError(format!("{}={}: {}", key, value, e)))
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Event count override
    pub num_events: Option<usize>,
    /// Draws-per-event override
    pub num_oversample: Option<usize>,
    /// Seed override
    pub seed: Option<u64>,
    /// Identifier override
    pub identifier: Option<String>,
    /// Results directory override
    pub results_dir: Option<PathBuf>,
    /// Worker count override
    pub workers: Option<usize>,
    /// Log level override
    pub log_level: Option<String>,
    /// Force hadronisation on
    pub hadronise: bool,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<RunConfig, ConfigError> {
    build_config_with(cli, |key| std::env::var(key).ok())
}

/// [`build_config`] with an explicit environment lookup.
pub fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<RunConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };

    config.apply_env_with(lookup)?;
    config.merge_with_cli(cli)?;

    config.validate()?;
    Ok(config)
}
