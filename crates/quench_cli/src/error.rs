//! Error types for the quench binary.

use quench_core::types::ConfigurationError;
use quench_engine::EngineError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the `quench` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A model or engine parameter was rejected.
    #[error("Invalid model configuration: {0}")]
    Model(#[from] ConfigurationError),

    /// The engine aborted the run.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Command-line argument is invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration copy could not be encoded.
    #[error("TOML encoding error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Worker pool or logging set-up failed.
    #[error("Runtime set-up failed: {0}")]
    Setup(String),
}

/// Result alias for the binary.
pub type Result<T> = std::result::Result<T, CliError>;
