//! Engine error taxonomy.
//!
//! Every failure inside one scattering draw is an [`EngineError`]. The
//! orchestrator isolates draw-level failures and counts them by
//! [`EngineError::kind`]; only [`EngineError::Configuration`] escapes an
//! event.

use quench_core::traits::{GeneratorError, HadronisationError, MediumError};
use quench_core::types::ConfigurationError;
use thiserror::Error;

/// Errors raised while sampling, evolving or hadronising one draw.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The hard-process sampler used its full trial budget.
    #[error("Hard-process sampling exhausted after {trials} trials")]
    SamplingExhausted {
        /// Number of trials attempted
        trials: usize,
    },

    /// The evolution integrator or a fragmentation sampler failed.
    #[error("Integration failure during {stage}: {message}")]
    IntegrationFailure {
        /// Pipeline stage that failed
        stage: &'static str,
        /// Collaborator error message
        message: String,
    },

    /// A sampled particle could not be turned into a parton record.
    #[error("Invalid particle: {message}")]
    InvalidParticle {
        /// Description of the malformed data
        message: String,
    },

    /// Malformed configuration or flavour mapping. Fatal.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The event generator service failed.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// The hadronisation service failed in a non-retryable way.
    #[error("Hadronisation error: {0}")]
    Hadronisation(#[from] HadronisationError),

    /// The medium could not be built or sampled.
    #[error("Medium error: {0}")]
    Medium(#[from] MediumError),

    /// A colourless particle was submitted for colour assignment.
    #[error("Particle with PDG id {pdg_id} carries no colour")]
    UncolouredParton {
        /// PDG id of the offending particle
        pdg_id: i32,
    },
}

impl EngineError {
    /// Stable label used in structured logs and failure counters.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::SamplingExhausted { .. } => "sampling_exhausted",
            EngineError::IntegrationFailure { .. } => "integration_failure",
            EngineError::InvalidParticle { .. } => "invalid_particle",
            EngineError::Configuration(_) => "configuration",
            EngineError::Generator(_) => "generator",
            EngineError::Hadronisation(_) => "hadronisation",
            EngineError::Medium(_) => "medium",
            EngineError::UncolouredParton { .. } => "uncoloured_parton",
        }
    }

    /// Returns `true` for errors that must abort the run instead of the
    /// current draw.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Configuration(_))
    }

    pub(crate) fn integration(stage: &'static str, err: impl std::fmt::Display) -> Self {
        EngineError::IntegrationFailure {
            stage,
            message: err.to_string(),
        }
    }
}
