//! Hard-process event generator service contract.
//!
//! The generator produces complete trial events; the engine's sampler scans
//! them for the two leading partons and applies the acceptance cuts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ConfigurationError, EventEntry};

/// Hard-process type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    /// QCD 2 → 2 scattering with two outgoing partons.
    Dijet,
    /// Prompt photon plus one recoiling parton.
    GammaJet,
}

impl ProcessType {
    /// Configuration label.
    pub const fn label(self) -> &'static str {
        match self {
            ProcessType::Dijet => "dijet",
            ProcessType::GammaJet => "gamma_jet",
        }
    }
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProcessType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dijet" => Ok(ProcessType::Dijet),
            "gamma_jet" | "gammajet" | "gamma-jet" => Ok(ProcessType::GammaJet),
            other => Err(ConfigurationError::invalid(
                "process",
                format!("unknown process type '{}'", other),
            )),
        }
    }
}

/// Errors raised by the generator service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    /// The request cannot be served.
    #[error("Invalid generator request: {0}")]
    InvalidRequest(String),

    /// Internal service failure.
    #[error("Generator service failure: {0}")]
    Service(String),
}

/// Parameters of one hard-process trial.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorRequest {
    /// Lower bound of the hard momentum transfer, in GeV.
    pub pt_hat_min: f64,
    /// Upper bound of the hard momentum transfer, in GeV.
    pub pt_hat_max: f64,
    /// Process type.
    pub process: ProcessType,
    /// Rapidity acceptance `|y| < rapidity_window`.
    pub rapidity_window: f64,
    /// Fractional momentum imbalance tolerance between the leading partons.
    pub balance_tolerance: f64,
}

/// One trial event.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialEvent {
    /// Event record; outgoing particles have positive status.
    pub entries: Vec<EventEntry>,
    /// Differential event weight compensating the trial bias.
    pub weight: f64,
    /// Hard-process scale in GeV.
    pub hard_scale: f64,
}

/// Stateful hard-process generator.
pub trait EventGenerator {
    /// Produces one trial event.
    ///
    /// `Ok(None)` means the service vetoed the trial internally; the caller
    /// counts it as a failed trial.
    fn next_trial(&mut self, request: &GeneratorRequest)
        -> Result<Option<TrialEvent>, GeneratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_type_labels() {
        for process in [ProcessType::Dijet, ProcessType::GammaJet] {
            assert_eq!(process.label().parse::<ProcessType>().unwrap(), process);
        }
        assert!("higgs".parse::<ProcessType>().is_err());
    }
}
