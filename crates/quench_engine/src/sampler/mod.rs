//! Hard-process sampling with accept/reject.
//!
//! [`HardProcessSampler`] asks an [`EventGenerator`] for trial events and
//! keeps the first one whose leading pair passes [`AcceptanceCuts`]. The
//! trial budget is bounded; exhausting it is an error for the draw.

mod acceptance;

pub use acceptance::{leading_pair, AcceptanceCuts, Rejection};

use std::collections::HashMap;

use quench_core::traits::{EventGenerator, GeneratorRequest, ProcessType};
use quench_core::types::{ConfigurationError, EventEntry, Flavour};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;

/// Default trial budget per draw.
pub const DEFAULT_MAX_TRIALS: usize = 1000;

/// Sampler settings for one run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Lower edge of the hard momentum transfer (GeV).
    pub pt_hat_min: f64,
    /// Upper edge of the hard momentum transfer (GeV).
    pub pt_hat_max: f64,
    /// Process type.
    pub process: ProcessType,
    /// Rapidity acceptance `|y| <` window.
    pub rapidity_window: f64,
    /// Momentum-imbalance tolerance.
    pub balance_tolerance: f64,
    /// Minimum pT of each leading particle (GeV).
    pub min_pt: f64,
    /// Trial budget.
    pub max_trials: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            pt_hat_min: 5.0,
            pt_hat_max: 100.0,
            process: ProcessType::Dijet,
            rapidity_window: 0.5,
            balance_tolerance: 0.1,
            min_pt: 1.0,
            max_trials: DEFAULT_MAX_TRIALS,
        }
    }
}

impl SamplerConfig {
    /// Checks ranges and the trial budget.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.pt_hat_min.is_finite() && self.pt_hat_min > 0.0) {
            return Err(ConfigurationError::invalid(
                "pt_hat_min",
                format!("must be positive, got {}", self.pt_hat_min),
            ));
        }
        if !(self.pt_hat_max.is_finite() && self.pt_hat_max > self.pt_hat_min) {
            return Err(ConfigurationError::invalid(
                "pt_hat_max",
                format!(
                    "must exceed pt_hat_min ({}), got {}",
                    self.pt_hat_min, self.pt_hat_max
                ),
            ));
        }
        if !(self.rapidity_window > 0.0) {
            return Err(ConfigurationError::invalid(
                "rapidity_window",
                format!("must be positive, got {}", self.rapidity_window),
            ));
        }
        if !(self.balance_tolerance > 0.0 && self.balance_tolerance <= 1.0) {
            return Err(ConfigurationError::invalid(
                "balance_tolerance",
                format!("must lie in (0, 1], got {}", self.balance_tolerance),
            ));
        }
        if !(self.min_pt.is_finite() && self.min_pt >= 0.0) {
            return Err(ConfigurationError::invalid(
                "min_pt",
                format!("must be non-negative, got {}", self.min_pt),
            ));
        }
        if self.max_trials == 0 {
            return Err(ConfigurationError::invalid("max_trials", "must be at least 1"));
        }
        Ok(())
    }

    /// Request forwarded to the generator service.
    pub fn request(&self) -> GeneratorRequest {
        GeneratorRequest {
            pt_hat_min: self.pt_hat_min,
            pt_hat_max: self.pt_hat_max,
            process: self.process,
            rapidity_window: self.rapidity_window,
            balance_tolerance: self.balance_tolerance,
        }
    }

    /// Cuts applied to each trial.
    pub fn cuts(&self) -> AcceptanceCuts {
        AcceptanceCuts {
            process: self.process,
            min_pt: self.min_pt,
            rapidity_window: self.rapidity_window,
            balance_tolerance: self.balance_tolerance,
        }
    }
}

/// Accepted hard process: the leading pair, highest pT first.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatteringResult {
    /// Leading and subleading entries as returned by the generator.
    pub particles: [EventEntry; 2],
    /// Flavours of the pair.
    pub flavours: [Flavour; 2],
    /// Event statistical weight.
    pub weight: f64,
    /// Hard-process energy scale (GeV).
    pub hard_scale: f64,
    /// Trials used, including the accepted one.
    pub trials: usize,
}

impl ScatteringResult {
    /// Rapidities of the pair.
    pub fn rapidities(&self) -> [f64; 2] {
        [self.particles[0].rapidity(), self.particles[1].rapidity()]
    }

    /// Returns `true` if either particle is a photon.
    pub fn has_photon(&self) -> bool {
        self.flavours.iter().any(|f| f.is_photon())
    }
}

/// Accept/reject driver around a generator service.
///
/// The sampler owns its generator; one instance must not be shared
/// across threads.
#[derive(Debug)]
pub struct HardProcessSampler<G> {
    generator: G,
}

impl<G: EventGenerator> HardProcessSampler<G> {
    /// Wraps a generator.
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Mutable access to the wrapped generator.
    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    /// Unwraps the generator.
    pub fn into_inner(self) -> G {
        self.generator
    }

    /// Draws trials until one passes the cuts.
    ///
    /// A trial the generator vetoes (`Ok(None)`) counts against the budget.
    ///
    /// # Errors
    ///
    /// - [`EngineError::SamplingExhausted`] when `max_trials` trials fail
    /// - [`EngineError::Generator`] when the service itself fails
    pub fn sample(&mut self, config: &SamplerConfig) -> Result<ScatteringResult, EngineError> {
        let request = config.request();
        let cuts = config.cuts();
        let mut rejections: HashMap<Rejection, usize> = HashMap::new();
        let mut vetoed = 0usize;

        for trial in 1..=config.max_trials {
            let Some(event) = self.generator.next_trial(&request)? else {
                vetoed += 1;
                continue;
            };

            match cuts.evaluate(&event.entries) {
                Ok(([lead, sub], flavours)) => {
                    let particles = [event.entries[lead].clone(), event.entries[sub].clone()];
                    return Ok(ScatteringResult {
                        particles,
                        flavours,
                        weight: event.weight,
                        hard_scale: event.hard_scale,
                        trials: trial,
                    });
                }
                Err(rejection) => *rejections.entry(rejection).or_default() += 1,
            }
        }

        debug!(
            trials = config.max_trials,
            vetoed,
            rejections = ?rejections,
            "Hard-process trial budget exhausted"
        );
        Err(EngineError::SamplingExhausted {
            trials: config.max_trials,
        })
    }
}
