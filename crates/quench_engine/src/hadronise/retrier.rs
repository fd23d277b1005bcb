//! Bounded retry loop around the hadronisation service.

use quench_core::rng::JetRng;
use quench_core::traits::Hadroniser;
use quench_core::types::{
    ConfigurationError, EventEntry, Flavour, FourMomentum, ParticleRecord, STATUS_HARD_OUTGOING,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::colour::{ColourAssignment, RemnantSlot};
use crate::error::EngineError;

/// Default attempt budget.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Longitudinal momentum of a beam remnant (GeV).
pub const REMNANT_PZ: f64 = 10_000.0;

const REMNANT_QUARKS: [(Flavour, f64); 2] = [(Flavour::Up, 2.0), (Flavour::Down, 1.0)];
const REMNANT_ANTIQUARKS: [(Flavour, f64); 2] = [(Flavour::AntiUp, 2.0), (Flavour::AntiDown, 1.0)];

/// Retry budget and hadron acceptance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrierConfig {
    /// Total attempts (successful plus failed) allowed.
    pub max_attempts: usize,
    /// Accepted hadrons satisfy `|y| <` this.
    pub max_rapidity: f64,
    /// Accepted hadrons satisfy `p_T >` this (GeV).
    pub min_pt: f64,
}

impl Default for RetrierConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_rapidity: 1.0,
            min_pt: 1.0,
        }
    }
}

impl RetrierConfig {
    /// Checks the budget and cuts.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_attempts == 0 {
            return Err(ConfigurationError::invalid("max_attempts", "must be at least 1"));
        }
        if !(self.max_rapidity > 0.0) {
            return Err(ConfigurationError::invalid(
                "max_rapidity",
                format!("must be positive, got {}", self.max_rapidity),
            ));
        }
        if !(self.min_pt.is_finite() && self.min_pt >= 0.0) {
            return Err(ConfigurationError::invalid(
                "min_pt",
                format!("must be non-negative, got {}", self.min_pt),
            ));
        }
        Ok(())
    }

    /// Returns `true` for a pion inside the acceptance.
    pub fn accepts(&self, hadron: &EventEntry) -> bool {
        hadron.is_final()
            && hadron.is_pion()
            && hadron.rapidity().abs() < self.max_rapidity
            && hadron.pt() > self.min_pt
    }
}

/// Result of one retry loop.
///
/// An empty outcome means the budget ran out; it is not an error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HadronisationOutcome {
    /// Accepted hadrons from the last successful attempt.
    pub hadrons: Vec<EventEntry>,
    /// Attempts the service completed.
    pub successes: usize,
    /// Attempts that failed the service's consistency checks.
    pub failures: usize,
    /// Pions seen in the last successful attempt, accepted or not.
    pub pions_seen: usize,
    /// Event weight passed in by the caller.
    pub weight: f64,
}

impl HadronisationOutcome {
    /// Total attempts.
    #[inline]
    pub fn attempts(&self) -> usize {
        self.successes + self.failures
    }

    /// Returns `true` when no hadron was accepted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hadrons.is_empty()
    }

    /// Default weight correction `1 / successes`, zero without a success.
    pub fn acceptance_weight(&self) -> f64 {
        if self.successes == 0 {
            0.0
        } else {
            1.0 / self.successes as f64
        }
    }
}

/// Retry driver owning one hadroniser instance.
#[derive(Debug)]
pub struct HadronisationRetrier<H> {
    hadroniser: H,
    config: RetrierConfig,
    rng: JetRng,
}

impl<H: Hadroniser> HadronisationRetrier<H> {
    /// Creates a retrier. `rng` draws remnant flavours.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for an invalid configuration.
    pub fn new(hadroniser: H, config: RetrierConfig, rng: JetRng) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            hadroniser,
            config,
            rng,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &RetrierConfig {
        &self.config
    }

    /// Mutable access to the wrapped hadroniser.
    pub fn hadroniser_mut(&mut self) -> &mut H {
        &mut self.hadroniser
    }

    /// Hadronises a colour-connected parton pair.
    ///
    /// Stops at the first successful attempt with at least one accepted
    /// pion, or when the budget is used up.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UncolouredParton`] if either parton has no colour
    /// - [`EngineError::Hadronisation`] for non-retryable service failures
    pub fn hadronise(
        &mut self,
        parton_a: &ParticleRecord,
        parton_b: &ParticleRecord,
        hard_scale: f64,
        weight: f64,
    ) -> Result<HadronisationOutcome, EngineError> {
        let assignment = ColourAssignment::for_pair(parton_a.flavour(), parton_b.flavour())?;
        let mut outcome = HadronisationOutcome {
            weight,
            ..HadronisationOutcome::default()
        };

        while outcome.attempts() < self.config.max_attempts {
            let system = self.build_system(&assignment, [parton_a, parton_b], hard_scale);
            let record = match self.hadroniser.hadronise(&system) {
                Ok(record) => record,
                Err(err) if err.is_retryable() => {
                    trace!(error = %err, "Hadronisation attempt failed");
                    outcome.failures += 1;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            outcome.successes += 1;
            outcome.pions_seen = record.iter().filter(|h| h.is_final() && h.is_pion()).count();
            outcome.hadrons = record.into_iter().filter(|h| self.config.accepts(h)).collect();
            if !outcome.is_empty() {
                break;
            }
        }

        if outcome.is_empty() {
            debug!(
                successes = outcome.successes,
                failures = outcome.failures,
                "Hadronisation budget exhausted without an accepted hadron"
            );
        }
        Ok(outcome)
    }

    fn build_system(
        &mut self,
        assignment: &ColourAssignment,
        partons: [&ParticleRecord; 2],
        hard_scale: f64,
    ) -> Vec<EventEntry> {
        let mut system = Vec::with_capacity(2 + assignment.remnants.len());
        for (parton, tags) in partons.iter().zip(assignment.partons.iter()) {
            system.push(EventEntry {
                pdg_id: parton.pdg_id(),
                status: STATUS_HARD_OUTGOING,
                colour: tags.colour,
                anticolour: tags.anticolour,
                momentum: parton.four_momentum(),
                mass: parton.mass(),
                scale: hard_scale,
            });
        }
        for slot in &assignment.remnants {
            system.push(self.remnant(slot, hard_scale));
        }
        system
    }

    fn remnant(&mut self, slot: &RemnantSlot, hard_scale: f64) -> EventEntry {
        let choices = if slot.tags.colour != 0 {
            &REMNANT_QUARKS
        } else {
            &REMNANT_ANTIQUARKS
        };
        let flavour = self.rng.choose_weighted(choices).unwrap_or(choices[0].0);
        let mass = flavour.mass();
        EventEntry {
            pdg_id: flavour.pdg_id(),
            status: STATUS_HARD_OUTGOING,
            colour: slot.tags.colour,
            anticolour: slot.tags.anticolour,
            momentum: FourMomentum::on_shell(0.0, 0.0, slot.direction.sign() * REMNANT_PZ, mass),
            mass,
            scale: hard_scale,
        }
    }
}
