//! Time evolution of partons through the medium.
//!
//! An [`Evolver`] advances a [`ParticleRecord`] in steps, applying the
//! momentum kicks enabled by [`EvolutionFlags`], until the parton leaves the
//! medium or the medium ends. The parton is mutated in place; the returned
//! [`EvolutionOutput`] summarises what happened.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::medium::Medium;
use crate::rng::JetRng;
use crate::types::{ParticleError, ParticleRecord};

/// Errors raised by an evolution integrator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvolutionError {
    /// Evolution finished in a state that cannot be fragmented.
    #[error("Invalid final state: {0}")]
    InvalidFinalState(String),

    /// A step was requested with invalid parameters.
    #[error("Invalid evolution step: {0}")]
    InvalidStep(String),

    /// A kinematic update broke a particle invariant.
    #[error(transparent)]
    Particle(#[from] ParticleError),
}

/// Energy-loss model toggles passed to the integrator for one case.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionFlags {
    /// Radiative (elastic-coupling) energy loss.
    pub elastic: bool,
    /// Collisional energy loss.
    pub collisional: bool,
    /// Momentum-space drift along the flow.
    pub drift: bool,
    /// Medium-gradient corrections.
    pub gradient: bool,
    /// Strength multiplier applied to the drift kick.
    pub drift_multiplier: f64,
    /// Coupling constant selected for this case.
    pub coupling: f64,
    /// Record the step-by-step trajectory.
    pub record_trajectory: bool,
}

impl Default for EvolutionFlags {
    fn default() -> Self {
        Self {
            elastic: true,
            collisional: false,
            drift: false,
            gradient: false,
            drift_multiplier: 1.0,
            coupling: 1.8,
            record_trajectory: false,
        }
    }
}

/// Parton state at one integration step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Proper time.
    pub tau: f64,
    /// x position.
    pub x: f64,
    /// y position.
    pub y: f64,
    /// x momentum.
    pub px: f64,
    /// y momentum.
    pub py: f64,
    /// Local temperature.
    pub temperature: f64,
}

/// Coordinate time series of one evolved parton.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Tag of the parton the trajectory belongs to.
    pub tag: u64,
    /// Points in increasing proper time.
    pub points: Vec<TrajectoryPoint>,
}

/// Summary of one parton's evolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionSummary {
    /// Final transverse momentum.
    pub pt_f: f64,
    /// Final azimuth on `[0, 2π)`.
    pub phi_f: f64,
    /// Final x position.
    pub x_f: f64,
    /// Final y position.
    pub y_f: f64,
    /// Proper time at which evolution stopped.
    pub tau_f: f64,
    /// Time spent above the critical temperature.
    pub time_plasma: f64,
    /// Time spent in the medium below the critical temperature.
    pub time_hadron_gas: f64,
    /// Path length travelled through the medium.
    pub path_length: f64,
    /// Highest temperature encountered.
    pub max_temperature: f64,
    /// Total radiative momentum loss.
    pub q_el: f64,
    /// Total collisional momentum loss.
    pub q_col: f64,
    /// Total drift momentum (perpendicular).
    pub q_drift: f64,
    /// Total gradient momentum (perpendicular).
    pub q_grad: f64,
    /// The parton lost all of its momentum to the medium.
    pub absorbed: bool,
}

impl EvolutionSummary {
    /// Summary of a parton that was not evolved (final state equals initial
    /// state), stopping at proper time `tau`.
    pub fn from_parton(parton: &ParticleRecord, tau: f64) -> Self {
        let (pt_f, phi_f) = parton.polar_momentum();
        let (x_f, y_f) = parton.coords();
        Self {
            pt_f,
            phi_f,
            x_f,
            y_f,
            tau_f: tau,
            ..Self::default()
        }
    }
}

/// Integrator output for one parton.
#[derive(Clone, Debug, PartialEq)]
pub struct EvolutionOutput {
    /// Summary quantities.
    pub summary: EvolutionSummary,
    /// Step-by-step record when requested.
    pub trajectory: Option<Trajectory>,
}

/// Time-evolution integrator.
pub trait Evolver {
    /// Evolves `parton` through `medium` with the given toggles.
    ///
    /// # Errors
    ///
    /// Any error fails the current draw; the orchestrator does not retry.
    fn evolve<M: Medium + ?Sized>(
        &self,
        medium: &M,
        parton: &mut ParticleRecord,
        flags: &EvolutionFlags,
        rng: &mut JetRng,
    ) -> Result<EvolutionOutput, EvolutionError>;
}
