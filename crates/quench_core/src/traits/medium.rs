//! Medium geometry and field queries.
//!
//! Positions are transverse coordinates in fm, times are proper times in
//! fm/c and temperatures are in GeV.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::JetRng;

/// Errors raised by medium providers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MediumError {
    /// Impact parameter outside the provider's supported range.
    #[error("Impact parameter {value} fm outside [0, {max}] fm")]
    InvalidImpactParameter {
        /// Requested impact parameter.
        value: f64,
        /// Largest supported impact parameter.
        max: f64,
    },

    /// The overlap region has no support (e.g. nuclei do not touch).
    #[error("Empty overlap region at impact parameter {0} fm")]
    EmptyOverlap(f64),

    /// Production-point sampling did not converge.
    #[error("Production point sampling failed after {attempts} attempts")]
    SamplingFailed {
        /// Number of rejected proposals.
        attempts: usize,
    },

    /// Invalid medium construction parameters.
    #[error("Invalid medium parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        reason: String,
    },
}

/// Event-level medium observables, merged into every parton row of the
/// event as constant columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventObservables {
    /// Impact parameter in fm.
    pub impact_parameter: f64,
    /// Second-order participant eccentricity.
    pub eccentricity_2: f64,
    /// Second-order participant-plane angle.
    pub psi_2: f64,
    /// Third-order participant eccentricity.
    pub eccentricity_3: f64,
    /// Third-order participant-plane angle.
    pub psi_3: f64,
    /// Total initial entropy proxy (integrated density).
    pub total_entropy: f64,
    /// Peak temperature at formation time, in GeV.
    pub max_temperature: f64,
}

/// One collision's medium.
///
/// Field queries outside the medium return zero temperature and zero flow.
pub trait Medium {
    /// Local temperature at `(x, y)` at proper time `tau`.
    fn temperature(&self, tau: f64, x: f64, y: f64) -> f64;

    /// Transverse temperature gradient `(∂T/∂x, ∂T/∂y)`.
    fn temperature_gradient(&self, tau: f64, x: f64, y: f64) -> (f64, f64);

    /// Transverse flow velocity `(u_x, u_y)`, each in units of c.
    fn flow_velocity(&self, tau: f64, x: f64, y: f64) -> (f64, f64);

    /// Proper time at which the medium forms and evolution starts.
    fn formation_time(&self) -> f64;

    /// Proper time after which the medium is no longer tracked.
    fn end_time(&self) -> f64;

    /// Deconfinement temperature separating plasma and hadron gas.
    fn critical_temperature(&self) -> f64;

    /// Samples a hard-process production point `(x, y)`.
    fn sample_production_point(&self, rng: &mut JetRng) -> Result<(f64, f64), MediumError>;

    /// Event-level observables of this medium.
    fn observables(&self) -> EventObservables;
}

/// Builds one [`Medium`] per collision.
pub trait MediumProvider {
    /// Medium type produced.
    type Medium: Medium;

    /// Largest impact parameter the provider supports, in fm.
    fn max_impact_parameter(&self) -> f64;

    /// Builds the medium for impact parameter `b`.
    fn create(&self, b: f64) -> Result<Self::Medium, MediumError>;
}
