//! Fragmentation momentum fractions.

use thiserror::Error;

use crate::rng::JetRng;
use crate::types::{Flavour, ParticleRecord};

/// Errors raised by fragmentation samplers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FragmentationError {
    /// No fragmentation function for this flavour.
    #[error("No fragmentation function for flavour {0}")]
    UnsupportedFlavour(Flavour),

    /// Distribution shape parameters are invalid.
    #[error("Invalid fragmentation shape ({alpha}, {beta})")]
    InvalidShape {
        /// First shape parameter.
        alpha: f64,
        /// Second shape parameter.
        beta: f64,
    },

    /// The sampler produced a fraction outside `(0, 1]`.
    #[error("Momentum fraction {0} outside (0, 1]")]
    InvalidFraction(f64),
}

/// Samples the hadron momentum fraction `z` of a parton.
pub trait FragmentationSampler {
    /// Returns a fraction in `(0, 1]` for `parton` in its current state.
    fn sample_z(&self, parton: &ParticleRecord, rng: &mut JetRng)
        -> Result<f64, FragmentationError>;
}
