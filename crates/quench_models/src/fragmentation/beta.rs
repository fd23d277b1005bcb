//! Beta-distribution fragmentation.
//!
//! The leading-hadron momentum fraction is drawn from `Beta(a, b)` with
//! separate shapes for quarks and gluons (gluon fragmentation is softer).
//! Photons do not fragment and always return `z = 1`.

use quench_core::rng::JetRng;
use quench_core::traits::{FragmentationError, FragmentationSampler};
use quench_core::types::{ConfigurationError, ParticleRecord};
use rand_distr::Beta;
use serde::{Deserialize, Serialize};

/// Shape parameters of a Beta distribution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetaShape {
    /// First shape parameter.
    pub alpha: f64,
    /// Second shape parameter.
    pub beta: f64,
}

impl BetaShape {
    /// Mean `a / (a + b)`.
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    fn distribution(&self) -> Result<Beta<f64>, FragmentationError> {
        Beta::new(self.alpha, self.beta).map_err(|_| FragmentationError::InvalidShape {
            alpha: self.alpha,
            beta: self.beta,
        })
    }
}

/// Beta-distribution fragmentation sampler.
#[derive(Clone, Debug)]
pub struct BetaFragmentation {
    quark: BetaShape,
    gluon: BetaShape,
    z_min: f64,
}

impl BetaFragmentation {
    /// Default quark shape (mean 1/3).
    pub const QUARK_SHAPE: BetaShape = BetaShape {
        alpha: 2.0,
        beta: 4.0,
    };

    /// Default gluon shape (mean ≈ 0.24).
    pub const GLUON_SHAPE: BetaShape = BetaShape {
        alpha: 1.6,
        beta: 5.0,
    };

    /// Creates a sampler. Draws below `z_min` are raised to `z_min`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidParameter`] for non-positive
    /// shapes or `z_min` outside `(0, 1]`.
    pub fn new(quark: BetaShape, gluon: BetaShape, z_min: f64) -> Result<Self, ConfigurationError> {
        if !(z_min > 0.0 && z_min <= 1.0) {
            return Err(ConfigurationError::invalid(
                "z_min",
                format!("must lie in (0, 1], got {}", z_min),
            ));
        }
        for (name, shape) in [("quark_shape", quark), ("gluon_shape", gluon)] {
            if shape.distribution().is_err() {
                return Err(ConfigurationError::invalid(
                    name,
                    format!("shape parameters must be positive, got ({}, {})", shape.alpha, shape.beta),
                ));
            }
        }
        Ok(Self {
            quark,
            gluon,
            z_min,
        })
    }
}

impl Default for BetaFragmentation {
    fn default() -> Self {
        Self {
            quark: Self::QUARK_SHAPE,
            gluon: Self::GLUON_SHAPE,
            z_min: 1e-3,
        }
    }
}

impl FragmentationSampler for BetaFragmentation {
    fn sample_z(
        &self,
        parton: &ParticleRecord,
        rng: &mut JetRng,
    ) -> Result<f64, FragmentationError> {
        let flavour = parton.flavour();
        if flavour.is_photon() {
            return Ok(1.0);
        }
        let shape = if flavour.is_quark() {
            self.quark
        } else {
            self.gluon
        };
        let z = rng.sample(&shape.distribution()?);

        if !z.is_finite() || z > 1.0 {
            return Err(FragmentationError::InvalidFraction(z));
        }
        Ok(z.max(self.z_min))
    }
}
