//! Parton records propagated through the medium.
//!
//! A [`ParticleRecord`] holds identity (flavour, tag, ordinal), production
//! bookkeeping (weights, initial point and angle) and the mutable transverse
//! kinematics. Identity and mass are fixed at construction; the momentum
//! changes only through the kick methods and the position only through
//! [`ParticleRecord::propagate`].
//!
//! # Units
//!
//! Momenta in GeV, positions in fm, times in fm/c.

use std::f64::consts::FRAC_PI_2;

use super::error::{ConfigurationError, ParticleError};
use super::flavour::Flavour;
use super::four_vector::FourMomentum;
use crate::math::angles::azimuth;

/// A generated parton.
///
/// # Examples
///
/// ```
/// use quench_core::types::{Flavour, ParticleRecord};
///
/// let mut parton = ParticleRecord::new(Flavour::Gluon, 10.0, 0.0, (0.0, 0.0))
///     .unwrap()
///     .with_tag(42)
///     .with_weight(0.5);
///
/// assert_eq!(parton.beta(), 1.0); // massless
/// assert_eq!(parton.medium_weight(), 0.5); // defaults to the production weight
///
/// parton.propagate(2.0).unwrap();
/// assert_eq!(parton.coords(), (2.0, 0.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleRecord {
    flavour: Flavour,
    tag: u64,
    index: usize,
    weight: f64,
    medium_weight: Option<f64>,
    pt_0: f64,
    phi_0: f64,
    x_0: f64,
    y_0: f64,
    px: f64,
    py: f64,
    x: f64,
    y: f64,
}

impl ParticleRecord {
    /// Creates a parton with transverse momentum `pt_0` along azimuth
    /// `phi_0`, produced at `origin`.
    ///
    /// Tag and index default to zero and the production weight to one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidParameter`] if the momentum is
    /// negative or any input is non-finite.
    pub fn new(
        flavour: Flavour,
        pt_0: f64,
        phi_0: f64,
        origin: (f64, f64),
    ) -> Result<Self, ConfigurationError> {
        if !pt_0.is_finite() || pt_0 < 0.0 {
            return Err(ConfigurationError::invalid(
                "pt_0",
                format!("must be finite and non-negative, got {}", pt_0),
            ));
        }
        if !phi_0.is_finite() {
            return Err(ConfigurationError::invalid("phi_0", "must be finite"));
        }
        if !origin.0.is_finite() || !origin.1.is_finite() {
            return Err(ConfigurationError::invalid(
                "origin",
                "production point must be finite",
            ));
        }

        Ok(Self {
            flavour,
            tag: 0,
            index: 0,
            weight: 1.0,
            medium_weight: None,
            pt_0,
            phi_0,
            x_0: origin.0,
            y_0: origin.1,
            px: pt_0 * phi_0.cos(),
            py: pt_0 * phi_0.sin(),
            x: origin.0,
            y: origin.1,
        })
    }

    /// Sets the unique tag.
    pub fn with_tag(mut self, tag: u64) -> Self {
        self.tag = tag;
        self
    }

    /// Sets the ordinal index within the scattering process.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Sets the production weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the medium-modification weight.
    pub fn with_medium_weight(mut self, medium_weight: f64) -> Self {
        self.medium_weight = Some(medium_weight);
        self
    }

    /// Flavour.
    #[inline]
    pub fn flavour(&self) -> Flavour {
        self.flavour
    }

    /// Signed PDG id from the flavour table.
    #[inline]
    pub fn pdg_id(&self) -> i32 {
        self.flavour.pdg_id()
    }

    /// Rest mass from the flavour table.
    #[inline]
    pub fn mass(&self) -> f64 {
        self.flavour.mass()
    }

    /// Unique tag.
    #[inline]
    pub fn tag(&self) -> u64 {
        self.tag
    }

    /// Ordinal index within the scattering process.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Production weight.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Medium-modification weight; the production weight unless set.
    #[inline]
    pub fn medium_weight(&self) -> f64 {
        self.medium_weight.unwrap_or(self.weight)
    }

    /// Initial transverse momentum.
    #[inline]
    pub fn initial_pt(&self) -> f64 {
        self.pt_0
    }

    /// Initial azimuth as given at construction.
    #[inline]
    pub fn initial_phi(&self) -> f64 {
        self.phi_0
    }

    /// Production point.
    #[inline]
    pub fn initial_coords(&self) -> (f64, f64) {
        (self.x_0, self.y_0)
    }

    /// Current x momentum.
    #[inline]
    pub fn px(&self) -> f64 {
        self.px
    }

    /// Current y momentum.
    #[inline]
    pub fn py(&self) -> f64 {
        self.py
    }

    /// Current transverse momentum magnitude.
    #[inline]
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Velocity as a fraction of the speed of light, from the on-shell
    /// condition `β = p / sqrt(m² + p²)`.
    ///
    /// Massless partons move at exactly β = 1 for any non-zero momentum.
    /// A parton with no momentum is at rest.
    pub fn beta(&self) -> f64 {
        let p = self.pt();
        if p == 0.0 {
            return 0.0;
        }
        let m = self.mass();
        if m == 0.0 {
            return 1.0;
        }
        p / (m * m + p * p).sqrt()
    }

    /// Current position.
    #[inline]
    pub fn coords(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Current position in polar form `(ρ, φ)` with φ on `[0, 2π)`.
    pub fn polar_position(&self) -> (f64, f64) {
        (self.x.hypot(self.y), azimuth(self.x, self.y))
    }

    /// Current momentum in polar form `(p_T, φ)` with φ on `[0, 2π)`.
    pub fn polar_momentum(&self) -> (f64, f64) {
        (self.pt(), azimuth(self.px, self.py))
    }

    /// On-shell four-momentum in the transverse plane (`p_z = 0`).
    pub fn four_momentum(&self) -> FourMomentum {
        FourMomentum::on_shell(self.px, self.py, 0.0, self.mass())
    }

    /// Adds a momentum increment in Cartesian components.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::NonFiniteMomentum`] and leaves the momentum
    /// untouched if the result would not be finite.
    pub fn add_momentum(&mut self, dpx: f64, dpy: f64) -> Result<(), ParticleError> {
        let px = self.px + dpx;
        let py = self.py + dpy;
        if !px.is_finite() || !py.is_finite() {
            return Err(ParticleError::NonFiniteMomentum { px, py });
        }
        self.px = px;
        self.py = py;
        Ok(())
    }

    /// Adds momentum perpendicular (counter-clockwise) to the current
    /// direction of motion.
    pub fn add_q_perp(&mut self, q_perp: f64) -> Result<(), ParticleError> {
        let angle = self.polar_momentum().1 + FRAC_PI_2;
        self.add_momentum(q_perp * angle.cos(), q_perp * angle.sin())
    }

    /// Adds momentum parallel to the current direction of motion.
    ///
    /// Negative values remove momentum.
    pub fn add_q_par(&mut self, q_par: f64) -> Result<(), ParticleError> {
        let angle = self.polar_momentum().1;
        self.add_momentum(q_par * angle.cos(), q_par * angle.sin())
    }

    /// Moves the parton along its momentum for a time `tau` at its current
    /// velocity.
    pub fn propagate(&mut self, tau: f64) -> Result<(), ParticleError> {
        if !tau.is_finite() {
            return Err(ParticleError::NonFiniteTime(tau));
        }
        let (x, y) = self.position_after(tau);
        self.x = x;
        self.y = y;
        Ok(())
    }

    /// Position after a time `tau` on the current trajectory.
    pub fn position_after(&self, tau: f64) -> (f64, f64) {
        let phi = self.polar_momentum().1;
        let step = self.beta() * tau;
        (self.x + step * phi.cos(), self.y + step * phi.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_massive_beta_strictly_below_one() {
        for flavour in [Flavour::Up, Flavour::Down, Flavour::Strange, Flavour::AntiStrange] {
            let parton = ParticleRecord::new(flavour, 10.0, 0.3, (0.0, 0.0)).unwrap();
            assert!(parton.beta() < 1.0, "{} has beta {}", flavour, parton.beta());
            assert!(parton.beta() > 0.99);
        }
    }

    #[test]
    fn test_massless_beta_is_exactly_one() {
        let parton = ParticleRecord::new(Flavour::Gluon, 10.0, 0.3, (0.0, 0.0)).unwrap();
        assert_eq!(parton.beta(), 1.0);
    }

    #[test]
    fn test_parton_at_rest() {
        let parton = ParticleRecord::new(Flavour::Gluon, 0.0, 0.0, (0.0, 0.0)).unwrap();
        assert_eq!(parton.beta(), 0.0);
    }

    #[test]
    fn test_perpendicular_kick_rotates_momentum() {
        let mut parton = ParticleRecord::new(Flavour::Gluon, 10.0, 0.0, (0.0, 0.0)).unwrap();
        parton.add_q_perp(1.0).unwrap();
        assert_relative_eq!(parton.px(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(parton.py(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_kick_changes_magnitude_only() {
        let mut parton = ParticleRecord::new(Flavour::Up, 10.0, PI / 3.0, (0.0, 0.0)).unwrap();
        parton.add_q_par(-4.0).unwrap();
        let (pt, phi) = parton.polar_momentum();
        assert_relative_eq!(pt, 6.0, epsilon = 1e-12);
        assert_relative_eq!(phi, PI / 3.0, epsilon = 1e-12);
        assert_eq!(parton.initial_pt(), 10.0);
    }

    #[test]
    fn test_non_finite_kick_is_rejected() {
        let mut parton = ParticleRecord::new(Flavour::Gluon, 10.0, 0.0, (0.0, 0.0)).unwrap();
        assert!(parton.add_momentum(f64::INFINITY, 0.0).is_err());
        assert_eq!(parton.px(), 10.0);
    }

    #[test]
    fn test_propagation_uses_velocity() {
        let mut parton = ParticleRecord::new(Flavour::Gluon, 5.0, PI / 2.0, (1.0, 1.0)).unwrap();
        parton.propagate(3.0).unwrap();
        let (x, y) = parton.coords();
        assert_relative_eq!(x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(y, 4.0, epsilon = 1e-12);
        assert_eq!(parton.initial_coords(), (1.0, 1.0));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(ParticleRecord::new(Flavour::Gluon, f64::NAN, 0.0, (0.0, 0.0)).is_err());
        assert!(ParticleRecord::new(Flavour::Gluon, -1.0, 0.0, (0.0, 0.0)).is_err());
        assert!(ParticleRecord::new(Flavour::Gluon, 1.0, 0.0, (f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_medium_weight_override() {
        let parton = ParticleRecord::new(Flavour::Gluon, 1.0, 0.0, (0.0, 0.0))
            .unwrap()
            .with_weight(2.0)
            .with_medium_weight(0.5);
        assert_eq!(parton.weight(), 2.0);
        assert_eq!(parton.medium_weight(), 0.5);
    }
}
