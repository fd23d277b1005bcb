//! Minkowski four-momentum in the collider frame.
//!
//! The beam axis is `z`; the transverse plane is `(x, y)`. Units are GeV.

use serde::{Deserialize, Serialize};

use crate::math::angles::azimuth;

/// Four-momentum `(p_x, p_y, p_z, E)`.
///
/// # Examples
///
/// ```
/// use quench_core::types::FourMomentum;
///
/// let p = FourMomentum::from_pt_rapidity(10.0, 0.0, 0.0, 0.0);
/// assert_eq!(p.pt(), 10.0);
/// assert_eq!(p.rapidity(), 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FourMomentum {
    /// x component.
    pub px: f64,
    /// y component.
    pub py: f64,
    /// z (beam) component.
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl FourMomentum {
    /// Creates a four-momentum from its components.
    #[inline]
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Creates an on-shell four-momentum, taking the energy from
    /// `E² = p² + m²`.
    #[inline]
    pub fn on_shell(px: f64, py: f64, pz: f64, mass: f64) -> Self {
        let e = (px * px + py * py + pz * pz + mass * mass).sqrt();
        Self { px, py, pz, e }
    }

    /// Creates an on-shell four-momentum from transverse momentum,
    /// rapidity and azimuth.
    pub fn from_pt_rapidity(pt: f64, rapidity: f64, phi: f64, mass: f64) -> Self {
        let mt = (pt * pt + mass * mass).sqrt();
        Self {
            px: pt * phi.cos(),
            py: pt * phi.sin(),
            pz: mt * rapidity.sinh(),
            e: mt * rapidity.cosh(),
        }
    }

    /// Transverse momentum magnitude.
    #[inline]
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Azimuth on `[0, 2π)`.
    #[inline]
    pub fn phi(&self) -> f64 {
        azimuth(self.px, self.py)
    }

    /// Rapidity `½ ln((E + p_z) / (E − p_z))`.
    ///
    /// Massless momenta along the beam return ±∞.
    pub fn rapidity(&self) -> f64 {
        let plus = self.e + self.pz;
        let minus = self.e - self.pz;
        if minus <= 0.0 {
            f64::INFINITY
        } else if plus <= 0.0 {
            f64::NEG_INFINITY
        } else {
            0.5 * (plus / minus).ln()
        }
    }

    /// Invariant mass, clamped at zero for slightly space-like round-off.
    pub fn mass(&self) -> f64 {
        let p2 = self.px * self.px + self.py * self.py + self.pz * self.pz;
        (self.e * self.e - p2).max(0.0).sqrt()
    }

    /// Returns `true` when every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.px.is_finite() && self.py.is_finite() && self.pz.is_finite() && self.e.is_finite()
    }
}
