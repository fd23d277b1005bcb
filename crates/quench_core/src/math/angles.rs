//! Azimuthal angle helpers.
//!
//! All azimuths in the workspace live on `[0, 2π)` and are measured with
//! `atan2(p_y, p_x)`.

use std::f64::consts::PI;

/// Full turn in radians.
pub const TWO_PI: f64 = 2.0 * PI;

/// Wraps an angle onto `[0, 2π)`.
///
/// # Examples
///
/// ```
/// use quench_core::math::angles::{wrap_phi, TWO_PI};
///
/// assert!((wrap_phi(-0.5) - (TWO_PI - 0.5)).abs() < 1e-12);
/// assert_eq!(wrap_phi(TWO_PI), 0.0);
/// ```
#[inline]
pub fn wrap_phi(phi: f64) -> f64 {
    let wrapped = phi.rem_euclid(TWO_PI);
    // rem_euclid rounds tiny negative inputs up to exactly 2π
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

/// Azimuth of a transverse vector on `[0, 2π)`.
#[inline]
pub fn azimuth(px: f64, py: f64) -> f64 {
    wrap_phi(py.atan2(px))
}

/// Absolute azimuthal separation folded onto `[0, π]`.
///
/// The raw difference is wrapped onto `[0, 2π)` first; separations beyond π
/// are measured the short way round.
#[inline]
pub fn delta_phi(phi1: f64, phi2: f64) -> f64 {
    let dphi = wrap_phi(phi1 - phi2);
    if dphi > PI {
        TWO_PI - dphi
    } else {
        dphi
    }
}

/// Angular distance `sqrt(Δφ² + Δy²)` between two directions.
///
/// `Δφ` is folded onto `[0, π]` by [`delta_phi`]; `Δy` is the plain
/// rapidity difference.
///
/// # Examples
///
/// ```
/// use quench_core::math::angles::{delta_r, TWO_PI};
///
/// assert_eq!(delta_r(1.0, 1.0, 0.3, 0.3), 0.0);
///
/// // Wrap-around: 0 and 2π - ε are ε apart
/// let eps = 1e-3;
/// assert!((delta_r(0.0, TWO_PI - eps, 0.0, 0.0) - eps).abs() < 1e-9);
/// ```
#[inline]
pub fn delta_r(phi1: f64, phi2: f64, rapidity1: f64, rapidity2: f64) -> f64 {
    delta_phi(phi1, phi2).hypot(rapidity1 - rapidity2)
}

/// Evenly spaced azimuthal offsets `i · 2π / n` for `i` in `0..n`.
///
/// The end point 2π is excluded, matching `linspace(0, 2π, n, endpoint=False)`.
pub fn uniform_offsets(n: usize) -> impl Iterator<Item = f64> + Clone {
    (0..n).map(move |i| TWO_PI * i as f64 / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_azimuth_quadrants() {
        assert_relative_eq!(azimuth(1.0, 0.0), 0.0);
        assert_relative_eq!(azimuth(0.0, 1.0), PI / 2.0);
        assert_relative_eq!(azimuth(-1.0, 0.0), PI);
        assert_relative_eq!(azimuth(0.0, -1.0), 1.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_phi_folds_past_pi() {
        assert_relative_eq!(delta_phi(0.1, TWO_PI - 0.1), 0.2, epsilon = 1e-12);
        assert_relative_eq!(delta_phi(0.0, PI), PI);
        assert_relative_eq!(delta_phi(3.0 * PI / 2.0, 0.0), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_r_wrap_around_shrinks_with_epsilon() {
        let mut previous = f64::INFINITY;
        for exponent in 1..10 {
            let eps = 10f64.powi(-exponent);
            let d = delta_r(0.0, TWO_PI - eps, 0.0, 0.0);
            assert!(d < previous);
            assert_relative_eq!(d, eps, epsilon = 1e-9);
            previous = d;
        }
    }

    #[test]
    fn test_delta_r_combines_rapidity() {
        assert_relative_eq!(delta_r(0.0, 0.3, 0.0, 0.4), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_offsets_exclude_endpoint() {
        let offsets: Vec<f64> = uniform_offsets(11).collect();
        assert_eq!(offsets.len(), 11);
        assert_eq!(offsets[0], 0.0);
        assert!(offsets.iter().all(|&phi| phi < TWO_PI));
        assert_relative_eq!(offsets[1], TWO_PI / 11.0);
    }

    proptest! {
        #[test]
        fn prop_delta_r_zero_on_identical_directions(phi in -10.0..10.0f64, y in -5.0..5.0f64) {
            prop_assert_eq!(delta_r(phi, phi, y, y), 0.0);
        }

        #[test]
        fn prop_delta_phi_bounded_and_symmetric(a in 0.0..TWO_PI, b in 0.0..TWO_PI) {
            let d = delta_phi(a, b);
            prop_assert!((0.0..=PI).contains(&d));
            prop_assert!((d - delta_phi(b, a)).abs() < 1e-12);
        }

        #[test]
        fn prop_wrap_phi_in_range(phi in -100.0..100.0f64) {
            let w = wrap_phi(phi);
            prop_assert!((0.0..TWO_PI).contains(&w));
        }
    }
}
