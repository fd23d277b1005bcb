//! Optical Glauber medium with Bjorken cooling.
//!
//! Two Woods-Saxon nuclei are displaced by ±b/2 along x. The initial
//! entropy density is taken as `s = sqrt(T_A · T_B)` and the initial
//! temperature as `T_0 ∝ s^{1/3}`, normalised so that the centre of a
//! head-on collision sits at `temperature_scale`. After formation the
//! medium cools as
//!
//! ```text
//! T(τ, x, y) = T_0(x, y) · (τ_0 / τ)^{α/3}
//! ```
//!
//! with `α = 1` for boost-invariant (Bjorken) expansion and `α = 0` for a
//! static medium. Transverse flow grows linearly after formation against
//! the logarithmic temperature gradient.

use std::f64::consts::PI;

use quench_core::math::angles::wrap_phi;
use quench_core::rng::JetRng;
use quench_core::traits::{EventObservables, Medium, MediumError, MediumProvider};
use quench_core::types::ConfigurationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::grid::TransverseGrid;

/// Nuclear saturation density in fm⁻³.
const SATURATION_DENSITY: f64 = 0.17;

/// Longitudinal integration step for the thickness table, in fm.
const THICKNESS_DZ: f64 = 0.05;

/// Radial spacing of the thickness table, in fm.
const THICKNESS_DR: f64 = 0.02;

/// Glauber medium parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlauberParams {
    /// Woods-Saxon radius in fm (lead: 6.62).
    pub nuclear_radius: f64,
    /// Woods-Saxon surface thickness in fm.
    pub skin_depth: f64,
    /// Half-width of the transverse grid in fm.
    pub grid_extent: f64,
    /// Grid spacing in fm.
    pub grid_step: f64,
    /// Formation (thermalisation) time in fm/c.
    pub formation_time: f64,
    /// Proper time at which tracking stops, in fm/c.
    pub end_time: f64,
    /// Cooling exponent α (0 static, 1 Bjorken).
    pub cooling_exponent: f64,
    /// Central temperature of a head-on collision at formation, in GeV.
    pub temperature_scale: f64,
    /// Deconfinement temperature in GeV.
    pub critical_temperature: f64,
    /// Transverse flow build-up rate.
    pub flow_strength: f64,
    /// Largest transverse flow speed.
    pub max_flow: f64,
    /// Rejection-sampling budget for production points.
    pub max_sampling_attempts: usize,
}

impl Default for GlauberParams {
    fn default() -> Self {
        Self {
            nuclear_radius: 6.62,
            skin_depth: 0.546,
            grid_extent: 8.0,
            grid_step: 0.2,
            formation_time: 0.5,
            end_time: 15.0,
            cooling_exponent: 1.0,
            temperature_scale: 0.45,
            critical_temperature: 0.155,
            flow_strength: 0.1,
            max_flow: 0.9,
            max_sampling_attempts: 100_000,
        }
    }
}

impl GlauberParams {
    /// Validates the parameters.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let positive = [
            ("nuclear_radius", self.nuclear_radius),
            ("skin_depth", self.skin_depth),
            ("grid_extent", self.grid_extent),
            ("grid_step", self.grid_step),
            ("formation_time", self.formation_time),
            ("temperature_scale", self.temperature_scale),
            ("critical_temperature", self.critical_temperature),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigurationError::invalid(
                    name,
                    format!("must be positive, got {}", value),
                ));
            }
        }
        if !(self.end_time > self.formation_time) {
            return Err(ConfigurationError::invalid(
                "end_time",
                "must exceed the formation time",
            ));
        }
        if !(self.cooling_exponent >= 0.0) {
            return Err(ConfigurationError::invalid(
                "cooling_exponent",
                "must be non-negative",
            ));
        }
        if !(self.flow_strength >= 0.0) || !(0.0..1.0).contains(&self.max_flow) {
            return Err(ConfigurationError::invalid(
                "flow",
                "flow strength must be non-negative and max_flow in [0, 1)",
            ));
        }
        if self.max_sampling_attempts == 0 {
            return Err(ConfigurationError::invalid(
                "max_sampling_attempts",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Radial Woods-Saxon thickness function `T(r) = ∫ ρ(sqrt(r² + z²)) dz`.
struct ThicknessTable {
    values: Vec<f64>,
}

impl ThicknessTable {
    fn new(params: &GlauberParams, r_max: f64) -> Self {
        let z_max = params.nuclear_radius + 12.0 * params.skin_depth;
        let nz = (2.0 * z_max / THICKNESS_DZ).ceil() as usize;
        let nr = (r_max / THICKNESS_DR).ceil() as usize + 2;

        let values = (0..nr)
            .map(|k| {
                let r = k as f64 * THICKNESS_DR;
                (0..=nz)
                    .map(|m| {
                        let z = -z_max + m as f64 * THICKNESS_DZ;
                        let radius = r.hypot(z);
                        SATURATION_DENSITY
                            / (1.0 + ((radius - params.nuclear_radius) / params.skin_depth).exp())
                    })
                    .sum::<f64>()
                    * THICKNESS_DZ
            })
            .collect();

        Self { values }
    }

    fn at(&self, r: f64) -> f64 {
        let u = r / THICKNESS_DR;
        let k = u.floor() as usize;
        if k + 1 >= self.values.len() {
            return 0.0;
        }
        let frac = u - k as f64;
        self.values[k] * (1.0 - frac) + self.values[k + 1] * frac
    }
}

/// One collision's optical Glauber medium.
#[derive(Clone, Debug)]
pub struct GlauberMedium {
    params: GlauberParams,
    binary_density: TransverseGrid,
    initial_temperature: TransverseGrid,
    max_binary_density: f64,
    observables: EventObservables,
}

impl GlauberMedium {
    /// Builds the medium at impact parameter `b`.
    ///
    /// # Errors
    ///
    /// - [`MediumError::InvalidImpactParameter`] for `b` outside `[0, 2R]`
    /// - [`MediumError::InvalidParameter`] for invalid parameters
    /// - [`MediumError::EmptyOverlap`] when the nuclei do not overlap on the grid
    pub fn new(params: GlauberParams, b: f64) -> Result<Self, MediumError> {
        params.validate().map_err(into_medium_error)?;
        let max_b = 2.0 * params.nuclear_radius;
        if !(0.0..=max_b).contains(&b) {
            return Err(MediumError::InvalidImpactParameter { value: b, max: max_b });
        }

        let r_max = std::f64::consts::SQRT_2 * params.grid_extent + 0.5 * b + 1.0;
        let table = ThicknessTable::new(&params, r_max);
        let thickness_pair = |x: f64, y: f64| {
            (
                table.at((x - 0.5 * b).hypot(y)),
                table.at((x + 0.5 * b).hypot(y)),
            )
        };

        let binary_density = TransverseGrid::from_fn(params.grid_extent, params.grid_step, |x, y| {
            let (ta, tb) = thickness_pair(x, y);
            ta * tb
        })
        .map_err(into_medium_error)?;

        let max_binary_density = binary_density.max_value();
        if !(max_binary_density > 0.0) {
            return Err(MediumError::EmptyOverlap(b));
        }

        let reference_density = table.at(0.0);
        let entropy = TransverseGrid::from_fn(params.grid_extent, params.grid_step, |x, y| {
            let (ta, tb) = thickness_pair(x, y);
            (ta * tb).sqrt()
        })
        .map_err(into_medium_error)?;
        let initial_temperature =
            TransverseGrid::from_fn(params.grid_extent, params.grid_step, |x, y| {
                let s = entropy.interpolate(x, y).unwrap_or(0.0);
                params.temperature_scale * (s / reference_density).cbrt()
            })
            .map_err(into_medium_error)?;

        let observables = entropy_observables(&entropy, &initial_temperature, b);
        debug!(
            b,
            e2 = observables.eccentricity_2,
            t_max = observables.max_temperature,
            "Built Glauber medium"
        );

        Ok(Self {
            params,
            binary_density,
            initial_temperature,
            max_binary_density,
            observables,
        })
    }

    /// Parameters the medium was built with.
    pub fn params(&self) -> &GlauberParams {
        &self.params
    }

    fn initial_temperature_at(&self, x: f64, y: f64) -> f64 {
        self.initial_temperature.interpolate(x, y).unwrap_or(0.0)
    }

    fn cooling_factor(&self, tau: f64) -> f64 {
        if tau <= self.params.formation_time {
            1.0
        } else {
            (self.params.formation_time / tau).powf(self.params.cooling_exponent / 3.0)
        }
    }

    fn initial_gradient(&self, x: f64, y: f64) -> (f64, f64) {
        let h = 0.5 * self.params.grid_step;
        let dx = (self.initial_temperature_at(x + h, y) - self.initial_temperature_at(x - h, y))
            / (2.0 * h);
        let dy = (self.initial_temperature_at(x, y + h) - self.initial_temperature_at(x, y - h))
            / (2.0 * h);
        (dx, dy)
    }
}

impl Medium for GlauberMedium {
    fn temperature(&self, tau: f64, x: f64, y: f64) -> f64 {
        self.initial_temperature_at(x, y) * self.cooling_factor(tau)
    }

    fn temperature_gradient(&self, tau: f64, x: f64, y: f64) -> (f64, f64) {
        let factor = self.cooling_factor(tau);
        let (dx, dy) = self.initial_gradient(x, y);
        (dx * factor, dy * factor)
    }

    fn flow_velocity(&self, tau: f64, x: f64, y: f64) -> (f64, f64) {
        let elapsed = tau - self.params.formation_time;
        let t0 = self.initial_temperature_at(x, y);
        if elapsed <= 0.0 || t0 <= 0.0 {
            return (0.0, 0.0);
        }
        let (dx, dy) = self.initial_gradient(x, y);
        let scale = -self.params.flow_strength * elapsed / t0;
        let (ux, uy) = (scale * dx, scale * dy);
        let speed = ux.hypot(uy);
        if speed > self.params.max_flow {
            let shrink = self.params.max_flow / speed;
            (ux * shrink, uy * shrink)
        } else {
            (ux, uy)
        }
    }

    fn formation_time(&self) -> f64 {
        self.params.formation_time
    }

    fn end_time(&self) -> f64 {
        self.params.end_time
    }

    fn critical_temperature(&self) -> f64 {
        self.params.critical_temperature
    }

    /// Samples a point with probability proportional to the binary
    /// collision density `T_A · T_B`.
    fn sample_production_point(&self, rng: &mut JetRng) -> Result<(f64, f64), MediumError> {
        let extent = self.binary_density.extent();
        for _ in 0..self.params.max_sampling_attempts {
            let x = rng.gen_range(-extent, extent);
            let y = rng.gen_range(-extent, extent);
            let density = self.binary_density.interpolate(x, y).unwrap_or(0.0);
            if rng.gen_uniform() * self.max_binary_density < density {
                return Ok((x, y));
            }
        }
        Err(MediumError::SamplingFailed {
            attempts: self.params.max_sampling_attempts,
        })
    }

    fn observables(&self) -> EventObservables {
        self.observables
    }
}

fn into_medium_error(err: ConfigurationError) -> MediumError {
    match err {
        ConfigurationError::InvalidParameter { name, reason } => {
            MediumError::InvalidParameter { name, reason }
        }
        other => MediumError::InvalidParameter {
            name: "medium",
            reason: other.to_string(),
        },
    }
}

/// Eccentricities and participant-plane angles of the entropy density about
/// its centroid.
fn entropy_observables(
    entropy: &TransverseGrid,
    initial_temperature: &TransverseGrid,
    b: f64,
) -> EventObservables {
    let cell = entropy.step() * entropy.step();
    let (mut total, mut sx, mut sy) = (0.0, 0.0, 0.0);
    for (x, y, s) in entropy.nodes() {
        total += s;
        sx += s * x;
        sy += s * y;
    }
    let (cx, cy) = if total > 0.0 {
        (sx / total, sy / total)
    } else {
        (0.0, 0.0)
    };

    let moment = |n: i32| -> (f64, f64) {
        let (mut re, mut im, mut norm) = (0.0, 0.0, 0.0);
        for (x, y, s) in entropy.nodes() {
            let (dx, dy) = (x - cx, y - cy);
            let r_n = dx.hypot(dy).powi(n);
            let phi = dy.atan2(dx);
            re += s * r_n * (f64::from(n) * phi).cos();
            im += s * r_n * (f64::from(n) * phi).sin();
            norm += s * r_n;
        }
        if norm <= 0.0 {
            return (0.0, 0.0);
        }
        let eccentricity = re.hypot(im) / norm;
        let psi = wrap_phi((im.atan2(re) + PI) / f64::from(n));
        (eccentricity, psi)
    };

    let (eccentricity_2, psi_2) = moment(2);
    let (eccentricity_3, psi_3) = moment(3);

    EventObservables {
        impact_parameter: b,
        eccentricity_2,
        psi_2,
        eccentricity_3,
        psi_3,
        total_entropy: total * cell,
        max_temperature: initial_temperature.max_value(),
    }
}

/// Builds [`GlauberMedium`]s from a fixed parameter set.
#[derive(Clone, Debug, Default)]
pub struct GlauberProvider {
    params: GlauberParams,
}

impl GlauberProvider {
    /// Creates a provider after validating the parameters.
    pub fn new(params: GlauberParams) -> Result<Self, ConfigurationError> {
        params.validate()?;
        Ok(Self { params })
    }
}

impl MediumProvider for GlauberProvider {
    type Medium = GlauberMedium;

    fn max_impact_parameter(&self) -> f64 {
        2.0 * self.params.nuclear_radius
    }

    fn create(&self, b: f64) -> Result<GlauberMedium, MediumError> {
        GlauberMedium::new(self.params, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coarse() -> GlauberParams {
        GlauberParams {
            grid_step: 0.4,
            ..GlauberParams::default()
        }
    }

    #[test]
    fn test_central_temperature_matches_scale() {
        let medium = GlauberMedium::new(coarse(), 0.0).unwrap();
        assert_relative_eq!(medium.temperature(0.5, 0.0, 0.0), 0.45, epsilon = 1e-9);
        assert_relative_eq!(medium.observables().max_temperature, 0.45, epsilon = 1e-9);
    }

    #[test]
    fn test_bjorken_cooling() {
        let medium = GlauberMedium::new(coarse(), 0.0).unwrap();
        let t_early = medium.temperature(0.5, 0.0, 0.0);
        let t_late = medium.temperature(4.0, 0.0, 0.0);
        assert_relative_eq!(t_late / t_early, (0.5f64 / 4.0).powf(1.0 / 3.0), epsilon = 1e-12);

        let static_medium = GlauberMedium::new(
            GlauberParams {
                cooling_exponent: 0.0,
                ..coarse()
            },
            0.0,
        )
        .unwrap();
        assert_eq!(
            static_medium.temperature(0.5, 1.0, 0.0),
            static_medium.temperature(10.0, 1.0, 0.0)
        );
    }

    #[test]
    fn test_outside_grid_is_vacuum() {
        let medium = GlauberMedium::new(coarse(), 0.0).unwrap();
        assert_eq!(medium.temperature(1.0, 20.0, 0.0), 0.0);
        assert_eq!(medium.flow_velocity(1.0, 20.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_eccentricity_grows_with_impact_parameter() {
        let central = GlauberMedium::new(coarse(), 0.0).unwrap().observables();
        let peripheral = GlauberMedium::new(coarse(), 8.0).unwrap().observables();
        assert!(central.eccentricity_2 < 0.02);
        assert!(peripheral.eccentricity_2 > 0.1);
        assert!(peripheral.total_entropy < central.total_entropy);
        assert_eq!(peripheral.impact_parameter, 8.0);
    }

    #[test]
    fn test_flow_points_outwards() {
        let medium = GlauberMedium::new(coarse(), 0.0).unwrap();
        assert_eq!(medium.flow_velocity(0.5, 3.0, 0.0), (0.0, 0.0));
        let (ux, uy) = medium.flow_velocity(5.0, 3.0, 0.0);
        assert!(ux > 0.0);
        assert!(uy.abs() < 1e-9);
        assert!(ux.hypot(uy) <= 0.9 + 1e-12);
    }

    #[test]
    fn test_production_points_follow_overlap() {
        let medium = GlauberMedium::new(coarse(), 10.0).unwrap();
        let mut rng = JetRng::from_seed(11);
        let mut mean_abs_x = 0.0;
        for _ in 0..500 {
            let (x, y) = medium.sample_production_point(&mut rng).unwrap();
            assert!(x.abs() <= 8.0 && y.abs() <= 8.0);
            mean_abs_x += x.abs() / 500.0;
        }
        // The almond is narrow along the impact-parameter axis
        assert!(mean_abs_x < 2.5);
    }

    #[test]
    fn test_invalid_impact_parameter() {
        assert!(matches!(
            GlauberMedium::new(coarse(), 14.0),
            Err(MediumError::InvalidImpactParameter { .. })
        ));
        assert!(GlauberMedium::new(coarse(), -1.0).is_err());
    }

    #[test]
    fn test_provider_validates() {
        let bad = GlauberParams {
            end_time: 0.1,
            ..GlauberParams::default()
        };
        assert!(GlauberProvider::new(bad).is_err());
        let provider = GlauberProvider::new(coarse()).unwrap();
        assert_relative_eq!(provider.max_impact_parameter(), 13.24);
    }
}
