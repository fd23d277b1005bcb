//! Fixed-step energy-loss integrator.
//!
//! Each step of length `dτ` samples the medium at the parton's position and
//! applies, when enabled and the local temperature is above `T_c`:
//!
//! ```text
//! radiative     dp∥ = −κ_rad · g² · (τ − τ₀) · T³ / (ħc)² · dτ
//! collisional   dp∥ = −κ_col · g² · T² / ħc · dτ
//! drift         dp⊥ =  κ_drift · m_drift · g² · T² / ħc · u⊥ · dτ
//! gradient      dp⊥ = −κ_grad · g² · T · (∇T)⊥ · (τ − τ₀) / ħc · dτ
//! ```
//!
//! where `⊥` components are measured counter-clockwise from the direction
//! of motion. Evolution ends when the local temperature drops below
//! `min_temperature`, when the medium ends, or when the parton has lost all
//! of its momentum (absorbed).

use quench_core::rng::JetRng;
use quench_core::traits::{
    EvolutionError, EvolutionFlags, EvolutionOutput, EvolutionSummary, Evolver, Medium,
    Trajectory, TrajectoryPoint,
};
use quench_core::types::{ConfigurationError, ParticleRecord};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::HBARC;

/// Integrator parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepParams {
    /// Step length in fm/c.
    pub dtau: f64,
    /// Radiative loss coefficient.
    pub kappa_rad: f64,
    /// Collisional loss coefficient.
    pub kappa_col: f64,
    /// Flow drift coefficient.
    pub kappa_drift: f64,
    /// Gradient deflection coefficient.
    pub kappa_grad: f64,
    /// Temperature below which the parton is considered outside the medium.
    pub min_temperature: f64,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            dtau: 0.1,
            kappa_rad: 0.05,
            kappa_col: 0.05,
            kappa_drift: 0.1,
            kappa_grad: 0.05,
            min_temperature: 0.08,
        }
    }
}

impl StepParams {
    /// Validates the parameters.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.dtau > 0.0 && self.dtau.is_finite()) {
            return Err(ConfigurationError::invalid(
                "dtau",
                format!("must be positive, got {}", self.dtau),
            ));
        }
        for (name, value) in [
            ("kappa_rad", self.kappa_rad),
            ("kappa_col", self.kappa_col),
            ("kappa_drift", self.kappa_drift),
            ("kappa_grad", self.kappa_grad),
            ("min_temperature", self.min_temperature),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigurationError::invalid(
                    name,
                    format!("must be finite and non-negative, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

/// Fixed-step integrator.
#[derive(Clone, Debug, Default)]
pub struct StepEvolver {
    params: StepParams,
}

impl StepEvolver {
    /// Creates an integrator after validating the parameters.
    pub fn new(params: StepParams) -> Result<Self, ConfigurationError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Integrator parameters.
    pub fn params(&self) -> &StepParams {
        &self.params
    }
}

/// Perpendicular (counter-clockwise) component of `(vx, vy)` relative to
/// direction `phi`.
#[inline]
fn perpendicular(vx: f64, vy: f64, phi: f64) -> f64 {
    -vx * phi.sin() + vy * phi.cos()
}

impl Evolver for StepEvolver {
    fn evolve<M: Medium + ?Sized>(
        &self,
        medium: &M,
        parton: &mut ParticleRecord,
        flags: &EvolutionFlags,
        _rng: &mut JetRng,
    ) -> Result<EvolutionOutput, EvolutionError> {
        if !(flags.coupling >= 0.0 && flags.coupling.is_finite()) {
            return Err(EvolutionError::InvalidStep(format!(
                "coupling must be finite and non-negative, got {}",
                flags.coupling
            )));
        }

        let p = &self.params;
        let tau_0 = medium.formation_time();
        let t_c = medium.critical_temperature();
        let g2 = flags.coupling * flags.coupling;

        let mut summary = EvolutionSummary::default();
        let mut trajectory = flags.record_trajectory.then(|| Trajectory {
            tag: parton.tag(),
            points: Vec::new(),
        });

        let mut tau = tau_0;
        while tau < medium.end_time() {
            let (x, y) = parton.coords();
            let temperature = medium.temperature(tau, x, y);
            if temperature < p.min_temperature {
                break;
            }

            if let Some(record) = trajectory.as_mut() {
                record.points.push(TrajectoryPoint {
                    tau,
                    x,
                    y,
                    px: parton.px(),
                    py: parton.py(),
                    temperature,
                });
            }

            summary.max_temperature = summary.max_temperature.max(temperature);
            summary.path_length += parton.beta() * p.dtau;

            if temperature >= t_c {
                summary.time_plasma += p.dtau;
                let elapsed = tau - tau_0;
                let phi = parton.polar_momentum().1;

                if flags.drift {
                    let (ux, uy) = medium.flow_velocity(tau, x, y);
                    let q = p.kappa_drift * flags.drift_multiplier * g2 * temperature
                        * temperature
                        / HBARC
                        * perpendicular(ux, uy, phi)
                        * p.dtau;
                    parton.add_q_perp(q)?;
                    summary.q_drift += q;
                }
                if flags.gradient {
                    let (gx, gy) = medium.temperature_gradient(tau, x, y);
                    let q = -p.kappa_grad * g2 * temperature * perpendicular(gx, gy, phi)
                        * elapsed
                        / HBARC
                        * p.dtau;
                    parton.add_q_perp(q)?;
                    summary.q_grad += q;
                }

                let mut loss = 0.0;
                if flags.elastic {
                    let q = p.kappa_rad * g2 * elapsed * temperature.powi(3) / (HBARC * HBARC)
                        * p.dtau;
                    summary.q_el += q;
                    loss += q;
                }
                if flags.collisional {
                    let q = p.kappa_col * g2 * temperature * temperature / HBARC * p.dtau;
                    summary.q_col += q;
                    loss += q;
                }

                let pt = parton.pt();
                if loss >= pt {
                    parton.add_q_par(-pt)?;
                    summary.absorbed = true;
                    trace!(tag = parton.tag(), tau, "Parton absorbed by the medium");
                    break;
                }
                parton.add_q_par(-loss)?;
            } else {
                summary.time_hadron_gas += p.dtau;
            }

            parton.propagate(p.dtau)?;
            tau += p.dtau;
        }

        let final_pt = parton.pt();
        if !final_pt.is_finite() {
            return Err(EvolutionError::InvalidFinalState(format!(
                "non-finite final momentum for parton {}",
                parton.tag()
            )));
        }

        let (pt_f, phi_f) = parton.polar_momentum();
        let (x_f, y_f) = parton.coords();
        summary.pt_f = pt_f;
        summary.phi_f = phi_f;
        summary.x_f = x_f;
        summary.y_f = y_f;
        summary.tau_f = tau;

        Ok(EvolutionOutput {
            summary,
            trajectory,
        })
    }
}
