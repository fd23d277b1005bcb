//! Toy 2 → 2 hard-process generator.
//!
//! Trials are drawn flat in p̂_T and carry the weight
//! `(p̂_T,min / p̂_T)^bias_power`, emulating a p̂_T-biased phase-space
//! selection. Each trial event record contains the two beam protons, the
//! two incoming partons (negative status) and the two outgoing particles
//! with status 23. The outgoing pair receives a small momentum imbalance so
//! that the balance cut downstream is exercised, and the system rapidity is
//! vetoed inside the generator when it falls outside the acceptance.

use std::f64::consts::PI;

use quench_core::math::angles::wrap_phi;
use quench_core::rng::JetRng;
use quench_core::traits::{EventGenerator, GeneratorError, GeneratorRequest, ProcessType, TrialEvent};
use quench_core::types::entry::STATUS_HARD_OUTGOING;
use quench_core::types::{ConfigurationError, EventEntry, Flavour, FourMomentum};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// PDG id of the proton.
const PROTON_ID: i32 = 2212;

/// PDG id of the charm quark, produced occasionally to exercise the flavour
/// acceptance.
const CHARM_ID: i32 = 4;

/// Charm quark mass in GeV.
const CHARM_MASS: f64 = 1.27;

/// Status codes of the beam and incoming entries.
const STATUS_BEAM: i32 = -12;
const STATUS_INCOMING: i32 = -21;

/// Toy generator parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToyGeneratorParams {
    /// Centre-of-mass energy in GeV.
    pub sqrt_s: f64,
    /// Power of the p̂_T bias.
    pub bias_power: f64,
    /// Width of the hard-system rapidity distribution.
    pub system_rapidity_width: f64,
    /// Width of the rapidity separation of the outgoing pair.
    pub relative_rapidity_width: f64,
    /// Width of the transverse momentum imbalance, as a fraction of p̂_T.
    pub imbalance_width: f64,
    /// Probability of producing a heavy-flavour pair in dijet mode.
    pub heavy_flavour_fraction: f64,
}

impl Default for ToyGeneratorParams {
    fn default() -> Self {
        Self {
            sqrt_s: 5020.0,
            bias_power: 4.0,
            system_rapidity_width: 0.6,
            relative_rapidity_width: 0.3,
            imbalance_width: 0.05,
            heavy_flavour_fraction: 0.02,
        }
    }
}

impl ToyGeneratorParams {
    /// Validates the parameters.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.sqrt_s > 0.0) {
            return Err(ConfigurationError::invalid("sqrt_s", "must be positive"));
        }
        for (name, value) in [
            ("bias_power", self.bias_power),
            ("system_rapidity_width", self.system_rapidity_width),
            ("relative_rapidity_width", self.relative_rapidity_width),
            ("imbalance_width", self.imbalance_width),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigurationError::invalid(
                    name,
                    format!("must be finite and non-negative, got {}", value),
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.heavy_flavour_fraction) {
            return Err(ConfigurationError::invalid(
                "heavy_flavour_fraction",
                "must lie in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Outgoing pair of one trial.
#[derive(Clone, Copy, Debug)]
enum OutgoingPair {
    Light(Flavour, Flavour),
    Heavy,
}

/// Toy hard-process generator owning its random stream.
#[derive(Clone, Debug)]
pub struct ToyGenerator {
    params: ToyGeneratorParams,
    rng: JetRng,
}

impl ToyGenerator {
    /// Creates a generator after validating the parameters.
    pub fn new(params: ToyGeneratorParams, rng: JetRng) -> Result<Self, ConfigurationError> {
        params.validate()?;
        Ok(Self { params, rng })
    }

    fn light_quark(&mut self) -> Flavour {
        let quark = self
            .rng
            .choose_weighted(&[
                (Flavour::Up, 0.5),
                (Flavour::Down, 0.35),
                (Flavour::Strange, 0.15),
            ])
            .unwrap_or(Flavour::Up);
        if self.rng.gen_bool(0.5) {
            quark.charge_conjugate()
        } else {
            quark
        }
    }

    fn outgoing_pair(&mut self, process: ProcessType) -> OutgoingPair {
        match process {
            ProcessType::Dijet => {
                if self.rng.gen_bool(self.params.heavy_flavour_fraction) {
                    return OutgoingPair::Heavy;
                }
                let channel = self
                    .rng
                    .choose_weighted(&[(0u8, 0.45), (1, 0.35), (2, 0.12), (3, 0.08)])
                    .unwrap_or(0);
                match channel {
                    0 => OutgoingPair::Light(Flavour::Gluon, Flavour::Gluon),
                    1 => {
                        let quark = self.light_quark();
                        OutgoingPair::Light(quark, Flavour::Gluon)
                    }
                    2 => {
                        let quark = self.light_quark();
                        OutgoingPair::Light(quark, quark.charge_conjugate())
                    }
                    _ => {
                        let first = self.light_quark();
                        let mut second = self.light_quark();
                        if second.is_antiparticle() != first.is_antiparticle() {
                            second = second.charge_conjugate();
                        }
                        OutgoingPair::Light(first, second)
                    }
                }
            }
            ProcessType::GammaJet => {
                let recoil = if self.rng.gen_bool(0.8) {
                    self.light_quark()
                } else {
                    Flavour::Gluon
                };
                OutgoingPair::Light(Flavour::Photon, recoil)
            }
        }
    }

    fn outgoing_entry(pdg_id: i32, mass: f64, colour: (i32, i32), momentum: FourMomentum, scale: f64) -> EventEntry {
        EventEntry {
            pdg_id,
            status: STATUS_HARD_OUTGOING,
            colour: colour.0,
            anticolour: colour.1,
            momentum,
            mass,
            scale,
        }
    }
}

/// Colour tags of an outgoing flavour in the toy record.
fn toy_colours(flavour: Flavour, offset: i32) -> (i32, i32) {
    if flavour.is_gluon() {
        (501 + offset, 502 + offset)
    } else if flavour.is_photon() {
        (0, 0)
    } else if flavour.is_antiparticle() {
        (0, 501 + offset)
    } else {
        (501 + offset, 0)
    }
}

impl EventGenerator for ToyGenerator {
    fn next_trial(&mut self, request: &GeneratorRequest) -> Result<Option<TrialEvent>, GeneratorError> {
        if !(request.pt_hat_min > 0.0 && request.pt_hat_max > request.pt_hat_min) {
            return Err(GeneratorError::InvalidRequest(format!(
                "p̂_T range [{}, {}] is empty or non-positive",
                request.pt_hat_min, request.pt_hat_max
            )));
        }
        let half_s = 0.5 * self.params.sqrt_s;
        if request.pt_hat_max >= half_s {
            return Err(GeneratorError::InvalidRequest(format!(
                "p̂_T,max {} exceeds the beam energy {}",
                request.pt_hat_max, half_s
            )));
        }

        let pt_hat = self.rng.gen_range(request.pt_hat_min, request.pt_hat_max);
        let weight = (request.pt_hat_min / pt_hat).powf(self.params.bias_power);

        let y_system = self.params.system_rapidity_width * self.rng.gen_normal();
        if y_system.abs() >= request.rapidity_window {
            trace!(y_system, "Toy generator vetoed the hard-system rapidity");
            return Ok(None);
        }
        let y_star = self.params.relative_rapidity_width * self.rng.gen_normal();

        let imbalance = (self.params.imbalance_width * pt_hat * self.rng.gen_normal()).abs();
        let (pt_1, pt_2) = if self.rng.gen_bool(0.5) {
            (pt_hat + 0.5 * imbalance, pt_hat - 0.5 * imbalance)
        } else {
            (pt_hat - 0.5 * imbalance, pt_hat + 0.5 * imbalance)
        };
        if pt_2 <= 0.0 || pt_1 <= 0.0 {
            return Ok(None);
        }
        let phi = self.rng.gen_range(0.0, 2.0 * PI);

        let outgoing = match self.outgoing_pair(request.process) {
            OutgoingPair::Light(a, b) => [
                Self::outgoing_entry(
                    a.pdg_id(),
                    a.mass(),
                    toy_colours(a, 0),
                    FourMomentum::from_pt_rapidity(pt_1, y_system + y_star, phi, a.mass()),
                    pt_hat,
                ),
                Self::outgoing_entry(
                    b.pdg_id(),
                    b.mass(),
                    toy_colours(b, 2),
                    FourMomentum::from_pt_rapidity(pt_2, y_system - y_star, wrap_phi(phi + PI), b.mass()),
                    pt_hat,
                ),
            ],
            OutgoingPair::Heavy => [
                Self::outgoing_entry(
                    CHARM_ID,
                    CHARM_MASS,
                    (501, 0),
                    FourMomentum::from_pt_rapidity(pt_1, y_system + y_star, phi, CHARM_MASS),
                    pt_hat,
                ),
                Self::outgoing_entry(
                    -CHARM_ID,
                    CHARM_MASS,
                    (0, 501),
                    FourMomentum::from_pt_rapidity(pt_2, y_system - y_star, wrap_phi(phi + PI), CHARM_MASS),
                    pt_hat,
                ),
            ],
        };

        // Incoming partons carry the longitudinal momentum of the outgoing system
        let (e_sum, pz_sum) = outgoing
            .iter()
            .fold((0.0, 0.0), |(e, pz), entry| (e + entry.momentum.e, pz + entry.momentum.pz));
        let e_plus = 0.5 * (e_sum + pz_sum);
        let e_minus = 0.5 * (e_sum - pz_sum);
        if e_plus >= half_s || e_minus >= half_s {
            return Ok(None);
        }

        let beam = |pz: f64| EventEntry {
            pdg_id: PROTON_ID,
            status: STATUS_BEAM,
            colour: 0,
            anticolour: 0,
            momentum: FourMomentum::new(0.0, 0.0, pz, half_s),
            mass: 0.938,
            scale: 0.0,
        };
        let incoming = |pz: f64, e: f64| EventEntry {
            pdg_id: Flavour::Gluon.pdg_id(),
            status: STATUS_INCOMING,
            colour: 0,
            anticolour: 0,
            momentum: FourMomentum::new(0.0, 0.0, pz, e),
            mass: 0.0,
            scale: pt_hat,
        };

        let [first, second] = outgoing;
        let entries = vec![
            beam(half_s),
            beam(-half_s),
            incoming(e_plus, e_plus),
            incoming(-e_minus, e_minus),
            first,
            second,
        ];

        Ok(Some(TrialEvent {
            entries,
            weight,
            hard_scale: pt_hat,
        }))
    }
}
