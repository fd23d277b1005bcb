//! Toy string hadroniser.
//!
//! Checks that the submitted system is a colour singlet (every colour tag
//! appears exactly once as a colour and once as an anticolour), then breaks
//! each parton into a chain of hadrons collimated around its direction.
//! Beam-collinear remnants turn into a single baryon along the beam. A
//! configurable fraction of attempts fails the internal consistency check
//! at random, so callers must retry.

use std::collections::BTreeMap;

use quench_core::rng::JetRng;
use quench_core::traits::{HadronisationError, Hadroniser};
use quench_core::types::entry::{PION_CHARGED_ID, PION_ZERO_ID};
use quench_core::types::{ConfigurationError, EventEntry, FourMomentum};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Status code of hadrons produced by the string model.
pub const STATUS_HADRON: i32 = 83;

const KAON_ID: i32 = 321;
const PROTON_ID: i32 = 2212;

/// Hadron species with its PDG id and mass.
const PI_ZERO: (i32, f64) = (PION_ZERO_ID, 0.134_977);
const PI_PLUS: (i32, f64) = (PION_CHARGED_ID, 0.139_570);
const PI_MINUS: (i32, f64) = (-PION_CHARGED_ID, 0.139_570);
const K_PLUS: (i32, f64) = (KAON_ID, 0.493_677);
const K_MINUS: (i32, f64) = (-KAON_ID, 0.493_677);
const PROTON: (i32, f64) = (PROTON_ID, 0.938_272);

/// String hadroniser parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringHadroniserParams {
    /// Probability that an attempt fails the consistency check.
    pub failure_probability: f64,
    /// Smallest transverse momentum left on a string before it stops breaking.
    pub min_string_pt: f64,
    /// Largest momentum fraction taken by one string break.
    pub max_break_fraction: f64,
    /// Azimuthal spread of hadrons around the parton direction.
    pub phi_width: f64,
    /// Rapidity spread of hadrons around the parton rapidity.
    pub rapidity_width: f64,
    /// Fraction of hadrons that are pions.
    pub pion_fraction: f64,
}

impl Default for StringHadroniserParams {
    fn default() -> Self {
        Self {
            failure_probability: 0.05,
            min_string_pt: 0.3,
            max_break_fraction: 0.7,
            phi_width: 0.1,
            rapidity_width: 0.3,
            pion_fraction: 0.8,
        }
    }
}

impl StringHadroniserParams {
    /// Validates the parameters.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("failure_probability", self.failure_probability),
            ("pion_fraction", self.pion_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::invalid(
                    name,
                    format!("must lie in [0, 1], got {}", value),
                ));
            }
        }
        if !(self.max_break_fraction > 0.05 && self.max_break_fraction <= 1.0) {
            return Err(ConfigurationError::invalid(
                "max_break_fraction",
                "must lie in (0.05, 1]",
            ));
        }
        if !(self.min_string_pt > 0.0) {
            return Err(ConfigurationError::invalid("min_string_pt", "must be positive"));
        }
        if !(self.phi_width >= 0.0 && self.rapidity_width >= 0.0) {
            return Err(ConfigurationError::invalid(
                "widths",
                "angular spreads must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Toy string hadroniser owning its random stream.
#[derive(Clone, Debug)]
pub struct StringHadroniser {
    params: StringHadroniserParams,
    rng: JetRng,
}

impl StringHadroniser {
    /// Creates a hadroniser after validating the parameters.
    pub fn new(params: StringHadroniserParams, rng: JetRng) -> Result<Self, ConfigurationError> {
        params.validate()?;
        Ok(Self { params, rng })
    }

    fn species(&mut self) -> (i32, f64) {
        if self.rng.gen_bool(self.params.pion_fraction) {
            match self.rng.gen_index(3) {
                Some(0) => PI_ZERO,
                Some(1) => PI_PLUS,
                _ => PI_MINUS,
            }
        } else {
            self.rng
                .choose_weighted(&[(K_PLUS, 0.3), (K_MINUS, 0.3), (PROTON, 0.4)])
                .unwrap_or(PI_ZERO)
        }
    }

    fn hadron(pdg_id: i32, mass: f64, momentum: FourMomentum) -> EventEntry {
        EventEntry {
            pdg_id,
            status: STATUS_HADRON,
            colour: 0,
            anticolour: 0,
            momentum,
            mass,
            scale: 0.0,
        }
    }

    fn fragment_string(&mut self, parton: &EventEntry, hadrons: &mut Vec<EventEntry>) {
        let rapidity = parton.rapidity();
        if !rapidity.is_finite() || parton.pt() < self.params.min_string_pt {
            // Beam remnant or soft parton: one baryon carrying its momentum
            let (pdg_id, mass) = PROTON;
            let sign = if parton.pdg_id < 0 { -1 } else { 1 };
            let p = parton.momentum;
            hadrons.push(Self::hadron(
                sign * pdg_id,
                mass,
                FourMomentum::on_shell(p.px, p.py, p.pz, mass),
            ));
            return;
        }

        let phi = parton.phi();
        let mut remaining = parton.pt();
        while remaining > self.params.min_string_pt {
            let z = self.rng.gen_range(0.05, self.params.max_break_fraction);
            let pt = z * remaining;
            remaining -= pt;

            let (pdg_id, mass) = self.species();
            let hadron_phi = phi + self.params.phi_width * self.rng.gen_normal();
            let hadron_y = rapidity + self.params.rapidity_width * self.rng.gen_normal();
            hadrons.push(Self::hadron(
                pdg_id,
                mass,
                FourMomentum::from_pt_rapidity(pt, hadron_y, hadron_phi, mass),
            ));
        }
    }
}

/// Returns the first colour tag that does not pair up, if any.
fn unmatched_colour(partons: &[EventEntry]) -> Option<i32> {
    let mut tags: BTreeMap<i32, (u32, u32)> = BTreeMap::new();
    for entry in partons {
        if entry.colour != 0 {
            tags.entry(entry.colour).or_default().0 += 1;
        }
        if entry.anticolour != 0 {
            tags.entry(entry.anticolour).or_default().1 += 1;
        }
    }
    tags.into_iter()
        .find(|(_, counts)| *counts != (1, 1))
        .map(|(tag, _)| tag)
}

impl Hadroniser for StringHadroniser {
    fn hadronise(&mut self, partons: &[EventEntry]) -> Result<Vec<EventEntry>, HadronisationError> {
        if partons.is_empty() {
            return Err(HadronisationError::Service("empty parton system".to_string()));
        }
        if let Some(entry) = partons.iter().find(|e| !e.momentum.is_finite()) {
            return Err(HadronisationError::Service(format!(
                "non-finite momentum for PDG id {}",
                entry.pdg_id
            )));
        }
        if let Some(tag) = unmatched_colour(partons) {
            return Err(HadronisationError::Consistency(format!(
                "colour tag {} is not a singlet",
                tag
            )));
        }
        if self.rng.gen_bool(self.params.failure_probability) {
            trace!("String breaking failed the consistency check");
            return Err(HadronisationError::Consistency(
                "string breaking did not converge".to_string(),
            ));
        }

        let mut record: Vec<EventEntry> = partons
            .iter()
            .map(|entry| EventEntry {
                status: -entry.status.abs(),
                ..entry.clone()
            })
            .collect();
        let mut hadrons = Vec::new();
        for parton in partons {
            self.fragment_string(parton, &mut hadrons);
        }
        record.extend(hadrons);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parton(pdg_id: i32, colour: i32, anticolour: i32, px: f64, py: f64, pz: f64) -> EventEntry {
        let mass = 0.0;
        EventEntry {
            pdg_id,
            status: 23,
            colour,
            anticolour,
            momentum: FourMomentum::on_shell(px, py, pz, mass),
            mass,
            scale: 10.0,
        }
    }

    fn reliable() -> StringHadroniser {
        let params = StringHadroniserParams {
            failure_probability: 0.0,
            ..StringHadroniserParams::default()
        };
        StringHadroniser::new(params, JetRng::from_seed(4)).unwrap()
    }

    #[test]
    fn test_gluon_pair_hadronises() {
        let mut hadroniser = reliable();
        let system = [
            parton(21, 101, 102, 10.0, 0.0, 0.0),
            parton(21, 102, 101, -10.0, 0.0, 0.0),
        ];
        let record = hadroniser.hadronise(&system).unwrap();
        assert!(record[..2].iter().all(|e| !e.is_final()));
        let finals: Vec<_> = record.iter().filter(|e| e.is_final()).collect();
        assert!(!finals.is_empty());
        assert!(finals.iter().any(|e| e.is_pion()));
        let pt_sum: f64 = finals.iter().map(|e| e.pt()).sum();
        assert!(pt_sum <= 20.0 + 1e-9);
    }

    #[test]
    fn test_open_colour_is_inconsistent() {
        let mut hadroniser = reliable();
        let system = [
            parton(2, 101, 0, 10.0, 0.0, 0.0),
            parton(21, 102, 101, -10.0, 0.0, 0.0),
        ];
        assert!(matches!(
            hadroniser.hadronise(&system),
            Err(HadronisationError::Consistency(_))
        ));
    }

    #[test]
    fn test_remnant_becomes_beam_baryon() {
        let mut hadroniser = reliable();
        let system = [
            parton(2, 101, 0, 10.0, 0.0, 0.0),
            parton(21, 102, 101, -10.0, 0.0, 0.0),
            parton(-2, 0, 102, 0.0, 0.0, 10_000.0),
        ];
        let record = hadroniser.hadronise(&system).unwrap();
        assert!(record
            .iter()
            .any(|e| e.is_final() && e.pdg_id == -PROTON_ID && e.momentum.pz > 9_000.0));
    }

    #[test]
    fn test_random_consistency_failures() {
        let params = StringHadroniserParams {
            failure_probability: 1.0,
            ..StringHadroniserParams::default()
        };
        let mut hadroniser = StringHadroniser::new(params, JetRng::from_seed(4)).unwrap();
        let system = [
            parton(21, 101, 102, 10.0, 0.0, 0.0),
            parton(21, 102, 101, -10.0, 0.0, 0.0),
        ];
        let err = hadroniser.hadronise(&system).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_empty_system_is_service_failure() {
        let mut hadroniser = reliable();
        let err = hadroniser.hadronise(&[]).unwrap_err();
        assert!(!err.is_retryable());
    }
}
