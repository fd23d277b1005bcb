//! Flat result rows.
//!
//! Rows are flat structs so they serialise directly to CSV with a header.
//! Event-level medium observables are repeated on every parton row.

use std::collections::BTreeMap;

use quench_core::math::angles::delta_r;
use quench_core::traits::{EventObservables, EvolutionSummary, ProcessType, Trajectory};
use quench_core::types::{EventEntry, Flavour, ParticleRecord};
use serde::{Deserialize, Serialize};

use crate::cases::{CaseConfig, GridRun};
use crate::error::EngineError;

/// Per-draw identifiers shared by every row of the draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawContext {
    /// Random tag of the scattering process.
    pub process_tag: u64,
    /// Index of the draw within the event.
    pub process_num: usize,
    /// Process type.
    pub process: ProcessType,
    /// Event statistical weight.
    pub weight: f64,
}

/// One parton at one grid run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartonRow {
    /// Random tag of the scattering process.
    pub process_tag: u64,
    /// Index of the draw within the event.
    pub process_num: usize,
    /// Index of the (offset, case) run within the draw.
    pub process_run: usize,
    /// Process type.
    pub process: ProcessType,
    /// Random tag of this parton record.
    pub tag: u64,
    /// Ordinal of the parton within the process.
    pub index: usize,
    /// Signed PDG id.
    pub pdg_id: i32,
    /// Flavour label.
    pub flavour: Flavour,
    /// Production weight.
    pub weight: f64,
    /// Medium-modification weight.
    pub aa_weight: f64,
    /// Production point x (fm).
    pub x_0: f64,
    /// Production point y (fm).
    pub y_0: f64,
    /// Initial transverse momentum (GeV).
    pub pt_0: f64,
    /// Initial azimuth.
    pub phi_0: f64,
    /// Azimuthal offset of the run.
    pub phi_offset: f64,
    /// Final transverse momentum (GeV).
    pub pt_f: f64,
    /// Final azimuth.
    pub phi_f: f64,
    /// Final x (fm).
    pub x_f: f64,
    /// Final y (fm).
    pub y_f: f64,
    /// Proper time at which evolution stopped (fm/c).
    pub tau_f: f64,
    /// Time spent above the critical temperature (fm/c).
    pub time_plasma: f64,
    /// Time spent below the critical temperature (fm/c).
    pub time_hadron_gas: f64,
    /// Path length (fm).
    pub path_length: f64,
    /// Highest temperature along the path (GeV).
    pub path_max_temperature: f64,
    /// Radiative momentum loss (GeV).
    pub q_el: f64,
    /// Collisional momentum loss (GeV).
    pub q_col: f64,
    /// Drift momentum kick (GeV).
    pub q_drift: f64,
    /// Gradient momentum kick (GeV).
    pub q_grad: f64,
    /// Whether the parton lost all its momentum.
    pub absorbed: bool,
    /// Physics case number.
    pub case: usize,
    /// Elastic loss enabled.
    pub elastic: bool,
    /// Collisional loss enabled.
    pub collisional: bool,
    /// Drift enabled.
    pub drift: bool,
    /// Gradient correction enabled.
    pub gradient: bool,
    /// Drift-strength multiplier.
    pub drift_multiplier: f64,
    /// Coupling constant value.
    pub coupling: f64,
    /// Vacuum fragmentation fraction.
    pub pp_z: f64,
    /// Post-evolution fragmentation fraction.
    pub z: f64,
    /// Vacuum hadron momentum `pt_0 · pp_z`.
    pub hadron_pt_0: f64,
    /// Medium-modified hadron momentum `pt_f · z`.
    pub hadron_pt_f: f64,
    /// Impact parameter (fm).
    pub b: f64,
    /// Second-order eccentricity.
    pub e2: f64,
    /// Second-order participant-plane angle.
    pub psi_2: f64,
    /// Third-order eccentricity.
    pub e3: f64,
    /// Third-order participant-plane angle.
    pub psi_3: f64,
    /// Total entropy proxy.
    pub total_entropy: f64,
    /// Peak medium temperature (GeV).
    pub medium_max_temperature: f64,
}

/// Fragmentation fractions for one parton.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fractions {
    /// Vacuum fraction, sampled before evolution.
    pub pp_z: f64,
    /// Fraction sampled after evolution.
    pub z: f64,
}

impl PartonRow {
    /// Assembles a row from its parts.
    pub fn assemble(
        draw: &DrawContext,
        run: &GridRun,
        coupling: f64,
        parton: &ParticleRecord,
        evolution: &EvolutionSummary,
        fractions: Fractions,
        observables: &EventObservables,
    ) -> Self {
        let config: &CaseConfig = &run.config;
        let (x_0, y_0) = parton.initial_coords();
        Self {
            process_tag: draw.process_tag,
            process_num: draw.process_num,
            process_run: run.run,
            process: draw.process,
            tag: parton.tag(),
            index: parton.index(),
            pdg_id: parton.pdg_id(),
            flavour: parton.flavour(),
            weight: parton.weight(),
            aa_weight: parton.medium_weight(),
            x_0,
            y_0,
            pt_0: parton.initial_pt(),
            phi_0: parton.initial_phi(),
            phi_offset: run.phi_offset,
            pt_f: evolution.pt_f,
            phi_f: evolution.phi_f,
            x_f: evolution.x_f,
            y_f: evolution.y_f,
            tau_f: evolution.tau_f,
            time_plasma: evolution.time_plasma,
            time_hadron_gas: evolution.time_hadron_gas,
            path_length: evolution.path_length,
            path_max_temperature: evolution.max_temperature,
            q_el: evolution.q_el,
            q_col: evolution.q_col,
            q_drift: evolution.q_drift,
            q_grad: evolution.q_grad,
            absorbed: evolution.absorbed,
            case: config.case,
            elastic: config.elastic,
            collisional: config.collisional,
            drift: config.drift,
            gradient: config.gradient,
            drift_multiplier: config.drift_multiplier,
            coupling,
            pp_z: fractions.pp_z,
            z: fractions.z,
            hadron_pt_0: parton.initial_pt() * fractions.pp_z,
            hadron_pt_f: evolution.pt_f * fractions.z,
            b: observables.impact_parameter,
            e2: observables.eccentricity_2,
            psi_2: observables.psi_2,
            e3: observables.eccentricity_3,
            psi_3: observables.psi_3,
            total_entropy: observables.total_entropy,
            medium_max_temperature: observables.max_temperature,
        }
    }
}

/// One accepted hadron with its parent parton.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HadronRow {
    /// Random tag of this hadron.
    pub hadron_tag: u64,
    /// Signed PDG id.
    pub pdg_id: i32,
    /// x momentum (GeV).
    pub px: f64,
    /// y momentum (GeV).
    pub py: f64,
    /// z momentum (GeV).
    pub pz: f64,
    /// Energy (GeV).
    pub e: f64,
    /// Transverse momentum (GeV).
    pub pt: f64,
    /// Rapidity.
    pub y: f64,
    /// Azimuth.
    pub phi_f: f64,
    /// Event weight.
    pub weight: f64,
    /// Successful hadronisation attempts.
    pub num_hrz: usize,
    /// Failed hadronisation attempts.
    pub failures: usize,
    /// Random tag of the scattering process.
    pub process_tag: u64,
    /// Index of the draw within the event.
    pub process_num: usize,
    /// Index of the run within the draw.
    pub process_run: usize,
    /// Physics case number.
    pub case: usize,
    /// Elastic loss enabled.
    pub elastic: bool,
    /// Collisional loss enabled.
    pub collisional: bool,
    /// Drift enabled.
    pub drift: bool,
    /// Gradient correction enabled.
    pub gradient: bool,
    /// Drift-strength multiplier.
    pub drift_multiplier: f64,
    /// Impact parameter (fm).
    pub b: f64,
    /// PDG id of the parent parton.
    pub parent_id: i32,
    /// Tag of the parent parton record.
    pub parent_tag: u64,
    /// Parent's initial transverse momentum (GeV).
    pub parent_pt: f64,
    /// Parent's final transverse momentum (GeV).
    pub parent_pt_f: f64,
    /// Parent's final azimuth.
    pub parent_phi: f64,
    /// `pt / parent_pt_f`, zero for an absorbed parent.
    pub z: f64,
    /// `pt` over the mean final parton momentum of the run.
    pub z_mean: f64,
}

/// Hadronisation bookkeeping for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HadronContext {
    /// Random tag of this hadron.
    pub hadron_tag: u64,
    /// Successful attempts.
    pub successes: usize,
    /// Failed attempts.
    pub failures: usize,
    /// Event weight.
    pub weight: f64,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Index of the parton nearest to `hadron` in `delta_r`, at parton
/// rapidity zero. Exact ties go to the earlier parton.
pub fn nearest_parent(hadron: &EventEntry, partons: &[PartonRow]) -> Option<usize> {
    let (phi, y) = (hadron.phi(), hadron.rapidity());
    let mut best: Option<(usize, f64)> = None;
    for (index, parton) in partons.iter().enumerate() {
        let distance = delta_r(phi, parton.phi_f, y, 0.0);
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

impl HadronRow {
    /// Assembles a row for `hadron`, choosing its parent among `partons`
    /// (the rows of one run).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParticle`] if `partons` is empty.
    pub fn assemble(
        hadron: &EventEntry,
        context: &HadronContext,
        partons: &[PartonRow],
    ) -> Result<Self, EngineError> {
        let parent_index = nearest_parent(hadron, partons).ok_or_else(|| EngineError::InvalidParticle {
            message: "hadron without candidate parents".to_string(),
        })?;
        let parent = &partons[parent_index];
        let mean_pt = partons.iter().map(|p| p.pt_f).sum::<f64>() / partons.len() as f64;
        let pt = hadron.pt();

        Ok(Self {
            hadron_tag: context.hadron_tag,
            pdg_id: hadron.pdg_id,
            px: hadron.momentum.px,
            py: hadron.momentum.py,
            pz: hadron.momentum.pz,
            e: hadron.momentum.e,
            pt,
            y: hadron.rapidity(),
            phi_f: hadron.phi(),
            weight: context.weight,
            num_hrz: context.successes,
            failures: context.failures,
            process_tag: parent.process_tag,
            process_num: parent.process_num,
            process_run: parent.process_run,
            case: parent.case,
            elastic: parent.elastic,
            collisional: parent.collisional,
            drift: parent.drift,
            gradient: parent.gradient,
            drift_multiplier: parent.drift_multiplier,
            b: parent.b,
            parent_id: parent.pdg_id,
            parent_tag: parent.tag,
            parent_pt: parent.pt_0,
            parent_pt_f: parent.pt_f,
            parent_phi: parent.phi_f,
            z: ratio(pt, parent.pt_f),
            z_mean: ratio(pt, mean_pt),
        })
    }
}

/// Trajectory of one parton record, with its run identifiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    /// Random tag of the scattering process.
    pub process_tag: u64,
    /// Index of the run within the draw.
    pub process_run: usize,
    /// Physics case number.
    pub case: usize,
    /// Drift-strength multiplier.
    pub drift_multiplier: f64,
    /// Recorded trajectory.
    pub trajectory: Trajectory,
}

/// Draw-level accounting for one event.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DrawSummary {
    /// Draws attempted.
    pub attempted: usize,
    /// Draws that produced rows.
    pub completed: usize,
    /// Failed draws by [`EngineError::kind`].
    pub failures: BTreeMap<&'static str, usize>,
    /// Runs whose hadronisation budget ran out.
    pub empty_hadronisations: usize,
    /// Hard-process trials used by completed draws.
    pub sampling_trials: usize,
}

impl DrawSummary {
    /// Counts a failed draw.
    pub fn record_failure(&mut self, err: &EngineError) {
        *self.failures.entry(err.kind()).or_default() += 1;
    }

    /// Total failed draws.
    pub fn failed(&self) -> usize {
        self.failures.values().sum()
    }

    /// Adds another summary into this one.
    pub fn merge(&mut self, other: &DrawSummary) {
        self.attempted += other.attempted;
        self.completed += other.completed;
        self.empty_hadronisations += other.empty_hadronisations;
        self.sampling_trials += other.sampling_trials;
        for (kind, count) in &other.failures {
            *self.failures.entry(*kind).or_default() += count;
        }
    }
}

/// Everything one event produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventOutput {
    /// Medium observables of the event.
    pub observables: EventObservables,
    /// Parton rows of every completed draw.
    pub partons: Vec<PartonRow>,
    /// Hadron rows of every completed draw.
    pub hadrons: Vec<HadronRow>,
    /// Trajectories, when kept.
    pub trajectories: Vec<TrajectoryRecord>,
    /// Draw accounting.
    pub summary: DrawSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quench_core::types::FourMomentum;

    fn parton_row(tag: u64, phi_f: f64, pt_f: f64) -> PartonRow {
        let parton = ParticleRecord::new(Flavour::Gluon, 10.0, 0.0, (0.0, 0.0))
            .unwrap()
            .with_tag(tag);
        let draw = DrawContext {
            process_tag: 7,
            process_num: 0,
            process: ProcessType::Dijet,
            weight: 1.0,
        };
        let run = GridRun {
            run: 0,
            phi_index: 0,
            phi_offset: 0.0,
            config: crate::cases::CaseMatrix::standard().configs().next().unwrap(),
        };
        let evolution = EvolutionSummary {
            pt_f,
            phi_f,
            ..EvolutionSummary::default()
        };
        PartonRow::assemble(
            &draw,
            &run,
            1.8,
            &parton,
            &evolution,
            Fractions { pp_z: 0.3, z: 0.5 },
            &EventObservables::default(),
        )
    }

    fn pion(phi: f64, pt: f64) -> EventEntry {
        EventEntry {
            pdg_id: 111,
            status: 83,
            colour: 0,
            anticolour: 0,
            momentum: FourMomentum::from_pt_rapidity(pt, 0.0, phi, 0.135),
            mass: 0.135,
            scale: 0.0,
        }
    }

    #[test]
    fn test_hadron_momenta_on_parton_row() {
        let row = parton_row(1, 0.0, 8.0);
        assert_eq!(row.hadron_pt_0, 3.0);
        assert_eq!(row.hadron_pt_f, 4.0);
        assert_eq!(row.aa_weight, row.weight);
    }

    #[test]
    fn test_nearest_parent_wins() {
        let partons = [parton_row(1, 0.0, 8.0), parton_row(2, 3.0, 6.0)];
        let context = HadronContext {
            hadron_tag: 99,
            successes: 2,
            failures: 1,
            weight: 0.5,
        };
        let row = HadronRow::assemble(&pion(2.8, 3.0), &context, &partons).unwrap();
        assert_eq!(row.parent_tag, 2);
        assert!((row.z - 0.5).abs() < 1e-12);
        assert!((row.z_mean - 3.0 / 7.0).abs() < 1e-12);
        assert_eq!(row.num_hrz, 2);
        assert_eq!(row.failures, 1);
    }

    #[test]
    fn test_tie_goes_to_first_parton() {
        let partons = [parton_row(1, 1.0, 8.0), parton_row(2, 1.0, 8.0)];
        assert_eq!(nearest_parent(&pion(2.0, 2.0), &partons), Some(0));
    }

    #[test]
    fn test_absorbed_parent_gives_zero_fraction() {
        let partons = [parton_row(1, 0.0, 0.0)];
        let context = HadronContext {
            hadron_tag: 1,
            successes: 1,
            failures: 0,
            weight: 1.0,
        };
        let row = HadronRow::assemble(&pion(0.0, 2.0), &context, &partons).unwrap();
        assert_eq!(row.z, 0.0);
        assert!(HadronRow::assemble(&pion(0.0, 2.0), &context, &[]).is_err());
    }

    #[test]
    fn test_summary_merge() {
        let mut total = DrawSummary::default();
        let mut one = DrawSummary {
            attempted: 2,
            completed: 1,
            ..DrawSummary::default()
        };
        one.record_failure(&EngineError::SamplingExhausted { trials: 10 });
        total.merge(&one);
        total.merge(&one);
        assert_eq!(total.attempted, 4);
        assert_eq!(total.failed(), 2);
        assert_eq!(total.failures["sampling_exhausted"], 2);
    }
}
