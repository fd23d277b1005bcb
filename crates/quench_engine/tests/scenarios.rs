//! Deterministic pipeline scenarios with stubbed collaborators.
//!
//! Every collaborator here is a stub with fixed output, so the assertions
//! check the engine's own bookkeeping: acceptance, row assembly, per-draw
//! isolation and hadronisation budgets.

use approx::assert_relative_eq;
use quench_core::rng::JetRng;
use quench_core::traits::{
    EventGenerator, EventObservables, EvolutionError, EvolutionFlags, EvolutionOutput,
    EvolutionSummary, Evolver, FragmentationError, FragmentationSampler, GeneratorError,
    GeneratorRequest, HadronisationError, Hadroniser, Medium, MediumError, ProcessType, TrialEvent,
};
use quench_core::types::{EventEntry, Flavour, FourMomentum, ParticleRecord};
use quench_engine::cases::CaseMatrix;
use quench_engine::hadronise::{HadronisationRetrier, RetrierConfig};
use quench_engine::orchestrator::{EventOrchestrator, OrchestratorConfig};
use quench_engine::sampler::{HardProcessSampler, SamplerConfig};
use quench_engine::EngineError;

// ---------------------------------------------------------------------------
// Stubs
// ---------------------------------------------------------------------------

/// Returns a back-to-back pair with pT = 10 and y = 0 for the first
/// `budget` calls, then vetoes every trial.
struct PairGenerator {
    pdg_ids: [i32; 2],
    budget: usize,
    calls: usize,
}

impl PairGenerator {
    fn gluons(budget: usize) -> Self {
        Self {
            pdg_ids: [21, 21],
            budget,
            calls: 0,
        }
    }
}

impl EventGenerator for PairGenerator {
    fn next_trial(&mut self, _request: &GeneratorRequest) -> Result<Option<TrialEvent>, GeneratorError> {
        self.calls += 1;
        if self.calls > self.budget {
            return Ok(None);
        }
        let entry = |pdg_id: i32, phi: f64| EventEntry {
            pdg_id,
            status: 23,
            colour: 0,
            anticolour: 0,
            momentum: FourMomentum::from_pt_rapidity(10.0, 0.0, phi, 0.0),
            mass: 0.0,
            scale: 10.0,
        };
        Ok(Some(TrialEvent {
            entries: vec![entry(self.pdg_ids[0], 0.0), entry(self.pdg_ids[1], std::f64::consts::PI)],
            weight: 2.0,
            hard_scale: 10.0,
        }))
    }
}

/// Leaves the parton untouched.
struct Identity;

impl Evolver for Identity {
    fn evolve<M: Medium + ?Sized>(
        &self,
        medium: &M,
        parton: &mut ParticleRecord,
        _flags: &EvolutionFlags,
        _rng: &mut JetRng,
    ) -> Result<EvolutionOutput, EvolutionError> {
        Ok(EvolutionOutput {
            summary: EvolutionSummary::from_parton(parton, medium.formation_time()),
            trajectory: None,
        })
    }
}

/// Always fails.
struct Failing;

impl Evolver for Failing {
    fn evolve<M: Medium + ?Sized>(
        &self,
        _medium: &M,
        _parton: &mut ParticleRecord,
        _flags: &EvolutionFlags,
        _rng: &mut JetRng,
    ) -> Result<EvolutionOutput, EvolutionError> {
        Err(EvolutionError::InvalidFinalState("negative energy".to_string()))
    }
}

/// Fixed momentum fraction.
struct FixedZ(f64);

impl FragmentationSampler for FixedZ {
    fn sample_z(&self, _parton: &ParticleRecord, _rng: &mut JetRng) -> Result<f64, FragmentationError> {
        Ok(self.0)
    }
}

/// Always reports a consistency failure.
struct Inconsistent;

impl Hadroniser for Inconsistent {
    fn hadronise(&mut self, _partons: &[EventEntry]) -> Result<Vec<EventEntry>, HadronisationError> {
        Err(HadronisationError::Consistency("unmatched colour".to_string()))
    }
}

/// Emits one pion along each input parton with half its momentum.
struct PionPerParton;

impl Hadroniser for PionPerParton {
    fn hadronise(&mut self, partons: &[EventEntry]) -> Result<Vec<EventEntry>, HadronisationError> {
        Ok(partons
            .iter()
            .filter(|p| p.pt() > 0.0)
            .map(|p| EventEntry {
                pdg_id: 211,
                status: 83,
                colour: 0,
                anticolour: 0,
                momentum: FourMomentum::from_pt_rapidity(0.5 * p.pt(), 0.0, p.phi(), 0.14),
                mass: 0.14,
                scale: 0.0,
            })
            .collect())
    }
}

/// Static, featureless medium.
struct Vacuum;

impl Medium for Vacuum {
    fn temperature(&self, _tau: f64, _x: f64, _y: f64) -> f64 {
        0.0
    }
    fn temperature_gradient(&self, _tau: f64, _x: f64, _y: f64) -> (f64, f64) {
        (0.0, 0.0)
    }
    fn flow_velocity(&self, _tau: f64, _x: f64, _y: f64) -> (f64, f64) {
        (0.0, 0.0)
    }
    fn formation_time(&self) -> f64 {
        0.5
    }
    fn end_time(&self) -> f64 {
        10.0
    }
    fn critical_temperature(&self) -> f64 {
        0.155
    }
    fn sample_production_point(&self, _rng: &mut JetRng) -> Result<(f64, f64), MediumError> {
        Ok((1.0, -1.0))
    }
    fn observables(&self) -> EventObservables {
        EventObservables {
            impact_parameter: 4.2,
            ..EventObservables::default()
        }
    }
}

fn sampler_config(max_trials: usize) -> SamplerConfig {
    SamplerConfig {
        pt_hat_min: 1.0,
        pt_hat_max: 100.0,
        process: ProcessType::Dijet,
        rapidity_window: 0.5,
        balance_tolerance: 0.5,
        min_pt: 1.0,
        max_trials,
    }
}

fn orchestrator<E: Evolver, H: Hadroniser>(
    generator: PairGenerator,
    evolver: E,
    hadroniser: H,
    hadronise: bool,
) -> EventOrchestrator<PairGenerator, E, FixedZ, H> {
    let config = OrchestratorConfig::builder()
        .sampler(sampler_config(5))
        .vary_point(false)
        .hadronise(hadronise)
        .build()
        .unwrap();
    EventOrchestrator::new(config, generator, evolver, FixedZ(0.3), hadroniser, JetRng::from_seed(11)).unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

/// A balanced gluon pair is accepted on the first trial.
#[test]
fn test_gluon_pair_accepted_on_first_trial() {
    let mut sampler = HardProcessSampler::new(PairGenerator::gluons(usize::MAX));
    let result = sampler.sample(&sampler_config(1000)).unwrap();

    assert_eq!(result.trials, 1);
    assert_eq!(result.flavours, [Flavour::Gluon, Flavour::Gluon]);
    assert_relative_eq!(result.particles[0].pt(), 10.0, epsilon = 1e-12);
    assert_relative_eq!(result.rapidities()[0], 0.0, epsilon = 1e-12);
    assert_eq!(result.weight, 2.0);
    assert_eq!(result.hard_scale, 10.0);
}

/// With an identity integrator and z = 0.3, the vacuum hadron momentum is
/// 0.3 × 10 on every row.
#[test]
fn test_identity_integrator_row_momenta() {
    let mut orchestrator = orchestrator(PairGenerator::gluons(usize::MAX), Identity, Inconsistent, false);
    let output = orchestrator.run_event(&Vacuum, 1).unwrap();

    assert_eq!(output.partons.len(), 11 * 8 * 2);
    for row in &output.partons {
        assert_relative_eq!(row.hadron_pt_0, 3.0, epsilon = 1e-12);
        assert_relative_eq!(row.hadron_pt_f, 3.0, epsilon = 1e-9);
        assert_eq!(row.pp_z, 0.3);
        assert_eq!(row.b, 4.2);
        assert_eq!((row.x_0, row.y_0), (0.0, 0.0));
        assert_eq!(row.aa_weight, row.weight);
    }
    assert!(output.hadrons.is_empty());
}

/// The second draw exhausts its budget; only the first draw's rows remain.
#[test]
fn test_failed_draw_is_isolated() {
    let mut orchestrator = orchestrator(PairGenerator::gluons(1), Identity, Inconsistent, false);
    let output = orchestrator.run_event(&Vacuum, 2).unwrap();

    assert_eq!(output.summary.attempted, 2);
    assert_eq!(output.summary.completed, 1);
    assert_eq!(output.summary.failures.get("sampling_exhausted"), Some(&1));
    assert_eq!(output.partons.len(), 11 * 8 * 2);
    assert!(output.partons.iter().all(|row| row.process_num == 0));
}

/// Integrator failures drop the whole draw, including rows already built.
#[test]
fn test_integration_failure_discards_partial_rows() {
    let mut orchestrator = orchestrator(PairGenerator::gluons(usize::MAX), Failing, Inconsistent, false);
    let output = orchestrator.run_event(&Vacuum, 3).unwrap();

    assert!(output.partons.is_empty());
    assert_eq!(output.summary.completed, 0);
    assert_eq!(output.summary.failures.get("integration_failure"), Some(&3));
}

/// One failed attempt with a budget of one gives an empty outcome.
#[test]
fn test_single_attempt_budget_exhausted() {
    let config = RetrierConfig {
        max_attempts: 1,
        ..RetrierConfig::default()
    };
    let mut retrier = HadronisationRetrier::new(Inconsistent, config, JetRng::from_seed(3)).unwrap();
    let a = ParticleRecord::new(Flavour::Up, 10.0, 0.0, (0.0, 0.0)).unwrap();
    let b = ParticleRecord::new(Flavour::AntiUp, 10.0, 3.1, (0.0, 0.0)).unwrap();

    let outcome = retrier.hadronise(&a, &b, 10.0, 1.0).unwrap();
    assert!(outcome.hadrons.is_empty());
    assert_eq!(outcome.successes, 0);
    assert_eq!(outcome.failures, 1);
    assert_eq!(outcome.attempts(), 1);
}

/// Empty hadronisation outcomes are counted, not treated as failures.
#[test]
fn test_exhausted_hadronisation_keeps_parton_rows() {
    let mut orchestrator = orchestrator(PairGenerator::gluons(usize::MAX), Identity, Inconsistent, true);
    let output = orchestrator.run_event(&Vacuum, 1).unwrap();

    assert_eq!(output.partons.len(), 11 * 8 * 2);
    assert!(output.hadrons.is_empty());
    assert_eq!(output.summary.empty_hadronisations, 11 * 8);
    assert_eq!(output.summary.failed(), 0);
}

/// Hadrons are attached to the parton they were emitted along.
#[test]
fn test_hadrons_assigned_to_nearest_parton() {
    let mut orchestrator = orchestrator(PairGenerator::gluons(usize::MAX), Identity, PionPerParton, true);
    let output = orchestrator.run_event(&Vacuum, 1).unwrap();

    assert_eq!(output.hadrons.len(), 11 * 8 * 2);
    for hadron in &output.hadrons {
        let parent = output
            .partons
            .iter()
            .find(|row| row.tag == hadron.parent_tag && row.process_run == hadron.process_run)
            .unwrap();
        assert_relative_eq!(hadron.parent_pt_f, parent.pt_f, epsilon = 1e-12);
        assert_relative_eq!(hadron.z, 0.5, epsilon = 1e-9);
        assert_eq!(hadron.num_hrz, 1);
        assert_eq!(hadron.failures, 0);
    }
}

/// Photons in gamma-jet draws are neither evolved nor hadronised.
#[test]
fn test_photon_passes_through() {
    let generator = PairGenerator {
        pdg_ids: [22, 21],
        budget: usize::MAX,
        calls: 0,
    };
    let config = OrchestratorConfig::builder()
        .sampler(SamplerConfig {
            process: ProcessType::GammaJet,
            ..sampler_config(5)
        })
        .vary_point(true)
        .hadronise(true)
        .build()
        .unwrap();
    let mut orchestrator =
        EventOrchestrator::new(config, generator, Identity, FixedZ(0.3), PionPerParton, JetRng::from_seed(5))
            .unwrap();

    let output = orchestrator.run_event(&Vacuum, 1).unwrap();
    assert_eq!(output.partons.len(), 11 * 8 * 2);
    assert!(output.hadrons.is_empty());
    assert_eq!(output.summary.empty_hadronisations, 0);

    for row in &output.partons {
        assert_eq!((row.x_0, row.y_0), (1.0, -1.0));
        if row.flavour == Flavour::Photon {
            assert_eq!((row.pp_z, row.z), (1.0, 1.0));
            assert_eq!(row.tau_f, 0.5);
        } else {
            assert_eq!((row.pp_z, row.z), (0.3, 0.3));
        }
    }
}

/// The standard matrix has four cases and eight configurations.
#[test]
fn test_case_matrix_counts() {
    let matrix = CaseMatrix::standard();
    assert_eq!(matrix.cases().len(), 4);
    let drift_cases = matrix.cases().iter().filter(|c| c.drift).count();
    assert_eq!(matrix.configs().count(), 4 + 2 * drift_cases);
}

/// Generator service failures are draw-level, not fatal.
#[test]
fn test_generator_failure_is_not_fatal() {
    struct Offline;
    impl EventGenerator for Offline {
        fn next_trial(&mut self, _: &GeneratorRequest) -> Result<Option<TrialEvent>, GeneratorError> {
            Err(GeneratorError::Service("connection reset".to_string()))
        }
    }
    let mut orchestrator = EventOrchestrator::new(
        OrchestratorConfig::default(),
        Offline,
        Identity,
        FixedZ(0.3),
        Inconsistent,
        JetRng::from_seed(1),
    )
    .unwrap();
    let output = orchestrator.run_event(&Vacuum, 2).unwrap();
    assert_eq!(output.summary.failures.get("generator"), Some(&2));

    let err = EngineError::SamplingExhausted { trials: 1 };
    assert!(!err.is_fatal());
}

/// A seed particle keeps its tag across every offset and case.
#[test]
fn test_parton_tags_shared_across_runs() {
    let mut orchestrator = orchestrator(PairGenerator::gluons(usize::MAX), Identity, Inconsistent, false);
    let output = orchestrator.run_event(&Vacuum, 2).unwrap();

    let mut tags = std::collections::HashMap::new();
    for row in &output.partons {
        let tag = *tags.entry((row.process_tag, row.index)).or_insert(row.tag);
        assert_eq!(row.tag, tag);
    }
    assert_eq!(tags.len(), 2 * 2);
}
