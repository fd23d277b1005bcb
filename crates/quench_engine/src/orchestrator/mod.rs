//! Event orchestration.
//!
//! [`EventOrchestrator::run_event`] performs `num_oversample` independent
//! scattering draws in one medium. Each draw:
//!
//! 1. samples a hard process;
//! 2. rotates the pair into a local frame with the leading particle at φ = 0;
//! 3. picks a production point (origin or sampled from the medium);
//! 4. for every azimuthal offset × case configuration × particle, builds a
//!    [`ParticleRecord`], samples the vacuum fragmentation fraction, evolves
//!    the parton, samples the final fraction and assembles a [`PartonRow`];
//! 5. optionally hadronises each run's parton pair and assigns every
//!    accepted hadron to its nearest parton.
//!
//! A draw either contributes all of its rows or none. Failures are logged,
//! counted in the [`DrawSummary`] and the next draw proceeds; only a
//! [`ConfigurationError`] aborts the event.

mod config;
mod rows;

pub use config::{OrchestratorConfig, OrchestratorConfigBuilder, DEFAULT_NUM_PHI};
pub use rows::{
    nearest_parent, DrawContext, DrawSummary, EventOutput, Fractions, HadronContext, HadronRow,
    PartonRow, TrajectoryRecord,
};

use quench_core::math::angles::wrap_phi;
use quench_core::rng::JetRng;
use quench_core::traits::{
    EventGenerator, EventObservables, EvolutionSummary, Evolver, FragmentationSampler, Hadroniser,
    Medium, MediumProvider,
};
use quench_core::types::{ConfigurationError, ParticleRecord};
use tracing::{debug, info, warn};

use crate::cases::{GridRun, SamplingGrid};
use crate::error::EngineError;
use crate::hadronise::HadronisationRetrier;
use crate::sampler::{HardProcessSampler, ScatteringResult};

/// Stream index for the remnant-flavour generator of the retrier.
const REMNANT_STREAM: u64 = 1;

/// Rows of one successful draw, held back until the draw completes.
#[derive(Default)]
struct DrawOutput {
    partons: Vec<PartonRow>,
    hadrons: Vec<HadronRow>,
    trajectories: Vec<TrajectoryRecord>,
    empty_hadronisations: usize,
    sampling_trials: usize,
}

/// Drives the full per-event pipeline over its collaborators.
///
/// The orchestrator exclusively owns its generator and hadroniser, so one
/// instance must stay on one thread; parallel workers each build their own.
#[derive(Debug)]
pub struct EventOrchestrator<G, E, F, H> {
    config: OrchestratorConfig,
    sampler: HardProcessSampler<G>,
    evolver: E,
    fragmentation: F,
    retrier: HadronisationRetrier<H>,
    rng: JetRng,
}

impl<G, E, F, H> EventOrchestrator<G, E, F, H>
where
    G: EventGenerator,
    E: Evolver,
    F: FragmentationSampler,
    H: Hadroniser,
{
    /// Creates an orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if `config` is invalid.
    pub fn new(
        config: OrchestratorConfig,
        generator: G,
        evolver: E,
        fragmentation: F,
        hadroniser: H,
        rng: JetRng,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let retrier = HadronisationRetrier::new(hadroniser, *config.retrier(), rng.derive(REMNANT_STREAM))?;
        Ok(Self {
            config,
            sampler: HardProcessSampler::new(generator),
            evolver,
            fragmentation,
            retrier,
            rng,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Draws an impact parameter uniformly on `[0, b_max]` and builds the
    /// medium for it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Medium`] if the provider fails.
    pub fn generate_geometry<P: MediumProvider>(&mut self, provider: &P) -> Result<P::Medium, EngineError> {
        let b = self.rng.gen_range(0.0, provider.max_impact_parameter());
        debug!(b, "Generating medium geometry");
        Ok(provider.create(b)?)
    }

    /// Runs `num_oversample` draws in `medium`.
    ///
    /// # Errors
    ///
    /// Only [`EngineError::Configuration`] is returned; every other failure
    /// skips its draw.
    pub fn run_event<M: Medium + ?Sized>(
        &mut self,
        medium: &M,
        num_oversample: usize,
    ) -> Result<EventOutput, EngineError> {
        let observables = medium.observables();
        let mut output = EventOutput {
            observables,
            ..EventOutput::default()
        };

        for process_num in 0..num_oversample {
            output.summary.attempted += 1;
            match self.run_draw(medium, process_num, &observables) {
                Ok(draw) => {
                    output.summary.completed += 1;
                    output.summary.empty_hadronisations += draw.empty_hadronisations;
                    output.summary.sampling_trials += draw.sampling_trials;
                    output.partons.extend(draw.partons);
                    output.hadrons.extend(draw.hadrons);
                    output.trajectories.extend(draw.trajectories);
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(process_num, kind = err.kind(), error = %err, "Jet process failed");
                    output.summary.record_failure(&err);
                }
            }
        }

        info!(
            b = observables.impact_parameter,
            completed = output.summary.completed,
            failed = output.summary.failed(),
            partons = output.partons.len(),
            hadrons = output.hadrons.len(),
            "Event finished"
        );
        Ok(output)
    }

    fn run_draw<M: Medium + ?Sized>(
        &mut self,
        medium: &M,
        process_num: usize,
        observables: &EventObservables,
    ) -> Result<DrawOutput, EngineError> {
        let process_tag = self.rng.gen_tag();
        let scattering = self.sampler.sample(self.config.sampler())?;
        // One tag per seed particle, shared by all of its runs.
        let particle_tags: Vec<u64> = scattering.particles.iter().map(|_| self.rng.gen_tag()).collect();
        let draw = DrawContext {
            process_tag,
            process_num,
            process: self.config.sampler().process,
            weight: scattering.weight,
        };

        let local_phi = local_azimuths(&scattering);
        let origin = if self.config.vary_point() {
            medium.sample_production_point(&mut self.rng)?
        } else {
            (0.0, 0.0)
        };
        debug!(process_num, process_tag, trials = scattering.trials, ?origin, "Hard process accepted");

        let mut output = DrawOutput {
            sampling_trials: scattering.trials,
            ..DrawOutput::default()
        };
        let runs: Vec<GridRun> =
            SamplingGrid::new(self.config.case_matrix(), self.config.num_phi(), scattering.particles.len())?
                .runs()
                .collect();

        for run in runs {
            let mut partons = Vec::with_capacity(scattering.particles.len());
            let mut rows = Vec::with_capacity(scattering.particles.len());

            for (index, &phi) in local_phi.iter().enumerate() {
                let mut parton = ParticleRecord::new(
                    scattering.flavours[index],
                    scattering.particles[index].pt(),
                    wrap_phi(phi + run.phi_offset),
                    origin,
                )
                .map_err(|err| EngineError::InvalidParticle {
                    message: err.to_string(),
                })?
                .with_tag(particle_tags[index])
                .with_index(index)
                .with_weight(scattering.weight);

                let row = self.evolve_parton(medium, &draw, &run, &mut parton, observables, &mut output)?;
                partons.push(parton);
                rows.push(row);
            }

            if self.config.hadronise() && !scattering.has_photon() {
                self.hadronise_run(&partons, &rows, &scattering, &mut output)?;
            }
            output.partons.extend(rows);
        }

        Ok(output)
    }

    fn evolve_parton<M: Medium + ?Sized>(
        &mut self,
        medium: &M,
        draw: &DrawContext,
        run: &GridRun,
        parton: &mut ParticleRecord,
        observables: &EventObservables,
        output: &mut DrawOutput,
    ) -> Result<PartonRow, EngineError> {
        let couplings = self.config.couplings();
        let coupling = couplings.value(run.config.coupling);

        if parton.flavour().is_photon() {
            let summary = EvolutionSummary::from_parton(parton, medium.formation_time());
            let fractions = Fractions { pp_z: 1.0, z: 1.0 };
            return Ok(PartonRow::assemble(draw, run, coupling, parton, &summary, fractions, observables));
        }

        let pp_z = self
            .fragmentation
            .sample_z(parton, &mut self.rng)
            .map_err(|err| EngineError::integration("vacuum fragmentation", err))?;

        let flags = run.config.evolution_flags(couplings, self.config.keep_trajectories());
        let evolved = self
            .evolver
            .evolve(medium, parton, &flags, &mut self.rng)
            .map_err(|err| EngineError::integration("evolution", err))?;

        let z = self
            .fragmentation
            .sample_z(parton, &mut self.rng)
            .map_err(|err| EngineError::integration("fragmentation", err))?;

        if let Some(trajectory) = evolved.trajectory {
            output.trajectories.push(TrajectoryRecord {
                process_tag: draw.process_tag,
                process_run: run.run,
                case: run.config.case,
                drift_multiplier: run.config.drift_multiplier,
                trajectory,
            });
        }

        Ok(PartonRow::assemble(
            draw,
            run,
            coupling,
            parton,
            &evolved.summary,
            Fractions { pp_z, z },
            observables,
        ))
    }

    fn hadronise_run(
        &mut self,
        partons: &[ParticleRecord],
        rows: &[PartonRow],
        scattering: &ScatteringResult,
        output: &mut DrawOutput,
    ) -> Result<(), EngineError> {
        let [first, second] = partons else {
            return Err(EngineError::InvalidParticle {
                message: format!("hadronisation needs two partons, got {}", partons.len()),
            });
        };
        let outcome = self
            .retrier
            .hadronise(first, second, scattering.hard_scale, scattering.weight)?;

        if outcome.is_empty() {
            output.empty_hadronisations += 1;
            return Ok(());
        }

        for hadron in &outcome.hadrons {
            let context = HadronContext {
                hadron_tag: self.rng.gen_tag(),
                successes: outcome.successes,
                failures: outcome.failures,
                weight: outcome.weight,
            };
            output.hadrons.push(HadronRow::assemble(hadron, &context, rows)?);
        }
        Ok(())
    }
}

/// Azimuths of the pair in the frame where the leading particle sits at 0.
fn local_azimuths(scattering: &ScatteringResult) -> [f64; 2] {
    let reference = scattering.particles[0].phi();
    [0.0, wrap_phi(scattering.particles[1].phi() - reference)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use quench_core::traits::{GeneratorError, GeneratorRequest, TrialEvent};
    use quench_core::types::{EventEntry, FourMomentum};
    use std::f64::consts::PI;

    struct BackToBack;

    impl EventGenerator for BackToBack {
        fn next_trial(&mut self, _: &GeneratorRequest) -> Result<Option<TrialEvent>, GeneratorError> {
            let gluon = |phi: f64| EventEntry {
                pdg_id: 21,
                status: 23,
                colour: 0,
                anticolour: 0,
                momentum: FourMomentum::from_pt_rapidity(10.0, 0.0, phi, 0.0),
                mass: 0.0,
                scale: 10.0,
            };
            Ok(Some(TrialEvent {
                entries: vec![gluon(1.0), gluon(1.0 + PI)],
                weight: 1.0,
                hard_scale: 10.0,
            }))
        }
    }

    #[test]
    fn test_local_frame_puts_leader_at_origin() {
        let mut sampler = HardProcessSampler::new(BackToBack);
        let scattering = sampler.sample(&crate::sampler::SamplerConfig::default()).unwrap();
        let [lead, sub] = local_azimuths(&scattering);
        assert_eq!(lead, 0.0);
        assert!((sub - PI).abs() < 1e-12);
        assert_eq!(scattering.particles.len(), 2);
    }
}
