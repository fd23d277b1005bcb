//! Run command implementation
//!
//! Simulates `num_events` collision events, or keeps going until interrupted
//! when `num_events` is zero. Every event gets its own medium,
//! generator, hadroniser and orchestrator, seeded from a stream derived from
//! the master seed and the event index, so a run is reproducible for any
//! worker count. With `workers > 1` each batch of `workers` events runs on a
//! rayon pool; results are persisted after every batch.

use chrono::Utc;
use quench_core::rng::JetRng;
use quench_engine::orchestrator::{DrawSummary, EventOrchestrator, EventOutput, OrchestratorConfig};
use quench_engine::EngineError;
use quench_models::evolution::StepEvolver;
use quench_models::fragmentation::BetaFragmentation;
use quench_models::generator::{ToyGenerator, ToyGeneratorParams};
use quench_models::hadroniser::{StringHadroniser, StringHadroniserParams};
use quench_models::medium::GlauberProvider;
use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::config::RunConfig;
use crate::interrupt::InterruptFlag;
use crate::output::{ResultWriter, RunMetadata};
use crate::{CliError, Result};

/// First stream index used for per-event generators.
const EVENT_STREAM_BASE: u64 = 1_000;

/// Stream of the hard-process generator within an event.
const GENERATOR_STREAM: u64 = 10;

/// Stream of the hadroniser within an event.
const HADRONISER_STREAM: u64 = 11;

/// Outcome of a run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Run identifier.
    pub identifier: String,
    /// Master seed.
    pub seed: u64,
    /// Events that produced output.
    pub events_completed: usize,
    /// Events skipped because of a non-fatal error.
    pub events_failed: usize,
    /// Whether the run stopped on an interrupt.
    pub interrupted: bool,
    /// Output parts written.
    pub parts: usize,
    /// Parton rows written.
    pub parton_rows: usize,
    /// Hadron rows written.
    pub hadron_rows: usize,
    /// Draw accounting over all events.
    pub summary: DrawSummary,
}

/// Immutable per-run models, shared by all events.
#[derive(Debug)]
struct Models {
    orchestrator: OrchestratorConfig,
    provider: GlauberProvider,
    evolver: StepEvolver,
    fragmentation: BetaFragmentation,
    generator: ToyGeneratorParams,
    hadroniser: StringHadroniserParams,
    num_oversample: usize,
}

impl Models {
    fn from_config(config: &RunConfig) -> Result<Self> {
        Ok(Self {
            orchestrator: config.orchestrator_config()?,
            provider: GlauberProvider::new(config.medium)?,
            evolver: StepEvolver::new(config.evolution)?,
            fragmentation: config.fragmentation.sampler()?,
            generator: config.generator,
            hadroniser: config.hadroniser,
            num_oversample: config.run.num_oversample,
        })
    }

    fn simulate_event(&self, master: &JetRng, event: usize) -> std::result::Result<EventOutput, EngineError> {
        let rng = master.derive(EVENT_STREAM_BASE + event as u64);
        let generator = ToyGenerator::new(self.generator, rng.derive(GENERATOR_STREAM))?;
        let hadroniser = StringHadroniser::new(self.hadroniser, rng.derive(HADRONISER_STREAM))?;
        let mut orchestrator = EventOrchestrator::new(
            self.orchestrator.clone(),
            generator,
            self.evolver.clone(),
            self.fragmentation.clone(),
            hadroniser,
            rng,
        )?;
        let medium = orchestrator.generate_geometry(&self.provider)?;
        orchestrator.run_event(&medium, self.num_oversample)
    }
}

/// Fills in a missing seed and identifier.
///
/// Calling this again on the same configuration changes nothing.
pub fn resolve_identity(config: &mut RunConfig) {
    // TOML integers are signed 64-bit, so drawn seeds keep the top bit clear.
    let seed = *config
        .run
        .seed
        .get_or_insert_with(|| JetRng::from_entropy().seed() >> 1);
    if config.run.identifier.is_none() {
        config.run.identifier = Some(format!(
            "{}_{:04x}",
            Utc::now().format("%Y%m%d_%H%M%S"),
            seed & 0xffff
        ));
    }
}

/// Run the simulation
pub fn run(config: &RunConfig, interrupt: &InterruptFlag) -> Result<RunReport> {
    let mut config = config.clone();
    resolve_identity(&mut config);
    config.validate()?;

    let seed = config.run.seed.unwrap_or_default();
    let identifier = config.run.identifier.clone().unwrap_or_default();
    let num_events = config.run.num_events;
    let until_interrupted = num_events == 0;
    let workers = config.run.workers;

    let models = Models::from_config(&config)?;
    let master = JetRng::from_seed(seed);
    let mut writer = ResultWriter::create(
        config.output_dir(),
        identifier.as_str(),
        config.run.part_size,
        config.mode.keep_trajectories,
    )?;
    writer.write_config(&config)?;

    let pool = if workers > 1 {
        Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| CliError::Setup(format!("worker pool: {}", e)))?,
        )
    } else {
        None
    };

    info!(
        identifier = %identifier,
        seed,
        num_events,
        until_interrupted,
        samples = config.run.num_oversample,
        workers,
        hadronise = config.mode.hadronise,
        output = %writer.dir().display(),
        "Starting run"
    );

    let started_at = Utc::now();
    let mut report = RunReport {
        identifier: identifier.clone(),
        seed,
        ..RunReport::default()
    };
    let mut outcome = Ok(());

    let mut batch_start = 0;
    while until_interrupted || batch_start < num_events {
        if interrupt.is_raised() {
            report.interrupted = true;
            break;
        }

        let batch_end = if until_interrupted {
            batch_start + workers
        } else {
            num_events.min(batch_start + workers)
        };
        let batch: Vec<usize> = (batch_start..batch_end).collect();
        batch_start += batch.len();

        let results: Vec<(usize, std::result::Result<EventOutput, EngineError>)> = match &pool {
            Some(pool) => pool.install(|| {
                batch
                    .par_iter()
                    .map(|&event| (event, models.simulate_event(&master, event)))
                    .collect()
            }),
            None => batch
                .iter()
                .map(|&event| (event, models.simulate_event(&master, event)))
                .collect(),
        };

        let mut fatal = None;
        for (event, result) in results {
            match result {
                Ok(output) => {
                    info!(
                        event,
                        b = output.observables.impact_parameter,
                        partons = output.partons.len(),
                        hadrons = output.hadrons.len(),
                        failed_draws = output.summary.failed(),
                        "Event complete"
                    );
                    report.summary.merge(&output.summary);
                    report.events_completed += 1;
                    writer.append(event, output);
                }
                Err(e) if e.is_fatal() => {
                    error!(event, error = %e, "Fatal engine error");
                    fatal.get_or_insert(e);
                }
                Err(e) => {
                    warn!(event, kind = e.kind(), error = %e, "Event skipped");
                    report.events_failed += 1;
                }
            }
        }

        if let Err(e) = writer.flush() {
            outcome = Err(e);
            break;
        }
        if let Some(e) = fatal {
            outcome = Err(e.into());
            break;
        }
    }

    if interrupt.is_raised() && (until_interrupted || batch_start < num_events) {
        report.interrupted = true;
    }
    if report.interrupted {
        warn!(
            completed = report.events_completed,
            requested = num_events,
            "Run interrupted; partial results saved"
        );
    }

    report.parts = writer.parts();
    report.parton_rows = writer.parton_rows();
    report.hadron_rows = writer.hadron_rows();

    let metadata = RunMetadata {
        identifier: identifier.clone(),
        seed,
        version: env!("CARGO_PKG_VERSION"),
        started_at,
        finished_at: Utc::now(),
        num_events,
        until_interrupted,
        events_completed: report.events_completed,
        events_failed: report.events_failed,
        interrupted: report.interrupted,
        parts: report.parts,
        parton_rows: report.parton_rows,
        hadron_rows: report.hadron_rows,
        summary: report.summary.clone(),
    };
    let metadata_result = writer.write_metadata(&metadata);

    match (outcome, metadata_result) {
        (Err(e), metadata_result) => {
            if let Err(meta) = metadata_result {
                error!(error = %meta, "Failed to write run metadata");
            }
            Err(e)
        }
        (Ok(()), Err(e)) => {
            error!(error = %e, "Failed to write run metadata");
            Err(e)
        }
        (Ok(()), Ok(())) => {
            info!(
                identifier = %identifier,
                events = report.events_completed,
                failed_events = report.events_failed,
                draws = report.summary.completed,
                failed_draws = report.summary.failed(),
                parton_rows = report.parton_rows,
                hadron_rows = report.hadron_rows,
                "Run finished"
            );
            Ok(report)
        }
    }
}
