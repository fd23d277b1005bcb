//! Criterion benchmarks for quench_engine.
//!
//! Measures hard-process sampling against the toy generator, enumeration of
//! the per-draw sampling grid and one full draw over the reference models.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quench_core::rng::JetRng;
use quench_engine::cases::{CaseMatrix, SamplingGrid};
use quench_engine::orchestrator::{EventOrchestrator, OrchestratorConfig};
use quench_engine::sampler::{HardProcessSampler, SamplerConfig};
use quench_models::evolution::StepEvolver;
use quench_models::fragmentation::BetaFragmentation;
use quench_models::generator::{ToyGenerator, ToyGeneratorParams};
use quench_models::hadroniser::{StringHadroniser, StringHadroniserParams};
use quench_models::medium::{GlauberMedium, GlauberParams};

/// Benchmark accept/reject sampling for different imbalance tolerances.
fn bench_hard_process_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("hard_process_sampling");

    for tolerance in [0.05, 0.1, 0.5] {
        let generator = ToyGenerator::new(ToyGeneratorParams::default(), JetRng::from_seed(1)).unwrap();
        let mut sampler = HardProcessSampler::new(generator);
        let config = SamplerConfig {
            balance_tolerance: tolerance,
            ..SamplerConfig::default()
        };
        group.bench_with_input(BenchmarkId::new("tolerance", tolerance), &config, |b, config| {
            b.iter(|| sampler.sample(black_box(config)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark lazy enumeration of the sampling grid.
fn bench_sampling_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling_grid");
    let matrix = CaseMatrix::standard();

    for num_phi in [1, 11, 101] {
        let grid = SamplingGrid::new(&matrix, num_phi, 2).unwrap();
        group.bench_with_input(BenchmarkId::new("points", num_phi), &grid, |b, grid| {
            b.iter(|| grid.points().map(|p| p.run.phi_offset).sum::<f64>());
        });
    }

    group.finish();
}

/// Benchmark one draw through the reference collaborators.
fn bench_single_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_draw");
    group.sample_size(10);

    let medium = GlauberMedium::new(
        GlauberParams {
            grid_step: 0.4,
            ..GlauberParams::default()
        },
        6.0,
    )
    .unwrap();

    for hadronise in [false, true] {
        let rng = JetRng::from_seed(99);
        let config = OrchestratorConfig::builder().hadronise(hadronise).build().unwrap();
        let mut orchestrator = EventOrchestrator::new(
            config,
            ToyGenerator::new(ToyGeneratorParams::default(), rng.derive(1)).unwrap(),
            StepEvolver::default(),
            BetaFragmentation::default(),
            StringHadroniser::new(StringHadroniserParams::default(), rng.derive(2)).unwrap(),
            rng,
        )
        .unwrap();

        group.bench_function(BenchmarkId::new("hadronise", hadronise), |b| {
            b.iter(|| orchestrator.run_event(black_box(&medium), 1).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hard_process_sampling,
    bench_sampling_grid,
    bench_single_draw
);
criterion_main!(benches);
