//! Check command implementation
//!
//! Validates the effective configuration and builds every model once, so a
//! bad parameter is reported before a long run starts.

use quench_core::rng::JetRng;
use quench_models::evolution::StepEvolver;
use quench_models::generator::ToyGenerator;
use quench_models::hadroniser::StringHadroniser;
use quench_models::medium::GlauberProvider;
use tracing::info;

use crate::config::RunConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &RunConfig) -> Result<()> {
    info!("Checking configuration...");

    config.validate()?;
    let orchestrator = config.orchestrator_config()?;
    report("run configuration", "ok");

    GlauberProvider::new(config.medium)?;
    report("medium", &format!("Glauber, R = {} fm", config.medium.nuclear_radius));

    StepEvolver::new(config.evolution)?;
    report("evolution", "step integrator");

    config.fragmentation.sampler()?;
    report("fragmentation", "Beta");

    let rng = JetRng::from_seed(0);
    ToyGenerator::new(config.generator, rng.derive(0))?;
    report("generator", &format!("{}", config.jet.process));

    StringHadroniser::new(config.hadroniser, rng.derive(1))?;
    report(
        "hadroniser",
        if config.mode.hadronise { "enabled" } else { "disabled" },
    );

    std::fs::create_dir_all(&config.run.results_dir)?;
    report("results directory", &config.run.results_dir.display().to_string());

    info!(
        cases = orchestrator.case_matrix().len(),
        num_phi = orchestrator.num_phi(),
        workers = config.run.workers,
        "Configuration is valid"
    );
    Ok(())
}

fn report(item: &str, status: &str) {
    println!("  ✓ {:<18} {}", item, status);
}
