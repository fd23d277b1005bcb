//! Summarise command implementation
//!
//! Reads parton result parts and writes per-case flow harmonics and nuclear
//! modification factors as JSON.

use std::path::{Path, PathBuf};

use quench_engine::observables::{summarise_by_case, CaseObservables, PtBins};
use quench_engine::orchestrator::PartonRow;
use tracing::info;

use crate::{CliError, Result};

/// Binning and harmonics for the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOptions {
    /// Lower edge of the first pT bin (GeV).
    pub pt_min: f64,
    /// Upper edge of the last pT bin (GeV).
    pub pt_max: f64,
    /// Number of uniform bins.
    pub bins: usize,
    /// Flow harmonic orders.
    pub orders: Vec<u32>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            pt_min: 0.0,
            pt_max: 50.0,
            bins: 10,
            orders: vec![2, 3],
        }
    }
}

/// Reads every parton row from the given CSV parts, in order.
pub fn read_partons(paths: &[PathBuf]) -> Result<Vec<PartonRow>> {
    let mut rows = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let mut reader = csv::Reader::from_path(path)?;
        for record in reader.deserialize() {
            rows.push(record?);
        }
        info!(file = %path.display(), total_rows = rows.len(), "Read parton rows");
    }
    Ok(rows)
}

/// Computes the per-case observables.
pub fn summarise(rows: &[PartonRow], options: &SummaryOptions) -> Result<Vec<CaseObservables>> {
    if options.orders.iter().any(|&n| n == 0) {
        return Err(CliError::InvalidArgument(
            "flow harmonic orders must be at least 1".to_string(),
        ));
    }
    let bins = PtBins::uniform(options.pt_min, options.pt_max, options.bins)?;
    Ok(summarise_by_case(rows, &bins, &options.orders))
}

/// Run the summarise command
pub fn run(partons: &[PathBuf], options: &SummaryOptions, output: Option<&Path>) -> Result<()> {
    if partons.is_empty() {
        return Err(CliError::InvalidArgument("no parton files given".to_string()));
    }
    let rows = read_partons(partons)?;
    let summary = summarise(&rows, options)?;
    let json = serde_json::to_string_pretty(&summary)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(file = %path.display(), groups = summary.len(), "Summary written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::run::run as simulate;
    use crate::config::RunConfig;
    use crate::interrupt::InterruptFlag;

    #[test]
    fn test_missing_file_is_reported() {
        let result = read_partons(&[PathBuf::from("/nonexistent/partons.csv")]);
        assert!(matches!(result, Err(CliError::FileNotFound(_))));
    }

    #[test]
    fn test_zero_order_is_rejected() {
        let options = SummaryOptions {
            orders: vec![0],
            ..SummaryOptions::default()
        };
        assert!(summarise(&[], &options).is_err());
    }

    #[test]
    fn test_summary_of_a_simulated_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RunConfig::default();
        config.run.num_events = 1;
        config.run.num_oversample = 2;
        config.run.seed = Some(3);
        config.run.identifier = Some("s".to_string());
        config.run.results_dir = dir.path().to_path_buf();
        config.mode.num_phi = 1;
        config.medium.grid_step = 0.4;
        let report = simulate(&config, &InterruptFlag::new()).unwrap();

        let part = dir.path().join("s").join("resultssp0.csv");
        let rows = read_partons(&[part.clone()]).unwrap();
        assert_eq!(rows.len(), report.parton_rows);

        let summary = summarise(&rows, &SummaryOptions::default()).unwrap();
        if rows.is_empty() {
            assert!(summary.is_empty());
        } else {
            assert_eq!(summary.len(), 8);
            assert_eq!(summary.iter().map(|c| c.rows).sum::<usize>(), rows.len());
            for case in &summary {
                assert_eq!(case.raa.len(), 10);
                assert_eq!(case.flow.len(), 2 * 10);
            }
        }

        let out = dir.path().join("summary.json");
        run(&[part], &SummaryOptions::default(), Some(&out)).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert!(json.is_array());
    }
}
