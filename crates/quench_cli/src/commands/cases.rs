//! Cases command implementation
//!
//! Prints the case matrix a run would sweep, with resolved couplings and the
//! number of parton rows each draw produces.

use quench_engine::cases::SamplingGrid;
use tracing::info;

use crate::config::RunConfig;
use crate::Result;

/// One printed line of the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseLine {
    /// Physics case number.
    pub case: usize,
    /// Enabled effects, e.g. `el+col+drift`.
    pub effects: String,
    /// Drift-strength multiplier.
    pub drift_multiplier: f64,
    /// Resolved coupling value.
    pub coupling: f64,
}

/// Resolves the case lines for `config`.
pub fn case_lines(config: &RunConfig) -> Result<Vec<CaseLine>> {
    let matrix = config.case_matrix()?;
    Ok(matrix
        .configs()
        .map(|case| {
            let effects: Vec<&str> = [
                (case.elastic, "el"),
                (case.collisional, "col"),
                (case.drift, "drift"),
                (case.gradient, "grad"),
            ]
            .into_iter()
            .filter_map(|(on, name)| on.then_some(name))
            .collect();
            CaseLine {
                case: case.case,
                effects: effects.join("+"),
                drift_multiplier: case.drift_multiplier,
                coupling: config.constants.value(case.coupling),
            }
        })
        .collect())
}

/// Run the cases command
pub fn run(config: &RunConfig) -> Result<()> {
    let lines = case_lines(config)?;
    let matrix = config.case_matrix()?;
    let grid = SamplingGrid::new(&matrix, config.mode.num_phi, 2)?;

    info!(
        configurations = lines.len(),
        num_phi = config.mode.num_phi,
        rows_per_draw = grid.len(),
        "Case matrix"
    );

    println!("\n┌──────┬────────────────┬──────────┬──────────┐");
    println!("│ Case │ Effects        │ Drift ×  │ Coupling │");
    println!("├──────┼────────────────┼──────────┼──────────┤");
    for line in &lines {
        println!(
            "│ {:>4} │ {:<14} │ {:>8.3} │ {:>8.3} │",
            line.case, line.effects, line.drift_multiplier, line.coupling
        );
    }
    println!("└──────┴────────────────┴──────────┴──────────┘");
    println!(
        "{} configurations × {} offsets × 2 partons = {} rows per draw",
        lines.len(),
        config.mode.num_phi,
        grid.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_case_lines() {
        let lines = case_lines(&RunConfig::default()).unwrap();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0].effects, "el");
        assert_eq!(lines[0].coupling, 1.8);
        assert!(lines.iter().any(|l| l.effects == "el+col+drift" && l.drift_multiplier == 0.75));
        assert!(lines
            .iter()
            .filter(|l| l.effects.contains("col"))
            .all(|l| l.coupling == 2.0));
    }
}
