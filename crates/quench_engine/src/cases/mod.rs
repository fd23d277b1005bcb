//! Energy-loss model cases and their drift variants.
//!
//! The [`CaseMatrix`] holds four physics cases. A case with drift enabled
//! is expanded over the drift-strength multipliers, so the standard matrix
//! enumerates `1 + 3 + 1 + 3 = 8` [`CaseConfig`]s. Enumeration is
//! deterministic and restartable.

mod grid;

pub use grid::{GridPoint, GridRun, SamplingGrid};

use std::fmt;

use quench_core::traits::EvolutionFlags;
use quench_core::types::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Drift-strength multipliers enumerated for drift-enabled cases.
pub const DRIFT_MULTIPLIERS: [f64; 3] = [1.0, 1.25, 0.75];

/// Which coupling constant a case uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coupling {
    /// Radiative-only coupling.
    Radiative,
    /// Coupling fitted with collisional loss switched on.
    Collisional,
}

impl fmt::Display for Coupling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coupling::Radiative => f.write_str("radiative"),
            Coupling::Collisional => f.write_str("collisional"),
        }
    }
}

/// Values of the two coupling constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Couplings {
    /// Coupling for radiative-only cases.
    pub radiative: f64,
    /// Coupling for cases with collisional loss.
    pub collisional: f64,
}

impl Default for Couplings {
    fn default() -> Self {
        Self {
            radiative: 1.8,
            collisional: 2.0,
        }
    }
}

impl Couplings {
    /// Value for a selector.
    #[inline]
    pub fn value(&self, coupling: Coupling) -> f64 {
        match coupling {
            Coupling::Radiative => self.radiative,
            Coupling::Collisional => self.collisional,
        }
    }

    /// Checks that both couplings are positive and finite.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [("g_rad", self.radiative), ("g_col", self.collisional)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigurationError::invalid(
                    name,
                    format!("coupling must be positive, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

/// One physics case before drift-variant expansion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsCase {
    /// Case number written to the output.
    pub id: usize,
    /// Elastic (radiative) energy loss.
    pub elastic: bool,
    /// Collisional energy loss.
    pub collisional: bool,
    /// Momentum-space drift.
    pub drift: bool,
    /// Medium-gradient correction.
    pub gradient: bool,
    /// Coupling selector.
    pub coupling: Coupling,
}

impl PhysicsCase {
    /// The four standard cases.
    pub const STANDARD: [PhysicsCase; 4] = [
        PhysicsCase::new(0, true, false, false, Coupling::Radiative),
        PhysicsCase::new(1, true, false, true, Coupling::Radiative),
        PhysicsCase::new(2, true, true, false, Coupling::Collisional),
        PhysicsCase::new(3, true, true, true, Coupling::Collisional),
    ];

    const fn new(id: usize, elastic: bool, collisional: bool, drift: bool, coupling: Coupling) -> Self {
        Self {
            id,
            elastic,
            collisional,
            drift,
            gradient: false,
            coupling,
        }
    }

    /// Multipliers this case is expanded over.
    pub fn drift_multipliers<'a>(&self, multipliers: &'a [f64]) -> &'a [f64] {
        if self.drift {
            multipliers
        } else {
            &multipliers[..multipliers.len().min(1)]
        }
    }

    fn with_multiplier(&self, drift_multiplier: f64) -> CaseConfig {
        CaseConfig {
            case: self.id,
            elastic: self.elastic,
            collisional: self.collisional,
            drift: self.drift,
            gradient: self.gradient,
            drift_multiplier: if self.drift { drift_multiplier } else { 1.0 },
            coupling: self.coupling,
        }
    }
}

/// One enumerated configuration handed to the evolution integrator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseConfig {
    /// Physics case number.
    pub case: usize,
    /// Elastic (radiative) energy loss.
    pub elastic: bool,
    /// Collisional energy loss.
    pub collisional: bool,
    /// Momentum-space drift.
    pub drift: bool,
    /// Medium-gradient correction.
    pub gradient: bool,
    /// Drift-strength multiplier; 1 for cases without drift.
    pub drift_multiplier: f64,
    /// Coupling selector.
    pub coupling: Coupling,
}

impl CaseConfig {
    /// Flags for the integrator with the selected coupling resolved.
    pub fn evolution_flags(&self, couplings: &Couplings, record_trajectory: bool) -> EvolutionFlags {
        EvolutionFlags {
            elastic: self.elastic,
            collisional: self.collisional,
            drift: self.drift,
            gradient: self.gradient,
            drift_multiplier: self.drift_multiplier,
            coupling: couplings.value(self.coupling),
            record_trajectory,
        }
    }

    /// Checks the configuration is self-consistent.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.elastic || self.collisional || self.drift || self.gradient) {
            return Err(ConfigurationError::invalid(
                "case",
                format!("case {} enables no medium effect", self.case),
            ));
        }
        if !(self.drift_multiplier.is_finite() && self.drift_multiplier > 0.0) {
            return Err(ConfigurationError::invalid(
                "drift_multiplier",
                format!("must be positive, got {}", self.drift_multiplier),
            ));
        }
        if !self.drift && self.drift_multiplier != 1.0 {
            return Err(ConfigurationError::invalid(
                "drift_multiplier",
                format!("case {} has drift disabled but multiplier {}", self.case, self.drift_multiplier),
            ));
        }
        Ok(())
    }
}

/// Ordered physics cases with their drift multipliers.
///
/// # Examples
///
/// ```
/// use quench_engine::cases::CaseMatrix;
///
/// let matrix = CaseMatrix::standard();
/// assert_eq!(matrix.cases().len(), 4);
/// assert_eq!(matrix.configs().count(), 8);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseMatrix {
    cases: Vec<PhysicsCase>,
    drift_multipliers: Vec<f64>,
}

impl Default for CaseMatrix {
    fn default() -> Self {
        Self::standard()
    }
}

impl CaseMatrix {
    /// The four standard cases with multipliers `{1.0, 1.25, 0.75}`.
    pub fn standard() -> Self {
        Self {
            cases: PhysicsCase::STANDARD.to_vec(),
            drift_multipliers: DRIFT_MULTIPLIERS.to_vec(),
        }
    }

    /// Builds a custom matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if either list is empty or any
    /// expanded configuration is malformed.
    pub fn new(cases: Vec<PhysicsCase>, drift_multipliers: Vec<f64>) -> Result<Self, ConfigurationError> {
        if cases.is_empty() {
            return Err(ConfigurationError::invalid("cases", "at least one case is required"));
        }
        if drift_multipliers.is_empty() {
            return Err(ConfigurationError::invalid(
                "drift_multipliers",
                "at least one multiplier is required",
            ));
        }
        let matrix = Self {
            cases,
            drift_multipliers,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Validates every expanded configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.configs().try_for_each(|config| config.validate())
    }

    /// Physics cases in order.
    pub fn cases(&self) -> &[PhysicsCase] {
        &self.cases
    }

    /// Drift-strength multipliers.
    pub fn drift_multipliers(&self) -> &[f64] {
        &self.drift_multipliers
    }

    /// Every configuration, cases outer and multipliers inner.
    pub fn configs(&self) -> impl Iterator<Item = CaseConfig> + Clone + '_ {
        self.cases.iter().flat_map(move |case| {
            case.drift_multipliers(&self.drift_multipliers)
                .iter()
                .map(move |&multiplier| case.with_multiplier(multiplier))
        })
    }

    /// Number of enumerated configurations.
    pub fn len(&self) -> usize {
        self.cases
            .iter()
            .map(|case| case.drift_multipliers(&self.drift_multipliers).len())
            .sum()
    }

    /// Returns `true` when nothing is enumerated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_matrix_counts() {
        let matrix = CaseMatrix::standard();
        assert_eq!(matrix.cases().len(), 4);
        let expected: usize = matrix
            .cases()
            .iter()
            .map(|case| if case.drift { 3 } else { 1 })
            .sum();
        assert_eq!(matrix.configs().count(), expected);
        assert_eq!(matrix.len(), 8);
    }

    #[test]
    fn test_enumeration_order() {
        let configs: Vec<_> = CaseMatrix::standard()
            .configs()
            .map(|c| (c.case, c.drift_multiplier))
            .collect();
        assert_eq!(
            configs,
            vec![
                (0, 1.0),
                (1, 1.0),
                (1, 1.25),
                (1, 0.75),
                (2, 1.0),
                (3, 1.0),
                (3, 1.25),
                (3, 0.75),
            ]
        );
    }

    #[test]
    fn test_enumeration_is_restartable() {
        let matrix = CaseMatrix::standard();
        let first: Vec<_> = matrix.configs().collect();
        let second: Vec<_> = matrix.configs().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_coupling_selector_resolves() {
        let couplings = Couplings {
            radiative: 1.5,
            collisional: 2.5,
        };
        let configs: Vec<_> = CaseMatrix::standard().configs().collect();
        assert_eq!(configs[0].evolution_flags(&couplings, false).coupling, 1.5);
        let collisional = configs.iter().find(|c| c.case == 2).unwrap();
        let flags = collisional.evolution_flags(&couplings, true);
        assert_eq!(flags.coupling, 2.5);
        assert!(flags.collisional);
        assert!(flags.record_trajectory);
    }

    #[test]
    fn test_malformed_cases_rejected() {
        let inert = PhysicsCase {
            id: 9,
            elastic: false,
            collisional: false,
            drift: false,
            gradient: false,
            coupling: Coupling::Radiative,
        };
        assert!(CaseMatrix::new(vec![inert], vec![1.0]).is_err());
        assert!(CaseMatrix::new(vec![], vec![1.0]).is_err());
        assert!(CaseMatrix::new(PhysicsCase::STANDARD.to_vec(), vec![]).is_err());
        assert!(CaseMatrix::new(PhysicsCase::STANDARD.to_vec(), vec![1.0, -2.0]).is_err());
    }
}
