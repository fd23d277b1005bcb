//! Orchestrator configuration and builder.

use quench_core::types::ConfigurationError;

use crate::cases::{CaseMatrix, Couplings};
use crate::hadronise::RetrierConfig;
use crate::sampler::SamplerConfig;

/// Default number of azimuthal offsets per draw.
///
/// Odd, so the offsets never alias with even flow harmonics.
pub const DEFAULT_NUM_PHI: usize = 11;

/// Configuration of an [`EventOrchestrator`](super::EventOrchestrator).
///
/// # Examples
///
/// ```rust
/// use quench_engine::orchestrator::OrchestratorConfig;
///
/// let config = OrchestratorConfig::builder()
///     .num_phi(11)
///     .hadronise(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.num_phi(), 11);
/// assert!(config.hadronise());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct OrchestratorConfig {
    num_phi: usize,
    vary_point: bool,
    hadronise: bool,
    keep_trajectories: bool,
    couplings: Couplings,
    sampler: SamplerConfig,
    retrier: RetrierConfig,
    case_matrix: CaseMatrix,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            num_phi: DEFAULT_NUM_PHI,
            vary_point: true,
            hadronise: false,
            keep_trajectories: false,
            couplings: Couplings::default(),
            sampler: SamplerConfig::default(),
            retrier: RetrierConfig::default(),
            case_matrix: CaseMatrix::standard(),
        }
    }
}

impl OrchestratorConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }

    /// Number of azimuthal offsets per draw.
    #[inline]
    pub fn num_phi(&self) -> usize {
        self.num_phi
    }

    /// Whether production points are sampled from the medium.
    #[inline]
    pub fn vary_point(&self) -> bool {
        self.vary_point
    }

    /// Whether hadron rows are produced.
    #[inline]
    pub fn hadronise(&self) -> bool {
        self.hadronise
    }

    /// Whether evolution trajectories are kept.
    #[inline]
    pub fn keep_trajectories(&self) -> bool {
        self.keep_trajectories
    }

    /// Coupling constants.
    #[inline]
    pub fn couplings(&self) -> &Couplings {
        &self.couplings
    }

    /// Hard-process sampler settings.
    #[inline]
    pub fn sampler(&self) -> &SamplerConfig {
        &self.sampler
    }

    /// Hadronisation retry settings.
    #[inline]
    pub fn retrier(&self) -> &RetrierConfig {
        &self.retrier
    }

    /// Case matrix.
    #[inline]
    pub fn case_matrix(&self) -> &CaseMatrix {
        &self.case_matrix
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if:
    /// - `num_phi` is zero or even
    /// - any nested sampler, retrier, coupling or case setting is invalid
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.num_phi == 0 || self.num_phi % 2 == 0 {
            return Err(ConfigurationError::invalid(
                "num_phi",
                format!("must be a positive odd number, got {}", self.num_phi),
            ));
        }
        self.sampler.validate()?;
        self.retrier.validate()?;
        self.couplings.validate()?;
        self.case_matrix.validate()
    }
}

/// Builder for [`OrchestratorConfig`].
///
/// Unset fields take their defaults; validation happens at [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct OrchestratorConfigBuilder {
    num_phi: Option<usize>,
    vary_point: Option<bool>,
    hadronise: Option<bool>,
    keep_trajectories: Option<bool>,
    couplings: Option<Couplings>,
    sampler: Option<SamplerConfig>,
    retrier: Option<RetrierConfig>,
    case_matrix: Option<CaseMatrix>,
}

impl OrchestratorConfigBuilder {
    /// Sets the number of azimuthal offsets (odd).
    #[inline]
    pub fn num_phi(mut self, num_phi: usize) -> Self {
        self.num_phi = Some(num_phi);
        self
    }

    /// Samples production points from the medium instead of the origin.
    #[inline]
    pub fn vary_point(mut self, vary_point: bool) -> Self {
        self.vary_point = Some(vary_point);
        self
    }

    /// Enables hadron rows.
    #[inline]
    pub fn hadronise(mut self, hadronise: bool) -> Self {
        self.hadronise = Some(hadronise);
        self
    }

    /// Keeps evolution trajectories.
    #[inline]
    pub fn keep_trajectories(mut self, keep: bool) -> Self {
        self.keep_trajectories = Some(keep);
        self
    }

    /// Sets the coupling constants.
    #[inline]
    pub fn couplings(mut self, couplings: Couplings) -> Self {
        self.couplings = Some(couplings);
        self
    }

    /// Sets the hard-process sampler settings.
    #[inline]
    pub fn sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Sets the hadronisation retry settings.
    #[inline]
    pub fn retrier(mut self, retrier: RetrierConfig) -> Self {
        self.retrier = Some(retrier);
        self
    }

    /// Replaces the standard case matrix.
    #[inline]
    pub fn case_matrix(mut self, case_matrix: CaseMatrix) -> Self {
        self.case_matrix = Some(case_matrix);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if validation fails.
    pub fn build(self) -> Result<OrchestratorConfig, ConfigurationError> {
        let defaults = OrchestratorConfig::default();
        let config = OrchestratorConfig {
            num_phi: self.num_phi.unwrap_or(defaults.num_phi),
            vary_point: self.vary_point.unwrap_or(defaults.vary_point),
            hadronise: self.hadronise.unwrap_or(defaults.hadronise),
            keep_trajectories: self.keep_trajectories.unwrap_or(defaults.keep_trajectories),
            couplings: self.couplings.unwrap_or(defaults.couplings),
            sampler: self.sampler.unwrap_or(defaults.sampler),
            retrier: self.retrier.unwrap_or(defaults.retrier),
            case_matrix: self.case_matrix.unwrap_or(defaults.case_matrix),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = OrchestratorConfig::builder().build().unwrap();
        assert_eq!(config, OrchestratorConfig::default());
        assert_eq!(config.num_phi(), DEFAULT_NUM_PHI);
        assert!(!config.hadronise());
        assert_eq!(config.case_matrix().len(), 8);
    }

    #[test]
    fn test_even_num_phi_rejected() {
        assert!(OrchestratorConfig::builder().num_phi(10).build().is_err());
        assert!(OrchestratorConfig::builder().num_phi(0).build().is_err());
        assert!(OrchestratorConfig::builder().num_phi(1).build().is_ok());
    }

    #[test]
    fn test_nested_validation() {
        let sampler = SamplerConfig {
            max_trials: 0,
            ..SamplerConfig::default()
        };
        let err = OrchestratorConfig::builder().sampler(sampler).build().unwrap_err();
        assert!(err.to_string().contains("max_trials"));

        let couplings = Couplings {
            radiative: -1.0,
            collisional: 2.0,
        };
        assert!(OrchestratorConfig::builder().couplings(couplings).build().is_err());
    }
}
