//! Error types for structured error handling.
//!
//! This module provides:
//! - `ConfigurationError`: malformed configuration or unknown identity data
//! - `ParticleError`: operations that would break a particle's kinematic invariants

use thiserror::Error;

/// Configuration errors.
///
/// These are fatal: a run with an unknown flavour or a malformed case
/// configuration cannot produce meaningful output, so nothing falls back
/// to a default.
///
/// # Examples
/// ```
/// use quench_core::types::ConfigurationError;
///
/// let err = ConfigurationError::UnknownPdgId(4);
/// assert_eq!(format!("{}", err), "Unknown PDG particle id: 4");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Flavour label not present in the flavour table.
    #[error("Unknown flavour label: {0}")]
    UnknownFlavour(String),

    /// PDG id not present in the flavour table.
    #[error("Unknown PDG particle id: {0}")]
    UnknownPdgId(i32),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        reason: String,
    },
}

impl ConfigurationError {
    /// Shorthand for [`ConfigurationError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Errors from particle kinematic operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParticleError {
    /// A momentum update would leave a non-finite component.
    #[error("Non-finite momentum: p_x = {px}, p_y = {py}")]
    NonFiniteMomentum {
        /// Resulting x component.
        px: f64,
        /// Resulting y component.
        py: f64,
    },

    /// Propagation requested over a non-finite time interval.
    #[error("Non-finite propagation time: {0}")]
    NonFiniteTime(f64),
}
