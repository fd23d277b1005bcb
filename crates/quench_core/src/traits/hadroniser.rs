//! Colour-singlet hadronisation service contract.

use thiserror::Error;

use crate::types::EventEntry;

/// Errors raised by the hadronisation service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HadronisationError {
    /// The service rejected the configuration during an internal
    /// consistency check. A fresh attempt may succeed.
    #[error("Hadronisation consistency failure: {0}")]
    Consistency(String),

    /// Unrecoverable service failure.
    #[error("Hadronisation service failure: {0}")]
    Service(String),
}

impl HadronisationError {
    /// Returns `true` when another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, HadronisationError::Consistency(_))
    }
}

/// Stateful hadronisation service.
pub trait Hadroniser {
    /// Hadronises a colour-singlet system and returns the full final-state
    /// record.
    fn hadronise(&mut self, partons: &[EventEntry]) -> Result<Vec<EventEntry>, HadronisationError>;
}
