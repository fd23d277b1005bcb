//! Core particle and kinematic types.
//!
//! This module provides:
//! - `flavour`: Flavour enum with the fixed mass / PDG id lookup table
//! - `particle`: [`ParticleRecord`], the parton propagated through the medium
//! - `four_vector`: [`FourMomentum`] with rapidity and azimuth helpers
//! - `entry`: [`EventEntry`], one line of a generator or hadroniser event record
//! - `error`: Structured error types for configuration and particle operations
//!
//! # Re-exports
//!
//! Commonly used types are re-exported at this module level.

pub mod entry;
pub mod error;
pub mod flavour;
pub mod four_vector;
pub mod particle;

pub use entry::{EventEntry, PION_CHARGED_ID, PION_ZERO_ID, STATUS_HARD_OUTGOING};
pub use error::{ConfigurationError, ParticleError};
pub use flavour::{Flavour, Species};
pub use four_vector::FourMomentum;
pub use particle::ParticleRecord;
