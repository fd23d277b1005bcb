//! Hadronisation of a parton pair through an external service.
//!
//! - [`colour`]: colour tags and beam remnants for each pair category
//! - [`HadronisationRetrier`]: bounded retry loop with success/failure counts

pub mod colour;
mod retrier;

pub use colour::{BeamDirection, ColourAssignment, ColourTags, PairCategory, RemnantSlot};
pub use retrier::{
    HadronisationOutcome, HadronisationRetrier, RetrierConfig, DEFAULT_MAX_ATTEMPTS, REMNANT_PZ,
};
