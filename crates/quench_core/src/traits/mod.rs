//! Collaborator traits for the jet pipeline.
//!
//! This module defines the contracts the engine consumes:
//! - Medium geometry and field queries (`Medium`, `MediumProvider`)
//! - Time evolution of a parton through the medium (`Evolver`)
//! - Fragmentation momentum fractions (`FragmentationSampler`)
//! - Hard-process trial generation (`EventGenerator`)
//! - Colour-singlet hadronisation (`Hadroniser`)
//!
//! Reference implementations live in `quench_models`; tests substitute
//! deterministic stubs.
//!
//! ## Important
//! The evolution trait is generic over the medium and is meant for static
//! dispatch. Generator and hadroniser services are stateful and
//! non-reentrant: they take `&mut self`, so one instance serves exactly one
//! call at a time and parallel workers must each own their own instance.

pub mod evolution;
pub mod fragmentation;
pub mod generator;
pub mod hadroniser;
pub mod medium;

pub use evolution::{
    EvolutionError, EvolutionFlags, EvolutionOutput, EvolutionSummary, Evolver, Trajectory,
    TrajectoryPoint,
};
pub use fragmentation::{FragmentationError, FragmentationSampler};
pub use generator::{EventGenerator, GeneratorError, GeneratorRequest, ProcessType, TrialEvent};
pub use hadroniser::{HadronisationError, Hadroniser};
pub use medium::{EventObservables, Medium, MediumError, MediumProvider};
