//! # quench_core: Foundation for the Jet Energy-Loss Monte Carlo
//!
//! ## Layer 1 (Foundation) Role
//!
//! quench_core is the bottom layer of the workspace, providing:
//! - Flavour lookup table and parton records (`types::flavour`, `types::particle`)
//! - Four-momenta and event-record entries (`types::four_vector`, `types::entry`)
//! - Azimuthal helpers and the angular distance `delta_r` (`math::angles`)
//! - Seeded random number generation (`rng`)
//! - Collaborator traits for the medium, the time-evolution integrator, the
//!   fragmentation sampler, the hard-process generator and the hadroniser (`traits`)
//! - Error types: `ConfigurationError`, `ParticleError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other quench_* crates, with minimal external dependencies:
//! - rand / rand_distr: Pseudo-random number generation
//! - thiserror: Error derivation
//! - serde: Serialisation of records written to disk
//!
//! ## Usage Examples
//!
//! ```rust
//! use quench_core::math::angles::delta_r;
//! use quench_core::types::{Flavour, ParticleRecord};
//!
//! let parton = ParticleRecord::new(Flavour::Up, 10.0, 0.0, (0.0, 0.0)).unwrap();
//! assert_eq!(parton.pdg_id(), 2);
//! assert!(parton.beta() < 1.0);
//!
//! let distance = delta_r(0.1, 0.1, 0.0, 0.0);
//! assert_eq!(distance, 0.0);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod math;
pub mod rng;
pub mod traits;
pub mod types;
