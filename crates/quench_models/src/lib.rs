//! # Quench Models (L2: Reference Collaborators)
//!
//! Concrete implementations of the collaborator traits declared in
//! `quench_core::traits`, sufficient to run the pipeline end to end.
//!
//! This crate provides:
//! - An optical Glauber medium with Bjorken cooling (`medium`)
//! - A step-wise energy-loss integrator with radiative, collisional, flow
//!   drift and gradient kicks (`evolution`)
//! - Beta-distribution fragmentation (`fragmentation`)
//! - A toy hard-process generator with p̂_T biasing (`generator`)
//! - A toy string hadroniser with colour-flow checks (`hadroniser`)
//!
//! ## Design Principles
//!
//! - **Parameters validated at construction**: every model is built from a
//!   parameter struct with physical defaults; invalid values are rejected
//!   with `ConfigurationError` before any event is generated.
//! - **Injectable randomness**: stateful services own a `JetRng` supplied by
//!   the caller, so a fixed seed gives a reproducible run.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod evolution;
pub mod fragmentation;
pub mod generator;
pub mod hadroniser;
pub mod medium;

/// Conversion constant ħc in GeV·fm.
pub const HBARC: f64 = 0.197_327;
