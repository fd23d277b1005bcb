//! # quench_engine: Event Sampling Engine (Layer 3)
//!
//! ## Layer 3 Role
//!
//! quench_engine turns one collision's medium into parton and hadron
//! result rows:
//! - Hard-process accept/reject sampling (`sampler`)
//! - Energy-loss case enumeration and the per-draw sampling grid (`cases`)
//! - Colour assignment and bounded hadronisation retries (`hadronise`)
//! - Per-event orchestration with per-draw failure isolation (`orchestrator`)
//! - Binned flow harmonics and nuclear modification factors (`observables`)
//!
//! The engine is generic over the collaborator traits in
//! `quench_core::traits`; reference implementations live in `quench_models`.
//!
//! ## Failure Semantics
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | Sampler trial budget exhausted | `EngineError::SamplingExhausted`, draw skipped |
//! | Evolution or fragmentation error | `EngineError::IntegrationFailure`, draw skipped |
//! | Hadronisation budget exhausted | empty `HadronisationOutcome`, no hadron rows |
//! | Malformed configuration | `EngineError::Configuration`, returned to the caller |
//!
//! ## Usage Example
//!
//! ```rust
//! use quench_engine::cases::CaseMatrix;
//! use quench_engine::orchestrator::OrchestratorConfig;
//!
//! let config = OrchestratorConfig::builder()
//!     .num_phi(11)
//!     .vary_point(false)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.case_matrix(), &CaseMatrix::standard());
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cases;
pub mod error;
pub mod hadronise;
pub mod observables;
pub mod orchestrator;
pub mod sampler;

pub use error::EngineError;
