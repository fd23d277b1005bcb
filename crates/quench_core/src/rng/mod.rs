//! # Random Number Generation
//!
//! Seeded random number generation shared by every stochastic component:
//! medium sampling, energy-loss kicks, fragmentation, the toy generator
//! services and the parton tags.
//!
//! ## Reproducibility
//!
//! - Every generator is created from a 64-bit seed and records it.
//! - Independent streams for parallel workers are obtained with
//!   [`JetRng::derive`], so a batch run is reproducible regardless of how
//!   events are scheduled across threads.
//!
//! ## Usage Example
//!
//! ```rust
//! use quench_core::rng::JetRng;
//!
//! let mut rng = JetRng::from_seed(12345);
//!
//! let u = rng.gen_uniform();
//! assert!((0.0..1.0).contains(&u));
//!
//! let mut worker = rng.derive(7);
//! assert_eq!(worker.seed(), JetRng::from_seed(12345).derive(7).seed());
//! let _ = worker.gen_normal();
//! ```

mod prng;

pub use prng::{JetRng, TAG_RANGE};
