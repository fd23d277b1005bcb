//! Time-evolution integrators.

pub mod step;

pub use step::{StepEvolver, StepParams};
