//! Fragmentation samplers.

pub mod beta;

pub use beta::{BetaFragmentation, BetaShape};
