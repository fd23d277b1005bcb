//! Medium models.
//!
//! - [`grid`]: regular transverse grid with bilinear interpolation
//! - [`glauber`]: optical Glauber initial state with Bjorken cooling

pub mod glauber;
pub mod grid;

pub use glauber::{GlauberMedium, GlauberParams, GlauberProvider};
pub use grid::TransverseGrid;
