//! Mathematical helpers.
//!
//! - [`angles`]: azimuth wrapping, azimuthal separation and `delta_r`

pub mod angles;

pub use angles::{azimuth, delta_phi, delta_r, wrap_phi, TWO_PI};
