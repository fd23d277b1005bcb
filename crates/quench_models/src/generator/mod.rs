//! Hard-process generator services.

pub mod toy;

pub use toy::{ToyGenerator, ToyGeneratorParams};
