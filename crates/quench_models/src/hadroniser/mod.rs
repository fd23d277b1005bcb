//! Hadronisation services.

pub mod string;

pub use string::{StringHadroniser, StringHadroniserParams};
