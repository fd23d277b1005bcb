//! Event-record entries exchanged with the generator and hadroniser services.
//!
//! The layout mirrors a generator event record line: identity, status,
//! colour tags, four-momentum, mass and production scale. Positive status
//! codes mark particles present in the final state.

use serde::{Deserialize, Serialize};

use super::four_vector::FourMomentum;

/// PDG id of the neutral pion.
pub const PION_ZERO_ID: i32 = 111;

/// PDG id of the positive pion (negative sign for π⁻).
pub const PION_CHARGED_ID: i32 = 211;

/// Status code for outgoing particles of the hard process.
pub const STATUS_HARD_OUTGOING: i32 = 23;

/// One entry in an event record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    /// Signed PDG id.
    pub pdg_id: i32,
    /// Status code; positive means final state.
    pub status: i32,
    /// Colour tag (0 for none).
    pub colour: i32,
    /// Anticolour tag (0 for none).
    pub anticolour: i32,
    /// Four-momentum in GeV.
    pub momentum: FourMomentum,
    /// Rest mass in GeV.
    pub mass: f64,
    /// Production scale in GeV.
    pub scale: f64,
}

impl EventEntry {
    /// Returns `true` for entries present in the final state.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.status > 0
    }

    /// Returns `true` for neutral or charged pions.
    #[inline]
    pub fn is_pion(&self) -> bool {
        self.pdg_id == PION_ZERO_ID || self.pdg_id.abs() == PION_CHARGED_ID
    }

    /// Transverse momentum.
    #[inline]
    pub fn pt(&self) -> f64 {
        self.momentum.pt()
    }

    /// Rapidity.
    #[inline]
    pub fn rapidity(&self) -> f64 {
        self.momentum.rapidity()
    }

    /// Azimuth on `[0, 2π)`.
    #[inline]
    pub fn phi(&self) -> f64 {
        self.momentum.phi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pdg_id: i32, status: i32) -> EventEntry {
        EventEntry {
            pdg_id,
            status,
            colour: 0,
            anticolour: 0,
            momentum: FourMomentum::from_pt_rapidity(2.0, 0.0, 0.0, 0.14),
            mass: 0.14,
            scale: 0.0,
        }
    }

    #[test]
    fn test_pion_identification() {
        assert!(entry(111, 1).is_pion());
        assert!(entry(211, 1).is_pion());
        assert!(entry(-211, 1).is_pion());
        assert!(!entry(321, 1).is_pion());
    }

    #[test]
    fn test_final_state_status() {
        assert!(entry(21, 23).is_final());
        assert!(!entry(21, -23).is_final());
    }
}
