//! Parton flavours with their fixed mass and PDG id table.
//!
//! Masses are current-quark masses in GeV. The table is keyed by
//! [`Species`], and a [`Flavour`] only adds the antiparticle bit, so a quark
//! and its antiquark share one row and always carry the same mass.
//!
//! # Examples
//!
//! ```
//! use quench_core::types::flavour::Flavour;
//!
//! let ubar: Flavour = "ubar".parse().unwrap();
//! assert_eq!(ubar.pdg_id(), -2);
//! assert_eq!(ubar.mass(), Flavour::Up.mass());
//!
//! assert!(Flavour::from_pdg_id(4).is_err()); // charm is not tabulated
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

/// Particle species, independent of particle/antiparticle.
///
/// This is the key of the mass / PDG id lookup table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    /// Gluon (PDG 21), massless.
    Gluon,
    /// Down quark (PDG 1).
    Down,
    /// Up quark (PDG 2).
    Up,
    /// Strange quark (PDG 3).
    Strange,
    /// Photon (PDG 22), massless and colourless.
    Photon,
}

impl Species {
    /// Returns the PDG Monte Carlo id of the particle (positive sign).
    pub const fn pdg_id(self) -> i32 {
        match self {
            Species::Gluon => 21,
            Species::Down => 1,
            Species::Up => 2,
            Species::Strange => 3,
            Species::Photon => 22,
        }
    }

    /// Returns the rest mass in GeV.
    ///
    /// Values follow the PDG current-quark masses.
    pub const fn mass(self) -> f64 {
        match self {
            Species::Gluon => 0.0,
            Species::Down => 0.00467,
            Species::Up => 0.00216,
            Species::Strange => 0.0934,
            Species::Photon => 0.0,
        }
    }

    /// Returns `true` for quark species.
    pub const fn is_quark(self) -> bool {
        matches!(self, Species::Down | Species::Up | Species::Strange)
    }
}

/// Flavour label of a generated particle.
///
/// # Variants
/// - light quarks and antiquarks (`u`, `d`, `s` and their bars)
/// - `Gluon`, the most common leading parton
/// - `Photon`, only produced by the photon-jet process
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavour {
    /// Gluon.
    Gluon,
    /// Up quark.
    Up,
    /// Up antiquark.
    AntiUp,
    /// Down quark.
    Down,
    /// Down antiquark.
    AntiDown,
    /// Strange quark.
    Strange,
    /// Strange antiquark.
    AntiStrange,
    /// Photon.
    Photon,
}

impl Flavour {
    /// All tabulated flavours.
    pub const ALL: [Flavour; 8] = [
        Flavour::Gluon,
        Flavour::Up,
        Flavour::AntiUp,
        Flavour::Down,
        Flavour::AntiDown,
        Flavour::Strange,
        Flavour::AntiStrange,
        Flavour::Photon,
    ];

    /// Returns the species row of the lookup table.
    pub const fn species(self) -> Species {
        match self {
            Flavour::Gluon => Species::Gluon,
            Flavour::Up | Flavour::AntiUp => Species::Up,
            Flavour::Down | Flavour::AntiDown => Species::Down,
            Flavour::Strange | Flavour::AntiStrange => Species::Strange,
            Flavour::Photon => Species::Photon,
        }
    }

    /// Returns `true` for antiquarks.
    pub const fn is_antiparticle(self) -> bool {
        matches!(
            self,
            Flavour::AntiUp | Flavour::AntiDown | Flavour::AntiStrange
        )
    }

    /// Returns the charge-conjugate flavour.
    ///
    /// Gluons and photons are their own antiparticles.
    pub const fn charge_conjugate(self) -> Flavour {
        match self {
            Flavour::Up => Flavour::AntiUp,
            Flavour::AntiUp => Flavour::Up,
            Flavour::Down => Flavour::AntiDown,
            Flavour::AntiDown => Flavour::Down,
            Flavour::Strange => Flavour::AntiStrange,
            Flavour::AntiStrange => Flavour::Strange,
            other => other,
        }
    }

    /// Returns the signed PDG id.
    pub const fn pdg_id(self) -> i32 {
        let id = self.species().pdg_id();
        if self.is_antiparticle() {
            -id
        } else {
            id
        }
    }

    /// Returns the rest mass in GeV.
    pub const fn mass(self) -> f64 {
        self.species().mass()
    }

    /// Returns `true` for quarks and antiquarks.
    pub const fn is_quark(self) -> bool {
        self.species().is_quark()
    }

    /// Returns `true` for the gluon.
    pub const fn is_gluon(self) -> bool {
        matches!(self, Flavour::Gluon)
    }

    /// Returns `true` for the photon.
    pub const fn is_photon(self) -> bool {
        matches!(self, Flavour::Photon)
    }

    /// Returns `true` for particles carrying colour charge.
    pub const fn is_coloured(self) -> bool {
        !self.is_photon()
    }

    /// Returns the short label used in output tables.
    pub const fn label(self) -> &'static str {
        match self {
            Flavour::Gluon => "g",
            Flavour::Up => "u",
            Flavour::AntiUp => "ubar",
            Flavour::Down => "d",
            Flavour::AntiDown => "dbar",
            Flavour::Strange => "s",
            Flavour::AntiStrange => "sbar",
            Flavour::Photon => "gamma",
        }
    }

    /// Looks up the flavour for a signed PDG id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownPdgId`] for ids outside the table
    /// (heavy quarks, leptons, hadrons).
    pub fn from_pdg_id(id: i32) -> Result<Self, ConfigurationError> {
        match id {
            21 => Ok(Flavour::Gluon),
            2 => Ok(Flavour::Up),
            -2 => Ok(Flavour::AntiUp),
            1 => Ok(Flavour::Down),
            -1 => Ok(Flavour::AntiDown),
            3 => Ok(Flavour::Strange),
            -3 => Ok(Flavour::AntiStrange),
            22 => Ok(Flavour::Photon),
            other => Err(ConfigurationError::UnknownPdgId(other)),
        }
    }
}

impl FromStr for Flavour {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flavour::ALL
            .iter()
            .copied()
            .find(|flavour| flavour.label() == s)
            .ok_or_else(|| ConfigurationError::UnknownFlavour(s.to_string()))
    }
}

impl fmt::Display for Flavour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_antiparticle_masses_match() {
        for flavour in Flavour::ALL {
            assert_eq!(flavour.mass(), flavour.charge_conjugate().mass());
        }
    }

    #[test]
    fn test_pdg_round_trip_for_every_flavour() {
        for flavour in Flavour::ALL {
            assert_eq!(Flavour::from_pdg_id(flavour.pdg_id()).unwrap(), flavour);
        }
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("g".parse::<Flavour>().unwrap(), Flavour::Gluon);
        assert_eq!("sbar".parse::<Flavour>().unwrap(), Flavour::AntiStrange);
        assert_eq!(Flavour::AntiDown.to_string(), "dbar");
    }

    #[test]
    fn test_unknown_flavour_is_an_error() {
        assert_eq!(
            "c".parse::<Flavour>(),
            Err(ConfigurationError::UnknownFlavour("c".to_string()))
        );
        assert_eq!(
            Flavour::from_pdg_id(5),
            Err(ConfigurationError::UnknownPdgId(5))
        );
    }

    #[test]
    fn test_table_values() {
        assert_eq!(Flavour::Gluon.mass(), 0.0);
        assert_eq!(Flavour::Up.mass(), 0.00216);
        assert_eq!(Flavour::Down.mass(), 0.00467);
        assert_eq!(Flavour::Strange.mass(), 0.0934);
        assert_eq!(Flavour::AntiStrange.pdg_id(), -3);
        assert!(Flavour::Photon.is_photon() && !Flavour::Photon.is_coloured());
    }
}
