//! Acceptance cuts on generator trial events.
//!
//! The predicate is a pure function of one trial's entries: identical
//! trials are accepted or rejected identically regardless of call order.

use std::fmt;

use quench_core::traits::ProcessType;
use quench_core::types::{EventEntry, Flavour};

/// Why a trial was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Fewer than two final-state entries.
    MissingPair,
    /// A leading particle is not a light quark, gluon or (gamma-jet) photon.
    Flavour {
        /// Offending PDG id
        pdg_id: i32,
    },
    /// Gamma-jet trial without a photon among the leading pair.
    NoPhoton,
    /// A leading particle is at or below the minimum momentum.
    BelowMinimumPt,
    /// A leading particle is outside the rapidity window.
    OutsideRapidityWindow,
    /// The leading pair is too unbalanced.
    Imbalance,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingPair => f.write_str("missing leading pair"),
            Rejection::Flavour { pdg_id } => write!(f, "unsupported flavour {}", pdg_id),
            Rejection::NoPhoton => f.write_str("no photon in gamma-jet pair"),
            Rejection::BelowMinimumPt => f.write_str("below minimum pT"),
            Rejection::OutsideRapidityWindow => f.write_str("outside rapidity window"),
            Rejection::Imbalance => f.write_str("pT imbalance above tolerance"),
        }
    }
}

/// Indices of the highest and second-highest pT final-state entries.
///
/// Entries with equal pT keep their record order.
pub fn leading_pair(entries: &[EventEntry]) -> Option<(usize, usize)> {
    let mut first: Option<(usize, f64)> = None;
    let mut second: Option<(usize, f64)> = None;

    for (index, entry) in entries.iter().enumerate().filter(|(_, e)| e.is_final()) {
        let pt = entry.pt();
        match first {
            Some((_, best)) if pt <= best => {
                if second.map_or(true, |(_, runner_up)| pt > runner_up) {
                    second = Some((index, pt));
                }
            }
            _ => {
                second = first;
                first = Some((index, pt));
            }
        }
    }

    Some((first?.0, second?.0))
}

/// Cuts applied to the leading pair of every trial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcceptanceCuts {
    /// Process type; gamma-jet admits photons.
    pub process: ProcessType,
    /// Both leading particles must have pT strictly above this (GeV).
    pub min_pt: f64,
    /// Both leading particles must satisfy `|y| <` this.
    pub rapidity_window: f64,
    /// `(pT₀ − pT₁) / pT₀` must be strictly below this.
    pub balance_tolerance: f64,
}

impl AcceptanceCuts {
    /// Evaluates the cuts on one trial.
    ///
    /// On acceptance returns the indices of the leading pair (highest pT
    /// first) and their flavours.
    pub fn evaluate(&self, entries: &[EventEntry]) -> Result<([usize; 2], [Flavour; 2]), Rejection> {
        let (lead, sub) = leading_pair(entries).ok_or(Rejection::MissingPair)?;
        let pair = [&entries[lead], &entries[sub]];

        let flavours = [self.flavour_of(pair[0])?, self.flavour_of(pair[1])?];
        if self.process == ProcessType::GammaJet && !flavours.iter().any(|f| f.is_photon()) {
            return Err(Rejection::NoPhoton);
        }

        if pair.iter().any(|entry| entry.pt() <= self.min_pt) {
            return Err(Rejection::BelowMinimumPt);
        }
        if pair
            .iter()
            .any(|entry| !(entry.rapidity().abs() < self.rapidity_window))
        {
            return Err(Rejection::OutsideRapidityWindow);
        }

        let leading_pt = pair[0].pt();
        let imbalance = (leading_pt - pair[1].pt()) / leading_pt;
        if !(imbalance < self.balance_tolerance) {
            return Err(Rejection::Imbalance);
        }

        Ok(([lead, sub], flavours))
    }

    /// Returns `true` if the trial passes every cut.
    pub fn accepts(&self, entries: &[EventEntry]) -> bool {
        self.evaluate(entries).is_ok()
    }

    fn flavour_of(&self, entry: &EventEntry) -> Result<Flavour, Rejection> {
        let rejection = Rejection::Flavour {
            pdg_id: entry.pdg_id,
        };
        let flavour = Flavour::from_pdg_id(entry.pdg_id).map_err(|_| rejection)?;
        let allowed = match self.process {
            ProcessType::Dijet => flavour.is_quark() || flavour.is_gluon(),
            ProcessType::GammaJet => flavour.is_quark() || flavour.is_gluon() || flavour.is_photon(),
        };
        if allowed {
            Ok(flavour)
        } else {
            Err(rejection)
        }
    }
}
