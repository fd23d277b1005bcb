//! Binned observables from parton rows.
//!
//! - Flow harmonics per pT bin: `ψₙ = atan2(Σ w sin nφ, Σ w cos nφ) / n` and
//!   `vₙ = Σ w cos n(φ − ψₙ) / Σ w`.
//! - Nuclear modification factor per pT bin: `R_AA = Σ w_f / Σ w_i`, with
//!   final hadron momenta weighted by the medium weight and vacuum hadron
//!   momenta weighted by the production weight.
//!
//! Rows are grouped by case variant before binning so different energy-loss
//! models are never mixed.

use quench_core::types::ConfigurationError;
use serde::{Deserialize, Serialize};

use crate::orchestrator::PartonRow;

/// Monotone pT bin edges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PtBins {
    edges: Vec<f64>,
}

impl PtBins {
    /// Bins from explicit edges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] unless there are at least two finite,
    /// strictly increasing edges.
    pub fn new(edges: Vec<f64>) -> Result<Self, ConfigurationError> {
        if edges.len() < 2 {
            return Err(ConfigurationError::invalid("pt_bins", "at least two edges are required"));
        }
        if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ConfigurationError::invalid(
                "pt_bins",
                "edges must be finite and strictly increasing",
            ));
        }
        Ok(Self { edges })
    }

    /// `count` equal-width bins on `[low, high)`.
    pub fn uniform(low: f64, high: f64, count: usize) -> Result<Self, ConfigurationError> {
        if count == 0 {
            return Err(ConfigurationError::invalid("pt_bins", "bin count must be positive"));
        }
        let width = (high - low) / count as f64;
        Self::new((0..=count).map(|i| low + width * i as f64).collect())
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    /// Always `false`; construction guarantees one bin.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// `(low, high)` of bin `index`.
    pub fn bounds(&self, index: usize) -> (f64, f64) {
        (self.edges[index], self.edges[index + 1])
    }

    /// Bin containing `pt`, half-open on the right.
    pub fn find(&self, pt: f64) -> Option<usize> {
        if !(pt >= self.edges[0] && pt < self.edges[self.edges.len() - 1]) {
            return None;
        }
        Some(self.edges.partition_point(|&edge| edge <= pt) - 1)
    }
}

/// Flow harmonic of one order in one bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowHarmonic {
    /// Harmonic order.
    pub order: u32,
    /// Bin lower edge.
    pub pt_low: f64,
    /// Bin upper edge.
    pub pt_high: f64,
    /// Summed weight in the bin.
    pub weight: f64,
    /// `vₙ`, `None` for an empty bin.
    pub vn: Option<f64>,
    /// `ψₙ`, `None` for an empty bin.
    pub psi_n: Option<f64>,
}

/// Weighted flow harmonics per bin.
///
/// `samples` yields `(pT, φ, weight)`. Samples outside the bins are ignored.
pub fn flow_harmonics<I>(samples: I, bins: &PtBins, orders: &[u32]) -> Vec<FlowHarmonic>
where
    I: IntoIterator<Item = (f64, f64, f64)>,
{
    let mut binned: Vec<Vec<(f64, f64)>> = vec![Vec::new(); bins.len()];
    for (pt, phi, weight) in samples {
        if let Some(index) = bins.find(pt) {
            binned[index].push((phi, weight));
        }
    }

    let mut harmonics = Vec::with_capacity(bins.len() * orders.len());
    for (index, entries) in binned.iter().enumerate() {
        let (pt_low, pt_high) = bins.bounds(index);
        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        for &order in orders {
            let n = order as f64;
            let (vn, psi_n) = if total > 0.0 && order > 0 {
                let (sin, cos) = entries.iter().fold((0.0, 0.0), |(s, c), &(phi, w)| {
                    (s + w * (n * phi).sin(), c + w * (n * phi).cos())
                });
                let psi = sin.atan2(cos) / n;
                let vn = entries
                    .iter()
                    .map(|&(phi, w)| w * (n * (phi - psi)).cos())
                    .sum::<f64>()
                    / total;
                (Some(vn), Some(psi))
            } else {
                (None, None)
            };
            harmonics.push(FlowHarmonic {
                order,
                pt_low,
                pt_high,
                weight: total,
                vn,
                psi_n,
            });
        }
    }
    harmonics
}

/// Nuclear modification factor in one bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaaBin {
    /// Bin lower edge.
    pub pt_low: f64,
    /// Bin upper edge.
    pub pt_high: f64,
    /// Summed final-state weight.
    pub weight_final: f64,
    /// Summed reference weight.
    pub weight_initial: f64,
    /// `weight_final / weight_initial`, `None` without reference weight.
    pub raa: Option<f64>,
}

/// Ratio of weighted final to reference pT histograms.
///
/// Both iterators yield `(pT, weight)`.
pub fn nuclear_modification<A, B>(final_state: A, reference: B, bins: &PtBins) -> Vec<RaaBin>
where
    A: IntoIterator<Item = (f64, f64)>,
    B: IntoIterator<Item = (f64, f64)>,
{
    let final_hist = histogram(final_state, bins);
    let reference_hist = histogram(reference, bins);

    final_hist
        .iter()
        .zip(reference_hist.iter())
        .enumerate()
        .map(|(index, (&weight_final, &weight_initial))| {
            let (pt_low, pt_high) = bins.bounds(index);
            RaaBin {
                pt_low,
                pt_high,
                weight_final,
                weight_initial,
                raa: (weight_initial > 0.0).then(|| weight_final / weight_initial),
            }
        })
        .collect()
}

fn histogram<I: IntoIterator<Item = (f64, f64)>>(samples: I, bins: &PtBins) -> Vec<f64> {
    let mut counts = vec![0.0; bins.len()];
    for (pt, weight) in samples {
        if let Some(index) = bins.find(pt) {
            counts[index] += weight;
        }
    }
    counts
}

/// Observables for one case variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseObservables {
    /// Physics case number.
    pub case: usize,
    /// Drift-strength multiplier.
    pub drift_multiplier: f64,
    /// Parton rows in the group.
    pub rows: usize,
    /// Flow harmonics of the medium-modified hadron momenta.
    pub flow: Vec<FlowHarmonic>,
    /// Nuclear modification factor.
    pub raa: Vec<RaaBin>,
}

/// Groups rows by case variant (in first-seen order) and computes the
/// observables of each group.
pub fn summarise_by_case(rows: &[PartonRow], bins: &PtBins, orders: &[u32]) -> Vec<CaseObservables> {
    let mut groups: Vec<((usize, f64), Vec<&PartonRow>)> = Vec::new();
    for row in rows {
        let key = (row.case, row.drift_multiplier);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(row),
            None => groups.push((key, vec![row])),
        }
    }

    groups
        .into_iter()
        .map(|((case, drift_multiplier), members)| CaseObservables {
            case,
            drift_multiplier,
            rows: members.len(),
            flow: flow_harmonics(
                members.iter().map(|r| (r.hadron_pt_f, r.phi_f, r.aa_weight)),
                bins,
                orders,
            ),
            raa: nuclear_modification(
                members.iter().map(|r| (r.hadron_pt_f, r.aa_weight)),
                members.iter().map(|r| (r.hadron_pt_0, r.weight)),
                bins,
            ),
        })
        .collect()
}
