//! Lazy enumeration of the per-draw sampling grid.
//!
//! One draw is expanded over azimuthal offsets × case configurations ×
//! outgoing particles. A [`GridRun`] is one (offset, configuration) pair;
//! hadronisation works on whole runs since it needs both partons.

use quench_core::math::angles::uniform_offsets;
use quench_core::types::ConfigurationError;

use super::{CaseConfig, CaseMatrix};

/// One (azimuthal offset, configuration) combination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridRun {
    /// Running index within the draw.
    pub run: usize,
    /// Index of the azimuthal offset.
    pub phi_index: usize,
    /// Azimuthal offset added to every particle of the draw.
    pub phi_offset: f64,
    /// Case configuration.
    pub config: CaseConfig,
}

/// One (offset, configuration, particle) tuple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPoint {
    /// The run this point belongs to.
    pub run: GridRun,
    /// Index of the outgoing particle.
    pub particle: usize,
}

/// Sampling grid for one draw.
///
/// Iteration is lazy and can be restarted any number of times.
///
/// # Examples
///
/// ```
/// use quench_engine::cases::{CaseMatrix, SamplingGrid};
///
/// let matrix = CaseMatrix::standard();
/// let grid = SamplingGrid::new(&matrix, 11, 2).unwrap();
/// assert_eq!(grid.points().count(), 11 * 8 * 2);
/// assert_eq!(grid.runs().count(), grid.len() / 2);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SamplingGrid<'a> {
    matrix: &'a CaseMatrix,
    num_phi: usize,
    num_particles: usize,
}

impl<'a> SamplingGrid<'a> {
    /// Creates the grid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if `num_phi` is zero.
    pub fn new(matrix: &'a CaseMatrix, num_phi: usize, num_particles: usize) -> Result<Self, ConfigurationError> {
        if num_phi == 0 {
            return Err(ConfigurationError::invalid("num_phi", "at least one offset is required"));
        }
        Ok(Self {
            matrix,
            num_phi,
            num_particles,
        })
    }

    /// Runs in order: offsets outer, configurations inner.
    pub fn runs(&self) -> impl Iterator<Item = GridRun> + Clone + 'a {
        let matrix = self.matrix;
        uniform_offsets(self.num_phi)
            .enumerate()
            .flat_map(move |(phi_index, phi_offset)| {
                matrix.configs().map(move |config| (phi_index, phi_offset, config))
            })
            .enumerate()
            .map(|(run, (phi_index, phi_offset, config))| GridRun {
                run,
                phi_index,
                phi_offset,
                config,
            })
    }

    /// Every point in order: offsets, configurations, then particles.
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + Clone + 'a {
        let num_particles = self.num_particles;
        self.runs()
            .flat_map(move |run| (0..num_particles).map(move |particle| GridPoint { run, particle }))
    }

    /// Number of runs.
    pub fn num_runs(&self) -> usize {
        self.num_phi * self.matrix.len()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.num_runs() * self.num_particles
    }

    /// Returns `true` when the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quench_core::math::angles::TWO_PI;

    #[test]
    fn test_point_order_particles_innermost() {
        let matrix = CaseMatrix::standard();
        let grid = SamplingGrid::new(&matrix, 3, 2).unwrap();
        let points: Vec<_> = grid.points().take(4).collect();
        assert_eq!(points[0].particle, 0);
        assert_eq!(points[1].particle, 1);
        assert_eq!(points[0].run, points[1].run);
        assert_eq!(points[2].run.config.case, 1);
        assert_eq!(points[2].run.phi_index, 0);
    }

    #[test]
    fn test_run_indices_are_sequential() {
        let matrix = CaseMatrix::standard();
        let grid = SamplingGrid::new(&matrix, 11, 2).unwrap();
        let runs: Vec<_> = grid.runs().collect();
        assert_eq!(runs.len(), grid.num_runs());
        assert!(runs.iter().enumerate().all(|(i, run)| run.run == i));
        assert_relative_eq!(runs[8].phi_offset, TWO_PI / 11.0);
        assert_eq!(runs[8].phi_index, 1);
    }

    #[test]
    fn test_restart_yields_same_sequence() {
        let matrix = CaseMatrix::standard();
        let grid = SamplingGrid::new(&matrix, 5, 2).unwrap();
        let first: Vec<_> = grid.points().collect();
        let again: Vec<_> = grid.points().collect();
        assert_eq!(first, again);
        assert_eq!(first.len(), grid.len());
    }

    #[test]
    fn test_zero_offsets_rejected() {
        let matrix = CaseMatrix::standard();
        assert!(SamplingGrid::new(&matrix, 0, 2).is_err());
    }
}
