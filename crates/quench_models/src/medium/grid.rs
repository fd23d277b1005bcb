//! Regular square grid over the transverse plane.

use quench_core::types::ConfigurationError;

/// Values on a uniform square grid spanning `[-extent, extent]²`.
///
/// Stored row-major: `values[i * n + j] = f(xs[i], ys[j])`.
///
/// # Example
///
/// ```
/// use quench_models::medium::TransverseGrid;
///
/// let grid = TransverseGrid::from_fn(2.0, 1.0, |x, y| x + 2.0 * y).unwrap();
/// assert_eq!(grid.points_per_axis(), 5);
/// assert!((grid.interpolate(0.5, 0.25).unwrap() - 1.0).abs() < 1e-12);
/// assert!(grid.interpolate(3.0, 0.0).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct TransverseGrid {
    extent: f64,
    step: f64,
    n: usize,
    values: Vec<f64>,
}

impl TransverseGrid {
    /// Tabulates `f` on the grid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidParameter`] unless `extent` and
    /// `step` are positive and the grid has at least two points per axis.
    pub fn from_fn<F>(extent: f64, step: f64, f: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(f64, f64) -> f64,
    {
        if !(extent > 0.0 && extent.is_finite()) {
            return Err(ConfigurationError::invalid(
                "grid_extent",
                format!("must be positive, got {}", extent),
            ));
        }
        if !(step > 0.0 && step <= extent) {
            return Err(ConfigurationError::invalid(
                "grid_step",
                format!("must lie in (0, {}], got {}", extent, step),
            ));
        }

        let half = (extent / step).floor() as usize;
        let n = 2 * half + 1;
        let origin = -(half as f64) * step;
        let mut values = Vec::with_capacity(n * n);
        for i in 0..n {
            let x = origin + i as f64 * step;
            for j in 0..n {
                let y = origin + j as f64 * step;
                values.push(f(x, y));
            }
        }

        Ok(Self {
            extent: half as f64 * step,
            step,
            n,
            values,
        })
    }

    /// Number of points along each axis.
    #[inline]
    pub fn points_per_axis(&self) -> usize {
        self.n
    }

    /// Grid spacing.
    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Half-width of the covered square.
    #[inline]
    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Coordinate of grid line `i`.
    #[inline]
    pub fn coordinate(&self, i: usize) -> f64 {
        -self.extent + i as f64 * self.step
    }

    /// Iterates over `(x, y, value)` for every grid node.
    pub fn nodes(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.values.iter().enumerate().map(move |(k, &v)| {
            let (i, j) = (k / self.n, k % self.n);
            (self.coordinate(i), self.coordinate(j), v)
        })
    }

    /// Largest tabulated value.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Bilinear interpolation at `(x, y)`, or `None` outside the grid.
    pub fn interpolate(&self, x: f64, y: f64) -> Option<f64> {
        if !(x.abs() <= self.extent && y.abs() <= self.extent) {
            return None;
        }

        let u_raw = (x + self.extent) / self.step;
        let v_raw = (y + self.extent) / self.step;
        let i = (u_raw.floor() as usize).min(self.n - 2);
        let j = (v_raw.floor() as usize).min(self.n - 2);
        let u = u_raw - i as f64;
        let v = v_raw - j as f64;

        let z00 = self.values[i * self.n + j];
        let z10 = self.values[(i + 1) * self.n + j];
        let z01 = self.values[i * self.n + j + 1];
        let z11 = self.values[(i + 1) * self.n + j + 1];

        Some((1.0 - u) * (1.0 - v) * z00 + u * (1.0 - v) * z10 + (1.0 - u) * v * z01 + u * v * z11)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_on_nodes() {
        let grid = TransverseGrid::from_fn(3.0, 0.5, |x, y| x * x - y).unwrap();
        assert_relative_eq!(grid.interpolate(1.0, -0.5).unwrap(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(grid.interpolate(3.0, 3.0).unwrap(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_functions_reproduced() {
        let grid = TransverseGrid::from_fn(4.0, 0.3, |x, y| 2.0 * x - y + 1.0).unwrap();
        for &(x, y) in &[(0.11, -0.73), (-3.2, 2.05), (1.0, 1.0)] {
            assert_relative_eq!(grid.interpolate(x, y).unwrap(), 2.0 * x - y + 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_invalid_grid() {
        assert!(TransverseGrid::from_fn(0.0, 0.1, |_, _| 0.0).is_err());
        assert!(TransverseGrid::from_fn(1.0, 2.0, |_, _| 0.0).is_err());
        assert!(TransverseGrid::from_fn(1.0, -0.1, |_, _| 0.0).is_err());
    }

    #[test]
    fn test_outside_and_nan() {
        let grid = TransverseGrid::from_fn(1.0, 0.5, |_, _| 1.0).unwrap();
        assert!(grid.interpolate(1.01, 0.0).is_none());
        assert!(grid.interpolate(f64::NAN, 0.0).is_none());
    }
}
