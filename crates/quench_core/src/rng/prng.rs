//! Seeded pseudo-random number generator wrapper.

use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Upper bound (exclusive) for parton tags.
pub const TAG_RANGE: u64 = 1_000_000_000_000;

/// Golden-ratio increment used to spread derived stream seeds.
const STREAM_INCREMENT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Monte Carlo random number generator.
///
/// Wraps [`StdRng`] and keeps the seed for run metadata and logging.
///
/// # Examples
///
/// ```rust
/// use quench_core::rng::JetRng;
///
/// let mut a = JetRng::from_seed(42);
/// let mut b = JetRng::from_seed(42);
/// assert_eq!(a.gen_uniform(), b.gen_uniform());
/// assert_eq!(a.seed(), 42);
/// ```
#[derive(Clone, Debug)]
pub struct JetRng {
    inner: StdRng,
    seed: u64,
}

impl JetRng {
    /// Creates a generator initialised with the given seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a generator from operating-system entropy.
    ///
    /// The drawn seed is recorded so the run can be replayed.
    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().gen::<u64>();
        Self::from_seed(seed)
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns an independent generator for stream `stream`.
    ///
    /// The derived seed depends only on this generator's seed and the
    /// stream index, never on how many numbers have been drawn.
    pub fn derive(&self, stream: u64) -> Self {
        let seed = self.seed ^ stream.wrapping_add(1).wrapping_mul(STREAM_INCREMENT);
        Self::from_seed(seed)
    }

    /// Uniform value in `[0, 1)`.
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Standard normal variate.
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// Uniform value in `[low, high)`.
    ///
    /// Returns `low` when the interval is empty.
    #[inline]
    pub fn gen_range(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.inner.gen_range(low..high)
    }

    /// Uniform index in `0..n`, or `None` for `n == 0`.
    #[inline]
    pub fn gen_index(&mut self, n: usize) -> Option<usize> {
        if n == 0 {
            None
        } else {
            Some(self.inner.gen_range(0..n))
        }
    }

    /// Bernoulli trial with success probability `p`, clamped to `[0, 1]`.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.inner.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Parton tag, uniform on `[0, 10¹²)`.
    #[inline]
    pub fn gen_tag(&mut self) -> u64 {
        self.inner.gen_range(0..TAG_RANGE)
    }

    /// Picks one of `choices` with probability proportional to its weight.
    ///
    /// Returns `None` when the slice is empty or the weights are invalid
    /// (negative, non-finite or all zero).
    pub fn choose_weighted<T: Copy>(&mut self, choices: &[(T, f64)]) -> Option<T> {
        let index = WeightedIndex::new(choices.iter().map(|(_, w)| *w)).ok()?;
        Some(choices[index.sample(&mut self.inner)].0)
    }

    /// Draws from an arbitrary distribution.
    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, distribution: &D) -> T {
        distribution.sample(&mut self.inner)
    }
}
