//! Power threshold from a permutation null distribution.
//!
//! Shuffling a series keeps its value distribution but destroys any
//! periodic structure. The largest periodogram power observed over many
//! shuffles bounds what noise alone produces; real peaks must exceed it.

use super::fft::SpectralEstimator;
use crate::error::{PeriodError, Result};
use crate::iter_maybe_parallel;
use rand::prelude::*;
use rand::rngs::StdRng;
#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// Source of independent random streams, one per shuffle iteration.
///
/// Every iteration asks for its own stream by index, so iterations can run
/// on any thread in any order and still reproduce the same shuffles.
pub trait RandomStreams: Sync {
    /// Generator type handed to each iteration.
    type Rng: Rng;

    /// Random stream for iteration `index`.
    fn stream(&self, index: usize) -> Self::Rng;
}

/// Streams derived from a master seed: stream `i` is a `StdRng` seeded
/// with `seed + i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededStreams {
    seed: u64,
}

impl SeededStreams {
    /// Streams derived from a fixed master seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Streams derived from a master seed drawn from the OS.
    pub fn from_entropy() -> Self {
        Self {
            seed: StdRng::from_entropy().gen(),
        }
    }

    /// Streams for an optional seed; `None` draws one from the OS.
    pub fn from_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// The master seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomStreams for SeededStreams {
    type Rng = StdRng;

    fn stream(&self, index: usize) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_add(index as u64))
    }
}

/// Estimate the periodogram power threshold by permutation.
///
/// For each of `n_iter` iterations a fresh copy of `series` is shuffled with
/// that iteration's random stream and its maximum periodogram power is
/// recorded. The threshold is the largest of these maxima, i.e. the
/// empirical `1 - 1/n_iter` upper bound under the no-periodicity null.
///
/// # Arguments
/// * `series` - The (possibly detrended) series, not shuffled
/// * `n_iter` - Number of permutations (must be positive)
/// * `streams` - Random stream source
///
/// # Example
/// ```
/// use autoperiod::detection::{power_threshold, SeededStreams};
///
/// let series: Vec<f64> = (0..64).map(|i| ((i * 13) % 7) as f64).collect();
/// let a = power_threshold(&series, 50, &SeededStreams::new(7)).unwrap();
/// let b = power_threshold(&series, 50, &SeededStreams::new(7)).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn power_threshold<S: RandomStreams>(series: &[f64], n_iter: usize, streams: &S) -> Result<f64> {
    let estimator = SpectralEstimator::new(series.len());
    power_threshold_with(&estimator, series, n_iter, streams)
}

/// [`power_threshold`] reusing an existing spectral estimator.
pub fn power_threshold_with<S: RandomStreams>(
    estimator: &SpectralEstimator,
    series: &[f64],
    n_iter: usize,
    streams: &S,
) -> Result<f64> {
    if n_iter == 0 {
        return Err(PeriodError::InvalidParameter(
            "n_iter must be at least 1".into(),
        ));
    }
    if estimator.len() != series.len() {
        return Err(PeriodError::InvalidParameter(format!(
            "estimator planned for length {}, series has length {}",
            estimator.len(),
            series.len()
        )));
    }

    let max_powers: Vec<f64> = iter_maybe_parallel!(0..n_iter)
        .map(|i| {
            let mut rng = streams.stream(i);
            let mut values = series.to_vec();
            values.shuffle(&mut rng);
            estimator.max_power(&values)
        })
        .collect();

    let threshold = max_powers.into_iter().fold(0.0, f64::max);
    if !threshold.is_finite() {
        return Err(PeriodError::ComputationError(
            "power threshold is not finite".into(),
        ));
    }
    Ok(threshold)
}
