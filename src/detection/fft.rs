//! FFT utilities for periodicity detection.
//!
//! Provides the one-sided periodogram (power spectral density against
//! discrete frequency bins) used both for the real series and for every
//! shuffled copy of it when estimating the power threshold.

use rustfft::{num_complex::Complex64, Fft, FftPlanner};
use std::sync::Arc;

/// A single bin of a periodogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodogramPoint {
    /// DFT bin index `k`, in `0..=N/2`.
    pub bin: usize,
    /// Frequency `k / N` in cycles per sample.
    pub frequency: f64,
    /// Power spectral density at this bin (non-negative).
    pub power: f64,
}

impl PeriodogramPoint {
    /// Period in samples implied by this bin (`N / k`), infinite for DC.
    pub fn period(&self) -> f64 {
        if self.frequency == 0.0 {
            f64::INFINITY
        } else {
            1.0 / self.frequency
        }
    }
}

/// Periodogram estimator for series of one fixed length.
///
/// Plans the forward FFT once; the plan is shared read-only, so one
/// estimator can serve many threads.
#[derive(Clone)]
pub struct SpectralEstimator {
    len: usize,
    fft: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for SpectralEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralEstimator")
            .field("len", &self.len)
            .finish()
    }
}

impl SpectralEstimator {
    /// Create an estimator for signals of length `len`.
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(len);
        Self { len, fft }
    }

    /// Signal length this estimator was planned for.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the planned length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Power for bins `0..=N/2` of a mean-removed signal.
    ///
    /// `|X_k|^2 / N`, doubled for every bin that has a mirrored negative
    /// frequency (all but DC and, for even N, Nyquist).
    fn powers(&self, signal: &[f64]) -> Vec<f64> {
        let n = self.len;
        if n == 0 || signal.len() != n {
            return Vec::new();
        }

        let m = signal.iter().sum::<f64>() / n as f64;
        let mut buffer: Vec<Complex64> = signal
            .iter()
            .map(|&x| Complex64::new(x - m, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        let n_f64 = n as f64;
        let half = n / 2;
        buffer
            .iter()
            .take(half + 1)
            .enumerate()
            .map(|(k, c)| {
                let power = c.norm_sqr() / n_f64;
                let mirrored = k > 0 && !(n % 2 == 0 && k == half);
                if mirrored {
                    2.0 * power
                } else {
                    power
                }
            })
            .collect()
    }

    /// Compute the periodogram of `signal`.
    ///
    /// Returns points for bins `0..=N/2` in bin order, or an empty vector if
    /// the signal length does not match the planned length.
    pub fn periodogram(&self, signal: &[f64]) -> Vec<PeriodogramPoint> {
        let n_f64 = self.len as f64;
        self.powers(signal)
            .into_iter()
            .enumerate()
            .map(|(bin, power)| PeriodogramPoint {
                bin,
                frequency: bin as f64 / n_f64,
                power,
            })
            .collect()
    }

    /// Largest power over all bins of `signal`'s periodogram.
    pub fn max_power(&self, signal: &[f64]) -> f64 {
        self.powers(signal).into_iter().fold(0.0, f64::max)
    }
}

/// Compute the one-sided periodogram of a signal.
///
/// Convenience wrapper planning a fresh [`SpectralEstimator`].
///
/// # Example
/// ```
/// use autoperiod::detection::periodogram;
///
/// let signal: Vec<f64> = (0..128)
///     .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 16.0).sin())
///     .collect();
/// let psd = periodogram(&signal);
///
/// let peak = psd
///     .iter()
///     .max_by(|a, b| a.power.partial_cmp(&b.power).unwrap())
///     .unwrap();
/// assert_eq!(peak.bin, 8);
/// ```
pub fn periodogram(signal: &[f64]) -> Vec<PeriodogramPoint> {
    if signal.is_empty() {
        return Vec::new();
    }
    SpectralEstimator::new(signal.len()).periodogram(signal)
}
