//! Autocorrelation of a time series.
//!
//! Provides the full autocorrelation function used to validate period
//! hints, plus a direct single-lag estimate.

use crate::utils::stats::mean;
use rustfft::{num_complex::Complex64, FftPlanner};

/// Returns the autocorrelation at a specific lag.
///
/// Biased estimator: the lagged covariance is divided by the full series
/// length, so values shrink towards zero for long lags.
///
/// # Arguments
/// * `series` - Input time series
/// * `lag` - Lag value
pub fn autocorrelation(series: &[f64], lag: usize) -> f64 {
    if series.len() <= lag {
        return f64::NAN;
    }

    let m = mean(series);

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, &x) in series.iter().enumerate() {
        denominator += (x - m).powi(2);
        if i >= lag {
            numerator += (x - m) * (series[i - lag] - m);
        }
    }

    if denominator == 0.0 {
        return 0.0;
    }

    numerator / denominator
}

/// Returns the autocorrelation function for lags `0..N`.
///
/// Computed through a zero-padded FFT (Wiener–Khinchin), so the cost is
/// `O(N log N)` instead of `O(N²)`. Lag 0 is exactly 1. A zero-variance
/// series yields all zeros.
///
/// # Arguments
/// * `series` - Input time series
///
/// # Example
/// ```
/// use autoperiod::features::acf;
///
/// let series: Vec<f64> = (0..64)
///     .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 8.0).sin())
///     .collect();
/// let r = acf(&series);
/// assert_eq!(r.len(), 64);
/// assert!(r[8] > r[4]);
/// ```
pub fn acf(series: &[f64]) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }

    let m = mean(series);
    let padded_len = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex64> = series
        .iter()
        .map(|&x| Complex64::new(x - m, 0.0))
        .chain(std::iter::repeat(Complex64::new(0.0, 0.0)))
        .take(padded_len)
        .collect();

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(padded_len).process(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex64::new(c.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(padded_len).process(&mut buffer);

    // Inverse transform is unnormalized; the scale cancels in the ratio
    let c0 = buffer[0].re;
    if c0 == 0.0 {
        return vec![0.0; n];
    }

    let mut result: Vec<f64> = buffer.iter().take(n).map(|c| c.re / c0).collect();
    result[0] = 1.0;
    result
}
