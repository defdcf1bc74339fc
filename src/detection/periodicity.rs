//! Periodicity detection algorithms.
//!
//! This module provides:
//! - [`Autoperiod`]: periodogram hints above a permutation power threshold,
//!   validated as hills of the autocorrelation function (Vlachos et al. 2005)
//! - [`PeakCountDetector`]: series length divided by the number of peaks,
//!   also used by [`Autoperiod`] as an optional fallback

use super::fft::{PeriodogramPoint, SpectralEstimator};
use super::observer::{DetectionEvent, DetectionObserver, RejectReason, TracingObserver};
use super::threshold::{power_threshold_with, SeededStreams};
use crate::error::{validate_series, PeriodError, Result};
use crate::features::{acf, peak_count_period};
use crate::transform::detrend_linear;
use crate::utils::ols::{linregress, LinearFit};
use crate::utils::optimization::{minimize_bounded, BoundedConfig};
use crate::utils::stats::argmax;
use std::borrow::Cow;

/// A periodogram bin whose power exceeds the threshold.
pub type CandidateHint = PeriodogramPoint;

/// Period reported when no periodicity is found.
pub const NO_PERIOD: usize = 1;

/// Source of a detected period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSource {
    /// Periodogram hint validated on the autocorrelation function
    Hybrid,
    /// Peak-count estimate
    PeakCount,
    /// Nothing detected; the period is the sentinel [`NO_PERIOD`]
    None,
}

/// Result of periodicity detection
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodResult {
    /// Detected periods, strongest first. Never empty; `[1]` means no
    /// periodicity was found.
    pub periods: Vec<usize>,
    /// Which method produced the periods
    pub source: PeriodSource,
    /// Power threshold used for the hints, if a periodogram was involved
    pub threshold: Option<f64>,
    /// Candidate hints in the order they were validated
    pub hints: Vec<CandidateHint>,
}

impl PeriodResult {
    fn sentinel() -> Self {
        Self {
            periods: vec![NO_PERIOD],
            source: PeriodSource::None,
            threshold: None,
            hints: Vec::new(),
        }
    }

    /// The primary (strongest) period.
    pub fn period(&self) -> usize {
        self.periods.first().copied().unwrap_or(NO_PERIOD)
    }

    /// Check if any periodicity was detected
    pub fn is_periodic(&self) -> bool {
        self.period() > NO_PERIOD
    }
}

/// Trait for periodicity detectors
pub trait PeriodicityDetector {
    /// Detect periodicity in the given time series
    fn detect(&self, series: &[f64]) -> Result<PeriodResult>;

    /// Get the name of this detection method
    fn name(&self) -> &'static str;
}

// ============================================================================
// Candidate extraction
// ============================================================================

/// Collect periodogram bins above `threshold` as period hints.
///
/// Only bins in `[2, N/2)` are considered: bins 0 and 1 imply no period or
/// one as long as the series, and the Nyquist bin is excluded. Hints are
/// sorted by power, highest first; equal powers keep the lower bin first.
pub fn candidate_hints(periodogram: &[PeriodogramPoint], threshold: f64) -> Vec<CandidateHint> {
    let nyquist = periodogram.len().saturating_sub(1);
    let mut hints: Vec<CandidateHint> = periodogram
        .iter()
        .filter(|p| p.bin >= 2 && p.bin < nyquist && p.power > threshold)
        .copied()
        .collect();

    hints.sort_by(|a, b| {
        b.power
            .partial_cmp(&a.power)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.bin.cmp(&b.bin))
    });
    hints
}

// ============================================================================
// ACF validation
// ============================================================================

/// Inclusive range of ACF lags searched for a hint's hill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationWindow {
    /// First lag of the window
    pub begin: usize,
    /// Last lag of the window (inclusive)
    pub end: usize,
}

impl ValidationWindow {
    /// Minimum distance between `begin` and `end`.
    pub const MIN_SPAN: usize = 4;

    /// Smallest lag a window may contain.
    pub const MIN_LAG: usize = 2;

    /// Window for bin `k` of a length-`n` series.
    ///
    /// Spans from halfway between the lags of bins `k+1` and `k` to halfway
    /// between the lags of bins `k` and `k-1`, clamped to lags `[2, n-2]`
    /// and widened symmetrically inside those bounds until it covers at
    /// least [`Self::MIN_SPAN`] lags. Lags 0 and 1 never enter a window, so
    /// an accepted period can not collide with the no-period sentinel.
    ///
    /// Returns `None` for `k < 2` or when `[2, n-2]` is too narrow to hold
    /// such a window.
    pub fn for_bin(n: usize, k: usize) -> Option<Self> {
        if k < 2 || n < Self::MIN_LAG + Self::MIN_SPAN + 2 {
            return None;
        }
        let nf = n as f64;
        let kf = k as f64;
        let first = Self::MIN_LAG;
        let last = n - 2;

        let raw_begin = (((nf / (kf + 1.0) + nf / kf) / 2.0).floor() as usize).saturating_sub(1);
        let raw_end = ((nf / kf + nf / (kf - 1.0)) / 2.0).floor() as usize + 1;
        let mut end = raw_end.clamp(first, last);
        let mut begin = raw_begin.clamp(first, end);

        while end - begin < Self::MIN_SPAN {
            let mut moved = false;
            if begin > first {
                begin -= 1;
                moved = true;
            }
            if end < last {
                end += 1;
                moved = true;
            }
            if !moved {
                return None;
            }
        }

        Some(Self { begin, end })
    }

    /// Number of lags in the window.
    pub fn len(&self) -> usize {
        self.end - self.begin + 1
    }

    /// Always false: a window holds at least `MIN_SPAN + 1` lags.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Two lines fitted left and right of a split point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFit {
    /// Number of points in the left segment
    pub split: usize,
    /// Fit of the left segment
    pub left: LinearFit,
    /// Fit of the right segment
    pub right: LinearFit,
    /// Summed absolute residuals of both fits
    pub error: f64,
}

/// Fit independent lines to `(x, y)[..split]` and `(x, y)[split..]`.
///
/// Both segments need at least two points.
pub fn two_segment_fit(x: &[f64], y: &[f64], split: usize) -> Result<SegmentFit> {
    if split > x.len() || x.len() != y.len() {
        return Err(PeriodError::InvalidParameter(format!(
            "split {} outside of {} points",
            split,
            x.len()
        )));
    }
    let (x_left, x_right) = x.split_at(split);
    let (y_left, y_right) = y.split_at(split);

    let left = linregress(x_left, y_left)?;
    let right = linregress(x_right, y_right)?;
    let error = left.abs_residual_sum(x_left, y_left) + right.abs_residual_sum(x_right, y_right);

    Ok(SegmentFit {
        split,
        left,
        right,
        error,
    })
}

/// Shape of the ACF around a candidate lag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AcfShape {
    /// Rising then falling; `steepness` is the sum of absolute slopes
    Hill { steepness: f64 },
    /// Falling then rising
    Valley,
    /// Any other slope combination
    Ambiguous,
}

impl SegmentFit {
    /// Classify the pair of slopes.
    pub fn shape(&self) -> AcfShape {
        let l = self.left.slope;
        let r = self.right.slope;
        if l < 0.0 && r > 0.0 {
            AcfShape::Valley
        } else if l > 0.0 && r < 0.0 {
            AcfShape::Hill {
                steepness: l.abs() + r.abs(),
            }
        } else {
            AcfShape::Ambiguous
        }
    }
}

/// Find the split of `acf[window]` minimizing the two-segment fit error.
///
/// Bounded search over `t ∈ [2, len - 3]`, rounding `t` to the nearest lag
/// for each evaluation.
fn best_split(acf: &[f64], window: ValidationWindow, hint: &CandidateHint) -> Result<SegmentFit> {
    let x: Vec<f64> = (window.begin..=window.end).map(|i| i as f64).collect();
    let y = &acf[window.begin..=window.end];
    let upper = (x.len() - 3) as f64;

    let failure = |reason: &str| PeriodError::OptimizationFailure {
        bin: hint.bin,
        frequency: hint.frequency,
        power: hint.power,
        reason: reason.to_string(),
    };

    let result = minimize_bounded(
        |t| {
            let split = t.round_ties_even() as usize;
            match two_segment_fit(&x, y, split) {
                Ok(fit) => (fit.error, Some(fit)),
                Err(_) => (f64::NAN, None),
            }
        },
        (2.0, upper),
        BoundedConfig {
            max_iter: 500,
            xatol: 1e-8,
        },
    )
    .ok_or_else(|| failure("invalid search bounds"))?;

    if !result.converged {
        return Err(failure("search did not converge"));
    }
    if !result.optimal_value.is_finite() {
        return Err(failure("non-finite fitting error"));
    }
    result
        .payload
        .ok_or_else(|| failure("no segment fit at the optimum"))
}

/// Validate hints on the autocorrelation function.
///
/// Each hint is accepted when the ACF around its lag forms a hill at least
/// `hill_steepness` steep; the reported period is the lag of the ACF maximum
/// inside the hint's window. With `return_count <= 1` validation stops at
/// the first accepted hint. Duplicate periods are collapsed; at most
/// `return_count` periods are returned, in hint order. Returns `[1]` if
/// nothing is accepted.
///
/// # Arguments
/// * `acf` - Autocorrelation function for lags `0..N`
/// * `hints` - Candidate hints, strongest first
/// * `hill_steepness` - Minimum summed absolute slope of an accepted hill
/// * `return_count` - Maximum number of periods to return
/// * `observer` - Receiver for per-hint events
pub fn validate_hints(
    acf: &[f64],
    hints: &[CandidateHint],
    hill_steepness: f64,
    return_count: usize,
    observer: &dyn DetectionObserver,
) -> Result<Vec<usize>> {
    let n = acf.len();
    let mut periods: Vec<usize> = Vec::new();

    for hint in hints {
        let window = match ValidationWindow::for_bin(n, hint.bin) {
            Some(window) => window,
            None => {
                let reason = if hint.bin < 2 {
                    RejectReason::BinTooLow
                } else {
                    RejectReason::WindowTooNarrow
                };
                observer.on_event(&DetectionEvent::HintRejected {
                    hint: *hint,
                    reason,
                });
                continue;
            }
        };

        let fit = best_split(acf, window, hint)?;

        let reason = match fit.shape() {
            AcfShape::Valley => RejectReason::Valley,
            AcfShape::Hill { steepness } if steepness < hill_steepness => {
                RejectReason::InsufficientSteepness { steepness }
            }
            AcfShape::Hill { .. } => {
                let offset = argmax(&acf[window.begin..=window.end]).unwrap_or(0);
                let period = window.begin + offset;
                observer.on_event(&DetectionEvent::HillAccepted {
                    hint: *hint,
                    begin: window.begin,
                    end: window.end,
                    split: window.begin + fit.split,
                    period,
                });
                if !periods.contains(&period) {
                    periods.push(period);
                }
                if return_count <= 1 {
                    break;
                }
                continue;
            }
            AcfShape::Ambiguous => RejectReason::Ambiguous,
        };
        observer.on_event(&DetectionEvent::HintRejected {
            hint: *hint,
            reason,
        });
    }

    if periods.is_empty() {
        return Ok(vec![NO_PERIOD]);
    }
    periods.truncate(return_count.max(1));
    Ok(periods)
}

// ============================================================================
// Autoperiod Detector
// ============================================================================

/// Configuration for [`Autoperiod`].
#[derive(Debug, Clone, PartialEq)]
pub struct AutoperiodConfig {
    /// Number of shuffles used for the power threshold
    pub n_iter: usize,
    /// Seed for the shuffles (`None` draws one from the OS)
    pub seed: Option<u64>,
    /// Remove a linear trend before analysis
    pub detrend: bool,
    /// Use the peak-count estimate when no hint is validated
    pub use_peak_fallback: bool,
    /// Peak support for the fallback
    pub peak_fallback_n: usize,
    /// Minimum summed absolute slope of an accepted ACF hill
    pub hill_steepness: f64,
    /// Maximum number of periods to return
    pub return_count: usize,
}

impl Default for AutoperiodConfig {
    fn default() -> Self {
        Self {
            n_iter: 100,
            seed: None,
            detrend: false,
            use_peak_fallback: false,
            peak_fallback_n: 100,
            hill_steepness: 0.0,
            return_count: 1,
        }
    }
}

impl AutoperiodConfig {
    /// Set the number of threshold shuffles
    pub fn with_n_iter(mut self, n_iter: usize) -> Self {
        self.n_iter = n_iter;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable detrending
    pub fn with_detrend(mut self, detrend: bool) -> Self {
        self.detrend = detrend;
        self
    }

    /// Enable the peak-count fallback with the given support
    pub fn with_peak_fallback(mut self, support: usize) -> Self {
        self.use_peak_fallback = true;
        self.peak_fallback_n = support;
        self
    }

    /// Set the minimum hill steepness
    pub fn with_hill_steepness(mut self, steepness: f64) -> Self {
        self.hill_steepness = steepness;
        self
    }

    /// Set the maximum number of returned periods
    pub fn with_return_count(mut self, count: usize) -> Self {
        self.return_count = count;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.n_iter == 0 {
            return Err(PeriodError::InvalidParameter(
                "n_iter must be at least 1".into(),
            ));
        }
        if self.hill_steepness.is_nan() {
            return Err(PeriodError::InvalidParameter(
                "hill_steepness must not be NaN".into(),
            ));
        }
        Ok(())
    }
}

/// Autoperiod detector (Vlachos et al. 2005).
///
/// Hybrid method that uses the periodogram to find candidate periods and
/// validates them on the autocorrelation function.
///
/// Algorithm:
/// 1. Optionally remove a linear trend
/// 2. Estimate a power threshold from shuffled copies of the series
/// 3. Take periodogram bins above the threshold as hints
/// 4. Accept hints whose ACF neighbourhood is a hill (two-segment fit) and
///    report the ACF maximum in that neighbourhood
/// 5. Optionally fall back to peak counting when nothing is accepted
///
/// Reference: "On Periodicity Detection and Structural Periodic Similarity"
/// Vlachos, Yu, Castelli (SDM 2005)
///
/// # Example
/// ```
/// use autoperiod::detection::{Autoperiod, AutoperiodConfig, PeriodicityDetector};
///
/// let series: Vec<f64> = (0..400)
///     .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 20.0).sin())
///     .collect();
/// let detector = Autoperiod::new(AutoperiodConfig::default().with_seed(42));
/// let result = detector.detect(&series).unwrap();
/// assert_eq!(result.period(), 20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Autoperiod {
    config: AutoperiodConfig,
}

impl Autoperiod {
    /// Create a detector with the given configuration
    pub fn new(config: AutoperiodConfig) -> Self {
        Self { config }
    }

    /// The detector's configuration
    pub fn config(&self) -> &AutoperiodConfig {
        &self.config
    }

    /// Detect periodicity, reporting each step to `observer`.
    pub fn detect_observed(
        &self,
        series: &[f64],
        observer: &dyn DetectionObserver,
    ) -> Result<PeriodResult> {
        validate_series(series)?;
        self.config.validate()?;
        let config = &self.config;

        let data: Cow<[f64]> = if config.detrend {
            let detrended = detrend_linear(series)?;
            if detrended.trend_removed {
                observer.on_event(&DetectionEvent::Detrended {
                    slope: detrended.slope,
                    intercept: detrended.intercept,
                });
            } else {
                observer.on_event(&DetectionEvent::MeanRemoved {
                    slope: detrended.slope,
                    mean: detrended.mean,
                });
            }
            Cow::Owned(detrended.values)
        } else {
            Cow::Borrowed(series)
        };

        let estimator = SpectralEstimator::new(data.len());
        let streams = SeededStreams::from_option(config.seed);
        let threshold = power_threshold_with(&estimator, &data, config.n_iter, &streams)?;
        observer.on_event(&DetectionEvent::ThresholdEstimated {
            threshold,
            n_iter: config.n_iter,
        });

        let hints = candidate_hints(&estimator.periodogram(&data), threshold);
        for hint in &hints {
            observer.on_event(&DetectionEvent::HintFound { hint: *hint });
        }

        let mut periods = if hints.is_empty() {
            vec![NO_PERIOD]
        } else {
            validate_hints(
                &acf(&data),
                &hints,
                config.hill_steepness,
                config.return_count,
                observer,
            )?
        };

        let mut source = if periods.first() == Some(&NO_PERIOD) {
            PeriodSource::None
        } else {
            PeriodSource::Hybrid
        };

        if source == PeriodSource::None && config.use_peak_fallback {
            let period = peak_count_period(&data, config.peak_fallback_n);
            observer.on_event(&DetectionEvent::FallbackUsed {
                support: config.peak_fallback_n,
                period,
            });
            periods = vec![period];
            if period > NO_PERIOD {
                source = PeriodSource::PeakCount;
            }
        }

        observer.on_event(&DetectionEvent::PeriodsChosen {
            periods: periods.clone(),
        });

        Ok(PeriodResult {
            periods,
            source,
            threshold: Some(threshold),
            hints,
        })
    }
}

impl PeriodicityDetector for Autoperiod {
    fn detect(&self, series: &[f64]) -> Result<PeriodResult> {
        self.detect_observed(series, &TracingObserver)
    }

    fn name(&self) -> &'static str {
        "Autoperiod"
    }
}

// ============================================================================
// Peak-Count Detector
// ============================================================================

/// Peak-count period estimator.
///
/// Estimates the period as the series length divided by the number of
/// peaks of the given support. Returns the sentinel period 1 when the
/// series has no such peak.
#[derive(Debug, Clone)]
pub struct PeakCountDetector {
    /// Required peak support (neighbours on each side)
    pub support: usize,
}

impl Default for PeakCountDetector {
    fn default() -> Self {
        Self { support: 100 }
    }
}

impl PeakCountDetector {
    /// Create a detector with the given peak support
    pub fn new(support: usize) -> Self {
        Self { support }
    }
}

impl PeriodicityDetector for PeakCountDetector {
    fn detect(&self, series: &[f64]) -> Result<PeriodResult> {
        validate_series(series)?;
        let period = peak_count_period(series, self.support);
        if period <= NO_PERIOD {
            return Ok(PeriodResult::sentinel());
        }
        Ok(PeriodResult {
            periods: vec![period],
            source: PeriodSource::PeakCount,
            threshold: None,
            hints: Vec::new(),
        })
    }

    fn name(&self) -> &'static str {
        "PeakCount"
    }
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Estimate the period of a series with the Autoperiod method.
///
/// # Errors
/// * [`PeriodError::InsufficientData`] for fewer than 8 samples
/// * [`PeriodError::NonFiniteValue`] for NaN or infinite samples
/// * [`PeriodError::InvalidParameter`] for an invalid configuration
/// * [`PeriodError::OptimizationFailure`] when a split-point search fails
pub fn estimate_period(series: &[f64], config: &AutoperiodConfig) -> Result<PeriodResult> {
    Autoperiod::new(config.clone()).detect(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::observer::NullObserver;
    use std::cell::RefCell;

    fn generate_sine(n: usize, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin())
            .collect()
    }

    fn generate_multi_sine(n: usize, periods: &[usize], amplitudes: &[f64]) -> Vec<f64> {
        (0..n)
            .map(|i| {
                periods
                    .iter()
                    .zip(amplitudes.iter())
                    .map(|(&p, &a)| a * (2.0 * std::f64::consts::PI * i as f64 / p as f64).sin())
                    .sum()
            })
            .collect()
    }

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<DetectionEvent>>,
    }

    impl DetectionObserver for Recorder {
        fn on_event(&self, event: &DetectionEvent) {
            self.events.borrow_mut().push(event.clone());
        }
    }

    fn point(bin: usize, n: usize, power: f64) -> PeriodogramPoint {
        PeriodogramPoint {
            bin,
            frequency: bin as f64 / n as f64,
            power,
        }
    }

    // ============================================================================
    // Candidate extraction tests
    // ============================================================================

    #[test]
    fn candidate_scan_excludes_low_bins_and_nyquist() {
        // N = 16: bins 0..=8, everything above the threshold
        let psd: Vec<PeriodogramPoint> = (0..=8).map(|k| point(k, 16, 10.0)).collect();
        let hints = candidate_hints(&psd, 1.0);

        let bins: Vec<usize> = hints.iter().map(|h| h.bin).collect();
        assert_eq!(bins, vec![2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn candidate_scan_odd_length() {
        // N = 15: bins 0..=7, N/2 = 7 is excluded as well
        let psd: Vec<PeriodogramPoint> = (0..=7).map(|k| point(k, 15, 10.0)).collect();
        let bins: Vec<usize> = candidate_hints(&psd, 1.0).iter().map(|h| h.bin).collect();
        assert_eq!(bins, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn candidates_sorted_by_power_then_bin() {
        let psd = vec![
            point(0, 20, 100.0),
            point(1, 20, 100.0),
            point(2, 20, 3.0),
            point(3, 20, 9.0),
            point(4, 20, 5.0),
            point(5, 20, 9.0),
            point(6, 20, 0.5),
            point(7, 20, 2.0),
            point(8, 20, 7.0),
            point(9, 20, 1.0),
            point(10, 20, 50.0),
        ];
        let hints = candidate_hints(&psd, 2.0);
        let bins: Vec<usize> = hints.iter().map(|h| h.bin).collect();

        // Bin 7 equals the threshold and is not strictly above it
        assert_eq!(bins, vec![3, 5, 8, 4, 2]);
    }

    #[test]
    fn candidates_empty_when_nothing_exceeds() {
        let psd: Vec<PeriodogramPoint> = (0..=10).map(|k| point(k, 20, 1.0)).collect();
        assert!(candidate_hints(&psd, 1.0).is_empty());
    }

    // ============================================================================
    // Validation window tests
    // ============================================================================

    #[test]
    fn window_for_exact_bin() {
        // N = 1000, k = 20 (period 50): lags between 47.6 and 52.6
        let window = ValidationWindow::for_bin(1000, 20).unwrap();
        assert_eq!(window, ValidationWindow { begin: 47, end: 52 });
        assert_eq!(window.len(), 6);
    }

    #[test]
    fn window_widened_to_min_span() {
        // N = 240, k = 20: raw window [10, 13] is widened to [9, 14]
        let window = ValidationWindow::for_bin(240, 20).unwrap();
        assert_eq!(window, ValidationWindow { begin: 9, end: 14 });
    }

    #[test]
    fn window_stays_inside_series() {
        for n in 8..64 {
            for k in 2..n / 2 {
                let window = ValidationWindow::for_bin(n, k).unwrap();
                assert!(
                    window.begin >= 2 && window.end <= n - 2,
                    "n={} k={} gave {:?}",
                    n,
                    k,
                    window
                );
                assert!(window.end - window.begin >= ValidationWindow::MIN_SPAN);
            }
        }
    }

    #[test]
    fn window_never_reaches_lags_zero_and_one() {
        // Raw windows for these bins start at lag 0 or 1
        assert_eq!(
            ValidationWindow::for_bin(36, 12),
            Some(ValidationWindow { begin: 2, end: 6 })
        );
        assert_eq!(
            ValidationWindow::for_bin(36, 9),
            Some(ValidationWindow { begin: 2, end: 6 })
        );
        assert_eq!(
            ValidationWindow::for_bin(8, 3),
            Some(ValidationWindow { begin: 2, end: 6 })
        );
    }

    #[test]
    fn window_needs_room_between_lag_two_and_n_minus_two() {
        assert!(ValidationWindow::for_bin(7, 2).is_none());
        assert!(ValidationWindow::for_bin(8, 2).is_some());
    }

    #[test]
    fn window_rejects_low_bins() {
        assert!(ValidationWindow::for_bin(100, 0).is_none());
        assert!(ValidationWindow::for_bin(100, 1).is_none());
    }

    // ============================================================================
    // Two-segment fit tests
    // ============================================================================

    #[test]
    fn two_segment_fit_hill() {
        let x: Vec<f64> = (0..7).map(|i| i as f64).collect();
        let y = vec![0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0];
        let fit = two_segment_fit(&x, &y, 4).unwrap();

        assert!((fit.left.slope - 1.0).abs() < 1e-12);
        assert!((fit.right.slope + 1.0).abs() < 1e-12);
        assert!(fit.error < 1e-12);
        assert_eq!(fit.shape(), AcfShape::Hill { steepness: 2.0 });
    }

    #[test]
    fn two_segment_fit_valley_and_ambiguous() {
        let x: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let valley = vec![3.0, 2.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(two_segment_fit(&x, &valley, 3).unwrap().shape(), AcfShape::Valley);

        let rising = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(two_segment_fit(&x, &rising, 3).unwrap().shape(), AcfShape::Ambiguous);
    }

    #[test]
    fn two_segment_fit_rejects_tiny_segments() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 0.0, 1.0];
        assert!(two_segment_fit(&x, &y, 1).is_err());
        assert!(two_segment_fit(&x, &y, 5).is_err());
    }

    #[test]
    fn best_split_finds_the_corner() {
        // Piecewise-linear ACF-like curve with its corner at lag 13
        let mut acf = vec![0.0; 30];
        for (lag, v) in acf.iter_mut().enumerate() {
            *v = 1.0 - 0.1 * (lag as f64 - 13.0).abs();
        }
        let window = ValidationWindow { begin: 9, end: 18 };
        let hint = point(3, 40, 10.0);
        let fit = best_split(&acf, window, &hint).unwrap();

        // Points 9..=13 rise, 14..=18 fall; the corner may go either side
        assert!(fit.split == 4 || fit.split == 5, "split {}", fit.split);
        assert!(matches!(fit.shape(), AcfShape::Hill { .. }));
    }

    // ============================================================================
    // Hint validation tests
    // ============================================================================

    #[test]
    fn validate_hints_sentinel_without_hints() {
        let acf = crate::features::acf(&generate_sine(100, 10));
        let periods = validate_hints(&acf, &[], 0.0, 1, &NullObserver).unwrap();
        assert_eq!(periods, vec![NO_PERIOD]);
    }

    #[test]
    fn validate_hints_corrects_to_acf_maximum() {
        // Period 50 signal over 1000 samples; a hint at bin 20
        let series = generate_sine(1000, 50);
        let acf = crate::features::acf(&series);
        let hints = [point(20, 1000, 500.0)];
        let periods = validate_hints(&acf, &hints, 0.0, 1, &NullObserver).unwrap();
        assert_eq!(periods, vec![50]);
    }

    #[test]
    fn validate_hints_steepness_floor_rejects() {
        let series = generate_sine(1000, 50);
        let acf = crate::features::acf(&series);
        let hints = [point(20, 1000, 500.0)];
        let recorder = Recorder::default();
        let periods = validate_hints(&acf, &hints, 10.0, 1, &recorder).unwrap();

        assert_eq!(periods, vec![NO_PERIOD]);
        let events = recorder.events.borrow();
        assert!(matches!(
            events.last(),
            Some(DetectionEvent::HintRejected {
                reason: RejectReason::InsufficientSteepness { .. },
                ..
            })
        ));
    }

    #[test]
    fn validate_hints_rejects_low_bin() {
        let acf = crate::features::acf(&generate_sine(100, 10));
        let recorder = Recorder::default();
        let periods = validate_hints(&acf, &[point(1, 100, 5.0)], 0.0, 1, &recorder).unwrap();

        assert_eq!(periods, vec![NO_PERIOD]);
        assert!(matches!(
            recorder.events.borrow()[0],
            DetectionEvent::HintRejected {
                reason: RejectReason::BinTooLow,
                ..
            }
        ));
    }

    #[test]
    fn validate_hints_rejects_when_no_window_fits() {
        let acf = vec![1.0, 0.5, 0.2, -0.1, -0.3, -0.1, 0.2];
        let recorder = Recorder::default();
        let periods = validate_hints(&acf, &[point(2, 7, 5.0)], 0.0, 1, &recorder).unwrap();

        assert_eq!(periods, vec![NO_PERIOD]);
        assert!(matches!(
            recorder.events.borrow()[0],
            DetectionEvent::HintRejected {
                reason: RejectReason::WindowTooNarrow,
                ..
            }
        ));
    }

    #[test]
    fn validate_hints_fails_on_undefined_acf() {
        // Window for bin 2 of 100 lags is [40, 76]
        let mut acf = crate::features::acf(&generate_sine(100, 10));
        acf[50] = f64::NAN;
        let hints = [point(2, 100, 5.0), point(10, 100, 4.0)];
        let recorder = Recorder::default();
        let err = validate_hints(&acf, &hints, 0.0, 1, &recorder).unwrap_err();

        match err {
            PeriodError::OptimizationFailure { bin, power, .. } => {
                assert_eq!(bin, 2);
                assert_eq!(power, 5.0);
            }
            other => panic!("expected OptimizationFailure, got {:?}", other),
        }
        // The failing hint is not skipped in favour of the next one
        assert!(recorder.events.borrow().is_empty());
    }

    #[test]
    fn validate_hints_multiple_in_hint_order() {
        // Periods 20 and 100 over 1000 samples: bins 50 and 10
        let series = generate_multi_sine(1000, &[20, 100], &[1.0, 0.6]);
        let acf = crate::features::acf(&series);
        let hints = [point(50, 1000, 500.0), point(10, 1000, 180.0)];
        let periods = validate_hints(&acf, &hints, 0.0, 3, &NullObserver).unwrap();

        assert_eq!(periods.len(), 2);
        assert!((periods[0] as i64 - 20).abs() <= 1, "periods {:?}", periods);
        assert!((periods[1] as i64 - 100).abs() <= 1, "periods {:?}", periods);
    }

    #[test]
    fn validate_hints_collapses_duplicates() {
        let series = generate_sine(1000, 50);
        let acf = crate::features::acf(&series);
        let hints = [point(20, 1000, 500.0), point(20, 1000, 400.0)];
        let periods = validate_hints(&acf, &hints, 0.0, 5, &NullObserver).unwrap();
        assert_eq!(periods, vec![50]);
    }

    // ============================================================================
    // Autoperiod Tests
    // ============================================================================

    #[test]
    fn autoperiod_pure_sine() {
        let signal = generate_sine(240, 12);
        let detector = Autoperiod::new(AutoperiodConfig::default().with_seed(42));
        let result = detector.detect(&signal).unwrap();

        assert!(result.is_periodic());
        assert_eq!(result.period(), 12);
        assert_eq!(result.source, PeriodSource::Hybrid);
        assert!(result.threshold.unwrap() > 0.0);
        assert_eq!(detector.name(), "Autoperiod");
    }

    #[test]
    fn autoperiod_weekly_pattern() {
        let signal = generate_sine(140, 7);
        let result = estimate_period(&signal, &AutoperiodConfig::default().with_seed(7)).unwrap();

        let period = result.period();
        assert!(
            (6..=8).contains(&period),
            "Expected period near 7, got {}",
            period
        );
    }

    #[test]
    fn autoperiod_with_trend_and_detrend() {
        let n = 480;
        let signal: Vec<f64> = (0..n)
            .map(|i| 0.05 * i as f64 + 2.0 * (2.0 * std::f64::consts::PI * i as f64 / 24.0).sin())
            .collect();

        let config = AutoperiodConfig::default().with_seed(3).with_detrend(true);
        let recorder = Recorder::default();
        let result = Autoperiod::new(config)
            .detect_observed(&signal, &recorder)
            .unwrap();

        assert!((result.period() as i64 - 24).abs() <= 1, "got {}", result.period());
        assert!(matches!(
            recorder.events.borrow()[0],
            DetectionEvent::Detrended { .. }
        ));
    }

    #[test]
    fn autoperiod_return_multiple() {
        // 48 is a multiple of 12, so both components peak together at lag 48
        let signal = generate_multi_sine(1200, &[12, 48], &[1.0, 0.7]);
        let config = AutoperiodConfig::default()
            .with_seed(11)
            .with_return_count(2);
        let result = estimate_period(&signal, &config).unwrap();

        assert_eq!(result.periods.len(), 2, "periods {:?}", result.periods);
        assert!((result.periods[0] as i64 - 12).abs() <= 1);
        assert!((result.periods[1] as i64 - 48).abs() <= 1);
    }

    #[test]
    fn autoperiod_constant_is_sentinel() {
        let result =
            estimate_period(&[5.0; 200], &AutoperiodConfig::default().with_seed(1)).unwrap();

        assert_eq!(result.periods, vec![NO_PERIOD]);
        assert_eq!(result.source, PeriodSource::None);
        assert!(result.hints.is_empty());
        assert!(!result.is_periodic());
    }

    #[test]
    fn autoperiod_fallback_used_when_enabled() {
        // Constant series has no hints; the fallback finds no peaks either
        let config = AutoperiodConfig::default()
            .with_seed(1)
            .with_peak_fallback(2);
        let recorder = Recorder::default();
        let result = Autoperiod::new(config)
            .detect_observed(&[5.0; 64], &recorder)
            .unwrap();

        assert_eq!(result.period(), NO_PERIOD);
        assert_eq!(result.source, PeriodSource::None);
        assert!(recorder
            .events
            .borrow()
            .iter()
            .any(|e| matches!(e, DetectionEvent::FallbackUsed { period: 1, .. })));
    }

    #[test]
    fn autoperiod_short_series() {
        let err = estimate_period(&[1.0, 2.0, 3.0], &AutoperiodConfig::default()).unwrap_err();
        assert_eq!(err, PeriodError::InsufficientData { needed: 8, got: 3 });
        assert!(err.is_invalid_input());
    }

    #[test]
    fn autoperiod_non_finite() {
        let mut signal = generate_sine(64, 8);
        signal[10] = f64::NAN;
        let err = estimate_period(&signal, &AutoperiodConfig::default()).unwrap_err();
        assert_eq!(err, PeriodError::NonFiniteValue { index: 10 });
    }

    #[test]
    fn autoperiod_invalid_config() {
        let signal = generate_sine(64, 8);
        let err = estimate_period(&signal, &AutoperiodConfig::default().with_n_iter(0));
        assert!(matches!(err, Err(PeriodError::InvalidParameter(_))));

        let err = estimate_period(
            &signal,
            &AutoperiodConfig::default().with_hill_steepness(f64::NAN),
        );
        assert!(matches!(err, Err(PeriodError::InvalidParameter(_))));
    }

    #[test]
    fn autoperiod_reproducible() {
        let signal: Vec<f64> = generate_sine(300, 15)
            .iter()
            .enumerate()
            .map(|(i, v)| v + 0.3 * (((i * 7919) % 101) as f64 / 101.0 - 0.5))
            .collect();
        let config = AutoperiodConfig::default().with_seed(1234);
        let a = estimate_period(&signal, &config).unwrap();
        let b = estimate_period(&signal, &config).unwrap();

        assert_eq!(a, b);
        assert_eq!(
            a.threshold.unwrap().to_bits(),
            b.threshold.unwrap().to_bits()
        );
    }

    #[test]
    fn config_builders() {
        let config = AutoperiodConfig::default()
            .with_n_iter(50)
            .with_seed(9)
            .with_detrend(true)
            .with_peak_fallback(4)
            .with_hill_steepness(0.1)
            .with_return_count(3);

        assert_eq!(config.n_iter, 50);
        assert_eq!(config.seed, Some(9));
        assert!(config.detrend);
        assert!(config.use_peak_fallback);
        assert_eq!(config.peak_fallback_n, 4);
        assert_eq!(config.hill_steepness, 0.1);
        assert_eq!(config.return_count, 3);
        assert!(config.validate().is_ok());
    }

    // ============================================================================
    // PeakCountDetector Tests
    // ============================================================================

    #[test]
    fn peak_count_detector_spikes() {
        let series: Vec<f64> = (0..120)
            .map(|i| if i % 12 == 6 { 1.0 } else { 0.0 })
            .collect();
        let detector = PeakCountDetector::new(3);
        let result = detector.detect(&series).unwrap();

        assert_eq!(result.period(), 12);
        assert_eq!(result.source, PeriodSource::PeakCount);
        assert_eq!(detector.name(), "PeakCount");
    }

    #[test]
    fn peak_count_detector_monotonic_is_sentinel() {
        let series: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let result = PeakCountDetector::new(1).detect(&series).unwrap();
        assert_eq!(result.period(), NO_PERIOD);
        assert_eq!(result.source, PeriodSource::None);
    }
}
