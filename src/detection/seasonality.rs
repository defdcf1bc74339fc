//! Seasonality strength at the detected period.
//!
//! Scores how strongly a series repeats itself at multiples of its
//! Autoperiod estimate: the mean Pearson correlation between the series and
//! copies of itself shifted by `p, 2p, 3p, ...`.

use super::periodicity::{Autoperiod, AutoperiodConfig, PeriodicityDetector, NO_PERIOD};
use crate::error::{PeriodError, Result};
use crate::utils::stats::pearson_correlation;

/// Result of seasonality scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalityScore {
    /// Detected period (1 when none was found).
    pub period: usize,
    /// Mean lagged correlation, in `[-1, 1]`; 0 without a period.
    pub score: f64,
    /// Number of period multiples that contributed to the score.
    pub lags: usize,
}

impl SeasonalityScore {
    /// Check if a period was detected.
    pub fn is_seasonal(&self) -> bool {
        self.period > NO_PERIOD
    }

    /// Check if strong seasonality was detected.
    pub fn is_strong(&self) -> bool {
        self.score >= 0.7
    }

    /// Check if moderate or stronger seasonality was detected.
    pub fn is_moderate(&self) -> bool {
        self.score >= 0.4
    }
}

/// Configuration for seasonality scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonalityConfig {
    /// Configuration of the underlying period estimate.
    pub autoperiod: AutoperiodConfig,
    /// Only score the first `window` samples.
    pub window: Option<usize>,
}

impl SeasonalityConfig {
    /// Set the period estimator configuration.
    pub fn with_autoperiod(mut self, config: AutoperiodConfig) -> Self {
        self.autoperiod = config;
        self
    }

    /// Restrict scoring to the first `window` samples.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }
}

/// Mean lagged Pearson correlation at multiples of `period`.
///
/// Uses lags `period, 2 * period, ...` while `lag < len - period`, so every
/// correlated pair of segments holds more than `period` samples.
///
/// Returns the score and the number of lags.
pub fn lagged_correlation(series: &[f64], period: usize) -> Result<(f64, usize)> {
    let len = series.len();
    if period == 0 {
        return Err(PeriodError::InvalidParameter(
            "period must be positive".into(),
        ));
    }

    let mut total = 0.0;
    let mut lags = 0;
    let mut lag = period;
    while lag + period < len {
        let r = pearson_correlation(&series[lag..], &series[..len - lag]);
        if !r.is_finite() {
            return Err(PeriodError::ComputationError(format!(
                "correlation at lag {} is undefined (constant segment)",
                lag
            )));
        }
        total += r;
        lags += 1;
        lag += period;
    }

    if lags == 0 {
        return Err(PeriodError::DegenerateSeasonality { period, len });
    }
    Ok((total / lags as f64, lags))
}

/// Estimate the period of `series` and score its seasonality.
///
/// Without a detected period the result is `(1, 0.0)` with no lags.
///
/// # Example
/// ```
/// use autoperiod::detection::{seasonality_score, AutoperiodConfig, SeasonalityConfig};
///
/// let series: Vec<f64> = (0..240)
///     .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
///     .collect();
/// let config = SeasonalityConfig::default()
///     .with_autoperiod(AutoperiodConfig::default().with_seed(1));
/// let score = seasonality_score(&series, &config).unwrap();
///
/// assert_eq!(score.period, 12);
/// assert!(score.is_strong());
/// ```
pub fn seasonality_score(series: &[f64], config: &SeasonalityConfig) -> Result<SeasonalityScore> {
    let series = match config.window {
        Some(0) => {
            return Err(PeriodError::InvalidParameter(
                "window must be positive".into(),
            ))
        }
        Some(window) => &series[..window.min(series.len())],
        None => series,
    };

    let period = Autoperiod::new(config.autoperiod.clone())
        .detect(series)?
        .period();
    if period <= NO_PERIOD {
        return Ok(SeasonalityScore {
            period: NO_PERIOD,
            score: 0.0,
            lags: 0,
        });
    }

    let (score, lags) = lagged_correlation(series, period)?;
    Ok(SeasonalityScore {
        period,
        score,
        lags,
    })
}
