//! Linear detrending.

use crate::error::Result;
use crate::utils::ols::linregress_index;
use crate::utils::stats::mean;

/// Slopes at or below this magnitude are treated as noise.
pub const TREND_SLOPE_TOLERANCE: f64 = 1e-4;

/// Result of [`detrend_linear`].
#[derive(Debug, Clone)]
pub struct Detrended {
    /// The detrended (or demeaned) values.
    pub values: Vec<f64>,
    /// Slope of the least-squares line through `(index, value)`.
    pub slope: f64,
    /// Intercept of the least-squares line.
    pub intercept: f64,
    /// Mean of the input series.
    pub mean: f64,
    /// Whether the line was subtracted (otherwise only the mean was).
    pub trend_removed: bool,
}

/// Remove a linear trend from a series.
///
/// Fits an ordinary least-squares line to `(index, value)`. When the slope
/// magnitude exceeds [`TREND_SLOPE_TOLERANCE`] the fitted line is
/// subtracted; otherwise only the series mean is subtracted.
///
/// # Arguments
/// * `series` - Input time series (at least two samples)
///
/// # Example
/// ```
/// use autoperiod::transform::detrend_linear;
///
/// let series: Vec<f64> = (0..10).map(|i| 2.0 + 0.5 * i as f64).collect();
/// let result = detrend_linear(&series).unwrap();
///
/// assert!(result.trend_removed);
/// assert!(result.values.iter().all(|v| v.abs() < 1e-10));
/// ```
pub fn detrend_linear(series: &[f64]) -> Result<Detrended> {
    let fit = linregress_index(series)?;
    let m = mean(series);
    let trend_removed = fit.slope.abs() > TREND_SLOPE_TOLERANCE;

    let values = if trend_removed {
        series
            .iter()
            .enumerate()
            .map(|(i, &y)| y - fit.predict(i as f64))
            .collect()
    } else {
        series.iter().map(|&y| y - m).collect()
    };

    Ok(Detrended {
        values,
        slope: fit.slope,
        intercept: fit.intercept,
        mean: m,
        trend_removed,
    })
}
