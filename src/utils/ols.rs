//! Ordinary Least Squares (OLS) for a single regressor.
//!
//! Used for the two-segment fits of the autocorrelation validator and for
//! linear detrending.

use crate::error::{PeriodError, Result};

/// Slope and intercept of a fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Slope of the fitted line.
    pub slope: f64,
    /// Intercept of the fitted line.
    pub intercept: f64,
}

impl LinearFit {
    /// Value of the line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Sum of absolute residuals of the line over the given points.
    pub fn abs_residual_sum(&self, x: &[f64], y: &[f64]) -> f64 {
        x.iter()
            .zip(y.iter())
            .map(|(&xi, &yi)| (yi - self.predict(xi)).abs())
            .sum()
    }
}

/// Fit `y = intercept + slope * x` by least squares.
///
/// # Arguments
/// * `x` - Regressor values (at least two distinct)
/// * `y` - Target values (same length as `x`)
///
/// # Example
/// ```
/// use autoperiod::utils::linregress;
///
/// let fit = linregress(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// ```
pub fn linregress(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(PeriodError::InvalidParameter(format!(
            "regressor and target lengths differ ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(PeriodError::InsufficientData { needed: 2, got: n });
    }

    let n_f64 = n as f64;
    let mean_x = x.iter().sum::<f64>() / n_f64;
    let mean_y = y.iter().sum::<f64>() / n_f64;

    let mut ss_xx = 0.0;
    let mut ss_xy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        ss_xx += dx * dx;
        ss_xy += dx * (yi - mean_y);
    }

    if ss_xx == 0.0 {
        return Err(PeriodError::ComputationError(
            "regressor has zero variance".into(),
        ));
    }

    let slope = ss_xy / ss_xx;
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Fit a line against the sample index `0, 1, 2, ...`.
pub fn linregress_index(y: &[f64]) -> Result<LinearFit> {
    let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
    linregress(&x, y)
}
