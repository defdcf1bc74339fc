//! Error types for the autoperiod library.

use thiserror::Error;

/// Result type alias for period estimation.
pub type Result<T> = std::result::Result<T, PeriodError>;

/// Errors that can occur while estimating a period.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PeriodError {
    /// Series too short to form a validation window.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// NaN or infinite sample in the input.
    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    /// Invalid configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The split-point search did not converge for a candidate window.
    #[error(
        "failed to find optimal split point for slope fitting \
         (hint: k={bin}, f={frequency:.4}, power={power:.4}): {reason}"
    )]
    OptimizationFailure {
        bin: usize,
        frequency: f64,
        power: f64,
        reason: String,
    },

    /// No multiple of the period fits inside the series.
    #[error("no lag multiple of period {period} fits a series of length {len}")]
    DegenerateSeasonality { period: usize, len: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl PeriodError {
    /// True for errors caused by the input series itself.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PeriodError::InsufficientData { .. } | PeriodError::NonFiniteValue { .. }
        )
    }
}

/// Minimum series length accepted by the estimator.
pub const MIN_SERIES_LEN: usize = 8;

/// Check length and finiteness of an input series.
pub fn validate_series(series: &[f64]) -> Result<()> {
    if series.len() < MIN_SERIES_LEN {
        return Err(PeriodError::InsufficientData {
            needed: MIN_SERIES_LEN,
            got: series.len(),
        });
    }
    if let Some(index) = series.iter().position(|x| !x.is_finite()) {
        return Err(PeriodError::NonFiniteValue { index });
    }
    Ok(())
}
