//! # autoperiod
//!
//! Periodicity detection for univariate time series.
//!
//! Implements the Autoperiod method (Vlachos, Yu, Castelli 2005): periodogram
//! peaks above a permutation power threshold are taken as period hints and
//! validated as hills of the autocorrelation function. A peak-count estimate
//! serves as an optional fallback, and the detected period can be scored for
//! seasonality strength.
//!
//! # Example
//!
//! ```
//! use autoperiod::prelude::*;
//!
//! let series: Vec<f64> = (0..1000)
//!     .map(|t| (2.0 * std::f64::consts::PI * t as f64 / 50.0).sin())
//!     .collect();
//!
//! let result = estimate_period(&series, &AutoperiodConfig::default().with_seed(42)).unwrap();
//! assert_eq!(result.period(), 50);
//! ```

pub mod detection;
pub mod error;
pub mod features;
pub mod parallel;
pub mod transform;
pub mod utils;

pub use detection::{estimate_period, seasonality_score};
pub use error::{PeriodError, Result};

pub mod prelude {
    pub use crate::detection::{
        estimate_period, seasonality_score, Autoperiod, AutoperiodConfig, DetectionObserver,
        PeakCountDetector, PeriodResult, PeriodSource, PeriodicityDetector, SeasonalityConfig,
        SeasonalityScore,
    };
    pub use crate::error::{PeriodError, Result};
    pub use crate::features::{number_peaks, peak_count_period};
}
