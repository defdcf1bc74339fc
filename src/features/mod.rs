//! Time series features used by period estimation.
//!
//! # Example
//!
//! ```
//! use autoperiod::features::{acf, number_peaks};
//!
//! let series = vec![1.0, 3.0, 1.0, 3.0, 1.0, 3.0, 1.0, 3.0];
//!
//! // Autocorrelation function for lags 0..N
//! let r = acf(&series);
//! assert!(r[2] > 0.0 && r[1] < 0.0);
//!
//! // Counting features
//! let peaks = number_peaks(&series, 1);
//! assert_eq!(peaks, 3);
//! ```

pub mod autocorrelation;
pub mod counting;

pub use autocorrelation::{acf, autocorrelation};
pub use counting::{number_peaks, peak_count_period};
