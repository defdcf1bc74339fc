//! Data transformations applied before period estimation.
//!
//! # Example
//!
//! ```
//! use autoperiod::transform::detrend_linear;
//!
//! let series = vec![1.0, 2.5, 3.0, 4.5, 5.0, 6.5];
//! let detrended = detrend_linear(&series).unwrap();
//! assert!(detrended.trend_removed);
//! ```

pub mod detrend;

pub use detrend::{detrend_linear, Detrended, TREND_SLOPE_TOLERANCE};
