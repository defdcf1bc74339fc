//! Numerical building blocks shared by the estimators.

pub mod ols;
pub mod optimization;
pub mod stats;

pub use ols::{linregress, linregress_index, LinearFit};
pub use optimization::{minimize_bounded, BoundedConfig, BoundedResult};
pub use stats::{argmax, mean, pearson_correlation};
