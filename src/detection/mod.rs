//! Period detection for time series.
//!
//! This module provides:
//! - Periodogram estimation and a permutation power threshold
//! - The Autoperiod detector and a peak-count detector
//! - Seasonality scoring at the detected period
//! - Pipeline events for diagnostics

mod fft;
mod observer;
mod periodicity;
mod seasonality;
mod threshold;

pub use fft::{periodogram, PeriodogramPoint, SpectralEstimator};
pub use observer::{DetectionEvent, DetectionObserver, NullObserver, RejectReason, TracingObserver};
pub use periodicity::{
    candidate_hints, estimate_period, two_segment_fit, validate_hints, AcfShape, Autoperiod,
    AutoperiodConfig, CandidateHint, PeakCountDetector, PeriodResult, PeriodSource,
    PeriodicityDetector, SegmentFit, ValidationWindow, NO_PERIOD,
};
pub use seasonality::{lagged_correlation, seasonality_score, SeasonalityConfig, SeasonalityScore};
pub use threshold::{power_threshold, power_threshold_with, RandomStreams, SeededStreams};
