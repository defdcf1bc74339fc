//! Structured diagnostics for the detection pipeline.
//!
//! The pipeline reports what it does through [`DetectionEvent`]s handed to a
//! [`DetectionObserver`]. The default [`TracingObserver`] forwards them to
//! `tracing`; install a subscriber to see them:
//!
//! ```ignore
//! tracing_subscriber::fmt().with_env_filter("autoperiod=trace").init();
//! let result = autoperiod::estimate_period(&series, &config)?;
//! ```

use super::fft::PeriodogramPoint;
use tracing::{debug, trace};

/// Why a candidate hint was not accepted as a period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    /// Bin index below 2: the implied period is undefined or too long.
    BinTooLow,
    /// The series has no room for a window inside lags `[2, N-2]`.
    WindowTooNarrow,
    /// The ACF dips then rises around the candidate lag.
    Valley,
    /// The ACF forms a hill, but flatter than the configured floor.
    InsufficientSteepness { steepness: f64 },
    /// Neither a hill nor a valley.
    Ambiguous,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::BinTooLow => write!(f, "k < 2"),
            RejectReason::WindowTooNarrow => write!(f, "no validation window fits"),
            RejectReason::Valley => write!(f, "valley"),
            RejectReason::InsufficientSteepness { steepness } => {
                write!(f, "insufficient steepness ({:.4})", steepness)
            }
            RejectReason::Ambiguous => write!(f, "neither hill nor valley"),
        }
    }
}

/// One step of the detection pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionEvent {
    /// A linear trend was subtracted.
    Detrended { slope: f64, intercept: f64 },
    /// The trend was too shallow; only the mean was subtracted.
    MeanRemoved { slope: f64, mean: f64 },
    /// The permutation power threshold was determined.
    ThresholdEstimated { threshold: f64, n_iter: usize },
    /// A periodogram bin exceeded the threshold.
    HintFound { hint: PeriodogramPoint },
    /// A hint failed ACF validation.
    HintRejected {
        hint: PeriodogramPoint,
        reason: RejectReason,
    },
    /// A hint lies on an ACF hill.
    HillAccepted {
        hint: PeriodogramPoint,
        begin: usize,
        end: usize,
        split: usize,
        period: usize,
    },
    /// No hint was accepted; the peak-count estimate is used instead.
    FallbackUsed { support: usize, period: usize },
    /// Final periods of the run.
    PeriodsChosen { periods: Vec<usize> },
}

/// Receiver for pipeline events.
///
/// `on_event` defaults to a no-op.
pub trait DetectionObserver {
    /// Called once per pipeline event.
    fn on_event(&self, _event: &DetectionEvent) {}
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl DetectionObserver for NullObserver {}

/// Forwards events to `tracing`.
///
/// Summary events go out at `debug`, per-hint events at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DetectionObserver for TracingObserver {
    fn on_event(&self, event: &DetectionEvent) {
        match event {
            DetectionEvent::Detrended { slope, intercept } => {
                debug!(slope, intercept, "removed linear trend");
            }
            DetectionEvent::MeanRemoved { slope, mean } => {
                debug!(slope, mean, "trend too shallow, removed mean only");
            }
            DetectionEvent::ThresholdEstimated { threshold, n_iter } => {
                debug!(threshold, n_iter, "power threshold");
            }
            DetectionEvent::HintFound { hint } => {
                trace!(
                    k = hint.bin,
                    f = hint.frequency,
                    power = hint.power,
                    "candidate period hint"
                );
            }
            DetectionEvent::HintRejected { hint, reason } => {
                trace!(k = hint.bin, reason = %reason, "hint rejected");
            }
            DetectionEvent::HillAccepted {
                hint,
                begin,
                end,
                split,
                period,
            } => {
                trace!(
                    k = hint.bin,
                    begin,
                    end,
                    split,
                    period,
                    "hill detected"
                );
            }
            DetectionEvent::FallbackUsed { support, period } => {
                debug!(support, period, "no valid hint, used peak-count fallback");
            }
            DetectionEvent::PeriodsChosen { periods } => {
                debug!(?periods, "periods");
            }
        }
    }
}
