//! Period detection example.
//!
//! Reads one number per line (or whitespace separated) from stdin, or
//! synthesises a noisy seasonal series when stdin is a terminal or empty.
//!
//! Run with: cargo run --example detect_period < series.txt
//! Set `RUST_LOG=autoperiod=trace` to see the pipeline events.

use autoperiod::prelude::*;
use std::io::{IsTerminal, Read};

fn read_stdin() -> Vec<f64> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Vec::new();
    }
    let mut input = String::new();
    if stdin.lock().read_to_string(&mut input).is_err() {
        return Vec::new();
    }
    input
        .split_whitespace()
        .filter_map(|token| token.parse::<f64>().ok())
        .collect()
}

fn synthetic() -> Vec<f64> {
    (0..480)
        .map(|i| {
            let t = i as f64;
            let cycle = (2.0 * std::f64::consts::PI * t / 24.0).sin();
            let noise = (i * 7919 % 97) as f64 / 97.0 - 0.5;
            20.0 + 0.05 * t + 4.0 * cycle + 0.8 * noise
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Autoperiod Period Detection ===\n");

    let mut series = read_stdin();
    if series.is_empty() {
        println!("No input on stdin, using a synthetic series (period 24, with trend)");
        series = synthetic();
    }
    println!("Series length: {}", series.len());

    let config = AutoperiodConfig::default()
        .with_seed(42)
        .with_detrend(true)
        .with_peak_fallback(5)
        .with_return_count(3);

    println!("\n--- Autoperiod ---");
    match Autoperiod::new(config.clone()).detect(&series) {
        Ok(result) => {
            println!("Primary period: {}", result.period());
            println!("All periods:    {:?}", result.periods);
            println!("Source:         {:?}", result.source);
            if let Some(threshold) = result.threshold {
                println!("Threshold:      {:.4}", threshold);
            }
            println!("Hints above threshold:");
            for hint in result.hints.iter().take(5) {
                println!(
                    "  k={:>4}  period~{:>8.2}  power={:.4}",
                    hint.bin,
                    hint.period(),
                    hint.power
                );
            }
        }
        Err(e) => {
            println!("Detection failed: {}", e);
            return;
        }
    }

    println!("\n--- Peak count ---");
    if let Ok(result) = PeakCountDetector::new(5).detect(&series) {
        println!("Period: {}", result.period());
    }

    println!("\n--- Seasonality ---");
    let seasonality = SeasonalityConfig::default().with_autoperiod(config.with_return_count(1));
    match seasonality_score(&series, &seasonality) {
        Ok(score) => {
            println!("Period: {}  score: {:.4}  lags: {}", score.period, score.score, score.lags);
            let strength = if score.is_strong() {
                "strong"
            } else if score.is_moderate() {
                "moderate"
            } else {
                "weak"
            };
            println!("Seasonality is {}", strength);
        }
        Err(e) => println!("Scoring failed: {}", e),
    }
}
