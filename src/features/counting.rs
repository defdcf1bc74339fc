//! Peak counting for period estimation.
//!
//! A crude but robust period estimate: the series length divided by the
//! number of prominent local maxima.

/// Returns the number of peaks of at least support `n`.
///
/// A sample is a peak of support `n` when it is strictly greater than its
/// `n` neighbours on both sides. Neighbours are taken from a circular shift
/// of the whole series, and only the interior `[n, N - n)` is inspected, so
/// the first and last `n` samples are never counted.
///
/// `n == 0` or `2n >= N` leaves no interior and yields 0.
///
/// # Example
/// ```
/// use autoperiod::features::number_peaks;
///
/// let series = [1.0, 3.0, 1.0, 3.0, 1.0, 3.0, 1.0];
/// assert_eq!(number_peaks(&series, 1), 3);
/// ```
pub fn number_peaks(series: &[f64], n: usize) -> usize {
    let len = series.len();
    if n == 0 || 2 * n >= len {
        return 0;
    }

    let shifted = |i: usize, offset: isize| -> f64 {
        let idx = (i as isize + offset).rem_euclid(len as isize) as usize;
        series[idx]
    };

    (n..len - n)
        .filter(|&i| {
            let x = series[i];
            (1..=n as isize).all(|j| x > shifted(i, -j) && x > shifted(i, j))
        })
        .count()
}

/// Estimate a period from the peak count: `N / peaks`, or 1 without peaks.
///
/// # Arguments
/// * `series` - Input time series
/// * `n` - Required peak support
pub fn peak_count_period(series: &[f64], n: usize) -> usize {
    match number_peaks(series, n) {
        0 => 1,
        peaks => series.len() / peaks,
    }
}
