//! Optional parallel iteration.
//!
//! With the `parallel` feature, ranges are iterated through rayon; without
//! it, sequentially. Callers must not depend on evaluation order: results
//! are collected in index order either way.

/// Iterate a range in parallel when the `parallel` feature is enabled.
///
/// ```ignore
/// use crate::iter_maybe_parallel;
///
/// let squares: Vec<usize> = iter_maybe_parallel!(0..100).map(|i| i * i).collect();
/// ```
#[macro_export]
macro_rules! iter_maybe_parallel {
    ($expr:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::IntoParallelIterator;

            IntoParallelIterator::into_par_iter($expr)
        }
        #[cfg(not(feature = "parallel"))]
        {
            IntoIterator::into_iter($expr)
        }
    }};
}
