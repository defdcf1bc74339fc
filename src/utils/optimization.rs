//! Optimization utilities for split-point search.

/// Result of a bounded scalar minimization.
#[derive(Debug, Clone)]
pub struct BoundedResult<T> {
    /// The optimal point found.
    pub optimal_point: f64,
    /// The objective function value at the optimal point.
    pub optimal_value: f64,
    /// Payload returned by the objective at the optimal point.
    pub payload: T,
    /// Number of function evaluations performed.
    pub evaluations: usize,
    /// Whether the algorithm converged.
    pub converged: bool,
}

/// Configuration for bounded scalar minimization.
#[derive(Debug, Clone)]
pub struct BoundedConfig {
    /// Maximum number of function evaluations.
    pub max_iter: usize,
    /// Absolute tolerance on the optimal point.
    pub xatol: f64,
}

impl Default for BoundedConfig {
    fn default() -> Self {
        Self {
            max_iter: 500,
            xatol: 1e-5,
        }
    }
}

/// Minimize a scalar function on a closed interval with Brent's method
/// (golden-section search with parabolic interpolation).
///
/// The objective returns its value together with a payload; only the
/// payload of the incumbent best point is kept, so the objective can stay a
/// pure function.
///
/// # Arguments
/// * `objective` - Function returning `(value, payload)` for a point
/// * `bounds` - Search interval `(lower, upper)`, `lower <= upper`
/// * `config` - Configuration parameters
///
/// # Returns
/// `None` when the bounds are not ordered or not finite, otherwise the
/// `BoundedResult`. `converged` is false when the evaluation budget ran out
/// or the optimum is NaN.
///
/// # Example
/// ```
/// use autoperiod::utils::optimization::{minimize_bounded, BoundedConfig};
///
/// let result = minimize_bounded(
///     |x| ((x - 2.0).powi(2), ()),
///     (0.0, 5.0),
///     BoundedConfig::default(),
/// )
/// .unwrap();
///
/// assert!(result.converged);
/// assert!((result.optimal_point - 2.0).abs() < 1e-4);
/// ```
pub fn minimize_bounded<F, T>(
    mut objective: F,
    bounds: (f64, f64),
    config: BoundedConfig,
) -> Option<BoundedResult<T>>
where
    F: FnMut(f64) -> (f64, T),
{
    let (lower, upper) = bounds;
    if !lower.is_finite() || !upper.is_finite() || lower > upper {
        return None;
    }

    let sqrt_eps = f64::EPSILON.sqrt();
    let golden_mean = 0.5 * (3.0 - 5.0_f64.sqrt());

    let mut a = lower;
    let mut b = upper;
    let mut fulc = a + golden_mean * (b - a);
    let mut nfc = fulc;
    let mut xf = fulc;
    let mut rat = 0.0_f64;
    let mut e = 0.0_f64;

    let (mut fx, mut payload) = objective(xf);
    let mut evaluations = 1;
    let mut fu = f64::INFINITY;
    let mut ffulc = fx;
    let mut fnfc = fx;

    let mut xm = 0.5 * (a + b);
    let mut tol1 = sqrt_eps * xf.abs() + config.xatol / 3.0;
    let mut tol2 = 2.0 * tol1;
    let mut budget_exhausted = false;

    while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
        let mut golden = true;

        // Parabolic fit
        if e.abs() > tol1 {
            golden = false;
            let mut r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = rat;

            if p.abs() < (0.5 * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                rat = p / q;
                let x = xf + rat;
                if (x - a) < tol2 || (b - x) < tol2 {
                    rat = tol1 * sign_or_one(xm - xf);
                }
            } else {
                golden = true;
            }
        }

        if golden {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = golden_mean * e;
        }

        let x = xf + sign_or_one(rat) * rat.abs().max(tol1);
        let (value, candidate) = objective(x);
        fu = value;
        evaluations += 1;

        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            fulc = nfc;
            ffulc = fnfc;
            nfc = xf;
            fnfc = fx;
            xf = x;
            fx = fu;
            payload = candidate;
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                fulc = nfc;
                ffulc = fnfc;
                nfc = x;
                fnfc = fu;
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                fulc = x;
                ffulc = fu;
            }
        }

        xm = 0.5 * (a + b);
        tol1 = sqrt_eps * xf.abs() + config.xatol / 3.0;
        tol2 = 2.0 * tol1;

        if evaluations >= config.max_iter {
            budget_exhausted = true;
            break;
        }
    }

    let converged = !budget_exhausted && !xf.is_nan() && !fx.is_nan() && !fu.is_nan();

    Some(BoundedResult {
        optimal_point: xf,
        optimal_value: fx,
        payload,
        evaluations,
        converged,
    })
}

/// Sign of `v`, with zero mapped to `+1`.
fn sign_or_one(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}
