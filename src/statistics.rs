//! Error bars and goodness-of-fit numbers for a trend against measured data
//!
//! Every function here compares observed values `y` with the trend's values `y_fit` at the same
//! x-values. Both slices are in data order.
//!
//! - [`absolute_errors`]: The error bar of each point, `|y_i - y_fit_i|`.
//! - [`mean_absolute_error`], [`mean_squared_error`], [`root_mean_squared_error`]: Average error sizes.
//! - [`residual_variance`]: Spread of the residuals left after fitting `k` coefficients.
//! - [`r_squared`]: Share of the variation in `y` the trend accounts for.
//! - [`mean`]: Plain arithmetic mean, also used to place chart annotations.
//!
//! ```rust
//! use latticefit::statistics::{absolute_errors, r_squared};
//!
//! let y = [2.251, 7.576, 12.64];
//! let y_fit = [2.3, 7.5, 12.7];
//!
//! let errors = absolute_errors(&y, &y_fit).unwrap();
//! assert!(errors.iter().all(|e| *e >= 0.0));
//! assert!(r_squared(&y, &y_fit) > 0.99);
//! ```
use crate::{
    error::{Error, Result},
    value::Value,
};

/// The error bar of each observation: its absolute deviation from the trend.
///
/// # Errors
/// Returns [`Error::Shape`] if `y` and `y_fit` differ in length.
///
/// # Example
/// ```rust
/// # use latticefit::statistics::absolute_errors;
/// let errors = absolute_errors(&[1.0, 3.0], &[1.5, 2.0]).unwrap();
/// assert_eq!(errors, vec![0.5, 1.0]);
/// ```
pub fn absolute_errors<T: Value>(y: &[T], y_fit: &[T]) -> Result<Vec<T>> {
    if y.len() != y_fit.len() {
        return Err(Error::shape(y_fit.len(), y.len(), 0));
    }

    Ok(deviations(y, y_fit).map(Value::abs).collect())
}

/// Arithmetic mean. `NaN` for an empty slice.
///
/// ```rust
/// assert_eq!(latticefit::statistics::mean(&[1.0, 2.0, 3.0]), 2.0);
/// ```
pub fn mean<T: Value>(values: &[T]) -> T {
    mean_of(values.iter().copied())
}

/// Mean of the error bars, `Σ|y_i - y_fit_i| / n`.
pub fn mean_absolute_error<T: Value>(y: &[T], y_fit: &[T]) -> T {
    mean_of(deviations(y, y_fit).map(Value::abs))
}

/// Mean of the squared residuals, `Σ(y_i - y_fit_i)² / n`.
pub fn mean_squared_error<T: Value>(y: &[T], y_fit: &[T]) -> T {
    mean_of(deviations(y, y_fit).map(|r| Value::powi(r, 2)))
}

/// Square root of [`mean_squared_error`], in the units of `y`.
pub fn root_mean_squared_error<T: Value>(y: &[T], y_fit: &[T]) -> T {
    mean_squared_error(y, y_fit).sqrt()
}

/// Residual variance `Σ(y_i - y_fit_i)² / (n - k)` for a trend with `k` coefficients.
///
/// An exactly determined fit (`n <= k`) has no residual freedom and gives zero.
pub fn residual_variance<T: Value>(y: &[T], y_fit: &[T], k: usize) -> T {
    let n = y.len().min(y_fit.len());
    if n <= k {
        return T::zero();
    }

    let ss_residual = deviations(y, y_fit).fold(T::zero(), |acc, r| acc + Value::powi(r, 2));
    ss_residual / T::from_positive_int(n - k)
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// `1` is a perfect trend. It drops below zero when the trend is worse than the mean of `y`.
/// Constant `y` gives `NaN`.
pub fn r_squared<T: Value>(y: &[T], y_fit: &[T]) -> T {
    let y_mean = mean(y);

    let (ss_total, ss_residual) = y.iter().zip(y_fit).fold(
        (T::zero(), T::zero()),
        |(total, residual), (&y, &y_fit)| {
            (
                total + Value::powi(y - y_mean, 2),
                residual + Value::powi(y - y_fit, 2),
            )
        },
    );

    T::one() - ss_residual / ss_total
}

fn deviations<'a, T: Value>(y: &'a [T], y_fit: &'a [T]) -> impl Iterator<Item = T> + 'a {
    y.iter().zip(y_fit).map(|(&y, &y_fit)| y - y_fit)
}

fn mean_of<T: Value>(values: impl Iterator<Item = T>) -> T {
    let (sum, count) = values.fold((T::zero(), T::zero()), |(sum, count), v| {
        (sum + v, count + T::one())
    });
    sum / count
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::assert_close;

    use super::*;

    #[test]
    fn test_absolute_errors() {
        let errors = absolute_errors(&[1.0, 2.0, 3.0], &[2.0, 2.0, 1.5]).unwrap();
        assert_eq!(errors, vec![1.0, 0.0, 1.5]);

        let err = absolute_errors(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::Shape { x_len: 2, y_len: 3, .. }));
    }

    #[test]
    fn test_absolute_errors_non_negative() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for n in [1, 5, 40] {
            let y: Vec<f64> = (0..n).map(|_| rng.gen_range(-50.0..50.0)).collect();
            let y_fit: Vec<f64> = (0..n).map(|_| rng.gen_range(-50.0..50.0)).collect();

            let errors = absolute_errors(&y, &y_fit).unwrap();
            assert_eq!(errors.len(), n);
            assert!(errors.iter().all(|e| *e >= 0.0));
        }
    }

    #[test]
    fn test_error_sizes() {
        // Residuals [-2, -4]
        let (y, y_fit) = ([-1.0, -2.0], [1.0, 2.0]);
        assert_eq!(mean_absolute_error(&y, &y_fit), 3.0);
        assert_eq!(mean_squared_error(&y, &y_fit), 10.0);
        assert_close!(root_mean_squared_error(&y, &y_fit), 10f64.sqrt());

        assert!(mean_squared_error::<f64>(&[], &[]).is_nan());
    }

    #[test]
    fn test_residual_variance() {
        // SS_res = 5, n - k = 1
        assert_eq!(residual_variance(&[1.0, 2.0], &[0.0, 0.0], 1), 5.0);
        assert_eq!(residual_variance(&[1.0, 2.0], &[1.0, 2.5], 2), 0.0);
    }

    #[test]
    fn test_r_squared() {
        let y = [1.0, 2.0, 3.0];
        assert_eq!(r_squared(&y, &y), 1.0);

        // SS_tot = 2, SS_res = 2
        assert_eq!(r_squared(&y, &[2.0, 2.0, 2.0]), 0.0);

        // SS_res = 81 + 64 + 49
        assert_eq!(r_squared(&y, &[10.0, 10.0, 10.0]), -96.0);

        assert!(r_squared::<f64>(&[2.0, 2.0], &[2.0, 2.0]).is_nan());
    }

    #[test]
    fn test_mean() {
        assert_close!(mean(&[2.251, 7.576, 12.64]), 22.467 / 3.0, tol = 1e-12);
        assert!(mean::<f64>(&[]).is_nan());
    }
}
