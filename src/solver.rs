//! Least-squares solvers for monomial trend polynomials
//!
//! Both solvers minimize `Σ (y_i - Σ_j c_j x_i^j)²` over the coefficients `c_0..c_d`:
//! - [`Solver::LevenbergMarquardt`]: Iterative damped Gauss-Newton, starting from all-ones coefficients.
//!   Fails with [`Error::Convergence`] if the tolerances in [`LmOptions`] are not reached in time.
//! - [`Solver::Svd`]: Direct solve of the design matrix by singular value decomposition.
//!
//! Monomial columns span many orders of magnitude for phase data (`x³` with `x ≈ 1400` is ~`2.7e9`),
//! so both solvers work on a column-scaled design matrix and unscale the result.
use nalgebra::{DMatrix, DVector, SVD};

use crate::{
    error::{Error, Result},
    value::{CoordExt, Value},
    Polynomial,
};

/// Tuning for the Levenberg-Marquardt solver.
///
/// The tolerances default to the usual MINPACK values.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LmOptions {
    /// Iteration cap; `None` means `200 * (k + 1)` for `k` coefficients.
    pub max_iterations: Option<usize>,

    /// Stop when an accepted step reduces the cost by at most this fraction.
    pub ftol: f64,

    /// Stop when the scaled step is at most `xtol * (‖c‖ + xtol)`, with `c` also scaled.
    pub xtol: f64,

    /// Stop when the cosine between the residual and every scaled Jacobian column is at most this.
    pub gtol: f64,

    /// Damping factor for the first iteration.
    pub initial_damping: f64,
}
impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_iterations: None,
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            gtol: 1.49012e-8,
            initial_damping: 1e-3,
        }
    }
}
impl LmOptions {
    /// Resolves the iteration cap for a problem with `k` coefficients.
    #[must_use]
    pub fn iteration_cap(&self, k: usize) -> usize {
        self.max_iterations.unwrap_or(200 * (k + 1))
    }
}

/// Strategy used to solve the least-squares system.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Solver {
    /// Iterative Levenberg-Marquardt from an all-ones initial guess.
    LevenbergMarquardt(LmOptions),

    /// Direct SVD solve.
    Svd,
}
impl Default for Solver {
    fn default() -> Self {
        Self::LevenbergMarquardt(LmOptions::default())
    }
}
impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LevenbergMarquardt(_) => write!(f, "Levenberg-Marquardt"),
            Self::Svd => write!(f, "SVD"),
        }
    }
}

/// What a solver did to reach its coefficients.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SolverReport {
    /// Iterations performed; `1` for the direct solver.
    pub iterations: usize,

    /// Residual sum of squares at the solution.
    pub cost: f64,
}

impl Solver {
    /// Fits `degree + 1` monomial coefficients to `data`, lowest power first.
    ///
    /// The caller is responsible for checking that there are at least `degree + 1` points.
    ///
    /// # Errors
    /// - [`Error::Convergence`] if the iterative solver runs out of iterations or diverges.
    /// - [`Error::Algebra`] if the direct solve produces NaN coefficients.
    /// - [`Error::CastFailed`] if the data cannot be represented as `f64` for reporting.
    pub fn solve<T: Value>(&self, data: &[(T, T)], degree: usize) -> Result<(Vec<T>, SolverReport)> {
        let k = Polynomial::<T>::k(degree);
        let system = ScaledSystem::new(data, k);

        match self {
            Self::LevenbergMarquardt(options) => levenberg_marquardt(&system, options),
            Self::Svd => {
                let z = least_squares(system.scaled.clone(), &system.y)?;
                let coefficients = system.unscale(&z);
                let cost = system.cost(&coefficients);
                Ok((
                    coefficients.data.into(),
                    SolverReport {
                        iterations: 1,
                        cost: f64::try_cast(cost)?,
                    },
                ))
            }
        }
    }
}

/// Design matrix with unit-norm columns, plus the scale needed to undo it.
struct ScaledSystem<T: Value> {
    design: DMatrix<T>,
    scaled: DMatrix<T>,
    scale: DVector<T>,
    y: DVector<T>,
}
impl<T: Value> ScaledSystem<T> {
    fn new(data: &[(T, T)], k: usize) -> Self {
        let mut design = DMatrix::zeros(data.len(), k);
        for (row, x) in design.row_iter_mut().zip(data.x_iter()) {
            Polynomial::<T>::fill_matrix_row(x, row);
        }

        let scale = DVector::from_iterator(
            k,
            design.column_iter().map(|c| {
                let norm = c.norm();
                if norm > T::zero() {
                    norm
                } else {
                    T::one()
                }
            }),
        );

        let mut scaled = design.clone();
        for (mut column, s) in scaled.column_iter_mut().zip(scale.iter()) {
            column /= *s;
        }

        let y = DVector::from_iterator(data.len(), data.y_iter());
        Self {
            design,
            scaled,
            scale,
            y,
        }
    }

    fn unscale(&self, z: &DVector<T>) -> DVector<T> {
        z.component_div(&self.scale)
    }

    fn residuals(&self, coefficients: &DVector<T>) -> DVector<T> {
        &self.y - &self.design * coefficients
    }

    fn cost(&self, coefficients: &DVector<T>) -> T {
        self.residuals(coefficients).norm_squared()
    }
}

/// Solves `a * z = b` in the least-squares sense using SVD.
///
/// Singular values below `machine_epsilon * max(rows, cols) * sigma_max` are treated as zero.
fn least_squares<T: Value>(a: DMatrix<T>, b: &DVector<T>) -> Result<DVector<T>> {
    let size = a.shape();

    let decomp = SVD::new_unordered(a, true, true);

    let machine_epsilon = T::epsilon();
    let max_size = size.0.max(size.1);
    let sigma_max = decomp.singular_values.max();
    let epsilon = machine_epsilon * T::try_cast(max_size)? * sigma_max;

    let z = decomp.solve(b, epsilon).map_err(Error::Algebra)?;
    if z.iter().any(|c| c.is_nan()) {
        return Err(Error::Algebra("NaN in coefficients"));
    }

    Ok(z)
}

fn levenberg_marquardt<T: Value>(
    system: &ScaledSystem<T>,
    options: &LmOptions,
) -> Result<(Vec<T>, SolverReport)> {
    let k = system.scale.len();
    let max_iterations = options.iteration_cap(k);
    let ftol = T::try_cast(options.ftol)?;
    let xtol = T::try_cast(options.xtol)?;
    let gtol = T::try_cast(options.gtol)?;
    let ten = T::try_cast(10)?;

    let mut damping = T::try_cast(options.initial_damping)?;
    let mut coefficients = DVector::from_element(k, T::one());
    let mut residuals = system.residuals(&coefficients);
    let mut cost = residuals.norm_squared();

    // Augmented system [J; sqrt(λ)I] z = [r; 0]
    let n = residuals.len();
    let mut augmented = DMatrix::zeros(n + k, k);
    augmented.rows_mut(0, n).copy_from(&system.scaled);
    let mut rhs = DVector::zeros(n + k);

    let mut iterations = 0;
    while iterations < max_iterations && cost.is_finite_value() {
        if cost <= T::zero() {
            return converged(&coefficients, cost, iterations, "zero residual");
        }

        // Columns of the scaled Jacobian have unit norm
        let gradient = system.scaled.transpose() * &residuals;
        let cosine = gradient
            .iter()
            .fold(T::zero(), |acc, g| nalgebra::RealField::max(acc, Value::abs(*g)))
            / cost.sqrt();
        if cosine <= gtol {
            return converged(&coefficients, cost, iterations, "gtol");
        }

        iterations += 1;
        augmented
            .rows_mut(n, k)
            .copy_from(&(DMatrix::<T>::identity(k, k) * damping.sqrt()));
        rhs.rows_mut(0, n).copy_from(&residuals);

        let z = least_squares(augmented.clone(), &rhs)?;
        let candidate = &coefficients + system.unscale(&z);
        let candidate_residuals = system.residuals(&candidate);
        let candidate_cost = candidate_residuals.norm_squared();

        log::trace!(
            "LM iteration {iterations}: cost={cost:e}, candidate={candidate_cost:e}, damping={damping:e}"
        );

        if candidate_cost.is_finite_value() && candidate_cost < cost {
            let reduction = (cost - candidate_cost) / cost;
            coefficients = candidate;
            residuals = candidate_residuals;
            cost = candidate_cost;
            damping /= ten;

            if reduction <= ftol {
                return converged(&coefficients, cost, iterations, "ftol");
            }
        } else {
            damping *= ten;
        }

        // Step and coefficients are compared in scaled space
        let scaled_norm = coefficients.component_mul(&system.scale).norm();
        if z.norm() <= xtol * (scaled_norm + xtol) {
            return converged(&coefficients, cost, iterations, "xtol");
        }
    }

    Err(Error::Convergence {
        iterations,
        cost: f64::try_cast(cost).unwrap_or(f64::NAN),
    })
}

fn converged<T: Value>(
    coefficients: &DVector<T>,
    cost: T,
    iterations: usize,
    reason: &str,
) -> Result<(Vec<T>, SolverReport)> {
    log::debug!("LM converged after {iterations} iterations ({reason}), cost={cost:e}");
    Ok((
        coefficients.iter().copied().collect(),
        SolverReport {
            iterations,
            cost: f64::try_cast(cost)?,
        },
    ))
}
