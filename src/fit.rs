use std::{borrow::Cow, ops::RangeInclusive};

use crate::{
    error::{Error, Result},
    solver::{Solver, SolverReport},
    statistics,
    value::{CoordExt, Value},
    Polynomial,
};

/// A polynomial trend fitted to a set of `(x, y)` measurements.
///
/// The trend is a monomial polynomial `y(x) = c0 + c1·x + … + cd·xᵈ` of a caller-chosen
/// degree, found by least squares. The fit keeps its source data so it can report the
/// error bars and quality metrics for that data.
///
/// The fit is immutable once created.
///
/// # Type Parameters
/// - `'data`: Lifetime of the borrowed dataset, if any.
/// - `T`: Numeric type, default `f64`.
///
/// # Example
/// ```
/// # use latticefit::TrendFit;
/// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0), (3.0, 7.0)];
/// let fit = TrendFit::new(data, 1).unwrap();
/// println!("Coefficients: {:?}", fit.coefficients());
/// println!("Error bars: {:?}", fit.errors());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrendFit<'data, T: Value = f64> {
    data: Cow<'data, [(T, T)]>,
    x_range: RangeInclusive<T>,
    function: Polynomial<'static, T>,
    solver: Solver,
    report: SolverReport,
}
impl<'data, T: Value> TrendFit<'data, T> {
    /// Fits a polynomial of the given degree using the default Levenberg-Marquardt solver.
    ///
    /// The solver starts from all coefficients equal to 1.
    ///
    /// # Errors
    /// Returns an [`Error`] in the following cases:
    /// - `Error::Shape`: fewer than `degree + 1` data points.
    /// - `Error::Convergence`: the solver did not converge within its iteration cap.
    /// - `Error::CastFailed`: a numeric value could not be cast to the target type.
    ///
    /// # Example
    /// ```
    /// # use latticefit::TrendFit;
    /// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
    /// let fit = TrendFit::new(data, 2).unwrap();
    /// println!("{}", fit.equation());
    /// ```
    pub fn new(data: impl Into<Cow<'data, [(T, T)]>>, degree: usize) -> Result<Self> {
        Self::with_solver(data, degree, &Solver::default())
    }

    /// Fits a polynomial of the given degree using the given solver.
    ///
    /// # Errors
    /// See [`TrendFit::new`]. The direct [`Solver::Svd`] fails with `Error::Algebra`
    /// instead of `Error::Convergence`.
    ///
    /// # Example
    /// ```
    /// # use latticefit::{solver::Solver, TrendFit};
    /// let data = &[(90.4, 2.251), (270.5, 7.576), (450.3, 12.64)];
    /// let fit = TrendFit::with_solver(data, 2, &Solver::Svd).unwrap();
    /// assert_eq!(fit.report().iterations, 1);
    /// ```
    pub fn with_solver(
        data: impl Into<Cow<'data, [(T, T)]>>,
        degree: usize,
        solver: &Solver,
    ) -> Result<Self> {
        let data: Cow<_> = data.into();

        let n = data.len();
        if n < Polynomial::<T>::k(degree) {
            return Err(Error::shape(n, n, degree));
        }

        let x_range = data.as_ref().x_range().ok_or(Error::NoData)?;
        let (coefficients, report) = solver.solve(&data, degree)?;
        log::debug!(
            "{solver} fit of degree {degree} to {n} points: {} iterations, cost {:e}",
            report.iterations,
            report.cost
        );

        Ok(Self {
            data,
            x_range,
            function: Polynomial::owned(coefficients),
            solver: *solver,
            report,
        })
    }

    /// Fits a polynomial to separate `x` and `y` columns.
    ///
    /// # Errors
    /// Returns `Error::Shape` if the columns differ in length, otherwise see [`TrendFit::with_solver`].
    ///
    /// # Example
    /// ```
    /// # use latticefit::{solver::Solver, TrendFit};
    /// let fit = TrendFit::from_columns(&[0.0, 1.0], &[1.0, 3.0], 1, &Solver::default()).unwrap();
    /// assert_eq!(fit.degree(), 1);
    ///
    /// assert!(TrendFit::from_columns(&[0.0, 1.0], &[1.0], 1, &Solver::default()).is_err());
    /// ```
    pub fn from_columns(x: &[T], y: &[T], degree: usize, solver: &Solver) -> Result<TrendFit<'static, T>> {
        if x.len() != y.len() {
            return Err(Error::shape(x.len(), y.len(), degree));
        }

        let data: Vec<_> = x.iter().copied().zip(y.iter().copied()).collect();
        TrendFit::with_solver(data, degree, solver)
    }

    /// Returns an owned version of this fit, with a full copy of the data.
    #[must_use]
    pub fn to_owned(&self) -> TrendFit<'static, T> {
        TrendFit {
            data: Cow::Owned(self.data.to_vec()),
            x_range: self.x_range.clone(),
            function: self.function.clone(),
            solver: self.solver,
            report: self.report,
        }
    }

    /// The trend evaluated at each measured phase, as `(x, y_fit)` in data order.
    ///
    /// ```
    /// # use latticefit::TrendFit;
    /// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
    /// let fit = TrendFit::new(data, 1).unwrap();
    /// assert_eq!(fit.solution().len(), 3);
    /// ```
    pub fn solution(&self) -> Vec<(T, T)> {
        self.function.solve(self.data().x_iter())
    }

    /// Evaluates the trend at `samples` evenly spaced points across the x-range of the data.
    ///
    /// This is the smooth curve drawn through the data on charts.
    pub fn curve(&self, samples: usize) -> Vec<(T, T)> {
        self.function.sample(self.x_range.clone(), samples)
    }

    /// Signed residuals `y_i - y_fit_i`, keyed by `x`.
    pub fn residuals(&self) -> Vec<(T, T)> {
        self.data
            .iter()
            .map(|&(x, y)| (x, y - self.function.y(x)))
            .collect()
    }

    /// The error bar for each data point: the absolute deviation of the observation from the trend.
    ///
    /// Always one non-negative value per data point, in data order.
    ///
    /// See [`statistics::absolute_errors`].
    pub fn errors(&self) -> Vec<T> {
        self.residuals().into_iter().map(|(_, r)| Value::abs(r)).collect()
    }

    /// Mean of the error bars, shown as `±mean` in chart legends.
    ///
    /// This is the mean absolute error of the fit.
    pub fn mean_error(&self) -> T {
        self.mean_absolute_error()
    }

    /// Residual variance left after fitting the `degree + 1` coefficients.
    ///
    /// See [`statistics::residual_variance`].
    pub fn residual_variance(&self) -> T {
        let (y, y_fit) = self.observed_and_fitted();
        statistics::residual_variance(&y, &y_fit, self.function.coefficients().len())
    }

    /// Mean squared error of the trend against its source data.
    pub fn mean_squared_error(&self) -> T {
        let (y, y_fit) = self.observed_and_fitted();
        statistics::mean_squared_error(&y, &y_fit)
    }

    /// Root mean squared error of the trend against its source data, in the units of `y`.
    pub fn root_mean_squared_error(&self) -> T {
        let (y, y_fit) = self.observed_and_fitted();
        statistics::root_mean_squared_error(&y, &y_fit)
    }

    /// Mean absolute error of the trend against its source data.
    pub fn mean_absolute_error(&self) -> T {
        let (y, y_fit) = self.observed_and_fitted();
        statistics::mean_absolute_error(&y, &y_fit)
    }

    fn observed_and_fitted(&self) -> (Vec<T>, Vec<T>) {
        self.data
            .iter()
            .map(|&(x, y)| (y, self.function.y(x)))
            .unzip()
    }

    /// Calculates the R-squared value of the trend against its source data.
    ///
    /// Values closer to 1 indicate a better fit. See [`statistics::r_squared`] for more details.
    ///
    /// # Example
    /// ```
    /// # use latticefit::TrendFit;
    /// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0), (3.0, 12.0)];
    /// let fit = TrendFit::new(data, 2).unwrap();
    /// let r2 = fit.r_squared();
    /// println!("R² = {}", r2);
    /// ```
    pub fn r_squared(&self) -> T {
        self.function.r_squared(&self.data)
    }

    /// Returns the degree of the polynomial.
    pub fn degree(&self) -> usize {
        self.function.degree()
    }

    /// Returns a reference to the polynomial’s coefficients, lowest power first.
    ///
    /// For example in `y(x) = 2x^2 - 3x + 1`; coefficients = [1.0, -3.0, 2.0]
    pub fn coefficients(&self) -> &[T] {
        self.function.coefficients()
    }

    /// Returns a reference to the data points used for fitting.
    pub fn data(&self) -> &[(T, T)] {
        &self.data
    }

    /// Returns the inclusive range of x-values in the dataset.
    pub fn x_range(&self) -> RangeInclusive<T> {
        self.x_range.clone()
    }

    /// Returns the inclusive range of y-values in the dataset.
    ///
    /// This is computed dynamically from the stored data points.
    pub fn y_range(&self) -> RangeInclusive<T> {
        self.data()
            .y_range()
            .unwrap_or_else(|| T::zero()..=T::zero())
    }

    /// The solver that produced this fit.
    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    /// Iterations and final cost of the solver.
    pub fn report(&self) -> &SolverReport {
        &self.report
    }

    /// Returns a pure polynomial representation of the trend.
    ///
    /// This allows evaluation of the polynomial at **any x-value**, including
    /// outside the range of the data it was fitted to.
    ///
    /// # Example
    /// ```
    /// # use latticefit::TrendFit;
    /// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
    /// let fit = TrendFit::new(data, 2).unwrap();
    /// let poly = fit.as_polynomial();
    /// let y = poly.y(10.0); // can evaluate outside original x-range
    /// ```
    pub fn as_polynomial(&self) -> &Polynomial<'static, T> {
        &self.function
    }

    /// Returns a pure polynomial representation of the trend, dropping the data.
    pub fn into_polynomial(self) -> Polynomial<'static, T> {
        self.function
    }

    /// Returns a human-readable string of the polynomial equation.
    ///
    /// ```text
    /// y(x) = 1.00x³ + 2.00x² + 3.00x + 4.00
    /// ```
    pub fn equation(&self) -> String {
        self.function.equation()
    }

    /// Returns the properties of the fit.
    ///
    /// This is a comprehensive summary of the fit's characteristics.
    pub fn properties(&self) -> FitProperties<T> {
        FitProperties {
            degree: self.degree(),
            data_points: self.data().len(),
            coefficients: self.coefficients().to_vec(),
            equation: self.equation(),
            errors: self.errors(),
            mean_error: self.mean_error(),
            mse: self.mean_squared_error(),
            r_squared: self.r_squared(),
            solver: self.solver.to_string(),
            iterations: self.report.iterations,
        }
    }
}

impl<T: Value> AsRef<Polynomial<'static, T>> for TrendFit<'_, T> {
    fn as_ref(&self) -> &Polynomial<'static, T> {
        &self.function
    }
}

impl<T: Value> std::fmt::Display for TrendFit<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.function)
    }
}

/// A set of diagnostic properties for a trend fit.
///
/// Can be serialized to JSON or other formats.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct FitProperties<T: Value> {
    /// The degree of the fitted polynomial.
    pub degree: usize,

    /// The number of data points used in the fit.
    pub data_points: usize,

    /// The coefficients of the fitted polynomial, lowest power first.
    pub coefficients: Vec<T>,

    /// The fitted polynomial as text.
    pub equation: String,

    /// The error bar of each data point.
    pub errors: Vec<T>,

    /// The mean of the error bars.
    pub mean_error: T,

    /// The mean squared error of the fit.
    pub mse: T,

    /// The R² value of the fit.
    pub r_squared: T,

    /// The solver used.
    pub solver: String,

    /// Solver iterations used.
    pub iterations: usize,
}
