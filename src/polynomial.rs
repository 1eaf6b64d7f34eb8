use std::{borrow::Cow, ops::RangeInclusive};

use nalgebra::MatrixViewMut;

use crate::{
    display::{self, DEFAULT_PRECISION},
    statistics,
    value::{CoordExt, Linspace, SteppedValues, Value},
};

/// A polynomial in the monomial basis `1, x, x², …, xᵈ`.
///
/// Unlike [`crate::TrendFit`], this struct is **not tied to any dataset**, making it a
/// canonical function that can be evaluated for **any x-value**.
///
/// Coefficients are stored lowest power first: `[c0, c1, ..., cd]` represents
/// `y(x) = c0 + c1·x + … + cd·xᵈ`.
///
/// # Type Parameters
/// - `'a`: Lifetime for borrowed coefficients, if used.
/// - `T`: Numeric type for the coefficients, default is `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<'a, T: Value = f64> {
    degree: usize,
    coefficients: Cow<'a, [T]>,
}
impl<'a, T: Value> Polynomial<'a, T> {
    /// Creates a new borrowed polynomial from a slice of coefficients.
    ///
    /// # Example
    /// ```
    /// # use latticefit::Polynomial;
    /// let poly = Polynomial::borrowed(&[1.0, 2.0, 3.0]); // 1 + 2x + 3x^2
    /// assert_eq!(poly.degree(), 2);
    /// ```
    pub const fn borrowed(coefficients: &'a [T]) -> Self {
        Self {
            degree: coefficients.len().saturating_sub(1),
            coefficients: Cow::Borrowed(coefficients),
        }
    }

    /// Creates a new owned polynomial from a vector of coefficients.
    ///
    /// # Example
    /// ```
    /// # use latticefit::Polynomial;
    /// let poly = Polynomial::owned(vec![1.0, 2.0]); // 1 + 2x
    /// assert_eq!(poly.y(3.0), 7.0);
    /// ```
    #[must_use]
    pub const fn owned(coefficients: Vec<T>) -> Self {
        Self {
            degree: coefficients.len().saturating_sub(1),
            coefficients: Cow::Owned(coefficients),
        }
    }

    /// Converts the polynomial into an owned version.
    pub fn into_owned(self) -> Polynomial<'static, T> {
        Polynomial {
            degree: self.degree,
            coefficients: Cow::Owned(self.coefficients.into_owned()),
        }
    }

    /// Returns a reference to the polynomial’s coefficients, lowest power first.
    ///
    /// For example in `y(x) = 2x^2 - 3x + 1`; coefficients = [1.0, -3.0, 2.0]
    #[must_use]
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// Returns the degree of the polynomial.
    ///
    /// The number of coefficients, `k`, is always `degree + 1`.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of basis functions (coefficients) for a polynomial of the given degree.
    #[must_use]
    pub const fn k(degree: usize) -> usize {
        degree + 1
    }

    /// Evaluates the `j`th basis function, `x^j`.
    #[inline(always)]
    pub fn basis_function(j: usize, x: T) -> T {
        match j {
            0 => T::one(),
            1 => x,
            _ => Value::powi(x, i32::try_from(j).unwrap_or(i32::MAX)),
        }
    }

    /// Fills one row of a design matrix with `1, x, x², …`.
    ///
    /// This is one row of the Jacobian of the polynomial with respect to its coefficients.
    #[inline(always)]
    pub fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        x: T,
        mut row: MatrixViewMut<T, R, C, RS, CS>,
    ) {
        for j in 0..row.ncols() {
            row[j] = Self::basis_function(j, x);
        }
    }

    /// `c0 + c1·x + … + cd·xᵈ`, evaluated by Horner's rule.
    ///
    /// ```
    /// # use latticefit::Polynomial;
    /// let poly = Polynomial::borrowed(&[1.0, 2.0, 3.0]);
    /// assert_eq!(poly.y(2.0), 17.0);
    /// ```
    pub fn y(&self, x: T) -> T {
        self.coefficients
            .iter()
            .rev()
            .fold(T::zero(), |acc, &c| acc * x + c)
    }

    /// `(x, y(x))` for every `x` given, in order.
    ///
    /// ```
    /// # use latticefit::Polynomial;
    /// let poly = Polynomial::borrowed(&[1.0, 2.0, 3.0]);
    /// assert_eq!(poly.solve([0.0, 1.0]), vec![(0.0, 1.0), (1.0, 6.0)]);
    /// ```
    pub fn solve(&self, x: impl IntoIterator<Item = T>) -> Vec<(T, T)> {
        x.into_iter().map(|x| (x, self.y(x))).collect()
    }

    /// Evaluates the polynomial over a range of x-values with a fixed step.
    pub fn solve_range(&self, range: RangeInclusive<T>, step: T) -> Vec<(T, T)> {
        self.solve(SteppedValues::new(range, step))
    }

    /// Evaluates the polynomial at `samples` evenly spaced points covering `range`.
    ///
    /// This is how trend curves are drawn over the span of a band.
    ///
    /// # Example
    /// ```
    /// # use latticefit::Polynomial;
    /// let poly = Polynomial::borrowed(&[0.0, 1.0]);
    /// let curve = poly.sample(0.0..=1.0, 3);
    /// assert_eq!(curve, vec![(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)]);
    /// ```
    pub fn sample(&self, range: RangeInclusive<T>, samples: usize) -> Vec<(T, T)> {
        self.solve(Linspace::new(*range.start(), *range.end(), samples))
    }

    /// Calculates the R-squared value for the polynomial compared to provided data.
    ///
    /// See [`statistics::r_squared`] for more details.
    pub fn r_squared(&self, data: &[(T, T)]) -> T {
        let y: Vec<T> = data.y_iter().collect();
        let y_fit: Vec<T> = data.x_iter().map(|x| self.y(x)).collect();
        statistics::r_squared(&y, &y_fit)
    }

    /// Returns a human-readable string of the polynomial equation.
    ///
    /// ```text
    /// y(x) = 3.00x² + 2.00x + 1.00
    /// ```
    #[must_use]
    pub fn equation(&self) -> String {
        self.equation_with_precision(DEFAULT_PRECISION)
    }

    /// Returns the polynomial equation with coefficients printed to `precision` digits.
    #[must_use]
    pub fn equation_with_precision(&self, precision: usize) -> String {
        let mut output = String::new();
        if display::format_polynomial(&mut output, self.coefficients(), precision).is_err() {
            output.clear();
        }
        output
    }
}

impl<'a, T: Value> AsRef<Polynomial<'a, T>> for Polynomial<'a, T> {
    fn as_ref(&self) -> &Polynomial<'a, T> {
        self
    }
}

impl<T: Value> std::fmt::Display for Polynomial<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display::format_polynomial(f, self.coefficients(), DEFAULT_PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::DMatrix;

    use crate::{assert_all_close, assert_close, assert_y, function};

    use super::*;

    #[test]
    fn test_y() {
        function!(test(x) = 8.0 + 7.0 x^1 + 6.0 x^2);
        assert_y!(test, 0.0, 8.0);
        assert_y!(test, 1.0, 21.0);
        assert_y!(&test, 2.0, 46.0); // borrowed operands work too
    }

    #[test]
    fn test_solve() {
        function!(test(x) = 8.0 + 7.0 x^1 + 6.0 x^2);
        let points: Vec<_> = test.solve(vec![0.0, 1.0, 2.0]).y();
        assert_all_close!(points, &[8.0, 21.0, 46.0]);
    }

    #[test]
    fn test_solve_range() {
        function!(test(x) = 8.0 + 7.0 x^1 + 6.0 x^2);
        let points = test.solve_range(0.0..=3.0, 1.0).y();
        assert_all_close!(points, &[8.0, 21.0, 46.0, 83.0]);
    }

    #[test]
    fn test_sample_covers_range() {
        function!(test(x) = 1.0 + 0.5 x^1);
        let curve = test.sample(90.4..=810.9, 100);
        assert_eq!(curve.len(), 100);
        assert_close!(curve[0].0, 90.4);
        assert_close!(curve[99].0, 810.9, tol = 1e-9);
        assert_close!(curve[99].1, 1.0 + 0.5 * 810.9, tol = 1e-9);
    }

    #[test]
    fn test_design_row() {
        let mut m = DMatrix::<f64>::zeros(1, 4);
        Polynomial::<f64>::fill_matrix_row(2.0, m.row_mut(0));
        assert_all_close!(m.iter().copied().collect::<Vec<_>>(), &[1.0, 2.0, 4.0, 8.0]);
    }

    #[test]
    fn test_equation() {
        function!(test(x) = 1.0 + 2.0 x^1 + 3.0 x^2);
        assert_eq!(test.equation(), "y(x) = 3.00x² + 2.00x + 1.00");
        assert_eq!(test.to_string(), test.equation());
        assert_eq!(Polynomial::owned(vec![0.5]).equation_with_precision(1), "y(x) = 0.5");
    }

    #[test]
    fn test_r_squared_exact() {
        function!(test(x) = 1.0 + 2.0 x^1);
        let data = test.solve(vec![0.0, 1.0, 2.0, 3.0]);
        assert_close!(test.r_squared(&data), 1.0);
    }
}
