//! Numeric plumbing shared by the fitter, the solvers and the charts.
//!
//! - [`Value`]: the floating point types a trend can be fitted in (`f32`, `f64`).
//! - [`SteppedValues`]: `start, start + step, ...` up to and including `end`.
//! - [`Linspace`]: a fixed number of evenly spaced samples, used to draw trend curves.
//! - [`CoordExt`]: column access on `(x, y)` point slices.
//!
//! ```rust
//! use latticefit::value::{CoordExt, Linspace, SteppedValues};
//!
//! assert_eq!(SteppedValues::new(0.0..=180.0, 30.0).count(), 7);
//!
//! let samples: Vec<f64> = Linspace::new(0.0, 1.0, 5).collect();
//! assert_eq!(samples, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
//!
//! let points = [(90.4, 2.251), (270.5, 7.576)];
//! assert_eq!(points.x_range(), Some(90.4..=270.5));
//! ```
use std::ops::RangeInclusive;

use crate::error::Error;

/// Scalar type for data, coefficients and metrics.
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
{
    /// Casts from any primitive number.
    ///
    /// # Errors
    /// [`Error::CastFailed`] if `n` is not representable.
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Converts a count. Saturates to infinity.
    #[must_use]
    fn from_positive_int(n: usize) -> Self {
        Self::try_cast(n).unwrap_or(Self::infinity())
    }

    /// `self^n`
    #[must_use]
    fn powi(self, n: i32) -> Self {
        nalgebra::ComplexField::powi(self, n)
    }

    /// `|self|`
    #[must_use]
    fn abs(self) -> Self {
        nalgebra::ComplexField::abs(self)
    }

    /// `|self - other|`
    #[must_use]
    fn abs_sub(self, other: Self) -> Self {
        Value::abs(self - other)
    }

    /// True below zero. `-0.0` counts as non-negative.
    fn is_sign_negative(&self) -> bool {
        self < &Self::zero()
    }

    /// Neither NaN nor infinite.
    fn is_finite_value(&self) -> bool {
        num_traits::float::FloatCore::is_finite(*self)
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
{
}

/// Values from `range.start` in increments of `step`, stopping once past `range.end`.
///
/// Each value is computed from the start rather than accumulated, so long runs do not drift.
pub struct SteppedValues<T: Value> {
    range: RangeInclusive<T>,
    step: T,
    index: T,
}
impl<T: Value> SteppedValues<T> {
    /// Steps through `range`, inclusive of the end when it lands on a step.
    pub fn new(range: RangeInclusive<T>, step: T) -> Self {
        Self {
            range,
            step,
            index: T::zero(),
        }
    }
}
impl<T: Value> Iterator for SteppedValues<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = *self.range.start() + self.index * self.step;
        if value > *self.range.end() {
            return None;
        }

        self.index += T::one();
        Some(value)
    }
}

/// `count` evenly spaced samples from `start` to `end`, both included.
///
/// A single sample yields `start`; zero samples yield nothing.
pub struct Linspace<T: Value> {
    start: T,
    step: T,
    index: usize,
    count: usize,
}
impl<T: Value> Linspace<T> {
    /// Creates `count` samples covering `start..=end`
    pub fn new(start: T, end: T, count: usize) -> Self {
        let intervals = T::from_positive_int(count.saturating_sub(1).max(1));
        Self {
            start,
            step: (end - start) / intervals,
            index: 0,
            count,
        }
    }
}
impl<T: Value> Iterator for Linspace<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let value = self.start + self.step * T::from_positive_int(self.index);
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}
impl<T: Value> ExactSizeIterator for Linspace<T> {}

/// Column access for a slice of `(x, y)` points.
///
/// ```
/// # use latticefit::value::CoordExt;
/// let data = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
/// assert_eq!(data.y(), vec![-2.0, 3.0, 1.0]);
/// assert_eq!(data.x_range(), Some(0.0..=2.0));
/// ```
pub trait CoordExt<T: Value> {
    /// The x column, in order.
    fn x_iter(&self) -> impl Iterator<Item = T>;

    /// The y column, in order.
    fn y_iter(&self) -> impl Iterator<Item = T>;

    /// The x column, collected.
    fn x(&self) -> Vec<T> {
        self.x_iter().collect()
    }

    /// The y column, collected.
    fn y(&self) -> Vec<T> {
        self.y_iter().collect()
    }

    /// Smallest to largest x, or `None` without points.
    fn x_range(&self) -> Option<RangeInclusive<T>> {
        min_max(self.x_iter())
    }

    /// Smallest to largest y, or `None` without points.
    fn y_range(&self) -> Option<RangeInclusive<T>> {
        min_max(self.y_iter())
    }
}
impl<T: Value> CoordExt<T> for [(T, T)] {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|&(x, _)| x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|&(_, y)| y)
    }
}

fn min_max<T: Value>(mut values: impl Iterator<Item = T>) -> Option<RangeInclusive<T>> {
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(min, max), v| {
        (
            nalgebra::RealField::min(min, v),
            nalgebra::RealField::max(max, v),
        )
    });
    Some(min..=max)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_stepped_values() {
        let values: Vec<f64> = SteppedValues::new(0.0..=1.0, 0.1).collect();
        assert_eq!(values.len(), 11);

        let phases: Vec<f64> = SteppedValues::new(30.0..=100.0, 30.0).collect();
        assert_eq!(phases, vec![30.0, 60.0, 90.0]);
    }

    #[test]
    fn test_linspace_bounds() {
        let samples: Vec<f64> = Linspace::new(90.4, 810.9, 100).collect();
        assert_eq!(samples.len(), 100);
        assert_eq!(samples[0], 90.4);
        assert!((samples[99] - 810.9).abs() < 1e-9);
        assert!(samples.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_linspace_degenerate() {
        let none: Vec<f64> = Linspace::new(0.0, 1.0, 0).collect();
        assert!(none.is_empty());

        let one: Vec<f64> = Linspace::new(4.0, 8.0, 1).collect();
        assert_eq!(one, vec![4.0]);

        assert_eq!(Linspace::new(0.0, 1.0, 7).len(), 7);
    }

    #[test]
    fn test_coord_ranges() {
        let data = vec![(3.0, -1.0), (1.0, 5.0), (2.0, 0.5)];
        assert_eq!(data.x_range(), Some(1.0..=3.0));
        assert_eq!(data.y_range(), Some(-1.0..=5.0));

        let empty: Vec<(f64, f64)> = vec![];
        assert_eq!(empty.x_range(), None);
    }

    #[test]
    fn test_casts() {
        assert_eq!(f64::from_positive_int(8), 8.0);
        assert_eq!(f32::try_cast(3u8).unwrap(), 3.0);
        assert_eq!(Value::abs_sub(2.0_f64, 5.5), 3.5);
    }
}
