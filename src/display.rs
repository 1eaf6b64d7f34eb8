//! Equation text for trend polynomials
//!
//! Coefficients `[c0, c1, ..., cd]` are written highest power first, the way they are read off a
//! chart legend:
//!
//! ```text
//! y(x) = 2.10e-6x³ - 4.50e-4x² + 0.39x + 0.54
//! ```
//!
//! Magnitudes in `[1e-3, 1e3)` are printed as plain decimals, the rest in scientific notation.
//! Zero terms are skipped, and a unit coefficient is left implicit (`x`, not `1.00x`).
use std::fmt::Write;

use crate::value::Value;

/// Default precision for formatting coefficients
pub const DEFAULT_PRECISION: usize = 2;

/// Magnitudes printed without scientific notation.
const FIXED_RANGE: std::ops::Range<f64> = 1e-3..1e3;

/// Writes `y(x) = ...` for monomial coefficients, lowest power first.
///
/// # Errors
/// Returns an error if writing to `buffer` fails.
///
/// # Example
/// ```
/// # use latticefit::display::{format_polynomial, DEFAULT_PRECISION};
/// let mut buf = String::new();
/// format_polynomial(&mut buf, &[1.0, 2.0], DEFAULT_PRECISION).unwrap();
/// assert_eq!(buf, "y(x) = 2.00x + 1.00");
/// ```
pub fn format_polynomial<B: Write, T: Value>(
    buffer: &mut B,
    coefficients: &[T],
    precision: usize,
) -> std::fmt::Result {
    buffer.write_str("y(x) = ")?;

    let mut empty = true;
    for (power, &coef) in coefficients.iter().enumerate().rev() {
        let Some(magnitude) = format_coefficient(coef, power, precision) else {
            continue;
        };

        let negative = coef.is_sign_negative();
        match (empty, negative) {
            (true, true) => buffer.write_char('-')?,
            (true, false) => {}
            (false, true) => buffer.write_str(" - ")?,
            (false, false) => buffer.write_str(" + ")?,
        }

        write!(buffer, "{magnitude}{}", format_power(power))?;
        empty = false;
    }

    if empty {
        buffer.write_char('0')?;
    }
    Ok(())
}

/// The unsigned coefficient text of the `x^power` term, or `None` for a zero coefficient.
///
/// A coefficient of magnitude one is empty on non-constant terms.
///
/// # Example
/// ```
/// # use latticefit::display::format_coefficient;
/// assert_eq!(format_coefficient(0.0, 1, 2), None);
/// assert_eq!(format_coefficient(-2.5, 1, 2), Some("2.50".to_string()));
/// assert_eq!(format_coefficient(1e5, 1, 2), Some("1.00e5".to_string()));
/// ```
pub fn format_coefficient<T: Value>(coef: T, power: usize, precision: usize) -> Option<String> {
    let magnitude = Value::abs(coef);
    if magnitude <= T::epsilon() {
        return None;
    }

    if power != 0 && magnitude.abs_sub(T::one()) <= T::epsilon() {
        return Some(String::new());
    }

    let fixed = T::try_cast(FIXED_RANGE.start)
        .and_then(|start| Ok(start..T::try_cast(FIXED_RANGE.end)?))
        .is_ok_and(|range| range.contains(&magnitude));

    Some(if fixed {
        format!("{magnitude:.precision$}")
    } else {
        format!("{magnitude:.precision$e}")
    })
}

/// `x` raised to `power` with a superscript exponent: `""`, `"x"`, `"x²"`, `"x¹⁰"`.
#[must_use]
pub fn format_power(power: usize) -> String {
    match power {
        0 => String::new(),
        1 => "x".to_string(),
        _ => std::iter::once('x')
            .chain(power.to_string().chars().filter_map(superscript))
            .collect(),
    }
}

fn superscript(digit: char) -> Option<char> {
    Some(match digit {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        _ => return None,
    })
}
