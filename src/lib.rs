//! # Latticefit
//! ## Trend lines and error bars for lattice vibration measurements
//!
//! A phonon dispersion experiment produces pairs of phase per unit cell and frequency. This crate
//! turns those measurements into something you can read: a least-squares polynomial trend, an error
//! bar for every point, and a chart with both.
//!
//! Two analyses are provided:
//! - [`trend`]: Load a `csv`, `xls`, `xlsx` or `ods` file with columns `f` and `ppc`, fit a trend of
//!   any degree and chart it.
//! - [`bands`]: Split a diatomic lattice run into its acoustic and optical bands, fit each one and
//!   measure the band gap between them.
//!
//! The error bar of each point is its absolute deviation from the trend. Nothing fancier.
//!
//! ```rust
//! use latticefit::{TrendFit, assert_r_squared};
//!
//! latticefit::function!(f(x) = 1.5 + 0.2 x - 2e-4 x^2);
//! let data = f.solve_range(0.0..=180.0, 30.0);
//!
//! let fit = TrendFit::new(&data, 2).expect("Failed to create fit");
//! assert_eq!(fit.errors().len(), data.len());
//! assert_r_squared!(fit);
//! ```
//!
//! # Core Concepts
//! - A [`Polynomial`] is a mathematical function returning a value `y` for a given input `x`.
//!     - Coefficients are stored lowest power first: `[c0, c1, ..., cd]`.
//! - A [`TrendFit`] is a polynomial fitted to a set of data points.
//!     - It keeps the data so it can report error bars and quality metrics for it.
//!     - It is only meaningful within the `x` range of that data.
//! - A [`solver::Solver`] finds the coefficients:
//!     - [`solver::Solver::LevenbergMarquardt`] iterates from an all-ones guess. This is the default.
//!     - [`solver::Solver::Svd`] solves the least-squares system directly.
//! - The **degree** of a polynomial is the highest power of `x` in it.
//!
//! # Implementation Details
//!
//! Linear algebra uses `nalgebra`. Spreadsheets are read with `calamine` and delimited text with `csv`.
//! Charts are drawn with `plotters` when the `plotting` feature is enabled (it is by default).
//!
//! # Testing utilities
//!
//! This crate includes a set of macros for writing tests against fits and polynomials. See [`test`].
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)] // The worst clippy lint
#![allow(clippy::cast_precision_loss)] // I don't care about this one
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar
#![cfg_attr(docsrs, feature(doc_cfg))]


#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod plotting;

pub mod bands;
pub mod config;
pub mod dataset;
pub mod display;
pub mod error;
pub mod io;
pub mod solver;
pub mod statistics;
pub mod trend;
pub mod value;

mod fit;
mod polynomial;

pub use fit::*;
pub use polynomial::Polynomial;

pub use nalgebra;
