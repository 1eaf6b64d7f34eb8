//! Error types for loading, fitting and charting dispersion data
//!
//! This module defines the failure modes of a single analysis run, along with
//! a convenient `Result` alias. Every variant is fatal to the run.

use std::path::PathBuf;

/// Errors that can occur while loading data, fitting a trend or rendering a chart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file extension does not map to a known tabular format.
    ///
    /// Supported extensions are `csv`, `xls`, `xlsx` and `ods`.
    #[error("Unsupported file format `{extension}` for {path}; expected csv, xls, xlsx or ods")]
    UnsupportedFormat {
        /// Path that was being loaded
        path: PathBuf,
        /// The extension that was found (empty if there was none)
        extension: String,
    },

    /// The table does not contain every column required for the analysis.
    #[error("The file must contain columns {required:?}; missing {missing:?}")]
    MissingColumn {
        /// Columns the analysis needs
        required: Vec<String>,
        /// Columns that were not found
        missing: Vec<String>,
    },

    /// The data cannot support the requested fit.
    ///
    /// Either `x` and `y` differ in length, or there are fewer than `degree + 1` points.
    #[error("Cannot fit a degree {degree} polynomial to {x_len} x-values and {y_len} y-values")]
    Shape {
        /// Number of x-values
        x_len: usize,
        /// Number of y-values
        y_len: usize,
        /// Requested polynomial degree
        degree: usize,
    },

    /// The iterative solver did not reach its tolerances within the iteration budget.
    #[error("Least-squares solver failed to converge after {iterations} iterations (residual sum of squares: {cost})")]
    Convergence {
        /// Iterations performed before giving up
        iterations: usize,
        /// Residual sum of squares at the last accepted point
        cost: f64,
    },

    /// Cannot perform curve fitting because there is no data.
    #[error("No data available for fitting")]
    NoData,

    /// Failed to solve the algebraic system during fitting.
    ///
    /// Contains a static string describing the solver error.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),

    /// A numeric value could not be cast to the target type.
    #[error("Failed to cast value to target type")]
    CastFailed,

    /// The input file could not be read.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV input was malformed.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The spreadsheet input was malformed.
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// The spreadsheet does not contain any worksheet.
    #[error("Spreadsheet {0} contains no worksheets")]
    EmptyWorkbook(PathBuf),

    /// The chart could not be rendered.
    #[error("Failed to render chart: {0}")]
    Plot(String),
}

impl Error {
    /// Builds a [`Error::Shape`] for a fit of the given degree.
    #[must_use]
    pub fn shape(x_len: usize, y_len: usize, degree: usize) -> Self {
        Self::Shape {
            x_len,
            y_len,
            degree,
        }
    }
}

/// Result type for loading and fitting
pub type Result<T> = std::result::Result<T, Error>;
