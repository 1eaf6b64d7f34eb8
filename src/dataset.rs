//! Named tabular columns and the `(x, y)` datasets fitted from them
//!
//! A [`Table`] is what a loader produces: headers plus one column of optional values per header.
//! A [`Dataset`] is the pair of numeric sequences a trend is fitted to.
//!
//! For dispersion measurements the independent variable is the phase per unit cell
//! (`ppc`, degrees) and the dependent variable is the frequency (`f`, kHz).
use crate::{
    error::{Error, Result},
    solver::Solver,
    value::CoordExt,
    TrendFit,
};

/// Column holding the measured frequency, in kHz.
pub const FREQUENCY_COLUMN: &str = "f";

/// Column holding the phase per unit cell, in degrees.
pub const PHASE_COLUMN: &str = "ppc";

/// Columns a dispersion table must provide.
pub const REQUIRED_COLUMNS: [&str; 2] = [FREQUENCY_COLUMN, PHASE_COLUMN];

/// Named columns of optional numeric cells, in file order.
///
/// `None` marks an empty cell, or one that does not hold a number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}
impl Table {
    /// Creates an empty table with the given column names.
    pub fn new(headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let columns = vec![Vec::new(); headers.len()];
        Self { headers, columns }
    }

    /// Appends a row.
    ///
    /// Short rows are padded with `None`; cells beyond the last header are dropped.
    pub fn push_row(&mut self, row: impl IntoIterator<Item = Option<f64>>) {
        let mut row = row.into_iter();
        for column in &mut self.columns {
            column.push(row.next().flatten());
        }
    }

    /// Column names, in file order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Cells of the named column, or `None` if there is no such column.
    ///
    /// Names are compared exactly. If a name repeats, the first column wins.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        let index = self.headers.iter().position(|h| h == name)?;
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// True if there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every one of `required` is present.
    ///
    /// # Errors
    /// Returns [`Error::MissingColumn`] listing every absent column.
    ///
    /// # Example
    /// ```
    /// # use latticefit::dataset::Table;
    /// let table = Table::new(["ppc", "note"]);
    /// let err = table.require(&["f", "ppc"]).unwrap_err();
    /// assert!(err.to_string().contains("\"f\""));
    /// ```
    pub fn require(&self, required: &[&str]) -> Result<()> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| self.column(name).is_none())
            .map(ToString::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingColumn {
                required: required.iter().map(ToString::to_string).collect(),
                missing,
            })
        }
    }

    /// Pairs two columns into a dataset, skipping rows where either cell is empty.
    ///
    /// # Errors
    /// - [`Error::MissingColumn`] if either column is absent.
    /// - [`Error::NoData`] if no complete row remains.
    pub fn to_dataset(&self, x_column: &str, y_column: &str) -> Result<Dataset> {
        self.require(&[x_column, y_column])?;
        let (Some(xs), Some(ys)) = (self.column(x_column), self.column(y_column)) else {
            return Err(Error::NoData);
        };

        let mut points = Vec::with_capacity(xs.len());
        for (row, (x, y)) in xs.iter().zip(ys).enumerate() {
            match (x, y) {
                (Some(x), Some(y)) => points.push((*x, *y)),
                _ => log::warn!(
                    "Skipping row {}: `{x_column}` or `{y_column}` is empty, not numeric or not finite",
                    row + 1
                ),
            }
        }

        if points.is_empty() {
            return Err(Error::NoData);
        }

        log::debug!("Using {} of {} rows", points.len(), self.len());
        Ok(Dataset { points })
    }

    /// Builds the dispersion dataset: `x` from [`PHASE_COLUMN`], `y` from [`FREQUENCY_COLUMN`].
    ///
    /// # Errors
    /// See [`Table::to_dataset`]. Both required columns are checked together,
    /// so the error names everything that is missing.
    pub fn to_dispersion(&self) -> Result<Dataset> {
        self.require(&REQUIRED_COLUMNS)?;
        self.to_dataset(PHASE_COLUMN, FREQUENCY_COLUMN)
    }
}

/// Two equal-length sequences of measurements, stored as `(x, y)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    points: Vec<(f64, f64)>,
}
impl Dataset {
    /// Builds a dataset from separate columns.
    ///
    /// # Errors
    /// Returns [`Error::Shape`] if `x` and `y` differ in length.
    ///
    /// # Example
    /// ```
    /// # use latticefit::dataset::Dataset;
    /// let data = Dataset::from_columns(&[0.0, 1.0], &[1.0, 3.0]).unwrap();
    /// assert_eq!(data.len(), 2);
    /// assert!(Dataset::from_columns(&[0.0], &[1.0, 3.0]).is_err());
    /// ```
    pub fn from_columns(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::shape(x.len(), y.len(), 0));
        }

        Ok(Self {
            points: x.iter().copied().zip(y.iter().copied()).collect(),
        })
    }

    /// The `(x, y)` pairs.
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// The independent variable.
    #[must_use]
    pub fn x(&self) -> Vec<f64> {
        self.points.x()
    }

    /// The dependent variable.
    #[must_use]
    pub fn y(&self) -> Vec<f64> {
        self.points.y()
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fits a trend of the given degree to this dataset.
    ///
    /// # Errors
    /// See [`TrendFit::with_solver`].
    pub fn fit(&self, degree: usize, solver: &Solver) -> Result<TrendFit<'_>> {
        TrendFit::with_solver(self.points(), degree, solver)
    }
}

impl From<Vec<(f64, f64)>> for Dataset {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut table = Table::new(["ppc", "f", "note"]);
        table.push_row([Some(30.0), Some(10.5), None]);
        table.push_row([Some(60.0), None, Some(1.0)]);
        table.push_row([Some(90.0), Some(30.0)]);
        table
    }

    #[test]
    fn test_table_columns() {
        let table = table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.headers(), &["ppc", "f", "note"]);
        assert_eq!(table.column("f"), Some(&[Some(10.5), None, Some(30.0)][..]));
        assert_eq!(table.column("note"), Some(&[None, Some(1.0), None][..]));
        assert!(table.column("F").is_none());
    }

    #[test]
    fn test_dispersion_skips_incomplete_rows() {
        let data = table().to_dispersion().unwrap();
        assert_eq!(data.points(), &[(30.0, 10.5), (90.0, 30.0)]);
        assert_eq!(data.x(), vec![30.0, 90.0]);
        assert_eq!(data.y(), vec![10.5, 30.0]);
    }

    #[test]
    fn test_missing_columns_listed() {
        let table = Table::new(["phase", "freq"]);
        match table.to_dispersion() {
            Err(Error::MissingColumn { required, missing }) => {
                assert_eq!(required, vec!["f", "ppc"]);
                assert_eq!(missing, vec!["f", "ppc"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let only_f = Table::new(["f"]);
        assert!(matches!(
            only_f.to_dispersion(),
            Err(Error::MissingColumn { missing, .. }) if missing == vec!["ppc".to_string()]
        ));
    }

    #[test]
    fn test_no_complete_rows() {
        let mut table = Table::new(["f", "ppc"]);
        table.push_row([Some(1.0), None]);
        assert!(matches!(table.to_dispersion(), Err(Error::NoData)));
    }

    #[test]
    fn test_dataset_fit() {
        let data = Dataset::from_columns(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0]).unwrap();
        let fit = data.fit(1, &Solver::default()).unwrap();
        assert_eq!(fit.errors().len(), data.len());
    }
}
