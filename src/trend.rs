//! Trend analysis of a single dispersion dataset
//!
//! [`run`] loads a file, fits a polynomial trend of the configured degree, computes the error bars
//! and renders the chart. Nothing is read from globals; everything comes from [`TrendConfig`].
use std::path::PathBuf;

use crate::{config::TrendConfig, error::Result, io, FitProperties, TrendFit};

/// Summary of a trend analysis run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrendReport {
    /// File the data was loaded from
    pub input: PathBuf,

    /// Properties of the fitted trend, including the error bars
    pub properties: FitProperties<f64>,

    /// Where the chart was written, if one was rendered
    pub chart: Option<PathBuf>,
}
impl TrendReport {
    /// The error bar of each data point, in data order.
    #[must_use]
    pub fn errors(&self) -> &[f64] {
        &self.properties.errors
    }
}
impl std::fmt::Display for TrendReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = &self.properties;
        writeln!(f, "{} ({} points)", self.input.display(), p.data_points)?;
        writeln!(f, "Trend Line (Polynomial Degree {}): {}", p.degree, p.equation)?;
        writeln!(f, "Coefficients: {:?}", p.coefficients)?;
        writeln!(f, "Errors: {:.4?}", p.errors)?;
        write!(f, "Mean error: ±{:.2}, R² = {:.4}", p.mean_error, p.r_squared)?;

        if let Some(chart) = &self.chart {
            write!(f, "\nChart: {}", chart.display())?;
        }
        Ok(())
    }
}

/// Loads the configured file, fits the trend and renders the chart if requested.
///
/// # Errors
/// - Loading errors: [`crate::error::Error::UnsupportedFormat`], [`crate::error::Error::MissingColumn`], I/O and decoding errors
/// - Fitting errors: [`crate::error::Error::Shape`], [`crate::error::Error::Convergence`]
/// - [`crate::error::Error::Plot`] if the chart cannot be written
pub fn run(config: &TrendConfig) -> Result<TrendReport> {
    let data = io::load_dataset(&config.input)?;
    log::debug!("Fitting degree {} trend with {}", config.degree, config.solver);

    let fit = data.fit(config.degree, &config.solver)?;
    log::info!(
        "{} after {} iterations, mean error ±{:.2}",
        fit.equation(),
        fit.report().iterations,
        fit.mean_error()
    );

    let chart = if config.plot { render(&fit, config)? } else { None };
    Ok(TrendReport {
        input: config.input.clone(),
        properties: fit.properties(),
        chart,
    })
}

#[cfg(feature = "plotting")]
fn render(fit: &TrendFit<'_>, config: &TrendConfig) -> Result<Option<PathBuf>> {
    let path = config.output_path();
    crate::plotting::plot_trend(fit, &config.chart, &path)?;
    log::info!("Wrote chart to {}", path.display());
    Ok(Some(path))
}

#[cfg(not(feature = "plotting"))]
#[allow(clippy::unnecessary_wraps)]
fn render(_: &TrendFit<'_>, _: &TrendConfig) -> Result<Option<PathBuf>> {
    log::warn!("Built without the `plotting` feature; no chart written");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::{assert_all_close, assert_close, error::Error, solver::Solver};

    use super::*;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_run_linear() {
        let file = csv_file("ppc,f\n0,1\n1,3\n2,5\n3,7\n");
        let config = TrendConfig {
            degree: 1,
            plot: false,
            ..TrendConfig::new(file.path())
        };

        let report = run(&config).unwrap();
        assert!(report.chart.is_none());
        assert_all_close!(report.properties.coefficients, [1.0, 2.0], tol = 1e-8);
        assert_all_close!(report.errors(), [0.0; 4], tol = 1e-8);
        assert!(report.to_string().contains("Trend Line (Polynomial Degree 1)"));
    }

    #[test]
    fn test_run_columns_by_name() {
        // Column order does not matter; x is always `ppc`
        let file = csv_file("f,ppc\n10,30\n20,60\n31,90\n39,120\n52,150\n");
        let config = TrendConfig {
            solver: Solver::Svd,
            plot: false,
            ..TrendConfig::new(file.path())
        };

        let report = run(&config).unwrap();
        assert_eq!(report.properties.degree, 2);
        assert_eq!(report.errors().len(), 5);
        assert!(report.errors().iter().all(|e| *e >= 0.0));
        assert_close!(report.properties.mean_error, report.errors().iter().sum::<f64>() / 5.0, tol = 1e-12);
    }

    #[test]
    fn test_run_skips_nan_rows() {
        let file = csv_file("ppc,f\n0,1\n1,3\n2,NaN\n3,7\n4,9\n");
        let config = TrendConfig {
            degree: 1,
            plot: false,
            ..TrendConfig::new(file.path())
        };

        let report = run(&config).unwrap();
        assert_eq!(report.properties.data_points, 4);
        assert_all_close!(report.properties.coefficients, [1.0, 2.0], tol = 1e-8);
    }

    #[test]
    fn test_run_errors() {
        let file = csv_file("ppc,freq\n1,2\n");
        let config = TrendConfig {
            plot: false,
            ..TrendConfig::new(file.path())
        };
        assert!(matches!(run(&config), Err(Error::MissingColumn { .. })));

        let file = csv_file("ppc,f\n1,2\n2,3\n");
        let config = TrendConfig {
            degree: 3,
            plot: false,
            ..TrendConfig::new(file.path())
        };
        assert!(matches!(run(&config), Err(Error::Shape { degree: 3, .. })));
    }
}
