//! Run configuration for the trend and band analyses
//!
//! Every parameter of a run is carried here explicitly. The `Default` impls hold the values
//! the lab scripts used, so `TrendConfig::new(path)` or `BandsConfig::default()` reproduces them.
use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use crate::{bands, solver::Solver};

/// Degree used for trend fits when none is given.
pub const DEFAULT_TREND_DEGREE: usize = 2;

/// Number of points used to draw smooth trend curves.
pub const CURVE_SAMPLES: usize = 100;

/// Directory charts are written to unless an output path is given.
pub const PLOT_OUTPUT_DIR: &str = "target/plot_output";

/// Default chart path for a named analysis: `target/plot_output/{name}.png`
#[must_use]
pub fn default_output(name: &str) -> PathBuf {
    Path::new(PLOT_OUTPUT_DIR).join(format!("{name}.png"))
}

/// Where the legend box is placed inside the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LegendPosition {
    /// Top-left corner
    UpperLeft,

    /// Top-right corner
    #[default]
    UpperRight,

    /// Bottom-left corner
    LowerLeft,

    /// Bottom-right corner
    LowerRight,
}

/// Lower and upper bound of a chart axis.
///
/// A missing bound is derived from the plotted elements, padded by [`AxisLimits::MARGIN`] of their span.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxisLimits {
    /// Lower bound
    pub min: Option<f64>,

    /// Upper bound
    pub max: Option<f64>,
}
impl AxisLimits {
    /// Fraction of the data span added on each side of an automatic bound.
    pub const MARGIN: f64 = 0.05;

    /// Both bounds fixed.
    #[must_use]
    pub const fn fixed(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Only the upper bound fixed.
    #[must_use]
    pub const fn upper(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Resolves the bounds against the extent of the plotted data.
    ///
    /// Always returns a non-empty range.
    ///
    /// # Example
    /// ```
    /// # use latticefit::config::AxisLimits;
    /// let limits = AxisLimits::upper(55.0);
    /// assert_eq!(limits.resolve(Some(10.0..=50.0)), 8.0..55.0);
    /// ```
    #[must_use]
    pub fn resolve(&self, extent: Option<std::ops::RangeInclusive<f64>>) -> Range<f64> {
        let (lo, hi) = extent.map_or((0.0, 1.0), |r| (*r.start(), *r.end()));
        let pad = (hi - lo) * Self::MARGIN;

        let min = self.min.unwrap_or(lo - pad);
        let max = self.max.unwrap_or(hi + pad);
        if max > min {
            min..max
        } else {
            min..min + 1.0
        }
    }
}

/// Presentation settings for a chart.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlotOptions {
    /// Caption for the chart
    pub title: String,

    /// X-axis label
    pub x_label: Option<String>,

    /// Y-axis label
    pub y_label: Option<String>,

    /// Size of the output image in pixels
    pub size: (u32, u32),

    /// X-axis bounds
    pub x_limits: AxisLimits,

    /// Y-axis bounds
    pub y_limits: AxisLimits,

    /// Whether to draw grid lines
    pub grid: bool,

    /// Whether to hide the legend
    pub hide_legend: bool,

    /// Legend placement
    pub legend_position: LegendPosition,
}
impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: "Graph Output".into(),
            x_label: None,
            y_label: None,
            size: (640, 480),
            x_limits: AxisLimits::default(),
            y_limits: AxisLimits::default(),
            grid: true,
            hide_legend: false,
            legend_position: LegendPosition::default(),
        }
    }
}
impl PlotOptions {
    /// Chart settings for a trend analysis of dispersion data.
    #[must_use]
    pub fn trend() -> Self {
        Self {
            title: "Data Plot with Trend Line and Error Bars".into(),
            x_label: Some("Phase per unit cell(degree)".into()),
            y_label: Some("frequency(kHz)".into()),
            x_limits: AxisLimits::fixed(0.0, 210.0),
            y_limits: AxisLimits::fixed(0.0, 70.0),
            legend_position: LegendPosition::UpperLeft,
            ..Self::default()
        }
    }

    /// Chart settings for the acoustic/optical band analysis.
    #[must_use]
    pub fn bands() -> Self {
        Self {
            title: "Lattice Vibration: Acoustic and Optical Bands".into(),
            x_label: Some("Phase (degree)".into()),
            y_label: Some("Frequency (kHz)".into()),
            size: (800, 600),
            x_limits: AxisLimits::upper(1650.0),
            y_limits: AxisLimits::upper(55.0),
            ..Self::default()
        }
    }
}

/// Settings for [`crate::trend::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrendConfig {
    /// Data file to load (`csv`, `xls`, `xlsx` or `ods`)
    pub input: PathBuf,

    /// Degree of the trend polynomial
    pub degree: usize,

    /// Least-squares solver
    pub solver: Solver,

    /// Chart path; [`default_output`] when `None`
    pub output: Option<PathBuf>,

    /// Whether to render the chart
    pub plot: bool,

    /// Chart presentation
    pub chart: PlotOptions,
}
impl TrendConfig {
    /// Default settings for the given input file.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            degree: DEFAULT_TREND_DEGREE,
            solver: Solver::default(),
            output: None,
            plot: true,
            chart: PlotOptions::trend(),
        }
    }

    /// Resolved chart path.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| default_output("trend"))
    }
}

/// Settings for [`crate::bands::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct BandsConfig {
    /// Measured frequencies, in kHz
    pub frequency: Vec<f64>,

    /// Phase of each measurement, in degrees
    pub phase: Vec<f64>,

    /// Number of leading measurements in the acoustic band; the rest are optical
    pub acoustic_points: usize,

    /// Degree of the acoustic trend
    pub acoustic_degree: usize,

    /// Degree of the optical trend
    pub optical_degree: usize,

    /// Least-squares solver
    pub solver: Solver,

    /// Chart path; [`default_output`] when `None`
    pub output: Option<PathBuf>,

    /// Whether to render the chart
    pub plot: bool,

    /// Chart presentation
    pub chart: PlotOptions,
}
impl Default for BandsConfig {
    fn default() -> Self {
        Self {
            frequency: bands::FREQUENCY_KHZ.to_vec(),
            phase: bands::PHASE_DEG.to_vec(),
            acoustic_points: bands::ACOUSTIC_POINTS,
            acoustic_degree: bands::ACOUSTIC_DEGREE,
            optical_degree: bands::OPTICAL_DEGREE,
            solver: Solver::Svd,
            output: None,
            plot: true,
            chart: PlotOptions::bands(),
        }
    }
}
impl BandsConfig {
    /// Resolved chart path.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| default_output("bands"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_limits() {
        assert_eq!(AxisLimits::fixed(0.0, 210.0).resolve(Some(30.0..=180.0)), 0.0..210.0);
        assert_eq!(AxisLimits::default().resolve(Some(0.0..=100.0)), -5.0..105.0);
        assert_eq!(AxisLimits::default().resolve(None), -0.05..1.05);

        // Degenerate extents still produce a drawable range
        assert_eq!(AxisLimits::default().resolve(Some(3.0..=3.0)), 3.0..4.0);
        assert_eq!(AxisLimits::upper(1.0).resolve(Some(10.0..=20.0)), 9.5..10.5);
    }

    #[test]
    fn test_defaults() {
        let trend = TrendConfig::new("data.csv");
        assert_eq!(trend.degree, DEFAULT_TREND_DEGREE);
        assert_eq!(trend.output_path(), Path::new("target/plot_output/trend.png"));
        assert_eq!(trend.chart.legend_position, LegendPosition::UpperLeft);

        let bands = BandsConfig::default();
        assert_eq!(bands.phase.len(), bands.frequency.len());
        assert_eq!(bands.solver, Solver::Svd);
        assert_eq!(bands.chart.x_limits.max, Some(1650.0));
    }
}
