//! Charts of trend fits and band analyses
//!
//! A [`Plot`] collects [`PlottingElement`]s and draws them with any [`PlotBackend`].
//! Axis ranges come from [`PlotOptions`], or from the elements where no bound is set.
//!
//! [`plot_trend`] and [`plot_bands`] write the standard charts as PNG files through the
//! [`plotters`] bitmap backend.
//!
//! Building a chart is separate from drawing it, so [`trend_chart`] and [`bands_chart`] can be
//! inspected without touching the filesystem.
use std::{ops::Range, path::Path};

mod backend;
pub use backend::*;

mod element;
pub use element::*;

use crate::{
    bands::BandAnalysis,
    config::{PlotOptions, CURVE_SAMPLES},
    error::{Error, Result},
    TrendFit,
};

/// Horizontal error bar half-width on trend charts, in degrees.
pub const TREND_X_ERROR: f64 = 0.01;

/// Font size of the band gap annotation, in pixels.
const ANNOTATION_SIZE: u32 = 20;

/// A chart of one or more elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    options: PlotOptions,
    elements: Vec<PlottingElement>,
}
impl Plot {
    /// Creates an empty chart.
    #[must_use]
    pub fn new(options: PlotOptions) -> Self {
        Self {
            options,
            elements: Vec::new(),
        }
    }

    /// Adds an element, drawn after the ones already present.
    #[must_use]
    pub fn with_element(mut self, element: PlottingElement) -> Self {
        self.elements.push(element);
        self
    }

    /// The chart options.
    #[must_use]
    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// The elements, in drawing order.
    #[must_use]
    pub fn elements(&self) -> &[PlottingElement] {
        &self.elements
    }

    /// The x-axis range: fixed bounds from the options, the rest from the elements.
    #[must_use]
    pub fn x_range(&self) -> Range<f64> {
        let extent = merge_extents(self.elements.iter().filter_map(PlottingElement::x_extent));
        self.options.x_limits.resolve(extent)
    }

    /// The y-axis range: fixed bounds from the options, the rest from the elements.
    #[must_use]
    pub fn y_range(&self) -> Range<f64> {
        let extent = merge_extents(self.elements.iter().filter_map(PlottingElement::y_extent));
        self.options.y_limits.resolve(extent)
    }

    /// Draws the chart onto the given root.
    ///
    /// # Errors
    /// Returns an error if the backend fails to draw.
    pub fn draw<P: PlotBackend>(&self, root: &P::Root) -> std::result::Result<(), P::Error> {
        let mut plot = P::new_plot(root, &self.options, self.x_range(), self.y_range())?;
        for element in &self.elements {
            plot.add_element(element)?;
        }
        plot.finalize()
    }

    /// Writes the chart to a PNG file, creating parent directories as needed.
    ///
    /// # Errors
    /// - [`Error::Io`] if the directory cannot be created
    /// - [`Error::Plot`] if the chart cannot be drawn or written
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let root = backend::plotters::Root::new(path, self.options.size)
            .map_err(|e| Error::Plot(e.to_string()))?;
        self.draw::<backend::plotters::Backend>(&root)
            .map_err(|e| Error::Plot(e.to_string()))
    }
}

/// Chart of a trend fit: data with error bars, the trend, and a line joining the data.
#[must_use]
pub fn trend_chart(fit: &TrendFit<'_>, options: &PlotOptions) -> Plot {
    let data_label = format!("Data with Errors (±{:.2})", fit.mean_error());
    let trend_label = format!("Trend Line (Polynomial Degree {})", fit.degree());

    Plot::new(options.clone())
        .with_element(PlottingElement::from_fit_errors(
            fit,
            TREND_X_ERROR,
            Marker::Circle,
            Hue::Blue,
            data_label,
        ))
        .with_element(PlottingElement::line(
            fit.solution(),
            Stroke::Dashed,
            Hue::Red,
            Some(trend_label),
        ))
        .with_element(PlottingElement::Line {
            data: fit.data().to_vec(),
            stroke: Stroke::Solid,
            hue: Hue::Blue,
            alpha: 0.5,
            label: Some("Joining Line".into()),
        })
}

/// Chart of a band analysis: both bands with error bars and trends, the band edges and the gap.
#[must_use]
pub fn bands_chart(analysis: &BandAnalysis, options: &PlotOptions) -> Plot {
    Plot::new(options.clone())
        .with_element(PlottingElement::from_band(
            &analysis.acoustic,
            Marker::Circle,
            Hue::Blue,
            "Acoustic Band",
        ))
        .with_element(PlottingElement::from_band(
            &analysis.optical,
            Marker::Star,
            Hue::Red,
            "Optical Band",
        ))
        .with_element(PlottingElement::line(
            analysis.acoustic.fit().curve(CURVE_SAMPLES),
            Stroke::Solid,
            Hue::Blue,
            Some("Acoustic Trend".into()),
        ))
        .with_element(PlottingElement::line(
            analysis.optical.fit().curve(CURVE_SAMPLES),
            Stroke::Dashed,
            Hue::Red,
            Some("Optical Trend".into()),
        ))
        .with_element(PlottingElement::HorizontalLine {
            y: analysis.max_acoustic,
            stroke: Stroke::DashDot,
            hue: Hue::Blue,
            label: Some(format!("Max Acoustic = {}kHz", analysis.max_acoustic)),
        })
        .with_element(PlottingElement::HorizontalLine {
            y: analysis.min_optical,
            stroke: Stroke::DashDot,
            hue: Hue::Red,
            label: Some(format!("Min Optical = {}kHz", analysis.min_optical)),
        })
        .with_element(PlottingElement::Text {
            x: analysis.gap_phase(),
            y: analysis.mean_frequency,
            text: format!("Band Gap: {:.2} kHz", analysis.band_gap),
            size: ANNOTATION_SIZE,
            hue: Hue::Purple,
        })
}

/// Writes the trend chart for `fit` to `path`.
///
/// # Errors
/// Returns an error if the chart cannot be written. See [`Plot::save`].
pub fn plot_trend(fit: &TrendFit<'_>, options: &PlotOptions, path: &Path) -> Result<()> {
    trend_chart(fit, options).save(path)
}

/// Writes the band chart for `analysis` to `path`.
///
/// # Errors
/// Returns an error if the chart cannot be written. See [`Plot::save`].
pub fn plot_bands(analysis: &BandAnalysis, options: &PlotOptions, path: &Path) -> Result<()> {
    bands_chart(analysis, options).save(path)
}

#[cfg(test)]
mod tests {
    use crate::{
        assert_close,
        bands::{self, BandKind},
        solver::Solver,
    };

    use super::*;

    #[test]
    fn test_trend_chart() {
        let data = [(30.0, 10.0), (60.0, 21.0), (90.0, 29.0), (120.0, 41.0), (150.0, 50.0)];
        let fit = TrendFit::new(&data, 2).unwrap();
        let plot = trend_chart(&fit, &PlotOptions::trend());

        let labels: Vec<_> = plot.elements().iter().filter_map(PlottingElement::label).collect();
        assert_eq!(
            labels,
            vec![
                format!("Data with Errors (±{:.2})", fit.mean_error()).as_str(),
                "Trend Line (Polynomial Degree 2)",
                "Joining Line",
            ]
        );

        // Fixed limits win over the data extent
        assert_eq!(plot.x_range(), 0.0..210.0);
        assert_eq!(plot.y_range(), 0.0..70.0);

        match &plot.elements()[0] {
            PlottingElement::ErrorBars { points, .. } => {
                assert_eq!(points.len(), data.len());
                for (p, e) in points.iter().zip(fit.errors()) {
                    assert_close!(p.y_error, e);
                    assert_close!(p.x_error, TREND_X_ERROR);
                }
            }
            other => panic!("unexpected element: {other:?}"),
        }
    }

    #[test]
    fn test_bands_chart() {
        let analysis = bands::analyze(
            &bands::PHASE_DEG,
            &bands::FREQUENCY_KHZ,
            bands::ACOUSTIC_POINTS,
            bands::ACOUSTIC_DEGREE,
            bands::OPTICAL_DEGREE,
            &Solver::Svd,
        )
        .unwrap();
        assert_eq!(analysis.acoustic.kind(), BandKind::Acoustic);

        let plot = bands_chart(&analysis, &PlotOptions::bands());
        assert_eq!(plot.elements().len(), 7);

        let labels: Vec<_> = plot.elements().iter().filter_map(PlottingElement::label).collect();
        assert!(labels.contains(&"Max Acoustic = 21.24kHz"));
        assert!(labels.contains(&"Min Optical = 36.03kHz"));

        match plot.elements().last() {
            Some(PlottingElement::Text { text, .. }) => assert_eq!(text, "Band Gap: 14.79 kHz"),
            other => panic!("unexpected element: {other:?}"),
        }

        match &plot.elements()[2] {
            PlottingElement::Line { data, .. } => {
                assert_eq!(data.len(), CURVE_SAMPLES);
                assert_close!(data[0].0, 90.4);
                assert_close!(data[CURVE_SAMPLES - 1].0, 810.9, tol = 1e-9);
            }
            other => panic!("unexpected element: {other:?}"),
        }

        // Upper bounds fixed, lower bounds follow the data
        let (x, y) = (plot.x_range(), plot.y_range());
        assert_eq!((x.end, y.end), (1650.0, 55.0));
        assert!(x.start < 90.4 && x.start > 0.0);
        assert!(y.start < 2.251);
    }
}
