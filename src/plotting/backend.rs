use std::ops::Range;

use crate::{
    config::PlotOptions,
    plotting::{ErrorPoint, Hue, Marker, PlottingElement, Stroke},
};

pub mod plotters;

/// Width of drawn lines, in pixels
const LINE_WIDTH: u32 = 2;

/// Dash and gap lengths of [`Stroke::Dashed`]
const DASHED: (u32, u32) = (10, 6);

/// Dash and gap lengths of [`Stroke::DashDot`]
const DASH_DOT: (u32, u32) = (6, 4);

/// Trait for plot backends
///
/// Everything is drawn in `f64` chart coordinates.
pub trait PlotBackend {
    /// Error type for the plot backend
    type Error: std::error::Error;

    /// Root type for the plot backend
    type Root;

    /// Color type for the plot backend
    type Color: Clone;

    /// Maps a named color to a backend color with the given opacity
    fn color(hue: Hue, alpha: f64) -> Self::Color;

    /// Create a new plot with the given options and axis ranges on the given root
    ///
    /// # Errors
    /// Returns an error if the plot cannot be created.
    fn new_plot(
        root: &Self::Root,
        options: &PlotOptions,
        x_range: Range<f64>,
        y_range: Range<f64>,
    ) -> Result<Self, Self::Error>
    where
        Self: Sized;

    /// The x-axis range of the plot
    fn x_range(&self) -> Range<f64>;

    /// Add a line to the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_line(
        &mut self,
        data: &[(f64, f64)],
        label: Option<&str>,
        width: u32,
        color: Self::Color,
    ) -> Result<(), Self::Error>;

    /// Add a dashed line to the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_dashed_line(
        &mut self,
        data: &[(f64, f64)],
        label: Option<&str>,
        width: u32,
        sizing: (u32, u32),
        color: Self::Color,
    ) -> Result<(), Self::Error>;

    /// Add markers with error bars to the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_error_bars(
        &mut self,
        points: &[ErrorPoint],
        marker: Marker,
        label: &str,
        color: Self::Color,
    ) -> Result<(), Self::Error>;

    /// Add text, anchored at its bottom center
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        size: u32,
        color: Self::Color,
    ) -> Result<(), Self::Error>;

    /// Finalize the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn finalize(self) -> Result<(), Self::Error>;

    /// Add a plotting element to the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_element(&mut self, element: &PlottingElement) -> Result<(), Self::Error> {
        match element {
            PlottingElement::ErrorBars {
                points,
                marker,
                hue,
                label,
            } => self.add_error_bars(points, *marker, label, Self::color(*hue, 1.0)),

            PlottingElement::Line {
                data,
                stroke,
                hue,
                alpha,
                label,
            } => self.add_stroke(data, *stroke, label.as_deref(), Self::color(*hue, *alpha)),

            PlottingElement::HorizontalLine {
                y,
                stroke,
                hue,
                label,
            } => {
                let x = self.x_range();
                let data = [(x.start, *y), (x.end, *y)];
                self.add_stroke(&data, *stroke, label.as_deref(), Self::color(*hue, 1.0))
            }

            PlottingElement::Text {
                x,
                y,
                text,
                size,
                hue,
            } => self.add_text(*x, *y, text, *size, Self::color(*hue, 1.0)),
        }
    }

    /// Add a line in the given style
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_stroke(
        &mut self,
        data: &[(f64, f64)],
        stroke: Stroke,
        label: Option<&str>,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        match stroke {
            Stroke::Solid => self.add_line(data, label, LINE_WIDTH, color),
            Stroke::Dashed => self.add_dashed_line(data, label, LINE_WIDTH, DASHED, color),
            Stroke::DashDot => self.add_dashed_line(data, label, LINE_WIDTH, DASH_DOT, color),
        }
    }
}
