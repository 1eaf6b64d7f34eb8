use std::ops::RangeInclusive;

use crate::{bands::Band, TrendFit};

/// Named colors used by charts. Each backend maps them to its own color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hue {
    /// Acoustic band, measured data
    Blue,

    /// Optical band, trend lines
    Red,

    /// Annotations
    Purple,

    /// Axes and text
    Black,
}

/// Shape drawn at each measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Filled circle
    Circle,

    /// Filled five-pointed star
    Star,
}

/// Line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    /// Continuous line
    Solid,

    /// Long dashes
    Dashed,

    /// Short dashes, used for reference lines
    DashDot,
}

/// A measurement with its error bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorPoint {
    /// Position on the x-axis
    pub x: f64,

    /// Position on the y-axis
    pub y: f64,

    /// Half-width of the horizontal error bar
    pub x_error: f64,

    /// Half-height of the vertical error bar
    pub y_error: f64,
}
impl ErrorPoint {
    fn x_extent(&self) -> RangeInclusive<f64> {
        (self.x - self.x_error)..=(self.x + self.x_error)
    }

    fn y_extent(&self) -> RangeInclusive<f64> {
        (self.y - self.y_error)..=(self.y + self.y_error)
    }
}

/// Elements that can be plotted
#[derive(Debug, Clone, PartialEq)]
pub enum PlottingElement {
    /// Markers with error bars
    ErrorBars {
        /// The measurements
        points: Vec<ErrorPoint>,
        /// Marker shape
        marker: Marker,
        /// Marker and bar color
        hue: Hue,
        /// Legend entry
        label: String,
    },

    /// A polyline through the given points
    Line {
        /// Points, in drawing order
        data: Vec<(f64, f64)>,
        /// Line style
        stroke: Stroke,
        /// Line color
        hue: Hue,
        /// Opacity, `1.0` is opaque
        alpha: f64,
        /// Legend entry, if any
        label: Option<String>,
    },

    /// A line across the full width of the chart
    HorizontalLine {
        /// Height of the line
        y: f64,
        /// Line style
        stroke: Stroke,
        /// Line color
        hue: Hue,
        /// Legend entry, if any
        label: Option<String>,
    },

    /// Text anchored at its bottom center
    Text {
        /// Anchor x
        x: f64,
        /// Anchor y
        y: f64,
        /// Contents
        text: String,
        /// Font size in pixels
        size: u32,
        /// Text color
        hue: Hue,
    },
}
impl PlottingElement {
    /// Measurements of a trend fit with their error bars.
    ///
    /// Vertical bars are the fit's [`TrendFit::errors`]; horizontal bars are `x_error` wide on each side.
    #[must_use]
    pub fn from_fit_errors(fit: &TrendFit<'_>, x_error: f64, marker: Marker, hue: Hue, label: impl Into<String>) -> Self {
        Self::from_errors(fit.data(), &fit.errors(), x_error, marker, hue, label)
    }

    /// Measurements of a band with their error bars.
    #[must_use]
    pub fn from_band(band: &Band, marker: Marker, hue: Hue, label: impl Into<String>) -> Self {
        Self::from_errors(band.points(), band.errors(), 0.0, marker, hue, label)
    }

    /// Pairs measurements with error bars; extra values on either side are ignored.
    #[must_use]
    pub fn from_errors(
        data: &[(f64, f64)],
        y_errors: &[f64],
        x_error: f64,
        marker: Marker,
        hue: Hue,
        label: impl Into<String>,
    ) -> Self {
        let points = data
            .iter()
            .zip(y_errors)
            .map(|(&(x, y), &y_error)| ErrorPoint {
                x,
                y,
                x_error,
                y_error,
            })
            .collect();

        Self::ErrorBars {
            points,
            marker,
            hue,
            label: label.into(),
        }
    }

    /// An opaque line with an optional legend entry.
    #[must_use]
    pub fn line(data: Vec<(f64, f64)>, stroke: Stroke, hue: Hue, label: Option<String>) -> Self {
        Self::Line {
            data,
            stroke,
            hue,
            alpha: 1.0,
            label,
        }
    }

    /// Returns the legend entry for this element
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::ErrorBars { label, .. } => Some(label),
            Self::Line { label, .. } | Self::HorizontalLine { label, .. } => label.as_deref(),
            Self::Text { .. } => None,
        }
    }

    /// Extent of the element along the x-axis, including error bars.
    ///
    /// Horizontal lines span whatever range the chart has, so they have none of their own.
    #[must_use]
    pub fn x_extent(&self) -> Option<RangeInclusive<f64>> {
        match self {
            Self::ErrorBars { points, .. } => merge_extents(points.iter().map(ErrorPoint::x_extent)),
            Self::Line { data, .. } => merge_extents(data.iter().map(|(x, _)| *x..=*x)),
            Self::HorizontalLine { .. } => None,
            Self::Text { x, .. } => Some(*x..=*x),
        }
    }

    /// Extent of the element along the y-axis, including error bars.
    #[must_use]
    pub fn y_extent(&self) -> Option<RangeInclusive<f64>> {
        match self {
            Self::ErrorBars { points, .. } => merge_extents(points.iter().map(ErrorPoint::y_extent)),
            Self::Line { data, .. } => merge_extents(data.iter().map(|(_, y)| *y..=*y)),
            Self::HorizontalLine { y, .. } | Self::Text { y, .. } => Some(*y..=*y),
        }
    }
}

/// Smallest range covering every finite input range.
pub(crate) fn merge_extents(
    extents: impl IntoIterator<Item = RangeInclusive<f64>>,
) -> Option<RangeInclusive<f64>> {
    extents
        .into_iter()
        .filter(|r| r.start().is_finite() && r.end().is_finite())
        .fold(None, |acc: Option<(f64, f64)>, r| {
            Some(match acc {
                Some((min, max)) => (min.min(*r.start()), max.max(*r.end())),
                None => (*r.start(), *r.end()),
            })
        })
        .map(|(min, max)| min..=max)
}
