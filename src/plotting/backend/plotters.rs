//! Plotting backend using the `plotters` crate
//!
//! Uses the bitmap backend to create PNG files. Text is rendered with the system `sans-serif` font.
use std::{f64::consts::PI, ops::Range, path::Path};

use plotters::{
    coord::{types::RangedCoordf64, Shift},
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{
    config::{LegendPosition, PlotOptions},
    plotting::{ErrorPoint, Hue, Marker, PlotBackend},
};

const MAX_LBL_WIDTH: usize = 120;

/// Width of error bar caps, in pixels
const CAP_WIDTH: u32 = 10;

/// Radius of circle markers, in pixels
const CIRCLE_RADIUS: i32 = 4;

/// Outer radius of star markers, in pixels
const STAR_RADIUS: f64 = 9.0;

/// A drawing area root for plotters
pub struct Root<'a>(DrawingArea<BitMapBackend<'a>, Shift>);
impl<'a> AsRef<DrawingArea<BitMapBackend<'a>, Shift>> for Root<'a> {
    fn as_ref(&self) -> &DrawingArea<BitMapBackend<'a>, Shift> {
        &self.0
    }
}
impl<'a> Root<'a> {
    /// Create a new drawing area root for plotters
    ///
    /// Will create a PNG file at the given path with the given size
    ///
    /// # Errors
    /// Returns an error if the drawing area cannot be cleared
    pub fn new(path: &'a Path, size: (u32, u32)) -> Result<Self, Error<'a>> {
        let backend = BitMapBackend::new(path, size);
        let root = IntoDrawingArea::into_drawing_area(backend);
        root.fill(&WHITE)?;
        Ok(Self(root))
    }
}

/// Plotters backend for plotting
pub struct Backend<'root> {
    context: ChartContext<'root, BitMapBackend<'root>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x_range: Range<f64>,
    y_range: Range<f64>,

    x_label: Option<String>,
    y_label: Option<String>,

    grid: bool,
    hide_legend: bool,
    legend_position: LegendPosition,
}
impl Backend<'_> {
    fn clip(&self, data: &[(f64, f64)]) -> Vec<(f64, f64)> {
        data.iter()
            .map(|(x, y)| (*x, y.clamp(self.y_range.start, self.y_range.end)))
            .collect()
    }
}
impl<'root> PlotBackend for Backend<'root> {
    type Error = Error<'root>;
    type Color = RGBAColor;
    type Root = Root<'root>;

    fn color(hue: Hue, alpha: f64) -> Self::Color {
        match hue {
            Hue::Blue => BLUE.mix(alpha),
            Hue::Red => RED.mix(alpha),
            Hue::Purple => RGBColor(128, 0, 128).mix(alpha),
            Hue::Black => BLACK.mix(alpha),
        }
    }

    fn new_plot(
        root: &Self::Root,
        options: &PlotOptions,
        x_range: Range<f64>,
        y_range: Range<f64>,
    ) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let mut context = ChartBuilder::on(root.as_ref());
        context.margin(10).x_label_area_size(40).y_label_area_size(60);

        if !options.title.is_empty() {
            context.caption(&options.title, (FontFamily::SansSerif, 20).into_font());
        }

        let context = context.build_cartesian_2d(x_range.clone(), y_range.clone())?;

        Ok(Self {
            context,
            x_range,
            y_range,

            x_label: options.x_label.clone(),
            y_label: options.y_label.clone(),

            grid: options.grid,
            hide_legend: options.hide_legend,
            legend_position: options.legend_position,
        })
    }

    fn x_range(&self) -> Range<f64> {
        self.x_range.clone()
    }

    fn add_line(
        &mut self,
        data: &[(f64, f64)],
        label: Option<&str>,
        width: u32,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let data = self.clip(data);

        let style = ShapeStyle::from(color).stroke_width(width);
        let series = self.context.draw_series(LineSeries::new(data, style))?;
        if let Some(label) = label {
            series
                .label(shorten(label))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }
        Ok(())
    }

    fn add_dashed_line(
        &mut self,
        data: &[(f64, f64)],
        label: Option<&str>,
        width: u32,
        sizing: (u32, u32),
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let data = self.clip(data);

        let style = ShapeStyle::from(color).stroke_width(width);
        let series = self
            .context
            .draw_series(DashedLineSeries::new(data, sizing.0, sizing.1, style))?;
        if let Some(label) = label {
            let dash = i32::try_from(sizing.0.min(8)).unwrap_or(8);
            series.label(shorten(label)).legend(move |c| {
                EmptyElement::at(c)
                    + PathElement::new(vec![(0, 0), (dash, 0)], style)
                    + PathElement::new(vec![(20 - dash, 0), (20, 0)], style)
            });
        }
        Ok(())
    }

    fn add_error_bars(
        &mut self,
        points: &[ErrorPoint],
        marker: Marker,
        label: &str,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let style = ShapeStyle::from(color).stroke_width(1);
        let (y_min, y_max) = (self.y_range.start, self.y_range.end);

        //
        // Bars first so the markers sit on top
        self.context.draw_series(points.iter().map(|p| {
            ErrorBar::new_vertical(
                p.x,
                (p.y - p.y_error).clamp(y_min, y_max),
                p.y.clamp(y_min, y_max),
                (p.y + p.y_error).clamp(y_min, y_max),
                style,
                CAP_WIDTH,
            )
        }))?;

        if points.iter().any(|p| p.x_error > 0.0) {
            self.context.draw_series(points.iter().map(|p| {
                ErrorBar::new_horizontal(
                    p.y,
                    p.x - p.x_error,
                    p.x,
                    p.x + p.x_error,
                    style,
                    CAP_WIDTH,
                )
            }))?;
        }

        let fill = ShapeStyle::from(color).filled();
        let label = shorten(label);
        match marker {
            Marker::Circle => {
                self.context
                    .draw_series(points.iter().map(|p| Circle::new((p.x, p.y), CIRCLE_RADIUS, fill)))?
                    .label(label)
                    .legend(move |c| Circle::new(c, CIRCLE_RADIUS, fill));
            }

            Marker::Star => {
                let star = star_vertices(STAR_RADIUS);
                self.context
                    .draw_series(
                        points
                            .iter()
                            .map(|p| EmptyElement::at((p.x, p.y)) + Polygon::new(star.clone(), fill)),
                    )?
                    .label(label)
                    .legend(move |(x, y)| {
                        let star: Vec<_> = star_vertices(STAR_RADIUS * 0.7)
                            .into_iter()
                            .map(|(dx, dy)| (x + dx, y + dy))
                            .collect();
                        Polygon::new(star, fill)
                    });
            }
        }

        Ok(())
    }

    fn add_text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        size: u32,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let style = (FontFamily::SansSerif, f64::from(size))
            .into_font()
            .color(&color)
            .pos(Pos::new(HPos::Center, VPos::Bottom));

        self.context
            .draw_series(std::iter::once(Text::new(text.to_string(), (x, y), style)))?;
        Ok(())
    }

    fn finalize(mut self) -> Result<(), Self::Error> {
        //
        // Mesh and axes
        let mut context = self.context.configure_mesh();
        context.label_style((FontFamily::SansSerif, 14));

        if !self.grid {
            context.disable_mesh();
        }

        if let Some(x_label) = &self.x_label {
            context.x_desc(x_label);
        }

        if let Some(y_label) = &self.y_label {
            context.y_desc(y_label);
        }

        context.draw()?;

        if !self.hide_legend {
            //
            // Legend
            let position = match self.legend_position {
                LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
                LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
                LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
                LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
            };

            self.context
                .configure_series_labels()
                .label_font((FontFamily::SansSerif, 13))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .position(position)
                .draw()?;
        }

        self.context.plotting_area().present()?;
        Ok(())
    }
}

/// Shorten label and add [...] if too long
fn shorten(label: &str) -> String {
    if label.chars().count() > MAX_LBL_WIDTH {
        let mut s: String = label.chars().take(MAX_LBL_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        label.to_string()
    }
}

/// Pixel offsets of a five-pointed star centered on the origin, point up.
#[allow(clippy::cast_possible_truncation)]
fn star_vertices(radius: f64) -> Vec<(i32, i32)> {
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { radius } else { radius * 0.4 };
            let angle = f64::from(i) * PI / 5.0 - PI / 2.0;
            ((r * angle.cos()).round() as i32, (r * angle.sin()).round() as i32)
        })
        .collect()
}

/// Error occurring during plotting
#[derive(Debug, thiserror::Error)]
pub enum Error<'root> {
    /// Error drawing the plot
    #[error("Error drawing plot: {0}")]
    Draw(#[from] DrawingAreaErrorKind<<BitMapBackend<'root> as DrawingBackend>::ErrorType>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_vertices() {
        let star = star_vertices(10.0);
        assert_eq!(star.len(), 10);

        // Tip points straight up (negative y in pixel space)
        assert_eq!(star[0], (0, -10));

        // Rounding can push a tip up to one pixel past the radius
        assert!(star.iter().all(|(x, y)| x * x + y * y <= 11 * 11));
        assert!(star.iter().any(|(x, y)| x * x + y * y > 100));

        // Inner vertices stay near 0.4 of the radius
        assert!(star.iter().skip(1).step_by(2).all(|(x, y)| x * x + y * y <= 5 * 5));
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("Joining Line"), "Joining Line");
        let long = "x".repeat(200);
        assert_eq!(shorten(&long).chars().count(), MAX_LBL_WIDTH);
        assert!(shorten(&long).ends_with("..."));
    }
}
