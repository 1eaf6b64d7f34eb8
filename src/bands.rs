//! Acoustic and optical band analysis of a diatomic lattice
//!
//! Measurements are split at a fixed index: the leading points form the acoustic band and the rest
//! form the optical band. Each band gets its own trend and error bars, and the gap between them is
//! read directly off the measurements:
//!
//! ```text
//! band_gap = f_optical[0] - f_acoustic[last]
//! ```
use std::path::PathBuf;

use crate::{
    config::BandsConfig,
    error::{Error, Result},
    solver::Solver,
    statistics, FitProperties, TrendFit,
};

/// Measured frequencies of the built-in diatomic lattice run, in kHz.
pub const FREQUENCY_KHZ: [f64; 8] = [2.251, 7.576, 12.64, 17.08, 21.24, 36.03, 39.78, 44.28];

/// Phase of each built-in measurement, in degrees.
pub const PHASE_DEG: [f64; 8] = [90.4, 270.5, 450.3, 630.8, 810.9, 991.2, 1171.4, 1353.2];

/// Leading measurements that belong to the acoustic band.
pub const ACOUSTIC_POINTS: usize = 5;

/// Degree of the acoustic trend.
pub const ACOUSTIC_DEGREE: usize = 3;

/// Degree of the optical trend.
pub const OPTICAL_DEGREE: usize = 2;

/// Branch of the dispersion relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BandKind {
    /// Low-frequency branch, starting at zero frequency
    Acoustic,

    /// High-frequency branch, above the band gap
    Optical,
}
impl std::fmt::Display for BandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Acoustic => write!(f, "Acoustic"),
            Self::Optical => write!(f, "Optical"),
        }
    }
}

/// One branch of the measurements with its trend.
///
/// `x` is the phase and `y` the frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    kind: BandKind,
    fit: TrendFit<'static>,
    errors: Vec<f64>,
}
impl Band {
    /// Fits a trend of the given degree to a band.
    ///
    /// # Errors
    /// Returns [`Error::Shape`] if the band has fewer than `degree + 1` points, or any fitting error.
    pub fn new(kind: BandKind, points: Vec<(f64, f64)>, degree: usize, solver: &Solver) -> Result<Self> {
        let fit = TrendFit::with_solver(points, degree, solver)?;
        let errors = fit.errors();

        log::debug!("{kind} band: {} ({} points)", fit.equation(), errors.len());
        Ok(Self { kind, fit, errors })
    }

    /// Which branch this is.
    #[must_use]
    pub fn kind(&self) -> BandKind {
        self.kind
    }

    /// The trend through the band.
    #[must_use]
    pub fn fit(&self) -> &TrendFit<'static> {
        &self.fit
    }

    /// The error bar of each measurement in the band.
    #[must_use]
    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    /// The `(phase, frequency)` measurements of the band.
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        self.fit.data()
    }

    /// First measured frequency.
    #[must_use]
    pub fn first_frequency(&self) -> Option<f64> {
        self.points().first().map(|(_, f)| *f)
    }

    /// Last measured frequency.
    #[must_use]
    pub fn last_frequency(&self) -> Option<f64> {
        self.points().last().map(|(_, f)| *f)
    }
}

/// Both bands with the quantities derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct BandAnalysis {
    /// The acoustic band
    pub acoustic: Band,

    /// The optical band
    pub optical: Band,

    /// `f_optical[0] - f_acoustic[last]`, in kHz
    pub band_gap: f64,

    /// Highest acoustic frequency
    pub max_acoustic: f64,

    /// Lowest optical frequency
    pub min_optical: f64,

    /// Mean of all measured frequencies
    pub mean_frequency: f64,
}
impl BandAnalysis {
    /// Phase halfway between the last acoustic and the first optical measurement.
    ///
    /// This is where the band gap is annotated on charts.
    #[must_use]
    pub fn gap_phase(&self) -> f64 {
        let last_acoustic = self.acoustic.points().last().map_or(0.0, |(p, _)| *p);
        let first_optical = self.optical.points().first().map_or(last_acoustic, |(p, _)| *p);
        (last_acoustic + first_optical) / 2.0
    }
}

/// Splits the measurements into acoustic and optical bands and fits each one.
///
/// The first `acoustic_points` measurements are acoustic and the rest are optical.
///
/// # Errors
/// Returns [`Error::Shape`] if:
/// - `phase` and `frequency` differ in length
/// - the split leaves either band empty
/// - a band has fewer than `degree + 1` points
///
/// # Example
/// ```
/// # use latticefit::{bands, solver::Solver};
/// let analysis = bands::analyze(
///     &bands::PHASE_DEG,
///     &bands::FREQUENCY_KHZ,
///     bands::ACOUSTIC_POINTS,
///     bands::ACOUSTIC_DEGREE,
///     bands::OPTICAL_DEGREE,
///     &Solver::Svd,
/// ).unwrap();
/// assert!((analysis.band_gap - 14.79).abs() < 1e-9);
/// ```
pub fn analyze(
    phase: &[f64],
    frequency: &[f64],
    acoustic_points: usize,
    acoustic_degree: usize,
    optical_degree: usize,
    solver: &Solver,
) -> Result<BandAnalysis> {
    if phase.len() != frequency.len() {
        return Err(Error::shape(phase.len(), frequency.len(), 0));
    }

    let n = phase.len();
    if acoustic_points == 0 {
        return Err(Error::shape(0, 0, acoustic_degree));
    }
    if acoustic_points >= n {
        return Err(Error::shape(0, 0, optical_degree));
    }

    let points: Vec<(f64, f64)> = phase.iter().copied().zip(frequency.iter().copied()).collect();
    let (acoustic, optical) = points.split_at(acoustic_points);

    let acoustic = Band::new(BandKind::Acoustic, acoustic.to_vec(), acoustic_degree, solver)?;
    let optical = Band::new(BandKind::Optical, optical.to_vec(), optical_degree, solver)?;

    let (Some(last_acoustic), Some(first_optical)) = (acoustic.last_frequency(), optical.first_frequency())
    else {
        return Err(Error::NoData);
    };

    let max_acoustic = acoustic
        .points()
        .iter()
        .map(|(_, f)| *f)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_optical = optical
        .points()
        .iter()
        .map(|(_, f)| *f)
        .fold(f64::INFINITY, f64::min);

    let analysis = BandAnalysis {
        band_gap: first_optical - last_acoustic,
        max_acoustic,
        min_optical,
        mean_frequency: statistics::mean(frequency),
        acoustic,
        optical,
    };

    log::info!("Band gap: {:.2} kHz", analysis.band_gap);
    Ok(analysis)
}

/// Summary of a band analysis run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BandsReport {
    /// Acoustic trend properties
    pub acoustic: FitProperties<f64>,

    /// Optical trend properties
    pub optical: FitProperties<f64>,

    /// `f_optical[0] - f_acoustic[last]`, in kHz
    pub band_gap: f64,

    /// Highest acoustic frequency
    pub max_acoustic: f64,

    /// Lowest optical frequency
    pub min_optical: f64,

    /// Where the chart was written, if one was rendered
    pub chart: Option<PathBuf>,
}
impl BandsReport {
    fn new(analysis: &BandAnalysis, chart: Option<PathBuf>) -> Self {
        Self {
            acoustic: analysis.acoustic.fit().properties(),
            optical: analysis.optical.fit().properties(),
            band_gap: analysis.band_gap,
            max_acoustic: analysis.max_acoustic,
            min_optical: analysis.min_optical,
            chart,
        }
    }
}
impl std::fmt::Display for BandsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (kind, band) in [(BandKind::Acoustic, &self.acoustic), (BandKind::Optical, &self.optical)] {
            writeln!(f, "{kind} trend (degree {}): {}", band.degree, band.equation)?;
            writeln!(f, "  errors: {:.4?}", band.errors)?;
        }

        writeln!(f, "Max acoustic = {}kHz", self.max_acoustic)?;
        writeln!(f, "Min optical = {}kHz", self.min_optical)?;
        write!(f, "Band Gap: {:.2} kHz", self.band_gap)?;

        if let Some(chart) = &self.chart {
            write!(f, "\nChart: {}", chart.display())?;
        }
        Ok(())
    }
}

/// Runs the band analysis described by `config`, rendering the chart if requested.
///
/// # Errors
/// Returns an error if either band cannot be fitted or the chart cannot be written.
pub fn run(config: &BandsConfig) -> Result<BandsReport> {
    let analysis = analyze(
        &config.phase,
        &config.frequency,
        config.acoustic_points,
        config.acoustic_degree,
        config.optical_degree,
        &config.solver,
    )?;

    let chart = if config.plot { render(&analysis, config)? } else { None };
    Ok(BandsReport::new(&analysis, chart))
}

#[cfg(feature = "plotting")]
fn render(analysis: &BandAnalysis, config: &BandsConfig) -> Result<Option<PathBuf>> {
    let path = config.output_path();
    crate::plotting::plot_bands(analysis, &config.chart, &path)?;
    log::info!("Wrote chart to {}", path.display());
    Ok(Some(path))
}

#[cfg(not(feature = "plotting"))]
#[allow(clippy::unnecessary_wraps)]
fn render(_: &BandAnalysis, _: &BandsConfig) -> Result<Option<PathBuf>> {
    log::warn!("Built without the `plotting` feature; no chart written");
    Ok(None)
}
