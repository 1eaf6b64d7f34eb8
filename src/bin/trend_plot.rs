use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use latticefit::{
    config::TrendConfig,
    solver::{LmOptions, Solver},
    trend,
};

/// Degree the lab script fits with.
const SCRIPT_DEGREE: usize = 3;

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum SolverKind {
    /// Levenberg-Marquardt from an all-ones guess
    #[default]
    Lm,

    /// Direct SVD least squares
    Svd,
}
impl From<SolverKind> for Solver {
    fn from(kind: SolverKind) -> Self {
        match kind {
            SolverKind::Lm => Solver::LevenbergMarquardt(LmOptions::default()),
            SolverKind::Svd => Solver::Svd,
        }
    }
}

/// Fit a polynomial trend to dispersion data and chart it with error bars.
///
/// The file needs columns `ppc` (phase per unit cell, degrees) and `f` (frequency, kHz).
#[derive(Debug, Parser)]
#[command(name = "trend_plot", version)]
struct Cli {
    /// Data file: .csv, .xls, .xlsx or .ods
    file: PathBuf,

    /// Degree of the trend polynomial
    #[arg(short, long, default_value_t = SCRIPT_DEGREE)]
    degree: usize,

    /// Least-squares solver
    #[arg(long, value_enum, default_value_t = SolverKind::Lm)]
    solver: SolverKind,

    /// Chart path [default: target/plot_output/trend.png]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip rendering the chart
    #[arg(long = "no-plot", action = ArgAction::SetTrue)]
    no_plot: bool,

    /// Print the summary as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// More logging; repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = TrendConfig {
        degree: cli.degree,
        solver: cli.solver.into(),
        output: cli.output,
        plot: !cli.no_plot,
        ..TrendConfig::new(cli.file)
    };

    let report = match trend::run(&config) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{e:?}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{report}");
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new().filter_level(level).init();
}
