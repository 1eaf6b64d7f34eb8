use std::path::PathBuf;

use clap::{ArgAction, Parser};
use latticefit::{bands, config::BandsConfig};

/// Split the built-in diatomic lattice measurements into acoustic and optical bands,
/// fit a trend to each and chart them with the band gap.
#[derive(Debug, Parser)]
#[command(name = "dispersion_bands", version)]
struct Cli {
    /// Chart path [default: target/plot_output/bands.png]
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

    let config = BandsConfig {
        output: cli.output,
        plot: !cli.no_plot,
        ..BandsConfig::default()
    };

    let report = match bands::run(&config) {
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
