//! check-coverage - line coverage gate over a genhtml report
//!
//! Usage:
//!   check-coverage [OPTIONS] <COVERAGE_DIR>
//!
//! Exits with the number of directories below the line coverage threshold.

use std::path::PathBuf;

use clap::Parser;

use source_gates::{
    CoverageOptions, GateExit, build_coverage_report,
    cli::{CommonArgs, coverage_dir},
    init_logging,
};

/// Summarize an HTML coverage report and gate on line coverage
#[derive(Parser, Debug)]
#[command(name = "check-coverage")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Coverage report directory containing index.html
    #[arg(value_parser = coverage_dir)]
    coverage_dir: PathBuf,

    /// Minimum line coverage, in percent [default: 90.0]
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Only print entries below the threshold
    #[arg(long)]
    only_show_failures: bool,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> GateExit {
    let args = Args::parse();
    init_logging(args.common.verbose);

    match run(&args) {
        Ok(failures) => GateExit::from_failures(failures),
        Err(e) => {
            eprintln!("Error: {}", e);
            GateExit::Fatal
        }
    }
}

fn run(args: &Args) -> Result<usize, Box<dyn std::error::Error>> {
    let config = args.common.load_config(&args.coverage_dir)?;

    let options = CoverageOptions {
        threshold: args.threshold.unwrap_or(config.coverage.threshold),
        only_show_failures: args.only_show_failures || config.output.only_show_failures,
    };

    let mut sink = args.common.sink(&config);
    let summary = build_coverage_report(&args.coverage_dir, &options, sink.as_mut())?;
    sink.finish(summary.failures)?;

    Ok(summary.failures)
}
