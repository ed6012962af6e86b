//! check-coupling - local include coupling gate
//!
//! Usage:
//!   check-coupling [OPTIONS] <SRC_DIR>
//!
//! Exits with the number of files whose coupling exceeds the threshold.

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use source_gates::{
    CouplingOptions, GateExit, build_coupling_report, scan_sources,
    cli::{CommonArgs, configure_threads, existing_dir},
    init_logging,
};

/// Check a source directory for coupling of local source files
#[derive(Parser, Debug)]
#[command(name = "check-coupling")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source directory to scan
    #[arg(value_parser = existing_dir)]
    src_dir: PathBuf,

    /// Coupling failure threshold, in percent [default: 13.37]
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Ignore the root main.cpp (default)
    #[arg(long, overrides_with = "check_main")]
    ignore_main: bool,

    /// Report the root main.cpp like any other file
    #[arg(long, overrides_with = "ignore_main")]
    check_main: bool,

    /// Only print failed files
    #[arg(long)]
    only_show_failures: bool,

    /// Number of threads for reading files (default: all CPU cores)
    #[arg(long, short = 'j', value_name = "N")]
    jobs: Option<usize>,

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
    configure_threads(args.jobs);

    let config = args.common.load_config(&args.src_dir)?;
    let scan_options = config.scan_options()?;

    let ignore_main = match (args.ignore_main, args.check_main) {
        (true, _) => true,
        (_, true) => false,
        _ => config.coupling.ignore_main,
    };
    let options = CouplingOptions {
        threshold: args.threshold.unwrap_or(config.coupling.threshold),
        ignore_main,
        only_show_failures: args.only_show_failures || config.output.only_show_failures,
    };
    debug!(?options, "coupling options");

    let scan = scan_sources(&args.src_dir, &scan_options)?;

    let mut sink = args.common.sink(&config);
    let summary = build_coupling_report(&scan, &options, sink.as_mut())?;
    sink.finish(summary.failures)?;

    Ok(summary.failures)
}
