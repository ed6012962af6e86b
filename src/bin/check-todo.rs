//! check-todo - fails when any TODO or FIXME is left in the sources
//!
//! Usage:
//!   check-todo [OPTIONS] <SRC_DIR>

use std::path::PathBuf;

use clap::Parser;

use source_gates::{
    GateExit, build_todo_report,
    cli::{CommonArgs, existing_dir},
    init_logging, scan_sources,
};

/// Count TODO and FIXME markers in a source directory
#[derive(Parser, Debug)]
#[command(name = "check-todo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source directory to scan
    #[arg(value_parser = existing_dir)]
    src_dir: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> GateExit {
    let args = Args::parse();
    init_logging(args.common.verbose);

    match run(&args) {
        Ok(found) => GateExit::from_failures(usize::from(found)),
        Err(e) => {
            eprintln!("Error: {}", e);
            GateExit::Fatal
        }
    }
}

fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let config = args.common.load_config(&args.src_dir)?;
    let scan = scan_sources(&args.src_dir, &config.scan_options()?)?;

    let mut sink = args.common.sink(&config);
    let summary = build_todo_report(&scan, sink.as_mut())?;
    sink.finish(summary.total)?;

    Ok(summary.has_todos())
}
