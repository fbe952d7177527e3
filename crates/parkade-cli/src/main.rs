use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use parkade::{Category, FeeSchedule};
use parkade_cli::{OutputFormat, RunOptions, logging};

/// Replay a parking command file and print one line per outcome.
#[derive(Debug, Parser)]
#[command(name = "parkade", version)]
struct Args {
    /// Command file: capacity line, then Enter/Exit commands
    input: PathBuf,

    /// Output format for outcome lines
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Hourly rate for cars
    #[arg(long, default_value_t = 2)]
    car_rate: u64,

    /// Hourly rate for motorcycles
    #[arg(long, default_value_t = 1)]
    motorcycle_rate: u64,
}

fn main() {
    let args = Args::parse();
    logging::init_tracing();

    tracing::info!("parkade {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;

    let options = RunOptions {
        format: args.format,
        fees: FeeSchedule::zero()
            .with_rate(Category::Car, args.car_rate)
            .with_rate(Category::Motorcycle, args.motorcycle_rate),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    parkade_cli::run(BufReader::new(file), &mut out, &options)
        .with_context(|| format!("failed to process {}", args.input.display()))?;

    Ok(())
}
