//! Write the seeded synthetic rate table to CSV
//!
//! Usage: cargo run --bin generate_rates -- --seed 42 --output data/taxation_rates.csv

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use taxation_analytics::table::{loader::DEFAULT_RATES_PATH, synthetic::DEFAULT_SEED, synthetic_rates, write_rates};

#[derive(Debug, Parser)]
#[command(about = "Generate a synthetic taxation-rate table")]
struct Args {
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(long, default_value = DEFAULT_RATES_PATH)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let table = synthetic_rates(args.seed);
    write_rates(&args.output, &table)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!("Wrote {} records to {}", table.len(), args.output.display());
    Ok(())
}
