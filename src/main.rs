//! Taxation Analytics CLI
//!
//! Runs the filter -> statistics -> forecast pipeline and prints the result

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use taxation_analytics::pipeline::parse_regions;
use taxation_analytics::table::{load_rates, synthetic_rates, synthetic::DEFAULT_SEED};
use taxation_analytics::{AnalysisConfig, AnalysisReport, AnalysisRunner};

#[derive(Debug, Parser)]
#[command(version, about = "Analyze and forecast regional taxation rates")]
struct Args {
    /// Rate table CSV (Year,Region,Rate); synthetic data when omitted
    #[arg(long)]
    data: Option<PathBuf>,

    /// Seed for the synthetic table
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// First year to include
    #[arg(long)]
    year_min: Option<i32>,

    /// Last year to include
    #[arg(long)]
    year_max: Option<i32>,

    /// Comma-separated regions, e.g. "Norte,Sul"
    #[arg(long)]
    regions: Option<String>,

    /// Years to forecast
    #[arg(long)]
    horizon: Option<usize>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let table = match &args.data {
        Some(path) => load_rates(path).with_context(|| format!("loading {}", path.display()))?,
        None => synthetic_rates(args.seed),
    };

    let mut config = AnalysisConfig::from_env();
    if let Some(year_min) = args.year_min {
        config.year_min = year_min;
    }
    if let Some(year_max) = args.year_max {
        config.year_max = year_max;
    }
    if let Some(list) = &args.regions {
        config.regions = parse_regions(list).map_err(anyhow::Error::msg)?;
    }
    if let Some(horizon) = args.horizon {
        config.horizon = horizon;
    }

    let runner = AnalysisRunner::with_table(table);
    let report = runner.run(&config).context("running rate analysis")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    let config = &report.config;
    println!("Taxation Analytics v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");
    println!(
        "Years {}..={}, {} region(s), {} record(s)\n",
        config.year_min,
        config.year_max,
        config.regions.len(),
        report.filtered.len()
    );

    println!("Statistics by region:");
    println!(
        "{:<14} {:>5} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "Region", "Count", "Mean", "StdDev", "Min", "P25", "P50", "P75", "Max"
    );
    println!("{}", "-".repeat(92));
    for s in &report.region_stats {
        let std_dev = s
            .std_dev
            .map(|v| format!("{:.3}", v))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:<14} {:>5} {:>9.3} {:>9} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
            s.region.as_str(),
            s.count,
            s.mean,
            std_dev,
            s.min,
            s.p25,
            s.p50,
            s.p75,
            s.max
        );
    }

    println!("\nYearly mean and forecast:");
    println!("{:>6} {:>10} {:>10}", "Year", "Rate", "Kind");
    println!("{}", "-".repeat(28));
    for entry in report.forecast.entries() {
        let kind = if entry.is_historical { "history" } else { "forecast" };
        println!("{:>6} {:>10.3} {:>10}", entry.year, entry.value, kind);
    }
}
