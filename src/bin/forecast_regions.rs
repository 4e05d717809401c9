//! Forecast every region separately
//!
//! Each region is filtered into its own table and fitted in parallel.
//! Supports JSON output via --json.

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use taxation_analytics::forecast::ForecastPoint;
use taxation_analytics::pipeline::DEFAULT_HORIZON;
use taxation_analytics::table::{load_rates, synthetic::DEFAULT_SEED, synthetic_rates};
use taxation_analytics::{filter, mean_by_year, ArimaModel, Region};

#[derive(Debug, Parser)]
#[command(about = "Per-region ARIMA(2,1,2) rate forecasts")]
struct Args {
    /// Rate table CSV; synthetic data when omitted
    #[arg(long)]
    data: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    horizon: usize,

    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct RegionForecast {
    region: Region,
    last_rate: Option<f64>,
    forecast: Vec<ForecastPoint>,
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let table = match &args.data {
        Some(path) => load_rates(path).with_context(|| format!("loading {}", path.display()))?,
        None => synthetic_rates(DEFAULT_SEED),
    };
    let (year_min, year_max) = table.year_range().context("rate table is empty")?;
    let model = ArimaModel::new();

    let results: Vec<RegionForecast> = table
        .regions()
        .par_iter()
        .map(|&region| {
            let own = filter(&table, year_min, year_max, &[region]);
            let series = mean_by_year(&own);
            let last_rate = series.points().last().map(|p| p.value);
            match model.forecast(&series, args.horizon) {
                Ok(forecast) => RegionForecast { region, last_rate, forecast, error: None },
                Err(e) => RegionForecast {
                    region,
                    last_rate,
                    forecast: Vec::new(),
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("Region forecasts ({} years ahead):", args.horizon);
    for result in &results {
        match &result.error {
            Some(e) => println!("  {:<14} failed: {}", result.region.as_str(), e),
            None => {
                let values: Vec<String> = result
                    .forecast
                    .iter()
                    .map(|p| format!("{}={:.2}", p.year, p.value))
                    .collect();
                println!(
                    "  {:<14} last={:.2}  {}",
                    result.region.as_str(),
                    result.last_rate.unwrap_or(f64::NAN),
                    values.join(" ")
                );
            }
        }
    }
    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
