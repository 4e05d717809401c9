//! Taxation Analytics - regional taxation-rate analysis and forecasting
//!
//! This library provides:
//! - Rate tables of (year, region, rate) records, with CSV loading and a seeded synthetic source
//! - Year-range and region-set filtering
//! - Per-region descriptive statistics and yearly mean series
//! - ARIMA(2,1,2) fitting by conditional sum of squares and multi-year forecasts
//! - An analysis runner tying the pipeline together

pub mod error;
pub mod table;
pub mod stats;
pub mod forecast;
pub mod pipeline;

// Re-export commonly used types
pub use error::{AnalysisError, LoadError, Result};
pub use table::{filter, RateFilter, RateTable, Record, Region};
pub use stats::{mean_by_region, mean_by_year, stats_by_region, RegionStats, SeriesPoint, YearlySeries};
pub use forecast::{assemble, ArimaModel, ForecastEntry, ForecastPoint, ForecastResult};
pub use pipeline::{AnalysisConfig, AnalysisReport, AnalysisRunner};
