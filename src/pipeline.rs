//! Analysis runner for the filter -> statistics -> forecast pipeline
//!
//! Holds the loaded rate table once, then runs any number of analyses with
//! different filters and horizons. Each run filters its own copy, so runs
//! are independent and can be executed from several threads.

use crate::error::Result;
use crate::forecast::{assemble, ArimaConfig, ArimaModel, FittedArima, ForecastResult};
use crate::stats::{mean_by_region, mean_by_year, stats_by_region, RegionStats, YearlySeries};
use crate::table::{synthetic, synthetic_rates, RateFilter, RateTable, Region};
use log::info;
use serde::{Deserialize, Serialize};
use std::env;

/// Forecast horizon used by the dashboard
pub const DEFAULT_HORIZON: usize = 5;

/// Selection and forecast settings for one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub year_min: i32,
    pub year_max: i32,
    pub regions: Vec<Region>,
    /// Number of years to forecast
    pub horizon: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            year_min: synthetic::FIRST_YEAR,
            year_max: synthetic::LAST_YEAR,
            regions: Region::ALL.to_vec(),
            horizon: DEFAULT_HORIZON,
        }
    }
}

impl AnalysisConfig {
    /// Defaults overlaid with RATES_YEAR_MIN, RATES_YEAR_MAX, RATES_REGIONS
    /// (comma separated) and RATES_HORIZON. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let year_min = env::var("RATES_YEAR_MIN")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.year_min);

        let year_max = env::var("RATES_YEAR_MAX")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.year_max);

        let regions = env::var("RATES_REGIONS")
            .ok()
            .and_then(|s| parse_regions(&s).ok())
            .unwrap_or(defaults.regions);

        let horizon = env::var("RATES_HORIZON")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.horizon);

        Self { year_min, year_max, regions, horizon }
    }

    pub fn filter(&self) -> RateFilter {
        RateFilter::new(self.year_min, self.year_max, self.regions.clone())
    }
}

/// Parse a comma-separated region list, e.g. "Norte,Sul"
pub fn parse_regions(list: &str) -> std::result::Result<Vec<Region>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Everything one analysis produces
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub config: AnalysisConfig,
    pub filtered: RateTable,
    pub region_stats: Vec<RegionStats>,
    pub region_means: Vec<(Region, f64)>,
    pub yearly_means: YearlySeries,
    pub forecast: ForecastResult,
}

/// Pre-loaded runner for repeated analyses over one rate table
#[derive(Debug, Clone)]
pub struct AnalysisRunner {
    base_table: RateTable,
    model: ArimaModel,
}

impl AnalysisRunner {
    /// Create runner over the bundled synthetic dataset
    pub fn new() -> Self {
        Self::with_table(synthetic_rates(synthetic::DEFAULT_SEED))
    }

    pub fn with_table(table: RateTable) -> Self {
        Self {
            base_table: table,
            model: ArimaModel::new(),
        }
    }

    pub fn with_arima_config(mut self, config: ArimaConfig) -> Self {
        self.model = ArimaModel::with_config(config);
        self
    }

    /// Reference to the loaded table
    pub fn table(&self) -> &RateTable {
        &self.base_table
    }

    /// Filter the base table with the configured selection
    pub fn filtered(&self, config: &AnalysisConfig) -> RateTable {
        config.filter().apply(&self.base_table)
    }

    /// Fit the model to the yearly mean of the filtered table
    pub fn fit(&self, config: &AnalysisConfig) -> Result<FittedArima> {
        self.model.fit(&mean_by_year(&self.filtered(config)))
    }

    /// Run the full pipeline for one configuration
    pub fn run(&self, config: &AnalysisConfig) -> Result<AnalysisReport> {
        let filtered = self.filtered(config);
        let region_stats = stats_by_region(&filtered);
        let region_means = mean_by_region(&filtered);
        let yearly_means = mean_by_year(&filtered);

        let forecast_points = self.model.forecast(&yearly_means, config.horizon)?;
        let forecast = assemble(&yearly_means, &forecast_points)?;

        info!(
            "Analysis: {} records, {} regions, {} years, {} forecast years",
            filtered.len(),
            region_stats.len(),
            yearly_means.len(),
            forecast.forecast().len()
        );

        Ok(AnalysisReport {
            config: config.clone(),
            filtered,
            region_stats,
            region_means,
            yearly_means,
            forecast,
        })
    }

    /// Run several configurations against the same table
    pub fn run_many(&self, configs: &[AnalysisConfig]) -> Vec<Result<AnalysisReport>> {
        configs.iter().map(|config| self.run(config)).collect()
    }
}

impl Default for AnalysisRunner {
    fn default() -> Self {
        Self::new()
    }
}
