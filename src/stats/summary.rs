//! Descriptive statistics for a group of rates

use crate::error::{AnalysisError, Result};
use crate::table::Region;
use serde::{Deserialize, Serialize};

/// Summary of the rates recorded for one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    pub region: Region,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` when fewer than 2 records
    pub std_dev: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl RegionStats {
    /// Summarize `rates` for `region`; `None` when there are no rates
    pub fn from_rates(region: Region, rates: &[f64]) -> Option<Self> {
        let mut sorted = rates.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let (&min, &max) = (sorted.first()?, sorted.last()?);

        Some(Self {
            region,
            count: rates.len(),
            mean: mean(rates),
            std_dev: sample_std_dev(rates),
            min,
            p25: percentile_sorted(&sorted, 0.25)?,
            p50: percentile_sorted(&sorted, 0.50)?,
            p75: percentile_sorted(&sorted, 0.75)?,
            max,
        })
    }

    /// Standard deviation, or `DegenerateStats` for single-record regions
    pub fn require_std_dev(&self) -> Result<f64> {
        self.std_dev.ok_or(AnalysisError::DegenerateStats {
            region: self.region,
            count: self.count,
        })
    }
}

/// Arithmetic mean; NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with the n-1 denominator
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Percentile of pre-sorted data by linear interpolation between order statistics.
///
/// Position is `p * (n - 1)`; the result interpolates between the values at
/// the floor and ceiling of that position. `None` for an empty slice.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = p.clamp(0.0, 1.0) * last as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    if lower == upper {
        Some(sorted[lower])
    } else {
        Some(sorted[lower] * (1.0 - frac) + sorted[upper] * frac)
    }
}
