//! Group-by aggregations over a rate table
//!
//! Each grouping walks the records once, accumulating into a key -> bucket
//! map, and emits groups in a deterministic order.

use super::summary::{mean, RegionStats};
use crate::table::{RateTable, Region};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One point of a yearly mean series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// Mean rate per year, strictly increasing in year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlySeries {
    points: Vec<SeriesPoint>,
}

impl YearlySeries {
    /// Build from (year, value) pairs; `None` unless years strictly increase
    pub fn new(points: Vec<SeriesPoint>) -> Option<Self> {
        if points.windows(2).all(|w| w[0].year < w[1].year) {
            Some(Self { points })
        } else {
            None
        }
    }

    /// Series with consecutive years starting at `first_year`; values that
    /// would fall past `i32::MAX` are dropped
    pub fn from_values(first_year: i32, values: &[f64]) -> Self {
        let points = values
            .iter()
            .zip(0..)
            .map_while(|(&value, k)| {
                first_year.checked_add(k).map(|year| SeriesPoint { year, value })
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.points.first().map(|p| p.year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.points.last().map(|p| p.year)
    }
}

/// Collect rates per region, keeping regions in first-appearance order
fn rates_by_region(table: &RateTable) -> Vec<(Region, Vec<f64>)> {
    let mut index: HashMap<Region, usize> = HashMap::new();
    let mut groups: Vec<(Region, Vec<f64>)> = Vec::new();

    for record in table {
        let slot = *index.entry(record.region()).or_insert_with(|| {
            groups.push((record.region(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record.rate());
    }

    groups
}

/// Descriptive statistics per region, ordered by first appearance of the region
pub fn stats_by_region(table: &RateTable) -> Vec<RegionStats> {
    let stats: Vec<RegionStats> = rates_by_region(table)
        .into_iter()
        .filter_map(|(region, rates)| RegionStats::from_rates(region, &rates))
        .collect();

    debug!("Computed statistics for {} regions", stats.len());
    stats
}

/// Mean rate per year in ascending year order; years without records are absent
pub fn mean_by_year(table: &RateTable) -> YearlySeries {
    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();

    for record in table {
        let entry = sums.entry(record.year()).or_insert((0.0, 0));
        entry.0 += record.rate();
        entry.1 += 1;
    }

    let points = sums
        .into_iter()
        .map(|(year, (sum, count))| SeriesPoint {
            year,
            value: sum / count as f64,
        })
        .collect();

    YearlySeries { points }
}

/// Mean rate per region, ordered by first appearance of the region
pub fn mean_by_region(table: &RateTable) -> Vec<(Region, f64)> {
    rates_by_region(table)
        .into_iter()
        .map(|(region, rates)| (region, mean(&rates)))
        .collect()
}
