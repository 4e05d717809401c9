//! Per-region statistics and yearly mean series

mod aggregate;
mod summary;

pub use aggregate::{mean_by_region, mean_by_year, stats_by_region, SeriesPoint, YearlySeries};
pub use summary::{mean, percentile_sorted, sample_std_dev, RegionStats};
