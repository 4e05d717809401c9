//! Year-range and region-set filtering

use super::{RateTable, Region};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Keep the records with `year_min <= year <= year_max` and a region in `regions`.
///
/// Relative order is preserved. An inverted range or an empty region set
/// gives an empty table rather than an error.
pub fn filter(table: &RateTable, year_min: i32, year_max: i32, regions: &[Region]) -> RateTable {
    if year_min > year_max {
        warn!("Inverted year range {}..={}; result is empty", year_min, year_max);
    }

    let filtered: RateTable = table
        .iter()
        .filter(|r| (year_min..=year_max).contains(&r.year()) && regions.contains(&r.region()))
        .copied()
        .collect();

    debug!(
        "Filtered {} -> {} records (years {}..={}, {} regions)",
        table.len(),
        filtered.len(),
        year_min,
        year_max,
        regions.len()
    );
    filtered
}

/// Filter parameters as selected by a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateFilter {
    pub year_min: i32,
    pub year_max: i32,
    pub regions: Vec<Region>,
}

impl RateFilter {
    pub fn new(year_min: i32, year_max: i32, regions: Vec<Region>) -> Self {
        Self { year_min, year_max, regions }
    }

    /// Filter that keeps every record of `table`: its full year span and all its regions
    pub fn all(table: &RateTable) -> Self {
        let (year_min, year_max) = table.year_range().unwrap_or((0, -1));
        Self {
            year_min,
            year_max,
            regions: table.regions(),
        }
    }

    pub fn apply(&self, table: &RateTable) -> RateTable {
        filter(table, self.year_min, self.year_max, &self.regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Record;

    fn sample_table() -> RateTable {
        let mut table = RateTable::new();
        for region in [Region::Norte, Region::Sul, Region::Sudeste] {
            for year in 2000..=2005 {
                let rate = 10.0 + (year - 2000) as f64 + region as i32 as f64;
                table.push(Record::new(year, region, rate).unwrap());
            }
        }
        table
    }

    #[test]
    fn test_filter_applies_both_predicates() {
        let table = sample_table();
        let out = filter(&table, 2001, 2003, &[Region::Sul, Region::Norte]);

        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|r| (2001..=2003).contains(&r.year())));
        assert!(out.iter().all(|r| r.region() != Region::Sudeste));
        // Every output record comes from the input
        assert!(out.iter().all(|r| table.records().contains(r)));
    }

    #[test]
    fn test_filter_preserves_order() {
        let table = sample_table();
        let out = filter(&table, 2000, 2005, &[Region::Sudeste, Region::Norte]);

        let expected: Vec<Record> = table
            .iter()
            .filter(|r| r.region() != Region::Sul)
            .copied()
            .collect();
        assert_eq!(out.records(), expected.as_slice());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let table = sample_table();
        let regions = [Region::Sul];
        let once = filter(&table, 2002, 2004, &regions);
        let twice = filter(&once, 2002, 2004, &regions);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_inverted_range_and_empty_regions_give_empty_table() {
        let table = sample_table();
        assert!(filter(&table, 2004, 2001, &Region::ALL).is_empty());
        assert!(filter(&table, 2000, 2005, &[]).is_empty());
        // Input untouched
        assert_eq!(table.len(), 18);
    }

    #[test]
    fn test_rate_filter_all_keeps_everything() {
        let table = sample_table();
        let all = RateFilter::all(&table);
        assert_eq!(all.year_min, 2000);
        assert_eq!(all.year_max, 2005);
        assert_eq!(all.apply(&table), table);

        assert!(RateFilter::all(&RateTable::new()).apply(&table).is_empty());
    }
}
