//! Rate records and the in-memory rate table

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Brazilian macro-region a rate is reported for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Norte,
    Nordeste,
    Sul,
    Sudeste,
    #[serde(rename = "Centro-Oeste")]
    CentroOeste,
}

impl Region {
    /// Every region, in the order the source data lists them
    pub const ALL: [Region; 5] = [
        Region::Norte,
        Region::Nordeste,
        Region::Sul,
        Region::Sudeste,
        Region::CentroOeste,
    ];

    /// Display name as used in the CSV files
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Norte => "Norte",
            Region::Nordeste => "Nordeste",
            Region::Sul => "Sul",
            Region::Sudeste => "Sudeste",
            Region::CentroOeste => "Centro-Oeste",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown region: {}", s))
    }
}

/// A single (year, region, rate) observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    year: i32,
    region: Region,
    rate: f64,
}

impl Record {
    /// Create a record; `None` if the rate is negative or not finite
    pub fn new(year: i32, region: Region, rate: f64) -> Option<Self> {
        if rate.is_finite() && rate >= 0.0 {
            Some(Self { year, region, rate })
        } else {
            None
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

/// Ordered collection of rate records
///
/// Tables are plain values: filtering and aggregation borrow them and
/// build new values, nothing mutates a table it did not create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    records: Vec<Record>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Smallest and largest year present, or `None` for an empty table
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(Record::year).min()?;
        let max = self.records.iter().map(Record::year).max()?;
        Some((min, max))
    }

    /// Distinct regions in order of first appearance
    pub fn regions(&self) -> Vec<Region> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.region) {
                seen.push(record.region);
            }
        }
        seen
    }
}

impl FromIterator<Record> for RateTable {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RateTable {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_round_trip_names() {
        for region in Region::ALL {
            assert_eq!(region.as_str().parse::<Region>().unwrap(), region);
        }
        assert_eq!("centro-oeste".parse::<Region>().unwrap(), Region::CentroOeste);
        assert!("Leste".parse::<Region>().is_err());
    }

    #[test]
    fn test_record_rejects_negative_rates() {
        assert!(Record::new(2000, Region::Sul, -0.5).is_none());
        assert!(Record::new(2000, Region::Sul, f64::NAN).is_none());
        assert!(Record::new(2000, Region::Sul, 0.0).is_some());
    }

    #[test]
    fn test_table_accessors() {
        let table: RateTable = [
            (2003, Region::Sul, 12.0),
            (2001, Region::Norte, 9.0),
            (2002, Region::Sul, 11.0),
        ]
        .into_iter()
        .filter_map(|(y, r, v)| Record::new(y, r, v))
        .collect();

        assert_eq!(table.len(), 3);
        assert_eq!(table.year_range(), Some((2001, 2003)));
        assert_eq!(table.regions(), vec![Region::Sul, Region::Norte]);
        assert_eq!(RateTable::new().year_range(), None);
    }

    #[test]
    fn test_from_records_keeps_order() {
        let records: Vec<Record> = [(2005, Region::Nordeste, 3.0), (2004, Region::Nordeste, 2.0)]
            .into_iter()
            .filter_map(|(y, r, v)| Record::new(y, r, v))
            .collect();
        let table = RateTable::from_records(records.clone());

        assert_eq!(table.records(), records.as_slice());
        assert_eq!(table, records.into_iter().collect::<RateTable>());
    }

    #[test]
    fn test_region_serializes_by_display_name() {
        let json = serde_json::to_string(&Region::CentroOeste).unwrap();
        assert_eq!(json, "\"Centro-Oeste\"");
    }
}
