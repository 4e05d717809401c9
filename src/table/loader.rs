//! Load and save rate tables as `Year,Region,Rate` CSV

use super::{RateTable, Record, Region};
use crate::error::LoadError;
use csv::{Reader, Writer};
use log::debug;
use std::path::Path;

/// Default location of the bundled rate table
pub const DEFAULT_RATES_PATH: &str = "data/taxation_rates.csv";

/// Raw CSV row matching the rate file columns
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct CsvRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Rate")]
    rate: f64,
}

impl CsvRow {
    fn to_record(self, line: u64) -> Result<Record, LoadError> {
        let region: Region = self
            .region
            .parse()
            .map_err(|_| LoadError::UnknownRegion { line, name: self.region.clone() })?;

        Record::new(self.year, region, self.rate)
            .ok_or(LoadError::InvalidRate { line, rate: self.rate })
    }

    fn from_record(record: &Record) -> Self {
        Self {
            year: record.year(),
            region: record.region().as_str().to_string(),
            rate: record.rate(),
        }
    }
}

fn read_table<R: std::io::Read>(mut reader: Reader<R>) -> Result<RateTable, LoadError> {
    let headers = reader.headers()?.clone();
    let mut table = RateTable::new();

    for result in reader.records() {
        let raw = result?;
        let line = raw.position().map(|p| p.line()).unwrap_or_default();
        let row: CsvRow = raw.deserialize(Some(&headers))?;
        table.push(row.to_record(line)?);
    }

    debug!("Loaded {} rate records", table.len());
    Ok(table)
}

/// Load a rate table from a CSV file
pub fn load_rates<P: AsRef<Path>>(path: P) -> Result<RateTable, LoadError> {
    read_table(Reader::from_path(path)?)
}

/// Load a rate table from any reader (e.g., string buffer, network stream)
pub fn load_rates_from_reader<R: std::io::Read>(reader: R) -> Result<RateTable, LoadError> {
    read_table(Reader::from_reader(reader))
}

/// Load the rate table from the default data/taxation_rates.csv location
pub fn load_default_rates() -> Result<RateTable, LoadError> {
    load_rates(DEFAULT_RATES_PATH)
}

/// Write a rate table to a CSV file
pub fn write_rates<P: AsRef<Path>>(path: P, table: &RateTable) -> Result<(), LoadError> {
    write_rates_to_writer(std::fs::File::create(path)?, table)
}

/// Write a rate table to any writer
pub fn write_rates_to_writer<W: std::io::Write>(writer: W, table: &RateTable) -> Result<(), LoadError> {
    let mut csv_writer = Writer::from_writer(writer);
    for record in table {
        csv_writer.serialize(CsvRow::from_record(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Year,Region,Rate\n2000,Norte,12\n2000,Centro-Oeste,9.5\n2001,Norte,14\n";

    #[test]
    fn test_load_from_reader() {
        let table = load_rates_from_reader(SAMPLE.as_bytes()).expect("Failed to load rates");
        assert_eq!(table.len(), 3);

        let second = table.records()[1];
        assert_eq!(second.year(), 2000);
        assert_eq!(second.region(), Region::CentroOeste);
        assert_eq!(second.rate(), 9.5);
    }

    #[test]
    fn test_unknown_region_reports_line() {
        let csv = "Year,Region,Rate\n2000,Norte,12\n2000,Leste,9\n";
        match load_rates_from_reader(csv.as_bytes()) {
            Err(LoadError::UnknownRegion { line, name }) => {
                assert_eq!(line, 3);
                assert_eq!(name, "Leste");
            }
            other => panic!("Expected UnknownRegion, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_rate_rejected() {
        let csv = "Year,Region,Rate\n2000,Sul,-1\n";
        assert!(matches!(
            load_rates_from_reader(csv.as_bytes()),
            Err(LoadError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_write_then_load() {
        let table = load_rates_from_reader(SAMPLE.as_bytes()).unwrap();
        let mut buffer = Vec::new();
        write_rates_to_writer(&mut buffer, &table).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("Year,Region,Rate\n"));
        assert_eq!(load_rates_from_reader(text.as_bytes()).unwrap(), table);
    }

    #[test]
    fn test_load_default_rates() {
        let table = load_default_rates().expect("Failed to load default rates");
        assert_eq!(table.len(), 130);
        assert_eq!(table.year_range(), Some((2000, 2025)));
        assert_eq!(table.regions(), Region::ALL.to_vec());
    }
}
