//! Error types for the analysis pipeline

use crate::table::Region;
use thiserror::Error;

/// Result alias used throughout the analysis pipeline
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failures raised by aggregation, model fitting and forecast assembly.
///
/// An inverted year range is deliberately absent: filtering with
/// `year_min > year_max` yields an empty table instead of an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Not enough observations for differencing plus the AR/MA order
    #[error("insufficient data: need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The CSS optimizer did not converge within its iteration cap
    #[error("model fit failed after {iterations} iterations: {reason}")]
    ModelFitFailure { iterations: usize, reason: String },

    /// Standard deviation requested for a region with fewer than 2 records
    #[error("standard deviation not applicable for {region}: {count} record(s)")]
    DegenerateStats { region: Region, count: usize },

    /// The yearly series skips a year
    #[error("series is not contiguous: expected year {expected}, found {found}")]
    NonContiguousSeries { expected: i32, found: i32 },

    /// The forecast does not start right after the historical series
    #[error("forecast misaligned with history: expected year {expected}, found {found}")]
    MisalignedForecast { expected: i32, found: i32 },
}

/// Failures raised while reading or writing rate tables
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: unknown region {name:?}")]
    UnknownRegion { line: u64, name: String },

    #[error("line {line}: invalid rate {rate}")]
    InvalidRate { line: u64, rate: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::InsufficientData { needed: 5, got: 0 };
        assert_eq!(err.to_string(), "insufficient data: need at least 5 points, got 0");

        let err = AnalysisError::DegenerateStats { region: Region::Sul, count: 1 };
        assert_eq!(err.to_string(), "standard deviation not applicable for Sul: 1 record(s)");

        let err = AnalysisError::MisalignedForecast { expected: 2026, found: 2027 };
        assert!(err.to_string().contains("expected year 2026"));
    }

    #[test]
    fn test_load_error_line_numbers() {
        let err = LoadError::UnknownRegion { line: 7, name: "Leste".to_string() };
        assert_eq!(err.to_string(), "line 7: unknown region \"Leste\"");
    }
}
