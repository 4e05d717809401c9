//! Join a historical series and its forecast into one labelled series

use super::arima::ForecastPoint;
use crate::error::{AnalysisError, Result};
use crate::stats::YearlySeries;
use serde::{Deserialize, Serialize};

/// One entry of the combined series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub year: i32,
    pub value: f64,
    pub is_historical: bool,
}

/// Historical points followed directly by forecasted points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastResult {
    entries: Vec<ForecastEntry>,
}

impl ForecastResult {
    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The historical segment
    pub fn historical(&self) -> &[ForecastEntry] {
        let split = self.entries.iter().take_while(|e| e.is_historical).count();
        &self.entries[..split]
    }

    /// The forecast segment
    pub fn forecast(&self) -> &[ForecastEntry] {
        let split = self.entries.iter().take_while(|e| e.is_historical).count();
        &self.entries[split..]
    }
}

/// Concatenate `history` and `forecast`.
///
/// Forecast years must start at the last historical year + 1 and step by
/// one year; anything else is `MisalignedForecast`. No year follows
/// `i32::MAX`, so a point after it is misaligned too (reported with
/// `expected: i32::MAX`).
///
/// A non-empty forecast needs at least one historical point to anchor it:
/// an empty history fails with `InsufficientData`.
pub fn assemble(history: &YearlySeries, forecast: &[ForecastPoint]) -> Result<ForecastResult> {
    let mut expected = match history.last_year() {
        Some(year) => year.checked_add(1),
        None if forecast.is_empty() => None,
        None => return Err(AnalysisError::InsufficientData { needed: 1, got: 0 }),
    };

    for point in forecast {
        if expected != Some(point.year) {
            return Err(AnalysisError::MisalignedForecast {
                expected: expected.unwrap_or(i32::MAX),
                found: point.year,
            });
        }
        expected = point.year.checked_add(1);
    }

    let entries = history
        .points()
        .iter()
        .map(|p| ForecastEntry {
            year: p.year,
            value: p.value,
            is_historical: true,
        })
        .chain(forecast.iter().map(|p| ForecastEntry {
            year: p.year,
            value: p.value,
            is_historical: false,
        }))
        .collect();

    Ok(ForecastResult { entries })
}
