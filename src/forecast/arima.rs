//! ARIMA(2,1,2) estimation and forecasting
//!
//! The series is differenced once and the differences are modelled as an
//! ARMA(2,2) process around their mean `mu`:
//!
//! ```text
//! d_t - mu = phi1 (d_{t-1} - mu) + phi2 (d_{t-2} - mu) + e_t + theta1 e_{t-1} + theta2 e_{t-2}
//! ```
//!
//! which is the textbook form `d_t = c + phi1 d_{t-1} + ...` with
//! `c = mu (1 - phi1 - phi2)`. Parameters are estimated by conditional sum
//! of squares (CSS): the first `max(p, q)` residuals are fixed at zero and
//! the remaining squared one-step errors are minimized with a Nelder-Mead
//! search.
//!
//! The search runs over unconstrained values. Each coefficient pair is
//! mapped through partial autocorrelations `r = 0.99 tanh(u)`, so every
//! trial point is a stationary AR polynomial and an invertible MA
//! polynomial:
//!
//! ```text
//! phi1 = r1 (1 - r2),  phi2 = r2        theta = -(same map of u3, u4)
//! ```

use super::diff::{difference, integrate};
use super::optimizer::{nelder_mead, NelderMeadConfig};
use crate::error::{AnalysisError, Result};
use crate::stats::{mean, SeriesPoint, YearlySeries};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Autoregressive order
pub const AR_ORDER: usize = 2;
/// Differencing order
pub const DIFF_ORDER: usize = 1;
/// Moving-average order
pub const MA_ORDER: usize = 2;

/// Smallest series the model will fit (one point per AR/MA coefficient plus the mean)
pub const MIN_OBSERVATIONS: usize = AR_ORDER + MA_ORDER + 1;

/// Largest magnitude of a partial autocorrelation in the search
const PARTIAL_BOUND: f64 = 0.99;

/// Starting AR and MA coefficients
const INITIAL_AR: [f64; AR_ORDER] = [0.1, 0.05];
const INITIAL_MA: [f64; MA_ORDER] = [0.1, 0.05];

/// One forecasted year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub year: i32,
    pub value: f64,
}

/// Estimation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArimaConfig {
    /// Optimizer iteration cap per attempt; the search restarts once from
    /// its best point, and a second miss is a fit failure
    pub max_iterations: usize,
    /// Relative convergence tolerance on the CSS objective
    pub tolerance: f64,
    /// Convergence tolerance on the simplex diameter in search space
    pub x_tolerance: f64,
}

impl Default for ArimaConfig {
    fn default() -> Self {
        let optimizer = NelderMeadConfig::default();
        Self {
            max_iterations: optimizer.max_iterations,
            tolerance: optimizer.tolerance,
            x_tolerance: optimizer.x_tolerance,
        }
    }
}

/// Estimated ARMA(2,2) parameters of the differenced series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArimaCoefficients {
    /// Mean of the differenced process
    pub mu: f64,
    pub ar: [f64; AR_ORDER],
    pub ma: [f64; MA_ORDER],
}

impl ArimaCoefficients {
    /// Map a search point `[mu, u1, u2, u3, u4]` to coefficients
    fn from_params(params: &[f64]) -> Self {
        let ar = from_partials(params[1], params[2]);
        let ma = from_partials(params[3], params[4]);
        Self {
            mu: params[0],
            ar,
            ma: [-ma[0], -ma[1]],
        }
    }

    /// Inverse of `from_params`; coefficients must be stationary and invertible
    fn to_params(&self) -> [f64; 5] {
        let [u1, u2] = to_partials(self.ar);
        let [u3, u4] = to_partials([-self.ma[0], -self.ma[1]]);
        [self.mu, u1, u2, u3, u4]
    }

    /// True when the AR polynomial has all roots outside the unit circle
    pub fn is_stationary(&self) -> bool {
        inside_triangle(self.ar)
    }

    /// True when the MA polynomial has all roots outside the unit circle
    pub fn is_invertible(&self) -> bool {
        inside_triangle([-self.ma[0], -self.ma[1]])
    }

    /// Intercept `c` of the un-centred form
    pub fn constant(&self) -> f64 {
        self.mu * (1.0 - self.ar.iter().sum::<f64>())
    }

    /// One-step prediction of the next difference from the most recent
    /// differences and residuals (both given most recent last)
    fn predict_next(&self, recent_diffs: &[f64], recent_residuals: &[f64]) -> f64 {
        let ar_part: f64 = self
            .ar
            .iter()
            .zip(recent_diffs.iter().rev())
            .map(|(phi, d)| phi * (d - self.mu))
            .sum();
        let ma_part: f64 = self
            .ma
            .iter()
            .zip(recent_residuals.iter().rev())
            .map(|(theta, e)| theta * e)
            .sum();
        self.mu + ar_part + ma_part
    }

    /// Residuals of the differenced series; the first `max(p, q)` are zero
    fn residuals(&self, diffs: &[f64]) -> Vec<f64> {
        let start = AR_ORDER.max(MA_ORDER);
        let mut residuals = vec![0.0; diffs.len()];

        for t in start..diffs.len() {
            let pred = self.predict_next(&diffs[t - AR_ORDER..t], &residuals[t - MA_ORDER..t]);
            residuals[t] = diffs[t] - pred;
        }
        residuals
    }

    fn css(&self, diffs: &[f64]) -> f64 {
        let start = AR_ORDER.max(MA_ORDER);
        self.residuals(diffs)[start..].iter().map(|e| e * e).sum()
    }
}

/// Lag-2 polynomial `1 - c1 z - c2 z^2` from unconstrained values
fn from_partials(u1: f64, u2: f64) -> [f64; 2] {
    let r1 = PARTIAL_BOUND * u1.tanh();
    let r2 = PARTIAL_BOUND * u2.tanh();
    [r1 * (1.0 - r2), r2]
}

fn to_partials(coefs: [f64; 2]) -> [f64; 2] {
    let r2 = coefs[1];
    let r1 = coefs[0] / (1.0 - r2);
    [(r1 / PARTIAL_BOUND).atanh(), (r2 / PARTIAL_BOUND).atanh()]
}

/// Stationarity triangle of `1 - c1 z - c2 z^2`
fn inside_triangle(c: [f64; 2]) -> bool {
    c[1].abs() < 1.0 && c[0] + c[1] < 1.0 && c[1] - c[0] < 1.0
}

/// Fixed-order ARIMA(2,1,2) model
#[derive(Debug, Clone, Default)]
pub struct ArimaModel {
    config: ArimaConfig,
}

impl ArimaModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ArimaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArimaConfig {
        &self.config
    }

    /// Fit the model to a yearly series with consecutive years
    pub fn fit(&self, series: &YearlySeries) -> Result<FittedArima> {
        if series.len() < MIN_OBSERVATIONS {
            return Err(AnalysisError::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: series.len(),
            });
        }

        for pair in series.points().windows(2) {
            let next = pair[0].year.checked_add(1);
            if next != Some(pair[1].year) {
                return Err(AnalysisError::NonContiguousSeries {
                    expected: next.unwrap_or(i32::MAX),
                    found: pair[1].year,
                });
            }
        }

        let history = series.values();
        let diffs = difference(&history);
        let diff_mean = mean(&diffs);

        let initial = ArimaCoefficients {
            mu: diff_mean,
            ar: INITIAL_AR,
            ma: INITIAL_MA,
        }
        .to_params();
        let optimizer = NelderMeadConfig {
            max_iterations: self.config.max_iterations,
            tolerance: self.config.tolerance,
            x_tolerance: self.config.x_tolerance,
            ..Default::default()
        };
        let objective = |params: &[f64]| ArimaCoefficients::from_params(params).css(&diffs);

        let mut minimum = nelder_mead(objective, &initial, &optimizer);
        if !minimum.converged {
            debug!(
                "No convergence after {} iterations; restarting from the best point",
                minimum.iterations
            );
            let first_pass = minimum.iterations;
            minimum = nelder_mead(objective, &minimum.point, &optimizer);
            minimum.iterations += first_pass;
        }

        if !minimum.value.is_finite() {
            return Err(AnalysisError::ModelFitFailure {
                iterations: minimum.iterations,
                reason: "conditional sum of squares is not finite".to_string(),
            });
        }
        if !minimum.converged {
            return Err(AnalysisError::ModelFitFailure {
                iterations: minimum.iterations,
                reason: format!(
                    "no convergence within {} iterations after one restart",
                    self.config.max_iterations
                ),
            });
        }

        let coefficients = ArimaCoefficients::from_params(&minimum.point);
        let residuals = coefficients.residuals(&diffs);
        let effective = diffs.len() - AR_ORDER.max(MA_ORDER);

        debug!(
            "ARIMA(2,1,2) fit in {} iterations: mu={:.6} ar={:?} ma={:?} css={:.6e}",
            minimum.iterations, coefficients.mu, coefficients.ar, coefficients.ma, minimum.value
        );

        Ok(FittedArima {
            coefficients,
            first_year: series.first_year().unwrap_or_default(),
            history,
            diffs,
            residuals,
            css: minimum.value,
            residual_variance: minimum.value / effective as f64,
            iterations: minimum.iterations,
        })
    }

    /// Fit to `series` and forecast `horizon` years past its end
    pub fn forecast(&self, series: &YearlySeries, horizon: usize) -> Result<Vec<ForecastPoint>> {
        Ok(self.fit(series)?.forecast(horizon))
    }
}

/// A fitted ARIMA(2,1,2) model, ready to forecast
#[derive(Debug, Clone)]
pub struct FittedArima {
    coefficients: ArimaCoefficients,
    first_year: i32,
    history: Vec<f64>,
    diffs: Vec<f64>,
    residuals: Vec<f64>,
    css: f64,
    residual_variance: f64,
    iterations: usize,
}

impl FittedArima {
    pub fn coefficients(&self) -> &ArimaCoefficients {
        &self.coefficients
    }

    /// Conditional sum of squares at the optimum
    pub fn css(&self) -> f64 {
        self.css
    }

    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// Optimizer iterations used
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Residuals on the differenced scale; the first `max(p, q)` are fixed at zero
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    pub fn last_year(&self) -> i32 {
        self.first_year + (self.history.len() as i32 - 1)
    }

    /// In-sample one-step-ahead predictions on the level scale.
    ///
    /// Years whose prediction needs warm-up residuals are omitted.
    pub fn fitted_values(&self) -> Vec<SeriesPoint> {
        let start = AR_ORDER.max(MA_ORDER);
        (start..self.diffs.len())
            .map(|t| {
                let pred = self.diffs[t] - self.residuals[t];
                // diffs[t] is history[t + 1] - history[t]
                SeriesPoint {
                    year: self.first_year + t as i32 + 1,
                    value: self.history[t] + pred,
                }
            })
            .collect()
    }

    /// Forecast `horizon` years past the last observation.
    ///
    /// Future residuals are zero. Values are not clamped, so a falling
    /// series may forecast below zero. Years past `i32::MAX` are dropped.
    pub fn forecast(&self, horizon: usize) -> Vec<ForecastPoint> {
        if horizon == 0 {
            return Vec::new();
        }

        let mut diffs = self.diffs.clone();
        let mut residuals = self.residuals.clone();

        for _ in 0..horizon {
            let t = diffs.len();
            let next = self
                .coefficients
                .predict_next(&diffs[t - AR_ORDER..], &residuals[t - MA_ORDER..]);
            diffs.push(next);
            residuals.push(0.0);
        }

        let last = self.history[self.history.len() - 1];
        let levels = integrate(last, &diffs[self.diffs.len()..]);
        if levels.iter().any(|v| *v < 0.0) {
            warn!("Forecast contains negative rates; values are left unclamped");
        }

        let last_year = self.last_year();
        let points: Vec<ForecastPoint> = levels
            .into_iter()
            .zip(1..)
            .map_while(|(value, k)| {
                last_year
                    .checked_add(k)
                    .map(|year| ForecastPoint { year, value })
            })
            .collect();
        if points.len() < horizon {
            warn!("Forecast truncated at year {}", i32::MAX);
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_short_linear_series() {
        let series = YearlySeries::from_values(2000, &[5.0, 7.0, 9.0, 11.0, 13.0]);
        let forecast = ArimaModel::new().forecast(&series, 2).unwrap();

        let years: Vec<i32> = forecast.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2005, 2006]);
        assert_abs_diff_eq!(forecast[0].value, 15.0, epsilon = 1e-3);
        assert_abs_diff_eq!(forecast[1].value, 17.0, epsilon = 1e-3);
    }

    #[test]
    fn test_linear_series_extrapolates() {
        let values: Vec<f64> = (0..26).map(|k| 10.0 + 2.0 * k as f64).collect();
        let series = YearlySeries::from_values(2000, &values);
        let forecast = ArimaModel::new().forecast(&series, 5).unwrap();

        assert_eq!(forecast.len(), 5);
        for point in &forecast {
            let expected = 10.0 + 2.0 * (point.year - 2000) as f64;
            assert_abs_diff_eq!(point.value, expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_constant_series_forecasts_constant() {
        let series = YearlySeries::from_values(2010, &[4.2; 8]);
        let forecast = ArimaModel::new().forecast(&series, 3).unwrap();

        for point in forecast {
            assert_abs_diff_eq!(point.value, 4.2, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_zero_horizon() {
        let series = YearlySeries::from_values(2000, &[1.0, 3.0, 2.0, 4.0, 3.0, 5.0]);
        assert!(ArimaModel::new().forecast(&series, 0).unwrap().is_empty());
    }

    #[test]
    fn test_insufficient_data() {
        let model = ArimaModel::new();
        assert_eq!(
            model.fit(&YearlySeries::default()).unwrap_err(),
            AnalysisError::InsufficientData { needed: 5, got: 0 }
        );
        let short = YearlySeries::from_values(2000, &[1.0, 2.0, 3.0, 4.0]);
        assert!(matches!(
            model.fit(&short),
            Err(AnalysisError::InsufficientData { needed: 5, got: 4 })
        ));
    }

    #[test]
    fn test_gap_in_years_rejected() {
        let points = [2000, 2001, 2002, 2004, 2005, 2006]
            .iter()
            .map(|&year| SeriesPoint { year, value: year as f64 })
            .collect();
        let series = YearlySeries::new(points).unwrap();

        assert_eq!(
            ArimaModel::new().fit(&series).unwrap_err(),
            AnalysisError::NonContiguousSeries { expected: 2003, found: 2004 }
        );
    }

    #[test]
    fn test_iteration_cap_is_a_fit_failure() {
        let values = [12.0, 15.0, 13.0, 18.0, 21.0, 19.0, 24.0, 26.0, 25.0, 30.0];
        let series = YearlySeries::from_values(2000, &values);
        let model = ArimaModel::with_config(ArimaConfig {
            max_iterations: 2,
            ..Default::default()
        });

        // Two iterations, then two more after the restart
        assert!(matches!(
            model.fit(&series),
            Err(AnalysisError::ModelFitFailure { iterations: 4, .. })
        ));
        assert_eq!(model.config().max_iterations, 2);
    }

    #[test]
    fn test_noisy_trend_fit() {
        let values = [
            12.0, 15.0, 16.0, 18.0, 21.0, 22.0, 26.0, 27.0, 29.0, 33.0, 34.0, 36.0, 40.0,
            41.0, 42.0, 46.0, 49.0, 50.0, 53.0, 55.0, 58.0, 59.0, 63.0, 66.0, 67.0, 70.0,
        ];
        let series = YearlySeries::from_values(2000, &values);
        let fitted = ArimaModel::new().fit(&series).unwrap();

        let coefs = fitted.coefficients();
        assert!(coefs.is_stationary());
        assert!(coefs.is_invertible());
        assert!(fitted.residual_variance() >= 0.0);
        assert!(fitted.iterations() <= ArimaConfig::default().max_iterations);

        let residuals = fitted.residuals();
        assert_eq!(residuals.len(), values.len() - 1);
        assert_eq!(&residuals[..2], &[0.0, 0.0]);
        let css: f64 = residuals.iter().map(|e| e * e).sum();
        assert_abs_diff_eq!(css, fitted.css(), epsilon = 1e-9);
        assert_eq!(fitted.last_year(), 2025);
        assert_eq!(fitted.fitted_values().len(), values.len() - 3);
        assert_eq!(fitted.fitted_values()[0].year, 2003);

        let forecast = fitted.forecast(5);
        let years: Vec<i32> = forecast.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2026, 2027, 2028, 2029, 2030]);
        // Upward drift carries into the forecast
        assert!(forecast.iter().all(|p| p.value > 60.0 && p.value < 100.0));
    }

    #[test]
    fn test_search_space_round_trip() {
        let coefs = ArimaCoefficients { mu: 1.5, ar: [0.6, -0.3], ma: [-0.4, 0.2] };
        let back = ArimaCoefficients::from_params(&coefs.to_params());

        assert_abs_diff_eq!(back.mu, 1.5, epsilon = 1e-12);
        for (a, b) in back.ar.iter().chain(&back.ma).zip(coefs.ar.iter().chain(&coefs.ma)) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_any_search_point_is_stationary_and_invertible() {
        for u in [-40.0, -3.0, -0.5, 0.0, 0.7, 2.5, 40.0] {
            for v in [-40.0, -1.0, 0.0, 1.0, 40.0] {
                let coefs = ArimaCoefficients::from_params(&[0.0, u, v, v, u]);
                assert!(coefs.is_stationary(), "u={} v={} ar={:?}", u, v, coefs.ar);
                assert!(coefs.is_invertible(), "u={} v={} ma={:?}", u, v, coefs.ma);
            }
        }
    }

    #[test]
    fn test_series_ending_at_max_year() {
        let points = [i32::MAX - 4, i32::MAX - 3, i32::MAX - 2, i32::MAX - 1, i32::MAX]
            .iter()
            .map(|&year| SeriesPoint { year, value: 1.0 })
            .collect();
        let series = YearlySeries::new(points).unwrap();
        let fitted = ArimaModel::new().fit(&series).unwrap();

        assert_eq!(fitted.last_year(), i32::MAX);
        assert!(fitted.forecast(3).is_empty());
    }

    #[test]
    fn test_constant_term() {
        let coefs = ArimaCoefficients { mu: 2.0, ar: [0.3, 0.2], ma: [0.0, 0.0] };
        assert_abs_diff_eq!(coefs.constant(), 1.0, epsilon = 1e-12);
    }
}
