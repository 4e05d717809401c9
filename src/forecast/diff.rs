//! First-order differencing and its inverse

/// Consecutive differences `d_t = y_t - y_{t-1}`; length `n - 1` (empty for n < 2)
pub fn difference(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Undo differencing: `y_{n+k} = last + sum(d_{n+1..=n+k})`
pub fn integrate(last: f64, differences: &[f64]) -> Vec<f64> {
    differences
        .iter()
        .scan(last, |level, d| {
            *level += d;
            Some(*level)
        })
        .collect()
}
