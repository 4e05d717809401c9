//! Nelder-Mead simplex minimization
//!
//! Used to minimize the conditional sum of squares of the ARIMA model over
//! an unconstrained parameter vector. The search always stops at
//! `max_iterations`; callers decide what a non-converged result means.

/// Simplex search settings
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Hard cap on iterations
    pub max_iterations: usize,
    /// Convergence threshold on the spread of objective values, relative to the best value
    pub tolerance: f64,
    /// Convergence threshold on the simplex diameter
    pub x_tolerance: f64,
    /// Initial simplex step, relative to each coordinate (absolute when the coordinate is 0)
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5_000,
            tolerance: 1e-8,
            x_tolerance: 1e-6,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a simplex search
#[derive(Debug, Clone)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimize `objective` from `initial`.
///
/// Stops when either the spread of objective values or the simplex
/// diameter falls under its tolerance. A NaN objective value counts as
/// `+inf`.
pub fn nelder_mead<F>(objective: F, initial: &[f64], config: &NelderMeadConfig) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return Minimum {
            point: Vec::new(),
            value: objective(&[]),
            iterations: 0,
            converged: true,
        };
    }

    let objective = |x: &[f64]| {
        let value = objective(x);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(initial.to_vec());
    for i in 0..n {
        let mut vertex = initial.to_vec();
        vertex[i] += if initial[i].abs() > 1e-10 {
            config.initial_step * initial[i].abs()
        } else {
            config.initial_step
        };
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let (best, second_worst, worst) = (order[0], order[n - 1], order[n]);

        let spread = values[worst] - values[best];
        if spread.is_finite() && spread <= config.tolerance * (1.0 + values[best].abs()) {
            converged = true;
            break;
        }
        let diameter = simplex
            .iter()
            .map(|v| distance(v, &simplex[best]))
            .fold(0.0, f64::max);
        if values[best].is_finite() && diameter <= config.x_tolerance {
            converged = true;
            break;
        }
        iterations += 1;

        let centroid = centroid_without(&simplex, worst);
        let toward = |from: &[f64], coef: f64| -> Vec<f64> {
            centroid
                .iter()
                .zip(from)
                .map(|(c, x)| c + coef * (x - c))
                .collect()
        };

        let reflected = toward(&simplex[worst], -REFLECT);
        let reflected_value = objective(&reflected);

        if reflected_value < values[best] {
            let expanded = toward(&reflected, EXPAND);
            let expanded_value = objective(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        let (contracted, limit) = if reflected_value < values[worst] {
            (toward(&reflected, CONTRACT), reflected_value)
        } else {
            (toward(&simplex[worst], CONTRACT), values[worst])
        };
        let contracted_value = objective(&contracted);
        if contracted_value < limit {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        let anchor = simplex[best].clone();
        for i in (0..=n).filter(|&i| i != best) {
            let shrunk: Vec<f64> = anchor
                .iter()
                .zip(&simplex[i])
                .map(|(a, x)| a + SHRINK * (x - a))
                .collect();
            simplex[i] = shrunk;
            values[i] = objective(&simplex[i]);
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);

    Minimum {
        point: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}

fn centroid_without(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let dim = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; dim];

    for (_, vertex) in simplex.iter().enumerate().filter(|(i, _)| *i != exclude) {
        for (c, x) in centroid.iter_mut().zip(vertex) {
            *c += x;
        }
    }
    for c in &mut centroid {
        *c /= count;
    }
    centroid
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quadratic_minimum() {
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] + 3.0).powi(2),
            &[0.0, 0.0],
            &NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_abs_diff_eq!(result.point[0], 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.point[1], -3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_nan_region_is_avoided() {
        // Undefined left of 1, minimum at 3
        let result = nelder_mead(
            |x| if x[0] < 1.0 { f64::NAN } else { (x[0] - 3.0).powi(2) },
            &[2.0],
            &NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert!(result.value.is_finite());
        assert_abs_diff_eq!(result.point[0], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_flat_objective_stops_on_spread() {
        let result = nelder_mead(|_| 1.0, &[0.5, -0.5], &NelderMeadConfig::default());

        assert!(result.converged);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let config = NelderMeadConfig {
            max_iterations: 3,
            ..Default::default()
        };
        let result = nelder_mead(
            |x| (x[0] - 100.0).powi(2) + (x[1] - 50.0).powi(2),
            &[0.0, 0.0],
            &config,
        );

        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
    }
}
