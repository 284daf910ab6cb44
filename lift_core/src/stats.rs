//! Small numeric helpers shared by the analyzers.
//!
//! Every helper returns 0.0 instead of NaN/Infinity on empty or degenerate input.

/// Replace NaN/Infinity with 0.0
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Guarded division; 0.0 when the denominator is zero or the result is not finite
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    finite_or_zero(numerator / denominator)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    safe_div(values.iter().sum(), values.len() as f64)
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    finite_or_zero(variance.sqrt())
}

/// Coefficient of variation (stddev / mean) as a fraction
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    safe_div(std_dev(values), mean(values))
}

/// Ordinary-least-squares slope of `ys` against `xs`
pub fn ols_slope(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let x_mean = mean(xs);
    let y_mean = mean(ys);

    let numerator: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    let denominator: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();

    safe_div(numerator, denominator)
}

/// Percent change from `before` to `after`; 0.0 when `before` is not positive
pub fn percent_change(before: f64, after: f64) -> f64 {
    if before <= 0.0 {
        return 0.0;
    }
    finite_or_zero((after - before) / before * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(coefficient_of_variation(&[]), 0.0);
        assert_eq!(ols_slope(&[], &[]), 0.0);
    }

    #[test]
    fn test_std_dev_population() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&values) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_ols_slope_linear_series() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [10.0, 12.0, 14.0, 16.0];
        assert!((ols_slope(&xs, &ys) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_ols_slope_constant_x_is_zero() {
        assert_eq!(ols_slope(&[1.0, 1.0], &[3.0, 5.0]), 0.0);
    }

    #[test]
    fn test_guards() {
        assert_eq!(safe_div(1.0, 0.0), 0.0);
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(percent_change(0.0, 10.0), 0.0);
        assert!((percent_change(100.0, 110.0) - 10.0).abs() < 1e-9);
    }
}
