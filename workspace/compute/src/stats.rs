//! Descriptive statistics over plain value slices.
//!
//! Conventions follow the usual data-frame defaults: the standard deviation
//! is the sample one (n - 1 denominator) and empty inputs yield `None`.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation, `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((squares / (values.len() - 1) as f64).sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Least-squares slope of `values` against their index 0..n.
///
/// `None` for fewer than two values.
pub fn ols_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let center = (n - 1) as f64 / 2.0;

    // Indices are symmetric around `center`, so each mirrored pair
    // contributes (i - center) * (y_i - y_mirror). Constant input gives an
    // exact zero.
    let mut covariance = 0.0;
    let mut variance = 0.0;
    for i in 0..n / 2 {
        let offset = i as f64 - center;
        covariance += offset * (values[i] - values[n - 1 - i]);
        variance += 2.0 * offset * offset;
    }
    Some(covariance / variance)
}

/// Coefficient of variation in percent. A zero mean yields 0 instead of a
/// division by zero; so does an undefined standard deviation.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    if mean == 0.0 {
        return Some(0.0);
    }
    let std = sample_std(values).unwrap_or(0.0);
    Some(std / mean * 100.0)
}

/// Percentage change from `from` to `to`, `None` when `from` is zero.
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    Some((to - from) / from * 100.0)
}

/// Rounds to two decimals, as shown in the summary table.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_basic_statistics() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_close(mean(&values).unwrap(), 5.0);
        assert_close(sample_std(&values).unwrap(), (32.0f64 / 7.0).sqrt());
        assert_eq!(min(&values), Some(2.0));
        assert_eq!(max(&values), Some(9.0));
        assert_eq!(median(&values), Some(4.5));
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
    }

    #[test]
    fn test_empty_and_single_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(ols_slope(&[1.0]), None);
        assert_eq!(coefficient_of_variation(&[]), None);
    }

    #[test]
    fn test_ols_slope_matches_closed_form() {
        assert_close(ols_slope(&[1.0, 3.0, 5.0, 7.0]).unwrap(), 2.0);
        assert_close(ols_slope(&[10.0, 8.0, 6.0]).unwrap(), -2.0);
        // y = [1, 2, 2, 4, 3]: slope = 0.6
        assert_close(ols_slope(&[1.0, 2.0, 2.0, 4.0, 3.0]).unwrap(), 0.6);
    }

    #[test]
    fn test_ols_slope_of_constant_is_exactly_zero() {
        assert_eq!(ols_slope(&[0.1; 7]), Some(0.0));
        assert_eq!(ols_slope(&[123.456; 10]), Some(0.0));
    }

    #[test]
    fn test_coefficient_of_variation_with_zero_mean() {
        assert_eq!(coefficient_of_variation(&[-1.0, 1.0]), Some(0.0));
        assert_eq!(coefficient_of_variation(&[0.0, 0.0, 0.0]), Some(0.0));
    }

    #[test]
    fn test_coefficient_of_variation() {
        // mean 10, sample std 2
        let values = [8.0, 10.0, 12.0];
        assert_close(coefficient_of_variation(&values).unwrap(), 20.0);
    }

    #[test]
    fn test_percent_change() {
        assert_close(percent_change(50.0, 60.0).unwrap(), 20.0);
        assert_close(percent_change(50.0, 40.0).unwrap(), -20.0);
        assert_eq!(percent_change(0.0, 10.0), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(-2.005001), -2.01);
    }
}
