//! Growth parameters estimated from the recent historical trend.
//!
//! Both estimators look back `years_back` annual steps from the final
//! historical year, capped to the available history. A history too short
//! to contain a single step yields `0`.

use popcast_census_models::AnnualSeries;

/// Default look-back used by the `auto` method parameter.
pub const DEFAULT_YEARS_BACK: usize = 5;

/// Geometric mean annual growth rate as a fraction (`0.01` = 1%).
///
/// `(pop_last / pop_{last-k})^(1/k) − 1` with `k = min(years_back, len − 1)`.
/// Returns `0` when `k < 1` or the earlier population is not positive.
#[must_use]
pub fn geometric_rate(series: &AnnualSeries, years_back: usize) -> f64 {
    let pops = series.pops();
    let k = years_back.min(pops.len().saturating_sub(1));
    if k < 1 {
        return 0.0;
    }

    let last = pops[pops.len() - 1];
    let prev = pops[pops.len() - 1 - k];
    if prev.is_nan() || prev <= 0.0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let steps = k as f64;
    let rate = (last / prev).powf(steps.recip()) - 1.0;
    if rate.is_finite() { rate } else { 0.0 }
}

/// Mean of the last `k` consecutive annual differences, in persons.
///
/// Returns `0` when the history has no differences.
#[must_use]
pub fn average_delta(series: &AnnualSeries, years_back: usize) -> f64 {
    let pops = series.pops();
    let k = years_back.min(pops.len().saturating_sub(1));
    if k < 1 {
        return 0.0;
    }

    let diffs: Vec<f64> = pops[pops.len() - 1 - k..]
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| d.is_finite())
        .collect();
    if diffs.is_empty() {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = diffs.len() as f64;
    diffs.iter().sum::<f64>() / count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(pops: &[f64]) -> AnnualSeries {
        AnnualSeries::from_parts(2000, pops.to_vec())
    }

    #[test]
    fn geometric_rate_over_trailing_window() {
        // 100 -> 121 over two steps is 10% per year.
        let rate = geometric_rate(&series(&[50.0, 100.0, 110.0, 121.0]), 2);
        assert!((rate - 0.1).abs() < 1e-12);
    }

    #[test]
    fn geometric_rate_caps_window_to_history() {
        let rate = geometric_rate(&series(&[100.0, 121.0]), 5);
        assert!((rate - 0.21).abs() < 1e-12);
    }

    #[test]
    fn geometric_rate_degenerate_history() {
        assert!(geometric_rate(&series(&[100.0]), 5).abs() < f64::EPSILON);
        assert!(geometric_rate(&series(&[0.0, 100.0]), 5).abs() < f64::EPSILON);
        assert!(geometric_rate(&series(&[100.0, 200.0]), 0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_delta_over_trailing_window() {
        let delta = average_delta(&series(&[0.0, 100.0, 90.0, 70.0, 40.0]), 3);
        // Differences: -10, -20, -30.
        assert!((delta - -20.0).abs() < 1e-12);
    }

    #[test]
    fn average_delta_degenerate_history() {
        assert!(average_delta(&series(&[100.0]), 5).abs() < f64::EPSILON);
    }
}
