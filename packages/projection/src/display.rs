//! Presentation-only views of a projection.
//!
//! Optimistic scenarios can grow far beyond anything observed, which makes
//! a shared history/projection chart unreadable. The displayed series is
//! capped at one and a half times the historical maximum; the true values
//! stay in the [`ProjectionResult`] and are what exports and summaries use.

use popcast_census_models::AnnualSeries;
use popcast_projection_models::{AxisBounds, ChartSeries, DisplaySeries, ProjectionResult};

/// Ratio of the display cap to the historical maximum.
pub const DISPLAY_CAP_RATIO: f64 = 1.5;

/// Headroom above the largest plotted value when nothing is clipped.
pub const AXIS_PADDING_RATIO: f64 = 1.03;

/// Axis floor applied once the history reaches this size.
pub const LARGE_POPULATION_FLOOR: f64 = 10_000_000.0;

/// Caps `result` at `hist_max × 1.5` for display.
#[must_use]
pub fn clamp_for_display(result: &ProjectionResult, hist_max: f64) -> DisplaySeries {
    let allowed_max = hist_max * DISPLAY_CAP_RATIO;
    let values = result.pops.iter().map(|v| v.min(allowed_max)).collect();
    let is_clipped = result.max_pop().is_some_and(|max| max > allowed_max);
    let real_final = result.final_pop().unwrap_or(0.0);

    if is_clipped {
        log::debug!("Display series clipped at {allowed_max}; real final value {real_final}");
    }

    DisplaySeries {
        years: result.years.clone(),
        values,
        allowed_max,
        is_clipped,
        real_final,
    }
}

/// Y-axis bounds for a chart of `hist_max` history and `result`.
///
/// Unclipped charts get a small headroom above the largest value; clipped
/// charts top out at the display cap. Histories of ten million or more start
/// the axis at ten million.
#[must_use]
pub fn axis_bounds(result: &ProjectionResult, hist_max: f64) -> AxisBounds {
    let allowed_max = hist_max * DISPLAY_CAP_RATIO;
    let proj_max = result.max_pop().unwrap_or(hist_max);

    let mut max = if proj_max <= allowed_max {
        (hist_max.max(proj_max) * AXIS_PADDING_RATIO).ceil()
    } else {
        allowed_max.ceil()
    };

    let min = if hist_max >= LARGE_POPULATION_FLOOR {
        LARGE_POPULATION_FLOOR
    } else {
        0.0
    };

    if max <= min {
        max = (min * 1.05).ceil() + 1.0;
    }

    AxisBounds { min, max }
}

/// Lays history and the displayed projection out on one year axis.
///
/// The projection's base year duplicates the last historical year, so the
/// projection contributes only the years after it.
#[must_use]
pub fn chart_series(history: &AnnualSeries, display: &DisplaySeries) -> ChartSeries {
    let projected = display.years.len().saturating_sub(1);

    let labels = history
        .years()
        .iter()
        .chain(display.years.iter().skip(1))
        .copied()
        .collect();

    let history_values = history
        .pops()
        .iter()
        .copied()
        .map(Some)
        .chain(std::iter::repeat_n(None, projected))
        .collect();

    let projection_values = std::iter::repeat_n(None, history.len())
        .chain(display.values.iter().skip(1).copied().map(Some))
        .collect();

    ChartSeries {
        labels,
        history: history_values,
        projection: projection_values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(pops: &[f64]) -> ProjectionResult {
        ProjectionResult {
            years: (2021..).take(pops.len()).collect(),
            pops: pops.to_vec(),
        }
    }

    #[test]
    fn clips_growth_beyond_cap() {
        let display = clamp_for_display(
            &result(&[1_000_000.0, 1_400_000.0, 2_000_000.0]),
            1_000_000.0,
        );
        assert!((display.allowed_max - 1_500_000.0).abs() < f64::EPSILON);
        assert_eq!(display.values, vec![1_000_000.0, 1_400_000.0, 1_500_000.0]);
        assert!(display.is_clipped);
        assert!((display.real_final - 2_000_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn leaves_modest_projection_untouched() {
        let proj = result(&[100.0, 90.0, 80.0]);
        let display = clamp_for_display(&proj, 100.0);
        assert_eq!(display.values, proj.pops);
        assert!(!display.is_clipped);
        assert!((display.real_final - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn value_exactly_at_cap_is_not_clipped() {
        let display = clamp_for_display(&result(&[100.0, 150.0]), 100.0);
        assert!(!display.is_clipped);
    }

    #[test]
    fn axis_pads_unclipped_projection() {
        let bounds = axis_bounds(&result(&[100.0, 120.0]), 100.0);
        assert!(bounds.min.abs() < f64::EPSILON);
        assert!((bounds.max - 124.0).abs() < f64::EPSILON);
    }

    #[test]
    fn axis_caps_clipped_projection() {
        let bounds = axis_bounds(&result(&[100.0, 400.0]), 100.0);
        assert!((bounds.max - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn axis_floor_for_large_histories() {
        let bounds = axis_bounds(&result(&[19_000_000.0, 18_000_000.0]), 23_000_000.0);
        assert!((bounds.min - 10_000_000.0).abs() < f64::EPSILON);
        assert!((bounds.max - 23_690_000.0).abs() < f64::EPSILON);

        let collapsed = axis_bounds(&result(&[0.0, 0.0]), 10_000_000.0);
        assert!(collapsed.max > collapsed.min);
    }

    #[test]
    fn chart_series_skips_duplicate_base_year() {
        let history = AnnualSeries::from_parts(2019, vec![10.0, 11.0, 12.0]);
        let proj = ProjectionResult {
            years: vec![2021, 2022, 2023],
            pops: vec![12.0, 13.0, 30.0],
        };
        let display = clamp_for_display(&proj, history.historical_max());
        let chart = chart_series(&history, &display);

        assert_eq!(chart.labels, vec![2019, 2020, 2021, 2022, 2023]);
        assert_eq!(
            chart.history,
            vec![Some(10.0), Some(11.0), Some(12.0), None, None]
        );
        assert_eq!(chart.projection, vec![None, None, None, Some(13.0), Some(18.0)]);
    }
}
