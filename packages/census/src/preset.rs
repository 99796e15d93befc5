//! Status-quo parameters averaged over the most recent history.

use popcast_census_models::{
    AnnualSeries, MigrationEstimates, Preset, PresetSources, VitalEvents, YearValueMap,
};

/// Default number of trailing years averaged into a preset.
pub const DEFAULT_TRAILING_YEARS: usize = 5;

/// Options for [`compute_preset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetOptions {
    /// How many of the most recent contributing years to average.
    pub trailing_years: usize,
}

impl Default for PresetOptions {
    fn default() -> Self {
        Self {
            trailing_years: DEFAULT_TRAILING_YEARS,
        }
    }
}

/// Averages CBR, CDR, and net migration over the trailing window.
///
/// Each year with a successor contributes a mid-year population
/// `(pop[y] + pop[y+1]) / 2`. Rates are per mille of that midpoint. Migration
/// prefers the direct estimate and falls back to the residual. A component
/// with no contributing year is `None`.
#[must_use]
pub fn compute_preset(
    series: &AnnualSeries,
    events: &VitalEvents,
    migration: &MigrationEstimates,
    options: &PresetOptions,
) -> Preset {
    let mut cbrs = Vec::new();
    let mut cdrs = Vec::new();
    let mut migs = Vec::new();

    let years = series.years();
    for (i, pair) in series.pops().windows(2).enumerate() {
        let year = years[i];
        let mid = f64::midpoint(pair[0], pair[1]);

        if mid.is_finite() && mid > 0.0 {
            if let Some(births) = events.births.get(&year) {
                cbrs.push(births / mid * 1000.0);
            }
            if let Some(deaths) = events.deaths.get(&year) {
                cdrs.push(deaths / mid * 1000.0);
            }
        }

        if let Some(net) = migration.net(year) {
            migs.push(net);
        }
    }

    let n = options.trailing_years;
    let preset = Preset {
        cbr: trailing_mean(&cbrs, n),
        cdr: trailing_mean(&cdrs, n),
        mig: trailing_mean(&migs, n),
        sources: PresetSources {
            births_years: keys(&events.births),
            deaths_years: keys(&events.deaths),
            immigrants_years: keys(&events.immigrants),
            emigrants_years: keys(&events.emigrants),
            cbr_samples: cbrs.len().min(n),
            cdr_samples: cdrs.len().min(n),
            mig_samples: migs.len().min(n),
        },
    };

    log::debug!(
        "Status-quo preset: cbr={:?} cdr={:?} mig={:?}",
        preset.cbr,
        preset.cdr,
        preset.mig
    );

    preset
}

/// Arithmetic mean of the last `n` values, `None` when there are none.
#[allow(clippy::cast_precision_loss)]
fn trailing_mean(values: &[f64], n: usize) -> Option<f64> {
    let tail = &values[values.len().saturating_sub(n)..];
    if tail.is_empty() {
        return None;
    }
    Some(tail.iter().sum::<f64>() / tail.len() as f64)
}

fn keys(map: &YearValueMap) -> Vec<i32> {
    map.keys().copied().collect()
}
