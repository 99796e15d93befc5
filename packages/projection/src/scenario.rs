//! Named scenario presets resolved to demographic parameters.

use popcast_census_models::{AnnualSeries, Preset};
use popcast_projection_models::{
    DemographicParams, MethodParam, MethodParameters, ProjectionMethod, ProjectionRequest,
    Scenario,
};

/// Status-quo values used when history does not yield a complete preset.
pub const STATUS_FALLBACK: DemographicParams = DemographicParams::new(10.6, 17.6, -50_000.0);

/// Fixed pessimistic scenario.
pub const PESSIMISTIC: DemographicParams = DemographicParams::new(9.5, 18.0, -100_000.0);

/// Natality increase of the pronatalist scenario, per mille.
pub const PRONATALIST_CBR_BOOST: f64 = 2.0;

/// Horizon of the default preview projection.
pub const PREVIEW_HORIZON_YEARS: u32 = 15;

/// Resolves `scenario` to concrete parameters.
///
/// `status` and `pronatalist` start from `preset` when all of its components
/// are known (rates rounded to three decimals, migration to whole persons)
/// and from [`STATUS_FALLBACK`] otherwise. `custom` returns `custom`
/// unchanged.
#[must_use]
pub fn resolve_scenario(
    scenario: Scenario,
    preset: &Preset,
    custom: DemographicParams,
) -> DemographicParams {
    match scenario {
        Scenario::Status => status_quo(preset),
        Scenario::Pessimistic => PESSIMISTIC,
        Scenario::Pronatalist => {
            let base = status_quo(preset);
            DemographicParams {
                cbr: round_to(base.cbr + PRONATALIST_CBR_BOOST, 3),
                ..base
            }
        }
        Scenario::Custom => custom,
    }
}

fn status_quo(preset: &Preset) -> DemographicParams {
    match (preset.cbr, preset.cdr, preset.mig) {
        (Some(cbr), Some(cdr), Some(mig)) if preset.is_complete() => {
            DemographicParams::new(round_to(cbr, 3), round_to(cdr, 3), mig.round())
        }
        _ => {
            log::warn!("Status-quo preset incomplete ({preset:?}); using fixed fallback values");
            STATUS_FALLBACK
        }
    }
}

/// Rounds to `decimals` places.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// The default 15-year demographic projection from the last historical
/// year, using the fixed status-quo values.
#[must_use]
pub fn preview_request(history: &AnnualSeries) -> Option<ProjectionRequest> {
    Some(ProjectionRequest {
        base_year: history.last_year()?,
        base_pop: history.last_pop()?,
        horizon_years: PREVIEW_HORIZON_YEARS,
        method: ProjectionMethod::Demographic,
        parameters: MethodParameters {
            demographic: STATUS_FALLBACK,
            method_param: MethodParam::Auto,
        },
    })
}
