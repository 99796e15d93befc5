//! Year-by-year projection of a population path.
//!
//! Every method records the current population (rounded to whole persons,
//! never negative) before applying its transition for the next year. A
//! transition that produces a negative or non-finite population clamps it
//! to zero; later transitions keep applying to the clamped value.

use popcast_census_models::AnnualSeries;
use popcast_projection_models::{
    DemographicParams, MethodParam, ProjectionMethod, ProjectionRequest, ProjectionResult,
};

use crate::ProjectionError;
use crate::trend::{DEFAULT_YEARS_BACK, average_delta, geometric_rate};

/// Longest horizon a single request may project.
pub const MAX_HORIZON_YEARS: u32 = 10_000;

/// Options controlling how `auto` parameters are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Look-back, in annual steps, for auto rate and delta estimation.
    pub auto_years_back: usize,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            auto_years_back: DEFAULT_YEARS_BACK,
        }
    }
}

/// Resolves a method name, falling back to the demographic method for
/// anything unrecognized.
#[must_use]
pub fn resolve_method(name: &str) -> ProjectionMethod {
    name.trim().parse().unwrap_or_else(|_| {
        log::warn!("Unknown projection method '{name}', using demographic");
        ProjectionMethod::Demographic
    })
}

/// Concrete per-year update rule derived from a request.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Transition {
    Demographic(DemographicParams),
    GrowthPercent(f64),
    Delta(f64),
}

impl Transition {
    fn from_request(
        request: &ProjectionRequest,
        history: &AnnualSeries,
        options: &ProjectionOptions,
    ) -> Result<Self, ProjectionError> {
        let param = request.parameters.method_param;
        let years_back = options.auto_years_back;

        let transition = match request.method {
            ProjectionMethod::Demographic => {
                let params = request.parameters.demographic;
                check_finite("cbr", params.cbr)?;
                check_finite("cdr", params.cdr)?;
                check_finite("migNet", params.mig_net)?;
                Self::Demographic(params)
            }
            ProjectionMethod::FixedIndex | ProjectionMethod::RateBased => match param {
                MethodParam::Value(percent) => {
                    check_finite(name_for(request.method), percent)?;
                    Self::GrowthPercent(percent)
                }
                MethodParam::Auto => {
                    let percent = geometric_rate(history, years_back) * 100.0;
                    log::debug!("Auto growth rate over {years_back} years: {percent:.4}%");
                    Self::GrowthPercent(percent)
                }
            },
            ProjectionMethod::SubtractPerYear => match param {
                MethodParam::Value(delta) => {
                    check_finite("delta", delta)?;
                    // Whole persons, truncated toward zero.
                    Self::Delta(delta.trunc())
                }
                MethodParam::Auto => {
                    let delta = average_delta(history, years_back).round();
                    log::debug!("Auto delta over {years_back} years: {delta} persons/year");
                    Self::Delta(delta)
                }
            },
        };

        Ok(transition)
    }

    fn apply(self, pop: f64) -> f64 {
        match self {
            Self::Demographic(p) => {
                let births = pop * (p.cbr / 1000.0);
                let deaths = pop * (p.cdr / 1000.0);
                pop + births - deaths + p.mig_net
            }
            Self::GrowthPercent(percent) => pop * (1.0 + percent / 100.0),
            Self::Delta(delta) => pop + delta,
        }
    }
}

const fn name_for(method: ProjectionMethod) -> &'static str {
    match method {
        ProjectionMethod::FixedIndex => "indexPercent",
        ProjectionMethod::RateBased => "ratePercent",
        ProjectionMethod::SubtractPerYear => "delta",
        ProjectionMethod::Demographic => "demographic",
    }
}

fn check_finite(name: &str, value: f64) -> Result<(), ProjectionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Projects `request` with default options.
///
/// # Errors
///
/// See [`project_with`].
pub fn project(
    request: &ProjectionRequest,
    history: &AnnualSeries,
) -> Result<ProjectionResult, ProjectionError> {
    project_with(request, history, &ProjectionOptions::default())
}

/// Runs one projection from the base year through the horizon.
///
/// The result holds `horizon_years + 1` points starting at the base year.
/// `history` is only consulted for `auto` parameters.
///
/// # Errors
///
/// Returns [`ProjectionError::InvalidRequest`] if the base population is
/// negative or not finite, the horizon exceeds [`MAX_HORIZON_YEARS`], or the
/// final year falls outside the representable year range, and
/// [`ProjectionError::InvalidParameter`] if an explicit parameter is not
/// finite.
pub fn project_with(
    request: &ProjectionRequest,
    history: &AnnualSeries,
    options: &ProjectionOptions,
) -> Result<ProjectionResult, ProjectionError> {
    if !request.base_pop.is_finite() || request.base_pop < 0.0 {
        return Err(ProjectionError::InvalidRequest {
            message: format!(
                "base population must be a non-negative number, got {}",
                request.base_pop
            ),
        });
    }

    if request.horizon_years > MAX_HORIZON_YEARS {
        return Err(ProjectionError::InvalidRequest {
            message: format!(
                "horizon of {} years exceeds the maximum of {MAX_HORIZON_YEARS}",
                request.horizon_years
            ),
        });
    }
    let final_year = i32::try_from(request.horizon_years)
        .ok()
        .and_then(|offset| request.base_year.checked_add(offset))
        .ok_or_else(|| ProjectionError::InvalidRequest {
            message: format!(
                "horizon of {} years from {} exceeds the year range",
                request.horizon_years, request.base_year
            ),
        })?;

    let transition = Transition::from_request(request, history, options)?;
    log::debug!(
        "Projecting {} years from {} ({}) with {:?}",
        request.horizon_years,
        request.base_year,
        request.base_pop,
        transition
    );

    let capacity = usize::try_from(request.horizon_years).map_or(0, |h| h.saturating_add(1));
    let mut years = Vec::with_capacity(capacity);
    let mut pops = Vec::with_capacity(capacity);

    let mut pop = request.base_pop;
    for year in request.base_year..=final_year {
        years.push(year);
        pops.push(pop.round().max(0.0));

        pop = transition.apply(pop);
        if !pop.is_finite() || pop <= 0.0 {
            pop = 0.0;
        }
    }

    Ok(ProjectionResult { years, pops })
}
