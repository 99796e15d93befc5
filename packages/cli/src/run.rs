//! Wiring a baseline, a scenario, and a method into one projection run.

use popcast_census::{CensusError, HistoricalBaseline, PresetOptions};
use popcast_census_models::Preset;
use popcast_projection::display::{axis_bounds, chart_series, clamp_for_display};
use popcast_projection::engine::{ProjectionOptions, project_with, resolve_method};
use popcast_projection::scenario::{STATUS_FALLBACK, preview_request, resolve_scenario};
use popcast_projection::summary::ProjectionSummary;
use popcast_projection_models::{
    AxisBounds, ChartSeries, DemographicParams, DisplaySeries, MethodParam, MethodParameters,
    ProjectionMethod, ProjectionRequest, ProjectionResult, Scenario,
};
use serde::Serialize;

use crate::CliError;
use crate::config::ProjectionConfig;

/// Fully resolved projection settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSettings {
    pub horizon_years: u32,
    pub scenario: Scenario,
    pub method: ProjectionMethod,
    pub method_param: MethodParam,
    pub trailing_years: usize,
    pub auto_rate_years: usize,
    /// Values used by [`Scenario::Custom`].
    pub custom: DemographicParams,
}

impl ProjectionSettings {
    /// Resolves the string-typed configuration.
    ///
    /// Unset custom components default to the status-quo fallback values.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::UnknownScenario`] for an unrecognized scenario name
    /// and [`CliError::Projection`] for a malformed parameter of the index,
    /// delta, or rate methods.
    pub fn from_config(config: &ProjectionConfig) -> Result<Self, CliError> {
        let scenario = config
            .scenario
            .trim()
            .parse::<Scenario>()
            .map_err(|_| CliError::UnknownScenario(config.scenario.clone()))?;
        let method = resolve_method(&config.method);
        // The demographic method never reads the parameter.
        let method_param = if method == ProjectionMethod::Demographic {
            MethodParam::Auto
        } else {
            MethodParam::parse("methodParam", config.method_param.as_deref())
                .map_err(popcast_projection::ProjectionError::from)?
        };

        Ok(Self {
            horizon_years: config.horizon_years,
            scenario,
            method,
            method_param,
            trailing_years: config.trailing_years,
            auto_rate_years: config.auto_rate_years,
            custom: DemographicParams::new(
                config.cbr.unwrap_or(STATUS_FALLBACK.cbr),
                config.cdr.unwrap_or(STATUS_FALLBACK.cdr),
                config.mig_net.unwrap_or(STATUS_FALLBACK.mig_net),
            ),
        })
    }
}

/// Everything a host needs to present one projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRun {
    pub request: ProjectionRequest,
    pub result: ProjectionResult,
    pub display: DisplaySeries,
    pub axis: AxisBounds,
    pub chart: ChartSeries,
    pub summary: ProjectionSummary,
}

impl ProjectionRun {
    fn finish(
        baseline: &HistoricalBaseline,
        request: ProjectionRequest,
        options: &ProjectionOptions,
    ) -> Result<Self, CliError> {
        let result = project_with(&request, &baseline.series, options)?;
        let hist_max = baseline.series.historical_max();
        let display = clamp_for_display(&result, hist_max);
        let axis = axis_bounds(&result, hist_max);
        let chart = chart_series(&baseline.series, &display);
        let summary = ProjectionSummary::new(&request, &result, &display);

        Ok(Self {
            request,
            result,
            display,
            axis,
            chart,
            summary,
        })
    }
}

/// Projects from the last historical year using `settings`.
///
/// # Errors
///
/// Returns [`CliError`] if the baseline is empty or the projection rejects
/// the request.
pub fn run_projection(
    baseline: &HistoricalBaseline,
    settings: &ProjectionSettings,
) -> Result<ProjectionRun, CliError> {
    let preset = baseline.preset(&PresetOptions {
        trailing_years: settings.trailing_years,
    });
    let demographic = resolve_scenario(settings.scenario, &preset, settings.custom);
    log::debug!("Scenario {} resolved to {demographic:?}", settings.scenario);

    let base_year = baseline.series.last_year().ok_or(CensusError::EmptyCensus)?;
    let base_pop = baseline.series.last_pop().ok_or(CensusError::EmptyCensus)?;

    let request = ProjectionRequest {
        base_year,
        base_pop,
        horizon_years: settings.horizon_years,
        method: settings.method,
        parameters: MethodParameters {
            demographic,
            method_param: settings.method_param,
        },
    };

    ProjectionRun::finish(
        baseline,
        request,
        &ProjectionOptions {
            auto_years_back: settings.auto_rate_years,
        },
    )
}

/// Runs the fixed 15-year demographic preview.
///
/// # Errors
///
/// Returns [`CliError`] if the baseline is empty.
pub fn run_preview(baseline: &HistoricalBaseline) -> Result<ProjectionRun, CliError> {
    let request = preview_request(&baseline.series).ok_or(CensusError::EmptyCensus)?;
    ProjectionRun::finish(baseline, request, &ProjectionOptions::default())
}

/// One resolved named scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPreset {
    pub scenario: Scenario,
    pub params: DemographicParams,
}

/// The raw preset together with every named scenario it resolves to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetReport {
    pub preset: Preset,
    pub scenarios: Vec<ScenarioPreset>,
}

/// Computes the preset over `baseline` and resolves the named scenarios.
#[must_use]
pub fn preset_report(baseline: &HistoricalBaseline, trailing_years: usize) -> PresetReport {
    let preset = baseline.preset(&PresetOptions { trailing_years });
    let scenarios = Scenario::all()
        .iter()
        .filter(|s| **s != Scenario::Custom)
        .map(|&scenario| ScenarioPreset {
            scenario,
            params: resolve_scenario(scenario, &preset, STATUS_FALLBACK),
        })
        .collect();

    PresetReport { preset, scenarios }
}
