//! Narrative summary of a projection run.
//!
//! The summary always reports the true final population, even when the
//! displayed series was clipped.

use std::fmt;

use popcast_projection_models::{DisplaySeries, ProjectionMethod, ProjectionRequest, ProjectionResult};
use serde::Serialize;

/// Text-ready description of one projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    /// Method used.
    pub method: ProjectionMethod,
    /// Method parameter as supplied, for non-demographic methods.
    pub method_param: Option<String>,
    /// Base year.
    pub base_year: i32,
    /// Base population.
    pub base_pop: f64,
    /// Final projected year.
    pub final_year: i32,
    /// True final population.
    pub final_pop: f64,
    /// Display cap, when the chart was clipped.
    pub clipped_at: Option<f64>,
}

impl ProjectionSummary {
    /// Builds the summary for a finished projection.
    #[must_use]
    pub fn new(
        request: &ProjectionRequest,
        result: &ProjectionResult,
        display: &DisplaySeries,
    ) -> Self {
        let method_param = match (request.method, request.parameters.method_param) {
            (ProjectionMethod::Demographic, _) => None,
            (_, param) => Some(param.to_string()),
        };

        Self {
            method: request.method,
            method_param,
            base_year: request.base_year,
            base_pop: request.base_pop,
            final_year: result.final_year().unwrap_or(request.base_year),
            final_pop: display.real_final,
            clipped_at: display.is_clipped.then(|| display.allowed_max.ceil()),
        }
    }
}

impl fmt::Display for ProjectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Estimated population in {} is {} (from {} in {}).",
            self.final_year,
            format_population(self.final_pop),
            format_population(self.base_pop),
            self.base_year
        )?;
        write!(f, "\nMethod: {}.", self.method.label())?;
        if let Some(param) = &self.method_param {
            write!(f, " Parameter: {param}")?;
        }
        if let Some(cap) = self.clipped_at {
            write!(
                f,
                "\nNote: the chart is visually capped at {} (historical max x1.5); \
                 the value above is the real projection.",
                format_population(cap)
            )?;
        }
        Ok(())
    }
}

/// Formats a population as a whole number with `,` thousands separators.
#[must_use]
pub fn format_population(value: f64) -> String {
    let digits = format!("{:.0}", value.round().abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value.round() < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
