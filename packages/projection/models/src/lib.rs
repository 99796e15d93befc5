#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Projection request and result types.
//!
//! A [`ProjectionRequest`] is an explicit, immutable description of one
//! projection run. The engine turns it into a [`ProjectionResult`] holding
//! the true population path; [`DisplaySeries`], [`AxisBounds`], and
//! [`ChartSeries`] are presentation-only views derived from it.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Year-by-year projection algorithm.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(ascii_case_insensitive)]
pub enum ProjectionMethod {
    /// Births and deaths per mille plus a fixed net migration.
    #[default]
    #[strum(to_string = "demographic")]
    Demographic,
    /// Constant annual growth index in percent.
    #[strum(to_string = "fixedIndex", serialize = "fixed_index", serialize = "fixed-index")]
    FixedIndex,
    /// Constant absolute change in persons per year.
    #[strum(
        to_string = "subtractPerYear",
        serialize = "subtract_per_year",
        serialize = "subtract-per-year"
    )]
    SubtractPerYear,
    /// Constant annual rate in percent, optionally estimated from history.
    #[strum(to_string = "rateBased", serialize = "rate_based", serialize = "rate-based")]
    RateBased,
}

impl ProjectionMethod {
    /// Human-readable description used in summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Demographic => "Demographic model (CBR/CDR/migration)",
            Self::FixedIndex => "Fixed index (% per year)",
            Self::SubtractPerYear => "Fixed change (persons per year)",
            Self::RateBased => "Annual rate (percent)",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Demographic,
            Self::FixedIndex,
            Self::SubtractPerYear,
            Self::RateBased,
        ]
    }
}

/// Error returned when an explicit method parameter is not a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidParameterError {
    /// Name of the parameter.
    pub name: String,
    /// The raw text that failed to parse.
    pub value: String,
}

impl std::fmt::Display for InvalidParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid parameter {}: '{}' is not a number or \"auto\"",
            self.name, self.value
        )
    }
}

impl std::error::Error for InvalidParameterError {}

/// The single numeric parameter of the non-demographic methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodParam {
    /// Derive the parameter from history.
    #[default]
    Auto,
    /// Explicit value (percent for index/rate, persons for delta).
    Value(f64),
}

impl MethodParam {
    /// Parses a raw parameter.
    ///
    /// Missing, blank, or `"auto"` (any case) text selects [`Self::Auto`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameterError`] if the text is present but is not a
    /// finite number.
    pub fn parse(name: &str, raw: Option<&str>) -> Result<Self, InvalidParameterError> {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Ok(Self::Auto);
        };
        if raw.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self::Value)
            .ok_or_else(|| InvalidParameterError {
                name: name.to_string(),
                value: raw.to_string(),
            })
    }

    /// The explicit value, if any.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Value(v) => Some(v),
        }
    }
}

impl std::fmt::Display for MethodParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Value(v) => write!(f, "{v}"),
        }
    }
}

/// Parameters of the demographic method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicParams {
    /// Crude birth rate, per mille.
    pub cbr: f64,
    /// Crude death rate, per mille.
    pub cdr: f64,
    /// Net migration, persons per year.
    pub mig_net: f64,
}

impl DemographicParams {
    /// Creates a parameter set.
    #[must_use]
    pub const fn new(cbr: f64, cdr: f64, mig_net: f64) -> Self {
        Self { cbr, cdr, mig_net }
    }
}

/// Method-specific parameters of a request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodParameters {
    /// Used by [`ProjectionMethod::Demographic`] (and by unknown methods
    /// that fall back to it).
    pub demographic: DemographicParams,
    /// Used by the index, delta, and rate methods.
    pub method_param: MethodParam,
}

/// One projection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    /// First year of the result.
    pub base_year: i32,
    /// Population in the base year.
    pub base_pop: f64,
    /// Number of years projected beyond the base year.
    pub horizon_years: u32,
    /// Projection algorithm.
    pub method: ProjectionMethod,
    /// Algorithm parameters.
    pub parameters: MethodParameters,
}

/// The true, unclamped population path of one projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Years from the base year to the horizon, inclusive.
    pub years: Vec<i32>,
    /// Whole-person, non-negative population per year.
    pub pops: Vec<f64>,
}

impl ProjectionResult {
    /// Last projected year.
    #[must_use]
    pub fn final_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// Population in the last projected year.
    #[must_use]
    pub fn final_pop(&self) -> Option<f64> {
        self.pops.last().copied()
    }

    /// Largest finite projected population.
    #[must_use]
    pub fn max_pop(&self) -> Option<f64> {
        self.pops
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }

    /// Iterates `(year, population)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years.iter().copied().zip(self.pops.iter().copied())
    }
}

/// Presentation-safe view of a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySeries {
    /// Years, aligned with `values`.
    pub years: Vec<i32>,
    /// Values capped at `allowed_max`.
    pub values: Vec<f64>,
    /// Historical maximum × 1.5.
    pub allowed_max: f64,
    /// Whether any true value exceeds `allowed_max`.
    pub is_clipped: bool,
    /// True value at the final horizon year.
    pub real_final: f64,
}

/// Y-axis range for a history + projection chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// History and displayed projection laid out on one shared year axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Historical years followed by projected years after the base year.
    pub labels: Vec<i32>,
    /// Historical values, `None` over the projected span.
    pub history: Vec<Option<f64>>,
    /// `None` over the historical span, then displayed projection values.
    pub projection: Vec<Option<f64>>,
}

/// Named parameter bundle a host can request.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Scenario {
    /// Continuation of recent trends.
    #[default]
    #[strum(
        to_string = "status",
        serialize = "status_quo",
        serialize = "status-quo"
    )]
    Status,
    /// Low natality, high mortality, strong emigration.
    #[strum(to_string = "pessimistic")]
    Pessimistic,
    /// Status quo with natality raised by two per mille.
    #[strum(to_string = "pronatalist")]
    Pronatalist,
    /// Caller-supplied values, left untouched.
    #[strum(to_string = "custom")]
    Custom,
}

impl Scenario {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Status, Self::Pessimistic, Self::Pronatalist, Self::Custom]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_parse_in_several_spellings() {
        for (raw, method) in [
            ("demographic", ProjectionMethod::Demographic),
            ("fixedIndex", ProjectionMethod::FixedIndex),
            ("FIXED_INDEX", ProjectionMethod::FixedIndex),
            ("subtract-per-year", ProjectionMethod::SubtractPerYear),
            ("rateBased", ProjectionMethod::RateBased),
        ] {
            assert_eq!(raw.parse::<ProjectionMethod>().unwrap(), method, "{raw}");
        }
        assert!("cohort".parse::<ProjectionMethod>().is_err());
    }

    #[test]
    fn method_display_matches_canonical_name() {
        assert_eq!(ProjectionMethod::SubtractPerYear.to_string(), "subtractPerYear");
        for method in ProjectionMethod::all() {
            assert_eq!(method.to_string().parse::<ProjectionMethod>().unwrap(), *method);
        }
    }

    #[test]
    fn method_param_auto_spellings() {
        assert_eq!(MethodParam::parse("p", None).unwrap(), MethodParam::Auto);
        assert_eq!(MethodParam::parse("p", Some("  ")).unwrap(), MethodParam::Auto);
        assert_eq!(MethodParam::parse("p", Some("AUTO")).unwrap(), MethodParam::Auto);
    }

    #[test]
    fn method_param_numeric() {
        assert_eq!(
            MethodParam::parse("p", Some(" -1.5 ")).unwrap(),
            MethodParam::Value(-1.5)
        );
    }

    #[test]
    fn method_param_rejects_garbage() {
        let err = MethodParam::parse("indexPercent", Some("fast")).unwrap_err();
        assert_eq!(err.name, "indexPercent");
        assert_eq!(err.value, "fast");
        assert!(MethodParam::parse("p", Some("NaN")).is_err());
    }

    #[test]
    fn scenario_names_parse() {
        assert_eq!("status-quo".parse::<Scenario>().unwrap(), Scenario::Status);
        assert_eq!("Pronatalist".parse::<Scenario>().unwrap(), Scenario::Pronatalist);
        assert!("optimistic".parse::<Scenario>().is_err());
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = ProjectionRequest {
            base_year: 2021,
            base_pop: 19_000_000.0,
            horizon_years: 30,
            method: ProjectionMethod::FixedIndex,
            parameters: MethodParameters {
                demographic: DemographicParams::new(10.6, 17.6, -50_000.0),
                method_param: MethodParam::Value(-1.0),
            },
        };
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(json["baseYear"], 2021);
        assert_eq!(json["method"], "fixedIndex");
        assert_eq!(json["parameters"]["demographic"]["migNet"], -50_000.0);
    }
}
