#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Historical population types shared across the popcast workspace.
//!
//! These types describe the demographic baseline: sparse census samples,
//! the dense annual series derived from them, optional yearly vital-event
//! and migration counts, and the status-quo preset averaged from recent
//! history. A year missing from any [`YearValueMap`] means "unknown", never
//! zero.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Mapping from calendar year to a count (births, deaths, migrants).
///
/// Keys need not be contiguous.
pub type YearValueMap = BTreeMap<i32, f64>;

/// A single census observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CensusPoint {
    /// Census year.
    pub year: i32,
    /// Enumerated population.
    pub population: f64,
}

impl CensusPoint {
    /// Creates a census point.
    #[must_use]
    pub const fn new(year: i32, population: f64) -> Self {
        Self { year, population }
    }
}

/// A complete per-year population series covering consecutive years.
///
/// Produced once by the annualizer and treated as read-only history by
/// every other component. `years` and `pops` are index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualSeries {
    years: Vec<i32>,
    pops: Vec<f64>,
}

impl AnnualSeries {
    /// Builds a series whose years run consecutively from `first_year`, one
    /// per population value.
    ///
    /// Values that would land after `i32::MAX` are dropped.
    #[must_use]
    pub fn from_parts(first_year: i32, mut pops: Vec<f64>) -> Self {
        let years: Vec<i32> = (first_year..=i32::MAX).take(pops.len()).collect();
        pops.truncate(years.len());
        Self { years, pops }
    }

    /// Years covered by the series, strictly increasing.
    #[must_use]
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Population per year, aligned with [`Self::years`].
    #[must_use]
    pub fn pops(&self) -> &[f64] {
        &self.pops
    }

    /// Number of annual points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pops.len()
    }

    /// Whether the series has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pops.is_empty()
    }

    /// First historical year.
    #[must_use]
    pub fn first_year(&self) -> Option<i32> {
        self.years.first().copied()
    }

    /// Last historical year, used as the default projection base year.
    #[must_use]
    pub fn last_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// Population in the last historical year.
    #[must_use]
    pub fn last_pop(&self) -> Option<f64> {
        self.pops.last().copied()
    }

    /// Population for `year`, if the year lies inside the series.
    #[must_use]
    pub fn population(&self, year: i32) -> Option<f64> {
        let first = self.first_year()?;
        let offset = usize::try_from(year.checked_sub(first)?).ok()?;
        self.pops.get(offset).copied()
    }

    /// Largest finite population in the series, or `1.0` when there is none.
    #[must_use]
    pub fn historical_max(&self) -> f64 {
        self.pops
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
            .unwrap_or(1.0)
    }

    /// Iterates `(year, population)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years.iter().copied().zip(self.pops.iter().copied())
    }
}

/// Kind of auxiliary yearly series.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EventKind {
    /// Live births.
    Births,
    /// Deaths.
    Deaths,
    /// Permanent immigrants.
    Immigrants,
    /// Permanent emigrants.
    Emigrants,
}

impl EventKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Births, Self::Deaths, Self::Immigrants, Self::Emigrants]
    }
}

/// One row of a loosely-formatted yearly table.
///
/// Only the first two columns matter: the first names the period (usually
/// a year, possibly embedded in text like `"Anul 2019"`), the second holds
/// the count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabularRow {
    /// Raw text of the first column.
    pub period: Option<String>,
    /// Raw text of the second column.
    pub value: Option<String>,
}

impl TabularRow {
    /// Creates a row from explicit period and value cells.
    #[must_use]
    pub fn new(period: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            period: Some(period.into()),
            value: Some(value.into()),
        }
    }

    /// Builds a row from ordered column values, keeping the first two.
    #[must_use]
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut iter = columns.into_iter().map(Into::into);
        let period = iter.next();
        let value = iter.next();
        Self { period, value }
    }
}

/// The four auxiliary yearly series, each possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalEvents {
    /// Births per year.
    pub births: YearValueMap,
    /// Deaths per year.
    pub deaths: YearValueMap,
    /// Immigrants per year.
    pub immigrants: YearValueMap,
    /// Emigrants per year.
    pub emigrants: YearValueMap,
}

impl VitalEvents {
    /// Returns the map for one event kind.
    #[must_use]
    pub const fn get(&self, kind: EventKind) -> &YearValueMap {
        match kind {
            EventKind::Births => &self.births,
            EventKind::Deaths => &self.deaths,
            EventKind::Immigrants => &self.immigrants,
            EventKind::Emigrants => &self.emigrants,
        }
    }

    /// Mutable access to the map for one event kind.
    pub const fn get_mut(&mut self, kind: EventKind) -> &mut YearValueMap {
        match kind {
            EventKind::Births => &mut self.births,
            EventKind::Deaths => &mut self.deaths,
            EventKind::Immigrants => &mut self.immigrants,
            EventKind::Emigrants => &mut self.emigrants,
        }
    }

    /// Whether no auxiliary data is known at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        EventKind::all().iter().all(|kind| self.get(*kind).is_empty())
    }
}

/// Net migration for one year, tagged by how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "net", rename_all = "snake_case")]
pub enum MigrationEstimate {
    /// Immigrants minus emigrants.
    Direct(f64),
    /// Population change minus natural increase.
    Residual(f64),
    /// Neither method applies.
    Unknown,
}

impl MigrationEstimate {
    /// The net migration value, if known.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Direct(v) | Self::Residual(v) => Some(v),
            Self::Unknown => None,
        }
    }
}

/// Both migration signals, kept side by side per year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationEstimates {
    /// Direct estimates (immigrants − emigrants).
    pub direct: YearValueMap,
    /// Residual estimates (Δpop − (births − deaths)).
    pub residual: YearValueMap,
}

impl MigrationEstimates {
    /// Preferred estimate for `year`: direct, then residual, then unknown.
    #[must_use]
    pub fn estimate(&self, year: i32) -> MigrationEstimate {
        if let Some(net) = self.direct.get(&year) {
            MigrationEstimate::Direct(*net)
        } else if let Some(net) = self.residual.get(&year) {
            MigrationEstimate::Residual(*net)
        } else {
            MigrationEstimate::Unknown
        }
    }

    /// Preferred net migration for `year`, if any method applies.
    #[must_use]
    pub fn net(&self, year: i32) -> Option<f64> {
        self.estimate(year).value()
    }

    /// Every year with at least one estimate, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.direct
            .keys()
            .chain(self.residual.keys())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Preferred estimate for every covered year, ascending.
    #[must_use]
    pub fn preferred(&self) -> BTreeMap<i32, MigrationEstimate> {
        self.years()
            .into_iter()
            .map(|year| (year, self.estimate(year)))
            .collect()
    }
}

/// Which years fed a [`Preset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSources {
    /// Years with known births.
    pub births_years: Vec<i32>,
    /// Years with known deaths.
    pub deaths_years: Vec<i32>,
    /// Years with known immigrants.
    pub immigrants_years: Vec<i32>,
    /// Years with known emigrants.
    pub emigrants_years: Vec<i32>,
    /// Number of CBR values averaged.
    pub cbr_samples: usize,
    /// Number of CDR values averaged.
    pub cdr_samples: usize,
    /// Number of migration values averaged.
    pub mig_samples: usize,
}

/// Trailing-window "business as usual" demographic parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Crude birth rate, per mille.
    pub cbr: Option<f64>,
    /// Crude death rate, per mille.
    pub cdr: Option<f64>,
    /// Net migration, persons per year.
    pub mig: Option<f64>,
    /// Contributing source metadata.
    pub sources: PresetSources,
}

impl Preset {
    /// Whether all three components are known and finite.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [self.cbr, self.cdr, self.mig]
            .iter()
            .all(|c| c.is_some_and(f64::is_finite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annual_series_years_are_consecutive() {
        let series = AnnualSeries::from_parts(1990, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.years(), &[1990, 1991, 1992]);
        assert_eq!(series.last_year(), Some(1992));
        assert_eq!(series.population(1991), Some(2.0));
        assert_eq!(series.population(1989), None);
        assert_eq!(series.population(1993), None);
    }

    #[test]
    fn annual_series_stops_at_last_representable_year() {
        let series = AnnualSeries::from_parts(i32::MAX - 1, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.years(), &[i32::MAX - 1, i32::MAX]);
        assert_eq!(series.pops(), &[1.0, 2.0]);
        assert_eq!(series.last_year(), Some(i32::MAX));
    }

    #[test]
    fn historical_max_ignores_non_finite() {
        let series = AnnualSeries::from_parts(2000, vec![5.0, f64::NAN, 7.0]);
        assert!((series.historical_max() - 7.0).abs() < f64::EPSILON);

        let empty = AnnualSeries::from_parts(2000, Vec::new());
        assert!((empty.historical_max() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tabular_row_keeps_first_two_columns() {
        let row = TabularRow::from_columns(["2019", "1200", "ignored"]);
        assert_eq!(row.period.as_deref(), Some("2019"));
        assert_eq!(row.value.as_deref(), Some("1200"));

        let single = TabularRow::from_columns(["2019"]);
        assert_eq!(single.value, None);
    }

    #[test]
    fn direct_migration_takes_precedence() {
        let mut estimates = MigrationEstimates::default();
        estimates.direct.insert(2001, 10.0);
        estimates.residual.insert(2001, 99.0);
        estimates.residual.insert(2002, 5.0);

        assert_eq!(estimates.estimate(2001), MigrationEstimate::Direct(10.0));
        assert_eq!(estimates.estimate(2002), MigrationEstimate::Residual(5.0));
        assert_eq!(estimates.estimate(2003), MigrationEstimate::Unknown);
        assert_eq!(estimates.years(), vec![2001, 2002]);
    }

    #[test]
    fn event_kind_parses_case_insensitively() {
        assert_eq!("Births".parse::<EventKind>().unwrap(), EventKind::Births);
        assert_eq!(EventKind::Emigrants.to_string(), "emigrants");
    }

    #[test]
    fn preset_completeness() {
        let mut preset = Preset {
            cbr: Some(9.0),
            cdr: Some(12.0),
            mig: None,
            ..Preset::default()
        };
        assert!(!preset.is_complete());
        preset.mig = Some(-10.0);
        assert!(preset.is_complete());
    }

    #[test]
    fn census_point_deserializes_from_json() {
        let points: Vec<CensusPoint> =
            serde_json::from_str(r#"[{"year": 2011, "population": 20121641}]"#).unwrap();
        assert_eq!(points, vec![CensusPoint::new(2011, 20_121_641.0)]);
    }
}
