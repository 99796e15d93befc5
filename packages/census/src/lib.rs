#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Demographic baseline derived from sparse census data.
//!
//! The pipeline runs leaves first: [`annualize`] turns census samples into a
//! dense [`AnnualSeries`], [`ingest`] normalizes optional yearly tables into
//! [`VitalEvents`], [`migration`] derives net migration, and [`preset`]
//! averages recent rates into a status-quo [`Preset`]. None of these
//! functions perform I/O; missing data is carried as "unknown" rather than
//! zero.

pub mod annualize;
pub mod ingest;
pub mod migration;
pub mod preset;

use popcast_census_models::{AnnualSeries, CensusPoint, MigrationEstimates, Preset, VitalEvents};
use thiserror::Error;

pub use preset::PresetOptions;

/// Errors that can occur while building the historical baseline.
#[derive(Debug, Error)]
pub enum CensusError {
    /// No census points were supplied.
    #[error("Census input contains no points")]
    EmptyCensus,

    /// A census population is negative or not a finite number.
    #[error("Invalid census population {population} for year {year}")]
    InvalidPopulation {
        /// Census year of the offending point.
        year: i32,
        /// The rejected population value.
        population: f64,
    },

    /// Two consecutive census years are too far apart to enumerate.
    #[error("Census years {first} and {last} span more years than can be represented")]
    YearOutOfRange {
        /// Earlier census year.
        first: i32,
        /// Later census year.
        last: i32,
    },
}

/// The immutable history every projection is computed against.
#[derive(Debug, Clone)]
pub struct HistoricalBaseline {
    /// Dense annual population series.
    pub series: AnnualSeries,
    /// Auxiliary yearly counts.
    pub events: VitalEvents,
    /// Direct and residual migration estimates.
    pub migration: MigrationEstimates,
}

impl HistoricalBaseline {
    /// Annualizes `census` and derives migration estimates from `events`.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError`] if the census is empty or contains an
    /// invalid population.
    pub fn build(census: &[CensusPoint], events: VitalEvents) -> Result<Self, CensusError> {
        let series = annualize::annualize(census)?;
        let migration = migration::estimate_migration(&series, &events);

        log::debug!(
            "Built baseline: {} annual points, {} direct and {} residual migration years",
            series.len(),
            migration.direct.len(),
            migration.residual.len()
        );

        Ok(Self {
            series,
            events,
            migration,
        })
    }

    /// Computes the status-quo preset over this baseline.
    #[must_use]
    pub fn preset(&self, options: &PresetOptions) -> Preset {
        preset::compute_preset(&self.series, &self.events, &self.migration, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_baseline_from_census_and_events() {
        let census = [CensusPoint::new(2000, 1000.0), CensusPoint::new(2001, 1050.0)];
        let mut events = VitalEvents::default();
        events.births.insert(2000, 30.0);
        events.deaths.insert(2000, 10.0);

        let baseline = HistoricalBaseline::build(&census, events).unwrap();
        assert_eq!(baseline.series.len(), 2);
        assert_eq!(baseline.migration.net(2000), Some(30.0));

        let preset = baseline.preset(&PresetOptions::default());
        assert!(preset.cbr.is_some());
        assert!(preset.mig.is_some());
    }

    #[test]
    fn empty_census_is_an_error() {
        let result = HistoricalBaseline::build(&[], VitalEvents::default());
        assert!(matches!(result, Err(CensusError::EmptyCensus)));
    }
}
