//! Net migration derived from direct counts or the demographic residual.

use popcast_census_models::{AnnualSeries, MigrationEstimates, VitalEvents};

/// Computes direct and residual net migration for every year of `series`
/// that has a successor.
///
/// * direct: `immigrants − emigrants` when both are known for the year.
/// * residual: `(pop[y+1] − pop[y]) − (births − deaths)` when births and
///   deaths are known for the year.
///
/// Both signals are kept; [`MigrationEstimates::estimate`] applies the
/// direct-over-residual preference.
#[must_use]
pub fn estimate_migration(series: &AnnualSeries, events: &VitalEvents) -> MigrationEstimates {
    let mut estimates = MigrationEstimates::default();

    let years = series.years();
    let pops = series.pops();

    for (i, pair) in pops.windows(2).enumerate() {
        let year = years[i];
        let (pop_t, pop_next) = (pair[0], pair[1]);

        if let (Some(im), Some(em)) = (events.immigrants.get(&year), events.emigrants.get(&year))
        {
            estimates.direct.insert(year, im - em);
        }

        if let (Some(births), Some(deaths)) = (events.births.get(&year), events.deaths.get(&year))
        {
            let residual = (pop_next - pop_t) - (births - deaths);
            if residual.is_finite() {
                estimates.residual.insert(year, residual);
            }
        }
    }

    estimates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(first_year: i32, pops: &[f64]) -> AnnualSeries {
        AnnualSeries::from_parts(first_year, pops.to_vec())
    }

    #[test]
    fn residual_is_change_minus_natural_increase() {
        let mut events = VitalEvents::default();
        events.births.insert(2000, 30.0);
        events.deaths.insert(2000, 10.0);

        let estimates = estimate_migration(&series(2000, &[1000.0, 1050.0]), &events);
        assert_eq!(estimates.residual.get(&2000), Some(&30.0));
        assert!(estimates.direct.is_empty());
    }

    #[test]
    fn direct_requires_both_flows() {
        let mut events = VitalEvents::default();
        events.immigrants.insert(2000, 500.0);
        events.emigrants.insert(2000, 800.0);
        events.immigrants.insert(2001, 400.0);

        let estimates = estimate_migration(&series(2000, &[10.0, 10.0, 10.0]), &events);
        assert_eq!(estimates.direct.get(&2000), Some(&-300.0));
        assert_eq!(estimates.direct.get(&2001), None);
    }

    #[test]
    fn final_year_has_no_estimate() {
        let mut events = VitalEvents::default();
        events.immigrants.insert(2001, 1.0);
        events.emigrants.insert(2001, 1.0);
        events.births.insert(2001, 1.0);
        events.deaths.insert(2001, 1.0);

        let estimates = estimate_migration(&series(2000, &[10.0, 10.0]), &events);
        assert!(estimates.direct.is_empty());
        assert!(estimates.residual.is_empty());
    }

    #[test]
    fn keeps_both_signals_for_same_year() {
        let mut events = VitalEvents::default();
        events.immigrants.insert(2000, 50.0);
        events.emigrants.insert(2000, 20.0);
        events.births.insert(2000, 30.0);
        events.deaths.insert(2000, 10.0);

        let estimates = estimate_migration(&series(2000, &[1000.0, 1100.0]), &events);
        assert_eq!(estimates.direct.get(&2000), Some(&30.0));
        assert_eq!(estimates.residual.get(&2000), Some(&80.0));
        assert_eq!(estimates.net(2000), Some(30.0));
    }

    #[test]
    fn single_year_series_yields_nothing() {
        let estimates = estimate_migration(&series(2000, &[10.0]), &VitalEvents::default());
        assert!(estimates.years().is_empty());
    }
}
