//! Linear interpolation of sparse census points into an annual series.

use popcast_census_models::{AnnualSeries, CensusPoint};

use crate::CensusError;

/// Expands census points into one population value per year.
///
/// Points are sorted by year first, so caller ordering does not matter.
/// Duplicate years collapse to the last occurrence in input order. Between
/// consecutive census years the population is linearly interpolated and
/// rounded to whole persons; the final census point is appended exactly.
///
/// # Errors
///
/// Returns [`CensusError::EmptyCensus`] for an empty input and
/// [`CensusError::InvalidPopulation`] for a negative or non-finite
/// population, and [`CensusError::YearOutOfRange`] when two consecutive
/// census years are too far apart to enumerate.
pub fn annualize(census: &[CensusPoint]) -> Result<AnnualSeries, CensusError> {
    if let Some(bad) = census
        .iter()
        .find(|p| !p.population.is_finite() || p.population < 0.0)
    {
        return Err(CensusError::InvalidPopulation {
            year: bad.year,
            population: bad.population,
        });
    }

    let points = dedup_by_year(census);
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(CensusError::EmptyCensus);
    };

    let mut pops = Vec::new();
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let span = b
            .year
            .checked_sub(a.year)
            .ok_or(CensusError::YearOutOfRange {
                first: a.year,
                last: b.year,
            })?;
        for offset in 0..span {
            let t = f64::from(offset) / f64::from(span);
            pops.push((b.population - a.population).mul_add(t, a.population).round());
        }
    }
    pops.push(last.population);

    log::debug!(
        "Annualized {} census points into {} years ({}..={})",
        census.len(),
        pops.len(),
        first.year,
        last.year
    );

    Ok(AnnualSeries::from_parts(first.year, pops))
}

/// Stable sort by year, keeping the last point seen for each year.
fn dedup_by_year(census: &[CensusPoint]) -> Vec<CensusPoint> {
    let mut sorted = census.to_vec();
    sorted.sort_by_key(|p| p.year);

    let mut out: Vec<CensusPoint> = Vec::with_capacity(sorted.len());
    for point in sorted {
        match out.last_mut() {
            Some(prev) if prev.year == point.year => {
                log::debug!("Duplicate census year {}, keeping later value", point.year);
                *prev = point;
            }
            _ => out.push(point),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_linear_steps() {
        let series =
            annualize(&[CensusPoint::new(2000, 100.0), CensusPoint::new(2005, 150.0)]).unwrap();
        assert_eq!(series.years(), &[2000, 2001, 2002, 2003, 2004, 2005]);
        assert_eq!(series.pops(), &[100.0, 110.0, 120.0, 130.0, 140.0, 150.0]);
    }

    #[test]
    fn single_point_yields_single_year() {
        let series = annualize(&[CensusPoint::new(2011, 20_121_641.0)]).unwrap();
        assert_eq!(series.years(), &[2011]);
        assert_eq!(series.pops(), &[20_121_641.0]);
    }

    #[test]
    fn resorts_unordered_input() {
        let series = annualize(&[
            CensusPoint::new(2004, 200.0),
            CensusPoint::new(2000, 100.0),
            CensusPoint::new(2002, 100.0),
        ])
        .unwrap();
        assert_eq!(series.years(), &[2000, 2001, 2002, 2003, 2004]);
        assert_eq!(series.pops(), &[100.0, 100.0, 100.0, 150.0, 200.0]);
    }

    #[test]
    fn duplicate_years_keep_last_value() {
        let series = annualize(&[
            CensusPoint::new(2000, 100.0),
            CensusPoint::new(2002, 300.0),
            CensusPoint::new(2000, 200.0),
        ])
        .unwrap();
        assert_eq!(series.years(), &[2000, 2001, 2002]);
        assert_eq!(series.pops(), &[200.0, 250.0, 300.0]);
    }

    #[test]
    fn final_census_value_is_exact() {
        let series =
            annualize(&[CensusPoint::new(2000, 0.0), CensusPoint::new(2003, 10.5)]).unwrap();
        assert_eq!(series.pops(), &[0.0, 4.0, 7.0, 10.5]);
    }

    #[test]
    fn interpolation_rounds_to_whole_persons() {
        let series =
            annualize(&[CensusPoint::new(2000, 0.0), CensusPoint::new(2003, 10.0)]).unwrap();
        assert_eq!(series.pops(), &[0.0, 3.0, 7.0, 10.0]);
    }

    #[test]
    fn rejects_negative_population() {
        let result = annualize(&[CensusPoint::new(2000, -1.0)]);
        assert!(matches!(
            result,
            Err(CensusError::InvalidPopulation { year: 2000, .. })
        ));
    }

    #[test]
    fn rejects_unrepresentable_year_span() {
        let result = annualize(&[
            CensusPoint::new(i32::MIN, 1.0),
            CensusPoint::new(i32::MAX, 2.0),
        ]);
        assert!(matches!(
            result,
            Err(CensusError::YearOutOfRange {
                first: i32::MIN,
                last: i32::MAX,
            })
        ));
    }

    #[test]
    fn series_may_end_at_last_representable_year() {
        let series = annualize(&[
            CensusPoint::new(i32::MAX - 2, 100.0),
            CensusPoint::new(i32::MAX, 102.0),
        ])
        .unwrap();
        assert_eq!(series.years(), &[i32::MAX - 2, i32::MAX - 1, i32::MAX]);
        assert_eq!(series.pops(), &[100.0, 101.0, 102.0]);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(annualize(&[]), Err(CensusError::EmptyCensus)));
    }
}
