//! `year,population` CSV export of the true projection values.

use std::io::{Read, Write};

use popcast_projection_models::ProjectionResult;
use serde::Deserialize;

use crate::ProjectionError;

/// Header row of the export.
pub const EXPORT_HEADER: [&str; 2] = ["year", "population"];

#[derive(Debug, Deserialize)]
struct ExportRow {
    year: i32,
    population: f64,
}

/// Writes `result` as CSV, one row per year including the base year.
///
/// Populations are written as whole numbers from the unclamped series.
///
/// # Errors
///
/// Returns [`ProjectionError`] if writing fails.
pub fn write_projection_csv<W: Write>(
    result: &ProjectionResult,
    writer: W,
) -> Result<(), ProjectionError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADER)?;
    for (year, pop) in result.iter() {
        csv_writer.write_record([year.to_string(), format!("{:.0}", pop.round())])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders `result` as CSV text.
///
/// # Errors
///
/// Returns [`ProjectionError`] if encoding fails.
pub fn projection_csv_string(result: &ProjectionResult) -> Result<String, ProjectionError> {
    let mut buf = Vec::new();
    write_projection_csv(result, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ProjectionError::Parse {
        line: 0,
        message: e.to_string(),
    })
}

/// Reads an export produced by [`write_projection_csv`] back into a result.
///
/// # Errors
///
/// Returns [`ProjectionError::Csv`] for malformed CSV and
/// [`ProjectionError::Parse`] for rows with a non-finite population.
pub fn parse_projection_csv<R: Read>(reader: R) -> Result<ProjectionResult, ProjectionError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut years = Vec::new();
    let mut pops = Vec::new();
    for row in csv_reader.deserialize::<ExportRow>() {
        let row = row?;
        if !row.population.is_finite() {
            return Err(ProjectionError::Parse {
                line: u64::try_from(years.len()).map_or(0, |n| n + 2),
                message: format!("non-finite population for year {}", row.year),
            });
        }
        years.push(row.year);
        pops.push(row.population);
    }

    Ok(ProjectionResult { years, pops })
}

/// Suggested file name: `projection_{base_year}_{final_year}.csv`.
#[must_use]
pub fn export_filename(result: &ProjectionResult) -> String {
    let base = result.years.first().copied().unwrap_or_default();
    let last = result.final_year().unwrap_or(base);
    format!("projection_{base}_{last}.csv")
}
