//! Reading census JSON and auxiliary CSV tables from disk.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use popcast_census::HistoricalBaseline;
use popcast_census::ingest::{AuxiliaryTables, ingest_events};
use popcast_census_models::{CensusPoint, TabularRow};

use crate::CliError;
use crate::config::{AuxiliaryPaths, Config};

/// Parses a JSON array of `{ "year", "population" }` objects.
///
/// # Errors
///
/// Returns [`CliError::Json`] if the input is not such an array.
pub fn read_census<R: Read>(reader: R) -> Result<Vec<CensusPoint>, CliError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Loads the census file at `path`.
///
/// # Errors
///
/// Returns [`CliError`] if the file cannot be opened or parsed.
pub fn load_census(path: &Path) -> Result<Vec<CensusPoint>, CliError> {
    let file = File::open(path)?;
    let points = read_census(BufReader::new(file))?;
    log::info!("Loaded {} census points from {}", points.len(), path.display());
    Ok(points)
}

/// Reads a CSV table into rows of its first two columns.
///
/// The first record is treated as a header and skipped. Rows may have any
/// number of columns. Cells that are not valid UTF-8 are decoded lossily and
/// records the CSV parser rejects are skipped.
///
/// # Errors
///
/// Returns [`CliError::Csv`] only if reading the underlying input fails.
pub fn read_table<R: Read>(reader: R) -> Result<Vec<TabularRow>, CliError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.byte_records() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::trace!("Skipping unreadable table record: {e}");
                continue;
            }
        };
        rows.push(TabularRow::from_columns(
            record.iter().map(|cell| String::from_utf8_lossy(cell).into_owned()),
        ));
    }
    Ok(rows)
}

/// Loads the optional table at `path`. A missing file yields `None`.
///
/// # Errors
///
/// Returns [`CliError`] if an existing file cannot be read.
pub fn load_table(name: &str, path: Option<&Path>) -> Result<Option<Vec<TabularRow>>, CliError> {
    let Some(path) = path else {
        log::info!("No {name} table configured");
        return Ok(None);
    };
    if !path.exists() {
        log::info!("{name} table {} not found, treating as unknown", path.display());
        return Ok(None);
    }

    let rows = read_table(BufReader::new(File::open(path)?))?;
    log::info!("Loaded {} {name} rows from {}", rows.len(), path.display());
    Ok(Some(rows))
}

/// Owned auxiliary tables as read from disk.
#[derive(Debug, Clone, Default)]
pub struct LoadedTables {
    pub births: Option<Vec<TabularRow>>,
    pub deaths: Option<Vec<TabularRow>>,
    pub immigrants: Option<Vec<TabularRow>>,
    pub emigrants: Option<Vec<TabularRow>>,
}

impl LoadedTables {
    /// Loads every table named in `paths`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if an existing table cannot be read.
    pub fn load(paths: &AuxiliaryPaths) -> Result<Self, CliError> {
        Ok(Self {
            births: load_table("births", paths.births.as_deref())?,
            deaths: load_table("deaths", paths.deaths.as_deref())?,
            immigrants: load_table("immigrants", paths.immigrants.as_deref())?,
            emigrants: load_table("emigrants", paths.emigrants.as_deref())?,
        })
    }

    /// Borrowed view for the ingestor.
    #[must_use]
    pub fn tables(&self) -> AuxiliaryTables<'_> {
        AuxiliaryTables {
            births: self.births.as_deref(),
            deaths: self.deaths.as_deref(),
            immigrants: self.immigrants.as_deref(),
            emigrants: self.emigrants.as_deref(),
        }
    }
}

/// Builds the historical baseline from the files named in `config`.
///
/// # Errors
///
/// Returns [`CliError`] if the census cannot be loaded or is invalid, or an
/// existing auxiliary table cannot be read.
pub fn load_baseline(config: &Config) -> Result<HistoricalBaseline, CliError> {
    let census = load_census(&config.census)?;
    let tables = LoadedTables::load(&config.auxiliary)?;
    let events = ingest_events(&tables.tables());
    Ok(HistoricalBaseline::build(&census, events)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_census_json() {
        let points = read_census(
            r#"[{"year": 2002, "population": 21680974}, {"year": 2011, "population": 20121641}]"#
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(
            points,
            vec![
                CensusPoint::new(2002, 21_680_974.0),
                CensusPoint::new(2011, 20_121_641.0),
            ]
        );
    }

    #[test]
    fn rejects_malformed_census() {
        assert!(matches!(
            read_census(r#"{"year": 2002}"#.as_bytes()),
            Err(CliError::Json(_))
        ));
    }

    #[test]
    fn reads_ragged_table_skipping_header() {
        let rows = read_table("Perioada,Valoare,UM\nAnul 2019, 203000 ,persoane\n2020\n".as_bytes())
            .unwrap();
        assert_eq!(
            rows,
            vec![
                TabularRow::new("Anul 2019", "203000"),
                TabularRow {
                    period: Some("2020".to_string()),
                    value: None,
                },
            ]
        );
    }

    #[test]
    fn non_utf8_cells_keep_their_rows() {
        let rows = read_table(&b"An,Valoare\n2019,203000\nAnul \xee2020,190000\n"[..]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], TabularRow::new("2019", "203000"));
        assert!(rows[1].period.as_deref().is_some_and(|p| p.contains("2020")));
        assert_eq!(rows[1].value.as_deref(), Some("190000"));

        let events = ingest_events(&AuxiliaryTables {
            births: Some(rows.as_slice()),
            ..AuxiliaryTables::default()
        });
        assert_eq!(events.births.get(&2019), Some(&203_000.0));
        assert_eq!(events.births.get(&2020), Some(&190_000.0));
    }

    #[test]
    fn missing_table_is_unknown() {
        let rows = load_table("births", Some(Path::new("does/not/exist.csv"))).unwrap();
        assert!(rows.is_none());
        assert!(load_table("births", None).unwrap().is_none());
    }

    #[test]
    fn loaded_tables_feed_ingestor() {
        let tables = LoadedTables {
            births: Some(read_table("year,value\n2019,100\n2020,110\n".as_bytes()).unwrap()),
            ..LoadedTables::default()
        };
        let events = ingest_events(&tables.tables());
        assert_eq!(events.births.len(), 2);
        assert!(events.deaths.is_empty());
    }
}
