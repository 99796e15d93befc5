//! Normalization of loosely-formatted yearly tables.
//!
//! Auxiliary tables (births, deaths, immigrants, emigrants) come from
//! heterogeneous statistical exports whose headers vary and whose period
//! column often embeds the year in free text. Ingestion is best-effort:
//! malformed rows are dropped and an absent table yields an empty map.

use std::sync::LazyLock;

use popcast_census_models::{EventKind, TabularRow, VitalEvents, YearValueMap};
use regex::Regex;

static YEAR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").unwrap_or_else(|_| unreachable!()));

/// Extracts a year from a period cell.
///
/// Uses the first run of four digits; otherwise the whole cell must parse
/// as a finite whole number. Year `0` is treated as absent.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_year_cell(cell: &str) -> Option<i32> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    let year = if let Some(m) = YEAR_RUN.find(cell) {
        m.as_str().parse::<i32>().ok()?
    } else {
        let value = parse_number(cell)?;
        if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
            return None;
        }
        value as i32
    };

    (year != 0).then_some(year)
}

/// Parses a numeric cell, accepting only finite values.
#[must_use]
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extracts `(year, value)` from a row, or `None` if either is malformed.
///
/// The value comes from the second column; when that is missing or blank
/// the first column's text is parsed instead.
#[must_use]
pub fn parse_row(row: &TabularRow) -> Option<(i32, f64)> {
    let period = row.period.as_deref()?;
    let year = parse_year_cell(period)?;
    let raw_value = row
        .value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(period);
    let value = parse_number(raw_value)?;
    Some((year, value))
}

/// Builds a year→value map from the rows of one table.
///
/// Later rows for the same year overwrite earlier ones. `None` means the
/// table was not provided and yields an empty map.
#[must_use]
pub fn ingest_rows(rows: Option<&[TabularRow]>) -> YearValueMap {
    let mut map = YearValueMap::new();
    let Some(rows) = rows else {
        return map;
    };

    let mut dropped = 0_usize;
    for row in rows {
        if let Some((year, value)) = parse_row(row) {
            map.insert(year, value);
        } else {
            log::trace!("Dropping malformed row: {row:?}");
            dropped += 1;
        }
    }

    if dropped > 0 {
        log::debug!(
            "Ingested {} years from {} rows ({dropped} dropped)",
            map.len(),
            rows.len()
        );
    }

    map
}

/// Auxiliary tables keyed by event kind, each optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuxiliaryTables<'a> {
    /// Births table.
    pub births: Option<&'a [TabularRow]>,
    /// Deaths table.
    pub deaths: Option<&'a [TabularRow]>,
    /// Immigrants table.
    pub immigrants: Option<&'a [TabularRow]>,
    /// Emigrants table.
    pub emigrants: Option<&'a [TabularRow]>,
}

impl<'a> AuxiliaryTables<'a> {
    /// The table for one event kind.
    #[must_use]
    pub const fn get(&self, kind: EventKind) -> Option<&'a [TabularRow]> {
        match kind {
            EventKind::Births => self.births,
            EventKind::Deaths => self.deaths,
            EventKind::Immigrants => self.immigrants,
            EventKind::Emigrants => self.emigrants,
        }
    }
}

/// Ingests all four auxiliary tables.
#[must_use]
pub fn ingest_events(tables: &AuxiliaryTables<'_>) -> VitalEvents {
    let mut events = VitalEvents::default();
    for kind in EventKind::all() {
        let rows = tables.get(*kind);
        if rows.is_none() {
            log::debug!("No {kind} table supplied; treating all years as unknown");
        }
        *events.get_mut(*kind) = ingest_rows(rows);
    }
    events
}
