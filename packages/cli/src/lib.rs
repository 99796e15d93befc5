#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! File-backed host for the census and projection crates.
//!
//! Loads `popcast.toml`, the census JSON, and the optional auxiliary CSV
//! tables, then runs projections and writes their exports.

pub mod config;
pub mod input;
pub mod run;

use popcast_census::CensusError;
use popcast_projection::ProjectionError;
use thiserror::Error;

/// Errors that can occur in the command-line host.
#[derive(Debug, Error)]
pub enum CliError {
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Census JSON could not be parsed, or a report could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An auxiliary table is not readable CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The configuration file is invalid.
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The census could not be annualized.
    #[error("Census error: {0}")]
    Census(#[from] CensusError),

    /// The projection rejected its request or failed to export.
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// The scenario name matches no known scenario.
    #[error("Unknown scenario '{0}' (expected status, pessimistic, pronatalist, or custom)")]
    UnknownScenario(String),
}
