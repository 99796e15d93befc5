#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Population projection engine.
//!
//! Each public function is a pure computation over an explicit request and
//! the immutable historical series. The engine produces the true population
//! path; the display and summary modules derive presentation-only views
//! from it, and the export module writes the true values as CSV.

pub mod display;
pub mod engine;
pub mod export;
pub mod scenario;
pub mod summary;
pub mod trend;

use popcast_projection_models::InvalidParameterError;
use thiserror::Error;

pub use engine::project;

/// Errors that can occur during projection, export, or re-import.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// An explicit parameter failed to parse or is not finite.
    #[error("Invalid parameter {name}: '{value}'")]
    InvalidParameter {
        /// Name of the parameter.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// The request itself is malformed.
    #[error("Invalid projection request: {message}")]
    InvalidRequest {
        /// Description of what went wrong.
        message: String,
    },

    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while writing or reading an export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An exported row could not be read back.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// One-based line number in the CSV text.
        line: u64,
        /// Description of what went wrong.
        message: String,
    },
}

impl From<InvalidParameterError> for ProjectionError {
    fn from(e: InvalidParameterError) -> Self {
        Self::InvalidParameter {
            name: e.name,
            value: e.value,
        }
    }
}
