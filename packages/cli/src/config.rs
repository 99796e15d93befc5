//! `popcast.toml` configuration.
//!
//! Every key is optional. Command-line flags override whatever the file
//! sets.

use std::path::{Path, PathBuf};

use popcast_census::preset::DEFAULT_TRAILING_YEARS;
use popcast_projection::trend::DEFAULT_YEARS_BACK;
use serde::Deserialize;

use crate::CliError;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "popcast.toml";

/// Default projection horizon, in years.
pub const DEFAULT_HORIZON_YEARS: u32 = 30;

fn default_census() -> PathBuf {
    PathBuf::from("data/population-census.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/generated")
}

const fn default_horizon() -> u32 {
    DEFAULT_HORIZON_YEARS
}

const fn default_trailing_years() -> usize {
    DEFAULT_TRAILING_YEARS
}

const fn default_auto_rate_years() -> usize {
    DEFAULT_YEARS_BACK
}

fn default_scenario() -> String {
    "status".to_string()
}

fn default_method() -> String {
    "demographic".to_string()
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// JSON file with the census samples.
    #[serde(default = "default_census")]
    pub census: PathBuf,
    /// Directory receiving exported CSV files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Optional yearly count tables.
    #[serde(default)]
    pub auxiliary: AuxiliaryPaths,
    /// Projection defaults.
    #[serde(default)]
    pub projection: ProjectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            census: default_census(),
            output_dir: default_output_dir(),
            auxiliary: AuxiliaryPaths::default(),
            projection: ProjectionConfig::default(),
        }
    }
}

/// Paths of the four auxiliary CSV tables. Each may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuxiliaryPaths {
    pub births: Option<PathBuf>,
    pub deaths: Option<PathBuf>,
    pub immigrants: Option<PathBuf>,
    pub emigrants: Option<PathBuf>,
}

/// `[projection]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Years projected beyond the last census year.
    #[serde(default = "default_horizon")]
    pub horizon_years: u32,
    /// Scenario name (`status`, `pessimistic`, `pronatalist`, `custom`).
    #[serde(default = "default_scenario")]
    pub scenario: String,
    /// Method name. Unrecognized names run the demographic method.
    #[serde(default = "default_method")]
    pub method: String,
    /// Parameter of the non-demographic methods, or `auto`.
    #[serde(default)]
    pub method_param: Option<String>,
    /// Trailing window of the status-quo preset.
    #[serde(default = "default_trailing_years")]
    pub trailing_years: usize,
    /// Look-back of `auto` growth rates and deltas.
    #[serde(default = "default_auto_rate_years")]
    pub auto_rate_years: usize,
    /// Custom scenario birth rate, per mille.
    #[serde(default)]
    pub cbr: Option<f64>,
    /// Custom scenario death rate, per mille.
    #[serde(default)]
    pub cdr: Option<f64>,
    /// Custom scenario net migration, persons per year.
    #[serde(default)]
    pub mig_net: Option<f64>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_years: default_horizon(),
            scenario: default_scenario(),
            method: default_method(),
            method_param: None,
            trailing_years: default_trailing_years(),
            auto_rate_years: default_auto_rate_years(),
            cbr: None,
            cdr: None,
            mig_net: None,
        }
    }
}

/// Parses configuration text.
///
/// # Errors
///
/// Returns [`CliError::Toml`] if the text is not valid configuration.
pub fn parse_config_toml(text: &str) -> Result<Config, CliError> {
    Ok(toml::from_str(text)?)
}

/// Loads the configuration at `path`.
///
/// A missing file at the default location yields the defaults; a missing
/// file the caller named explicitly is an error.
///
/// # Errors
///
/// Returns [`CliError`] if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    let (path, explicit) = path.map_or_else(
        || (Path::new(DEFAULT_CONFIG_FILE), false),
        |p| (p, true),
    );

    if !explicit && !path.exists() {
        log::info!("No {} found, using built-in defaults", path.display());
        return Ok(Config::default());
    }

    let text = std::fs::read_to_string(path)?;
    let config = parse_config_toml(&text)?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.projection.horizon_years, 30);
        assert_eq!(config.projection.trailing_years, 5);
        assert_eq!(config.projection.auto_rate_years, 5);
        assert_eq!(config.projection.scenario, "status");
        assert_eq!(config.auxiliary.births, None);
    }

    #[test]
    fn parses_full_file() {
        let config = parse_config_toml(
            r#"
census = "in/census.json"
output_dir = "out"

[auxiliary]
births = "in/births.csv"
emigrants = "in/emigration.csv"

[projection]
horizon_years = 50
scenario = "custom"
method = "rateBased"
method_param = "-0.8"
trailing_years = 3
auto_rate_years = 10
cbr = 9.0
cdr = 14.5
mig_net = -20000.0
"#,
        )
        .unwrap();

        assert_eq!(config.census, PathBuf::from("in/census.json"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.auxiliary.births, Some(PathBuf::from("in/births.csv")));
        assert_eq!(config.auxiliary.deaths, None);
        assert_eq!(
            config.auxiliary.emigrants,
            Some(PathBuf::from("in/emigration.csv"))
        );
        assert_eq!(config.projection.horizon_years, 50);
        assert_eq!(config.projection.method, "rateBased");
        assert_eq!(config.projection.method_param.as_deref(), Some("-0.8"));
        assert_eq!(config.projection.trailing_years, 3);
        assert_eq!(config.projection.auto_rate_years, 10);
        assert_eq!(config.projection.mig_net, Some(-20_000.0));
    }

    #[test]
    fn partial_projection_table_keeps_other_defaults() {
        let config = parse_config_toml("[projection]\nhorizon_years = 10\n").unwrap();
        assert_eq!(config.projection.horizon_years, 10);
        assert_eq!(config.projection.method, "demographic");
        assert_eq!(config.census, PathBuf::from("data/population-census.json"));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            parse_config_toml("horizon = 10\n"),
            Err(CliError::Toml(_))
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("does/not/exist/popcast.toml")));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
