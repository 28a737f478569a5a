//! @ai:module:intent Configuration structs for the epitrack pipeline
//! @ai:module:layer infrastructure
//! @ai:module:public_api Config, PathConfig, SourceConfig, AnalysisConfig, DayZeroConfig, ChartConfig, CountrySelection
//! @ai:module:stateless true

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Main configuration for a pipeline run
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub charts: ChartConfig,
}

/// @ai:intent Input and output locations
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Explicit per-metric files; when all three are set, discovery is skipped.
    pub confirmed: Option<PathBuf>,
    pub deaths: Option<PathBuf>,
    pub recovered: Option<PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// @ai:intent Raw CSV schema: grouping key, descriptive columns, date header format
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_key_column")]
    pub key_column: String,
    #[serde(default = "default_drop_columns")]
    pub drop_columns: Vec<String>,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

/// @ai:intent Parameters of the derived metrics
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Ratio cells are kept only where total deaths exceed this value.
    #[serde(default = "default_ratio_min_deaths")]
    pub ratio_min_deaths: i64,
    /// Smoothing factor β of the exponential average, in (0, 1).
    #[serde(default = "default_smoothing_beta")]
    pub smoothing_beta: f64,
    #[serde(default)]
    pub day_zero: DayZeroConfig,
}

/// @ai:intent Thresholds and lookback of the day-zero realignment
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayZeroConfig {
    #[serde(default = "default_confirmed_threshold")]
    pub confirmed_threshold: i64,
    #[serde(default = "default_deaths_threshold")]
    pub deaths_threshold: i64,
    /// Maximum number of days kept before offset 0.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: usize,
}

/// @ai:intent Chart output settings
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub selection: CountrySelection,
}

/// @ai:intent Which countries appear on charts
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountrySelection {
    /// Used when `countries` is not set: the N countries with most confirmed cases.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    pub countries: Option<Vec<String>>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            confirmed: None,
            deaths: None,
            recovered: None,
            output_dir: default_output_dir(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            key_column: default_key_column(),
            drop_columns: default_drop_columns(),
            date_format: default_date_format(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ratio_min_deaths: default_ratio_min_deaths(),
            smoothing_beta: default_smoothing_beta(),
            day_zero: DayZeroConfig::default(),
        }
    }
}

impl Default for DayZeroConfig {
    fn default() -> Self {
        Self {
            confirmed_threshold: default_confirmed_threshold(),
            deaths_threshold: default_deaths_threshold(),
            lookback_days: default_lookback_days(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            selection: CountrySelection::default(),
        }
    }
}

impl Default for CountrySelection {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            countries: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("csse_covid_19_data/csse_covid_19_time_series")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_key_column() -> String {
    "Country/Region".to_string()
}

fn default_drop_columns() -> Vec<String> {
    vec![
        "Province/State".to_string(),
        "Lat".to_string(),
        "Long".to_string(),
    ]
}

fn default_date_format() -> String {
    "%m/%d/%y".to_string()
}

fn default_ratio_min_deaths() -> i64 {
    100
}

fn default_smoothing_beta() -> f64 {
    0.9
}

fn default_confirmed_threshold() -> i64 {
    100
}

fn default_deaths_threshold() -> i64 {
    10
}

fn default_lookback_days() -> usize {
    10
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    700
}

fn default_top_n() -> usize {
    10
}

impl Config {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl PathConfig {
    /// @ai:intent Explicit per-metric paths, only when all three are configured
    /// @ai:effects pure
    pub fn explicit_sources(&self) -> Option<crate::source::SourcePaths> {
        match (&self.confirmed, &self.deaths, &self.recovered) {
            (Some(c), Some(d), Some(r)) => Some(crate::source::SourcePaths {
                confirmed: c.clone(),
                deaths: d.clone(),
                recovered: r.clone(),
            }),
            _ => None,
        }
    }
}

impl CountrySelection {
    /// @ai:intent Check if a country is explicitly listed (all match when unset)
    /// @ai:effects pure
    pub fn matches(&self, country: &str) -> bool {
        self.countries
            .as_ref()
            .map(|c| c.iter().any(|name| name == country))
            .unwrap_or(true)
    }
}
