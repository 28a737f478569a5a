//! @ai:module:intent CSV loader and file discovery for time-series snapshots
//! @ai:module:layer infrastructure
//! @ai:module:public_api CsvSourceLoader, SourceLoaderTrait, SourcePaths
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::source::raw_table::{Metric, RawTable, RawTables};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Trait for locating and reading raw time-series tables
pub trait SourceLoaderTrait {
    /// @ai:intent Find one CSV per metric under a data directory
    fn discover(&self, data_dir: &Path) -> Result<SourcePaths>;

    /// @ai:intent Read one CSV into a raw table
    fn load(&self, path: &Path) -> Result<RawTable>;

    /// @ai:intent Read all three metric tables
    fn load_all(&self, paths: &SourcePaths) -> Result<RawTables> {
        Ok(RawTables {
            confirmed: self.load(&paths.confirmed)?,
            deaths: self.load(&paths.deaths)?,
            recovered: self.load(&paths.recovered)?,
        })
    }
}

/// @ai:intent Resolved file path for each metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub confirmed: PathBuf,
    pub deaths: PathBuf,
    pub recovered: PathBuf,
}

/// @ai:intent Loads JHU-style time-series CSV files
pub struct CsvSourceLoader;

impl CsvSourceLoader {
    /// @ai:intent Create a new CSV loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent File-name pattern for a metric's global time series
    /// @ai:effects pure
    ///
    /// Matches both `time_series_19-covid-Confirmed.csv` and
    /// `time_series_covid19_confirmed_global.csv`; the per-US-county files
    /// (`..._US.csv`) use another schema and are left out.
    fn pattern(metric: Metric) -> Result<Regex> {
        let expr = format!(r"(?i)^time_series.*{}(_global)?\.csv$", metric.as_str());
        Regex::new(&expr).map_err(|e| Error::InvalidParameter(e.to_string()))
    }

    /// @ai:intent Collect CSV candidates for one metric
    /// @ai:effects fs:read
    fn candidates(data_dir: &Path, metric: Metric) -> Result<Vec<PathBuf>> {
        let pattern = Self::pattern(metric)?;
        let mut found = Vec::new();

        for entry in WalkDir::new(data_dir) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let matches = entry
                .file_name()
                .to_str()
                .map(|name| pattern.is_match(name))
                .unwrap_or(false);
            if matches {
                found.push(entry.into_path());
            }
        }

        found.sort();
        Ok(found)
    }

    fn discover_one(data_dir: &Path, metric: Metric) -> Result<PathBuf> {
        let mut found = Self::candidates(data_dir, metric)?;

        match found.len() {
            0 => Err(Error::MissingSource {
                metric: metric.to_string(),
                dir: data_dir.to_path_buf(),
            }),
            1 => Ok(found.remove(0)),
            _ => Err(Error::AmbiguousSource {
                metric: metric.to_string(),
                dir: data_dir.to_path_buf(),
                candidates: found,
            }),
        }
    }
}

impl Default for CsvSourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceLoaderTrait for CsvSourceLoader {
    /// @ai:effects fs:read
    fn discover(&self, data_dir: &Path) -> Result<SourcePaths> {
        let paths = SourcePaths {
            confirmed: Self::discover_one(data_dir, Metric::Confirmed)?,
            deaths: Self::discover_one(data_dir, Metric::Deaths)?,
            recovered: Self::discover_one(data_dir, Metric::Recovered)?,
        };

        tracing::debug!(?paths, "discovered time-series files");
        Ok(paths)
    }

    /// @ai:pre path is a readable CSV with a header row
    /// @ai:effects fs:read
    fn load(&self, path: &Path) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record?;
            records.push(record.iter().map(str::to_string).collect());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::info!(
            "Loaded {} ({} columns, {} rows)",
            name,
            headers.len(),
            records.len()
        );
        Ok(RawTable::new(name, headers, records))
    }
}
