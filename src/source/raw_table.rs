//! @ai:module:intent Raw per-region time-series tables as read from CSV
//! @ai:module:layer domain
//! @ai:module:public_api Metric, RawTable, RawTables
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Which cumulative count a table carries
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Confirmed,
    Deaths,
    Recovered,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Confirmed, Metric::Deaths, Metric::Recovered];

    /// @ai:intent Convert metric to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Confirmed => "confirmed",
            Metric::Deaths => "deaths",
            Metric::Recovered => "recovered",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent One CSV file: header row plus string records, unparsed
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Source label used in error messages (usually the file name).
    pub name: String,
    /// Column names, descriptive columns first, then one per date.
    pub headers: Vec<String>,
    /// Each record, one string per header.
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            records,
        }
    }

    /// @ai:intent Position of a column by exact header name
    /// @ai:effects pure
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == column)
    }
}

/// The three raw tables of one data snapshot.
#[derive(Debug, Clone)]
pub struct RawTables {
    pub confirmed: RawTable,
    pub deaths: RawTable,
    pub recovered: RawTable,
}

impl RawTables {
    pub fn get(&self, metric: Metric) -> &RawTable {
        match metric {
            Metric::Confirmed => &self.confirmed,
            Metric::Deaths => &self.deaths,
            Metric::Recovered => &self.recovered,
        }
    }
}
