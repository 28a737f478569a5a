//! @ai:module:intent Epidemic time-series metrics library
//! @ai:module:layer application
//! @ai:module:public_api config, error, metrics, report, series, source, summary

pub mod config;
pub mod error;
pub mod metrics;
pub mod report;
pub mod series;
pub mod source;
pub mod summary;

pub use config::Config;
pub use error::{Error, Result};
pub use metrics::{Analysis, MetricsEngine, MetricsEngineTrait};
pub use report::ReportGenerator;
pub use series::{Aggregator, CountTable, CountryTables, DerivedTable, SeriesTable};
pub use source::{CsvSourceLoader, SourceLoaderTrait, SourcePaths};
pub use summary::{SummaryBuilder, SummaryTable};
