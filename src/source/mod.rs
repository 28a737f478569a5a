//! @ai:module:intent Raw time-series tables and their CSV loading
//! @ai:module:layer domain
//! @ai:module:public_api Metric, RawTable, RawTables, CsvSourceLoader, SourceLoaderTrait, SourcePaths

pub mod loader;
pub mod raw_table;

pub use loader::{CsvSourceLoader, SourceLoaderTrait, SourcePaths};
pub use raw_table::{Metric, RawTable, RawTables};
