//! @ai:module:intent Country series tables and the per-country aggregator
//! @ai:module:layer domain
//! @ai:module:public_api DateAxis, SeriesTable, SeriesValue, CountTable, DerivedTable, MaskTable, Aggregator, CountryTables

pub mod aggregator;
pub mod table;

pub use aggregator::{Aggregator, CountryTables};
pub use table::{CountTable, DateAxis, DerivedTable, MaskTable, SeriesTable, SeriesValue};
