//! @ai:module:intent Collapse per-region rows into per-country count tables
//! @ai:module:layer application
//! @ai:module:public_api Aggregator, CountryTables
//! @ai:module:stateless true

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::series::table::{CountTable, DateAxis, SeriesTable};
use crate::source::{Metric, RawTable, RawTables};
use serde::Serialize;
use std::collections::BTreeMap;

/// @ai:intent Per-country count tables for the three metrics of one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryTables {
    pub confirmed: CountTable,
    pub deaths: CountTable,
    pub recovered: CountTable,
}

impl CountryTables {
    pub fn get(&self, metric: Metric) -> &CountTable {
        match metric {
            Metric::Confirmed => &self.confirmed,
            Metric::Deaths => &self.deaths,
            Metric::Recovered => &self.recovered,
        }
    }
}

/// @ai:intent Groups raw rows on a key column and sums the date columns
pub struct Aggregator {
    key_column: String,
    drop_columns: Vec<String>,
    date_format: String,
}

impl Aggregator {
    /// @ai:intent Create an aggregator for a given schema
    /// @ai:effects pure
    pub fn new(
        key_column: impl Into<String>,
        drop_columns: Vec<String>,
        date_format: impl Into<String>,
    ) -> Self {
        Self {
            key_column: key_column.into(),
            drop_columns,
            date_format: date_format.into(),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(
            config.key_column.clone(),
            config.drop_columns.clone(),
            config.date_format.clone(),
        )
    }

    fn require_column(raw: &RawTable, column: &str) -> Result<usize> {
        raw.column_index(column).ok_or_else(|| Error::MissingColumn {
            table: raw.name.clone(),
            column: column.to_string(),
        })
    }

    /// @ai:intent Sum all rows of each country into one row per country
    /// @ai:pre the key column and every drop column exist in `raw`
    /// @ai:post sum over countries equals sum over raw rows, per date
    /// @ai:effects pure
    pub fn aggregate(&self, raw: &RawTable) -> Result<CountTable> {
        let key_idx = Self::require_column(raw, &self.key_column)?;
        let mut skipped = vec![key_idx];
        for column in &self.drop_columns {
            skipped.push(Self::require_column(raw, column)?);
        }

        let date_idx: Vec<usize> = (0..raw.headers.len())
            .filter(|i| !skipped.contains(i))
            .collect();
        let axis = DateAxis::parse(
            date_idx.iter().map(|&i| raw.headers[i].as_str()),
            &self.date_format,
        )?;

        let mut sums: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        for (row, record) in raw.records.iter().enumerate() {
            if record.len() != raw.headers.len() {
                return Err(Error::RowLength {
                    country: format!("{} record {}", raw.name, row),
                    expected: raw.headers.len(),
                    actual: record.len(),
                });
            }

            let country = record[key_idx].trim().to_string();
            let totals = sums
                .entry(country)
                .or_insert_with(|| vec![0; date_idx.len()]);

            for (slot, &col) in totals.iter_mut().zip(&date_idx) {
                *slot = parse_count(&record[col])
                    .and_then(|count| slot.checked_add(count))
                    .ok_or_else(|| Error::InvalidCount {
                        row,
                        column: raw.headers[col].clone(),
                        value: record[col].clone(),
                    })?;
            }
        }

        tracing::debug!(
            table = %raw.name,
            rows = raw.records.len(),
            countries = sums.len(),
            dates = axis.len(),
            "aggregated regions into countries"
        );
        SeriesTable::new(axis, sums)
    }

    /// @ai:intent Aggregate the three raw tables of a snapshot
    /// @ai:effects pure
    pub fn aggregate_all(&self, raw: &RawTables) -> Result<CountryTables> {
        Ok(CountryTables {
            confirmed: self.aggregate(&raw.confirmed)?,
            deaths: self.aggregate(&raw.deaths)?,
            recovered: self.aggregate(&raw.recovered)?,
        })
    }
}

/// Empty cells count as zero; integral floats such as `"12.0"` are accepted
/// when they fit in an `i64`.
fn parse_count(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0);
    }
    if let Ok(v) = cell.parse::<i64>() {
        return Some(v);
    }

    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.fract() == 0.0)
        // i64::MAX as f64 is 2^63
        .filter(|v| *v >= i64::MIN as f64 && *v < i64::MAX as f64)
        .map(|v| v as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn aggregator() -> Aggregator {
        Aggregator::from_config(&SourceConfig::default())
    }

    fn raw(rows: &[&[&str]]) -> RawTable {
        let headers = ["Province/State", "Country/Region", "Lat", "Long", "1/22/20", "1/23/20"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let records = rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        RawTable::new("confirmed.csv", headers, records)
    }

    #[test]
    fn test_merges_regions_and_passes_single_rows() {
        let table = raw(&[
            &["r1", "A", "0", "0", "1", "2"],
            &["r2", "A", "0", "0", "3", "4"],
            &["", "B", "0", "0", "10", "20"],
        ]);

        let counts = aggregator().aggregate(&table).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("A"), Some(&[4, 6][..]));
        assert_eq!(counts.get("B"), Some(&[10, 20][..]));
        assert_eq!(counts.axis().len(), 2);
    }

    #[test]
    fn test_totals_are_conserved_per_date() {
        let table = raw(&[
            &["x", "France", "0", "0", "5", "7"],
            &["y", "France", "0", "0", "0", "11"],
            &["", "Italy", "0", "0", "2", "3"],
            &["z", "China", "0", "0", "444", "549"],
            &["w", "China", "0", "0", "1", "1"],
        ]);

        let counts = aggregator().aggregate(&table).unwrap();
        for date in 0..2 {
            let raw_total: i64 = table
                .records
                .iter()
                .map(|r| r[4 + date].parse::<i64>().unwrap())
                .sum();
            let agg_total: i64 = counts.iter().map(|(_, row)| row[date]).sum();
            assert_eq!(raw_total, agg_total);
        }
    }

    #[test]
    fn test_missing_key_column_fails() {
        let mut table = raw(&[&["", "A", "0", "0", "1", "2"]]);
        table.headers[1] = "Country".to_string();

        let err = aggregator().aggregate(&table).unwrap_err();
        assert!(
            matches!(err, Error::MissingColumn { column, .. } if column == "Country/Region")
        );
    }

    #[test]
    fn test_missing_drop_column_fails() {
        let mut table = raw(&[&["", "A", "0", "0", "1", "2"]]);
        table.headers[2] = "Latitude".to_string();

        let err = aggregator().aggregate(&table).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column, .. } if column == "Lat"));
    }

    #[test]
    fn test_empty_and_float_cells() {
        let table = raw(&[&["", "A", "0", "0", "", "5.0"]]);
        let counts = aggregator().aggregate(&table).unwrap();
        assert_eq!(counts.get("A"), Some(&[0, 5][..]));
    }

    #[test]
    fn test_invalid_count_reports_position() {
        let table = raw(&[&["", "A", "0", "0", "1", "n/a"]]);
        let err = aggregator().aggregate(&table).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidCount { row: 0, column, value } if column == "1/23/20" && value == "n/a"
        ));
    }

    #[test]
    fn test_sum_overflow_is_rejected() {
        let table = raw(&[
            &["r1", "A", "0", "0", "1", "9223372036854775807"],
            &["r2", "A", "0", "0", "1", "1"],
        ]);
        let err = aggregator().aggregate(&table).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidCount { row: 1, column, value } if column == "1/23/20" && value == "1"
        ));
    }

    #[test]
    fn test_out_of_range_float_is_rejected() {
        let table = raw(&[&["", "A", "0", "0", "1", "1e300"]]);
        let err = aggregator().aggregate(&table).unwrap_err();
        assert!(matches!(err, Error::InvalidCount { value, .. } if value == "1e300"));

        assert_eq!(parse_count("9223372036854775808.0"), None);
        assert_eq!(parse_count("-1e19"), None);
        assert_eq!(parse_count("1e3"), Some(1000));
    }

    #[test]
    fn test_aggregate_all() {
        let table = raw(&[&["", "A", "0", "0", "1", "2"]]);
        let all = aggregator()
            .aggregate_all(&RawTables {
                confirmed: table.clone(),
                deaths: table.clone(),
                recovered: table,
            })
            .unwrap();
        assert_eq!(all.get(Metric::Recovered).get("A"), Some(&[1, 2][..]));
    }
}
