//! @ai:module:intent Latest-date summary table, one row per country
//! @ai:module:layer application
//! @ai:module:public_api SummaryBuilder, SummaryTable, SummaryRow
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::series::{SeriesTable, SeriesValue};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// @ai:intent Latest values of one country, in column order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub country: String,
    pub values: Vec<Option<f64>>,
}

/// @ai:intent Sorted summary of the latest date of several tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub as_of: Option<NaiveDate>,
    pub columns: Vec<String>,
    pub primary: String,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// @ai:intent Look up one cell by country and column name
    /// @ai:effects pure
    pub fn value(&self, country: &str, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .find(|r| r.country == country)
            .and_then(|r| r.values[idx])
    }

    /// First `n` rows in sort order.
    pub fn head(&self, n: usize) -> &[SummaryRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

struct SummaryColumn {
    name: String,
    as_of: Option<NaiveDate>,
    values: BTreeMap<String, Option<f64>>,
}

/// @ai:intent Collects named tables and assembles the sorted summary
#[derive(Default)]
pub struct SummaryBuilder {
    columns: Vec<SummaryColumn>,
    primary: Option<String>,
}

impl SummaryBuilder {
    /// @ai:intent Create an empty builder
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Add a column holding the latest value of `table`
    /// @ai:effects pure
    pub fn column<V: SeriesValue>(mut self, name: impl Into<String>, table: &SeriesTable<V>) -> Self {
        self.columns.push(SummaryColumn {
            name: name.into(),
            as_of: table.axis().latest(),
            values: table.latest_values(),
        });
        self
    }

    /// Column to sort by, descending. Defaults to the first column.
    pub fn primary(mut self, name: impl Into<String>) -> Self {
        self.primary = Some(name.into());
        self
    }

    /// @ai:intent Assemble the table sorted descending by the primary column
    /// @ai:pre all columns share the same countries and latest date
    /// @ai:post undefined primary values trail every defined one; ties break on country name
    /// @ai:effects pure
    pub fn build(self) -> Result<SummaryTable> {
        let first = self.columns.first().ok_or_else(|| {
            Error::InvalidParameter("summary needs at least one column".to_string())
        })?;

        let primary = self.primary.clone().unwrap_or_else(|| first.name.clone());
        let primary_idx = self
            .columns
            .iter()
            .position(|c| c.name == primary)
            .ok_or_else(|| Error::MissingColumn {
                table: "summary".to_string(),
                column: primary.clone(),
            })?;

        for column in &self.columns[1..] {
            if column.as_of != first.as_of {
                return Err(Error::Misaligned(format!(
                    "column '{}' ends on {:?}, '{}' on {:?}",
                    column.name, column.as_of, first.name, first.as_of
                )));
            }
            if !column.values.keys().eq(first.values.keys()) {
                return Err(Error::Misaligned(format!(
                    "column '{}' and '{}' cover different countries",
                    column.name, first.name
                )));
            }
        }

        let mut rows: Vec<SummaryRow> = first
            .values
            .keys()
            .map(|country| SummaryRow {
                country: country.clone(),
                values: self.columns.iter().map(|c| c.values[country]).collect(),
            })
            .collect();

        rows.sort_by(|a, b| {
            descending_defined_first(a.values[primary_idx], b.values[primary_idx])
                .then_with(|| a.country.cmp(&b.country))
        });

        Ok(SummaryTable {
            as_of: first.as_of,
            columns: self.columns.iter().map(|c| c.name.clone()).collect(),
            primary,
            rows,
        })
    }
}

fn descending_defined_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{CountTable, DateAxis, DerivedTable};
    use pretty_assertions::assert_eq;

    fn axis(len: usize) -> DateAxis {
        DateAxis::new(
            (0..len)
                .map(|d| NaiveDate::from_ymd_opt(2020, 3, 10 + d as u32).unwrap())
                .collect(),
        )
        .unwrap()
    }

    fn counts(rows: &[(&str, &[i64])]) -> CountTable {
        let rows: BTreeMap<_, _> = rows
            .iter()
            .map(|(c, v)| (c.to_string(), v.to_vec()))
            .collect();
        SeriesTable::new(axis(2), rows).unwrap()
    }

    fn derived(rows: &[(&str, &[Option<f64>])]) -> DerivedTable {
        let rows: BTreeMap<_, _> = rows
            .iter()
            .map(|(c, v)| (c.to_string(), v.to_vec()))
            .collect();
        SeriesTable::new(axis(2), rows).unwrap()
    }

    #[test]
    fn test_sorted_descending_by_primary() {
        let confirmed = counts(&[("A", &[1, 50]), ("B", &[1, 900]), ("C", &[1, 300])]);
        let deaths = counts(&[("A", &[0, 1]), ("B", &[0, 9]), ("C", &[0, 3])]);

        let summary = SummaryBuilder::new()
            .column("confirmed", &confirmed)
            .column("deaths", &deaths)
            .primary("confirmed")
            .build()
            .unwrap();

        let order: Vec<_> = summary.rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
        assert_eq!(summary.value("C", "deaths"), Some(3.0));
        assert_eq!(summary.as_of, NaiveDate::from_ymd_opt(2020, 3, 11));
    }

    #[test]
    fn test_undefined_primary_trails() {
        let ratio = derived(&[
            ("A", &[None, None]),
            ("B", &[None, Some(0.02)]),
            ("C", &[None, Some(0.10)]),
            ("D", &[None, None]),
        ]);

        let summary = SummaryBuilder::new()
            .column("deaths/confirmed", &ratio)
            .build()
            .unwrap();

        let order: Vec<_> = summary.rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A", "D"]);

        let primary: Vec<_> = summary.rows.iter().map(|r| r.values[0]).collect();
        let defined: Vec<f64> = primary.iter().flatten().copied().collect();
        assert!(defined.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(primary.iter().filter(|v| v.is_some()).count(), 2);
        assert!(primary[..2].iter().all(Option::is_some));
        assert_eq!(summary.len(), 4);
    }

    #[test]
    fn test_unknown_primary_fails() {
        let confirmed = counts(&[("A", &[1, 2])]);
        let err = SummaryBuilder::new()
            .column("confirmed", &confirmed)
            .primary("active")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column, .. } if column == "active"));
    }

    #[test]
    fn test_mismatched_countries_fail() {
        let confirmed = counts(&[("A", &[1, 2])]);
        let deaths = counts(&[("B", &[1, 2])]);
        let err = SummaryBuilder::new()
            .column("confirmed", &confirmed)
            .column("deaths", &deaths)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Misaligned(_)));
    }

    #[test]
    fn test_head_is_clamped() {
        let confirmed = counts(&[("A", &[1, 2]), ("B", &[1, 3])]);
        let summary = SummaryBuilder::new()
            .column("confirmed", &confirmed)
            .build()
            .unwrap();
        assert_eq!(summary.head(10).len(), 2);
        assert_eq!(summary.head(1)[0].country, "B");
    }
}
