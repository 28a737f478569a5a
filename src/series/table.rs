//! @ai:module:intent Country-keyed time-series tables over a shared date axis
//! @ai:module:layer domain
//! @ai:module:public_api DateAxis, SeriesTable, SeriesValue, CountTable, DerivedTable, MaskTable
//! @ai:module:stateless true

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Cumulative integer counts per country.
pub type CountTable = SeriesTable<i64>;

/// Floating-point series where `None` marks an undefined cell.
pub type DerivedTable = SeriesTable<Option<f64>>;

/// Per-cell boolean condition, used to suppress ratio cells.
pub type MaskTable = SeriesTable<bool>;

/// @ai:intent Ordered, strictly increasing sequence of calendar dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DateAxis {
    dates: Vec<NaiveDate>,
}

impl DateAxis {
    /// @ai:intent Build an axis, rejecting any non-increasing step
    /// @ai:effects pure
    pub fn new(dates: Vec<NaiveDate>) -> Result<Self> {
        if let Some(pair) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(Error::UnorderedDates {
                date: pair[1].to_string(),
            });
        }
        Ok(Self { dates })
    }

    /// @ai:intent Parse column headers into an axis with a chrono format string
    /// @ai:effects pure
    pub fn parse<'a, I>(headers: I, format: &str) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let dates = headers
            .into_iter()
            .map(|header| {
                NaiveDate::parse_from_str(header.trim(), format).map_err(|_| Error::InvalidDate {
                    header: header.to_string(),
                    format: format.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(dates)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Last date of the snapshot, if any.
    pub fn latest(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// @ai:intent Numeric view of a table cell; `None` means undefined
pub trait SeriesValue {
    fn value(&self) -> Option<f64>;
}

impl SeriesValue for i64 {
    fn value(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl SeriesValue for Option<i64> {
    fn value(&self) -> Option<f64> {
        self.map(|v| v as f64)
    }
}

impl SeriesValue for Option<f64> {
    fn value(&self) -> Option<f64> {
        *self
    }
}

/// @ai:intent Mapping from country name to a sequence indexed by a date axis
/// @ai:invariant every row has exactly `axis.len()` values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesTable<V> {
    axis: DateAxis,
    rows: BTreeMap<String, Vec<V>>,
}

impl<V> SeriesTable<V> {
    /// @ai:intent Build a table, checking every row against the axis length
    /// @ai:effects pure
    pub fn new(axis: DateAxis, rows: BTreeMap<String, Vec<V>>) -> Result<Self> {
        if let Some((country, values)) = rows.iter().find(|(_, v)| v.len() != axis.len()) {
            return Err(Error::RowLength {
                country: country.clone(),
                expected: axis.len(),
                actual: values.len(),
            });
        }
        Ok(Self { axis, rows })
    }

    pub fn axis(&self) -> &DateAxis {
        &self.axis
    }

    pub fn get(&self, country: &str) -> Option<&[V]> {
        self.rows.get(country).map(Vec::as_slice)
    }

    pub fn contains(&self, country: &str) -> bool {
        self.rows.contains_key(country)
    }

    /// Countries in lexicographic order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[V])> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// @ai:intent Value on the last date of the axis for one country
    /// @ai:effects pure
    pub fn latest(&self, country: &str) -> Option<&V> {
        self.rows.get(country).and_then(|row| row.last())
    }

    /// @ai:intent Check that another table shares this axis and country key set
    /// @ai:effects pure
    pub fn ensure_aligned<W>(&self, other: &SeriesTable<W>) -> Result<()> {
        if self.axis != other.axis {
            return Err(Error::Misaligned(format!(
                "date axes differ ({} vs {} dates)",
                self.axis.len(),
                other.axis.len()
            )));
        }

        if let Some(country) = self.countries().find(|c| !other.contains(c)) {
            return Err(Error::Misaligned(format!(
                "country '{}' missing from one table",
                country
            )));
        }
        if let Some(country) = other.countries().find(|c| !self.contains(c)) {
            return Err(Error::Misaligned(format!(
                "country '{}' missing from one table",
                country
            )));
        }

        Ok(())
    }

    /// @ai:intent Build a new table by transforming each row as a whole
    /// @ai:pre `f` returns a row of the same length as its input
    /// @ai:effects pure
    pub fn map_rows<W, F>(&self, f: F) -> Result<SeriesTable<W>>
    where
        F: Fn(&[V]) -> Vec<W>,
    {
        let rows = self
            .rows
            .iter()
            .map(|(country, row)| (country.clone(), f(row)))
            .collect();
        SeriesTable::new(self.axis.clone(), rows)
    }

    /// @ai:intent Cell-wise transform into a new table
    /// @ai:effects pure
    pub fn map<W, F>(&self, f: F) -> SeriesTable<W>
    where
        F: Fn(&V) -> W,
    {
        SeriesTable {
            axis: self.axis.clone(),
            rows: self
                .rows
                .iter()
                .map(|(country, row)| (country.clone(), row.iter().map(&f).collect()))
                .collect(),
        }
    }

    /// @ai:intent Cell-wise combination of two aligned tables
    /// @ai:pre both tables share axis and country keys, else Error::Misaligned
    /// @ai:effects pure
    pub fn zip_with<W, U, F>(&self, other: &SeriesTable<W>, f: F) -> Result<SeriesTable<U>>
    where
        F: Fn(&V, &W) -> U,
    {
        self.ensure_aligned(other)?;

        let rows = self
            .rows
            .iter()
            .map(|(country, left)| {
                let right = &other.rows[country];
                let combined = left.iter().zip(right).map(|(a, b)| f(a, b)).collect();
                (country.clone(), combined)
            })
            .collect();

        SeriesTable::new(self.axis.clone(), rows)
    }
}

impl<V: SeriesValue> SeriesTable<V> {
    /// @ai:intent Latest-date numeric value for every country
    /// @ai:effects pure
    pub fn latest_values(&self) -> BTreeMap<String, Option<f64>> {
        self.rows
            .iter()
            .map(|(country, row)| (country.clone(), row.last().and_then(SeriesValue::value)))
            .collect()
    }
}

impl CountTable {
    /// @ai:intent Element-wise sum of two count tables (e.g. closed cases)
    /// @ai:post Error::CountOverflow when a cell sum does not fit in an i64
    /// @ai:effects pure
    pub fn add_table(&self, other: &CountTable) -> Result<CountTable> {
        let sums = self.zip_with(other, |a, b| a.checked_add(*b))?;

        for (country, row) in sums.iter() {
            if let Some(idx) = row.iter().position(Option::is_none) {
                return Err(Error::CountOverflow {
                    country: country.to_string(),
                    date: self.axis.dates[idx].to_string(),
                });
            }
        }

        Ok(sums.map(|v| v.unwrap_or_default()))
    }
}
