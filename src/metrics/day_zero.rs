//! @ai:module:intent Re-index country series on days since a threshold crossing
//! @ai:module:layer domain
//! @ai:module:public_api DayZeroTable, realign_day_zero
//! @ai:module:stateless true

use crate::series::CountTable;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// @ai:intent Country series on a signed offset axis, offset 0 = first day at threshold
/// @ai:invariant every row has exactly `offsets.len()` cells; offsets are contiguous
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayZeroTable {
    threshold: i64,
    lookback: usize,
    offsets: Vec<i64>,
    crossings: BTreeMap<String, NaiveDate>,
    rows: BTreeMap<String, Vec<Option<i64>>>,
}

impl DayZeroTable {
    fn empty(threshold: i64, lookback: usize) -> Self {
        Self {
            threshold,
            lookback,
            offsets: Vec::new(),
            crossings: BTreeMap::new(),
            rows: BTreeMap::new(),
        }
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Column domain, ascending.
    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    pub fn get(&self, country: &str) -> Option<&[Option<i64>]> {
        self.rows.get(country).map(Vec::as_slice)
    }

    /// Calendar date of a country's offset 0.
    pub fn crossing(&self, country: &str) -> Option<NaiveDate> {
        self.crossings.get(country).copied()
    }

    /// @ai:intent Cell lookup by offset rather than column position
    /// @ai:effects pure
    pub fn value_at(&self, country: &str, offset: i64) -> Option<i64> {
        let first = *self.offsets.first()?;
        let idx = usize::try_from(offset - first).ok()?;
        self.rows.get(country)?.get(idx).copied().flatten()
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<i64>])> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// @ai:intent Align every country on the first date its count reaches `threshold`
/// @ai:post countries that never reach the threshold are absent; value at
///          offset 0 equals the raw value on the crossing date; the domain
///          starts no earlier than `-lookback`
/// @ai:effects pure
pub fn realign_day_zero(table: &CountTable, threshold: i64, lookback: usize) -> DayZeroTable {
    let n = table.axis().len();

    let crossed: Vec<(&str, usize, &[i64])> = table
        .iter()
        .filter_map(|(country, row)| {
            row.iter()
                .position(|&v| v >= threshold)
                .map(|k| (country, k, row))
        })
        .collect();

    if crossed.is_empty() {
        tracing::debug!(threshold, "no country reaches the day-zero threshold");
        return DayZeroTable::empty(threshold, lookback);
    }

    let max_k = crossed.iter().map(|&(_, k, _)| k).max().unwrap_or(0);
    let first = -(max_k.min(lookback) as i64);
    let last = crossed
        .iter()
        .map(|&(_, k, _)| (n - 1 - k) as i64)
        .max()
        .unwrap_or(0);
    let offsets: Vec<i64> = (first..=last).collect();

    let mut crossings = BTreeMap::new();
    let mut rows = BTreeMap::new();
    for (country, k, row) in crossed {
        let realigned = offsets
            .iter()
            .map(|&offset| {
                let idx = k as i64 + offset;
                usize::try_from(idx).ok().and_then(|i| row.get(i).copied())
            })
            .collect();

        crossings.insert(country.to_string(), table.axis().dates()[k]);
        rows.insert(country.to_string(), realigned);
    }

    DayZeroTable {
        threshold,
        lookback,
        offsets,
        crossings,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{DateAxis, SeriesTable};
    use pretty_assertions::assert_eq;

    fn counts(rows: &[(&str, &[i64])]) -> CountTable {
        let len = rows[0].1.len();
        let axis = DateAxis::new(
            (0..len)
                .map(|d| NaiveDate::from_ymd_opt(2020, 1, 1 + d as u32).unwrap())
                .collect(),
        )
        .unwrap();
        let rows: BTreeMap<_, _> = rows
            .iter()
            .map(|(c, v)| (c.to_string(), v.to_vec()))
            .collect();
        SeriesTable::new(axis, rows).unwrap()
    }

    #[test]
    fn test_offset_zero_is_crossing_value() {
        let t = counts(&[
            ("A", &[0, 50, 120, 300, 800]),
            ("B", &[100, 200, 400, 800, 1600]),
        ]);
        let z = realign_day_zero(&t, 100, 10);

        assert_eq!(z.value_at("A", 0), Some(120));
        assert_eq!(z.value_at("B", 0), Some(100));
        assert_eq!(z.crossing("A"), NaiveDate::from_ymd_opt(2020, 1, 3));
        assert_eq!(z.offsets(), &[-2, -1, 0, 1, 2, 3, 4]);
        assert_eq!(
            z.get("A"),
            Some(&[Some(0), Some(50), Some(120), Some(300), Some(800), None, None][..])
        );
        assert_eq!(
            z.get("B"),
            Some(&[None, None, Some(100), Some(200), Some(400), Some(800), Some(1600)][..])
        );
    }

    #[test]
    fn test_countries_below_threshold_excluded() {
        let t = counts(&[("A", &[1, 2, 99]), ("B", &[50, 100, 150])]);
        let z = realign_day_zero(&t, 100, 10);

        assert_eq!(z.len(), 1);
        assert!(z.get("A").is_none());
        assert_eq!(z.countries().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn test_lookback_truncates_left() {
        let t = counts(&[("A", &[0, 0, 0, 0, 0, 0, 5, 9])]);
        let z = realign_day_zero(&t, 5, 2);

        assert_eq!(z.offsets(), &[-2, -1, 0, 1]);
        assert_eq!(z.get("A"), Some(&[Some(0), Some(0), Some(5), Some(9)][..]));
        assert_eq!(z.value_at("A", -3), None);
    }

    #[test]
    fn test_no_crossing_yields_empty_table() {
        let t = counts(&[("A", &[1, 2]), ("B", &[3, 4])]);
        let z = realign_day_zero(&t, 1000, 10);

        assert!(z.is_empty());
        assert!(z.offsets().is_empty());
        assert_eq!(z.value_at("A", 0), None);
    }
}
