//! @ai:module:intent Day-over-day differencing of cumulative series
//! @ai:module:layer domain
//! @ai:module:public_api daily_increase
//! @ai:module:stateless true

use crate::error::Result;
use crate::series::{DerivedTable, SeriesTable, SeriesValue};

/// @ai:intent `output[t] = input[t] - input[t-1]` for every country
/// @ai:post the first date is undefined; a cell is undefined if either operand is
/// @ai:effects pure
pub fn daily_increase<V: SeriesValue>(table: &SeriesTable<V>) -> Result<DerivedTable> {
    table.map_rows(|row| {
        let mut out = Vec::with_capacity(row.len());
        if !row.is_empty() {
            out.push(None);
        }
        out.extend(row.windows(2).map(|w| match (w[0].value(), w[1].value()) {
            (Some(prev), Some(cur)) => Some(cur - prev),
            _ => None,
        }));
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{CountTable, DateAxis};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn counts(rows: &[(&str, &[i64])]) -> CountTable {
        let len = rows[0].1.len();
        let axis = DateAxis::new(
            (0..len)
                .map(|d| NaiveDate::from_ymd_opt(2020, 2, 1 + d as u32).unwrap())
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
    fn test_first_date_undefined() {
        let t = counts(&[("A", &[4, 6]), ("B", &[10, 20])]);
        let d = daily_increase(&t).unwrap();
        assert_eq!(d.get("A"), Some(&[None, Some(2.0)][..]));
        assert_eq!(d.get("B"), Some(&[None, Some(10.0)][..]));
    }

    #[test]
    fn test_cumulative_sum_reconstructs_series() {
        let t = counts(&[("A", &[3, 3, 8, 20, 21, 40]), ("B", &[0, 1, 1, 1, 9, 9])]);
        let d = daily_increase(&t).unwrap();

        for (country, original) in t.iter() {
            let increases = d.get(country).unwrap();
            let mut running = 0.0;
            for (t_idx, inc) in increases.iter().enumerate().skip(1) {
                running += inc.unwrap();
                assert_eq!(running, (original[t_idx] - original[0]) as f64);
            }
        }
    }

    #[test]
    fn test_undefined_operands_propagate() {
        let t = counts(&[("A", &[1, 5, 7, 12])]).map(|&v| if v == 7 { None } else { Some(v as f64) });
        let d = daily_increase(&t).unwrap();
        assert_eq!(d.get("A"), Some(&[None, Some(4.0), None, None][..]));
    }

    #[test]
    fn test_negative_corrections_kept() {
        let t = counts(&[("A", &[10, 8])]);
        let d = daily_increase(&t).unwrap();
        assert_eq!(d.get("A"), Some(&[None, Some(-2.0)][..]));
    }
}
