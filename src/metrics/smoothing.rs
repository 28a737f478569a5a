//! @ai:module:intent Exponentially weighted average with bias correction
//! @ai:module:layer domain
//! @ai:module:public_api SmoothedSeries, exponential_smoothing
//! @ai:module:stateless true
//!
//! The average starts at 0, which underweights early samples. Dividing by
//! `1 - β^t` removes that startup transient but amplifies early noise, and
//! the smoothed curve lags the raw one by roughly `1 / (1 - β)` days.

use crate::error::{Error, Result};
use crate::series::DerivedTable;
use serde::Serialize;

/// @ai:intent Raw and bias-corrected exponential averages of one input table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedSeries {
    pub beta: f64,
    pub raw: DerivedTable,
    pub bias_corrected: DerivedTable,
}

/// @ai:intent Smooth a daily-increase table with factor `beta`
/// @ai:pre 0 < beta < 1, else Error::InvalidParameter
/// @ai:post both outputs are exactly 0 at t = 0; once an input cell is
///          undefined the average stays undefined for the rest of the row
/// @ai:effects pure
pub fn exponential_smoothing(daily: &DerivedTable, beta: f64) -> Result<SmoothedSeries> {
    if !(beta > 0.0 && beta < 1.0) {
        return Err(Error::InvalidParameter(format!(
            "smoothing factor must be in (0, 1), got {}",
            beta
        )));
    }

    let raw = daily.map_rows(|row| smooth_row(row, beta))?;
    let bias_corrected = raw.map_rows(|row| correct_row(row, beta))?;

    Ok(SmoothedSeries {
        beta,
        raw,
        bias_corrected,
    })
}

fn smooth_row(row: &[Option<f64>], beta: f64) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(row.len());
    let mut state = Some(0.0);

    for (t, value) in row.iter().enumerate() {
        if t > 0 {
            state = match (state, value) {
                (Some(prev), Some(x)) => Some(beta * prev + (1.0 - beta) * x),
                _ => None,
            };
        }
        out.push(state);
    }
    out
}

fn correct_row(row: &[Option<f64>], beta: f64) -> Vec<Option<f64>> {
    row.iter()
        .enumerate()
        .map(|(t, value)| {
            // t = 0 would divide by 1 - β^0 = 0
            if t == 0 {
                return Some(0.0);
            }
            value.map(|v| v / (1.0 - beta.powi(t as i32)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{DateAxis, SeriesTable};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn derived(rows: &[(&str, &[Option<f64>])]) -> DerivedTable {
        let len = rows[0].1.len();
        let axis = DateAxis::new(
            (0..len)
                .map(|d| NaiveDate::from_ymd_opt(2020, 4, 1 + d as u32).unwrap())
                .collect(),
        )
        .unwrap();
        let rows: BTreeMap<_, _> = rows
            .iter()
            .map(|(c, v)| (c.to_string(), v.to_vec()))
            .collect();
        SeriesTable::new(axis, rows).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_recurrence_and_correction() {
        let daily = derived(&[("A", &[None, Some(10.0), Some(20.0)])]);
        let s = exponential_smoothing(&daily, 0.5).unwrap();

        let raw = s.raw.get("A").unwrap();
        assert_eq!(raw[0], Some(0.0));
        assert!(close(raw[1].unwrap(), 5.0));
        assert!(close(raw[2].unwrap(), 12.5));

        let corrected = s.bias_corrected.get("A").unwrap();
        assert_eq!(corrected[0], Some(0.0));
        assert!(close(corrected[1].unwrap(), 10.0));
        assert!(close(corrected[2].unwrap(), 12.5 / 0.75));
    }

    #[test]
    fn test_first_sample_is_literal_zero() {
        let daily = derived(&[("A", &[Some(1e6), Some(3.0)]), ("B", &[None, None])]);
        let s = exponential_smoothing(&daily, 0.9).unwrap();

        for (_, row) in s.bias_corrected.iter() {
            assert_eq!(row[0], Some(0.0));
        }
    }

    #[test]
    fn test_tiny_beta_tracks_input() {
        let input = [None, Some(3.0), Some(7.0), Some(0.0), Some(42.0)];
        let daily = derived(&[("A", &input)]);
        let s = exponential_smoothing(&daily, 1e-12).unwrap();

        let corrected = s.bias_corrected.get("A").unwrap();
        for t in 1..input.len() {
            assert!(close(corrected[t].unwrap(), input[t].unwrap()));
        }
    }

    #[test]
    fn test_constant_input_is_unbiased() {
        let daily = derived(&[("A", &[None, Some(8.0), Some(8.0), Some(8.0), Some(8.0)])]);
        let s = exponential_smoothing(&daily, 0.9).unwrap();

        let corrected = s.bias_corrected.get("A").unwrap();
        for value in &corrected[1..] {
            assert!(close(value.unwrap(), 8.0));
        }
    }

    #[test]
    fn test_undefined_input_propagates() {
        let daily = derived(&[("A", &[None, Some(1.0), None, Some(5.0)])]);
        let s = exponential_smoothing(&daily, 0.8).unwrap();
        let raw = s.raw.get("A").unwrap();
        assert!(raw[1].is_some());
        assert_eq!(raw[2], None);
        assert_eq!(raw[3], None);
    }

    #[test]
    fn test_beta_bounds() {
        let daily = derived(&[("A", &[None, Some(1.0)])]);
        for beta in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                exponential_smoothing(&daily, beta),
                Err(Error::InvalidParameter(_))
            ));
        }
    }
}
