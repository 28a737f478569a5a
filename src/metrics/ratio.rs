//! @ai:module:intent Masked element-wise ratio of two aligned tables
//! @ai:module:layer domain
//! @ai:module:public_api ratio
//! @ai:module:stateless true

use crate::error::Result;
use crate::series::{DerivedTable, MaskTable, SeriesTable, SeriesValue};

/// @ai:intent Element-wise `numerator / denominator`
/// @ai:pre all tables share axis and country keys, else Error::Misaligned
/// @ai:post a cell is undefined where the denominator is 0, an operand is
///          undefined, or the mask is false; otherwise it is the exact quotient
/// @ai:effects pure
pub fn ratio<N, D>(
    numerator: &SeriesTable<N>,
    denominator: &SeriesTable<D>,
    mask: Option<&MaskTable>,
) -> Result<DerivedTable>
where
    N: SeriesValue,
    D: SeriesValue,
{
    let quotient = numerator.zip_with(denominator, |n, d| match (n.value(), d.value()) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    })?;

    match mask {
        Some(mask) => quotient.zip_with(mask, |q, &keep| if keep { *q } else { None }),
        None => Ok(quotient),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::series::{CountTable, DateAxis};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn counts(rows: &[(&str, &[i64])]) -> CountTable {
        let len = rows[0].1.len();
        let axis = DateAxis::new(
            (0..len)
                .map(|d| NaiveDate::from_ymd_opt(2020, 3, 1 + d as u32).unwrap())
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
    fn test_exact_quotient() {
        let deaths = counts(&[("A", &[1, 3, 10])]);
        let confirmed = counts(&[("A", &[4, 4, 40])]);

        let r = ratio(&deaths, &confirmed, None).unwrap();
        assert_eq!(r.get("A"), Some(&[Some(0.25), Some(0.75), Some(0.25)][..]));
    }

    #[test]
    fn test_division_by_zero_is_undefined() {
        let deaths = counts(&[("A", &[0, 0, 2])]);
        let confirmed = counts(&[("A", &[0, 5, 0])]);

        let r = ratio(&deaths, &confirmed, None).unwrap();
        assert_eq!(r.get("A"), Some(&[None, Some(0.0), None][..]));
    }

    #[test]
    fn test_mask_suppresses_cells() {
        let deaths = counts(&[("A", &[50, 101, 200]), ("B", &[1, 2, 3])]);
        let confirmed = counts(&[("A", &[1000, 1010, 1000]), ("B", &[10, 20, 30])]);
        let mask = deaths.map(|&d| d > 100);

        let r = ratio(&deaths, &confirmed, Some(&mask)).unwrap();
        assert_eq!(r.get("A"), Some(&[None, Some(0.1), Some(0.2)][..]));
        assert_eq!(r.get("B"), Some(&[None, None, None][..]));
    }

    #[test]
    fn test_derived_operands() {
        let deaths = counts(&[("A", &[2, 4])]);
        let closed = counts(&[("A", &[4, 8])]).map(|&v| if v > 4 { Some(v as f64) } else { None });

        let r = ratio(&deaths, &closed, None).unwrap();
        assert_eq!(r.get("A"), Some(&[None, Some(0.5)][..]));
    }

    #[test]
    fn test_misaligned_inputs_fail() {
        let deaths = counts(&[("A", &[1, 2])]);
        let confirmed = counts(&[("A", &[1, 2]), ("B", &[1, 2])]);

        assert!(matches!(
            ratio(&deaths, &confirmed, None),
            Err(Error::Misaligned(_))
        ));
    }
}
