//! @ai:module:intent Result types of a full metrics computation
//! @ai:module:layer domain
//! @ai:module:public_api Analysis, column names
//! @ai:module:stateless true

use crate::config::{AnalysisConfig, CountrySelection};
use crate::error::Result;
use crate::metrics::day_zero::DayZeroTable;
use crate::metrics::smoothing::SmoothedSeries;
use crate::series::{CountTable, DerivedTable};
use crate::summary::{SummaryBuilder, SummaryTable};
use serde::Serialize;
use std::collections::BTreeSet;

pub const CONFIRMED: &str = "confirmed";
pub const DEATHS: &str = "deaths";
pub const RECOVERED: &str = "recovered";
pub const DEATHS_OVER_CONFIRMED: &str = "deaths/confirmed";
pub const DEATHS_OVER_CLOSED: &str = "deaths/(deaths+recovered)";

/// @ai:intent Every table derived from one snapshot, computed once and read-only
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub config: AnalysisConfig,
    pub confirmed: CountTable,
    pub deaths: CountTable,
    pub recovered: CountTable,
    /// Masked where total deaths do not exceed `config.ratio_min_deaths`.
    pub deaths_over_confirmed: DerivedTable,
    /// Closed cases = deaths + recovered; same mask as above.
    pub deaths_over_closed: DerivedTable,
    pub confirmed_daily: DerivedTable,
    pub deaths_daily: DerivedTable,
    pub recovered_daily: DerivedTable,
    pub confirmed_daily_smoothed: SmoothedSeries,
    pub confirmed_day_zero: DayZeroTable,
    pub deaths_day_zero: DayZeroTable,
}

impl Analysis {
    /// @ai:intent Latest-date summary: counts and ratios, sorted by confirmed
    /// @ai:effects pure
    pub fn summary(&self) -> Result<SummaryTable> {
        SummaryBuilder::new()
            .column(CONFIRMED, &self.confirmed)
            .column(DEATHS, &self.deaths)
            .column(RECOVERED, &self.recovered)
            .column(DEATHS_OVER_CONFIRMED, &self.deaths_over_confirmed)
            .column(DEATHS_OVER_CLOSED, &self.deaths_over_closed)
            .primary(CONFIRMED)
            .build()
    }

    /// @ai:intent Countries to chart: the explicit list, or the top N by latest confirmed
    /// @ai:post no duplicates; an explicit list keeps its first-occurrence order
    /// @ai:effects pure
    pub fn select_countries(&self, selection: &CountrySelection) -> Vec<String> {
        if let Some(names) = &selection.countries {
            let mut seen = BTreeSet::new();
            return names
                .iter()
                .filter(|name| {
                    let known = self.confirmed.contains(name);
                    if !known {
                        tracing::warn!("Country '{}' not found in data; skipping", name);
                    }
                    known && seen.insert(name.as_str())
                })
                .cloned()
                .collect();
        }

        let mut ranked: Vec<(&str, i64)> = self
            .confirmed
            .iter()
            .filter_map(|(country, row)| row.last().map(|&v| (country, v)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        ranked
            .into_iter()
            .take(selection.top_n)
            .map(|(country, _)| country.to_string())
            .collect()
    }
}
