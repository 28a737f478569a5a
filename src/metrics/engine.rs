//! @ai:module:intent Compute every derived table from the per-country counts
//! @ai:module:layer application
//! @ai:module:public_api MetricsEngine, MetricsEngineTrait
//! @ai:module:stateless true

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::metrics::daily::daily_increase;
use crate::metrics::day_zero::realign_day_zero;
use crate::metrics::ratio::ratio;
use crate::metrics::smoothing::exponential_smoothing;
use crate::metrics::types::Analysis;
use crate::series::CountryTables;

/// @ai:intent Trait for the metrics computation
pub trait MetricsEngineTrait {
    /// @ai:intent Derive ratios, deltas, smoothed deltas and day-zero tables
    fn compute(&self, tables: CountryTables) -> Result<Analysis>;
}

/// @ai:intent Runs the metric transforms with a fixed set of parameters
pub struct MetricsEngine {
    config: AnalysisConfig,
}

impl MetricsEngine {
    /// @ai:intent Create an engine for the given parameters
    /// @ai:effects pure
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl MetricsEngineTrait for MetricsEngine {
    /// @ai:pre the three tables share one date axis and one country set
    /// @ai:effects pure
    fn compute(&self, tables: CountryTables) -> Result<Analysis> {
        let CountryTables {
            confirmed,
            deaths,
            recovered,
        } = tables;
        let cfg = &self.config;

        let mask = deaths.map(|&d| d > cfg.ratio_min_deaths);
        let closed = deaths.add_table(&recovered)?;
        let deaths_over_confirmed = ratio(&deaths, &confirmed, Some(&mask))?;
        let deaths_over_closed = ratio(&deaths, &closed, Some(&mask))?;

        let confirmed_daily = daily_increase(&confirmed)?;
        let deaths_daily = daily_increase(&deaths)?;
        let recovered_daily = daily_increase(&recovered)?;

        let confirmed_daily_smoothed =
            exponential_smoothing(&confirmed_daily, cfg.smoothing_beta)?;

        let confirmed_day_zero = realign_day_zero(
            &confirmed,
            cfg.day_zero.confirmed_threshold,
            cfg.day_zero.lookback_days,
        );
        let deaths_day_zero = realign_day_zero(
            &deaths,
            cfg.day_zero.deaths_threshold,
            cfg.day_zero.lookback_days,
        );

        tracing::info!(
            countries = confirmed.len(),
            dates = confirmed.axis().len(),
            day_zero_confirmed = confirmed_day_zero.len(),
            day_zero_deaths = deaths_day_zero.len(),
            "computed derived metrics"
        );

        Ok(Analysis {
            config: cfg.clone(),
            confirmed,
            deaths,
            recovered,
            deaths_over_confirmed,
            deaths_over_closed,
            confirmed_daily,
            deaths_daily,
            recovered_daily,
            confirmed_daily_smoothed,
            confirmed_day_zero,
            deaths_day_zero,
        })
    }
}
