//! @ai:module:intent Derived metrics over country series tables
//! @ai:module:layer application
//! @ai:module:public_api ratio, daily_increase, exponential_smoothing, realign_day_zero, MetricsEngine, Analysis

pub mod daily;
pub mod day_zero;
pub mod engine;
pub mod ratio;
pub mod smoothing;
pub mod types;

pub use daily::daily_increase;
pub use day_zero::{realign_day_zero, DayZeroTable};
pub use engine::{MetricsEngine, MetricsEngineTrait};
pub use ratio::ratio;
pub use smoothing::{exponential_smoothing, SmoothedSeries};
pub use types::Analysis;
