//! Scenario forecasting core for the fruit consumption dashboard.
//!
//! This crate provides the analytical engine behind the dashboard's Oracle
//! page: an on/off-aware scenario forecaster for daily series that are zero
//! on many days. The trend is fit on the non-zero subsequence only, and the
//! activity rate over the full history scales it into optimistic, realistic
//! and pessimistic planning scenarios.
//!
//! Data loading and rendering live with the dashboard; this crate operates
//! purely in memory on series the caller already loaded.

pub mod error;
pub mod scenario;
pub mod series;
pub mod stats;
pub mod trend;

// Re-exports for convenience
pub use error::{Result, ScenarioError};
pub use scenario::{
    forecast_scenarios, forecast_scenarios_default, ScenarioForecast, ScenarioOptions,
    MIN_ACTIVE_DAYS,
};
pub use series::{ActivityStats, HistoricalSeries};
pub use stats::{summarize, SeriesSummary};
pub use trend::{
    DampedEtsTrend, SeasonalNaiveTrend, TrendForecast, TrendModel, DAMPED_TREND_SPEC,
};
