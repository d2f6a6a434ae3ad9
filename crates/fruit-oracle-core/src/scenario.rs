//! Scenario forecasting engine.
//!
//! Turns a continuous trend forecast into three business scenarios for
//! on/off daily series. The trend model only ever sees the non-zero
//! subsequence; the activity rate over the full series (zeros included)
//! then scales the trend down to the expected value under the historical
//! on/off mix.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScenarioError};
use crate::series::{ActivityStats, HistoricalSeries};
use crate::trend::{DampedEtsTrend, TrendModel};

/// Minimum number of non-zero observations required to fit a trend.
pub const MIN_ACTIVE_DAYS: usize = 10;

/// Scenario forecast options.
#[derive(Debug, Clone)]
pub struct ScenarioOptions {
    /// Forecast horizon in days
    pub horizon_days: usize,
    /// Minimum non-zero observations required before fitting
    pub min_active_days: usize,
    /// Confidence level for the trend uncertainty band (0-1)
    pub confidence_level: f64,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            min_active_days: MIN_ACTIVE_DAYS,
            confidence_level: 0.95,
        }
    }
}

/// Scenario forecast for one entity: three aligned series plus summary
/// figures. Constructed fresh per request and returned by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioForecast {
    /// Entity the forecast belongs to
    pub entity: String,
    /// Name of the trend model used
    pub model: String,
    /// Horizon dates, consecutive days after the last observation
    pub dates: Vec<NaiveDate>,
    /// Trend point forecast: the entity stays active every day
    pub optimistic: Vec<f64>,
    /// Expected value under the historical on/off mix
    pub realistic: Vec<f64>,
    /// Conservative framing of the realistic scenario
    pub pessimistic: Vec<f64>,
    /// Lower trend bound, clipped to >= 0
    pub lower: Vec<f64>,
    /// Upper trend bound, clipped to >= 0
    pub upper: Vec<f64>,
    /// Mean of the optimistic series over the horizon
    pub optimistic_mean: f64,
    /// Mean of the realistic series over the horizon
    pub realistic_mean: f64,
    /// Mean of the pessimistic series over the horizon
    pub pessimistic_mean: f64,
    /// Fraction of historical days with a non-zero value
    pub activity_rate: f64,
    /// Underlying activity counts
    pub activity: ActivityStats,
}

/// Forecast three scenarios for one entity's series with the given trend
/// model.
///
/// A pure, request-scoped transform: one call reads one series and produces
/// one result, with no shared state and no caching. Failures are total;
/// there is no partial scenario output.
///
/// The activity rate and the realistic/pessimistic derivation are exactly
/// reproducible for a fixed series and horizon. The optimistic series is
/// reproducible only if the trend model itself is deterministic.
pub fn forecast_scenarios(
    series: &HistoricalSeries,
    model: &mut dyn TrendModel,
    options: &ScenarioOptions,
) -> Result<ScenarioForecast> {
    if options.horizon_days == 0 {
        return Err(ScenarioError::InvalidInput(
            "horizon must be at least 1 day".into(),
        ));
    }

    // Activity rate over the FULL series; zeros stay in the denominator.
    let activity = series.activity();

    if activity.active_days == 0 {
        return Err(ScenarioError::AllZero {
            total_days: activity.total_days,
        });
    }
    if activity.active_days < options.min_active_days {
        return Err(ScenarioError::InsufficientData {
            needed: options.min_active_days,
            got: activity.active_days,
        });
    }

    let activity_rate = activity.rate();

    debug!(
        entity = series.entity(),
        total_days = activity.total_days,
        active_days = activity.active_days,
        horizon = options.horizon_days,
        "forecasting scenarios"
    );

    // Train on the non-zero subsequence only.
    let (train_dates, train_values) = series.active_points();
    model.fit(&train_dates, &train_values)?;

    let last_date = series
        .last_date()
        .ok_or_else(|| ScenarioError::InvalidSeries("series has no observations".into()))?;
    let future_dates: Vec<NaiveDate> = (1..=options.horizon_days as i64)
        .map(|offset| last_date + Duration::days(offset))
        .collect();

    let mut trend = model.predict(&future_dates)?;
    trend.clip_non_negative();

    let optimistic = trend.point;
    let realistic: Vec<f64> = optimistic.iter().map(|v| v * activity_rate).collect();
    // Intentionally the same series as realistic: pessimistic is a
    // conservative business label over the trend, not a distinct estimate.
    let pessimistic = realistic.clone();

    let optimistic_mean = mean(&optimistic);
    let realistic_mean = mean(&realistic);
    let pessimistic_mean = mean(&pessimistic);

    Ok(ScenarioForecast {
        entity: series.entity().to_string(),
        model: model.name().to_string(),
        dates: trend.dates,
        optimistic,
        realistic,
        pessimistic,
        lower: trend.lower,
        upper: trend.upper,
        optimistic_mean,
        realistic_mean,
        pessimistic_mean,
        activity_rate,
        activity,
    })
}

/// Forecast three scenarios with the default damped-ETS trend model.
pub fn forecast_scenarios_default(
    series: &HistoricalSeries,
    options: &ScenarioOptions,
) -> Result<ScenarioForecast> {
    let mut model = DampedEtsTrend::new(options.confidence_level)?;
    forecast_scenarios(series, &mut model, options)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
