//! Trend forecasting: the external-model capability and its output.
//!
//! The scenario engine only couples to a trend model through the narrow
//! [`TrendModel`] fit/predict contract, so any conforming model can be
//! substituted (the tests use deterministic stubs). The default production
//! model wraps the anofox-forecast ETS family.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use anofox_forecast::core::TimeSeriesBuilder;
use anofox_forecast::models::exponential::{ETSSpec, ETS as EtsModel};
use anofox_forecast::prelude::Forecaster;

use crate::error::{Result, ScenarioError};

/// ETS notation for the default trend model: additive error, additive
/// damped trend, no seasonal component. Damping keeps the extrapolated
/// trend conservative, which matters on the sparse non-zero subsequences
/// this crate trains on.
pub const DAMPED_TREND_SPEC: &str = "AAdN";

/// A trend forecast over a future horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendForecast {
    /// Horizon dates
    pub dates: Vec<NaiveDate>,
    /// Point forecasts
    pub point: Vec<f64>,
    /// Lower confidence bounds
    pub lower: Vec<f64>,
    /// Upper confidence bounds
    pub upper: Vec<f64>,
}

impl TrendForecast {
    /// Number of horizon steps.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the horizon is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Clamp every point estimate and bound to >= 0.
    ///
    /// Negative forecasts are meaningless for counts and consumption, so
    /// this runs as a post-processing step on the model's raw output.
    pub fn clip_non_negative(&mut self) {
        for v in self
            .point
            .iter_mut()
            .chain(self.lower.iter_mut())
            .chain(self.upper.iter_mut())
        {
            if *v < 0.0 {
                *v = 0.0;
            }
        }
    }
}

/// Continuous-time trend forecasting capability.
///
/// `fit` is called once per request with the training subsequence, then
/// `predict` once with the horizon dates. Implementations are request-scoped
/// and carry no state between requests.
pub trait TrendModel {
    /// Model name, for reporting.
    fn name(&self) -> &'static str;

    /// Fit on the training points.
    fn fit(&mut self, dates: &[NaiveDate], values: &[f64]) -> Result<()>;

    /// Produce a forecast for the given future dates. Must be called after
    /// a successful `fit`.
    fn predict(&mut self, future_dates: &[NaiveDate]) -> Result<TrendForecast>;
}

/// Default production model: anofox-forecast ETS with a damped additive
/// trend (`AAdN`).
///
/// Model-internal failures are opaque to this crate; they surface as
/// [`ScenarioError::ForecastUnavailable`] with the model's message verbatim.
pub struct DampedEtsTrend {
    spec: ETSSpec,
    confidence_level: f64,
    model: Option<EtsModel>,
    sigma: f64,
}

impl DampedEtsTrend {
    /// Create an unfitted model producing bounds at the given confidence
    /// level (0-1 exclusive).
    pub fn new(confidence_level: f64) -> Result<Self> {
        let spec = ETSSpec::from_notation(DAMPED_TREND_SPEC).map_err(|e| {
            ScenarioError::ForecastUnavailable(format!(
                "invalid ETS specification '{}': {}",
                DAMPED_TREND_SPEC, e
            ))
        })?;

        Ok(Self {
            spec,
            confidence_level,
            model: None,
            sigma: 0.0,
        })
    }
}

impl TrendModel for DampedEtsTrend {
    fn name(&self) -> &'static str {
        "ETS(AAdN)"
    }

    fn fit(&mut self, _dates: &[NaiveDate], values: &[f64]) -> Result<()> {
        if values.is_empty() {
            return Err(ScenarioError::InvalidInput(
                "cannot fit on an empty training series".into(),
            ));
        }

        debug!(n_obs = values.len(), "fitting damped ETS trend");

        let time_series = TimeSeriesBuilder::new()
            .values(values.to_vec())
            .build()
            .map_err(|e| {
                ScenarioError::ForecastUnavailable(format!("failed to build time series: {}", e))
            })?;

        // AAdN has no seasonal component
        let mut model = EtsModel::new(self.spec, 1);
        model
            .fit(&time_series)
            .map_err(|e| ScenarioError::ForecastUnavailable(format!("ETS fit failed: {}", e)))?;

        let fitted = model.fitted_values().map(|v| v.to_vec());
        self.sigma = residual_sigma(values, fitted.as_deref());
        self.model = Some(model);
        Ok(())
    }

    fn predict(&mut self, future_dates: &[NaiveDate]) -> Result<TrendForecast> {
        let model = self
            .model
            .as_mut()
            .ok_or_else(|| ScenarioError::InvalidInput("predict called before fit".into()))?;

        let horizon = future_dates.len();
        let forecast = model
            .predict(horizon)
            .map_err(|e| ScenarioError::ForecastUnavailable(format!("ETS predict failed: {}", e)))?;

        // Univariate series: take the first dimension
        let point = forecast.point().first().cloned().unwrap_or_default();
        if point.len() != horizon {
            return Err(ScenarioError::ForecastUnavailable(format!(
                "model returned {} points for horizon {}",
                point.len(),
                horizon
            )));
        }

        let z = normal_quantile(self.confidence_level)?;
        let (lower, upper) = confidence_bounds(&point, self.sigma, z);

        Ok(TrendForecast {
            dates: future_dates.to_vec(),
            point,
            lower,
            upper,
        })
    }
}

/// Baseline model repeating the last observed cycle.
///
/// Without a season length it repeats the whole training series. Cheap and
/// fully deterministic; useful as a substitute where the ETS machinery is
/// unwanted.
pub struct SeasonalNaiveTrend {
    season_length: Option<usize>,
    confidence_level: f64,
    last_cycle: Vec<f64>,
    sigma: f64,
}

impl SeasonalNaiveTrend {
    /// Create an unfitted baseline. `season_length` of `None` repeats the
    /// full training series.
    pub fn new(season_length: Option<usize>, confidence_level: f64) -> Self {
        Self {
            season_length,
            confidence_level,
            last_cycle: Vec::new(),
            sigma: 0.0,
        }
    }
}

impl TrendModel for SeasonalNaiveTrend {
    fn name(&self) -> &'static str {
        "SeasonalNaive"
    }

    fn fit(&mut self, _dates: &[NaiveDate], values: &[f64]) -> Result<()> {
        if values.is_empty() {
            return Err(ScenarioError::InvalidInput(
                "cannot fit on an empty training series".into(),
            ));
        }

        let n = values.len();
        let period = self.season_length.unwrap_or(n).clamp(1, n);

        debug!(period = period, n_obs = n, "fitting seasonal naive trend");

        self.last_cycle = values[n - period..].to_vec();
        self.sigma = residual_sigma(values, None);
        Ok(())
    }

    fn predict(&mut self, future_dates: &[NaiveDate]) -> Result<TrendForecast> {
        if self.last_cycle.is_empty() {
            return Err(ScenarioError::InvalidInput("predict called before fit".into()));
        }

        let point: Vec<f64> = (0..future_dates.len())
            .map(|i| self.last_cycle[i % self.last_cycle.len()])
            .collect();

        let z = normal_quantile(self.confidence_level)?;
        let (lower, upper) = confidence_bounds(&point, self.sigma, z);

        Ok(TrendForecast {
            dates: future_dates.to_vec(),
            point,
            lower,
            upper,
        })
    }
}

/// Two-sided normal quantile for a confidence level in (0, 1).
fn normal_quantile(confidence_level: f64) -> Result<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(ScenarioError::InvalidInput(format!(
            "confidence level must be in (0, 1), got {}",
            confidence_level
        )));
    }

    let normal = Normal::new(0.0, 1.0).map_err(|e| {
        ScenarioError::InvalidInput(format!("failed to build normal distribution: {}", e))
    })?;

    Ok(normal.inverse_cdf(0.5 + confidence_level / 2.0))
}

/// Confidence bounds around point forecasts, widening with the horizon.
fn confidence_bounds(point: &[f64], sigma: f64, z: f64) -> (Vec<f64>, Vec<f64>) {
    let lower = point
        .iter()
        .enumerate()
        .map(|(i, &f)| f - z * sigma * ((i + 1) as f64).sqrt())
        .collect();

    let upper = point
        .iter()
        .enumerate()
        .map(|(i, &f)| f + z * sigma * ((i + 1) as f64).sqrt())
        .collect();

    (lower, upper)
}

/// In-sample residual standard deviation; falls back to the standard
/// deviation of the training values when no fitted values are available.
fn residual_sigma(values: &[f64], fitted: Option<&[f64]>) -> f64 {
    match fitted {
        Some(f) if f.len() == values.len() && !f.is_empty() => {
            let sse: f64 = values
                .iter()
                .zip(f.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();
            (sse / values.len() as f64).sqrt()
        }
        _ => {
            let n = values.len();
            if n == 0 {
                return 0.0;
            }
            let mean = values.iter().sum::<f64>() / n as f64;
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64).sqrt()
        }
    }
}
