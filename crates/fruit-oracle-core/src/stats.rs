//! Per-entity summary statistics.
//!
//! Backs the dashboard's overview tables: mean consumption per fruit and the
//! zero-value breakdown that motivates the on/off scenario treatment.

use serde::{Deserialize, Serialize};

use crate::series::HistoricalSeries;

/// Summary statistics for a single entity's series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Total number of observations
    pub length: usize,
    /// Number of zero values
    pub n_zeros: usize,
    /// Number of non-zero values
    pub n_active: usize,
    /// Fraction of observations that are zero (0-1)
    pub zero_fraction: f64,
    /// Arithmetic mean over all observations
    pub mean: f64,
    /// Arithmetic mean over non-zero observations only
    pub mean_active: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Sum of all values
    pub sum: f64,
    /// Sample standard deviation
    pub std_dev: f64,
}

/// Compute summary statistics for a series.
///
/// An empty series yields the all-zero default.
pub fn summarize(series: &HistoricalSeries) -> SeriesSummary {
    let values = series.values();
    let length = values.len();

    if length == 0 {
        return SeriesSummary::default();
    }

    let n_zeros = values.iter().filter(|&&v| v == 0.0).count();
    let n_active = length - n_zeros;

    let sum: f64 = values.iter().sum();
    let mean = sum / length as f64;
    let mean_active = if n_active > 0 { sum / n_active as f64 } else { 0.0 };

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let variance = if length > 1 {
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (length - 1) as f64
    } else {
        0.0
    };

    SeriesSummary {
        length,
        n_zeros,
        n_active,
        zero_fraction: n_zeros as f64 / length as f64,
        mean,
        mean_active,
        min,
        max,
        sum,
        std_dev: variance.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn daily_series(values: &[f64]) -> HistoricalSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + chrono::Duration::days(i as i64), v))
            .collect();
        HistoricalSeries::new("test", points).unwrap()
    }

    #[test]
    fn test_summarize_basic() {
        let series = daily_series(&[0.0, 4.0, 0.0, 8.0]);
        let summary = summarize(&series);

        assert_eq!(summary.length, 4);
        assert_eq!(summary.n_zeros, 2);
        assert_eq!(summary.n_active, 2);
        assert_relative_eq!(summary.zero_fraction, 0.5);
        assert_relative_eq!(summary.mean, 3.0);
        assert_relative_eq!(summary.mean_active, 6.0);
        assert_relative_eq!(summary.min, 0.0);
        assert_relative_eq!(summary.max, 8.0);
        assert_relative_eq!(summary.sum, 12.0);
    }

    #[test]
    fn test_summarize_all_zero() {
        let series = daily_series(&[0.0, 0.0, 0.0]);
        let summary = summarize(&series);

        assert_eq!(summary.n_active, 0);
        assert_relative_eq!(summary.zero_fraction, 1.0);
        assert_relative_eq!(summary.mean, 0.0);
        assert_relative_eq!(summary.mean_active, 0.0);
        assert_relative_eq!(summary.std_dev, 0.0);
    }

    #[test]
    fn test_summarize_empty() {
        let series = HistoricalSeries::new("empty", vec![]).unwrap();
        let summary = summarize(&series);
        assert_eq!(summary.length, 0);
        assert_eq!(summary.mean, 0.0);
    }

    #[test]
    fn test_summarize_std_dev() {
        let series = daily_series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let summary = summarize(&series);
        // Sample standard deviation of the classic example set
        assert_relative_eq!(summary.std_dev, 2.138089935299395, epsilon = 1e-12);
    }

    #[test]
    fn test_summarize_single_observation() {
        let series = daily_series(&[3.0]);
        let summary = summarize(&series);
        assert_eq!(summary.length, 1);
        assert_relative_eq!(summary.mean, 3.0);
        assert_relative_eq!(summary.std_dev, 0.0);
    }
}
