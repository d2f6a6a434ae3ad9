//! Historical series data model and activity statistics.
//!
//! A [`HistoricalSeries`] holds one entity's daily observations as loaded by
//! the data layer. The series is validated once at construction and treated
//! as immutable afterwards; the forecaster only ever borrows it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScenarioError};

/// One entity's ordered daily observations.
#[derive(Debug, Clone)]
pub struct HistoricalSeries {
    entity: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

/// Activity statistics derived from a series.
///
/// `total_days` counts every observed row, zeros included. That denominator
/// is what captures on/off behavior: a fruit sold on 3 days out of 10 has an
/// activity rate of 0.3 no matter how much was sold on the active days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    /// Number of observed days
    pub total_days: usize,
    /// Number of days with a non-zero value
    pub active_days: usize,
}

impl ActivityStats {
    /// Fraction of observed days with a non-zero value, in [0, 1].
    ///
    /// Defined as 0 for an empty series.
    pub fn rate(&self) -> f64 {
        if self.total_days == 0 {
            0.0
        } else {
            self.active_days as f64 / self.total_days as f64
        }
    }
}

impl HistoricalSeries {
    /// Build a series from (date, value) pairs.
    ///
    /// Validates the data-layer contract: dates strictly increasing (no
    /// duplicates, chronological order), values finite and non-negative.
    pub fn new(entity: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Result<Self> {
        let entity = entity.into();

        let mut dates = Vec::with_capacity(points.len());
        let mut values = Vec::with_capacity(points.len());

        for (date, value) in points {
            if !value.is_finite() {
                return Err(ScenarioError::InvalidSeries(format!(
                    "non-finite value {} at {}",
                    value, date
                )));
            }
            if value < 0.0 {
                return Err(ScenarioError::InvalidSeries(format!(
                    "negative value {} at {}",
                    value, date
                )));
            }
            if let Some(&prev) = dates.last() {
                if date <= prev {
                    return Err(ScenarioError::InvalidSeries(format!(
                        "dates must be strictly increasing: {} follows {}",
                        date, prev
                    )));
                }
            }
            dates.push(date);
            values.push(value);
        }

        Ok(Self {
            entity,
            dates,
            values,
        })
    }

    /// Entity name this series belongs to.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Observation dates, in chronological order.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observed values, aligned with `dates()`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observed days.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Last observed date, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Compute activity statistics over the full series.
    pub fn activity(&self) -> ActivityStats {
        let active_days = self.values.iter().filter(|&&v| v > 0.0).count();
        ActivityStats {
            total_days: self.len(),
            active_days,
        }
    }

    /// Extract the non-zero (date, value) subsequence used for training.
    ///
    /// Dropping zero days removes the on/off discontinuity that a
    /// continuous-time regressor cannot represent natively.
    pub fn active_points(&self) -> (Vec<NaiveDate>, Vec<f64>) {
        let mut dates = Vec::new();
        let mut values = Vec::new();
        for (&d, &v) in self.dates.iter().zip(self.values.iter()) {
            if v > 0.0 {
                dates.push(d);
                values.push(v);
            }
        }
        (dates, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn daily_series(entity: &str, values: &[f64]) -> HistoricalSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + chrono::Duration::days(i as i64), v))
            .collect();
        HistoricalSeries::new(entity, points).unwrap()
    }

    #[test]
    fn test_new_accepts_valid_series() {
        let series = daily_series("apple", &[1.0, 0.0, 3.5]);
        assert_eq!(series.entity(), "apple");
        assert_eq!(series.len(), 3);
        assert!(!series.is_empty());
        assert_eq!(
            series.last_date(),
            NaiveDate::from_ymd_opt(2024, 1, 3)
        );
    }

    #[test]
    fn test_new_rejects_duplicate_dates() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let result = HistoricalSeries::new("apple", vec![(d, 1.0), (d, 2.0)]);
        assert!(matches!(result, Err(ScenarioError::InvalidSeries(_))));
    }

    #[test]
    fn test_new_rejects_out_of_order_dates() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let result = HistoricalSeries::new("apple", vec![(d1, 1.0), (d2, 2.0)]);
        assert!(matches!(result, Err(ScenarioError::InvalidSeries(_))));
    }

    #[test]
    fn test_new_rejects_negative_and_non_finite_values() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(HistoricalSeries::new("apple", vec![(d, -1.0)]).is_err());
        assert!(HistoricalSeries::new("apple", vec![(d, f64::NAN)]).is_err());
        assert!(HistoricalSeries::new("apple", vec![(d, f64::INFINITY)]).is_err());
    }

    #[test]
    fn test_activity_counts_zeros_in_denominator() {
        let series = daily_series("banana", &[0.0, 2.0, 0.0, 1.0, 0.0]);
        let stats = series.activity();
        assert_eq!(stats.total_days, 5);
        assert_eq!(stats.active_days, 2);
        assert_relative_eq!(stats.rate(), 0.4);
    }

    #[test]
    fn test_activity_rate_empty_series() {
        let series = HistoricalSeries::new("empty", vec![]).unwrap();
        let stats = series.activity();
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.active_days, 0);
        assert_eq!(stats.rate(), 0.0);
    }

    #[test]
    fn test_activity_rate_bounds() {
        let all_zero = daily_series("cherry", &[0.0; 10]);
        assert_eq!(all_zero.activity().rate(), 0.0);

        let all_active = daily_series("strawberry", &[1.0; 10]);
        assert_eq!(all_active.activity().rate(), 1.0);
    }

    #[test]
    fn test_activity_rate_monotone_under_zero_replacement() {
        // Replacing zero days with active days in a fixed-length series
        // never decreases the rate.
        let mut values = vec![0.0; 20];
        let mut prev_rate = daily_series("kiwi", &values).activity().rate();
        for i in 0..20 {
            values[i] = 5.0;
            let rate = daily_series("kiwi", &values).activity().rate();
            assert!(rate >= prev_rate);
            prev_rate = rate;
        }
        assert_relative_eq!(prev_rate, 1.0);
    }

    #[test]
    fn test_active_points_filters_zero_days() {
        let series = daily_series("mango", &[0.0, 2.0, 0.0, 4.0]);
        let (dates, values) = series.active_points();
        assert_eq!(values, vec![2.0, 4.0]);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            ]
        );
    }
}
