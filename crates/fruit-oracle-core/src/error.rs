//! Error types for the scenario forecasting core.

use thiserror::Error;

/// Result type for forecasting operations.
pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Error types for scenario forecasting operations.
///
/// Every failure is terminal for the request: there is no retry and no
/// partial scenario output. The presentation layer owns the user-facing
/// wording.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("All values are zero: no usable training data in {total_days} observed days")]
    AllZero { total_days: usize },

    #[error("Insufficient data: need at least {needed} non-zero observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Forecast unavailable: {0}")]
    ForecastUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScenarioError::AllZero { total_days: 365 };
        assert_eq!(
            format!("{}", err),
            "All values are zero: no usable training data in 365 observed days"
        );

        let err = ScenarioError::InsufficientData { needed: 10, got: 8 };
        assert_eq!(
            format!("{}", err),
            "Insufficient data: need at least 10 non-zero observations, got 8"
        );

        let err = ScenarioError::InvalidSeries("dates out of order".into());
        assert_eq!(format!("{}", err), "Invalid series: dates out of order");

        let err = ScenarioError::ForecastUnavailable("fit did not converge".into());
        assert_eq!(
            format!("{}", err),
            "Forecast unavailable: fit did not converge"
        );
    }

    #[test]
    fn test_error_construction() {
        let err = ScenarioError::InsufficientData { needed: 10, got: 3 };
        if let ScenarioError::InsufficientData { needed, got } = err {
            assert_eq!(needed, 10);
            assert_eq!(got, 3);
        } else {
            panic!("Expected InsufficientData variant");
        }

        let err = ScenarioError::AllZero { total_days: 0 };
        assert!(matches!(err, ScenarioError::AllZero { total_days: 0 }));
    }
}
