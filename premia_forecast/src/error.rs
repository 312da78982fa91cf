//! Error types for the premia_forecast crate

use polars::prelude::PolarsError;
use premia_math::MathError;
use thiserror::Error;

/// Custom error types for the premia_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A sample or estimation window has too few observations or a constant predictor
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A ratio-based statistic has a zero denominator
    #[error("Undefined statistic: {0}")]
    UndefinedStatistic(String),

    /// A requested predictor or target column is absent from the table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::DegenerateInput(msg) => ForecastError::DegenerateInput(msg),
            MathError::UndefinedStatistic(msg) => ForecastError::UndefinedStatistic(msg),
            MathError::InvalidInput(msg) => ForecastError::DataError(msg),
        }
    }
}
