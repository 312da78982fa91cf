//! Forecasting models fit on an estimation window
//!
//! A model is trained on the aligned `(lagged predictor, target)` window and
//! produces a one-step-ahead forecast from the latest predictor value.

use crate::error::Result;
use std::fmt::Debug;

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Forecast the target one period after the estimation window, given the
    /// predictor observed at the window's last period
    fn forecast(&self, predictor_lag: f64) -> f64;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on an estimation window
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on aligned predictor and target observations
    fn train(&self, predictor: &[f64], target: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod historical_mean;
pub mod regression;

pub use historical_mean::{HistoricalMean, TrainedHistoricalMean};
pub use regression::{PredictiveRegression, TrainedPredictiveRegression};
