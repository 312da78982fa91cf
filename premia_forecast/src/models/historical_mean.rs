//! Historical-mean benchmark

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use statrs::statistics::Statistics;

/// Forecasts the target with its mean over the estimation window
#[derive(Debug, Clone, Default)]
pub struct HistoricalMean;

/// Historical mean of one estimation window
#[derive(Debug, Clone)]
pub struct TrainedHistoricalMean {
    mean: f64,
    observations: usize,
}

impl TrainedHistoricalMean {
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn observations(&self) -> usize {
        self.observations
    }
}

impl ForecastModel for HistoricalMean {
    type Trained = TrainedHistoricalMean;

    fn train(&self, _predictor: &[f64], target: &[f64]) -> Result<Self::Trained> {
        if target.is_empty() {
            return Err(ForecastError::DegenerateInput(
                "Historical mean needs at least one observation".to_string(),
            ));
        }

        Ok(TrainedHistoricalMean {
            mean: target.iter().mean(),
            observations: target.len(),
        })
    }

    fn name(&self) -> &str {
        "Historical Mean"
    }
}

impl TrainedForecastModel for TrainedHistoricalMean {
    fn forecast(&self, _predictor_lag: f64) -> f64 {
        self.mean
    }

    fn name(&self) -> &str {
        "Historical Mean"
    }
}
