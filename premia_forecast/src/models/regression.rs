//! Predictive regression of the target on the lagged predictor

use crate::error::Result;
use crate::models::{ForecastModel, TrainedForecastModel};
use premia_math::{Coefficients, LinearFit};

/// OLS regression `y_t = a + b * x_{t-1}`
#[derive(Debug, Clone, Default)]
pub struct PredictiveRegression;

/// Coefficients estimated on one estimation window
#[derive(Debug, Clone)]
pub struct TrainedPredictiveRegression {
    coefficients: Coefficients,
}

impl TrainedPredictiveRegression {
    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    pub fn slope(&self) -> f64 {
        self.coefficients.slope
    }
}

impl ForecastModel for PredictiveRegression {
    type Trained = TrainedPredictiveRegression;

    fn train(&self, predictor: &[f64], target: &[f64]) -> Result<Self::Trained> {
        let fit = LinearFit::fit(predictor, target)?;

        Ok(TrainedPredictiveRegression {
            coefficients: fit.coefficients(),
        })
    }

    fn name(&self) -> &str {
        "Predictive Regression"
    }
}

impl TrainedForecastModel for TrainedPredictiveRegression {
    fn forecast(&self, predictor_lag: f64) -> f64 {
        self.coefficients.predict(predictor_lag)
    }

    fn name(&self) -> &str {
        "Predictive Regression"
    }
}
