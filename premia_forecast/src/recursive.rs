//! Expanding-window recursive forecasting
//!
//! Step `k` re-estimates the predictive regression and the historical mean on
//! observations `0..k` of a [`LaggedSample`] and forecasts observation `k`.
//! The window grows by one observation per step and never includes the
//! period being forecast.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, HistoricalMean, PredictiveRegression, TrainedForecastModel};
use crate::sample::LaggedSample;
use serde::Serialize;
use tracing::debug;

/// Forecasts recorded for one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastStep {
    /// Target period being forecast
    pub period: i32,
    /// Predictive-regression forecast
    pub model: f64,
    /// Historical-mean forecast
    pub benchmark: f64,
    pub realized: f64,
    /// Slope estimated on this step's window
    pub slope: f64,
    /// Observations in the estimation window
    pub window_len: usize,
}

/// Outcome of a full recursion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecursiveRun {
    steps: Vec<ForecastStep>,
    /// Periods whose estimation window was degenerate
    skipped: Vec<i32>,
}

impl RecursiveRun {
    pub fn steps(&self) -> &[ForecastStep] {
        &self.steps
    }

    pub fn skipped(&self) -> &[i32] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn periods(&self) -> Vec<i32> {
        self.steps.iter().map(|s| s.period).collect()
    }

    pub fn model_forecasts(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.model).collect()
    }

    pub fn benchmark_forecasts(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.benchmark).collect()
    }

    pub fn realized(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.realized).collect()
    }
}

/// Drives the expanding-window loop after an initial estimation period
#[derive(Debug, Clone)]
pub struct RecursiveForecaster {
    est_periods: usize,
    model: PredictiveRegression,
    benchmark: HistoricalMean,
}

impl RecursiveForecaster {
    /// `est_periods` observations are reserved for the first estimation window
    pub fn new(est_periods: usize) -> Self {
        Self {
            est_periods,
            model: PredictiveRegression,
            benchmark: HistoricalMean,
        }
    }

    pub fn est_periods(&self) -> usize {
        self.est_periods
    }

    /// Forecast observation `k` from observations `0..k`
    pub fn step(&self, sample: &LaggedSample, k: usize) -> Result<ForecastStep> {
        if k >= sample.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Step {} is beyond the sample of {} observations",
                k,
                sample.len()
            )));
        }

        let predictor = &sample.predictor()[..k];
        let target = &sample.target()[..k];

        let regression = self.model.train(predictor, target)?;
        let mean = self.benchmark.train(predictor, target)?;

        // Paired with target k, hence dated one period before it
        let predictor_lag = sample.predictor()[k];

        Ok(ForecastStep {
            period: sample.periods()[k],
            model: regression.forecast(predictor_lag),
            benchmark: mean.forecast(predictor_lag),
            realized: sample.target()[k],
            slope: regression.slope(),
            window_len: k,
        })
    }

    /// Run every step from the end of the estimation period to the end of the sample.
    ///
    /// Steps with a degenerate window are recorded as skipped and left out
    /// of the returned forecasts; any other error aborts the run.
    pub fn run(&self, sample: &LaggedSample) -> Result<RecursiveRun> {
        let mut run = RecursiveRun::default();

        for k in self.est_periods..sample.len() {
            match self.step(sample, k) {
                Ok(step) => run.steps.push(step),
                Err(ForecastError::DegenerateInput(reason)) => {
                    let period = sample.periods()[k];
                    debug!("Skipping forecast for {}: {}", period, reason);
                    run.skipped.push(period);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(run)
    }
}
