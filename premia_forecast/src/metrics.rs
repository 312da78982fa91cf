//! Out-of-sample comparison of model and historical-mean forecasts

use crate::error::{ForecastError, Result};
use premia_math::goodness::{checked_ratio, sum_squares};
use serde::Serialize;

/// Squared-error comparison of two aligned forecast series.
///
/// Errors are `realized - forecast`. The null model is the historical
/// mean, the alternative is the predictive regression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutOfSampleMetrics {
    /// Number of recursive steps aggregated (T)
    pub observations: usize,
    pub mse_model: f64,
    pub mse_benchmark: f64,
    /// `1 - SSE_model / SSE_benchmark`, as a fraction
    pub oos_r2: f64,
    /// `RMSE_benchmark - RMSE_model`; positive when the model is better
    pub delta_rmse: f64,
    /// Mean of the squared realized values, the scale zero MSEs are judged against
    pub realized_mean_square: f64,
}

impl OutOfSampleMetrics {
    /// Compare model forecasts against benchmark forecasts
    pub fn evaluate(model: &[f64], benchmark: &[f64], realized: &[f64]) -> Result<Self> {
        check_aligned(model, benchmark, realized)?;

        let sse_model = sum_squared_errors(model, realized);
        let sse_benchmark = sum_squared_errors(benchmark, realized);
        let n = realized.len() as f64;

        let realized_sum_squares = sum_squares(realized);
        let oos_r2 = 1.0
            - checked_ratio(
                sse_model,
                sse_benchmark,
                realized_sum_squares,
                "out-of-sample R-squared",
            )?;
        let mse_model = sse_model / n;
        let mse_benchmark = sse_benchmark / n;

        Ok(Self {
            observations: realized.len(),
            mse_model,
            mse_benchmark,
            oos_r2,
            delta_rmse: mse_benchmark.sqrt() - mse_model.sqrt(),
            realized_mean_square: realized_sum_squares / n,
        })
    }

    /// MSE-F statistic for a one-step horizon, `T * (MSE_N - MSE_A) / MSE_A`
    pub fn mse_f(&self) -> Result<f64> {
        let relative = checked_ratio(
            self.mse_benchmark - self.mse_model,
            self.mse_model,
            self.realized_mean_square,
            "MSE-F",
        )?;

        Ok(self.observations as f64 * relative)
    }
}

fn check_aligned(model: &[f64], benchmark: &[f64], realized: &[f64]) -> Result<()> {
    if model.len() != realized.len() || benchmark.len() != realized.len() {
        return Err(ForecastError::InvalidParameter(format!(
            "Forecast series differ in length: {} model, {} benchmark, {} realized",
            model.len(),
            benchmark.len(),
            realized.len()
        )));
    }

    if realized.is_empty() {
        return Err(ForecastError::UndefinedStatistic(
            "No out-of-sample observations to aggregate".to_string(),
        ));
    }

    Ok(())
}

/// Forecast errors `realized - forecast`
pub fn forecast_errors(forecast: &[f64], realized: &[f64]) -> Vec<f64> {
    realized.iter().zip(forecast).map(|(a, f)| a - f).collect()
}

fn sum_squared_errors(forecast: &[f64], realized: &[f64]) -> f64 {
    forecast_errors(forecast, realized).iter().map(|e| e * e).sum()
}

/// Running `SSE_benchmark - SSE_model`; rising stretches are periods where
/// the model outperforms the historical mean
pub fn cumulative_sse_difference(
    model: &[f64],
    benchmark: &[f64],
    realized: &[f64],
) -> Result<Vec<f64>> {
    check_aligned(model, benchmark, realized)?;

    let path = realized
        .iter()
        .zip(model.iter().zip(benchmark))
        .scan(0.0, |acc, (a, (m, b))| {
            *acc += (a - b).powi(2) - (a - m).powi(2);
            Some(*acc)
        })
        .collect();

    Ok(path)
}
