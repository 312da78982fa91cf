//! Ordinary least squares with one predictor
//!
//! Fits `y = intercept + slope * x` over two aligned slices and keeps the
//! fitted values and residuals in input order.

use crate::goodness::{r_squared, sum_squared_deviations, sum_squares, RELATIVE_TOLERANCE};
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Intercept and slope of a fitted line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub intercept: f64,
    pub slope: f64,
}

impl Coefficients {
    /// Evaluate the fitted line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// A least-squares fit of `y` on `x`
#[derive(Debug, Clone)]
pub struct LinearFit {
    coefficients: Coefficients,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    total_sum_squares: f64,
    target_sum_squares: f64,
}

impl LinearFit {
    /// Fit the regression line minimizing the sum of squared residuals.
    ///
    /// Fails with [`MathError::DegenerateInput`] when fewer than two
    /// observations are given or when `x` has no variation. Variation is
    /// judged relative to the magnitude of `x`, so predictors on any scale
    /// fit alike.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "x has {} observations but y has {}",
                x.len(),
                y.len()
            )));
        }

        if x.len() < 2 {
            return Err(MathError::DegenerateInput(format!(
                "need at least 2 observations for a linear fit, got {}",
                x.len()
            )));
        }

        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "regression inputs must be finite".to_string(),
            ));
        }

        let n = x.len() as f64;
        let x_mean = x.iter().sum::<f64>() / n;
        let y_mean = y.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (&xi, &yi) in x.iter().zip(y.iter()) {
            let dx = xi - x_mean;
            numerator += dx * (yi - y_mean);
            denominator += dx * dx;
        }

        // Sxx within accumulated rounding of n * sum(x^2) means a constant predictor
        if denominator <= RELATIVE_TOLERANCE * n * sum_squares(x) {
            return Err(MathError::DegenerateInput(format!(
                "predictor has no variation over {} observations",
                x.len()
            )));
        }

        let slope = numerator / denominator;
        let coefficients = Coefficients {
            intercept: y_mean - slope * x_mean,
            slope,
        };

        let fitted: Vec<f64> = x.iter().map(|&xi| coefficients.predict(xi)).collect();
        let residuals = y.iter().zip(fitted.iter()).map(|(yi, fi)| yi - fi).collect();

        Ok(Self {
            coefficients,
            fitted,
            residuals,
            total_sum_squares: sum_squared_deviations(y),
            target_sum_squares: sum_squares(y),
        })
    }

    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.coefficients.intercept
    }

    pub fn slope(&self) -> f64 {
        self.coefficients.slope
    }

    /// Fitted values, aligned with the input observations
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    /// Residuals `y - fitted`, aligned with the input observations
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    pub fn len(&self) -> usize {
        self.fitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fitted.is_empty()
    }

    pub fn sum_squared_residuals(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }

    /// Coefficient of determination, `1 - SSR / SST`
    pub fn r_squared(&self) -> Result<f64> {
        r_squared(
            self.sum_squared_residuals(),
            self.total_sum_squares,
            self.target_sum_squares,
        )
    }
}
