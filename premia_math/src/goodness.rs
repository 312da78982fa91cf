//! Goodness-of-fit ratios and small descriptive helpers
//!
//! Every ratio here refuses to divide by a denominator that is zero
//! relative to the magnitude of its inputs and reports
//! [`MathError::UndefinedStatistic`] instead of producing an infinite or
//! NaN value.

use crate::{MathError, Result};

/// A quantity at most this fraction of its input scale is treated as zero
pub const RELATIVE_TOLERANCE: f64 = f64::EPSILON;

/// Arithmetic mean of a non-empty slice
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InvalidInput(
            "cannot take the mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sum of squared deviations from the slice's own mean
pub fn sum_squared_deviations(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let m = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - m).powi(2)).sum()
}

/// Sum of squares
pub fn sum_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

/// `numerator / denominator`, failing when the denominator vanishes
/// relative to `scale`.
///
/// `scale` is the magnitude of the inputs the denominator was computed
/// from, such as their sum of squares. `what` names the statistic in the
/// error message.
pub fn checked_ratio(numerator: f64, denominator: f64, scale: f64, what: &str) -> Result<f64> {
    if !denominator.is_finite() || denominator.abs() <= RELATIVE_TOLERANCE * scale.abs() {
        return Err(MathError::UndefinedStatistic(format!(
            "{} has a zero denominator",
            what
        )));
    }

    Ok(numerator / denominator)
}

/// `1 - ssr / sst`, with `scale` the sum of squares of the target
pub fn r_squared(ssr: f64, sst: f64, scale: f64) -> Result<f64> {
    Ok(1.0 - checked_ratio(ssr, sst, scale, "R-squared")?)
}

/// R-squared of an arbitrary set of fitted values against `y`
pub fn r_squared_of_fit(y: &[f64], fitted: &[f64]) -> Result<f64> {
    if y.len() != fitted.len() {
        return Err(MathError::InvalidInput(format!(
            "y has {} observations but the fit has {}",
            y.len(),
            fitted.len()
        )));
    }

    let ssr = y.iter().zip(fitted).map(|(a, f)| (a - f).powi(2)).sum();
    r_squared(ssr, sum_squared_deviations(y), sum_squares(y))
}

/// Round to a fixed number of decimal places for presentation
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
