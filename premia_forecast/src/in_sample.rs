//! In-sample goodness of fit over the full sample and sub-periods
//!
//! Each figure comes from its own regression over its own sub-sample; no
//! sub-period figure is derived from the full-sample fit. Any degenerate
//! fit is returned to the caller as an error.

use crate::error::Result;
use crate::postprocess::PostProcessor;
use crate::sample::LaggedSample;
use premia_math::goodness::{mean, r_squared_of_fit};

/// R-squared of the regression over the whole sample, as a fraction
pub fn full_sample_r2(sample: &LaggedSample) -> Result<f64> {
    Ok(sample.fit()?.r_squared()?)
}

/// R-squared of a regression restricted to the observations after the
/// initial estimation period
pub fn out_of_sample_period_r2(sample: &LaggedSample, est_periods: usize) -> Result<f64> {
    full_sample_r2(&sample.tail_from(est_periods))
}

/// R-squared of a regression restricted to target periods from `late_start` on
pub fn late_period_r2(sample: &LaggedSample, late_start: i32) -> Result<f64> {
    full_sample_r2(&sample.since(late_start))
}

/// R-squared of the full-sample fitted values after the forecast policies,
/// using the full-sample mean as the benchmark
pub fn restricted_r2(sample: &LaggedSample, processor: &PostProcessor) -> Result<f64> {
    let fit = sample.fit()?;
    let benchmark = mean(sample.target())?;

    let restricted: Vec<f64> = fit
        .fitted_values()
        .iter()
        .map(|&f| processor.adjust(f, benchmark, fit.slope()).value)
        .collect();

    Ok(r_squared_of_fit(sample.target(), &restricted)?)
}

/// The three annual in-sample figures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualInSample {
    pub full: f64,
    pub oos_period: f64,
    pub late_period: f64,
}

impl AnnualInSample {
    pub fn compute(sample: &LaggedSample, est_periods: usize, late_start: i32) -> Result<Self> {
        Ok(Self {
            full: full_sample_r2(sample)?,
            oos_period: out_of_sample_period_r2(sample, est_periods)?,
            late_period: late_period_r2(sample, late_start)?,
        })
    }
}
