//! Economic restrictions on model forecasts
//!
//! Two policies, applied in this order and counted separately:
//!
//! - **slope override**: when the estimated slope does not have the
//!   expected sign, the model forecast is replaced by the benchmark;
//! - **sign truncation**: when the historical-mean benchmark is negative,
//!   the model forecast is set to zero.
//!
//! Only level-scale forecasts go through these policies.

use crate::config::ExpectedSign;
use crate::error::Result;
use crate::recursive::ForecastStep;
use premia_math::goodness::checked_ratio;

/// A forecast after both policies, with the policies that fired
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjusted {
    pub value: f64,
    pub overridden: bool,
    /// Truncation fired and changed the value
    pub truncated: bool,
}

/// Post-processed forecast series
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedForecasts {
    forecasts: Vec<f64>,
    truncated: usize,
    overridden: usize,
}

impl ProcessedForecasts {
    pub fn forecasts(&self) -> &[f64] {
        &self.forecasts
    }

    pub fn len(&self) -> usize {
        self.forecasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forecasts.is_empty()
    }

    pub fn truncated_count(&self) -> usize {
        self.truncated
    }

    pub fn overridden_count(&self) -> usize {
        self.overridden
    }

    /// Fraction of steps where truncation changed the forecast (share_T)
    pub fn truncated_share(&self) -> Result<f64> {
        Ok(checked_ratio(
            self.truncated as f64,
            self.forecasts.len() as f64,
            1.0,
            "truncation share",
        )?)
    }

    /// Fraction of steps where the slope override fired (share_U)
    pub fn overridden_share(&self) -> Result<f64> {
        Ok(checked_ratio(
            self.overridden as f64,
            self.forecasts.len() as f64,
            1.0,
            "override share",
        )?)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PostProcessor {
    expected_sign: ExpectedSign,
}

impl PostProcessor {
    pub fn new(expected_sign: ExpectedSign) -> Self {
        Self { expected_sign }
    }

    pub fn expected_sign(&self) -> ExpectedSign {
        self.expected_sign
    }

    /// Apply both policies to a single forecast
    pub fn adjust(&self, forecast: f64, benchmark: f64, slope: f64) -> Adjusted {
        let overridden = !self.expected_sign.agrees_with(slope);
        let value = if overridden { benchmark } else { forecast };

        if benchmark < 0.0 {
            Adjusted {
                value: 0.0,
                overridden,
                truncated: value != 0.0,
            }
        } else {
            Adjusted {
                value,
                overridden,
                truncated: false,
            }
        }
    }

    /// Apply both policies to every recorded step
    pub fn apply(&self, steps: &[ForecastStep]) -> ProcessedForecasts {
        let mut processed = ProcessedForecasts {
            forecasts: Vec::with_capacity(steps.len()),
            truncated: 0,
            overridden: 0,
        };

        for step in steps {
            let adjusted = self.adjust(step.model, step.benchmark, step.slope);
            processed.forecasts.push(adjusted.value);
            processed.truncated += adjusted.truncated as usize;
            processed.overridden += adjusted.overridden as usize;
        }

        processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn step(model: f64, benchmark: f64, slope: f64) -> ForecastStep {
        ForecastStep {
            period: 2000,
            model,
            benchmark,
            realized: 0.0,
            slope,
            window_len: 10,
        }
    }

    #[rstest]
    // Neither policy fires
    #[case(0.02, 0.01, 0.5, 0.02, false, false)]
    // Wrong-sign slope: forecast replaced by the benchmark
    #[case(0.02, 0.01, -0.5, 0.01, true, false)]
    #[case(0.02, 0.01, 0.0, 0.01, true, false)]
    // Negative benchmark: forecast truncated to zero
    #[case(0.02, -0.01, 0.5, 0.0, false, true)]
    // Both fire; the override value is then truncated
    #[case(0.02, -0.01, -0.5, 0.0, true, true)]
    // Truncating an exact zero changes nothing
    #[case(0.0, -0.01, 0.5, 0.0, false, false)]
    fn test_adjust(
        #[case] forecast: f64,
        #[case] benchmark: f64,
        #[case] slope: f64,
        #[case] value: f64,
        #[case] overridden: bool,
        #[case] truncated: bool,
    ) {
        let adjusted = PostProcessor::new(ExpectedSign::Positive).adjust(forecast, benchmark, slope);
        assert_eq!(
            adjusted,
            Adjusted {
                value,
                overridden,
                truncated
            }
        );
    }

    #[test]
    fn test_negative_expected_sign() {
        let processor = PostProcessor::new(ExpectedSign::Negative);
        assert!(!processor.adjust(0.02, 0.01, -0.5).overridden);
        assert!(processor.adjust(0.02, 0.01, 0.5).overridden);
    }

    #[test]
    fn test_shares() {
        let steps = vec![
            step(0.02, 0.01, 0.5),
            step(0.02, -0.01, 0.5),
            step(0.03, 0.01, -0.2),
            step(0.01, 0.02, 0.1),
        ];

        let processed = PostProcessor::new(ExpectedSign::Positive).apply(&steps);

        assert_eq!(processed.forecasts(), &[0.02, 0.0, 0.01, 0.01]);
        assert_relative_eq!(processed.truncated_share().unwrap(), 0.25);
        assert_relative_eq!(processed.overridden_share().unwrap(), 0.25);
    }

    #[test]
    fn test_shares_on_empty_run() {
        let processed = PostProcessor::new(ExpectedSign::Positive).apply(&[]);
        assert!(matches!(
            processed.truncated_share(),
            Err(ForecastError::UndefinedStatistic(_))
        ));
    }
}
