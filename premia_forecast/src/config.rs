//! Evaluation configuration
//!
//! Every evaluation receives its sample boundaries, estimation length and
//! post-processing policy through an [`EvaluationConfig`]; there is no
//! process-wide configuration.

use crate::error::{ForecastError, Result};
use crate::utils::period_start;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling frequency of a time-indexed table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Keys are `yyyy`
    Annual,
    /// Keys are `yyyymm`
    Monthly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Annual => write!(f, "annual"),
            Frequency::Monthly => write!(f, "monthly"),
        }
    }
}

/// Slope sign implied by economic theory for a predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedSign {
    Positive,
    Negative,
}

impl ExpectedSign {
    /// Whether a fitted slope points in the expected direction.
    ///
    /// A slope of exactly zero never agrees.
    pub fn agrees_with(self, slope: f64) -> bool {
        match self {
            ExpectedSign::Positive => slope > 0.0,
            ExpectedSign::Negative => slope < 0.0,
        }
    }
}

/// Policies applied to raw model forecasts before aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostProcessing {
    /// Forecasts are aggregated as produced (annual evaluation)
    #[default]
    NoPostProcessing,
    /// Sign truncation and wrong-sign slope override (monthly evaluation)
    TruncationAndOverride { expected_sign: ExpectedSign },
}

/// Parameters of a single predictor evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub frequency: Frequency,
    /// First target period of the sample (inclusive)
    pub start: i32,
    /// Last target period of the sample (inclusive)
    pub end: i32,
    /// Number of initial observations reserved for estimation before recursion begins
    pub est_periods_oos: usize,
    /// Start of the late in-sample sub-period
    #[serde(default)]
    pub late_start: Option<i32>,
    #[serde(default)]
    pub post_processing: PostProcessing,
}

impl EvaluationConfig {
    /// Annual evaluation over 1927-2005 with 20 estimation years
    pub fn annual() -> Self {
        Self {
            frequency: Frequency::Annual,
            start: 1927,
            end: 2005,
            est_periods_oos: 20,
            late_start: Some(1965),
            post_processing: PostProcessing::NoPostProcessing,
        }
    }

    /// Monthly evaluation over 1927-12 to 2005-12 with 240 estimation months
    pub fn monthly() -> Self {
        Self {
            frequency: Frequency::Monthly,
            start: 192712,
            end: 200512,
            est_periods_oos: 240,
            late_start: None,
            post_processing: PostProcessing::TruncationAndOverride {
                expected_sign: ExpectedSign::Positive,
            },
        }
    }

    pub fn with_range(mut self, start: i32, end: i32) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_est_periods(mut self, est_periods_oos: usize) -> Self {
        self.est_periods_oos = est_periods_oos;
        self
    }

    pub fn with_late_start(mut self, late_start: Option<i32>) -> Self {
        self.late_start = late_start;
        self
    }

    pub fn with_post_processing(mut self, post_processing: PostProcessing) -> Self {
        self.post_processing = post_processing;
        self
    }

    /// Parse and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the boundaries are well-formed keys in chronological order
    pub fn validate(&self) -> Result<()> {
        period_start(self.start, self.frequency)?;
        period_start(self.end, self.frequency)?;

        if self.start > self.end {
            return Err(ForecastError::InvalidParameter(format!(
                "Sample start {} is after sample end {}",
                self.start, self.end
            )));
        }

        if self.est_periods_oos == 0 {
            return Err(ForecastError::InvalidParameter(
                "Estimation period must contain at least one observation".to_string(),
            ));
        }

        if let Some(late) = self.late_start {
            period_start(late, self.frequency)?;
            if late < self.start || late > self.end {
                return Err(ForecastError::InvalidParameter(format!(
                    "Late sub-period start {} lies outside {}..={}",
                    late, self.start, self.end
                )));
            }
        }

        Ok(())
    }
}
