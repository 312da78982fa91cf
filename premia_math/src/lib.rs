//! # Premia Math
//!
//! Numeric building blocks for evaluating predictive regressions.
//! This crate provides the single-predictor least-squares fit and the
//! goodness-of-fit ratios shared by the in-sample and out-of-sample
//! calculations.

use thiserror::Error;

pub mod goodness;
pub mod ols;

pub use crate::ols::{Coefficients, LinearFit};

/// Errors that can occur in regression and statistic calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Too few observations, or a predictor without variation
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A ratio whose denominator is zero or numerically indistinguishable from zero
    #[error("Undefined statistic: {0}")]
    UndefinedStatistic(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for regression math operations
pub type Result<T> = std::result::Result<T, MathError>;
