//! # Premia
//!
//! Workspace facade for evaluating equity premium predictors.
//!
//! - [`math`]: least-squares fits and goodness-of-fit ratios
//! - [`forecast`]: tables, recursive forecasts and the evaluation pipeline
//!
//! ## Example
//!
//! ```
//! use premia_workspace::forecast::EvaluationConfig;
//!
//! let config = EvaluationConfig::annual();
//! assert_eq!(config.est_periods_oos, 20);
//! assert!(config.validate().is_ok());
//! ```

pub use premia_forecast as forecast;
pub use premia_math as math;

pub use premia_forecast::{
    evaluate_annual, evaluate_monthly, EvaluationConfig, Evaluator, ForecastError, Frequency,
    PlotMode, ResultMapping, TimeSeriesTable,
};
