//! # Premia Forecast
//!
//! Evaluation of equity premium predictors against the historical mean.
//!
//! ## Features
//!
//! - Period-indexed predictor tables backed by polars
//! - One-period-lag predictive regressions and in-sample R² over sub-periods
//! - Expanding-window recursive forecasts with a historical-mean benchmark
//! - Sign truncation and slope override of forecasts
//! - Out-of-sample R², dRMSE and MSE-F
//!
//! ## Annual and monthly evaluations
//!
//! Both variants run through the same pipeline. The configuration's
//! [`PostProcessing`] decides which figures come back:
//!
//! - **Annual** (`NoPostProcessing`): in-sample R² over the full, out-of-sample
//!   and late periods, oR², dRMSE and MSE-F
//! - **Monthly** (`TruncationAndOverride`): log and level in-sample R², raw and
//!   restricted oR², the shares of truncated and overridden forecasts, dRMSE
//!
//! ## Quick Start
//!
//! ```rust
//! use premia_forecast::{evaluate_annual, EvaluationConfig, Frequency, PlotMode, TimeSeriesTable};
//!
//! let periods: Vec<i32> = (1990..2010).collect();
//! let dp: Vec<f64> = (0..20).map(|i| ((i * 7) % 11) as f64 / 10.0).collect();
//! let premium: Vec<f64> = (0..20)
//!     .map(|i| if i == 0 { 0.0 } else { 0.01 + 0.05 * dp[i - 1] + 0.002 * ((i % 3) as f64 - 1.0) })
//!     .collect();
//!
//! let table = TimeSeriesTable::from_columns(
//!     "yyyy",
//!     Frequency::Annual,
//!     periods,
//!     vec![("dp", dp), ("equity_premium", premium)],
//! )?;
//!
//! let config = EvaluationConfig::annual()
//!     .with_range(1991, 2009)
//!     .with_est_periods(8)
//!     .with_late_start(Some(2000));
//!
//! let mapping = evaluate_annual(&table, "dp", "equity_premium", &config, PlotMode::No, None)?;
//! assert_eq!(mapping.len(), 6);
//! println!("{}", mapping);
//! # Ok::<(), premia_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod in_sample;
pub mod metrics;
pub mod models;
pub mod plot;
pub mod postprocess;
pub mod recursive;
pub mod result;
pub mod sample;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{EvaluationConfig, ExpectedSign, Frequency, PostProcessing};
pub use crate::data::{SeriesSummary, TimeSeriesTable};
pub use crate::error::{ForecastError, Result};
pub use crate::evaluation::{evaluate_annual, evaluate_monthly, Evaluation, Evaluator, Target};
pub use crate::metrics::OutOfSampleMetrics;
pub use crate::models::{ForecastModel, TrainedForecastModel};
pub use crate::plot::{HookError, PlotHook, PlotMode, PlotSeries};
pub use crate::postprocess::{PostProcessor, ProcessedForecasts};
pub use crate::recursive::{ForecastStep, RecursiveForecaster, RecursiveRun};
pub use crate::result::{ResultMapping, Statistics};
pub use crate::sample::LaggedSample;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
