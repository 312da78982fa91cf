//! Hand-off of forecast series to an external plotting hook
//!
//! Rendering lives outside this crate. A hook receives the recorded
//! series; whatever it does, the statistics are returned unchanged.

use crate::error::ForecastError;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use tracing::warn;

/// Whether the caller asked for a plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    Yes,
    #[default]
    No,
}

impl PlotMode {
    pub fn is_requested(self) -> bool {
        self == PlotMode::Yes
    }
}

impl From<bool> for PlotMode {
    fn from(plot: bool) -> Self {
        if plot {
            PlotMode::Yes
        } else {
            PlotMode::No
        }
    }
}

impl FromStr for PlotMode {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(PlotMode::Yes),
            "no" => Ok(PlotMode::No),
            other => Err(ForecastError::InvalidParameter(format!(
                "Plot mode must be 'yes' or 'no', got '{}'",
                other
            ))),
        }
    }
}

/// Series handed to the plot hook, aligned by recorded step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub predictor: String,
    pub target: String,
    pub periods: Vec<i32>,
    pub realized: Vec<f64>,
    pub model: Vec<f64>,
    pub benchmark: Vec<f64>,
    /// Running benchmark SSE minus model SSE
    pub cumulative_sse_difference: Vec<f64>,
}

pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// External plot renderer
pub trait PlotHook {
    fn render(&self, series: &PlotSeries) -> Result<(), HookError>;
}

impl<F> PlotHook for F
where
    F: Fn(&PlotSeries) -> Result<(), HookError>,
{
    fn render(&self, series: &PlotSeries) -> Result<(), HookError> {
        self(series)
    }
}

/// Run the hook, containing errors and panics. Returns whether it succeeded.
pub(crate) fn dispatch(hook: &dyn PlotHook, series: &PlotSeries) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| hook.render(series))) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("Plot hook failed for {}: {}", series.predictor, e);
            false
        }
        Err(_) => {
            warn!("Plot hook panicked for {}", series.predictor);
            false
        }
    }
}
