//! Evaluation pipeline for one predictor
//!
//! In-sample fits, the recursive forecast loop, optional post-processing,
//! out-of-sample aggregation and result assembly run through one code
//! path. The configured [`PostProcessing`] variant decides which figures
//! are produced: `NoPostProcessing` yields the annual keys,
//! `TruncationAndOverride` the monthly keys.

use crate::config::{EvaluationConfig, ExpectedSign, PostProcessing};
use crate::data::TimeSeriesTable;
use crate::error::{ForecastError, Result};
use crate::in_sample::{full_sample_r2, restricted_r2, AnnualInSample};
use crate::metrics::{cumulative_sse_difference, OutOfSampleMetrics};
use crate::plot::{dispatch, PlotHook, PlotMode, PlotSeries};
use crate::postprocess::PostProcessor;
use crate::recursive::{RecursiveForecaster, RecursiveRun};
use crate::result::{AnnualStatistics, MonthlyStatistics, ResultMapping, Statistics};
use crate::sample::LaggedSample;
use crate::utils::{present, to_percent};
use tracing::{debug, info, warn};

/// Target columns of an evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Level-scale target, e.g. the simple excess return
    pub level: String,
    /// Log-scale target; required when forecasts are post-processed
    pub log: Option<String>,
}

impl Target {
    pub fn level(name: &str) -> Self {
        Self {
            level: name.to_string(),
            log: None,
        }
    }

    pub fn with_log(mut self, name: &str) -> Self {
        self.log = Some(name.to_string());
        self
    }
}

/// Outcome of a successful evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    predictor: String,
    statistics: Statistics,
    mapping: ResultMapping,
    recorded_steps: usize,
    skipped_periods: Vec<i32>,
}

impl Evaluation {
    pub fn predictor(&self) -> &str {
        &self.predictor
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn mapping(&self) -> &ResultMapping {
        &self.mapping
    }

    pub fn into_mapping(self) -> ResultMapping {
        self.mapping
    }

    /// Recursive steps that entered the out-of-sample statistics
    pub fn recorded_steps(&self) -> usize {
        self.recorded_steps
    }

    /// Periods left out because their estimation window was degenerate
    pub fn skipped_periods(&self) -> &[i32] {
        &self.skipped_periods
    }
}

/// Evaluates predictors from one table under one configuration
pub struct Evaluator<'a> {
    table: &'a TimeSeriesTable,
    config: &'a EvaluationConfig,
    plot: PlotMode,
    hook: Option<&'a dyn PlotHook>,
}

impl<'a> Evaluator<'a> {
    pub fn new(table: &'a TimeSeriesTable, config: &'a EvaluationConfig) -> Self {
        Self {
            table,
            config,
            plot: PlotMode::No,
            hook: None,
        }
    }

    /// Attach a plot hook, called after each evaluation when `plot` is `Yes`
    pub fn with_plot(mut self, plot: PlotMode, hook: &'a dyn PlotHook) -> Self {
        self.plot = plot;
        self.hook = Some(hook);
        self
    }

    /// Evaluate one predictor against the target
    pub fn evaluate(&self, predictor: &str, target: &Target) -> Result<Evaluation> {
        self.check_inputs(predictor, target)?;

        info!("Evaluating {} as a predictor of {}", predictor, target.level);

        let sample = self.table.lagged_sample(
            predictor,
            &target.level,
            self.config.start,
            self.config.end,
        )?;
        let forecaster = RecursiveForecaster::new(self.config.est_periods_oos);

        let (statistics, run) = match self.config.post_processing {
            PostProcessing::NoPostProcessing => self.annual(&sample, &forecaster)?,
            PostProcessing::TruncationAndOverride { expected_sign } => {
                self.monthly(predictor, target, &sample, &forecaster, expected_sign)?
            }
        };

        if !run.skipped().is_empty() {
            debug!(
                "{}: {} recursive steps skipped for degenerate windows",
                predictor,
                run.skipped().len()
            );
        }

        let mapping = ResultMapping::assemble(&statistics);
        info!("{}: {} recursive forecasts aggregated", predictor, run.len());

        if self.plot.is_requested() {
            self.plot_run(predictor, &target.level, &run)?;
        }

        Ok(Evaluation {
            predictor: predictor.to_string(),
            statistics,
            mapping,
            recorded_steps: run.len(),
            skipped_periods: run.skipped().to_vec(),
        })
    }

    /// Evaluate several predictors independently; one failure does not affect the rest
    pub fn evaluate_many(&self, predictors: &[&str], target: &Target) -> Vec<(String, Result<Evaluation>)> {
        predictors
            .iter()
            .map(|&predictor| {
                let result = self.evaluate(predictor, target);
                if let Err(e) = &result {
                    warn!("Error analyzing {}: {}", predictor, e);
                }
                (predictor.to_string(), result)
            })
            .collect()
    }

    fn check_inputs(&self, predictor: &str, target: &Target) -> Result<()> {
        self.table.require_column(predictor)?;
        self.table.require_column(&target.level)?;

        if let PostProcessing::TruncationAndOverride { .. } = self.config.post_processing {
            let log = target.log.as_deref().ok_or_else(|| {
                ForecastError::InvalidParameter(
                    "Post-processed evaluation needs a log-scale target".to_string(),
                )
            })?;
            self.table.require_column(log)?;
        }

        self.config.validate()?;

        if self.table.frequency() != self.config.frequency {
            return Err(ForecastError::InvalidParameter(format!(
                "Configuration is {} but the table is {}",
                self.config.frequency,
                self.table.frequency()
            )));
        }

        Ok(())
    }

    fn annual(
        &self,
        sample: &LaggedSample,
        forecaster: &RecursiveForecaster,
    ) -> Result<(Statistics, RecursiveRun)> {
        let late_start = self.config.late_start.ok_or_else(|| {
            ForecastError::InvalidParameter(
                "Evaluation without post-processing needs a late sub-period start".to_string(),
            )
        })?;

        let in_sample = AnnualInSample::compute(sample, forecaster.est_periods(), late_start)?;

        let run = forecaster.run(sample)?;
        let metrics = OutOfSampleMetrics::evaluate(
            &run.model_forecasts(),
            &run.benchmark_forecasts(),
            &run.realized(),
        )?;

        let statistics = Statistics::Annual(AnnualStatistics {
            is_r2_full: to_percent(in_sample.full),
            is_r2_oos: to_percent(in_sample.oos_period),
            is_r2_late: to_percent(in_sample.late_period),
            oos_r2: to_percent(metrics.oos_r2),
            delta_rmse: to_percent(metrics.delta_rmse),
            mse_f: present(metrics.mse_f()?),
        });

        Ok((statistics, run))
    }

    fn monthly(
        &self,
        predictor: &str,
        target: &Target,
        sample: &LaggedSample,
        forecaster: &RecursiveForecaster,
        expected_sign: ExpectedSign,
    ) -> Result<(Statistics, RecursiveRun)> {
        let log_target = target.log.as_deref().ok_or_else(|| {
            ForecastError::InvalidParameter("Missing log-scale target".to_string())
        })?;
        let log_sample =
            self.table
                .lagged_sample(predictor, log_target, self.config.start, self.config.end)?;
        let processor = PostProcessor::new(expected_sign);

        let is_r2_log = full_sample_r2(&log_sample)?;
        let is_r2 = full_sample_r2(sample)?;
        let is_r2_trunc = restricted_r2(sample, &processor)?;

        let run = forecaster.run(sample)?;
        let benchmark = run.benchmark_forecasts();
        let realized = run.realized();

        let raw = OutOfSampleMetrics::evaluate(&run.model_forecasts(), &benchmark, &realized)?;
        let processed = processor.apply(run.steps());
        let restricted = OutOfSampleMetrics::evaluate(processed.forecasts(), &benchmark, &realized)?;

        let statistics = Statistics::Monthly(MonthlyStatistics {
            is_r2_log: to_percent(is_r2_log),
            is_r2: to_percent(is_r2),
            is_r2_trunc: to_percent(is_r2_trunc),
            oos_r2: to_percent(raw.oos_r2),
            share_truncated: to_percent(processed.truncated_share()?),
            share_overridden: to_percent(processed.overridden_share()?),
            oos_r2_trunc: to_percent(restricted.oos_r2),
            delta_rmse: to_percent(raw.delta_rmse),
        });

        Ok((statistics, run))
    }

    fn plot_run(&self, predictor: &str, target: &str, run: &RecursiveRun) -> Result<()> {
        let Some(hook) = self.hook else {
            debug!("Plot requested for {} but no hook is attached", predictor);
            return Ok(());
        };

        let model = run.model_forecasts();
        let benchmark = run.benchmark_forecasts();
        let realized = run.realized();
        let cumulative = cumulative_sse_difference(&model, &benchmark, &realized)?;

        let series = PlotSeries {
            predictor: predictor.to_string(),
            target: target.to_string(),
            periods: run.periods(),
            realized,
            model,
            benchmark,
            cumulative_sse_difference: cumulative,
        };
        dispatch(hook, &series);

        Ok(())
    }
}

/// Annual evaluation: in-sample R² over three periods, oR², dRMSE and MSE-F
///
/// A predictor that forecasts the target without error leaves MSE-F
/// undefined, so the whole evaluation fails with
/// [`ForecastError::UndefinedStatistic`].
pub fn evaluate_annual(
    table: &TimeSeriesTable,
    predictor: &str,
    target: &str,
    config: &EvaluationConfig,
    plot: PlotMode,
    hook: Option<&dyn PlotHook>,
) -> Result<ResultMapping> {
    if config.post_processing != PostProcessing::NoPostProcessing {
        return Err(ForecastError::InvalidParameter(
            "Annual evaluation does not post-process forecasts".to_string(),
        ));
    }

    let evaluator = match hook {
        Some(hook) => Evaluator::new(table, config).with_plot(plot, hook),
        None => Evaluator::new(table, config),
    };

    Ok(evaluator.evaluate(predictor, &Target::level(target))?.into_mapping())
}

/// Monthly evaluation: log and level in-sample R², raw and restricted oR²,
/// policy shares and dRMSE
pub fn evaluate_monthly(
    table: &TimeSeriesTable,
    predictor: &str,
    target: &str,
    log_target: &str,
    config: &EvaluationConfig,
    plot: PlotMode,
    hook: Option<&dyn PlotHook>,
) -> Result<ResultMapping> {
    if config.post_processing == PostProcessing::NoPostProcessing {
        return Err(ForecastError::InvalidParameter(
            "Monthly evaluation needs the truncation and override policies".to_string(),
        ));
    }

    let evaluator = match hook {
        Some(hook) => Evaluator::new(table, config).with_plot(plot, hook),
        None => Evaluator::new(table, config),
    };
    let target = Target::level(target).with_log(log_target);

    Ok(evaluator.evaluate(predictor, &target)?.into_mapping())
}
