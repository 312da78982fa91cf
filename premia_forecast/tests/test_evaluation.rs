use approx::assert_relative_eq;
use premia_forecast::result::keys;
use premia_forecast::{
    evaluate_annual, evaluate_monthly, EvaluationConfig, Evaluator, ExpectedSign, ForecastError,
    Frequency, HookError, PlotMode, PlotSeries, PostProcessing, Target, TimeSeriesTable,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::cell::{Cell, RefCell};

fn monthly_periods(n: usize) -> Vec<i32> {
    (0..n as i32)
        .map(|i| (1990 + i / 12) * 100 + i % 12 + 1)
        .collect()
}

fn varied_predictor(n: usize) -> Vec<f64> {
    (0..n).map(|i| ((i * 7) % 11) as f64 + 1.0).collect()
}

/// Target at row `i` driven by the predictor at row `i - 1`
fn lagged_target(x: &[f64], f: impl Fn(f64, usize) -> f64) -> Vec<f64> {
    (0..x.len())
        .map(|i| if i == 0 { 0.0 } else { f(x[i - 1], i) })
        .collect()
}

fn monthly_table(x: Vec<f64>, y: Vec<f64>) -> TimeSeriesTable {
    let log_y = y.iter().map(|v| v / 2.0).collect();
    TimeSeriesTable::from_columns(
        "yyyymm",
        Frequency::Monthly,
        monthly_periods(x.len()),
        vec![("dp", x), ("equity_premium", y), ("log_equity_premium", log_y)],
    )
    .unwrap()
}

fn monthly_config(table: &TimeSeriesTable, est_periods: usize) -> EvaluationConfig {
    let periods = table.periods();
    EvaluationConfig::monthly()
        .with_range(periods[0], periods[periods.len() - 1])
        .with_est_periods(est_periods)
}

fn noisy_annual_table(seed: u64) -> TimeSeriesTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.05).unwrap();

    let x: Vec<f64> = (0..60).map(|_| rng.gen_range(0.0..1.0)).collect();
    let y: Vec<f64> = (0..60)
        .map(|i| {
            let e = noise.sample(&mut rng);
            if i == 0 {
                e
            } else {
                0.02 + 0.1 * x[i - 1] + e
            }
        })
        .collect();

    TimeSeriesTable::from_columns(
        "yyyy",
        Frequency::Annual,
        (1940..2000).collect(),
        vec![("dp", x), ("equity_premium", y), ("flat", vec![0.5; 60])],
    )
    .unwrap()
}

fn annual_config() -> EvaluationConfig {
    EvaluationConfig::annual()
        .with_range(1941, 1999)
        .with_est_periods(20)
        .with_late_start(Some(1970))
}

#[test]
fn test_perfect_linear_relation() {
    let x = varied_predictor(40);
    let y = lagged_target(&x, |x, _| 2.0 + 3.0 * x);
    let table = monthly_table(x, y);
    let config = monthly_config(&table, 10);

    let mapping = evaluate_monthly(
        &table,
        "dp",
        "equity_premium",
        "log_equity_premium",
        &config,
        PlotMode::No,
        None,
    )
    .unwrap();

    assert_eq!(mapping.keys().collect::<Vec<_>>(), keys::MONTHLY.to_vec());
    assert_relative_eq!(mapping.get(keys::IS_R2_HEAD).unwrap(), 100.0, epsilon = 1e-9);
    assert_relative_eq!(mapping.get(keys::IS_R2_HEAD_TRUNC).unwrap(), 100.0, epsilon = 1e-9);
    assert_relative_eq!(mapping.get(keys::OOS_R2_HEAD).unwrap(), 100.0, epsilon = 1e-9);
    assert_relative_eq!(mapping.get(keys::OOS_R2_HEAD_TRUNC).unwrap(), 100.0, epsilon = 1e-9);
    assert!(mapping.get(keys::D_RMSE).unwrap() > 0.0);

    // Positive benchmark and positive slope: neither policy fires
    assert_eq!(mapping.get(keys::SHARE_T), Some(0.0));
    assert_eq!(mapping.get(keys::SHARE_U), Some(0.0));
}

#[test]
fn test_every_forecast_restricted() {
    // Negative targets and a negative slope against an expected positive sign
    let x = varied_predictor(36);
    let y = lagged_target(&x, |x, _| -1.0 - 0.5 * x);
    let table = monthly_table(x, y);
    let config = monthly_config(&table, 12);

    let mapping = evaluate_monthly(
        &table,
        "dp",
        "equity_premium",
        "log_equity_premium",
        &config,
        PlotMode::No,
        None,
    )
    .unwrap();

    assert_eq!(mapping.get(keys::SHARE_T), Some(100.0));
    assert_eq!(mapping.get(keys::SHARE_U), Some(100.0));

    // The raw model is exact, so restricting it can only hurt
    assert_relative_eq!(mapping.get(keys::OOS_R2_HEAD).unwrap(), 100.0, epsilon = 1e-9);
    assert!(mapping.get(keys::OOS_R2_HEAD_TRUNC).unwrap() < 100.0);
}

#[test]
fn test_expected_negative_sign_keeps_forecasts() {
    let x = varied_predictor(36);
    let y = lagged_target(&x, |x, _| 20.0 - 0.5 * x);
    let table = monthly_table(x, y);
    let config = monthly_config(&table, 12).with_post_processing(
        PostProcessing::TruncationAndOverride {
            expected_sign: ExpectedSign::Negative,
        },
    );

    let mapping = evaluate_monthly(
        &table,
        "dp",
        "equity_premium",
        "log_equity_premium",
        &config,
        PlotMode::No,
        None,
    )
    .unwrap();

    assert_eq!(mapping.get(keys::SHARE_T), Some(0.0));
    assert_eq!(mapping.get(keys::SHARE_U), Some(0.0));
}

#[test]
fn test_annual_noisy_predictor() {
    let table = noisy_annual_table(7);
    let mapping = evaluate_annual(
        &table,
        "dp",
        "equity_premium",
        &annual_config(),
        PlotMode::No,
        None,
    )
    .unwrap();

    assert_eq!(mapping.keys().collect::<Vec<_>>(), keys::ANNUAL.to_vec());

    for (key, value) in mapping.iter() {
        assert!(value.is_finite(), "{} is not finite", key);
        // Two decimals at most
        assert_relative_eq!(value * 100.0, (value * 100.0).round(), epsilon = 1e-6);
    }

    let full = mapping.get(keys::IS_R2_HEAD_1927).unwrap();
    assert!((0.0..=100.0).contains(&full));

    // oR² and MSE-F share the sign of MSE_N - MSE_A
    let oos = mapping.get(keys::OOS_OR2).unwrap();
    let mse_f = mapping.get(keys::MSE_F).unwrap();
    assert!(oos * mse_f >= 0.0);
}

#[test]
fn test_repeated_evaluations_agree() {
    let table = noisy_annual_table(11);
    let config = annual_config();

    let first = evaluate_annual(&table, "dp", "equity_premium", &config, PlotMode::No, None);
    let second = evaluate_annual(&table, "dp", "equity_premium", &config, PlotMode::No, None);
    assert_eq!(first.unwrap(), second.unwrap());
}

#[test]
fn test_missing_column() {
    let table = noisy_annual_table(3);
    let result = evaluate_annual(&table, "b/m", "equity_premium", &annual_config(), PlotMode::No, None);
    assert!(matches!(result, Err(ForecastError::MissingColumn(ref name)) if name == "b/m"));

    let x = varied_predictor(30);
    let y = lagged_target(&x, |x, _| 0.1 * x);
    let table = monthly_table(x, y);
    let result = evaluate_monthly(
        &table,
        "dp",
        "equity_premium",
        "crsp_log",
        &monthly_config(&table, 10),
        PlotMode::No,
        None,
    );
    assert!(matches!(result, Err(ForecastError::MissingColumn(ref name)) if name == "crsp_log"));
}

#[test]
fn test_estimation_period_covering_sample() {
    let x = varied_predictor(25);
    let y = lagged_target(&x, |x, i| 0.5 + 0.2 * x + 0.1 * (i as f64 * 1.3).sin());
    let table = monthly_table(x, y);

    // 24 lagged observations; no step is left to forecast
    let result = evaluate_monthly(
        &table,
        "dp",
        "equity_premium",
        "log_equity_premium",
        &monthly_config(&table, 24),
        PlotMode::No,
        None,
    );
    assert!(matches!(result, Err(ForecastError::UndefinedStatistic(_))));

    let result = evaluate_monthly(
        &table,
        "dp",
        "equity_premium",
        "log_equity_premium",
        &monthly_config(&table, 23),
        PlotMode::No,
        None,
    );
    assert!(result.is_ok());
}

#[test]
fn test_annual_estimation_period_too_long() {
    let table = noisy_annual_table(5);
    let config = annual_config().with_est_periods(59);
    let result = evaluate_annual(&table, "dp", "equity_premium", &config, PlotMode::No, None);
    assert!(matches!(result, Err(ForecastError::DegenerateInput(_))));
}

#[test]
fn test_exact_annual_predictor_has_undefined_mse_f() {
    let x = varied_predictor(40);
    let y = lagged_target(&x, |x, _| 2.0 + 3.0 * x);
    let table = TimeSeriesTable::from_columns(
        "yyyy",
        Frequency::Annual,
        (1960..2000).collect(),
        vec![("dp", x), ("equity_premium", y)],
    )
    .unwrap();

    let config = EvaluationConfig::annual()
        .with_range(1961, 1999)
        .with_est_periods(10)
        .with_late_start(Some(1980));

    let result = evaluate_annual(&table, "dp", "equity_premium", &config, PlotMode::No, None);
    assert!(matches!(result, Err(ForecastError::UndefinedStatistic(_))));
}

#[test]
fn test_degenerate_initial_windows_are_skipped() {
    // Predictor flat for the first six years
    let x: Vec<f64> = (0..30)
        .map(|i| if i < 6 { 1.0 } else { 2.0 + ((i * 5) % 7) as f64 })
        .collect();
    let y = lagged_target(&x, |x, i| 0.01 + 0.05 * x + 0.01 * (i as f64 * 1.7).sin());
    let table = TimeSeriesTable::from_columns(
        "yyyy",
        Frequency::Annual,
        (1970..2000).collect(),
        vec![("dp", x), ("equity_premium", y)],
    )
    .unwrap();

    let config = EvaluationConfig::annual()
        .with_range(1971, 1999)
        .with_est_periods(4)
        .with_late_start(Some(1985));

    let evaluation = Evaluator::new(&table, &config)
        .evaluate("dp", &Target::level("equity_premium"))
        .unwrap();

    assert_eq!(evaluation.skipped_periods(), &[1975, 1976, 1977]);
    assert_eq!(evaluation.recorded_steps(), 29 - 4 - 3);
    assert_eq!(evaluation.mapping().len(), 6);
}

#[test]
fn test_plot_hook_does_not_change_results() {
    let table = noisy_annual_table(13);
    let config = annual_config();
    let plain = evaluate_annual(&table, "dp", "equity_premium", &config, PlotMode::No, None).unwrap();

    let received = RefCell::new(None);
    let recording = |series: &PlotSeries| -> Result<(), HookError> {
        *received.borrow_mut() = Some(series.clone());
        Ok(())
    };
    let plotted = evaluate_annual(
        &table,
        "dp",
        "equity_premium",
        &config,
        PlotMode::Yes,
        Some(&recording),
    )
    .unwrap();
    assert_eq!(plotted, plain);

    let series = received.into_inner().unwrap();
    assert_eq!(series.predictor, "dp");
    assert_eq!(series.periods.len(), 59 - 20);
    assert_eq!(series.cumulative_sse_difference.len(), series.periods.len());
    assert_eq!(series.periods[0], 1961);

    let failing = |_: &PlotSeries| -> Result<(), HookError> { Err("display unavailable".into()) };
    let result = evaluate_annual(
        &table,
        "dp",
        "equity_premium",
        &config,
        PlotMode::Yes,
        Some(&failing),
    );
    assert_eq!(result.unwrap(), plain);

    let panicking = |_: &PlotSeries| -> Result<(), HookError> { panic!("renderer crashed") };
    let result = evaluate_annual(
        &table,
        "dp",
        "equity_premium",
        &config,
        PlotMode::Yes,
        Some(&panicking),
    );
    assert_eq!(result.unwrap(), plain);
}

#[test]
fn test_plot_hook_not_called_without_request() {
    let table = noisy_annual_table(13);
    let calls = Cell::new(0);
    let counting = |_: &PlotSeries| -> Result<(), HookError> {
        calls.set(calls.get() + 1);
        Ok(())
    };

    evaluate_annual(
        &table,
        "dp",
        "equity_premium",
        &annual_config(),
        PlotMode::No,
        Some(&counting),
    )
    .unwrap();
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_evaluate_many_isolates_failures() {
    let table = noisy_annual_table(17);
    let config = annual_config();
    let evaluator = Evaluator::new(&table, &config);
    let target = Target::level("equity_premium");

    let results = evaluator.evaluate_many(&["dp", "b/m", "flat"], &target);
    assert_eq!(results.len(), 3);

    let (name, dp) = &results[0];
    assert_eq!(name, "dp");
    let alone = evaluator.evaluate("dp", &target).unwrap();
    assert_eq!(dp.as_ref().unwrap(), &alone);

    assert!(matches!(results[1].1, Err(ForecastError::MissingColumn(_))));
    assert!(matches!(results[2].1, Err(ForecastError::DegenerateInput(_))));
}

#[test]
fn test_mismatched_configuration() {
    let table = noisy_annual_table(19);

    // Monthly configuration against an annual table
    let result = Evaluator::new(&table, &EvaluationConfig::monthly())
        .evaluate("dp", &Target::level("equity_premium").with_log("equity_premium"));
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));

    // Annual entry point refuses post-processing
    let config = annual_config().with_post_processing(PostProcessing::TruncationAndOverride {
        expected_sign: ExpectedSign::Positive,
    });
    let result = evaluate_annual(&table, "dp", "equity_premium", &config, PlotMode::No, None);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));

    // Post-processing without a log target
    let result = Evaluator::new(&table, &config).evaluate("dp", &Target::level("equity_premium"));
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}
