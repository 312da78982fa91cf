// Evaluates a few synthetic predictors the way the annual and monthly
// equity premium tables are evaluated
use premia_forecast::evaluation::Target;
use premia_forecast::{
    evaluate_annual, EvaluationConfig, Evaluator, Frequency, HookError, PlotMode, PlotSeries,
    TimeSeriesTable,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "premia_forecast=info".into()),
        )
        .init();

    let mut rng = StdRng::seed_from_u64(2008);

    println!("=== Annual predictors ===");
    let annual = annual_table(&mut rng)?;
    println!("{}", annual.summarize("equity_premium", 1927, 2005)?);

    let config = EvaluationConfig::annual();
    let plot = |series: &PlotSeries| -> Result<(), HookError> {
        let last = series.cumulative_sse_difference.last().copied().unwrap_or_default();
        println!(
            "  [plot] {} over {} forecasts, cumulative SSE difference {:.4}",
            series.predictor,
            series.periods.len(),
            last
        );
        Ok(())
    };

    for predictor in ["dp", "noise"] {
        let mapping = evaluate_annual(
            &annual,
            predictor,
            "equity_premium",
            &config,
            PlotMode::Yes,
            Some(&plot),
        )?;
        println!("{}:\n{}", predictor, mapping);
    }

    println!("=== Monthly predictors ===");
    let monthly = monthly_table(&mut rng)?;
    let config = EvaluationConfig::monthly();
    println!("Configuration:\n{}", config.to_json()?);

    let target = Target::level("equity_premium").with_log("log_equity_premium");
    let evaluator = Evaluator::new(&monthly, &config);
    for (predictor, result) in evaluator.evaluate_many(&["dp", "noise", "svar"], &target) {
        match result {
            Ok(evaluation) => println!("{}: {}", predictor, evaluation.mapping().to_json()?),
            Err(e) => println!("{}: not evaluated ({})", predictor, e),
        }
    }

    Ok(())
}

fn annual_table(rng: &mut StdRng) -> Result<TimeSeriesTable, Box<dyn std::error::Error>> {
    let periods: Vec<i32> = (1871..=2005).collect();
    let shock = Normal::new(0.0, 0.18)?;
    let innovation = Normal::new(0.0, 0.15)?;

    let mut dp = Vec::with_capacity(periods.len());
    let mut level = -3.3;
    for _ in &periods {
        level = -3.3 + 0.9 * (level + 3.3) + innovation.sample(rng);
        dp.push(level);
    }

    let premium = lagged(&dp, |x| 0.25 + 0.05 * x, &shock, rng);
    let noise = (0..periods.len()).map(|_| shock.sample(rng)).collect();

    Ok(TimeSeriesTable::from_columns(
        "yyyy",
        Frequency::Annual,
        periods,
        vec![("dp", dp), ("noise", noise), ("equity_premium", premium)],
    )?)
}

fn monthly_table(rng: &mut StdRng) -> Result<TimeSeriesTable, Box<dyn std::error::Error>> {
    let periods: Vec<i32> = (1926..=2005)
        .flat_map(|year| (1..=12).map(move |month| year * 100 + month))
        .collect();
    let shock = Normal::new(0.0, 0.055)?;
    let innovation = Normal::new(0.0, 0.04)?;

    let mut dp = Vec::with_capacity(periods.len());
    let mut level = -3.3;
    for _ in &periods {
        level = -3.3 + 0.99 * (level + 3.3) + innovation.sample(rng);
        dp.push(level);
    }

    let premium = lagged(&dp, |x| 0.02 + 0.004 * x, &shock, rng);
    let log_premium = premium.iter().map(|r| (1.0 + r).ln()).collect();
    let noise = (0..periods.len()).map(|_| shock.sample(rng)).collect();

    Ok(TimeSeriesTable::from_columns(
        "yyyymm",
        Frequency::Monthly,
        periods,
        vec![
            ("dp", dp),
            ("noise", noise),
            ("equity_premium", premium),
            ("log_equity_premium", log_premium),
        ],
    )?)
}

/// Target driven by the previous row of `x` plus a shock
fn lagged(x: &[f64], mean: impl Fn(f64) -> f64, shock: &Normal<f64>, rng: &mut StdRng) -> Vec<f64> {
    (0..x.len())
        .map(|i| {
            let base = if i == 0 { 0.0 } else { mean(x[i - 1]) };
            base + shock.sample(rng)
        })
        .collect()
}
