//! Time-indexed tables of predictor and target variables

use crate::config::Frequency;
use crate::error::{ForecastError, Result};
use crate::sample::LaggedSample;
use crate::utils::period_start;
use polars::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::debug;

/// A table of named numeric columns indexed by integer period keys
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    /// Data frame holding the index column and the variables
    df: DataFrame,
    /// Name of the period-key column
    index_column: String,
    frequency: Frequency,
    /// Period keys in table order, strictly increasing
    periods: Vec<i32>,
}

impl TimeSeriesTable {
    /// Wrap an existing DataFrame whose `index_column` holds period keys
    pub fn from_dataframe(df: DataFrame, index_column: &str, frequency: Frequency) -> Result<Self> {
        let periods = Self::extract_periods(&df, index_column, frequency)?;

        Ok(Self {
            df,
            index_column: index_column.to_string(),
            frequency,
            periods,
        })
    }

    /// Build a table from period keys and named value columns
    pub fn from_columns(
        index_column: &str,
        frequency: Frequency,
        periods: Vec<i32>,
        columns: Vec<(&str, Vec<f64>)>,
    ) -> Result<Self> {
        let mut series = Vec::with_capacity(columns.len() + 1);
        series.push(Series::new(index_column, periods));
        for (name, values) in columns {
            series.push(Series::new(name, values));
        }

        let df = DataFrame::new(series)?;
        Self::from_dataframe(df, index_column, frequency)
    }

    fn extract_periods(df: &DataFrame, index_column: &str, frequency: Frequency) -> Result<Vec<i32>> {
        let column = df
            .column(index_column)
            .map_err(|_| ForecastError::MissingColumn(index_column.to_string()))?;

        if !column.dtype().is_numeric() {
            return Err(ForecastError::DataError(format!(
                "Index column {} must hold integer period keys, found {}",
                index_column,
                column.dtype()
            )));
        }

        let keys = column.cast(&DataType::Int64)?;
        let mut periods = Vec::with_capacity(keys.len());

        for key in keys.i64()?.into_iter() {
            let key = key.ok_or_else(|| {
                ForecastError::DataError(format!("Index column {} contains nulls", index_column))
            })?;
            let key = i32::try_from(key).map_err(|_| {
                ForecastError::DataError(format!("Period key {} is out of range", key))
            })?;
            period_start(key, frequency).map_err(|_| {
                ForecastError::DataError(format!("{} is not a {} period key", key, frequency))
            })?;
            periods.push(key);
        }

        if let Some(w) = periods.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ForecastError::DataError(format!(
                "Index must be strictly increasing: {} is followed by {}",
                w[0], w[1]
            )));
        }

        Ok(periods)
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn index_column(&self) -> &str {
        &self.index_column
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn periods(&self) -> &[i32] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        name != self.index_column && self.df.get_column_names().contains(&name)
    }

    /// Fail with [`ForecastError::MissingColumn`] unless `name` is a value column
    pub fn require_column(&self, name: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(ForecastError::MissingColumn(name.to_string()))
        }
    }

    /// Column values in table order; nulls and NaNs become `None`
    pub fn column_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        self.require_column(name)?;
        let column = self.df.column(name)?;

        if !column.dtype().is_numeric() {
            return Err(ForecastError::DataError(format!(
                "Column {} is not numeric ({})",
                name,
                column.dtype()
            )));
        }

        let values = column.cast(&DataType::Float64)?;
        let values = values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();

        Ok(values)
    }

    /// Pair each target observation in `[start, end]` with the predictor
    /// value from the preceding row.
    ///
    /// The predictor row just before `start` is used when the table has it.
    pub fn lagged_sample(
        &self,
        predictor: &str,
        target: &str,
        start: i32,
        end: i32,
    ) -> Result<LaggedSample> {
        let x = self.column_values(predictor)?;
        let y = self.column_values(target)?;

        let mut periods = Vec::new();
        let mut xs = Vec::new();
        let mut ys = Vec::new();

        for (i, &period) in self.periods.iter().enumerate() {
            if period < start || period > end {
                continue;
            }

            if i == 0 {
                debug!("No predictor observation precedes {}, skipping it", period);
                continue;
            }

            let x_lag = x[i - 1].ok_or_else(|| {
                ForecastError::DataError(format!(
                    "{} is missing at {}",
                    predictor,
                    self.periods[i - 1]
                ))
            })?;
            let y_now = y[i].ok_or_else(|| {
                ForecastError::DataError(format!("{} is missing at {}", target, period))
            })?;

            periods.push(period);
            xs.push(x_lag);
            ys.push(y_now);
        }

        LaggedSample::new(periods, xs, ys)
    }

    /// Descriptive statistics of a column over `[start, end]`.
    ///
    /// Null and NaN values are skipped. At least two observations must
    /// remain for the sample standard deviation, otherwise this fails with
    /// [`ForecastError::DataError`].
    pub fn summarize(&self, column: &str, start: i32, end: i32) -> Result<SeriesSummary> {
        self.require_column(column)?;

        let index = self.index_column.as_str();
        let window = self
            .df
            .clone()
            .lazy()
            .filter(col(index).gt_eq(lit(start)).and(col(index).lt_eq(lit(end))))
            .select([
                col(index).cast(DataType::Int64),
                col(column).cast(DataType::Float64),
            ])
            .collect()?;

        let periods: Vec<i64> = window.column(index)?.i64()?.into_iter().flatten().collect();
        let values: Vec<f64> = window
            .column(column)?
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();

        let (first_period, last_period) = match (periods.first(), periods.last()) {
            (Some(&first), Some(&last)) if !values.is_empty() => (first as i32, last as i32),
            _ => {
                return Err(ForecastError::DataError(format!(
                    "{} has no observations between {} and {}",
                    column, start, end
                )))
            }
        };

        if values.len() < 2 {
            return Err(ForecastError::DataError(format!(
                "{} has a single observation between {} and {}, need 2 for a standard deviation",
                column, start, end
            )));
        }

        Ok(SeriesSummary {
            column: column.to_string(),
            observations: values.len(),
            first_period,
            last_period,
            mean: values.iter().mean(),
            std_dev: values.iter().std_dev(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Descriptive statistics of one column over a period range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub column: String,
    pub observations: usize,
    pub first_period: i32,
    pub last_period: i32,
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({} observations, {} - {}):", self.column, self.observations, self.first_period, self.last_period)?;
        writeln!(f, "  Mean: {:.4}", self.mean)?;
        writeln!(f, "  Std:  {:.4}", self.std_dev)?;
        writeln!(f, "  Min:  {:.4}", self.min)?;
        writeln!(f, "  Max:  {:.4}", self.max)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lagged_sample_uses_row_before_start() {
        let table = TimeSeriesTable::from_columns(
            "yyyy",
            Frequency::Annual,
            vec![2000, 2001, 2002, 2003],
            vec![
                ("dp", vec![10.0, 11.0, 12.0, 13.0]),
                ("equity_premium", vec![0.0, 0.1, 0.2, 0.3]),
            ],
        )
        .unwrap();

        let sample = table.lagged_sample("dp", "equity_premium", 2001, 2002).unwrap();
        assert_eq!(sample.periods(), &[2001, 2002]);
        assert_eq!(sample.predictor(), &[10.0, 11.0]);
        assert_eq!(sample.target(), &[0.1, 0.2]);

        // The first table row has no earlier predictor value
        let sample = table.lagged_sample("dp", "equity_premium", 1990, 2010).unwrap();
        assert_eq!(sample.periods(), &[2001, 2002, 2003]);
    }

    #[test]
    fn test_missing_values_are_reported() {
        let table = TimeSeriesTable::from_columns(
            "yyyy",
            Frequency::Annual,
            vec![2000, 2001, 2002],
            vec![("dp", vec![1.0, f64::NAN, 2.0]), ("ep", vec![0.0, 0.1, 0.2])],
        )
        .unwrap();

        assert!(matches!(
            table.lagged_sample("dp", "ep", 2001, 2002),
            Err(ForecastError::DataError(_))
        ));
        // The NaN lies outside the lag structure of this range
        assert!(table.lagged_sample("dp", "ep", 2001, 2001).is_ok());
    }

    #[test]
    fn test_index_must_increase() {
        let result = TimeSeriesTable::from_columns(
            "yyyy",
            Frequency::Annual,
            vec![2000, 2002, 2001],
            vec![("dp", vec![1.0, 2.0, 3.0])],
        );
        assert!(matches!(result, Err(ForecastError::DataError(_))));

        let duplicate = TimeSeriesTable::from_columns(
            "yyyy",
            Frequency::Annual,
            vec![2000, 2000],
            vec![("dp", vec![1.0, 2.0])],
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_monthly_keys_are_validated() {
        let result = TimeSeriesTable::from_columns(
            "yyyymm",
            Frequency::Monthly,
            vec![200011, 200012, 200013],
            vec![("dp", vec![1.0, 2.0, 3.0])],
        );
        assert!(matches!(result, Err(ForecastError::DataError(_))));
    }

    #[test]
    fn test_columns() {
        let table = TimeSeriesTable::from_columns(
            "yyyy",
            Frequency::Annual,
            vec![2000, 2001],
            vec![("dp", vec![1.0, 2.0])],
        )
        .unwrap();

        assert!(table.has_column("dp"));
        assert!(!table.has_column("yyyy"));
        assert!(matches!(
            table.require_column("b/m"),
            Err(ForecastError::MissingColumn(ref name)) if name == "b/m"
        ));
        assert_eq!(table.column_values("dp").unwrap(), vec![Some(1.0), Some(2.0)]);
    }
}
