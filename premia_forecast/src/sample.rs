//! Aligned predictor/target observations
//!
//! Observation `i` pairs the target at period `t_i` with the predictor
//! observed one period earlier, so every slice of a [`LaggedSample`] is a
//! valid regression sample without further shifting.

use crate::error::{ForecastError, Result};
use premia_math::LinearFit;

#[derive(Debug, Clone, PartialEq)]
pub struct LaggedSample {
    /// Target periods, strictly increasing
    periods: Vec<i32>,
    /// Predictor value dated one period before the target
    predictor: Vec<f64>,
    target: Vec<f64>,
}

impl LaggedSample {
    pub fn new(periods: Vec<i32>, predictor: Vec<f64>, target: Vec<f64>) -> Result<Self> {
        if periods.len() != predictor.len() || periods.len() != target.len() {
            return Err(ForecastError::DataError(format!(
                "Sample columns differ in length: {} periods, {} predictor, {} target",
                periods.len(),
                predictor.len(),
                target.len()
            )));
        }

        if periods.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ForecastError::DataError(
                "Sample periods must be strictly increasing".to_string(),
            ));
        }

        Ok(Self {
            periods,
            predictor,
            target,
        })
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn periods(&self) -> &[i32] {
        &self.periods
    }

    pub fn predictor(&self) -> &[f64] {
        &self.predictor
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Sub-sample of observations `from..`
    pub fn tail_from(&self, from: usize) -> LaggedSample {
        let from = from.min(self.len());
        LaggedSample {
            periods: self.periods[from..].to_vec(),
            predictor: self.predictor[from..].to_vec(),
            target: self.target[from..].to_vec(),
        }
    }

    /// Sub-sample of observations whose target period is at or after `period`
    pub fn since(&self, period: i32) -> LaggedSample {
        let from = self.periods.partition_point(|&p| p < period);
        self.tail_from(from)
    }

    /// Same periods and predictor, different target
    pub fn with_target(&self, target: Vec<f64>) -> Result<LaggedSample> {
        LaggedSample::new(self.periods.clone(), self.predictor.clone(), target)
    }

    /// Regress the target on the lagged predictor over the whole sample
    pub fn fit(&self) -> Result<LinearFit> {
        Ok(LinearFit::fit(&self.predictor, &self.target)?)
    }
}
