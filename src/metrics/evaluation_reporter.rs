use std::fmt;

use crate::error::{Error, Result};
use crate::metrics::mae::Mae;
use crate::metrics::nmae::Nmae;
use crate::metrics::rmse::Rmse;
use crate::metrics::{round4, RatingMetric};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub mae: f64,
    pub rmse: f64,
    pub nmae: f64,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4},{:.4}", self.mae, self.rmse, self.nmae)
    }
}

#[derive(Default)]
pub struct EvaluationReporter {
    mae: Mae,
    rmse: Rmse,
    nmae: Nmae,
    qty: usize,
}

impl EvaluationReporter {
    pub fn new() -> EvaluationReporter {
        EvaluationReporter::default()
    }

    pub fn add(&mut self, predicted: f64, actual: f64) {
        self.mae.add(predicted, actual);
        self.rmse.add(predicted, actual);
        self.nmae.add(predicted, actual);
        self.qty += 1;
    }

    pub fn qty(&self) -> usize {
        self.qty
    }

    pub fn result(&self) -> Result<Evaluation> {
        Ok(Evaluation {
            mae: round4(self.mae.result()?),
            rmse: round4(self.rmse.result()?),
            nmae: round4(self.nmae.result()?),
        })
    }

    pub fn get_name(&self) -> String {
        format!(
            "{},{},{}",
            self.mae.get_name(),
            self.rmse.get_name(),
            self.nmae.get_name()
        )
    }
}

/// MAE, RMSE and NMAE of paired predicted and actual values.
pub fn evaluate(predicted: &[f64], actual: &[f64]) -> Result<Evaluation> {
    if predicted.len() != actual.len() {
        return Err(Error::InvalidInput(format!(
            "{} predictions for {} actual values",
            predicted.len(),
            actual.len()
        )));
    }
    if predicted.is_empty() {
        return Err(Error::InvalidInput("nothing to evaluate".to_string()));
    }
    let mut reporter = EvaluationReporter::new();
    for (prediction, truth) in predicted.iter().zip(actual) {
        reporter.add(*prediction, *truth);
    }
    reporter.result()
}
