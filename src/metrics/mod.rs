use crate::error::Result;

pub mod evaluation_reporter;
pub mod mae;
pub mod nmae;
pub mod rmse;

pub use evaluation_reporter::{evaluate, Evaluation, EvaluationReporter};

pub trait RatingMetric {
    fn add(&mut self, predicted: f64, actual: f64);
    fn result(&self) -> Result<f64>;
    fn get_name(&self) -> String;
}

/// Rounds to the 4 decimal digits used when reporting metrics.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
