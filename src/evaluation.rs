use std::str::FromStr;

use crate::error::{Error, Result};
use crate::io::Rating;
use crate::metrics::{Evaluation, EvaluationReporter};
use crate::predictor::{lookup, PredictionMap};

/// What to do with a held-out rating that has no prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissPolicy {
    Abort,
    Skip,
}

impl FromStr for MissPolicy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "abort" => Ok(MissPolicy::Abort),
            "skip" => Ok(MissPolicy::Skip),
            other => Err(Error::Config(format!(
                "unknown policy for missing predictions: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldOutEvaluation {
    pub evaluation: Evaluation,
    pub qty_evaluated: usize,
    pub qty_skipped: usize,
}

/// Scores the predictions against held-out ratings. Predictions are rounded
/// to the nearest integer rating first when `round_predictions` is set, ties
/// going to the even rating.
pub fn evaluate_held_out(
    predictions: &PredictionMap,
    test_ratings: &[Rating],
    policy: MissPolicy,
    round_predictions: bool,
) -> Result<HeldOutEvaluation> {
    let mut reporter = EvaluationReporter::new();
    let mut qty_skipped = 0;

    for rating in test_ratings {
        let prediction = match lookup(predictions, rating.user_id, rating.item_id) {
            Ok(prediction) => prediction,
            Err(miss) if policy == MissPolicy::Skip => {
                log::warn!("skipping held-out rating: {}", miss);
                qty_skipped += 1;
                continue;
            }
            Err(miss) => return Err(miss),
        };
        let prediction = if round_predictions {
            prediction.round_ties_even()
        } else {
            prediction
        };
        reporter.add(prediction, rating.value as f64);
    }

    if reporter.qty() == 0 {
        return Err(Error::InvalidInput(
            "no held-out rating could be evaluated".to_string(),
        ));
    }
    Ok(HeldOutEvaluation {
        evaluation: reporter.result()?,
        qty_evaluated: reporter.qty(),
        qty_skipped,
    })
}
