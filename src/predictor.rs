use std::str::FromStr;

use hashbrown::HashMap;

use crate::baseline::{BiasFromMean, UserMean};
use crate::error::{Error, Result};
use crate::io::{Item, ItemId, User, UserId};
use crate::ratings::RatingStore;
use crate::slopeone::SlopeOne;

/// Predicted rating per user and item.
pub type PredictionMap = HashMap<UserId, HashMap<ItemId, f64>>;

pub trait Predictor {
    /// Predicts every catalog item for every user with at least one rating.
    fn predict(&self, users: &[User], items: &[Item], store: &RatingStore) -> PredictionMap;

    fn name(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictorKind {
    SlopeOne,
    UserMean,
    BiasFromMean,
}

impl PredictorKind {
    pub fn create(&self, parallel: bool) -> Box<dyn Predictor> {
        match self {
            PredictorKind::SlopeOne => Box::new(SlopeOne::new(parallel)),
            PredictorKind::UserMean => Box::new(UserMean),
            PredictorKind::BiasFromMean => Box::new(BiasFromMean),
        }
    }
}

impl FromStr for PredictorKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "slope_one" => Ok(PredictorKind::SlopeOne),
            "user_mean" => Ok(PredictorKind::UserMean),
            "bias_from_mean" => Ok(PredictorKind::BiasFromMean),
            other => Err(Error::Config(format!("unknown predictor: {}", other))),
        }
    }
}

pub fn lookup(predictions: &PredictionMap, user_id: UserId, item_id: ItemId) -> Result<f64> {
    predictions
        .get(&user_id)
        .and_then(|row| row.get(&item_id))
        .copied()
        .ok_or(Error::LookupMiss { user_id, item_id })
}

#[cfg(test)]
mod predictor_test {
    use super::*;

    #[test]
    fn should_create_predictors_by_name() {
        let kind: PredictorKind = "bias_from_mean".parse().unwrap();
        assert_eq!("BiasFromMean", kind.create(false).name());
        assert_eq!("SlopeOne", PredictorKind::SlopeOne.create(true).name());
        assert!("funk_svd".parse::<PredictorKind>().is_err());
    }

    #[test]
    fn should_report_the_missing_pair() {
        let mut predictions = PredictionMap::new();
        predictions.entry(1).or_default().insert(10, 3.5);

        assert_eq!(3.5, lookup(&predictions, 1, 10).unwrap());
        match lookup(&predictions, 1, 11) {
            Err(Error::LookupMiss { user_id, item_id }) => assert_eq!((1, 11), (user_id, item_id)),
            other => panic!("expected a lookup miss, got {:?}", other),
        }
        assert!(matches!(
            lookup(&predictions, 2, 10),
            Err(Error::LookupMiss { user_id: 2, item_id: 10 })
        ));
    }
}
