//! Mean based predictors, kept as reference points for SlopeOne.

use hashbrown::HashMap;

use crate::io::{Item, ItemId, User};
use crate::predictor::{PredictionMap, Predictor};
use crate::ratings::RatingStore;

/// Predicts the user's own mean rating for every item.
pub struct UserMean;

impl Predictor for UserMean {
    fn predict(&self, users: &[User], items: &[Item], store: &RatingStore) -> PredictionMap {
        users
            .iter()
            .filter_map(|user| {
                store.user_mean(&user.id).map(|user_mean| {
                    let row: HashMap<ItemId, f64> =
                        items.iter().map(|item| (item.id, user_mean)).collect();
                    (user.id, row)
                })
            })
            .collect()
    }

    fn name(&self) -> String {
        "UserMean".to_string()
    }
}

/// User mean shifted by the item's average offset from its raters' means,
/// rounded to the nearest rating with ties to even.
pub struct BiasFromMean;

impl BiasFromMean {
    pub fn item_biases(store: &RatingStore) -> HashMap<ItemId, f64> {
        let user_means = store.user_means();
        store
            .group_by_item()
            .into_iter()
            .map(|(item_id, ratings)| {
                let sum_of_offsets: f64 = ratings
                    .iter()
                    .map(|rating| rating.value as f64 - user_means[&rating.user_id])
                    .sum();
                (item_id, sum_of_offsets / ratings.len() as f64)
            })
            .collect()
    }
}

impl Predictor for BiasFromMean {
    fn predict(&self, users: &[User], items: &[Item], store: &RatingStore) -> PredictionMap {
        let item_biases = Self::item_biases(store);
        users
            .iter()
            .filter_map(|user| {
                store.user_mean(&user.id).map(|user_mean| {
                    let row: HashMap<ItemId, f64> = items
                        .iter()
                        .map(|item| {
                            let bias = item_biases.get(&item.id).copied().unwrap_or_default();
                            (item.id, (user_mean + bias).round_ties_even())
                        })
                        .collect();
                    (user.id, row)
                })
            })
            .collect()
    }

    fn name(&self) -> String {
        "BiasFromMean".to_string()
    }
}
