use std::time::Instant;

use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;

use crate::io::{Item, ItemId, User, UserId};
use crate::predictor::{PredictionMap, Predictor};
use crate::ratings::RatingStore;
use crate::slopeone::deviation::DeviationMatrix;
use crate::slopeone::relevance::RelevanceResolver;

pub mod deviation;
pub mod relevance;

pub struct SlopeOne {
    parallel: bool,
}

impl SlopeOne {
    pub fn new(parallel: bool) -> Self {
        SlopeOne { parallel }
    }

    pub fn fit(&self, store: &RatingStore) -> SlopeOneModel {
        let matrix = if self.parallel {
            DeviationMatrix::build_parallel(store)
        } else {
            DeviationMatrix::build(store)
        };
        SlopeOneModel { matrix }
    }
}

impl Predictor for SlopeOne {
    fn predict(&self, users: &[User], items: &[Item], store: &RatingStore) -> PredictionMap {
        let model = self.fit(store);
        if self.parallel {
            model.predict_all_parallel(users, items, store)
        } else {
            model.predict_all(users, items, store)
        }
    }

    fn name(&self) -> String {
        "SlopeOne".to_string()
    }
}

/// A fitted model; the deviation matrix is not modified after `fit`.
pub struct SlopeOneModel {
    matrix: DeviationMatrix,
}

impl SlopeOneModel {
    pub fn matrix(&self) -> &DeviationMatrix {
        &self.matrix
    }

    /// Prediction row of one user, `None` when the user has no ratings.
    ///
    /// Unrated items with a non-empty relevance set get the user mean plus
    /// the plain average of `dev[item][i]` over that set. Everything else,
    /// including the items the user already rated, gets the mean.
    pub fn predict_user(
        &self,
        store: &RatingStore,
        user_id: &UserId,
        items: &[Item],
    ) -> Option<HashMap<ItemId, f64>> {
        let user_mean = store.user_mean(user_id)?;
        let rated_items: Vec<ItemId> = store
            .ratings_of(user_id)
            .iter()
            .map(|rating| rating.item_id)
            .collect();
        let already_rated: HashSet<ItemId> = rated_items.iter().copied().collect();
        let resolver = RelevanceResolver::new(&self.matrix);

        let mut row = HashMap::with_capacity(items.len());
        for item in items {
            let mut prediction = user_mean;
            if !already_rated.contains(&item.id) {
                let relevant = resolver.relevant_deviations(&rated_items, &item.id);
                if !relevant.is_empty() {
                    let sum_of_deviations: f64 =
                        relevant.iter().map(|(_rated_item, deviation)| deviation).sum();
                    prediction += sum_of_deviations / relevant.len() as f64;
                }
            }
            row.insert(item.id, prediction);
        }
        Some(row)
    }

    pub fn predict_all(&self, users: &[User], items: &[Item], store: &RatingStore) -> PredictionMap {
        let start_time = Instant::now();
        let predictions: PredictionMap = users
            .iter()
            .filter_map(|user| {
                self.predict_user(store, &user.id, items)
                    .map(|row| (user.id, row))
            })
            .collect();
        log::info!(
            "predicted {} items for {} users:{} micros",
            items.len(),
            predictions.len(),
            start_time.elapsed().as_micros()
        );
        predictions
    }

    pub fn predict_all_parallel(
        &self,
        users: &[User],
        items: &[Item],
        store: &RatingStore,
    ) -> PredictionMap {
        let start_time = Instant::now();
        let predictions: PredictionMap = users
            .par_iter()
            .filter_map(|user| {
                self.predict_user(store, &user.id, items)
                    .map(|row| (user.id, row))
            })
            .collect();
        log::info!(
            "predicted (parallel) {} items for {} users:{} micros",
            items.len(),
            predictions.len(),
            start_time.elapsed().as_micros()
        );
        predictions
    }
}
