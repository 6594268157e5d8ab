use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use itertools::Itertools;
use rayon::prelude::*;

use crate::io::{ItemId, Rating, RatingValue, Timestamp, UserId};

pub struct RatingDataStats {
    pub descriptive_name: String,
    pub qty_records: usize,
    pub qty_unique_user_ids: usize,
    pub qty_unique_item_ids: usize,
    pub mean_rating: Option<f64>,
    pub rating_histogram: BTreeMap<RatingValue, usize>,
    pub min_time_date_time: Option<NaiveDateTime>,
    pub max_time_date_time: Option<NaiveDateTime>,
}

fn to_date_time(timestamp: Timestamp) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(timestamp, 0).map(|date_time| date_time.naive_utc())
}

pub fn determine_rating_data_statistics(
    descriptive_name: &str,
    ratings: &[Rating],
) -> RatingDataStats {
    let qty_records = ratings.len();

    let mut user_ids: Vec<UserId> = ratings.par_iter().map(|rating| rating.user_id).collect();
    user_ids.par_sort_unstable();
    user_ids.dedup();

    let mut item_ids: Vec<ItemId> = ratings.par_iter().map(|rating| rating.item_id).collect();
    item_ids.par_sort_unstable();
    item_ids.dedup();

    let sum_of_values: i64 = ratings.par_iter().map(|rating| rating.value as i64).sum();
    let mean_rating = if qty_records > 0 {
        Some(sum_of_values as f64 / qty_records as f64)
    } else {
        None
    };

    let rating_histogram: BTreeMap<RatingValue, usize> = ratings
        .iter()
        .map(|rating| rating.value)
        .counts()
        .into_iter()
        .collect();

    let min_time = ratings.par_iter().map(|rating| rating.timestamp).min();
    let max_time = ratings.par_iter().map(|rating| rating.timestamp).max();
    let min_time_date_time = min_time.and_then(to_date_time);
    let max_time_date_time = max_time.and_then(to_date_time);

    let stats = RatingDataStats {
        descriptive_name: descriptive_name.to_string(),
        qty_records,
        qty_unique_user_ids: user_ids.len(),
        qty_unique_item_ids: item_ids.len(),
        mean_rating,
        rating_histogram,
        min_time_date_time,
        max_time_date_time,
    };
    stats.log();
    stats
}

impl RatingDataStats {
    fn log(&self) {
        log::info!("Loaded {}", self.descriptive_name);
        log::info!("\tRatings: {}", self.qty_records);
        log::info!("\tUsers: {}", self.qty_unique_user_ids);
        log::info!("\tItems: {}", self.qty_unique_item_ids);
        if let Some(mean_rating) = self.mean_rating {
            log::info!("\tMean rating: {:.4}", mean_rating);
        }
        let histogram = self
            .rating_histogram
            .iter()
            .map(|(value, qty)| format!("{}={}", value, qty))
            .join(" ");
        log::info!("\tRating distribution: {}", histogram);
        if let (Some(min), Some(max)) = (self.min_time_date_time, self.max_time_date_time) {
            log::info!("\tSpan: {} / {}", min, max);
        }
    }
}
