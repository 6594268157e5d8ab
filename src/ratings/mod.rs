use hashbrown::HashMap;
use itertools::Itertools;

use crate::error::{Error, Result};
use crate::io::{ItemId, Rating, RatingValue, UserId};

/// Inclusive bounds of the ordinal rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingScale {
    pub min: RatingValue,
    pub max: RatingValue,
}

impl Default for RatingScale {
    fn default() -> Self {
        RatingScale { min: 1, max: 5 }
    }
}

impl RatingScale {
    pub fn new(min: RatingValue, max: RatingValue) -> Result<Self> {
        if min >= max {
            return Err(Error::Config(format!(
                "rating scale needs min < max, got {}..={}",
                min, max
            )));
        }
        Ok(RatingScale { min, max })
    }

    pub fn contains(&self, value: RatingValue) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Ratings grouped per user, each list kept in source order.
pub struct RatingStore {
    user_order: Vec<UserId>,
    user_to_ratings: HashMap<UserId, Vec<Rating>>,
}

impl RatingStore {
    pub fn new(ratings: &[Rating]) -> Self {
        let mut user_order = Vec::new();
        let mut user_to_ratings: HashMap<UserId, Vec<Rating>> = HashMap::new();
        for rating in ratings {
            user_to_ratings
                .entry(rating.user_id)
                .or_insert_with(|| {
                    user_order.push(rating.user_id);
                    Vec::new()
                })
                .push(*rating);
        }
        RatingStore {
            user_order,
            user_to_ratings,
        }
    }

    /// Users with at least one rating, in order of first appearance.
    pub fn users(&self) -> &[UserId] {
        &self.user_order
    }

    pub fn ratings_of(&self, user_id: &UserId) -> &[Rating] {
        self.user_to_ratings
            .get(user_id)
            .map(|ratings| ratings.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &[Rating])> + '_ {
        self.user_order
            .iter()
            .map(move |user_id| (user_id, self.ratings_of(user_id)))
    }

    pub fn qty_ratings(&self) -> usize {
        self.user_to_ratings.values().map(|ratings| ratings.len()).sum()
    }

    /// Arithmetic mean of the user's own ratings, `None` for unknown users.
    pub fn user_mean(&self, user_id: &UserId) -> Option<f64> {
        let ratings = self.ratings_of(user_id);
        if ratings.is_empty() {
            return None;
        }
        let sum: i64 = ratings.iter().map(|rating| rating.value as i64).sum();
        Some(sum as f64 / ratings.len() as f64)
    }

    pub fn user_means(&self) -> HashMap<UserId, f64> {
        self.user_order
            .iter()
            .filter_map(|user_id| self.user_mean(user_id).map(|mean| (*user_id, mean)))
            .collect()
    }

    /// Regroups all ratings by item in a single pass.
    pub fn group_by_item(&self) -> HashMap<ItemId, Vec<Rating>> {
        self.iter()
            .flat_map(|(_user_id, ratings)| ratings.iter())
            .map(|rating| (rating.item_id, *rating))
            .into_group_map()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod ratings_test {
    use super::*;
    use float_cmp::approx_eq;

    fn ratings() -> Vec<Rating> {
        vec![
            Rating::new(7, 1, 5),
            Rating::new(3, 1, 2),
            Rating::new(7, 2, 3),
            Rating::new(7, 3, 4),
            Rating::new(3, 3, 1),
        ]
    }

    #[test]
    fn should_group_ratings_per_user_in_source_order() {
        let store = RatingStore::new(&ratings());

        assert_eq!(&[7, 3], store.users());
        let items: Vec<ItemId> = store.ratings_of(&7).iter().map(|r| r.item_id).collect();
        assert_eq!(vec![1, 2, 3], items);
        assert_eq!(5, store.qty_ratings());
        assert!(store.ratings_of(&42).is_empty());
    }

    #[test]
    fn should_compute_means_from_own_ratings_only() {
        let store = RatingStore::new(&ratings());

        assert!(approx_eq!(f64, 4.0, store.user_mean(&7).unwrap(), epsilon = 1e-12));
        assert!(approx_eq!(f64, 1.5, store.user_mean(&3).unwrap(), epsilon = 1e-12));
        assert_eq!(None, store.user_mean(&42));
        assert_eq!(2, store.user_means().len());
    }

    #[test]
    fn should_group_by_item() {
        let store = RatingStore::new(&ratings());
        let by_item = store.group_by_item();

        assert_eq!(3, by_item.len());
        assert_eq!(2, by_item[&1].len());
        assert_eq!(1, by_item[&2].len());
    }

    #[test]
    fn should_validate_scale() {
        assert!(RatingScale::new(5, 1).is_err());
        let scale = RatingScale::new(0, 10).unwrap();
        assert!(scale.contains(0) && scale.contains(10));
        assert!(!RatingScale::default().contains(0));
    }
}
