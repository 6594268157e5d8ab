use std::time::Instant;

use hashbrown::HashMap;
use rayon::prelude::*;

use crate::io::{ItemId, Rating};
use crate::ratings::RatingStore;

/// Running `(sum_of_differences, count)` for one ordered item pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Accumulator {
    pub sum_of_differences: i64,
    pub count: u32,
}

impl Accumulator {
    fn observe(&mut self, difference: i64) {
        self.sum_of_differences += difference;
        self.count += 1;
    }

    fn merge(&mut self, other: &Accumulator) {
        self.sum_of_differences += other.sum_of_differences;
        self.count += other.count;
    }

    pub fn average(&self) -> Option<f64> {
        if self.count > 0 {
            Some(self.sum_of_differences as f64 / self.count as f64)
        } else {
            None
        }
    }
}

type PairSums = HashMap<ItemId, HashMap<ItemId, Accumulator>>;

fn accumulate_user(pair_sums: &mut PairSums, ratings: &[Rating]) {
    for (index, rating_j) in ratings.iter().enumerate() {
        for rating_i in &ratings[index + 1..] {
            let difference = rating_j.value as i64 - rating_i.value as i64;
            pair_sums
                .entry(rating_j.item_id)
                .or_default()
                .entry(rating_i.item_id)
                .or_default()
                .observe(difference);
            pair_sums
                .entry(rating_i.item_id)
                .or_default()
                .entry(rating_j.item_id)
                .or_default()
                .observe(-difference);
        }
    }
}

fn merge_pair_sums(mut into: PairSums, from: PairSums) -> PairSums {
    for (item_i, row) in from {
        let target_row = into.entry(item_i).or_default();
        for (item_j, accumulator) in row {
            target_row.entry(item_j).or_default().merge(&accumulator);
        }
    }
    into
}

/// Sparse average deviation between every pair of co-rated items.
/// `get(i, j)` is the mean of `rating(i) - rating(j)` over users who rated both.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeviationMatrix {
    deviations: HashMap<ItemId, HashMap<ItemId, f64>>,
}

impl DeviationMatrix {
    pub fn build(store: &RatingStore) -> Self {
        let start_time = Instant::now();
        let mut pair_sums = PairSums::new();
        for (_user_id, ratings) in store.iter() {
            accumulate_user(&mut pair_sums, ratings);
        }
        let matrix = Self::from_pair_sums(pair_sums);
        log::info!(
            "computed deviation matrix with {} entries over {} items:{} micros",
            matrix.qty_entries(),
            matrix.len(),
            start_time.elapsed().as_micros()
        );
        matrix
    }

    /// Same result as [`DeviationMatrix::build`]; every rayon partition
    /// accumulates into a private map and the maps are merged at the end.
    pub fn build_parallel(store: &RatingStore) -> Self {
        let start_time = Instant::now();
        let pair_sums = store
            .users()
            .par_iter()
            .fold(PairSums::new, |mut pair_sums, user_id| {
                accumulate_user(&mut pair_sums, store.ratings_of(user_id));
                pair_sums
            })
            .reduce(PairSums::new, merge_pair_sums);
        let matrix = Self::from_pair_sums(pair_sums);
        log::info!(
            "computed deviation matrix (parallel) with {} entries over {} items:{} micros",
            matrix.qty_entries(),
            matrix.len(),
            start_time.elapsed().as_micros()
        );
        matrix
    }

    fn from_pair_sums(pair_sums: PairSums) -> Self {
        let mut deviations: HashMap<ItemId, HashMap<ItemId, f64>> = HashMap::new();
        for (item_i, row) in pair_sums {
            for (item_j, accumulator) in row {
                if let Some(average) = accumulator.average() {
                    deviations.entry(item_i).or_default().insert(item_j, average);
                }
            }
        }
        DeviationMatrix { deviations }
    }

    pub fn get(&self, item_i: &ItemId, item_j: &ItemId) -> Option<f64> {
        self.deviations
            .get(item_i)
            .and_then(|row| row.get(item_j))
            .copied()
    }

    pub fn deviations_from(&self, item_i: &ItemId) -> Option<&HashMap<ItemId, f64>> {
        self.deviations.get(item_i)
    }

    /// True when the item has a defined deviation to at least one other item.
    pub fn contains_item(&self, item_id: &ItemId) -> bool {
        self.deviations.contains_key(item_id)
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.deviations.keys()
    }

    /// Number of items with at least one deviation.
    pub fn len(&self) -> usize {
        self.deviations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deviations.is_empty()
    }

    pub fn qty_entries(&self) -> usize {
        self.deviations.values().map(|row| row.len()).sum()
    }
}

#[cfg(test)]
mod deviation_test {
    use super::*;
    use crate::ratings::RatingScale;
    use float_cmp::approx_eq;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn co_rated_store() -> RatingStore {
        RatingStore::new(&[
            Rating::new(1, 10, 5),
            Rating::new(1, 20, 3),
            Rating::new(2, 10, 4),
            Rating::new(2, 20, 2),
            Rating::new(2, 30, 5),
            Rating::new(3, 20, 4),
            Rating::new(3, 30, 3),
        ])
    }

    #[test]
    fn should_average_differences_over_co_raters() {
        let matrix = DeviationMatrix::build(&co_rated_store());

        assert!(approx_eq!(f64, 2.0, matrix.get(&10, &20).unwrap(), epsilon = 1e-9));
        assert!(approx_eq!(f64, -2.0, matrix.get(&20, &10).unwrap(), epsilon = 1e-9));
        // user 2: 2 - 5, user 3: 4 - 3
        assert!(approx_eq!(f64, -1.0, matrix.get(&20, &30).unwrap(), epsilon = 1e-9));
        assert!(approx_eq!(f64, -1.0, matrix.get(&10, &30).unwrap(), epsilon = 1e-9));
        assert_eq!(3, matrix.len());
        assert_eq!(6, matrix.qty_entries());
    }

    #[test]
    fn should_not_relate_items_never_co_rated() {
        let store = RatingStore::new(&[
            Rating::new(1, 10, 5),
            Rating::new(1, 20, 3),
            Rating::new(2, 30, 4),
            Rating::new(2, 40, 1),
        ]);
        let matrix = DeviationMatrix::build(&store);

        assert_eq!(None, matrix.get(&10, &30));
        assert_eq!(None, matrix.get(&30, &10));
        assert_eq!(None, matrix.get(&20, &40));
        assert!(matrix.get(&30, &40).is_some());
    }

    #[test]
    fn should_ignore_users_with_a_single_rating() {
        let mut ratings = vec![Rating::new(1, 10, 5), Rating::new(1, 20, 3)];
        let without = DeviationMatrix::build(&RatingStore::new(&ratings));
        ratings.push(Rating::new(2, 30, 1));
        ratings.push(Rating::new(3, 10, 1));
        let with = DeviationMatrix::build(&RatingStore::new(&ratings));

        assert_eq!(without, with);
        assert!(!with.contains_item(&30));
    }

    #[test]
    fn should_be_antisymmetric() {
        let mut rng = Pcg64::seed_from_u64(17);
        let ratings: Vec<Rating> = (0..50_u32)
            .flat_map(|user_id| {
                let qty = rng.gen_range(1..8);
                (0..qty)
                    .map(|slot| Rating::new(user_id, (user_id * 7 + slot * 3) % 23, rng.gen_range(1..=5)))
                    .collect::<Vec<_>>()
            })
            .collect();
        let store = RatingStore::new(&ratings);
        let matrix = DeviationMatrix::build(&store);

        assert!(!matrix.is_empty());
        for item_i in matrix.items() {
            for (item_j, deviation) in matrix.deviations_from(item_i).unwrap() {
                let reverse = matrix.get(item_j, item_i).unwrap();
                assert!(approx_eq!(f64, *deviation, -reverse, epsilon = 1e-9));
            }
        }
    }

    #[test]
    fn should_build_the_same_matrix_in_parallel() {
        let mut rng = Pcg64::seed_from_u64(5);
        let ratings: Vec<Rating> = (0..200_u32)
            .flat_map(|user_id| {
                let qty = rng.gen_range(1..12);
                (0..qty)
                    .map(|slot| Rating::new(user_id, (user_id + slot * 11) % 60, rng.gen_range(1..=5)))
                    .collect::<Vec<_>>()
            })
            .collect();
        let store = RatingStore::new(&ratings);

        assert_eq!(DeviationMatrix::build(&store), DeviationMatrix::build_parallel(&store));
    }

    #[test]
    fn should_handle_ratings_at_the_extremes_of_a_wide_scale() {
        let scale = RatingScale::new(i32::MIN, i32::MAX).unwrap();
        let ratings = vec![
            Rating::new(1, 1, scale.max),
            Rating::new(1, 2, scale.min),
            Rating::new(2, 1, scale.max),
            Rating::new(2, 2, scale.min),
        ];
        let store = RatingStore::new(&ratings);
        let span = i32::MAX as f64 - i32::MIN as f64;

        for matrix in [DeviationMatrix::build(&store), DeviationMatrix::build_parallel(&store)] {
            assert!(approx_eq!(f64, span, matrix.get(&1, &2).unwrap(), epsilon = 1e-9));
            assert!(approx_eq!(f64, -span, matrix.get(&2, &1).unwrap(), epsilon = 1e-9));
        }
    }

    #[test]
    fn should_report_no_average_without_observations() {
        assert_eq!(None, Accumulator::default().average());
    }
}
