use hashbrown::HashMap;

use crate::io::ItemId;
use crate::slopeone::deviation::DeviationMatrix;

/// Finds which of a user's rated items can act as predictors for a candidate.
pub struct RelevanceResolver<'a> {
    matrix: &'a DeviationMatrix,
}

impl<'a> RelevanceResolver<'a> {
    pub fn new(matrix: &'a DeviationMatrix) -> Self {
        RelevanceResolver { matrix }
    }

    /// Rated items `i`, in the given order, with a defined `dev[candidate][i]`.
    pub fn relevant_items(&self, rated_items: &[ItemId], candidate: &ItemId) -> Vec<ItemId> {
        self.relevant_deviations(rated_items, candidate)
            .into_iter()
            .map(|(item_id, _deviation)| item_id)
            .collect()
    }

    /// Same set as [`RelevanceResolver::relevant_items`], paired with `dev[candidate][i]`.
    pub fn relevant_deviations(
        &self,
        rated_items: &[ItemId],
        candidate: &ItemId,
    ) -> Vec<(ItemId, f64)> {
        match self.matrix.deviations_from(candidate) {
            Some(row) => rated_items
                .iter()
                .filter(|item_id| *item_id != candidate)
                .filter_map(|item_id| row.get(item_id).map(|deviation| (*item_id, *deviation)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Relevance sets for every candidate known to the deviation matrix.
    pub fn resolve(&self, rated_items: &[ItemId]) -> HashMap<ItemId, Vec<ItemId>> {
        self.matrix
            .items()
            .map(|candidate| (*candidate, self.relevant_items(rated_items, candidate)))
            .collect()
    }
}

#[cfg(test)]
mod relevance_test {
    use super::*;
    use crate::io::Rating;
    use crate::ratings::RatingStore;

    fn matrix() -> DeviationMatrix {
        DeviationMatrix::build(&RatingStore::new(&[
            Rating::new(1, 1, 5),
            Rating::new(1, 2, 3),
            Rating::new(2, 2, 4),
            Rating::new(2, 3, 3),
            Rating::new(3, 4, 1),
            Rating::new(3, 5, 2),
        ]))
    }

    #[test]
    fn should_keep_only_items_with_a_deviation_to_the_candidate() {
        let matrix = matrix();
        let resolver = RelevanceResolver::new(&matrix);

        assert_eq!(vec![2], resolver.relevant_items(&[3, 4, 2], &1));
        assert_eq!(vec![2], resolver.relevant_items(&[4, 2, 5], &3));
    }

    #[test]
    fn should_preserve_rating_order() {
        let matrix = matrix();
        let resolver = RelevanceResolver::new(&matrix);

        assert_eq!(vec![3, 1], resolver.relevant_items(&[3, 5, 1], &2));
        assert_eq!(vec![1, 3], resolver.relevant_items(&[1, 5, 3], &2));
    }

    #[test]
    fn should_pair_relevant_items_with_their_deviation() {
        let matrix = matrix();
        let resolver = RelevanceResolver::new(&matrix);

        // user 1: 3 - 5, user 2: 4 - 3
        assert_eq!(vec![(3, 1.0), (1, -2.0)], resolver.relevant_deviations(&[3, 5, 1], &2));
        assert!(resolver.relevant_deviations(&[4], &1).is_empty());
    }

    #[test]
    fn should_never_use_the_candidate_itself() {
        let matrix = matrix();
        let resolver = RelevanceResolver::new(&matrix);

        assert_eq!(vec![1], resolver.relevant_items(&[2, 1], &2));
    }

    #[test]
    fn should_return_empty_sets_for_unrelated_or_unknown_items() {
        let matrix = matrix();
        let resolver = RelevanceResolver::new(&matrix);

        assert!(resolver.relevant_items(&[4, 5], &1).is_empty());
        assert!(resolver.relevant_items(&[1, 2], &99).is_empty());
        assert!(resolver.relevant_items(&[], &1).is_empty());
    }

    #[test]
    fn should_resolve_every_candidate_of_the_matrix() {
        let matrix = matrix();
        let resolver = RelevanceResolver::new(&matrix);
        let sets = resolver.resolve(&[1, 4]);

        assert_eq!(5, sets.len());
        assert_eq!(vec![1], sets[&2]);
        assert_eq!(vec![4], sets[&5]);
        assert!(sets[&3].is_empty());
        assert!(sets[&1].is_empty());
    }
}
