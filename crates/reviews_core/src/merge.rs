use std::collections::btree_map::{self, BTreeMap, Entry};

use serde::{Deserialize, Serialize};

use crate::Review;

/// Accumulated reviews keyed by `unique_id`.
///
/// An id is stored at most once; merging never replaces a stored review.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Review>", into = "Vec<Review>")]
pub struct ReviewSet {
    reviews: BTreeMap<String, Review>,
}

impl ReviewSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn get(&self, unique_id: &str) -> Option<&Review> {
        self.reviews.get(unique_id)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, Review> {
        self.reviews.values()
    }

    /// Add every review whose id is not stored yet; returns how many were added.
    ///
    /// Within `fresh`, the first review carrying a given id wins.
    pub fn merge(&mut self, fresh: impl IntoIterator<Item = Review>) -> usize {
        let mut added = 0;
        for review in fresh {
            if let Entry::Vacant(slot) = self.reviews.entry(review.unique_id.clone()) {
                slot.insert(review);
                added += 1;
            }
        }
        added
    }

    /// Consuming form of [`ReviewSet::merge`].
    pub fn merged(mut self, fresh: impl IntoIterator<Item = Review>) -> Self {
        self.merge(fresh);
        self
    }
}

impl FromIterator<Review> for ReviewSet {
    fn from_iter<I: IntoIterator<Item = Review>>(iter: I) -> Self {
        Self::new().merged(iter)
    }
}

impl From<Vec<Review>> for ReviewSet {
    fn from(reviews: Vec<Review>) -> Self {
        reviews.into_iter().collect()
    }
}

impl From<ReviewSet> for Vec<Review> {
    fn from(set: ReviewSet) -> Self {
        set.reviews.into_values().collect()
    }
}

impl IntoIterator for ReviewSet {
    type Item = Review;
    type IntoIter = btree_map::IntoValues<String, Review>;

    fn into_iter(self) -> Self::IntoIter {
        self.reviews.into_values()
    }
}

impl<'a> IntoIterator for &'a ReviewSet {
    type Item = &'a Review;
    type IntoIter = btree_map::Values<'a, String, Review>;

    fn into_iter(self) -> Self::IntoIter {
        self.reviews.values()
    }
}
