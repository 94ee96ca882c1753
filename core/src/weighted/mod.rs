//! Weighted random selection with duplicate suppression
//!
//! A [`WeightedList`] holds `(item, weight)` pairs and draws picks through any
//! [`RandomSource`](crate::rng::RandomSource). Picks can exclude items that
//! duplicate earlier picks under a [`DuplicatePolicy`]; when that makes a pick
//! impossible the policy is loosened step by step (`ByIdentity` → `ByCategory`
//! → `None`) instead of failing.

use serde::{Deserialize, Serialize};

mod list;
mod policy;

pub use list::WeightedList;
pub use policy::DuplicatePolicy;

/// Capability required from anything offered through a [`WeightedList`]
pub trait Selectable {
    /// Subtype tag compared by [`DuplicatePolicy::ByCategory`]
    type Category: PartialEq + ?Sized;

    /// Stable name compared by [`DuplicatePolicy::ByIdentity`]
    fn identity(&self) -> &str;

    fn category(&self) -> &Self::Category;
}

/// One candidate and its relative weight
///
/// Entries with a weight of zero or less are never selectable. The item's
/// fields are flattened next to `weight` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedItem<T> {
    #[serde(flatten)]
    pub item: T,
    pub weight: f32,
}

impl<T> WeightedItem<T> {
    pub fn new(item: T, weight: f32) -> Self {
        Self { item, weight }
    }

    /// Whether this entry can ever be picked
    pub fn is_selectable(&self) -> bool {
        self.weight > 0.0
    }
}
