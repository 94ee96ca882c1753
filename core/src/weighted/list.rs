//! Weighted list storage and selection

use std::ops::{Index, IndexMut};

use crate::error::SelectionError;
use crate::rng::{RandomSource, Squirrel3};

use super::{DuplicatePolicy, Selectable, WeightedItem};

/// A list of items and their weights
///
/// Selection never caches the total weight; it is summed from the current
/// entries on every call. All randomness comes from the caller's generator.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedList<T> {
    items: Vec<WeightedItem<T>>,
}

impl<T> Default for WeightedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> WeightedList<T> {
    /// Create a list, dropping entries that can never be picked
    pub fn new(items: Vec<WeightedItem<T>>) -> Self {
        let mut list = Self { items };
        list.prune();
        list
    }

    /// Create a list from a copy of `items`
    pub fn from_slice(items: &[WeightedItem<T>]) -> Self
    where
        T: Clone,
    {
        Self::new(items.to_vec())
    }

    pub fn add(&mut self, item: T, weight: f32) {
        self.items.push(WeightedItem::new(item, weight));
    }

    pub fn push(&mut self, entry: WeightedItem<T>) {
        self.items.push(entry);
    }

    pub fn remove_at(&mut self, index: usize) -> Option<WeightedItem<T>> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Remove every entry holding `item`, returning how many were removed
    pub fn remove_item(&mut self, item: &T) -> usize
    where
        T: PartialEq,
    {
        let before = self.items.len();
        self.items.retain(|entry| entry.item != *item);
        before - self.items.len()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&WeightedItem<T>) -> bool) {
        self.items.retain(|entry| keep(entry));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WeightedItem<T>> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut WeightedItem<T>> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeightedItem<T>> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[WeightedItem<T>] {
        &self.items
    }

    /// Sum of all positive weights
    ///
    /// # Errors
    ///
    /// [`SelectionError::EmptyCollection`] if the list holds no entries at all.
    pub fn total_weight(&self) -> Result<f32, SelectionError> {
        if self.items.is_empty() {
            return Err(SelectionError::EmptyCollection);
        }
        Ok(self
            .items
            .iter()
            .filter(|entry| entry.is_selectable())
            .map(|entry| entry.weight)
            .sum())
    }

    /// Remove every entry with a weight of zero or less
    ///
    /// A list left without positive weight ends up empty. Idempotent.
    pub fn prune(&mut self) {
        self.items.retain(WeightedItem::is_selectable);
    }
}

impl<T: Selectable> WeightedList<T> {
    /// Pick one item, excluding duplicates of `previous` under `policy`
    ///
    /// If the exclusions leave no positive weight, the policy is loosened along
    /// [`DuplicatePolicy::cascade`] and the pick is retried against the full list.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::InsufficientCandidates`] if the list is empty
    /// - [`SelectionError::ZeroTotalWeight`] if no entry has positive weight
    pub fn get_one<R: RandomSource + ?Sized>(
        &self,
        policy: DuplicatePolicy,
        rng: &mut R,
        previous: &[T],
    ) -> Result<&T, SelectionError> {
        if self.items.is_empty() {
            return Err(SelectionError::InsufficientCandidates {
                requested: 1,
                available: 0,
            });
        }

        let mut attempted = policy;
        for &attempt in policy.cascade() {
            attempted = attempt;
            let candidates: Vec<&WeightedItem<T>> = self
                .items
                .iter()
                .filter(|entry| entry.is_selectable())
                .filter(|entry| !previous.iter().any(|p| attempt.is_duplicate(&entry.item, p)))
                .collect();

            let total = sum_weights(&candidates);
            if total > 0.0 {
                let chosen = candidates[scan(&candidates, total, rng)?];
                return Ok(&chosen.item);
            }
            log_downgrade(attempt);
        }

        Err(SelectionError::ZeroTotalWeight { policy: attempted })
    }

    /// [`get_one`](Self::get_one) with a freshly seeded generator
    pub fn get_one_fresh(
        &self,
        policy: DuplicatePolicy,
        previous: &[T],
    ) -> Result<&T, SelectionError> {
        self.get_one(policy, &mut Squirrel3::new(), previous)
    }

    /// Pick `count` items, excluding duplicates within the batch under `policy`
    ///
    /// If the batch runs out of positive weight before `count` picks, the whole
    /// batch is regenerated from the full list with the next looser policy, so a
    /// result never mixes duplicate rules.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::InsufficientCandidates`] if the list holds fewer than `count` entries
    /// - [`SelectionError::ZeroTotalWeight`] if no entry has positive weight
    pub fn get_many<R: RandomSource + ?Sized>(
        &self,
        count: usize,
        policy: DuplicatePolicy,
        rng: &mut R,
    ) -> Result<Vec<&T>, SelectionError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if self.items.len() < count {
            return Err(SelectionError::InsufficientCandidates {
                requested: count,
                available: self.items.len(),
            });
        }
        if self.total_weight()? <= 0.0 {
            return Err(SelectionError::ZeroTotalWeight { policy });
        }

        let mut attempted = policy;
        for &attempt in policy.cascade() {
            attempted = attempt;
            if let Some(picks) = self.try_get_many(count, attempt, rng)? {
                return Ok(picks);
            }
            log_downgrade(attempt);
        }

        Err(SelectionError::ZeroTotalWeight { policy: attempted })
    }

    /// [`get_many`](Self::get_many) with a freshly seeded generator
    pub fn get_many_fresh(
        &self,
        count: usize,
        policy: DuplicatePolicy,
    ) -> Result<Vec<&T>, SelectionError> {
        self.get_many(count, policy, &mut Squirrel3::new())
    }

    /// One batch attempt under a single policy; `None` when weight runs out
    fn try_get_many<R: RandomSource + ?Sized>(
        &self,
        count: usize,
        policy: DuplicatePolicy,
        rng: &mut R,
    ) -> Result<Option<Vec<&T>>, SelectionError> {
        let mut working: Vec<&WeightedItem<T>> =
            self.items.iter().filter(|entry| entry.is_selectable()).collect();
        let mut picks = Vec::with_capacity(count);

        while picks.len() < count {
            let total = sum_weights(&working);
            if total <= 0.0 {
                return Ok(None);
            }

            let chosen = working[scan(&working, total, rng)?];
            picks.push(&chosen.item);
            if policy != DuplicatePolicy::None {
                working.retain(|entry| !policy.is_duplicate(&entry.item, &chosen.item));
            }
        }

        Ok(Some(picks))
    }
}

impl<T> From<Vec<WeightedItem<T>>> for WeightedList<T> {
    fn from(items: Vec<WeightedItem<T>>) -> Self {
        Self::new(items)
    }
}

impl<T> FromIterator<WeightedItem<T>> for WeightedList<T> {
    fn from_iter<I: IntoIterator<Item = WeightedItem<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a WeightedList<T> {
    type Item = &'a WeightedItem<T>;
    type IntoIter = std::slice::Iter<'a, WeightedItem<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> Index<usize> for WeightedList<T> {
    type Output = WeightedItem<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for WeightedList<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.items[index]
    }
}

// Weights are summed and scanned in f64: every f32 weight is exact there, and
// the gap between a draw (< 1 - 2^-24) and 1 dwarfs the accumulated rounding,
// so the scan always lands on a candidate.
fn sum_weights<T>(candidates: &[&WeightedItem<T>]) -> f64 {
    candidates.iter().map(|entry| f64::from(entry.weight)).sum()
}

fn scan<T, R: RandomSource + ?Sized>(
    candidates: &[&WeightedItem<T>],
    total: f64,
    rng: &mut R,
) -> Result<usize, SelectionError> {
    let mut picked = f64::from(rng.next_f32()) * total;
    for (index, entry) in candidates.iter().enumerate() {
        let weight = f64::from(entry.weight);
        if picked < weight {
            return Ok(index);
        }
        picked -= weight;
    }

    log::error!(
        "Weighted scan exhausted {} candidates (total weight {})",
        candidates.len(),
        total
    );
    Err(SelectionError::SelectionExhausted)
}

fn log_downgrade(policy: DuplicatePolicy) {
    if let Some(next) = policy.downgrade() {
        log::warn!(
            "Could not use {} duplicate checking, downgrading to {} and regenerating",
            policy,
            next
        );
    }
}
