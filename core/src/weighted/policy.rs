//! Duplicate policies and their downgrade order

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Selectable;

/// How picks exclude items that duplicate earlier picks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Duplicates allowed
    #[default]
    None,
    /// Exclude items with the same identity string
    #[serde(alias = "by_name")]
    ByIdentity,
    /// Exclude items with the same category tag
    #[serde(alias = "by_type")]
    ByCategory,
}

/// Downgrade order, strictest first
const CASCADE: [DuplicatePolicy; 3] = [
    DuplicatePolicy::ByIdentity,
    DuplicatePolicy::ByCategory,
    DuplicatePolicy::None,
];

impl DuplicatePolicy {
    /// Policies to try in order, starting with `self`
    ///
    /// Always ends with [`DuplicatePolicy::None`] and holds at most three entries.
    pub fn cascade(self) -> &'static [DuplicatePolicy] {
        match self {
            Self::ByIdentity => &CASCADE[..],
            Self::ByCategory => &CASCADE[1..],
            Self::None => &CASCADE[2..],
        }
    }

    /// The next looser policy, if any
    pub fn downgrade(self) -> Option<Self> {
        self.cascade().get(1).copied()
    }

    /// Whether `candidate` counts as a duplicate of `picked`
    pub fn is_duplicate<T: Selectable>(self, candidate: &T, picked: &T) -> bool {
        match self {
            Self::None => false,
            Self::ByIdentity => candidate.identity() == picked.identity(),
            Self::ByCategory => candidate.category() == picked.category(),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::ByIdentity => "by_identity",
            Self::ByCategory => "by_category",
        };
        f.write_str(name)
    }
}
