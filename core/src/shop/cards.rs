//! Cards the shop can offer

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::weighted::Selectable;

/// A turret blueprint offered for purchase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurretCard {
    pub name: String,
    /// Turret family, e.g. "gunner" or "smasher"
    pub category: String,
}

impl TurretCard {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

impl Selectable for TurretCard {
    type Category = str;

    fn identity(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }
}

/// A turret module offered for purchase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleCard {
    pub name: String,
    pub category: String,
    /// Turret categories this module can be fitted to (empty = any turret)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valid_for: Vec<String>,
}

impl ModuleCard {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            valid_for: Vec::new(),
        }
    }

    pub fn valid_for<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_for = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the module can go on at least one of the owned turret categories
    pub fn fits_any(&self, owned_turrets: &BTreeSet<String>) -> bool {
        self.valid_for.is_empty() || self.valid_for.iter().any(|c| owned_turrets.contains(c))
    }
}

impl Selectable for ModuleCard {
    type Category = str;

    fn identity(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }
}

/// One card in a shop selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShopOffer {
    Turret(TurretCard),
    Module(ModuleCard),
    Life { lives: u32 },
}

impl fmt::Display for ShopOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Turret(card) => write!(f, "turret {} ({})", card.name, card.category),
            Self::Module(card) => write!(f, "module {} ({})", card.name, card.category),
            Self::Life { lives } => write!(f, "+{} lives", lives),
        }
    }
}
