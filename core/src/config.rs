//! Level shop configuration (`<level>.toml`)
//!
//! Describes which cards a level's shop can offer, how their weights change
//! with the wave number, and which duplicate checks apply. Every field has a
//! default so a level file only needs to list what it changes.
//!
//! ```toml
//! name = "meadow"
//! selection_choices = 3
//! turret_duplicate_check = "by_identity"
//!
//! [option_weights]
//! turret = 1.0
//! module = [[0, 0.5], [10, 2.0]]
//! life = 0.25
//!
//! [[initial_turrets]]
//! name = "gunner"
//! category = "gunner"
//! weight = 1.0
//!
//! [[modules]]
//! name = "frostbite"
//! category = "slow"
//! valid_for = ["gunner"]
//! weight = [[0, 0.0], [3, 1.0]]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::{Curve, WeightedCurveList};
use crate::error::ConfigError;
use crate::shop::{ModuleCard, TurretCard};
use crate::weighted::{DuplicatePolicy, WeightedItem};

/// Shop settings for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level name, used in logs
    #[serde(default = "default_name")]
    pub name: String,
    /// Cards shown while the player is still in the initial phase (default: 3)
    #[serde(default = "default_choices")]
    pub initial_choices: usize,
    /// Cards shown in every later selection (default: 3)
    #[serde(default = "default_choices")]
    pub selection_choices: usize,
    /// How many purchases are made from the initial selection (default: 1)
    #[serde(default = "default_initial_selection_count")]
    pub initial_selection_count: u32,
    /// Lives granted by a life card (default: 1)
    #[serde(default = "default_life_count")]
    pub life_count: u32,
    /// Duplicate check within the initial selection (default: none)
    #[serde(default)]
    pub initial_duplicate_check: DuplicatePolicy,
    /// Duplicate check between turret cards of one selection (default: by_identity)
    #[serde(default = "default_turret_duplicate_check")]
    pub turret_duplicate_check: DuplicatePolicy,
    /// Duplicate check between module cards of one selection (default: by_category)
    #[serde(default = "default_module_duplicate_check")]
    pub module_duplicate_check: DuplicatePolicy,
    /// Relative chance of each card kind, by wave
    #[serde(default)]
    pub option_weights: OptionWeights,
    /// Turrets of the initial selection; these replace the turret curves there
    #[serde(default)]
    pub initial_turrets: Vec<WeightedItem<TurretCard>>,
    #[serde(default)]
    pub turrets: WeightedCurveList<TurretCard>,
    #[serde(default)]
    pub modules: WeightedCurveList<ModuleCard>,
}

/// Weight curves deciding which kind of card fills a selection slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionWeights {
    /// Turret card weight (default: 1)
    #[serde(default = "default_one")]
    pub turret: Curve,
    /// Module card weight (default: 1)
    #[serde(default = "default_one")]
    pub module: Curve,
    /// Life card weight (default: 0, never offered)
    #[serde(default)]
    pub life: Curve,
}

fn default_name() -> String {
    "level".to_string()
}
fn default_choices() -> usize {
    3
}
fn default_initial_selection_count() -> u32 {
    1
}
fn default_life_count() -> u32 {
    1
}
fn default_turret_duplicate_check() -> DuplicatePolicy {
    DuplicatePolicy::ByIdentity
}
fn default_module_duplicate_check() -> DuplicatePolicy {
    DuplicatePolicy::ByCategory
}
fn default_one() -> Curve {
    Curve::constant(1.0)
}

impl Default for OptionWeights {
    fn default() -> Self {
        Self {
            turret: default_one(),
            module: default_one(),
            life: Curve::default(),
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            initial_choices: default_choices(),
            selection_choices: default_choices(),
            initial_selection_count: default_initial_selection_count(),
            life_count: default_life_count(),
            initial_duplicate_check: DuplicatePolicy::default(),
            turret_duplicate_check: default_turret_duplicate_check(),
            module_duplicate_check: default_module_duplicate_check(),
            option_weights: OptionWeights::default(),
            initial_turrets: Vec::new(),
            turrets: WeightedCurveList::default(),
            modules: WeightedCurveList::default(),
        }
    }
}

impl LevelConfig {
    /// Parse and validate a level from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let level: Self = toml::from_str(content)?;
        level.validate()?;
        Ok(level)
    }

    /// Load and validate a level file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::from_toml_str(&content)?;
        log::debug!("Loaded level '{}' from {}", level.name, path.display());
        Ok(level)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check the level can produce selections
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_choices == 0 || self.selection_choices == 0 {
            return Err(ConfigError::Invalid(
                "initial_choices and selection_choices must be at least 1".to_string(),
            ));
        }
        if let Some(bad) = self.initial_turrets.iter().find(|e| !e.weight.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "initial turret '{}': weight {} is not finite",
                bad.item.name, bad.weight
            )));
        }
        if self.initial_selection_count > 0
            && !self.initial_turrets.iter().any(WeightedItem::is_selectable)
        {
            return Err(ConfigError::Invalid(
                "initial_turrets needs at least one entry with positive weight".to_string(),
            ));
        }

        let option_curves = [
            ("option_weights.turret", &self.option_weights.turret),
            ("option_weights.module", &self.option_weights.module),
            ("option_weights.life", &self.option_weights.life),
        ];
        for (name, curve) in option_curves {
            curve
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("{}: {}", name, e)))?;
        }
        for entry in self.turrets.iter() {
            entry
                .weight
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("turret '{}': {}", entry.item.name, e)))?;
        }
        for entry in self.modules.iter() {
            entry
                .weight
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("module '{}': {}", entry.item.name, e)))?;
        }
        Ok(())
    }
}
