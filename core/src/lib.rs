//! tdshop core - deterministic shop rolls for a tower defence game
//!
//! # Architecture
//!
//! - [`rng`] - Squirrel3 counter-based generator, resumable from `(seed, draw_count)`
//! - [`weighted`] - Weighted selection with duplicate policies and downgrading
//! - [`curve`] - Piecewise-linear weight curves over the wave number
//! - [`config`] - Level shop configuration loaded from TOML
//! - [`shop`] - Selections, purchases, locking and save data

pub mod config;
pub mod curve;
pub mod error;
pub mod rng;
pub mod shop;
pub mod weighted;

pub use config::{LevelConfig, OptionWeights};
pub use curve::{Curve, Keyframe, WeightedCurveList};
pub use error::{ConfigError, SaveError, SelectionError, ShopError};
pub use rng::{RandomSource, RngState, Squirrel3};
pub use shop::{ModuleCard, ShopOffer, ShopSave, ShopSession, TurretCard, roll_selection};
pub use weighted::{DuplicatePolicy, Selectable, WeightedItem, WeightedList};
