//! Error types for selection, level loading, shop rolls and save files

use std::path::PathBuf;

use thiserror::Error;

use crate::weighted::DuplicatePolicy;

/// Weighted selection failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// Fewer candidates than picks requested
    #[error("not enough candidates: requested {requested}, {available} available")]
    InsufficientCandidates { requested: usize, available: usize },

    /// No positive weight left, even after loosening duplicate checking
    #[error("total weight is 0 with {policy} duplicate checking")]
    ZeroTotalWeight { policy: DuplicatePolicy },

    /// Total weight requested from an empty list
    #[error("weighted list is empty")]
    EmptyCollection,

    /// Weighted scan ran past the last candidate (weight accounting bug)
    #[error("weighted scan exhausted all candidates without a pick")]
    SelectionExhausted,
}

/// Level file failure
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse level file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid level: {0}")]
    Invalid(String),
}

/// Shop roll or purchase failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShopError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Turret, module and life option weights are all zero at this round
    #[error("no shop option has positive weight at round {round}")]
    NoOptions { round: f32 },

    /// A module card was rolled but no module fits an owned turret
    #[error("no module fits any owned turret")]
    NoModuleCandidates,

    #[error("offer {index} out of range ({len} offers)")]
    OfferOutOfRange { index: usize, len: usize },
}

/// Shop save file failure
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("save file I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),
}
