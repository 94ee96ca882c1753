//! Shop save data (JSON)

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::rng::RngState;

/// Everything needed to resume a shop session
///
/// `rng` is the generator state from before the latest selection was rolled,
/// so a save taken while the shop is open brings back the same cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSave {
    pub rng: RngState,
    #[serde(default)]
    pub purchases: u32,
    #[serde(default)]
    pub owned_turrets: Vec<String>,
    #[serde(default)]
    pub locked: bool,
}

impl ShopSave {
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the save, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        let io_err = |source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        std::fs::write(path, self.to_json()?).map_err(io_err)?;
        log::debug!("Wrote shop save to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SaveError> {
        let content = std::fs::read_to_string(path).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Load the save, or `None` if no save file exists yet
    pub fn load_or_default(path: &Path) -> Result<Option<Self>, SaveError> {
        match Self::load(path) {
            Ok(save) => Ok(Some(save)),
            Err(SaveError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
