//! Local settings
//!
//! The CLI binary serves one local owner; the owner id is minted the first
//! time the settings file is created and reused from then on.

use std::fs::File;
use std::io::BufReader;

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::OwnerId;
use crate::store::file_io::write_json_atomic;

/// Persistent local settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// The local owner all CLI operations run as
    pub owner_id: OwnerId,

    /// Currency code for newly created accounts
    pub currency: String,

    /// Model name for the advice backend
    pub advice_model: String,
}

impl Settings {
    fn fresh() -> Self {
        Self {
            owner_id: OwnerId::new(),
            currency: "TWD".into(),
            advice_model: "gemini-2.5-flash".into(),
        }
    }

    /// Load settings, creating and persisting defaults on first run
    pub fn load_or_create(paths: &LedgerPaths) -> LedgerResult<Self> {
        let path = paths.settings_file();
        if path.exists() {
            let file = File::open(&path).map_err(|e| {
                LedgerError::Config(format!("Failed to open {}: {}", path.display(), e))
            })?;
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                LedgerError::Config(format!("Failed to parse {}: {}", path.display(), e))
            })
        } else {
            paths.ensure_directories()?;
            let settings = Self::fresh();
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Persist settings atomically
    pub fn save(&self, paths: &LedgerPaths) -> LedgerResult<()> {
        write_json_atomic(paths.settings_file(), self)?;
        Ok(())
    }
}
