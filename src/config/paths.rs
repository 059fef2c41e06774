//! Path management for ledgerkeep
//!
//! Resolution order:
//!
//! 1. `LEDGERKEEP_DATA_DIR` environment variable (if set)
//! 2. The platform data directory (XDG on Linux, Application Support on
//!    macOS, AppData on Windows)

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::LedgerError;

/// Manages all paths used by ledgerkeep
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Resolve the data directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = match std::env::var("LEDGERKEEP_DATA_DIR") {
            Ok(custom) => PathBuf::from(custom),
            Err(_) => ProjectDirs::from("dev", "Ledgerkeep", "ledgerkeep")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    LedgerError::Config("Could not determine platform data directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// The base data directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// The ledger store file
    pub fn ledger_file(&self) -> PathBuf {
        self.base_dir.join("ledger.json")
    }

    /// The settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    /// Make sure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        fs::create_dir_all(&self.base_dir).map_err(|e| {
            LedgerError::Config(format!(
                "Failed to create {}: {}",
                self.base_dir.display(),
                e
            ))
        })
    }
}
