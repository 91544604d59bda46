//! On-disk layout of a vault

use std::io;
use std::path::{Path, PathBuf};

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "vault.db";

/// Managed evidence copies live here, inside the data directory
pub const EVIDENCE_DIR: &str = "evidence-files";

/// Locations derived from one data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    data_dir: PathBuf,
}

impl VaultPaths {
    /// Layout rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Root directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// SQLite database file
    pub fn database(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Directory holding managed evidence copies
    pub fn evidence_dir(&self) -> PathBuf {
        self.data_dir.join(EVIDENCE_DIR)
    }

    /// Create the data and evidence directories if missing
    pub fn ensure(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.evidence_dir())
    }
}
