//! Store tuning

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Undo window after a delete, in milliseconds
pub const DEFAULT_UNDO_WINDOW_MS: u64 = 5_000;

/// Audit entries returned by a listing
pub const DEFAULT_AUDIT_LIMIT: usize = 500;

/// Configuration for a [`crate::SqliteStore`]
///
/// # Examples
///
/// ```
/// use vault_store::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default();
/// assert_eq!(config.undo_window(), Duration::from_millis(5_000));
/// assert_eq!(config.audit_limit, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// How long a delete can be undone (in milliseconds)
    #[serde(default = "default_undo_window_ms")]
    pub undo_window_ms: u64,

    /// Maximum number of audit entries returned by a listing
    #[serde(default = "default_audit_limit")]
    pub audit_limit: usize,

    /// How long to wait on a locked database (in milliseconds)
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_undo_window_ms() -> u64 {
    DEFAULT_UNDO_WINDOW_MS
}

fn default_audit_limit() -> usize {
    DEFAULT_AUDIT_LIMIT
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            undo_window_ms: default_undo_window_ms(),
            audit_limit: default_audit_limit(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl StoreConfig {
    /// Get the undo window as Duration
    pub fn undo_window(&self) -> Duration {
        Duration::from_millis(self.undo_window_ms)
    }

    /// Get the busy timeout as Duration
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
