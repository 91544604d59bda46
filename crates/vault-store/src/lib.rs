//! Evidence Vault Storage Layer
//!
//! Implements the [`EvidenceStore`] trait on a single SQLite database.
//!
//! # Architecture
//!
//! - `evidence` holds one row per version; a version group is the set of rows
//!   sharing `version_group_id`
//! - `tags` / `evidence_tags` link tag names to exact version rows
//! - `audit_log` is append-only and written inside the same transaction as the
//!   state change it records
//! - the `latest_evidence` view selects the newest version of every group
//!
//! Multi-row writes (create, update, delete, undo) each run in one
//! `IMMEDIATE` transaction, so version-number allocation for a group is
//! serialized with its insert.
//!
//! # Examples
//!
//! ```no_run
//! use vault_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for evidence operations
//! ```

#![warn(missing_docs)]

mod audit;
mod clock;
mod config;
mod query;
mod rows;
mod tags;
mod undo;
mod versions;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use query::QueryBuilder;
pub use undo::{PendingDelete, UndoSlot};

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use vault_domain::traits::EvidenceStore;
use vault_domain::{
    AuditEntry, EvidenceId, EvidencePage, EvidenceUpdate, EvidenceVersion, ListFilter,
    NewEvidence, TaggedEvidence, ValidationError,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error; the enclosing transaction was rolled back
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Payload rejected before any write
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Undo refused because the group gained a newer version after the delete
    #[error(
        "Cannot restore version {version_number} of {evidence_id}: its group advanced to version {current_max} after the delete"
    )]
    UndoConflict {
        /// Id of the deleted row
        evidence_id: EvidenceId,
        /// Version number of the deleted row
        version_number: u32,
        /// Highest version number currently in the group
        current_max: u32,
    },
}

/// SQLite-based implementation of EvidenceStore
///
/// Owns the connection, the store tuning, the clock used for timestamps and
/// the pending-undo slot.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a store between threads
/// behind a mutex; the async command surface in `vault-sdk` does exactly that.
pub struct SqliteStore {
    conn: Connection,
    config: StoreConfig,
    clock: Arc<dyn Clock>,
    undo: UndoSlot,
}

impl SqliteStore {
    /// Open (or create) a store at `path` with default settings
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vault_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("vault.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::with_options(path, StoreConfig::default(), Arc::new(SystemClock))
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, StoreConfig::default(), Arc::new(SystemClock))
    }

    /// Open a store with explicit tuning and clock
    pub fn with_options<P: AsRef<Path>>(
        path: P,
        config: StoreConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn, config, clock)
    }

    fn from_connection(
        conn: Connection,
        config: StoreConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        conn.busy_timeout(config.busy_timeout())?;
        register_functions(&conn)?;

        let mut store = Self {
            conn,
            config,
            clock,
            undo: UndoSlot::default(),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Store tuning in effect
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The delete currently waiting for undo, if any
    pub fn pending_undo(&self) -> Option<&PendingDelete> {
        self.undo.peek()
    }

    fn now(&self) -> u64 {
        self.clock.now_millis()
    }
}

/// `casefold(text)`: Unicode lowercase, NULL-preserving
fn register_functions(conn: &Connection) -> Result<(), StoreError> {
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<Option<String>>(0)?;
            Ok(value.map(|s| s.to_lowercase()))
        },
    )?;
    Ok(())
}

impl EvidenceStore for SqliteStore {
    type Error = StoreError;

    fn create(&mut self, payload: NewEvidence) -> Result<EvidenceVersion, Self::Error> {
        self.create_evidence(payload)
    }

    fn update(
        &mut self,
        id: EvidenceId,
        payload: EvidenceUpdate,
    ) -> Result<Option<EvidenceVersion>, Self::Error> {
        self.update_evidence(id, payload)
    }

    fn delete(&mut self, id: EvidenceId) -> Result<bool, Self::Error> {
        self.delete_evidence(id)
    }

    fn undo_delete(&mut self) -> Result<Option<EvidenceVersion>, Self::Error> {
        self.undo_last_delete()
    }

    fn get(&self, id: EvidenceId) -> Result<Option<TaggedEvidence>, Self::Error> {
        self.get_evidence(id)
    }

    fn list(&self, filter: &ListFilter) -> Result<EvidencePage, Self::Error> {
        self.list_evidence(filter)
    }

    fn list_all(&self, filter: &ListFilter) -> Result<Vec<EvidenceVersion>, Self::Error> {
        self.list_matching(filter)
    }

    fn tags_for(&self, id: EvidenceId) -> Result<Vec<String>, Self::Error> {
        tags::tag_names(&self.conn, id)
    }

    fn list_audit(&self, limit: usize) -> Result<Vec<AuditEntry>, Self::Error> {
        audit::list(&self.conn, limit)
    }

    fn record_export(&mut self, entity_id: &str) -> Result<AuditEntry, Self::Error> {
        let now = self.now();
        let tx = self.conn.transaction()?;
        let entry = audit::record(&tx, vault_domain::AuditAction::ExportPackage, entity_id, now)?;
        tx.commit()?;
        tracing::info!(entity_id, "Recorded export package");
        Ok(entry)
    }
}
