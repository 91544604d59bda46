//! Trait definitions for external interactions
//!
//! These traits define the boundary between the domain and the persistence
//! layer. The SQLite implementation lives in `vault-store`.

use crate::{
    AuditEntry, EvidenceId, EvidencePage, EvidenceUpdate, EvidenceVersion, ListFilter,
    NewEvidence, TaggedEvidence,
};

/// Versioned evidence storage with an audit trail
///
/// Implemented by the infrastructure layer (vault-store)
pub trait EvidenceStore {
    /// Error type for store operations
    type Error;

    /// Start a new version group at version 1
    fn create(&mut self, payload: NewEvidence) -> Result<EvidenceVersion, Self::Error>;

    /// Supersede `id` with a new version; `None` if `id` does not exist
    fn update(
        &mut self,
        id: EvidenceId,
        payload: EvidenceUpdate,
    ) -> Result<Option<EvidenceVersion>, Self::Error>;

    /// Delete exactly one version row; `false` if it does not exist
    fn delete(&mut self, id: EvidenceId) -> Result<bool, Self::Error>;

    /// Restore the most recently deleted row if still inside the undo window
    fn undo_delete(&mut self) -> Result<Option<EvidenceVersion>, Self::Error>;

    /// Get a version with its tag names
    fn get(&self, id: EvidenceId) -> Result<Option<TaggedEvidence>, Self::Error>;

    /// One page of matching rows plus the total match count
    fn list(&self, filter: &ListFilter) -> Result<EvidencePage, Self::Error>;

    /// Every matching row, ignoring the pagination fields of `filter`
    fn list_all(&self, filter: &ListFilter) -> Result<Vec<EvidenceVersion>, Self::Error>;

    /// Tag names linked to a version, sorted
    fn tags_for(&self, id: EvidenceId) -> Result<Vec<String>, Self::Error>;

    /// Most recent audit entries, newest first
    fn list_audit(&self, limit: usize) -> Result<Vec<AuditEntry>, Self::Error>;

    /// Append an EXPORT_PACKAGE entry for `entity_id`
    fn record_export(&mut self, entity_id: &str) -> Result<AuditEntry, Self::Error>;
}
