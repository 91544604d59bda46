//! Version manager: create, supersede, delete, undo and fetch evidence versions

use crate::rows::{group_extent, insert_version, load_version, row_seq};
use crate::undo::PendingDelete;
use crate::{audit, tags, SqliteStore, StoreError};
use rusqlite::TransactionBehavior;
use vault_domain::payload::clean_description;
use vault_domain::{
    AuditAction, EvidenceId, EvidenceUpdate, EvidenceVersion, NewEvidence, TaggedEvidence,
    VersionGroupId,
};

impl SqliteStore {
    /// Start a new version group with version 1
    ///
    /// Validates the payload, inserts the row, links its tags and appends a
    /// CREATE audit entry, all in one transaction.
    pub fn create_evidence(&mut self, payload: NewEvidence) -> Result<EvidenceVersion, StoreError> {
        payload.validate()?;
        let now = self.now();

        let evidence = EvidenceVersion {
            id: EvidenceId::new(),
            version_group_id: VersionGroupId::new(),
            version_number: 1,
            title: payload.title.trim().to_string(),
            description: clean_description(payload.description.as_deref()),
            category: payload.category.trim().to_string(),
            status: payload.status,
            file_path: payload.file_path.trim().to_string(),
            created_at: now,
            updated_at: now,
        };

        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        insert_version(&tx, &evidence, None)?;
        tags::reconcile(&tx, evidence.id, &payload.tags)?;
        audit::record(&tx, AuditAction::Create, &evidence.id.to_string(), now)?;
        tx.commit()?;

        tracing::info!(
            id = %evidence.id,
            group = %evidence.version_group_id,
            "Created evidence"
        );
        Ok(evidence)
    }

    /// Supersede version `id` with a new version of the same group
    ///
    /// The next version number is derived from the group maximum inside the
    /// write transaction, never from `id`'s own number. `created_at` is copied
    /// from the superseded row. Tags are linked to the new row only, so the
    /// old row keeps its historical links. A STATUS_CHANGE entry is appended
    /// when the status differs from the superseded row.
    ///
    /// Returns `None` if `id` does not exist.
    pub fn update_evidence(
        &mut self,
        id: EvidenceId,
        payload: EvidenceUpdate,
    ) -> Result<Option<EvidenceVersion>, StoreError> {
        payload.validate()?;
        let now = self.now();

        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(existing) = load_version(&tx, id)? else {
            return Ok(None);
        };

        let (max_version, max_updated) = group_extent(&tx, existing.version_group_id)?;
        let next_version = max_version.unwrap_or(existing.version_number) + 1;
        let updated_at = max_updated.map_or(now, |last| now.max(last + 1));

        let evidence = EvidenceVersion {
            id: EvidenceId::new(),
            version_group_id: existing.version_group_id,
            version_number: next_version,
            title: payload.title.trim().to_string(),
            description: clean_description(payload.description.as_deref()),
            category: payload.category.trim().to_string(),
            status: payload.status,
            file_path: payload
                .file_path
                .as_deref()
                .map(str::trim)
                .map_or_else(|| existing.file_path.clone(), str::to_string),
            created_at: existing.created_at,
            updated_at,
        };

        insert_version(&tx, &evidence, None)?;
        tags::reconcile(&tx, evidence.id, &payload.tags)?;
        if evidence.status != existing.status {
            audit::record(&tx, AuditAction::StatusChange, &evidence.id.to_string(), now)?;
        }
        tx.commit()?;

        tracing::info!(
            id = %evidence.id,
            superseded = %existing.id,
            version = evidence.version_number,
            "Updated evidence"
        );
        Ok(Some(evidence))
    }

    /// Delete exactly one version row and stage it for undo
    ///
    /// Unlinks its tags, removes the row and appends a DELETE entry in one
    /// transaction. The staged row replaces any earlier pending delete.
    /// Returns `false` if `id` does not exist.
    pub fn delete_evidence(&mut self, id: EvidenceId) -> Result<bool, StoreError> {
        let now = self.now();

        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let (Some(evidence), Some(seq)) = (load_version(&tx, id)?, row_seq(&tx, id)?) else {
            return Ok(false);
        };
        let tag_names = tags::tag_names(&tx, id)?;

        tags::unlink_all(&tx, id)?;
        tx.execute(
            "DELETE FROM evidence WHERE id = ?1",
            rusqlite::params![id.to_string()],
        )?;
        let (group_max_after_delete, _) = group_extent(&tx, evidence.version_group_id)?;
        audit::record(&tx, AuditAction::Delete, &id.to_string(), now)?;
        tx.commit()?;

        let displaced = self.undo.stage(PendingDelete {
            evidence,
            tags: tag_names,
            seq,
            deleted_at: now,
            group_max_after_delete,
        });
        if let Some(previous) = displaced {
            tracing::debug!(id = %previous.evidence.id, "Pending undo overwritten by a newer delete");
        }

        tracing::info!(id = %id, "Deleted evidence version");
        Ok(true)
    }

    /// Restore the most recently deleted row if the undo window is still open
    ///
    /// The row comes back verbatim (same id, group, version number,
    /// timestamps and insertion sequence) with its tags. No audit entry is written. Returns `None`
    /// when nothing is pending or the window has closed; the slot is empty
    /// afterwards in both cases.
    ///
    /// Fails with [`StoreError::UndoConflict`] if the group gained a newer
    /// version after the delete; that pending delete is discarded.
    pub fn undo_last_delete(&mut self) -> Result<Option<EvidenceVersion>, StoreError> {
        let now = self.now();
        let window = self.config.undo_window();

        let Some(pending) = self.undo.take_fresh(now, window) else {
            return Ok(None);
        };

        match self.restore(&pending) {
            Ok(()) => {
                tracing::info!(id = %pending.evidence.id, "Restored deleted evidence");
                Ok(Some(pending.evidence))
            }
            Err(e @ StoreError::UndoConflict { .. }) => {
                tracing::warn!("Undo rejected: {}", e);
                Err(e)
            }
            Err(e) => {
                // Nothing committed; keep the delete undoable while the window lasts.
                self.undo.stage(pending);
                Err(e)
            }
        }
    }

    fn restore(&mut self, pending: &PendingDelete) -> Result<(), StoreError> {
        let evidence = &pending.evidence;

        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let (current_max, _) = group_extent(&tx, evidence.version_group_id)?;
        if let Some(current_max) = current_max {
            if current_max > pending.group_max_after_delete.unwrap_or(0) {
                return Err(StoreError::UndoConflict {
                    evidence_id: evidence.id,
                    version_number: evidence.version_number,
                    current_max,
                });
            }
        }

        insert_version(&tx, evidence, Some(pending.seq))?;
        tags::reconcile(&tx, evidence.id, &pending.tags)?;
        tx.commit()?;
        Ok(())
    }

    /// Fetch a version with its current tag names
    pub fn get_evidence(&self, id: EvidenceId) -> Result<Option<TaggedEvidence>, StoreError> {
        let Some(evidence) = load_version(&self.conn, id)? else {
            return Ok(None);
        };
        let tags = tags::tag_names(&self.conn, id)?;
        Ok(Some(TaggedEvidence { evidence, tags }))
    }

    /// Replace the tag links of an existing version in its own transaction
    ///
    /// Returns the linked names, or `None` if the version does not exist.
    pub fn reconcile_tags<S: AsRef<str>>(
        &mut self,
        id: EvidenceId,
        raw: &[S],
    ) -> Result<Option<Vec<String>>, StoreError> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if load_version(&tx, id)?.is_none() {
            return Ok(None);
        }
        let names = tags::reconcile(&tx, id, raw)?;
        tx.commit()?;
        Ok(Some(names))
    }

    /// All versions of a group, oldest first
    pub fn history(&self, group: VersionGroupId) -> Result<Vec<EvidenceVersion>, StoreError> {
        let sql = format!(
            "SELECT {} FROM evidence WHERE version_group_id = ?1 ORDER BY version_number",
            crate::rows::EVIDENCE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let versions = stmt
            .query_map(
                rusqlite::params![group.to_string()],
                crate::rows::evidence_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ManualClock, SqliteStore, StoreConfig, StoreError};
    use rusqlite::Connection;
    use std::sync::Arc;
    use vault_domain::{EvidenceStatus, EvidenceUpdate, NewEvidence, ValidationError};

    fn store_with_clock(start: u64) -> (SqliteStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start));
        let conn = Connection::open_in_memory().unwrap();
        let store = SqliteStore::from_connection(conn, StoreConfig::default(), clock.clone()).unwrap();
        (store, clock)
    }

    fn payload(title: &str) -> NewEvidence {
        NewEvidence {
            title: title.to_string(),
            description: None,
            category: "policy".to_string(),
            status: EvidenceStatus::Draft,
            file_path: "/vault/evidence-files/1-policy.pdf".to_string(),
            tags: vec!["iso27001".to_string()],
        }
    }

    fn update_from(payload: &NewEvidence, status: EvidenceStatus) -> EvidenceUpdate {
        EvidenceUpdate {
            title: payload.title.clone(),
            description: payload.description.clone(),
            category: payload.category.clone(),
            status,
            file_path: None,
            tags: payload.tags.clone(),
        }
    }

    #[test]
    fn test_create_rejects_missing_title_without_writing() {
        let (mut store, _) = store_with_clock(1_000);
        let mut bad = payload("x");
        bad.title = " ".to_string();

        let err = store.create_evidence(bad).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::MissingField("title"))));

        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM audit_log", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_update_uses_group_max_not_source_number() {
        let (mut store, clock) = store_with_clock(1_000);
        let p = payload("Policy");
        let v1 = store.create_evidence(p.clone()).unwrap();
        clock.advance(10);
        let v2 = store.update_evidence(v1.id, update_from(&p, EvidenceStatus::Draft)).unwrap().unwrap();
        clock.advance(10);

        // Editing the old row still appends after the newest one.
        let v3 = store.update_evidence(v1.id, update_from(&p, EvidenceStatus::Draft)).unwrap().unwrap();
        assert_eq!(v2.version_number, 2);
        assert_eq!(v3.version_number, 3);
        assert_eq!(v3.created_at, v1.created_at);
    }

    #[test]
    fn test_updated_at_strictly_increases_under_frozen_clock() {
        let (mut store, _) = store_with_clock(42);
        let p = payload("Frozen");
        let v1 = store.create_evidence(p.clone()).unwrap();
        let v2 = store.update_evidence(v1.id, update_from(&p, EvidenceStatus::Draft)).unwrap().unwrap();
        let v3 = store.update_evidence(v2.id, update_from(&p, EvidenceStatus::Draft)).unwrap().unwrap();
        assert!(v1.updated_at < v2.updated_at);
        assert!(v2.updated_at < v3.updated_at);
    }

    #[test]
    fn test_update_keeps_file_when_none_given() {
        let (mut store, _) = store_with_clock(1_000);
        let p = payload("Keep file");
        let v1 = store.create_evidence(p.clone()).unwrap();

        let v2 = store.update_evidence(v1.id, update_from(&p, EvidenceStatus::Draft)).unwrap().unwrap();
        assert_eq!(v2.file_path, v1.file_path);

        let mut replace = update_from(&p, EvidenceStatus::Draft);
        replace.file_path = Some("/vault/evidence-files/2-new.pdf".to_string());
        let v3 = store.update_evidence(v2.id, replace).unwrap().unwrap();
        assert_eq!(v3.file_path, "/vault/evidence-files/2-new.pdf");
    }

    #[test]
    fn test_undo_conflict_after_group_advanced() {
        let (mut store, clock) = store_with_clock(1_000);
        let p = payload("Conflict");
        let v1 = store.create_evidence(p.clone()).unwrap();
        let v2 = store.update_evidence(v1.id, update_from(&p, EvidenceStatus::Draft)).unwrap().unwrap();

        assert!(store.delete_evidence(v2.id).unwrap());
        clock.advance(100);
        // A new version lands in the group before the undo.
        let v3 = store.update_evidence(v1.id, update_from(&p, EvidenceStatus::Draft)).unwrap().unwrap();
        assert_eq!(v3.version_number, 2);

        let err = store.undo_last_delete().unwrap_err();
        assert!(matches!(err, StoreError::UndoConflict { current_max: 2, .. }));
        assert!(store.pending_undo().is_none());
        assert!(store.get_evidence(v2.id).unwrap().is_none());
    }

    #[test]
    fn test_undo_of_older_version_is_allowed() {
        let (mut store, _) = store_with_clock(1_000);
        let p = payload("Old version");
        let v1 = store.create_evidence(p.clone()).unwrap();
        let v2 = store.update_evidence(v1.id, update_from(&p, EvidenceStatus::Draft)).unwrap().unwrap();

        assert!(store.delete_evidence(v1.id).unwrap());
        let restored = store.undo_last_delete().unwrap().unwrap();
        assert_eq!(restored, v1);

        let history = store.history(v1.version_group_id).unwrap();
        let numbers: Vec<u32> = history.iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(history[1], v2);
    }

    fn count(store: &SqliteStore, table: &str) -> i64 {
        store
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap()
    }

    fn fail_inserts_into(store: &SqliteStore, table: &str) {
        store
            .conn
            .execute_batch(&format!(
                "CREATE TRIGGER fail_{table} BEFORE INSERT ON {table}
                 BEGIN SELECT RAISE(ABORT, '{table} unavailable'); END;"
            ))
            .unwrap();
    }

    fn allow_inserts_into(store: &SqliteStore, table: &str) {
        store
            .conn
            .execute_batch(&format!("DROP TRIGGER fail_{table};"))
            .unwrap();
    }

    #[test]
    fn test_create_rolls_back_when_audit_write_fails() {
        let (mut store, _) = store_with_clock(1_000);
        fail_inserts_into(&store, "audit_log");

        let err = store.create_evidence(payload("Policy")).unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));

        assert_eq!(count(&store, "evidence"), 0);
        assert_eq!(count(&store, "evidence_tags"), 0);
        assert_eq!(count(&store, "tags"), 0);
        assert_eq!(count(&store, "audit_log"), 0);
    }

    #[test]
    fn test_update_rolls_back_when_audit_write_fails() {
        let (mut store, _) = store_with_clock(1_000);
        let p = payload("Policy");
        let v1 = store.create_evidence(p.clone()).unwrap();
        fail_inserts_into(&store, "audit_log");

        let mut changed = update_from(&p, EvidenceStatus::Submitted);
        changed.tags = vec!["soc2".to_string()];
        let err = store.update_evidence(v1.id, changed).unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));

        assert_eq!(store.history(v1.version_group_id).unwrap(), vec![v1.clone()]);
        assert_eq!(count(&store, "evidence_tags"), 1);
        assert_eq!(count(&store, "tags"), 1);
        assert_eq!(count(&store, "audit_log"), 1);
    }

    #[test]
    fn test_delete_rolls_back_when_audit_write_fails() {
        let (mut store, _) = store_with_clock(1_000);
        let v1 = store.create_evidence(payload("Policy")).unwrap();
        let before = store.get_evidence(v1.id).unwrap().unwrap();
        fail_inserts_into(&store, "audit_log");

        let err = store.delete_evidence(v1.id).unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));

        assert_eq!(store.get_evidence(v1.id).unwrap(), Some(before));
        assert_eq!(count(&store, "audit_log"), 1);
        assert!(store.pending_undo().is_none());
    }

    #[test]
    fn test_undo_rolls_back_when_tag_link_fails() {
        let (mut store, clock) = store_with_clock(1_000);
        let v1 = store.create_evidence(payload("Policy")).unwrap();
        assert!(store.delete_evidence(v1.id).unwrap());
        fail_inserts_into(&store, "evidence_tags");

        let err = store.undo_last_delete().unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));

        assert_eq!(count(&store, "evidence"), 0);
        assert_eq!(count(&store, "evidence_tags"), 0);
        assert_eq!(count(&store, "audit_log"), 2);
        // Nothing committed, so the delete is still undoable inside the window.
        assert!(store.pending_undo().is_some());

        allow_inserts_into(&store, "evidence_tags");
        clock.advance(100);
        assert_eq!(store.undo_last_delete().unwrap(), Some(v1.clone()));
        assert_eq!(store.get_evidence(v1.id).unwrap().unwrap().tags, vec!["iso27001".to_string()]);
    }

    #[test]
    fn test_listing_order_survives_vacuum() {
        let (mut store, _) = store_with_clock(1_000);
        let a = store.create_evidence(payload("A")).unwrap();
        let b = store.create_evidence(payload("B")).unwrap();
        store.delete_evidence(a.id).unwrap();
        store.undo_last_delete().unwrap().unwrap();

        store.conn.execute_batch("VACUUM;").unwrap();
        let ids: Vec<_> = store.latest_versions().unwrap().into_iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_reconcile_tags_missing_version() {
        let (mut store, _) = store_with_clock(1_000);
        let missing = vault_domain::EvidenceId::new();
        assert_eq!(store.reconcile_tags(missing, &["a"]).unwrap(), None);
    }
}
