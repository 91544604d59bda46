//! Integration tests for vault-store
//!
//! These tests drive the store through its public surface: versioning,
//! delete/undo, tag reconciliation, listing and the audit log.

use std::collections::HashSet;
use std::sync::Arc;

use vault_domain::traits::EvidenceStore;
use vault_domain::{
    AuditAction, CategoryFilter, EvidenceStatus, EvidenceUpdate, EvidenceVersion, ListFilter,
    NewEvidence, SortDirection, SortField, StatusFilter, NO_ENTITY,
};
use vault_store::{ManualClock, SqliteStore, StoreConfig, StoreError};

fn store_at(start: u64) -> (SqliteStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start));
    let store = SqliteStore::with_options(":memory:", StoreConfig::default(), clock.clone())
        .expect("store should open");
    (store, clock)
}

fn new_evidence(title: &str, category: &str, status: EvidenceStatus, tags: &[&str]) -> NewEvidence {
    NewEvidence {
        title: title.to_string(),
        description: None,
        category: category.to_string(),
        status,
        file_path: format!("/vault/evidence-files/{}.pdf", title.replace(' ', "-")),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn edit(version: &EvidenceVersion, status: EvidenceStatus, tags: &[&str]) -> EvidenceUpdate {
    EvidenceUpdate {
        title: version.title.clone(),
        description: version.description.clone(),
        category: version.category.clone(),
        status,
        file_path: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn audit_actions(store: &SqliteStore) -> Vec<AuditAction> {
    store
        .list_audit(500)
        .unwrap()
        .into_iter()
        .map(|e| e.action_type)
        .collect()
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_on_disk_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.db");

    let created = {
        let mut store = SqliteStore::new(&path).unwrap();
        store
            .create(new_evidence("Access review", "access", EvidenceStatus::Draft, &["q1"]))
            .unwrap()
    };

    let store = SqliteStore::new(&path).unwrap();
    let fetched = store.get(created.id).unwrap().expect("row should persist");
    assert_eq!(fetched.evidence, created);
    assert_eq!(fetched.tags, vec!["q1".to_string()]);
    assert_eq!(store.list_audit(10).unwrap().len(), 1);
}

#[test]
fn test_version_numbers_are_contiguous() {
    let (mut store, clock) = store_at(1_000);
    let v1 = store
        .create(new_evidence("Backup policy", "policy", EvidenceStatus::Draft, &[]))
        .unwrap();

    // Always edit from version 1 so the source number never drives allocation.
    let mut numbers = vec![v1.version_number];
    for _ in 0..4 {
        clock.advance(5);
        let next = store
            .update(v1.id, edit(&v1, EvidenceStatus::Draft, &[]))
            .unwrap()
            .expect("source version exists");
        numbers.push(next.version_number);
    }

    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    let history = store.history(v1.version_group_id).unwrap();
    assert_eq!(
        history.iter().map(|v| v.version_number).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
}

#[test]
fn test_group_timestamps() {
    let (mut store, clock) = store_at(50_000);
    let v1 = store
        .create(new_evidence("Pen test", "security", EvidenceStatus::Draft, &[]))
        .unwrap();

    let mut last = v1.clone();
    for step in [100, 0, 0, 250] {
        clock.advance(step);
        last = store
            .update(last.id, edit(&last, EvidenceStatus::Draft, &[]))
            .unwrap()
            .unwrap();
    }

    let history = store.history(v1.version_group_id).unwrap();
    assert!(history.iter().all(|v| v.created_at == v1.created_at));
    for pair in history.windows(2) {
        assert!(
            pair[1].updated_at > pair[0].updated_at,
            "updated_at must strictly increase with version_number"
        );
    }
}

#[test]
fn test_update_missing_version_returns_none() {
    let (mut store, _) = store_at(1_000);
    let v1 = store
        .create(new_evidence("SOC report", "audit", EvidenceStatus::Draft, &[]))
        .unwrap();
    store.delete(v1.id).unwrap();

    let result = store.update(v1.id, edit(&v1, EvidenceStatus::Approved, &[])).unwrap();
    assert!(result.is_none());
    assert!(store.get(v1.id).unwrap().is_none());
}

#[test]
fn test_policy_scenario() {
    let (mut store, clock) = store_at(10_000);

    let v1 = store
        .create(new_evidence(
            "Policy v1",
            "policy",
            EvidenceStatus::Draft,
            &["iso27001", " ISO27001"],
        ))
        .unwrap();
    assert_eq!(v1.version_number, 1);

    let tagged = store.get(v1.id).unwrap().unwrap();
    assert_eq!(tagged.tags, vec!["ISO27001".to_string(), "iso27001".to_string()]);
    assert_eq!(audit_actions(&store), vec![AuditAction::Create]);

    clock.advance(1_000);
    let v2 = store
        .update(v1.id, edit(&v1, EvidenceStatus::Submitted, &["iso27001", "ISO27001"]))
        .unwrap()
        .unwrap();
    assert_eq!(v2.version_number, 2);
    assert_eq!(v2.version_group_id, v1.version_group_id);
    assert_eq!(v2.created_at, v1.created_at);
    assert!(v2.updated_at > v1.updated_at);

    let audit = store.list_audit(500).unwrap();
    assert_eq!(audit.len(), 2);
    assert_eq!(audit[0].action_type, AuditAction::StatusChange);
    assert_eq!(audit[0].entity_id, v2.id.to_string());

    let submitted = ListFilter {
        status: StatusFilter::Only(EvidenceStatus::Submitted),
        ..Default::default()
    };
    let page = store.list(&submitted).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, v2.id);

    // Only version 2 is submitted, so history widens nothing here.
    let with_history = ListFilter {
        include_history: true,
        ..submitted
    };
    let page = store.list(&with_history).unwrap();
    assert_eq!(page.items.iter().map(|v| v.id).collect::<Vec<_>>(), vec![v2.id]);

    let everything = ListFilter {
        include_history: true,
        sort_dir: SortDirection::Asc,
        ..Default::default()
    };
    let page = store.list(&everything).unwrap();
    assert_eq!(
        page.items.iter().map(|v| v.version_number).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[test]
fn test_update_without_status_change_is_not_audited() {
    let (mut store, _) = store_at(1_000);
    let v1 = store
        .create(new_evidence("DR plan", "continuity", EvidenceStatus::Draft, &[]))
        .unwrap();
    store
        .update(v1.id, edit(&v1, EvidenceStatus::Draft, &["reviewed"]))
        .unwrap()
        .unwrap();

    assert_eq!(audit_actions(&store), vec![AuditAction::Create]);
}

#[test]
fn test_latest_only_listing() {
    let (mut store, clock) = store_at(1_000);
    let a = store
        .create(new_evidence("Alpha", "policy", EvidenceStatus::Draft, &[]))
        .unwrap();
    clock.advance(10);
    let b = store
        .create(new_evidence("Beta", "policy", EvidenceStatus::Draft, &[]))
        .unwrap();
    clock.advance(10);
    let a2 = store
        .update(a.id, edit(&a, EvidenceStatus::Approved, &[]))
        .unwrap()
        .unwrap();
    clock.advance(10);
    let a3 = store
        .update(a.id, edit(&a, EvidenceStatus::Submitted, &[]))
        .unwrap()
        .unwrap();

    let page = store.list(&ListFilter::default()).unwrap();
    assert_eq!(page.total, 2);
    let groups: HashSet<_> = page.items.iter().map(|v| v.version_group_id).collect();
    assert_eq!(groups.len(), 2);
    let ids: HashSet<_> = page.items.iter().map(|v| v.id).collect();
    assert_eq!(ids, HashSet::from([a3.id, b.id]));

    let latest = store.latest_versions().unwrap();
    assert_eq!(latest.iter().map(|v| v.id).collect::<Vec<_>>(), vec![b.id, a3.id]);

    let history = store
        .list(&ListFilter {
            include_history: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(history.total, 4);
    assert!(history.items.iter().any(|v| v.id == a2.id));
}

#[test]
fn test_status_filter_applies_after_latest_selection() {
    let (mut store, _) = store_at(1_000);
    let v1 = store
        .create(new_evidence("Vendor list", "vendors", EvidenceStatus::Approved, &[]))
        .unwrap();
    store
        .update(v1.id, edit(&v1, EvidenceStatus::Draft, &[]))
        .unwrap()
        .unwrap();

    // The approved row is superseded, so it must not resurface as "latest".
    let approved = ListFilter {
        status: StatusFilter::Only(EvidenceStatus::Approved),
        ..Default::default()
    };
    assert_eq!(store.list(&approved).unwrap().total, 0);
}

#[test]
fn test_delete_then_undo_restores_identical_row() {
    let (mut store, clock) = store_at(1_000);
    let v1 = store
        .create(new_evidence("Firewall rules", "network", EvidenceStatus::Draft, &["fw", "edge"]))
        .unwrap();
    let before = store.get(v1.id).unwrap().unwrap();

    assert!(store.delete(v1.id).unwrap());
    assert!(store.get(v1.id).unwrap().is_none());
    assert!(store.pending_undo().is_some());

    clock.advance(4_999);
    let restored = store.undo_delete().unwrap().expect("inside the undo window");
    assert_eq!(restored, before.evidence);
    assert_eq!(store.get(v1.id).unwrap().unwrap(), before);

    assert!(store.undo_delete().unwrap().is_none());
    assert!(store.pending_undo().is_none());
}

#[test]
fn test_undo_after_window_returns_none() {
    let (mut store, clock) = store_at(1_000);
    let v1 = store
        .create(new_evidence("Old scan", "network", EvidenceStatus::Draft, &[]))
        .unwrap();
    store.delete(v1.id).unwrap();

    clock.advance(5_001);
    assert!(store.undo_delete().unwrap().is_none());
    assert!(store.get(v1.id).unwrap().is_none());
}

#[test]
fn test_undo_at_exactly_the_window_succeeds() {
    let (mut store, clock) = store_at(1_000);
    let v1 = store
        .create(new_evidence("Edge scan", "network", EvidenceStatus::Draft, &["edge"]))
        .unwrap();
    store.delete(v1.id).unwrap();

    clock.advance(5_000);
    let restored = store.undo_delete().unwrap().expect("age equal to the window is still open");
    assert_eq!(restored, v1);
    assert_eq!(store.tags_for(v1.id).unwrap(), vec!["edge".to_string()]);
}

#[test]
fn test_undo_keeps_listing_position() {
    let (mut store, _) = store_at(1_000);
    let a = store
        .create(new_evidence("A", "misc", EvidenceStatus::Draft, &[]))
        .unwrap();
    let b = store
        .create(new_evidence("B", "misc", EvidenceStatus::Draft, &[]))
        .unwrap();
    let c = store
        .create(new_evidence("C", "misc", EvidenceStatus::Draft, &[]))
        .unwrap();
    let titles = |store: &SqliteStore, include_history: bool| -> Vec<String> {
        let filter = ListFilter {
            include_history,
            ..Default::default()
        };
        store
            .list(&filter)
            .unwrap()
            .items
            .into_iter()
            .map(|v| v.title)
            .collect()
    };
    let before = titles(&store, false);
    assert_eq!(before, vec!["A", "B", "C"]);

    store.delete(a.id).unwrap();
    store.undo_delete().unwrap().unwrap();
    assert_eq!(titles(&store, false), before);
    assert_eq!(titles(&store, true), before);

    store.delete(b.id).unwrap();
    store.undo_delete().unwrap().unwrap();
    assert_eq!(titles(&store, false), before);
    let latest: Vec<_> = store.latest_versions().unwrap().iter().map(|v| v.id).collect();
    assert_eq!(latest, vec![a.id, b.id, c.id]);
}

#[test]
fn test_second_delete_replaces_pending_undo() {
    let (mut store, _) = store_at(1_000);
    let a = store
        .create(new_evidence("A", "misc", EvidenceStatus::Draft, &[]))
        .unwrap();
    let b = store
        .create(new_evidence("B", "misc", EvidenceStatus::Draft, &[]))
        .unwrap();

    store.delete(a.id).unwrap();
    store.delete(b.id).unwrap();

    let restored = store.undo_delete().unwrap().unwrap();
    assert_eq!(restored.id, b.id);
    assert!(store.get(a.id).unwrap().is_none());
}

#[test]
fn test_delete_missing_is_false_and_unaudited() {
    let (mut store, _) = store_at(1_000);
    let v1 = store
        .create(new_evidence("Once", "misc", EvidenceStatus::Draft, &[]))
        .unwrap();
    assert!(store.delete(v1.id).unwrap());
    assert!(!store.delete(v1.id).unwrap());

    assert_eq!(audit_actions(&store), vec![AuditAction::Delete, AuditAction::Create]);
}

#[test]
fn test_undo_conflict_is_an_error() {
    let (mut store, clock) = store_at(1_000);
    let v1 = store
        .create(new_evidence("Asset list", "assets", EvidenceStatus::Draft, &[]))
        .unwrap();
    let v2 = store
        .update(v1.id, edit(&v1, EvidenceStatus::Submitted, &[]))
        .unwrap()
        .unwrap();
    store.delete(v2.id).unwrap();
    clock.advance(10);
    store
        .update(v1.id, edit(&v1, EvidenceStatus::Approved, &[]))
        .unwrap()
        .unwrap();

    let err = store.undo_delete().unwrap_err();
    assert!(matches!(err, StoreError::UndoConflict { .. }));
    assert!(store.get(v2.id).unwrap().is_none());
}

#[test]
fn test_tag_reconciliation_is_idempotent() {
    let (mut store, _) = store_at(1_000);
    let v1 = store
        .create(new_evidence("Tagged", "misc", EvidenceStatus::Draft, &[]))
        .unwrap();
    let expected = vec!["A".to_string(), "B".to_string(), "a".to_string()];

    for _ in 0..2 {
        let linked = store.reconcile_tags(v1.id, &["A", "a ", "B"]).unwrap();
        assert_eq!(linked, Some(expected.clone()));
        assert_eq!(store.tags_for(v1.id).unwrap(), expected);
    }
}

#[test]
fn test_tags_stay_with_their_version() {
    let (mut store, _) = store_at(1_000);
    let v1 = store
        .create(new_evidence("Audit trail", "logs", EvidenceStatus::Draft, &["old"]))
        .unwrap();
    let v2 = store
        .update(v1.id, edit(&v1, EvidenceStatus::Draft, &["new"]))
        .unwrap()
        .unwrap();

    assert_eq!(store.tags_for(v1.id).unwrap(), vec!["old".to_string()]);
    assert_eq!(store.tags_for(v2.id).unwrap(), vec!["new".to_string()]);
}

#[test]
fn test_search_is_case_insensitive_over_tags_and_text() {
    let (mut store, clock) = store_at(1_000);
    let by_title = store
        .create(new_evidence("ÉCOLE badge audit", "access", EvidenceStatus::Draft, &[]))
        .unwrap();
    clock.advance(1);
    let mut with_description = new_evidence("Visitor log", "access", EvidenceStatus::Draft, &[]);
    with_description.description = Some("Reviewed at the École site".to_string());
    let by_description = store.create(with_description).unwrap();
    clock.advance(1);
    let by_tag = store
        .create(new_evidence("Camera export", "access", EvidenceStatus::Draft, &["Site-École"]))
        .unwrap();
    clock.advance(1);
    store
        .create(new_evidence("Unrelated", "access", EvidenceStatus::Draft, &["other"]))
        .unwrap();

    let filter = ListFilter {
        search: "  école ".to_string(),
        sort_dir: SortDirection::Asc,
        ..Default::default()
    };
    let page = store.list(&filter).unwrap();
    assert_eq!(
        page.items.iter().map(|v| v.id).collect::<Vec<_>>(),
        vec![by_title.id, by_description.id, by_tag.id]
    );
}

#[test]
fn test_search_treats_like_wildcards_literally() {
    let (mut store, _) = store_at(1_000);
    store
        .create(new_evidence("Coverage 100% report", "metrics", EvidenceStatus::Draft, &[]))
        .unwrap();
    store
        .create(new_evidence("Coverage 1000 report", "metrics", EvidenceStatus::Draft, &[]))
        .unwrap();

    let filter = ListFilter {
        search: "100%".to_string(),
        ..Default::default()
    };
    assert_eq!(store.list(&filter).unwrap().total, 1);
}

#[test]
fn test_pagination_reports_unpaginated_total() {
    let (mut store, clock) = store_at(1_000);
    for i in 0..7 {
        clock.advance(1);
        store
            .create(new_evidence(&format!("Item {}", i), "bulk", EvidenceStatus::Draft, &[]))
            .unwrap();
    }

    let mut filter = ListFilter {
        page_size: 3,
        sort_dir: SortDirection::Asc,
        ..Default::default()
    };
    let mut seen = Vec::new();
    for page in 1..=3 {
        filter.page = page;
        let result = store.list(&filter).unwrap();
        assert_eq!(result.total, 7);
        assert_eq!(result.page_count(3), 3);
        seen.extend(result.items.into_iter().map(|v| v.title));
    }
    let expected: Vec<String> = (0..7).map(|i| format!("Item {}", i)).collect();
    assert_eq!(seen, expected);

    filter.page = 4;
    let past_end = store.list(&filter).unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total, 7);
}

#[test]
fn test_equal_sort_keys_keep_insertion_order() {
    // A frozen clock gives every row the same created_at.
    let (mut store, _) = store_at(1_000);
    let ids: Vec<_> = (0..4)
        .map(|i| {
            store
                .create(new_evidence(&format!("Same {}", i), "tie", EvidenceStatus::Draft, &[]))
                .unwrap()
                .id
        })
        .collect();

    for dir in [SortDirection::Asc, SortDirection::Desc] {
        let filter = ListFilter {
            sort_dir: dir,
            ..Default::default()
        };
        let listed: Vec<_> = store.list(&filter).unwrap().items.into_iter().map(|v| v.id).collect();
        assert_eq!(listed, ids);
    }
}

#[test]
fn test_sort_by_status() {
    let (mut store, clock) = store_at(1_000);
    for status in [EvidenceStatus::Submitted, EvidenceStatus::Approved, EvidenceStatus::Draft] {
        clock.advance(1);
        store
            .create(new_evidence(status.as_str(), "mixed", status, &[]))
            .unwrap();
    }

    let filter = ListFilter {
        sort_by: SortField::Status,
        sort_dir: SortDirection::Asc,
        ..Default::default()
    };
    let statuses: Vec<_> = store
        .list(&filter)
        .unwrap()
        .items
        .into_iter()
        .map(|v| v.status)
        .collect();
    assert_eq!(
        statuses,
        vec![EvidenceStatus::Approved, EvidenceStatus::Draft, EvidenceStatus::Submitted]
    );
}

#[test]
fn test_category_filter_and_listing() {
    let (mut store, _) = store_at(1_000);
    store
        .create(new_evidence("One", "network", EvidenceStatus::Draft, &[]))
        .unwrap();
    store
        .create(new_evidence("Two", "access", EvidenceStatus::Draft, &[]))
        .unwrap();
    store
        .create(new_evidence("Three", "network", EvidenceStatus::Draft, &[]))
        .unwrap();

    let filter = ListFilter {
        category: CategoryFilter::Exact("network".to_string()),
        ..Default::default()
    };
    assert_eq!(store.list(&filter).unwrap().total, 2);
    assert_eq!(store.list_all(&filter).unwrap().len(), 2);
    assert_eq!(
        store.categories().unwrap(),
        vec!["access".to_string(), "network".to_string()]
    );
}

#[test]
fn test_audit_is_newest_first_and_limited() {
    let (mut store, clock) = store_at(1_000);
    let v1 = store
        .create(new_evidence("Log", "logs", EvidenceStatus::Draft, &[]))
        .unwrap();
    // Same timestamp as the CREATE entry: insertion order decides.
    store.record_export(NO_ENTITY).unwrap();
    clock.advance(1);
    store.delete(v1.id).unwrap();

    let audit = store.list_audit(500).unwrap();
    assert_eq!(
        audit.iter().map(|e| e.action_type).collect::<Vec<_>>(),
        vec![AuditAction::Delete, AuditAction::ExportPackage, AuditAction::Create]
    );
    assert_eq!(audit[1].entity_id, NO_ENTITY);
    assert!(audit.iter().all(|e| e.actor == "system" && e.entity_type == "evidence"));

    assert_eq!(store.list_audit(1).unwrap().len(), 1);
}

#[test]
fn test_validation_error_writes_nothing() {
    let (mut store, _) = store_at(1_000);
    let mut bad = new_evidence("x", "misc", EvidenceStatus::Draft, &["t"]);
    bad.category = String::new();

    let err = store.create(bad).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.list(&ListFilter::default()).unwrap().total, 0);
    assert!(store.list_audit(500).unwrap().is_empty());
}
