//! Tag reconciliation
//!
//! The link set of a version is replaced wholesale: delete every existing
//! link, then link each normalised name. Tags themselves are never deleted.

use crate::StoreError;
use rusqlite::{params, Connection};
use uuid::Uuid;
use vault_domain::{normalize_tags, EvidenceId};

/// Make the tag links of `evidence_id` exactly equal to the normalised `raw` set
///
/// Creates missing tags by name. Returns the linked names, sorted. Callers run
/// this inside the transaction that wrote the version row.
pub(crate) fn reconcile<S: AsRef<str>>(
    conn: &Connection,
    evidence_id: EvidenceId,
    raw: &[S],
) -> Result<Vec<String>, StoreError> {
    let names = normalize_tags(raw);
    let evidence_key = evidence_id.to_string();

    unlink_all(conn, evidence_id)?;

    let mut insert_tag = conn.prepare_cached("INSERT OR IGNORE INTO tags (id, name) VALUES (?1, ?2)")?;
    let mut select_tag = conn.prepare_cached("SELECT id FROM tags WHERE name = ?1")?;
    let mut link = conn.prepare_cached(
        "INSERT OR IGNORE INTO evidence_tags (evidence_id, tag_id) VALUES (?1, ?2)",
    )?;

    for name in &names {
        insert_tag.execute(params![Uuid::now_v7().to_string(), name])?;
        let tag_id: String = select_tag.query_row(params![name], |row| row.get(0))?;
        link.execute(params![&evidence_key, &tag_id])?;
    }

    Ok(names)
}

/// Tag names linked to a version, sorted by name
pub(crate) fn tag_names(conn: &Connection, evidence_id: EvidenceId) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT t.name FROM tags t
         JOIN evidence_tags et ON et.tag_id = t.id
         WHERE et.evidence_id = ?1
         ORDER BY t.name",
    )?;
    let names = stmt
        .query_map(params![evidence_id.to_string()], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

/// Remove every link of a version
pub(crate) fn unlink_all(conn: &Connection, evidence_id: EvidenceId) -> Result<usize, StoreError> {
    let removed = conn.execute(
        "DELETE FROM evidence_tags WHERE evidence_id = ?1",
        params![evidence_id.to_string()],
    )?;
    Ok(removed)
}
