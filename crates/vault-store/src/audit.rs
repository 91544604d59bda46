//! Audit recorder
//!
//! Entries are appended on the caller's connection so they commit or roll
//! back together with the state change they describe.

use crate::rows::{conversion_error, parse_uuid};
use crate::StoreError;
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use uuid::Uuid;
use vault_domain::{AuditAction, AuditEntry, ENTITY_EVIDENCE, SYSTEM_ACTOR};

/// Append one evidence audit entry
pub(crate) fn record(
    conn: &Connection,
    action: AuditAction,
    entity_id: &str,
    now: u64,
) -> Result<AuditEntry, StoreError> {
    let entry = AuditEntry {
        id: Uuid::now_v7(),
        action_type: action,
        entity_id: entity_id.to_string(),
        entity_type: ENTITY_EVIDENCE.to_string(),
        actor: SYSTEM_ACTOR.to_string(),
        timestamp: now,
    };

    conn.execute(
        "INSERT INTO audit_log (id, action_type, entity_id, entity_type, actor, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.id.to_string(),
            entry.action_type.as_str(),
            &entry.entity_id,
            &entry.entity_type,
            &entry.actor,
            entry.timestamp as i64,
        ],
    )?;

    Ok(entry)
}

/// Most recent entries first; equal timestamps fall back to reverse insertion order
pub(crate) fn list(conn: &Connection, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, action_type, entity_id, entity_type, actor, timestamp
         FROM audit_log
         ORDER BY timestamp DESC, seq DESC
         LIMIT ?1",
    )?;

    let entries = stmt
        .query_map(params![limit as i64], |row| {
            let id: String = row.get(0)?;
            let action: String = row.get(1)?;
            let action_type = AuditAction::parse(&action).ok_or_else(|| {
                conversion_error(1, Type::Text, format!("Unknown audit action: {}", action))
            })?;

            Ok(AuditEntry {
                id: parse_uuid(0, &id)?,
                action_type,
                entity_id: row.get(2)?,
                entity_type: row.get(3)?,
                actor: row.get(4)?,
                timestamp: row.get::<_, i64>(5)? as u64,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}
