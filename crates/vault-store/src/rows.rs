//! Row mapping between SQLite and domain types

use crate::StoreError;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;
use vault_domain::{EvidenceId, EvidenceStatus, EvidenceVersion, VersionGroupId};

/// Column list matching [`evidence_from_row`]
pub(crate) const EVIDENCE_COLUMNS: &str = "id, title, description, category, status, file_path, \
     version_group_id, version_number, created_at, updated_at";

/// Map a row selected with [`EVIDENCE_COLUMNS`]
pub(crate) fn evidence_from_row(row: &Row<'_>) -> rusqlite::Result<EvidenceVersion> {
    let id: String = row.get(0)?;
    let status: String = row.get(4)?;
    let group: String = row.get(6)?;

    let status = EvidenceStatus::parse(&status).ok_or_else(|| {
        conversion_error(4, Type::Text, format!("Unknown status: {}", status))
    })?;

    Ok(EvidenceVersion {
        id: EvidenceId::from_uuid(parse_uuid(0, &id)?),
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        status,
        file_path: row.get(5)?,
        version_group_id: VersionGroupId::from_uuid(parse_uuid(6, &group)?),
        version_number: row.get(7)?,
        created_at: row.get::<_, i64>(8)? as u64,
        updated_at: row.get::<_, i64>(9)? as u64,
    })
}

/// Parse a TEXT uuid column
pub(crate) fn parse_uuid(idx: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| conversion_error(idx, Type::Text, format!("Invalid uuid '{}': {}", value, e)))
}

pub(crate) fn conversion_error(idx: usize, ty: Type, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(StoreError::InvalidData(message)))
}

/// Load one version row by id
pub(crate) fn load_version(
    conn: &Connection,
    id: EvidenceId,
) -> Result<Option<EvidenceVersion>, StoreError> {
    let sql = format!("SELECT {} FROM evidence WHERE id = ?1", EVIDENCE_COLUMNS);
    let version = conn
        .query_row(&sql, params![id.to_string()], evidence_from_row)
        .optional()?;
    Ok(version)
}

/// Insert a version row verbatim
///
/// `seq` of `None` appends at the end of the insertion order; a restored row
/// passes the value it had before deletion.
pub(crate) fn insert_version(
    conn: &Connection,
    v: &EvidenceVersion,
    seq: Option<i64>,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO evidence (seq, id, title, description, category, status, file_path,
                               version_group_id, version_number, created_at, updated_at)
         VALUES (?11, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            v.id.to_string(),
            &v.title,
            &v.description,
            &v.category,
            v.status.as_str(),
            &v.file_path,
            v.version_group_id.to_string(),
            v.version_number,
            v.created_at as i64,
            v.updated_at as i64,
            seq,
        ],
    )?;
    Ok(())
}

/// Insertion sequence of a version row
pub(crate) fn row_seq(conn: &Connection, id: EvidenceId) -> Result<Option<i64>, StoreError> {
    let seq = conn
        .query_row(
            "SELECT seq FROM evidence WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(seq)
}

/// Highest version number and latest `updated_at` in a group
pub(crate) fn group_extent(
    conn: &Connection,
    group: VersionGroupId,
) -> Result<(Option<u32>, Option<u64>), StoreError> {
    let extent = conn.query_row(
        "SELECT MAX(version_number), MAX(updated_at) FROM evidence WHERE version_group_id = ?1",
        params![group.to_string()],
        |row| {
            let max_version: Option<u32> = row.get(0)?;
            let max_updated: Option<i64> = row.get(1)?;
            Ok((max_version, max_updated.map(|t| t as u64)))
        },
    )?;
    Ok(extent)
}
