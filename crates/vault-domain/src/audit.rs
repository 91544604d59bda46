//! Audit trail records

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Actor recorded on every entry; there is no user identity in this system
pub const SYSTEM_ACTOR: &str = "system";

/// Entity type recorded for evidence transitions
pub const ENTITY_EVIDENCE: &str = "evidence";

/// Entity id recorded for an export that matched no evidence
pub const NO_ENTITY: &str = "none";

/// Tracked state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A new evidence group was created (version 1)
    Create,

    /// A new version changed the status of its predecessor
    StatusChange,

    /// A single version row was deleted
    Delete,

    /// An export package was built
    ExportPackage,
}

impl AuditAction {
    /// Name stored in the `action_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::StatusChange => "STATUS_CHANGE",
            AuditAction::Delete => "DELETE",
            AuditAction::ExportPackage => "EXPORT_PACKAGE",
        }
    }

    /// Parse a stored action name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE" => Some(AuditAction::Create),
            "STATUS_CHANGE" => Some(AuditAction::StatusChange),
            "DELETE" => Some(AuditAction::Delete),
            "EXPORT_PACKAGE" => Some(AuditAction::ExportPackage),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable audit log record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry id
    pub id: Uuid,

    /// What happened
    pub action_type: AuditAction,

    /// Id of the affected entity (an evidence version id, or "none")
    pub entity_id: String,

    /// Kind of the affected entity
    pub entity_type: String,

    /// Who did it (always "system")
    pub actor: String,

    /// When it happened (unix millis)
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        for action in [
            AuditAction::Create,
            AuditAction::StatusChange,
            AuditAction::Delete,
            AuditAction::ExportPackage,
        ] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("create"), None);
    }

    #[test]
    fn test_action_serializes_like_column_value() {
        let json = serde_json::to_string(&AuditAction::StatusChange).unwrap();
        assert_eq!(json, "\"STATUS_CHANGE\"");
    }
}
