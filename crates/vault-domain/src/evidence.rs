//! Evidence module - versions, version groups and their identifiers

use crate::EvidenceStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of one specific evidence version row
///
/// Backed by a UUIDv7 so ids sort roughly by creation time. A restored
/// (undone) row keeps the id it had before deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceId(Uuid);

impl EvidenceId {
    /// Generate a fresh version id
    ///
    /// # Examples
    ///
    /// ```
    /// use vault_domain::EvidenceId;
    ///
    /// let a = EvidenceId::new();
    /// let b = EvidenceId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID (storage layer deserialization)
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an id from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use vault_domain::EvidenceId;
    ///
    /// let id = EvidenceId::new();
    /// let parsed = EvidenceId::parse(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| format!("Invalid evidence id '{}': {}", s, e))
    }

    /// Borrow the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EvidenceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EvidenceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Identifier shared by every version of one logical evidence item
///
/// Allocated once on create and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionGroupId(Uuid);

impl VersionGroupId {
    /// Generate a fresh group id
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a group id from its hyphenated string form
    pub fn parse(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| format!("Invalid version group id '{}': {}", s, e))
    }
}

impl Default for VersionGroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VersionGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of evidence history
///
/// Rows are append-only within a version group: editing an item inserts a new
/// row with the same `version_group_id` and the next `version_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceVersion {
    /// Id of this specific version row
    pub id: EvidenceId,

    /// Group shared by all versions of the same logical item
    pub version_group_id: VersionGroupId,

    /// 1-based, strictly increasing within the group
    pub version_number: u32,

    /// Short human readable title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Free-form category (e.g. "policy", "log", "screenshot")
    pub category: String,

    /// Review status
    pub status: EvidenceStatus,

    /// Absolute path of the managed copy of the evidence file
    pub file_path: String,

    /// Creation time of the group (unix millis), copied to every version
    pub created_at: u64,

    /// Time this row was written (unix millis)
    pub updated_at: u64,
}

impl EvidenceVersion {
    /// Whether `other` belongs to the same logical evidence item
    pub fn same_group(&self, other: &EvidenceVersion) -> bool {
        self.version_group_id == other.version_group_id
    }
}

/// An evidence version together with the names of its linked tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedEvidence {
    /// The version row
    #[serde(flatten)]
    pub evidence: EvidenceVersion,

    /// Tag names linked to exactly this version, sorted
    pub tags: Vec<String>,
}
