//! Status module - review lifecycle of an evidence version

use serde::{Deserialize, Serialize};
use std::fmt;

/// Review status of an evidence version
///
/// A change of status between two consecutive versions is audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceStatus {
    /// Being prepared, not yet handed in
    Draft,

    /// Handed in for review
    Submitted,

    /// Accepted by a reviewer
    Approved,
}

impl EvidenceStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [EvidenceStatus; 3] = [
        EvidenceStatus::Draft,
        EvidenceStatus::Submitted,
        EvidenceStatus::Approved,
    ];

    /// Get the status name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceStatus::Draft => "draft",
            EvidenceStatus::Submitted => "submitted",
            EvidenceStatus::Approved => "approved",
        }
    }

    /// Parse a status from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(EvidenceStatus::Draft),
            "submitted" => Some(EvidenceStatus::Submitted),
            "approved" => Some(EvidenceStatus::Approved),
            _ => None,
        }
    }
}

impl fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EvidenceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid status: {}", s))
    }
}

/// Status restriction used by list and export filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    /// No restriction
    #[default]
    All,

    /// Exact status match
    Only(EvidenceStatus),
}

impl StatusFilter {
    /// The status to match, if restricted
    pub fn status(&self) -> Option<EvidenceStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }
}

impl From<EvidenceStatus> for StatusFilter {
    fn from(status: EvidenceStatus) -> Self {
        StatusFilter::Only(status)
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::All => "all".to_string(),
            StatusFilter::Only(status) => status.as_str().to_string(),
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<EvidenceStatus>().map(StatusFilter::Only)
    }
}
