//! Create and update payloads

use crate::{EvidenceStatus, ValidationError};
use serde::{Deserialize, Serialize};

/// Payload for creating a new evidence item (version 1 of a new group)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvidence {
    /// Title (required)
    pub title: String,

    /// Optional description; blank is treated as absent
    #[serde(default)]
    pub description: Option<String>,

    /// Category (required)
    pub category: String,

    /// Initial status
    pub status: EvidenceStatus,

    /// Managed file path (required)
    pub file_path: String,

    /// Free-form tag names
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewEvidence {
    /// Check required fields before anything is written
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("category", &self.category)?;
        require("file_path", &self.file_path)?;
        Ok(())
    }
}

/// Payload for superseding an existing version with a new one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceUpdate {
    /// Title (required)
    pub title: String,

    /// Optional description; blank is treated as absent
    #[serde(default)]
    pub description: Option<String>,

    /// Category (required)
    pub category: String,

    /// Status of the new version
    pub status: EvidenceStatus,

    /// Replacement file; `None` keeps the file of the superseded version
    #[serde(default)]
    pub file_path: Option<String>,

    /// Complete tag set for the new version
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EvidenceUpdate {
    /// Check required fields before anything is written
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("category", &self.category)?;
        if let Some(path) = &self.file_path {
            require("file_path", path)?;
        }
        Ok(())
    }
}

/// Collapse a blank description to `None`
pub fn clean_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_evidence() -> NewEvidence {
        NewEvidence {
            title: "Policy v1".to_string(),
            description: None,
            category: "policy".to_string(),
            status: EvidenceStatus::Draft,
            file_path: "/data/evidence-files/1-policy.pdf".to_string(),
            tags: vec![],
        }
    }

    #[test]
    fn test_valid_payload() {
        assert!(new_evidence().validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut payload = new_evidence();
        payload.title = "   ".to_string();
        assert_eq!(payload.validate(), Err(ValidationError::MissingField("title")));
    }

    #[test]
    fn test_missing_file_rejected() {
        let mut payload = new_evidence();
        payload.file_path = String::new();
        assert_eq!(payload.validate(), Err(ValidationError::MissingField("file_path")));
    }

    #[test]
    fn test_update_without_file_is_valid() {
        let update = EvidenceUpdate {
            title: "Policy v2".to_string(),
            description: Some("revised".to_string()),
            category: "policy".to_string(),
            status: EvidenceStatus::Submitted,
            file_path: None,
            tags: vec![],
        };
        assert!(update.validate().is_ok());

        let blank_file = EvidenceUpdate {
            file_path: Some(" ".to_string()),
            ..update
        };
        assert_eq!(blank_file.validate(), Err(ValidationError::MissingField("file_path")));
    }

    #[test]
    fn test_clean_description() {
        assert_eq!(clean_description(None), None);
        assert_eq!(clean_description(Some("  ")), None);
        assert_eq!(clean_description(Some(" notes ")), Some("notes".to_string()));
    }

    #[test]
    fn test_payload_requires_status_field() {
        let json = r#"{"title":"t","category":"c","file_path":"/f"}"#;
        assert!(serde_json::from_str::<NewEvidence>(json).is_err());
    }
}
