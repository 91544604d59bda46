//! Evidence Vault Domain Layer
//!
//! Value types and trait interfaces shared by every other crate in the
//! workspace. Nothing in here touches the disk or the database.
//!
//! ## Key Concepts
//!
//! - **Evidence version**: one immutable row in the history of a logical evidence item
//! - **Version group**: all versions of one logical item, linked by a shared group id
//! - **Latest version**: the row with the highest version number in its group
//! - **Audit entry**: an append-only record of a tracked state transition
//! - **Undo window**: the short period after a delete during which it can be reverted

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod error;
pub mod evidence;
pub mod filter;
pub mod naming;
pub mod payload;
pub mod status;
pub mod tags;
pub mod traits;

// Re-exports for convenience
pub use audit::{AuditAction, AuditEntry, ENTITY_EVIDENCE, NO_ENTITY, SYSTEM_ACTOR};
pub use error::ValidationError;
pub use evidence::{EvidenceId, EvidenceVersion, TaggedEvidence, VersionGroupId};
pub use naming::numbered_file_name;
pub use filter::{CategoryFilter, EvidencePage, ExportFilter, ListFilter, SortDirection, SortField};
pub use payload::{EvidenceUpdate, NewEvidence};
pub use status::{EvidenceStatus, StatusFilter};
pub use tags::normalize_tags;
