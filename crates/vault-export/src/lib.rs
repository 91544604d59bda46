//! Evidence Vault Export
//!
//! Builds export packages: a report over the latest versions matching a
//! filter plus copies of their evidence files, written to one zip archive,
//! followed by an EXPORT_PACKAGE audit entry.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use vault_domain::ExportFilter;
//! use vault_export::ExportAssembler;
//! use vault_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("vault.db")?;
//! let summary = ExportAssembler::new().build(
//!     &mut store,
//!     &ExportFilter::default(),
//!     Path::new("package.zip"),
//!     0,
//! )?;
//! println!("{}", summary.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod archive;
mod assembler;
mod error;
mod report;

pub use archive::{ArchiveEntry, ArchiveWriter, ZipArchiveWriter};
pub use assembler::{
    record_export, ExportAssembler, ExportPlan, ExportSummary, SkipReason, SkippedFile,
};
pub use error::ExportError;
pub use report::{ReportArtifact, ReportRenderer, TextReportRenderer, REPORT_FILE_NAME};
