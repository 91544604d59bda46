//! Export assembler
//!
//! An export runs in three steps so callers can release the store between
//! them: [`ExportPlan::collect`] reads the matching latest versions,
//! [`ExportAssembler::write`] renders the report and writes the archive with
//! no store access, and [`record_export`] appends the audit entry.

use crate::archive::{ArchiveEntry, ArchiveWriter, ZipArchiveWriter};
use crate::report::{ReportRenderer, TextReportRenderer};
use crate::ExportError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use vault_domain::traits::EvidenceStore;
use vault_domain::{numbered_file_name, AuditEntry, ExportFilter, TaggedEvidence, NO_ENTITY};

/// Rows selected for an export, each with its tag names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    /// Filter the rows were selected with
    pub filter: ExportFilter,

    /// Latest versions matching the filter, in listing order
    pub rows: Vec<TaggedEvidence>,

    /// When the plan was taken (unix millis)
    pub generated_at: u64,
}

impl ExportPlan {
    /// Read every latest version matching `filter`, ignoring pagination
    pub fn collect<S>(store: &S, filter: &ExportFilter, generated_at: u64) -> Result<Self, ExportError>
    where
        S: EvidenceStore,
        S::Error: Display,
    {
        let versions = store
            .list_all(&filter.to_list_filter())
            .map_err(|e| ExportError::Store(e.to_string()))?;

        let mut rows = Vec::with_capacity(versions.len());
        for evidence in versions {
            let tags = store
                .tags_for(evidence.id)
                .map_err(|e| ExportError::Store(e.to_string()))?;
            rows.push(TaggedEvidence { evidence, tags });
        }

        tracing::debug!(rows = rows.len(), "Collected export rows");

        Ok(Self {
            filter: filter.clone(),
            rows,
            generated_at,
        })
    }

    /// Entity id for the EXPORT_PACKAGE entry: the first row, or "none"
    pub fn audit_entity_id(&self) -> String {
        self.rows
            .first()
            .map(|row| row.evidence.id.to_string())
            .unwrap_or_else(|| NO_ENTITY.to_string())
    }
}

/// Why an evidence file was left out of the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Nothing exists at the recorded path any more
    Missing,
}

/// A file that was not archived
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Recorded file path
    pub path: String,

    /// Why it was skipped
    pub reason: SkipReason,
}

/// Outcome of a completed export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Archive location
    pub destination: PathBuf,

    /// Rows in the report
    pub rows: usize,

    /// Evidence files copied into the archive
    pub files_archived: usize,

    /// Evidence files left out
    pub files_skipped: Vec<SkippedFile>,
}

impl ExportSummary {
    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Export written to {}", self.destination.display()),
            format!("  Rows: {}", self.rows),
            format!("  Files archived: {}", self.files_archived),
        ];
        if !self.files_skipped.is_empty() {
            lines.push(format!("  Files skipped: {}", self.files_skipped.len()));
            for skipped in &self.files_skipped {
                let reason = match skipped.reason {
                    SkipReason::Missing => "missing",
                };
                lines.push(format!("    {} ({})", skipped.path, reason));
            }
        }
        lines.join("\n")
    }
}

/// Drives the report renderer and archive writer for a plan
#[derive(Debug, Clone, Default)]
pub struct ExportAssembler<R = TextReportRenderer, W = ZipArchiveWriter> {
    renderer: R,
    writer: W,
}

impl ExportAssembler {
    /// Text report inside a zip archive
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: ReportRenderer, W: ArchiveWriter> ExportAssembler<R, W> {
    /// Assembler with custom collaborators
    pub fn with_parts(renderer: R, writer: W) -> Self {
        Self { renderer, writer }
    }

    /// Render the report and write the archive to `destination`
    ///
    /// Rows whose file no longer exists are skipped. A file whose base name is
    /// already taken by an earlier entry or the report gets a numeric suffix
    /// (`scan.pdf`, `scan-1.pdf`, ...).
    pub fn write(&self, plan: &ExportPlan, destination: &Path) -> Result<ExportSummary, ExportError> {
        let report = self.renderer.render(&plan.rows, plan.generated_at)?;

        let mut taken: HashSet<String> = HashSet::from([report.file_name.clone()]);
        let mut entries = Vec::new();
        let mut skipped = Vec::new();

        for row in &plan.rows {
            let path = Path::new(&row.evidence.file_path);
            if !path.is_file() {
                tracing::warn!(path = %path.display(), "Evidence file missing; skipped");
                skipped.push(SkippedFile {
                    path: row.evidence.file_path.clone(),
                    reason: SkipReason::Missing,
                });
                continue;
            }

            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                skipped.push(SkippedFile {
                    path: row.evidence.file_path.clone(),
                    reason: SkipReason::Missing,
                });
                continue;
            };

            let mut attempt = 0u32;
            let entry_name = loop {
                let candidate = numbered_file_name(&name, attempt);
                if taken.insert(candidate.clone()) {
                    break candidate;
                }
                attempt += 1;
            };
            if attempt > 0 {
                tracing::debug!(path = %path.display(), name = %entry_name, "Archive name taken; numbered");
            }

            entries.push(ArchiveEntry {
                name: entry_name,
                source: path.to_path_buf(),
            });
        }

        self.writer.write_archive(destination, &report, &entries)?;

        tracing::info!(
            destination = %destination.display(),
            rows = plan.rows.len(),
            files = entries.len(),
            skipped = skipped.len(),
            "Export package written"
        );

        Ok(ExportSummary {
            destination: destination.to_path_buf(),
            rows: plan.rows.len(),
            files_archived: entries.len(),
            files_skipped: skipped,
        })
    }

    /// Collect, write and record an export in one call
    pub fn build<S>(
        &self,
        store: &mut S,
        filter: &ExportFilter,
        destination: &Path,
        generated_at: u64,
    ) -> Result<ExportSummary, ExportError>
    where
        S: EvidenceStore,
        S::Error: Display,
    {
        let plan = ExportPlan::collect(store, filter, generated_at)?;
        let summary = self.write(&plan, destination)?;
        record_export(store, &plan)?;
        Ok(summary)
    }
}

/// Append the EXPORT_PACKAGE audit entry for a written plan
pub fn record_export<S>(store: &mut S, plan: &ExportPlan) -> Result<AuditEntry, ExportError>
where
    S: EvidenceStore,
    S::Error: Display,
{
    store
        .record_export(&plan.audit_entity_id())
        .map_err(|e| ExportError::Store(e.to_string()))
}
