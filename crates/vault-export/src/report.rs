//! Report rendering

use crate::ExportError;
use chrono::{DateTime, Utc};
use vault_domain::TaggedEvidence;

/// File name of the report produced by [`TextReportRenderer`]
pub const REPORT_FILE_NAME: &str = "report.txt";

/// A rendered report, ready to be placed in the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    /// Entry name inside the archive
    pub file_name: String,

    /// Report contents
    pub bytes: Vec<u8>,
}

/// Renders the rows of an export into a report artifact
///
/// Zero rows is a valid input and must produce a report.
pub trait ReportRenderer {
    /// Render `rows`, stamped with `generated_at` (unix millis)
    fn render(&self, rows: &[TaggedEvidence], generated_at: u64) -> Result<ReportArtifact, ExportError>;
}

/// Plain-text report: one line per row
#[derive(Debug, Clone)]
pub struct TextReportRenderer {
    title: String,
}

impl TextReportRenderer {
    /// Renderer with a custom heading
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

impl Default for TextReportRenderer {
    fn default() -> Self {
        Self::new("Evidence Export Report")
    }
}

impl ReportRenderer for TextReportRenderer {
    fn render(&self, rows: &[TaggedEvidence], generated_at: u64) -> Result<ReportArtifact, ExportError> {
        let mut lines = vec![
            self.title.clone(),
            format!("Generated: {}", format_millis(generated_at)),
            format!("Rows: {}", rows.len()),
            String::new(),
        ];

        if rows.is_empty() {
            lines.push("No evidence matched the export filter.".to_string());
        } else {
            lines.push("Title | Category | Status | Version | Tags".to_string());
            for row in rows {
                let e = &row.evidence;
                lines.push(format!(
                    "{} | {} | {} | {} | {}",
                    e.title,
                    e.category,
                    e.status,
                    e.version_number,
                    row.tags.join(", ")
                ));
            }
        }

        let mut body = lines.join("\n");
        body.push('\n');

        Ok(ReportArtifact {
            file_name: REPORT_FILE_NAME.to_string(),
            bytes: body.into_bytes(),
        })
    }
}

/// UTC wall-clock rendering of a unix-millis timestamp
pub(crate) fn format_millis(millis: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}
