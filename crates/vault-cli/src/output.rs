//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use vault_domain::{AuditEntry, EvidencePage, EvidenceStatus, EvidenceVersion, TaggedEvidence};
use vault_sdk::{ExportSummary, Theme};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format one page of a listing.
    pub fn format_page(&self, page: &EvidencePage, page_number: u32, page_size: u32) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(page)?),
            OutputFormat::Quiet => Ok(ids(&page.items)),
            OutputFormat::Table => {
                if page.items.is_empty() {
                    return Ok(self.colorize("No evidence found.", "yellow"));
                }
                let footer = format!(
                    "Page {} of {} ({} total)",
                    page_number,
                    page.page_count(page_size).max(1),
                    page.total
                );
                Ok(format!("{}\n{}", self.versions_table(&page.items), footer))
            }
        }
    }

    /// Format a list of versions (e.g. a group history).
    pub fn format_versions(&self, versions: &[EvidenceVersion]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(versions)?),
            OutputFormat::Quiet => Ok(ids(versions)),
            OutputFormat::Table => {
                if versions.is_empty() {
                    return Ok(self.colorize("No evidence found.", "yellow"));
                }
                Ok(self.versions_table(versions))
            }
        }
    }

    /// Format a single version with its tags.
    pub fn format_evidence(&self, tagged: &TaggedEvidence) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(tagged)?),
            OutputFormat::Quiet => Ok(tagged.evidence.id.to_string()),
            OutputFormat::Table => {
                let e = &tagged.evidence;
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["ID".to_string(), e.id.to_string()]);
                builder.push_record(["Group".to_string(), e.version_group_id.to_string()]);
                builder.push_record(["Version".to_string(), e.version_number.to_string()]);
                builder.push_record(["Title".to_string(), e.title.clone()]);
                builder.push_record([
                    "Description".to_string(),
                    e.description.clone().unwrap_or_default(),
                ]);
                builder.push_record(["Category".to_string(), e.category.clone()]);
                builder.push_record(["Status".to_string(), self.status(e.status)]);
                builder.push_record(["File".to_string(), e.file_path.clone()]);
                builder.push_record(["Tags".to_string(), tagged.tags.join(", ")]);
                builder.push_record(["Created".to_string(), format_time(e.created_at)]);
                builder.push_record(["Updated".to_string(), format_time(e.updated_at)]);
                Ok(self.finish(builder))
            }
        }
    }

    /// Format audit entries.
    pub fn format_audit(&self, entries: &[AuditEntry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
            OutputFormat::Quiet => Ok(entries
                .iter()
                .map(|e| e.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if entries.is_empty() {
                    return Ok(self.colorize("Audit log is empty.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Time", "Action", "Entity", "Type", "Actor"]);
                for entry in entries {
                    builder.push_record([
                        format_time(entry.timestamp),
                        entry.action_type.as_str().to_string(),
                        short_id(&entry.entity_id),
                        entry.entity_type.clone(),
                        entry.actor.clone(),
                    ]);
                }
                Ok(self.finish(builder))
            }
        }
    }

    /// Format the result of an export.
    pub fn format_export(&self, summary: &ExportSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Quiet => Ok(summary.destination.display().to_string()),
            OutputFormat::Table => {
                let mut out = self.success(&format!("Export written to {}", summary.destination.display()));
                out.push_str(&format!(
                    "\n  Rows: {}\n  Files archived: {}",
                    summary.rows, summary.files_archived
                ));
                for skipped in &summary.files_skipped {
                    out.push('\n');
                    out.push_str(&self.warning(&format!("Skipped {} ({:?})", skipped.path, skipped.reason)));
                }
                Ok(out)
            }
        }
    }

    /// Format a plain list of names.
    pub fn format_names(&self, names: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(names)?),
            OutputFormat::Quiet | OutputFormat::Table => {
                if names.is_empty() && self.format == OutputFormat::Table {
                    return Ok(self.colorize("None.", "yellow"));
                }
                Ok(names.join("\n"))
            }
        }
    }

    /// Format the theme preference.
    pub fn format_theme(&self, theme: Theme) -> Result<String> {
        match self.format {
            OutputFormat::Json => json_value(&serde_json::json!({ "theme": theme })),
            OutputFormat::Quiet | OutputFormat::Table => Ok(theme.to_string()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Whether output is machine-readable (no chatter).
    pub fn is_quiet(&self) -> bool {
        self.format == OutputFormat::Quiet
    }

    fn versions_table(&self, versions: &[EvidenceVersion]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["ID", "Title", "Category", "Status", "Version", "Created"]);
        for v in versions {
            builder.push_record([
                short_id(&v.id.to_string()),
                v.title.clone(),
                v.category.clone(),
                self.status(v.status),
                v.version_number.to_string(),
                format_time(v.created_at),
            ]);
        }
        self.finish(builder)
    }

    fn finish(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn status(&self, status: EvidenceStatus) -> String {
        let color = match status {
            EvidenceStatus::Draft => "yellow",
            EvidenceStatus::Submitted => "cyan",
            EvidenceStatus::Approved => "green",
        };
        self.colorize(status.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn json_value<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn ids(versions: &[EvidenceVersion]) -> String {
    versions
        .iter()
        .map(|v| v.id.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// First eight characters of an id, for tables
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Unix millis as `YYYY-MM-DD HH:MM:SS` (UTC)
pub fn format_time(millis: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}
