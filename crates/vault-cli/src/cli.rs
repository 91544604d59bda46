//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vault_domain::{EvidenceStatus, SortDirection, SortField, StatusFilter};

/// Evidence Vault - versioned evidence records with an audit trail.
#[derive(Debug, Parser)]
#[command(name = "vault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Vault data directory
    #[arg(long, global = true, env = "VAULT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a file as new evidence
    Add(AddArgs),

    /// List evidence (latest versions unless --history)
    List(ListArgs),

    /// Show one version with its tags
    Show(ShowArgs),

    /// Create a new version of existing evidence
    Edit(EditArgs),

    /// Delete one version
    Delete(DeleteArgs),

    /// Restore the last deleted version (within the undo window)
    Undo,

    /// Show the audit log, newest first
    Audit(AuditArgs),

    /// Build an export package (report + files) as a zip archive
    Export(ExportArgs),

    /// List categories in use
    Categories,

    /// Show the theme preference
    Theme,

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the add command.
#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Title
    pub title: String,

    /// File to copy into the vault
    #[arg(long)]
    pub file: PathBuf,

    /// Category
    #[arg(short = 'C', long)]
    pub category: String,

    /// Initial status
    #[arg(short, long, default_value = "draft")]
    pub status: EvidenceStatus,

    /// Description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Tag (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Case-insensitive text over title, description and tags
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// Status filter (all, draft, submitted, approved)
    #[arg(short, long, default_value = "all")]
    pub status: StatusFilter,

    /// Category filter
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Sort column
    #[arg(long, value_enum, default_value = "created-at")]
    pub sort: SortArg,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,

    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Include superseded versions
    #[arg(long)]
    pub history: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Version id
    pub id: String,

    /// Also list every version of the group
    #[arg(long)]
    pub history: bool,
}

/// Arguments for the edit command.
///
/// Unset fields carry over from the edited version.
#[derive(Debug, Parser)]
pub struct EditArgs {
    /// Version id to supersede
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New category
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// New status
    #[arg(short, long)]
    pub status: Option<EvidenceStatus>,

    /// New description (empty string clears it)
    #[arg(short, long)]
    pub description: Option<String>,

    /// Replacement file to copy into the vault
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Replacement tag set (repeatable)
    #[arg(short, long = "tag", conflicts_with = "clear_tags")]
    pub tags: Vec<String>,

    /// Remove every tag
    #[arg(long)]
    pub clear_tags: bool,
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Version id
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the audit command.
#[derive(Debug, Parser)]
pub struct AuditArgs {
    /// Show at most this many entries
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Destination zip file
    pub output: PathBuf,

    /// Status filter (all, draft, submitted, approved)
    #[arg(short, long, default_value = "all")]
    pub status: StatusFilter,

    /// Category filter
    #[arg(short = 'C', long)]
    pub category: Option<String>,
}

/// Sort column argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SortArg {
    /// Creation time of the evidence group
    CreatedAt,
    /// Status name
    Status,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<SortArg> for SortField {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::CreatedAt => SortField::CreatedAt,
            SortArg::Status => SortField::Status,
        }
    }
}

impl ListArgs {
    /// Sort direction selected by `--asc`
    pub fn direction(&self) -> SortDirection {
        if self.asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}
