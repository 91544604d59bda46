//! Error types for export operations

use thiserror::Error;

/// Errors that can occur while building an export package
#[derive(Error, Debug)]
pub enum ExportError {
    /// Storage layer error while collecting rows or recording the audit entry
    #[error("Storage error: {0}")]
    Store(String),

    /// Report renderer failed
    #[error("Report rendering failed: {0}")]
    Report(String),

    /// Archive library error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
