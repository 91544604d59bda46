//! Error types for the Vault SDK.

use std::path::PathBuf;
use thiserror::Error;
use vault_export::ExportError;
use vault_store::StoreError;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// Store rejected or failed the command
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Export package could not be built
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Copying a picked file into the evidence directory failed
    #[error("Failed to import {path}: {source}")]
    Intake {
        /// File that was being imported
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// Filesystem error outside of intake
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Background task panicked or was cancelled
    #[error("Task join error: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for SdkError {
    fn from(e: tokio::task::JoinError) -> Self {
        SdkError::Join(e.to_string())
    }
}
