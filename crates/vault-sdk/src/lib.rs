//! Evidence Vault Rust SDK
//!
//! Asynchronous command surface for a presentation layer: listing, CRUD,
//! undo, audit, export, file intake and theme preference over one vault
//! directory.
//!
//! # Example
//!
//! ```no_run
//! use vault_domain::ListFilter;
//! use vault_sdk::{VaultClient, VaultPaths};
//! use vault_store::StoreConfig;
//!
//! # async fn run() -> Result<(), vault_sdk::SdkError> {
//! let client = VaultClient::open(VaultPaths::new("/var/lib/evidence-vault"), StoreConfig::default())?;
//! let page = client.list_evidence(ListFilter::default()).await?;
//! println!("{} evidence items", page.total);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod collaborators;
mod error;
mod intake;
mod paths;

pub use client::VaultClient;
pub use collaborators::{FilePicker, PresetPath, SaveTargetPicker, Theme, ThemeSource};
pub use error::SdkError;
pub use intake::FileIntake;
pub use paths::{VaultPaths, DATABASE_FILE, EVIDENCE_DIR};
pub use vault_export::{ExportSummary, SkipReason, SkippedFile};
