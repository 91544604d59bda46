//! Vault client implementation.
//!
//! Every store command runs on the blocking pool while holding the store
//! mutex for the duration of that one command. Export splits its work so the
//! archive is written without the lock held.

use crate::collaborators::{FilePicker, SaveTargetPicker, Theme, ThemeSource};
use crate::error::SdkError;
use crate::intake::FileIntake;
use crate::paths::VaultPaths;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use vault_domain::traits::EvidenceStore;
use vault_domain::{
    AuditEntry, EvidenceId, EvidencePage, EvidenceUpdate, EvidenceVersion, ExportFilter,
    ListFilter, NewEvidence, TaggedEvidence, VersionGroupId,
};
use vault_export::{record_export, ExportAssembler, ExportPlan, ExportSummary};
use vault_store::{Clock, SqliteStore, StoreConfig, SystemClock};

/// Asynchronous command surface over one vault
#[derive(Clone)]
pub struct VaultClient {
    store: Arc<Mutex<SqliteStore>>,
    paths: VaultPaths,
    clock: Arc<dyn Clock>,
    intake: FileIntake,
    exporter: Arc<ExportAssembler>,
}

impl VaultClient {
    /// Open (or create) the vault under `paths` with the system clock
    pub fn open(paths: VaultPaths, config: StoreConfig) -> Result<Self, SdkError> {
        Self::open_with_clock(paths, config, Arc::new(SystemClock))
    }

    /// Open with an explicit clock
    pub fn open_with_clock(
        paths: VaultPaths,
        config: StoreConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SdkError> {
        paths.ensure()?;
        let store = SqliteStore::with_options(paths.database(), config, Arc::clone(&clock))?;
        tracing::debug!(database = %paths.database().display(), "Opened vault");

        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            intake: FileIntake::new(paths.evidence_dir(), Arc::clone(&clock)),
            paths,
            clock,
            exporter: Arc::new(ExportAssembler::new()),
        })
    }

    /// Directory layout of this vault
    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    /// Run `op` on the blocking pool with the store locked
    async fn run<T, E, F>(&self, op: F) -> Result<T, SdkError>
    where
        F: FnOnce(&mut SqliteStore) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<SdkError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut guard = store.lock();
            op(&mut *guard)
        })
        .await?
        .map_err(Into::into)
    }

    /// One page of evidence plus the total match count
    pub async fn list_evidence(&self, filter: ListFilter) -> Result<EvidencePage, SdkError> {
        self.run(move |store| store.list_evidence(&filter)).await
    }

    /// One version with its tags
    pub async fn get_evidence(&self, id: EvidenceId) -> Result<Option<TaggedEvidence>, SdkError> {
        self.run(move |store| store.get_evidence(id)).await
    }

    /// Every version of a group, oldest first
    pub async fn history(&self, group: VersionGroupId) -> Result<Vec<EvidenceVersion>, SdkError> {
        self.run(move |store| store.history(group)).await
    }

    /// Register new evidence (version 1 of a new group)
    pub async fn create_evidence(&self, payload: NewEvidence) -> Result<EvidenceVersion, SdkError> {
        self.run(move |store| store.create_evidence(payload)).await
    }

    /// Supersede a version; `None` if it does not exist
    pub async fn update_evidence(
        &self,
        id: EvidenceId,
        payload: EvidenceUpdate,
    ) -> Result<Option<EvidenceVersion>, SdkError> {
        self.run(move |store| store.update_evidence(id, payload)).await
    }

    /// Delete one version; `false` if it does not exist
    pub async fn delete_evidence(&self, id: EvidenceId) -> Result<bool, SdkError> {
        self.run(move |store| store.delete_evidence(id)).await
    }

    /// Restore the last deleted version if still inside the undo window
    pub async fn undo_delete(&self) -> Result<Option<EvidenceVersion>, SdkError> {
        self.run(|store| store.undo_last_delete()).await
    }

    /// Most recent audit entries, newest first, capped by the store config
    pub async fn list_audit(&self) -> Result<Vec<AuditEntry>, SdkError> {
        self.run(|store| {
            let limit = store.config().audit_limit;
            store.list_audit(limit)
        })
        .await
    }

    /// Distinct categories among latest versions
    pub async fn list_categories(&self) -> Result<Vec<String>, SdkError> {
        self.run(|store| store.categories()).await
    }

    /// Build an export package at a destination chosen by `picker`
    ///
    /// Returns `None` when the user cancels; nothing is read or audited then.
    pub async fn build_export(
        &self,
        filter: ExportFilter,
        picker: &dyn SaveTargetPicker,
    ) -> Result<Option<ExportSummary>, SdkError> {
        let Some(destination) = picker.choose_export_destination() else {
            return Ok(None);
        };
        let generated_at = self.clock.now_millis();

        let plan = self
            .run(move |store| ExportPlan::collect(&*store, &filter, generated_at))
            .await?;

        let exporter = Arc::clone(&self.exporter);
        let (summary, plan) = tokio::task::spawn_blocking(move || {
            exporter
                .write(&plan, &destination)
                .map(|summary| (summary, plan))
        })
        .await??;

        self.run(move |store| record_export(store, &plan)).await?;
        Ok(Some(summary))
    }

    /// Copy a file chosen by `picker` into the evidence directory
    ///
    /// Returns the managed path to use as `file_path`, or `None` if the user
    /// cancelled.
    pub async fn pick_source_file(&self, picker: &dyn FilePicker) -> Result<Option<PathBuf>, SdkError> {
        let Some(source) = picker.pick_source_file() else {
            return Ok(None);
        };
        let intake = self.intake.clone();
        let managed = tokio::task::spawn_blocking(move || intake.import(&source)).await??;
        Ok(Some(managed))
    }

    /// Ambient light/dark preference
    pub async fn theme_preference(&self, source: &dyn ThemeSource) -> Theme {
        source.preference()
    }
}
