//! # Per-Document State Machine
//!
//! The sync handle for one document node of the tree.
//!
//! ## Overview
//!
//! A [`Document`] owns no persistent in-memory state machine: its lifecycle
//! state is recomputed from the filesystem on every read, so a process
//! restart re-derives everything from disk and the remote listing. The only
//! in-memory bits are the memoized blob URL (resolved at most once per
//! handle) and the `deleted` flag set after an acknowledged remote delete.
//!
//! ## Sync Workflow
//!
//! 1. Skip unless forced or the state needs a sync (`RemoteOnly`/`OutOfSync`)
//! 2. Publish `Downloading` through the event bus
//! 3. Resolve the blob URL (memoized), fetch the raw bundle
//! 4. Extract into a staging directory, then atomically rename into place
//! 5. Write the `metadata.local` sidecar
//! 6. Dispatch conversion: notebook render, PDF merge, or plain copy
//! 7. Recompute and publish the final state
//!
//! Callers must not run `sync()` concurrently for the same document id;
//! overlapping downloads would race on the staging directory. The exclusive
//! `&mut self` receiver enforces that per handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bridge_traits::{CloudClient, Renderer};
use chrono::{DateTime, Utc};
use core_runtime::events::{DocumentEvent, EventBus, MirrorEvent};
use core_tree::{DocState, Item, ItemKind};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SyncError};
use crate::paths::{evaluate_state, DocumentPaths};
use crate::sidecar::LocalMetadata;

/// Sync handle for one document
pub struct Document {
    id: String,
    name: String,
    version: i64,
    modified_client: DateTime<Utc>,
    current_page: i64,
    paths: DocumentPaths,
    blob_url: Option<String>,
    deleted: bool,
    client: Arc<dyn CloudClient>,
    renderer: Arc<dyn Renderer>,
    template_paths: Vec<PathBuf>,
    events: EventBus,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("modified_client", &self.modified_client)
            .field("current_page", &self.current_page)
            .field("paths", &self.paths)
            .field("blob_url", &self.blob_url)
            .field("deleted", &self.deleted)
            .field("template_paths", &self.template_paths)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Build a sync handle from a materialized tree node.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotADocument`] for collection nodes.
    pub fn new(
        item: &Item,
        data_dir: &Path,
        client: Arc<dyn CloudClient>,
        renderer: Arc<dyn Renderer>,
        template_paths: Vec<PathBuf>,
        events: EventBus,
    ) -> Result<Self> {
        let current_page = match item.kind {
            ItemKind::Document { current_page } => current_page,
            ItemKind::Collection => return Err(SyncError::NotADocument(item.id.clone())),
        };

        Ok(Self {
            id: item.id.clone(),
            name: item.name.clone(),
            version: item.version,
            modified_client: item.modified_client,
            current_page,
            paths: DocumentPaths::new(data_dir, &item.id, &item.name),
            blob_url: None,
            deleted: false,
            client,
            renderer,
            template_paths,
            events,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    pub fn paths(&self) -> &DocumentPaths {
        &self.paths
    }

    /// Current lifecycle state, recomputed from disk on every call
    pub fn state(&self) -> DocState {
        if self.deleted {
            return DocState::Deleted;
        }
        evaluate_state(&self.paths)
    }

    /// Whether the remote version exceeds the locally recorded one.
    ///
    /// Extension hook for `OutOfSync` drift detection; nothing feeds the
    /// result back into state evaluation yet.
    pub async fn is_out_of_date(&self) -> Result<bool> {
        match LocalMetadata::read(&self.paths).await? {
            Some(local) => Ok(self.version > local.version),
            None => Ok(false),
        }
    }

    /// Download, extract, and convert this document.
    ///
    /// No-op unless `force` is set or the current state is
    /// `RemoteOnly`/`OutOfSync`. Returns the final recomputed state.
    #[instrument(skip(self), fields(id = %self.id, name = %self.name))]
    pub async fn sync(&mut self, force: bool) -> Result<DocState> {
        let current = self.state();
        if !force && !current.needs_sync() {
            debug!(state = %current, "already synced, skipping");
            return Ok(current);
        }

        self.events
            .emit(MirrorEvent::Document(DocumentEvent::DownloadStarted {
                id: self.id.clone(),
            }));
        self.publish(DocState::Downloading);

        self.download_raw().await?;
        self.write_local_metadata().await?;

        let state = self.state();
        let annotations_exist = self.paths.pages_dir().exists();

        match state {
            DocState::LocalNotebook if annotations_exist => {
                self.renderer
                    .convert_notebook(
                        self.paths.root(),
                        &self.id,
                        self.paths.rendered(),
                        &self.template_paths,
                    )
                    .await?;
            }
            DocState::LocalPdf => {
                if let Some(original) = self.paths.original_source() {
                    if annotations_exist {
                        self.renderer
                            .convert_pdf(self.paths.pages_dir(), original, self.paths.rendered())
                            .await?;
                    } else {
                        // Nothing to merge, the export is the original itself
                        tokio::fs::copy(original, self.paths.rendered()).await?;
                    }
                }
            }
            other => {
                warn!(state = %other, "bundle extracted but no conversion path applies");
            }
        }

        let final_state = self.state();
        self.publish(final_state);
        info!(state = %final_state, "sync finished");
        Ok(final_state)
    }

    /// Fetch the raw bundle and swap it into place.
    ///
    /// Extraction happens in a staging sibling directory; the document
    /// directory is only replaced once the whole bundle is on disk, so a
    /// failed download never leaves a half-written directory behind.
    async fn download_raw(&mut self) -> Result<()> {
        let blob_url = match &self.blob_url {
            Some(url) => url.clone(),
            None => {
                let detail = self.client.get_item(&self.id).await?;
                debug!("resolved blob url");
                self.blob_url = Some(detail.blob_url_get.clone());
                detail.blob_url_get
            }
        };

        let payload = self.client.get_raw_file(&blob_url).await?;
        debug!(bytes = payload.len(), "bundle fetched");

        let staging = self.paths.staging().to_path_buf();
        if staging.exists() {
            tokio::fs::remove_dir_all(&staging).await?;
        }

        let target = staging.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut archive = zip::ZipArchive::new(std::io::Cursor::new(payload))?;
            archive.extract(&target)?;
            Ok(())
        })
        .await
        .map_err(|e| SyncError::Task(e.to_string()))??;

        if self.paths.root().exists() {
            tokio::fs::remove_dir_all(self.paths.root()).await?;
        }
        tokio::fs::rename(&staging, self.paths.root()).await?;
        Ok(())
    }

    async fn write_local_metadata(&self) -> Result<()> {
        LocalMetadata::new(&self.id, self.modified_client, self.version)
            .write(&self.paths)
            .await
    }

    /// Remove the local copy. Idempotent; returns the recomputed state.
    pub async fn delete_local(&self) -> Result<DocState> {
        if self.paths.root().exists() {
            tokio::fs::remove_dir_all(self.paths.root()).await?;
        }
        if self.paths.staging().exists() {
            tokio::fs::remove_dir_all(self.paths.staging()).await?;
        }

        let state = self.state();
        self.publish(state);
        Ok(state)
    }

    /// Request remote deletion.
    ///
    /// Only an acknowledged success transitions the handle to `Deleted`;
    /// a rejection returns `Ok(false)` with state unchanged. No retry.
    pub async fn delete(&mut self) -> Result<bool> {
        let ok = self.client.delete_item(&self.id, self.version).await?;

        if ok {
            self.deleted = true;
            self.events
                .emit(MirrorEvent::Document(DocumentEvent::Deleted {
                    id: self.id.clone(),
                }));
            self.publish(DocState::Deleted);
        } else {
            warn!(id = %self.id, version = self.version, "remote delete rejected");
        }
        Ok(ok)
    }

    fn publish(&self, state: DocState) {
        self.events
            .emit(MirrorEvent::Document(DocumentEvent::StateChanged {
                id: self.id.clone(),
                state,
            }));
    }
}
