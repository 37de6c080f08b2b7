//! # Mirror Context
//!
//! The composition root of the mirror core.
//!
//! ## Overview
//!
//! A [`MirrorContext`] owns the validated [`MirrorConfig`], the event bus,
//! and the cached materialized tree. Callers construct one explicitly and
//! pass it around; there is no process-wide instance, so tests and embedders
//! can run several isolated mirrors side by side.
//!
//! ## Tree Caching
//!
//! The tree is built lazily from the remote listing on first access and
//! cached until [`invalidate`](MirrorContext::invalidate) drops it. Lookups
//! hand out `Arc<Tree>` snapshots, so a rebuild never mutates a tree an
//! observer is still traversing.

use std::sync::Arc;

use core_runtime::config::MirrorConfig;
use core_runtime::events::{EventBus, MirrorEvent, TreeEvent};
use core_sync::{create_document_zip, Document, DocumentPackage};
use core_tree::{Item, Tree};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{Result, ServiceError};

/// Entry point to the mirror core
pub struct MirrorContext {
    config: MirrorConfig,
    events: EventBus,
    tree: RwLock<Option<Arc<Tree>>>,
}

impl MirrorContext {
    /// Create a context from a validated configuration
    pub fn new(config: MirrorConfig) -> Self {
        let events = EventBus::new(config.event_capacity);
        Self {
            config,
            events,
            tree: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// The bus on which tree and document events are published
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Current tree snapshot, building it from the remote listing if no
    /// cached one exists.
    pub async fn tree(&self) -> Result<Arc<Tree>> {
        if let Some(tree) = self.tree.read().await.as_ref() {
            return Ok(Arc::clone(tree));
        }

        let mut slot = self.tree.write().await;
        // Another task may have built it while we waited for the write lock
        if let Some(tree) = slot.as_ref() {
            return Ok(Arc::clone(tree));
        }

        let records = self.config.client.list_metadata().await?;
        debug!(records = records.len(), "remote listing fetched");

        let tree = Arc::new(Tree::build(&records)?);
        info!(nodes = tree.len(), "tree rebuilt");
        self.events.emit(MirrorEvent::Tree(TreeEvent::Rebuilt {
            nodes: tree.len(),
        }));

        *slot = Some(Arc::clone(&tree));
        Ok(tree)
    }

    /// Drop the cached tree; the next lookup rebuilds from the listing
    pub async fn invalidate(&self) {
        *self.tree.write().await = None;
        self.events.emit(MirrorEvent::Tree(TreeEvent::Invalidated));
    }

    /// Look up one item by id, building the tree if necessary.
    ///
    /// The empty id resolves to the synthetic root collection.
    pub async fn get_item(&self, id: &str) -> Result<Option<Item>> {
        let tree = self.tree().await?;
        Ok(tree.get(id).map(|node| tree.node(node).clone()))
    }

    /// Open a sync handle for a document node.
    ///
    /// # Errors
    ///
    /// [`ServiceError::ItemNotFound`] when the id is absent from the tree,
    /// and a sync error when the node is a collection.
    pub async fn document(&self, id: &str) -> Result<Document> {
        let tree = self.tree().await?;
        let node = tree
            .get(id)
            .ok_or_else(|| ServiceError::ItemNotFound(id.to_string()))?;

        let document = Document::new(
            tree.node(node),
            &self.config.data_dir,
            Arc::clone(&self.config.client),
            Arc::clone(&self.config.renderer),
            self.config.template_paths.clone(),
            self.events.clone(),
        )?;
        Ok(document)
    }

    /// Assemble an upload bundle for a local source file
    pub async fn package_for_upload(
        &self,
        source: &std::path::Path,
        file_type: &str,
        parent_id: &str,
    ) -> Result<DocumentPackage> {
        Ok(create_document_zip(source, file_type, parent_id).await?)
    }
}
