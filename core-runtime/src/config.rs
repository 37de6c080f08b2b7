//! # Mirror Configuration
//!
//! Builder-validated configuration for the mirror core.
//!
//! ## Overview
//!
//! A [`MirrorConfig`] bundles everything an operation needs: the injected
//! collaborator bridges (cloud client and renderer), the local data
//! directory under which per-document state lives, and the template set the
//! notebook renderer consumes. It is constructed through
//! [`MirrorConfigBuilder`] and passed explicitly to the service context —
//! there is no implicit process-wide instance.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::MirrorConfig;
//! use std::sync::Arc;
//!
//! let config = MirrorConfig::builder()
//!     .data_dir("/home/user/.mirror/data")
//!     .client(Arc::new(MyCloudClient::new(token)))
//!     .renderer(Arc::new(MyRenderer::default()))
//!     .template_paths(vec!["/usr/share/tablet/templates".into()])
//!     .build()?;
//! ```
//!
//! ## Fail-Fast Validation
//!
//! `build()` rejects a missing data directory, client, or renderer with an
//! actionable [`Error`](crate::error::Error) instead of letting the first
//! sync fail deep inside the engine.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bridge_traits::{CloudClient, Renderer};

use crate::error::{Error, Result};

/// Default per-subscriber event buffer size
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Validated configuration for the mirror core
#[derive(Clone)]
pub struct MirrorConfig {
    /// Root directory for per-document local state
    pub data_dir: PathBuf,

    /// Template set passed to notebook rendering; may be empty
    pub template_paths: Vec<PathBuf>,

    /// Event bus buffer capacity
    pub event_capacity: usize,

    /// Cloud transport collaborator
    pub client: Arc<dyn CloudClient>,

    /// Conversion adapter collaborator
    pub renderer: Arc<dyn Renderer>,
}

impl MirrorConfig {
    /// Start building a configuration
    pub fn builder() -> MirrorConfigBuilder {
        MirrorConfigBuilder::default()
    }
}

impl std::fmt::Debug for MirrorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorConfig")
            .field("data_dir", &self.data_dir)
            .field("template_paths", &self.template_paths)
            .field("event_capacity", &self.event_capacity)
            .finish_non_exhaustive()
    }
}

/// Builder for [`MirrorConfig`]
#[derive(Default)]
pub struct MirrorConfigBuilder {
    data_dir: Option<PathBuf>,
    template_paths: Vec<PathBuf>,
    event_capacity: Option<usize>,
    client: Option<Arc<dyn CloudClient>>,
    renderer: Option<Arc<dyn Renderer>>,
}

impl MirrorConfigBuilder {
    /// Set the root directory for local document state
    pub fn data_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the template paths consumed by notebook rendering
    pub fn template_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.template_paths = paths;
        self
    }

    /// Override the event bus buffer capacity
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Inject the cloud transport collaborator
    pub fn client(mut self, client: Arc<dyn CloudClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Inject the conversion adapter collaborator
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the data directory is missing and
    /// [`Error::CapabilityMissing`] when a required bridge was not injected.
    pub fn build(self) -> Result<MirrorConfig> {
        let data_dir = self
            .data_dir
            .ok_or_else(|| Error::Config("data_dir is required".to_string()))?;

        let client = self.client.ok_or_else(|| Error::CapabilityMissing {
            capability: "CloudClient".to_string(),
            message: "No cloud client injected. Provide an authenticated \
                      transport implementation via MirrorConfigBuilder::client."
                .to_string(),
        })?;

        let renderer = self.renderer.ok_or_else(|| Error::CapabilityMissing {
            capability: "Renderer".to_string(),
            message: "No conversion adapter injected. Provide a renderer \
                      implementation via MirrorConfigBuilder::renderer."
                .to_string(),
        })?;

        Ok(MirrorConfig {
            data_dir,
            template_paths: self.template_paths,
            event_capacity: self.event_capacity.unwrap_or(DEFAULT_EVENT_CAPACITY),
            client,
            renderer,
        })
    }
}
