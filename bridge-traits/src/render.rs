//! Conversion Adapter Abstraction
//!
//! The rendering of device-native annotation files into exportable documents
//! is an opaque collaborator. The core only decides *which* conversion path
//! applies and where the output goes; fidelity of the conversion itself is
//! out of contract.

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// Annotation renderer trait
///
/// Both operations read the extracted bundle under `source_dir` and write a
/// single rendered document to `output`. Implementations may block
/// internally; callers treat each call as one atomic conversion.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render a standalone notebook: device-native pages plus an optional
    /// template set, producing a complete exportable document.
    async fn convert_notebook(
        &self,
        source_dir: &Path,
        id: &str,
        output: &Path,
        template_paths: &[std::path::PathBuf],
    ) -> Result<()>;

    /// Merge the freehand annotation layer onto an existing page-based
    /// original document.
    async fn convert_pdf(
        &self,
        source_dir: &Path,
        original_pdf: &Path,
        output: &Path,
    ) -> Result<()>;
}
