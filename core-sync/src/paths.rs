//! # Document Filesystem Layout & State Evaluation
//!
//! Every path a document touches is derived deterministically from the data
//! directory, the item id, and the display name — nothing is discovered or
//! remembered. That makes [`evaluate_state`] a pure function of what exists
//! on disk, the single source of truth for a document's lifecycle state.
//!
//! Layout under `<data_dir>`:
//!
//! ```text
//! <data_dir>/<id>/                 extracted raw bundle
//! <data_dir>/<id>/<id>/            device-native annotation pages
//! <data_dir>/<id>/<id>.pdf         original source (page-based documents)
//! <data_dir>/<id>/<id>.epub        original source (ebook documents)
//! <data_dir>/<id>/.mirror/         sidecar: rendered output + metadata.local
//! <data_dir>/<id>.staging/         transient extraction target
//! ```

use std::path::{Path, PathBuf};

use core_tree::DocState;

/// Deterministic filesystem layout of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    root: PathBuf,
    pages_dir: PathBuf,
    original_pdf: PathBuf,
    original_epub: PathBuf,
    sidecar_dir: PathBuf,
    rendered: PathBuf,
    local_metadata: PathBuf,
    staging: PathBuf,
}

impl DocumentPaths {
    pub fn new(data_dir: &Path, id: &str, name: &str) -> Self {
        let root = data_dir.join(id);
        let sidecar_dir = root.join(".mirror");

        // Slashes in a display name would escape the sidecar directory
        let safe_name = name.replace(['/', '\\'], "_");

        Self {
            pages_dir: root.join(id),
            original_pdf: root.join(format!("{id}.pdf")),
            original_epub: root.join(format!("{id}.epub")),
            rendered: sidecar_dir.join(format!("{safe_name}.pdf")),
            local_metadata: sidecar_dir.join("metadata.local"),
            staging: data_dir.join(format!("{id}.staging")),
            sidecar_dir,
            root,
        }
    }

    /// Document directory holding the extracted bundle
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of device-native annotation pages
    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    pub fn original_pdf(&self) -> &Path {
        &self.original_pdf
    }

    pub fn original_epub(&self) -> &Path {
        &self.original_epub
    }

    /// The original page-based source file, whichever format is present
    pub fn original_source(&self) -> Option<&Path> {
        if self.original_pdf.exists() {
            Some(&self.original_pdf)
        } else if self.original_epub.exists() {
            Some(&self.original_epub)
        } else {
            None
        }
    }

    /// Sidecar directory for mirror-owned artifacts
    pub fn sidecar_dir(&self) -> &Path {
        &self.sidecar_dir
    }

    /// Rendered exportable output
    pub fn rendered(&self) -> &Path {
        &self.rendered
    }

    /// `metadata.local` sidecar file
    pub fn local_metadata(&self) -> &Path {
        &self.local_metadata
    }

    /// Transient extraction target, sibling of the document directory
    pub fn staging(&self) -> &Path {
        &self.staging
    }
}

/// Compute the lifecycle state of a document from disk.
///
/// Pure with respect to the filesystem: no caching, no drift. `Downloading`
/// and `Deleted` are never produced here — they are forced by the engine
/// during a fetch and after an acknowledged remote delete respectively, and
/// `OutOfSync` is reserved for the version-drift extension.
pub fn evaluate_state(paths: &DocumentPaths) -> DocState {
    if !paths.root().exists() {
        return DocState::RemoteOnly;
    }

    if paths.original_source().is_some() {
        DocState::LocalPdf
    } else {
        DocState::LocalNotebook
    }
}
