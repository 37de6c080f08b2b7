//! Upload package assembly
//!
//! New documents travel to the cloud as a zip bundle with three entries:
//! the source file named `<id>.<ext>`, a `<id>.content` descriptor, and an
//! empty `<id>.pagedata`. The whole bundle is assembled in memory; nothing
//! transient touches the data directory.

use std::io::{Cursor, Write};
use std::path::Path;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Result, SyncError};

/// The `.content` descriptor expected alongside a fresh upload.
///
/// Field values match what the device writes for a never-opened document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentDescriptor<'a> {
    extra_metadata: serde_json::Map<String, serde_json::Value>,
    file_type: &'a str,
    last_opened_page: i64,
    line_height: i64,
    margins: i64,
    page_count: i64,
    text_scale: i64,
    transform: serde_json::Map<String, serde_json::Value>,
}

impl<'a> ContentDescriptor<'a> {
    fn new(file_type: &'a str) -> Self {
        Self {
            extra_metadata: serde_json::Map::new(),
            file_type,
            last_opened_page: 0,
            line_height: -1,
            margins: 180,
            page_count: 0,
            text_scale: 1,
            transform: serde_json::Map::new(),
        }
    }
}

/// Listing metadata the caller registers with the cloud for a new upload
#[derive(Debug, Clone, Serialize)]
pub struct PackageMetadata {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "Parent")]
    pub parent: String,

    #[serde(rename = "VissibleName")]
    pub visible_name: String,

    #[serde(rename = "Type")]
    pub type_tag: String,

    #[serde(rename = "Version")]
    pub version: i64,

    #[serde(rename = "ModifiedClient")]
    pub modified_client: String,
}

/// A fully assembled upload bundle
#[derive(Debug, Clone)]
pub struct DocumentPackage {
    pub id: String,
    pub metadata: PackageMetadata,
    pub bytes: Bytes,
}

/// Assemble an upload bundle for a local source file.
///
/// A fresh id is generated; the visible name is the source file stem.
/// `file_type` is the extension the device should treat the payload as,
/// `"pdf"` or `"epub"`.
pub async fn create_document_zip(
    source: &Path,
    file_type: &str,
    parent_id: &str,
) -> Result<DocumentPackage> {
    let id = Uuid::new_v4().to_string();
    let visible_name = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.clone());

    let payload = tokio::fs::read(source).await?;

    let descriptor = serde_json::to_vec(&ContentDescriptor::new(file_type))?;
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let doc_id = id.clone();
    let extension = file_type.to_string();
    let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        writer.start_file(format!("{doc_id}.content"), options)?;
        writer.write_all(&descriptor)?;

        writer.start_file(format!("{doc_id}.pagedata"), options)?;

        writer.start_file(format!("{doc_id}.{extension}"), options)?;
        writer.write_all(&payload)?;

        Ok(writer.finish()?.into_inner())
    })
    .await
    .map_err(|e| SyncError::Task(e.to_string()))??;

    debug!(id = %id, name = %visible_name, bytes = bytes.len(), "upload bundle assembled");

    let metadata = PackageMetadata {
        id: id.clone(),
        parent: parent_id.to_string(),
        visible_name,
        type_tag: "DocumentType".to_string(),
        version: 1,
        modified_client: Utc::now().to_rfc3339(),
    };

    Ok(DocumentPackage {
        id,
        metadata,
        bytes: Bytes::from(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn entry_names(bytes: &Bytes) -> BTreeSet<String> {
        let archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    fn read_entry(bytes: &Bytes, name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).unwrap();
        buf
    }

    #[tokio::test]
    async fn test_bundle_has_exactly_three_entries() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("notes.pdf");
        std::fs::write(&source, b"%PDF-1.4 body").unwrap();

        let package = create_document_zip(&source, "pdf", "").await.unwrap();
        let id = &package.id;

        let names = entry_names(&package.bytes);
        let expected: BTreeSet<String> = [
            format!("{id}.content"),
            format!("{id}.pagedata"),
            format!("{id}.pdf"),
        ]
        .into_iter()
        .collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_source_payload_round_trips() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("book.epub");
        std::fs::write(&source, b"ebook body").unwrap();

        let package = create_document_zip(&source, "epub", "folder-1").await.unwrap();
        let payload = read_entry(&package.bytes, &format!("{}.epub", package.id));
        assert_eq!(payload, b"ebook body");
    }

    #[tokio::test]
    async fn test_pagedata_entry_is_empty() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("notes.pdf");
        std::fs::write(&source, b"%PDF-1.4").unwrap();

        let package = create_document_zip(&source, "pdf", "").await.unwrap();
        let pagedata = read_entry(&package.bytes, &format!("{}.pagedata", package.id));
        assert!(pagedata.is_empty());
    }

    #[tokio::test]
    async fn test_content_descriptor_constants() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("notes.pdf");
        std::fs::write(&source, b"%PDF-1.4").unwrap();

        let package = create_document_zip(&source, "pdf", "").await.unwrap();
        let raw = read_entry(&package.bytes, &format!("{}.content", package.id));
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();

        assert_eq!(value["fileType"], "pdf");
        assert_eq!(value["lastOpenedPage"], 0);
        assert_eq!(value["lineHeight"], -1);
        assert_eq!(value["margins"], 180);
        assert_eq!(value["pageCount"], 0);
        assert_eq!(value["textScale"], 1);
        assert!(value["extraMetadata"].as_object().unwrap().is_empty());
        assert!(value["transform"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_metadata_matches_source_and_parent() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("Quarterly Report.pdf");
        std::fs::write(&source, b"%PDF-1.4").unwrap();

        let package = create_document_zip(&source, "pdf", "folder-9").await.unwrap();
        assert_eq!(package.metadata.id, package.id);
        assert_eq!(package.metadata.visible_name, "Quarterly Report");
        assert_eq!(package.metadata.parent, "folder-9");
        assert_eq!(package.metadata.type_tag, "DocumentType");
        assert_eq!(package.metadata.version, 1);
    }

    #[tokio::test]
    async fn test_listing_wire_names() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("notes.pdf");
        std::fs::write(&source, b"%PDF-1.4").unwrap();

        let package = create_document_zip(&source, "pdf", "").await.unwrap();
        let value = serde_json::to_value(&package.metadata).unwrap();
        assert_eq!(value["VissibleName"], "notes");
        assert_eq!(value["Type"], "DocumentType");
        assert!(value["ModifiedClient"].is_string());
    }

    #[tokio::test]
    async fn test_missing_source_is_io_error() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("absent.pdf");
        let err = create_document_zip(&source, "pdf", "").await.unwrap_err();
        assert!(matches!(err, SyncError::Io(_)));
    }
}
