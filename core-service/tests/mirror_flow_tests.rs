//! Full mirror flow: remote listing to rendered local document.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::{BridgeError, CloudClient, Record, RecordDetail, Renderer};
use bytes::Bytes;
use core_runtime::config::MirrorConfig;
use core_service::MirrorContext;
use core_tree::{DocState, ItemKind};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

struct FakeCloud {
    records: Vec<Record>,
    bundles: Vec<(String, Bytes)>,
}

impl FakeCloud {
    fn bundle_for(&self, id: &str) -> Option<Bytes> {
        self.bundles
            .iter()
            .find(|(bundle_id, _)| bundle_id == id)
            .map(|(_, bytes)| bytes.clone())
    }
}

#[async_trait]
impl CloudClient for FakeCloud {
    async fn list_metadata(&self) -> bridge_traits::Result<Vec<Record>> {
        Ok(self.records.clone())
    }

    async fn get_item(&self, id: &str) -> bridge_traits::Result<RecordDetail> {
        Ok(RecordDetail {
            id: id.to_string(),
            version: 1,
            blob_url_get: format!("blob://{id}"),
            blob_url_get_expires: String::new(),
            success: true,
        })
    }

    async fn get_raw_file(&self, blob_url: &str) -> bridge_traits::Result<Bytes> {
        let id = blob_url.trim_start_matches("blob://");
        self.bundle_for(id)
            .ok_or_else(|| BridgeError::Transport(format!("no blob for {id}")))
    }

    async fn delete_item(&self, _id: &str, _version: i64) -> bridge_traits::Result<bool> {
        Ok(true)
    }
}

#[derive(Default)]
struct FakeRenderer {
    rendered: Mutex<Vec<String>>,
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn convert_notebook(
        &self,
        _source_dir: &Path,
        id: &str,
        output: &Path,
        _template_paths: &[PathBuf],
    ) -> bridge_traits::Result<()> {
        self.rendered.lock().unwrap().push(id.to_string());
        std::fs::write(output, b"%PDF rendered").map_err(BridgeError::Io)?;
        Ok(())
    }

    async fn convert_pdf(
        &self,
        _source_dir: &Path,
        _original_pdf: &Path,
        output: &Path,
    ) -> bridge_traits::Result<()> {
        std::fs::write(output, b"%PDF merged").map_err(BridgeError::Io)?;
        Ok(())
    }
}

fn record(id: &str, parent: &str, type_tag: &str, name: &str) -> Record {
    Record {
        id: id.to_string(),
        parent: parent.to_string(),
        record_type: type_tag.to_string(),
        visible_name: name.to_string(),
        version: 1,
        modified_client: "2023-04-01T12:30:00Z".to_string(),
        success: true,
        current_page: 0,
    }
}

fn notebook_bundle(id: &str) -> Bytes {
    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer
        .start_file(format!("{id}/00.rm"), SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"page data").unwrap();
    writer
        .start_file(format!("{id}.content"), SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"{}").unwrap();
    Bytes::from(writer.finish().unwrap().into_inner())
}

fn make_context(dir: &TempDir) -> (MirrorContext, Arc<FakeRenderer>) {
    let cloud = FakeCloud {
        records: vec![
            record("folder-1", "", "CollectionType", "Projects"),
            record("doc-1", "folder-1", "DocumentType", "Meeting Notes"),
            record("doc-2", "", "DocumentType", "Scratchpad"),
        ],
        bundles: vec![
            ("doc-1".to_string(), notebook_bundle("doc-1")),
            ("doc-2".to_string(), notebook_bundle("doc-2")),
        ],
    };
    let renderer = Arc::new(FakeRenderer::default());

    let config = MirrorConfig::builder()
        .data_dir(dir.path())
        .client(Arc::new(cloud))
        .renderer(Arc::clone(&renderer) as Arc<dyn Renderer>)
        .build()
        .unwrap();

    (MirrorContext::new(config), renderer)
}

#[tokio::test]
async fn test_listing_to_local_document() {
    let dir = TempDir::new().unwrap();
    let (ctx, renderer) = make_context(&dir);

    let tree = ctx.tree().await.unwrap();
    assert_eq!(tree.len(), 4); // root, folder, two documents

    let folder = ctx.get_item("folder-1").await.unwrap().unwrap();
    assert_eq!(folder.kind, ItemKind::Collection);

    let mut doc = ctx.document("doc-1").await.unwrap();
    assert_eq!(doc.state(), DocState::RemoteOnly);

    let state = doc.sync(false).await.unwrap();
    assert_eq!(state, DocState::LocalNotebook);
    assert!(doc.paths().rendered().exists());
    assert_eq!(renderer.rendered.lock().unwrap().as_slice(), ["doc-1"]);

    // The sibling document is untouched
    let other = ctx.document("doc-2").await.unwrap();
    assert_eq!(other.state(), DocState::RemoteOnly);
}

#[tokio::test]
async fn test_state_survives_new_context() {
    let dir = TempDir::new().unwrap();

    {
        let (ctx, _renderer) = make_context(&dir);
        let mut doc = ctx.document("doc-1").await.unwrap();
        doc.sync(false).await.unwrap();
    }

    // A fresh context over the same data directory re-derives the state
    // from disk alone
    let (ctx, renderer) = make_context(&dir);
    let doc = ctx.document("doc-1").await.unwrap();
    assert_eq!(doc.state(), DocState::LocalNotebook);
    assert!(renderer.rendered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_local_then_resync() {
    let dir = TempDir::new().unwrap();
    let (ctx, _renderer) = make_context(&dir);

    let mut doc = ctx.document("doc-1").await.unwrap();
    doc.sync(false).await.unwrap();
    assert_eq!(doc.delete_local().await.unwrap(), DocState::RemoteOnly);

    let state = doc.sync(false).await.unwrap();
    assert_eq!(state, DocState::LocalNotebook);
}
