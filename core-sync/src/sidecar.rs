//! Local metadata sidecar
//!
//! After every successful sync the engine records which remote version the
//! local copy came from. The record is the basis for future drift detection
//! (`OutOfSync`): the stored version is the local half of the comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::paths::DocumentPaths;

/// Contents of the `metadata.local` sidecar file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalMetadata {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "ModifiedClient")]
    pub modified_client: String,

    #[serde(rename = "Version")]
    pub version: i64,
}

impl LocalMetadata {
    pub fn new(id: &str, modified_client: DateTime<Utc>, version: i64) -> Self {
        Self {
            id: id.to_string(),
            modified_client: modified_client.to_rfc3339(),
            version,
        }
    }

    /// Write the sidecar, creating the sidecar directory if needed
    pub async fn write(&self, paths: &DocumentPaths) -> Result<()> {
        tokio::fs::create_dir_all(paths.sidecar_dir()).await?;
        let payload = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(paths.local_metadata(), payload).await?;
        Ok(())
    }

    /// Read the sidecar if one exists
    pub async fn read(paths: &DocumentPaths) -> Result<Option<Self>> {
        if !paths.local_metadata().exists() {
            return Ok(None);
        }
        let payload = tokio::fs::read(paths.local_metadata()).await?;
        Ok(Some(serde_json::from_slice(&payload)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let paths = DocumentPaths::new(dir.path(), "doc-1", "Report");

        let meta = LocalMetadata::new("doc-1", Utc::now(), 7);
        meta.write(&paths).await.unwrap();

        let loaded = LocalMetadata::read(&paths).await.unwrap().unwrap();
        assert_eq!(loaded, meta);
    }

    #[tokio::test]
    async fn test_read_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let paths = DocumentPaths::new(dir.path(), "doc-1", "Report");
        assert!(LocalMetadata::read(&paths).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wire_field_names() {
        let dir = TempDir::new().unwrap();
        let paths = DocumentPaths::new(dir.path(), "doc-1", "Report");

        LocalMetadata::new("doc-1", Utc::now(), 3)
            .write(&paths)
            .await
            .unwrap();

        let raw = tokio::fs::read_to_string(paths.local_metadata())
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["ID"], "doc-1");
        assert_eq!(value["Version"], 3);
        assert!(value["ModifiedClient"].is_string());
    }
}
