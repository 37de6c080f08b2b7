//! Cloud Service Abstraction
//!
//! Defines the contract with the device's cloud storage service: a flat
//! listing of metadata records, per-item blob URL resolution, raw bundle
//! download, and remote deletion.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

fn default_success() -> bool {
    true
}

/// One entry of the remote listing.
///
/// Field names follow the cloud API wire format verbatim, including the
/// `VissibleName` spelling the service actually uses. `parent` is either
/// empty (root level) or the `id` of another record; the referenced record
/// is not guaranteed to be present in the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Item UUID
    #[serde(rename = "ID")]
    pub id: String,

    /// UUID of the owning collection, or empty for root-level items
    #[serde(rename = "Parent")]
    pub parent: String,

    /// Type tag: `"CollectionType"` or `"DocumentType"`
    #[serde(rename = "Type")]
    pub record_type: String,

    /// Display name
    #[serde(rename = "VissibleName")]
    pub visible_name: String,

    /// Monotonically increasing per-item version counter
    #[serde(rename = "Version")]
    pub version: i64,

    /// Last client modification time (ISO-8601, fractional seconds optional)
    #[serde(rename = "ModifiedClient")]
    pub modified_client: String,

    /// Per-record success flag reported by the listing call
    #[serde(rename = "Success", default = "default_success")]
    pub success: bool,

    /// Last opened page on the device
    #[serde(rename = "CurrentPage", default)]
    pub current_page: i64,
}

/// Detailed record returned by a single-item lookup.
///
/// Carries the short-lived download handle for the raw document bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDetail {
    /// Item UUID
    #[serde(rename = "ID")]
    pub id: String,

    /// Current remote version
    #[serde(rename = "Version")]
    pub version: i64,

    /// Pre-signed URL for fetching the raw bundle
    #[serde(rename = "BlobURLGet")]
    pub blob_url_get: String,

    /// Expiry timestamp of the download handle
    #[serde(rename = "BlobURLGetExpires", default)]
    pub blob_url_get_expires: String,

    /// Whether the lookup itself succeeded
    #[serde(rename = "Success", default = "default_success")]
    pub success: bool,
}

/// Cloud storage client trait
///
/// Abstracts the authenticated HTTP transport to the cloud service. The core
/// holds an implementation behind `Arc<dyn CloudClient>` and never performs
/// network I/O itself.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::cloud::CloudClient;
///
/// async fn count_items(client: &dyn CloudClient) -> Result<usize> {
///     Ok(client.list_metadata().await?.len())
/// }
/// ```
#[async_trait]
pub trait CloudClient: Send + Sync {
    /// Fetch the complete flat listing of remote metadata records.
    async fn list_metadata(&self) -> Result<Vec<Record>>;

    /// Resolve a fresh download handle for one item.
    ///
    /// Handles are short-lived; callers memoize them at most for the
    /// lifetime of a single document handle.
    async fn get_item(&self, id: &str) -> Result<RecordDetail>;

    /// Download the compressed raw document bundle behind a blob URL.
    async fn get_raw_file(&self, blob_url: &str) -> Result<Bytes>;

    /// Request remote deletion of an item.
    ///
    /// Returns `Ok(true)` when the service acknowledged the deletion and
    /// `Ok(false)` when it rejected the request (e.g. version mismatch).
    /// Transport failures are errors, not rejections.
    async fn delete_item(&self, id: &str, version: i64) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_record() {
        let json = r#"{
            "ID": "4f5c5d3f-5b6e-4f0a-9a36-3f8c8b2d9e01",
            "Parent": "",
            "Type": "DocumentType",
            "VissibleName": "Quarterly Report",
            "Version": 3,
            "ModifiedClient": "2023-04-01T12:30:00.123456Z",
            "Success": true,
            "CurrentPage": 4
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "4f5c5d3f-5b6e-4f0a-9a36-3f8c8b2d9e01");
        assert_eq!(record.parent, "");
        assert_eq!(record.record_type, "DocumentType");
        assert_eq!(record.visible_name, "Quarterly Report");
        assert_eq!(record.version, 3);
        assert_eq!(record.current_page, 4);
        assert!(record.success);
    }

    #[test]
    fn test_deserialize_record_defaults() {
        // Older service responses omit Success and CurrentPage
        let json = r#"{
            "ID": "a",
            "Parent": "b",
            "Type": "CollectionType",
            "VissibleName": "Books",
            "Version": 1,
            "ModifiedClient": "2023-04-01T12:30:00Z"
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert!(record.success);
        assert_eq!(record.current_page, 0);
    }

    #[test]
    fn test_deserialize_record_detail() {
        let json = r#"{
            "ID": "a",
            "Version": 7,
            "BlobURLGet": "https://storage.example.com/blob/a?sig=xyz",
            "BlobURLGetExpires": "2023-04-01T13:30:00Z",
            "Success": true
        }"#;

        let detail: RecordDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.version, 7);
        assert!(detail.blob_url_get.starts_with("https://"));
    }
}
