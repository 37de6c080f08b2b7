//! Wire record parsing helpers
//!
//! The listing call returns records with string type tags and ISO-8601
//! timestamps. Both are parsed once, at tree-construction time, into closed
//! Rust types; nothing downstream ever re-inspects the raw strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{Result, TreeError};

/// Closed set of record type tags.
///
/// The wire field is an open string; anything outside these two tags is a
/// hard construction error for the record carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Collection,
    Document,
}

impl RecordType {
    /// Get the wire representation of this tag
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Collection => "CollectionType",
            RecordType::Document => "DocumentType",
        }
    }
}

impl FromStr for RecordType {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CollectionType" => Ok(RecordType::Collection),
            "DocumentType" => Ok(RecordType::Document),
            other => Err(TreeError::UnknownRecordType {
                type_tag: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a `ModifiedClient` timestamp.
///
/// The service emits both `2023-04-01T12:30:00.123456Z` and
/// `2023-04-01T12:30:00Z` depending on the writing client, so a plain-second
/// fallback is kept behind the RFC 3339 parse.
pub fn parse_modified_client(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%SZ")
        .map(|naive| naive.and_utc())
        .map_err(|_| TreeError::Timestamp {
            value: value.to_string(),
        })
}
