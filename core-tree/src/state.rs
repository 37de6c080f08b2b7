//! Document lifecycle states
//!
//! The state of a document is a pure function of what exists on the local
//! filesystem; it is recomputed on every read and never cached, with one
//! exception: while a download is in flight the sync engine forces
//! `Downloading` so observers see the transition.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;

/// Synchronization state of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocState {
    /// No local directory exists; the document lives only in the cloud
    RemoteOnly,
    /// A download is in flight (transient, never observed at rest)
    Downloading,
    /// Local directory with the original page-based source file present
    LocalPdf,
    /// Local directory with only the extracted annotation bundle
    LocalNotebook,
    /// Remote version exceeds the locally recorded one (reserved; no live
    /// code path produces this yet)
    OutOfSync,
    /// Remote deletion was acknowledged
    Deleted,
}

impl DocState {
    /// Whether a local copy of the document exists
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            DocState::LocalPdf | DocState::LocalNotebook | DocState::OutOfSync
        )
    }

    /// Whether `sync()` has work to do without being forced
    pub fn needs_sync(&self) -> bool {
        matches!(self, DocState::RemoteOnly | DocState::OutOfSync)
    }

    /// Get the string representation of this state
    pub fn as_str(&self) -> &'static str {
        match self {
            DocState::RemoteOnly => "remote_only",
            DocState::Downloading => "downloading",
            DocState::LocalPdf => "local_pdf",
            DocState::LocalNotebook => "local_notebook",
            DocState::OutOfSync => "out_of_sync",
            DocState::Deleted => "deleted",
        }
    }
}

impl FromStr for DocState {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote_only" => Ok(DocState::RemoteOnly),
            "downloading" => Ok(DocState::Downloading),
            "local_pdf" => Ok(DocState::LocalPdf),
            "local_notebook" => Ok(DocState::LocalNotebook),
            "out_of_sync" => Ok(DocState::OutOfSync),
            "deleted" => Ok(DocState::Deleted),
            other => Err(TreeError::InvalidState(other.to_string())),
        }
    }
}

impl std::fmt::Display for DocState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_local() {
        assert!(!DocState::RemoteOnly.is_local());
        assert!(!DocState::Downloading.is_local());
        assert!(DocState::LocalPdf.is_local());
        assert!(DocState::LocalNotebook.is_local());
        assert!(DocState::OutOfSync.is_local());
        assert!(!DocState::Deleted.is_local());
    }

    #[test]
    fn test_needs_sync() {
        assert!(DocState::RemoteOnly.needs_sync());
        assert!(DocState::OutOfSync.needs_sync());
        assert!(!DocState::LocalPdf.needs_sync());
        assert!(!DocState::LocalNotebook.needs_sync());
        assert!(!DocState::Downloading.needs_sync());
        assert!(!DocState::Deleted.needs_sync());
    }

    #[test]
    fn test_serialized_form_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&DocState::LocalNotebook).unwrap(),
            "\"local_notebook\""
        );
        let parsed: DocState = serde_json::from_str("\"remote_only\"").unwrap();
        assert_eq!(parsed, DocState::RemoteOnly);
    }

    #[test]
    fn test_state_from_str_roundtrip() {
        for state in [
            DocState::RemoteOnly,
            DocState::Downloading,
            DocState::LocalPdf,
            DocState::LocalNotebook,
            DocState::OutOfSync,
            DocState::Deleted,
        ] {
            assert_eq!(state.as_str().parse::<DocState>().unwrap(), state);
        }
        assert!("synced".parse::<DocState>().is_err());
    }
}
