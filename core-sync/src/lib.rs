//! # Document Sync Engine
//!
//! Drives each document through its synchronization lifecycle and packages
//! new documents for upload.
//!
//! ## Overview
//!
//! A [`Document`](document::Document) is the sync handle for one document
//! node of the tree. Its state is recomputed from the local filesystem on
//! every read ([`evaluate_state`](paths::evaluate_state)); `sync()` downloads
//! and extracts the raw bundle, records a local metadata sidecar, and invokes
//! the injected conversion adapter to produce the exportable output.
//!
//! ## Components
//!
//! - **Paths & state** (`paths`): deterministic per-document filesystem
//!   layout and the pure state evaluation function
//! - **Sidecar** (`sidecar`): the `metadata.local` record used as the basis
//!   for future drift detection
//! - **Document** (`document`): the per-document state machine
//! - **Package** (`package`): in-memory zip assembly for the upload path
//!
//! ## Failure Semantics
//!
//! Downloads extract into a staging directory that is renamed into place
//! only on full success, so state evaluation never observes a half-written
//! document directory. Transport errors propagate to the caller; there is
//! no internal retry and no cancellation of an in-flight download.

pub mod document;
pub mod error;
pub mod package;
pub mod paths;
pub mod sidecar;

pub use document::Document;
pub use error::{Result, SyncError};
pub use package::{create_document_zip, DocumentPackage, PackageMetadata};
pub use paths::{evaluate_state, DocumentPaths};
pub use sidecar::LocalMetadata;
