//! # Mirror Service Facade
//!
//! The crate embedders depend on: one [`MirrorContext`](context::MirrorContext)
//! per mirror, constructed from an explicit [`MirrorConfig`], exposing tree
//! lookups, per-document sync handles, and upload packaging.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::MirrorConfig;
//! use core_service::MirrorContext;
//!
//! let config = MirrorConfig::builder()
//!     .data_dir(data_dir)
//!     .client(client)
//!     .renderer(renderer)
//!     .build()?;
//!
//! let ctx = MirrorContext::new(config);
//! let mut doc = ctx.document("4f5c5d3f-...").await?;
//! doc.sync(false).await?;
//! ```

pub mod context;
pub mod error;

pub use context::MirrorContext;
pub use error::{Result, ServiceError};
