//! # Collaborator Bridge Traits
//!
//! Interfaces the mirror core requires from its external collaborators.
//!
//! ## Overview
//!
//! The core never talks to the cloud service or the annotation renderer
//! directly. Both are injected behind the traits defined here:
//!
//! - [`CloudClient`](cloud::CloudClient) - remote listing, blob resolution,
//!   raw bundle download, remote deletion
//! - [`Renderer`](render::Renderer) - opaque conversion of extracted
//!   device-native annotation files into an exportable document
//!
//! The authentication flow, HTTP transport details (timeouts, retries, TLS)
//! and the rendering algorithms are entirely the collaborator's concern.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert their internal errors into it and provide actionable
//! messages. Transport failures are propagated to the caller unchanged; the
//! core performs no internal retry.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! across async tasks behind an `Arc`.

pub mod cloud;
pub mod error;
pub mod render;

pub use error::{BridgeError, Result};

// Re-export commonly used types
pub use cloud::{CloudClient, Record, RecordDetail};
pub use render::Renderer;
