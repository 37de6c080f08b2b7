//! # Runtime Infrastructure
//!
//! Cross-cutting plumbing for the mirror core: configuration, the event bus,
//! and logging initialization.
//!
//! ## Components
//!
//! - **Config** (`config`): builder-validated [`MirrorConfig`](config::MirrorConfig)
//!   holding the injected collaborator bridges, the local data directory, and
//!   the template set used for notebook rendering
//! - **Events** (`events`): typed broadcast [`EventBus`](events::EventBus)
//!   through which the sync engine publishes state transitions
//! - **Logging** (`logging`): `tracing-subscriber` setup with env-filter and
//!   pretty/compact/JSON output
//!
//! All required capabilities are validated fail-fast at config build time so
//! a missing bridge surfaces as one actionable error instead of a runtime
//! panic deep inside a sync.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{MirrorConfig, MirrorConfigBuilder};
pub use error::{Error, Result};
pub use events::{DocumentEvent, EventBus, MirrorEvent, TreeEvent};
pub use logging::{init_logging, LogFormat, LoggingConfig};
