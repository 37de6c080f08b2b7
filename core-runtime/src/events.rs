//! # Event Bus
//!
//! Decoupled notification channel between the sync engine and whatever
//! presentation layer drives it, built on `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The core mutates document state as a side effect of `sync()`, `delete()`
//! and tree rebuilds. Observers (a GUI tree view, a CLI progress line)
//! subscribe to the bus and receive typed [`MirrorEvent`]s; the core never
//! calls back into the presentation layer directly.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, MirrorEvent, DocumentEvent};
//! use core_tree::DocState;
//!
//! let bus = EventBus::new(64);
//! let mut stream = bus.subscribe();
//!
//! bus.emit(MirrorEvent::Document(DocumentEvent::StateChanged {
//!     id: "doc-1".to_string(),
//!     state: DocState::LocalNotebook,
//! }));
//! ```
//!
//! ## Delivery Semantics
//!
//! `broadcast` semantics apply: every subscriber sees every event, slow
//! subscribers receive `RecvError::Lagged` and keep going, and emitting
//! with no subscribers is a no-op rather than an error. Events are cheap
//! to clone; keep payloads to ids and states.

use tokio::sync::broadcast;

use core_tree::DocState;

/// Events concerning one document's lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A raw bundle download is starting; state is forced to `Downloading`
    DownloadStarted { id: String },
    /// The document's state was recomputed and published
    StateChanged { id: String, state: DocState },
    /// Remote deletion was acknowledged
    Deleted { id: String },
}

/// Events concerning the materialized tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// A fresh tree was built from the remote listing
    Rebuilt { nodes: usize },
    /// The cached tree was dropped; the next lookup rebuilds
    Invalidated,
}

/// Top-level event type carried on the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorEvent {
    Document(DocumentEvent),
    Tree(TreeEvent),
}

/// Central broadcast channel for mirror events
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MirrorEvent>,
}

impl EventBus {
    /// Create a bus with the given buffer capacity per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of subscribers that received it; zero when nobody
    /// is listening, which is not an error.
    pub fn emit(&self, event: MirrorEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Open a new independent subscription
    pub fn subscribe(&self) -> broadcast::Receiver<MirrorEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
