//! # Item Model & Tree Materialization
//!
//! Reconstructs a rooted collection/document hierarchy from the flat remote
//! listing and models the per-item metadata the rest of the core works with.
//!
//! ## Overview
//!
//! The cloud service returns an unordered, flat set of metadata records with
//! parent references that may be missing, circular, or forward-declared.
//! This crate turns that set into a [`Tree`](tree::Tree): an arena of typed
//! nodes (collections and documents) rooted at a single synthetic root
//! collection with the empty id.
//!
//! ## Components
//!
//! - **Record parsing** (`record`): type-tag dispatch and timestamp parsing
//!   for the raw wire records
//! - **Lifecycle states** (`state`): the document sync state enum shared
//!   with the sync engine
//! - **Tree** (`tree`): arena nodes, the memoized recursive builder, and
//!   ancestry queries
//!
//! ## Repair Semantics
//!
//! Tree construction never fails wholesale because of one bad record:
//! orphans are re-parented to the root with a warning, cycles are broken at
//! the offending record, and records with an unknown type tag are skipped.

pub mod error;
pub mod record;
pub mod state;
pub mod tree;

pub use error::{Result, TreeError};
pub use record::RecordType;
pub use state::DocState;
pub use tree::{Item, ItemKind, NodeId, Tree};
