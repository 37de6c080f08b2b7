//! # Item Arena & Tree Builder
//!
//! Materializes the flat remote listing into a rooted hierarchy.
//!
//! ## Representation
//!
//! Nodes live in an arena (`Vec<Item>`) and reference each other by
//! [`NodeId`] index pairs instead of owned pointers, so the parent/child
//! graph carries no ownership cycles. Index 0 is always the synthetic root
//! collection with the empty id; it exists even for an empty listing and is
//! the only node without a parent.
//!
//! ## Construction
//!
//! `Tree::build` walks the records in input order and materializes each one
//! together with its ancestor chain, memoized by id:
//!
//! - a parent that is already materialized is attached to directly
//! - a parent that only appears later in the input is recursed into first
//!   (forward references resolve regardless of listing order)
//! - a parent id absent from the listing is treated as an orphan: warning,
//!   re-parent to root
//! - a parent chain that loops back onto a record currently being
//!   materialized is a cycle: warning, the offending record attaches to root
//! - an unknown type tag fails construction of that record only; it is
//!   logged and skipped, and its children recover through the orphan path
//!
//! Children are appended in encounter order; rebuilding from the same input
//! yields a structurally identical tree.

use std::collections::{HashMap, HashSet};

use bridge_traits::cloud::Record;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{Result, TreeError};
use crate::record::{parse_modified_client, RecordType};

/// Index of a node inside the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed node variant, decided once at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// A folder; its only behavior is owning children
    Collection,
    /// A document with lifecycle state managed by the sync engine
    Document {
        /// Last opened page reported by the device
        current_page: i64,
    },
}

impl ItemKind {
    pub fn is_document(&self) -> bool {
        matches!(self, ItemKind::Document { .. })
    }
}

/// One node of the tree: identity, metadata, and arena links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Item UUID; empty string for the synthetic root
    pub id: String,
    /// Display name
    pub name: String,
    /// Remote version counter
    pub version: i64,
    /// Last client modification time
    pub modified_client: DateTime<Utc>,
    /// Per-record success flag from the listing
    pub success: bool,
    /// Collection or document
    pub kind: ItemKind,
    /// Owning collection; `None` only for the root
    pub parent: Option<NodeId>,
    /// Child nodes in encounter order
    pub children: Vec<NodeId>,
}

impl Item {
    /// The synthetic root collection. Carries no remote metadata.
    fn root() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            version: 0,
            modified_client: DateTime::<Utc>::UNIX_EPOCH,
            success: true,
            kind: ItemKind::Collection,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Construct a detached item from a wire record.
    ///
    /// # Errors
    ///
    /// Fails when the record has an empty id, an unknown type tag, or an
    /// unparseable `ModifiedClient` timestamp. A partial record never
    /// produces a node.
    pub fn from_record(record: &Record) -> Result<Self> {
        if record.id.is_empty() {
            return Err(TreeError::MissingField {
                name: record.visible_name.clone(),
                field: "ID",
            });
        }

        let kind = match record.record_type.parse::<RecordType>()? {
            RecordType::Collection => ItemKind::Collection,
            RecordType::Document => ItemKind::Document {
                current_page: record.current_page,
            },
        };

        Ok(Self {
            id: record.id.clone(),
            name: record.visible_name.clone(),
            version: record.version,
            modified_client: parse_modified_client(&record.modified_client)?,
            success: record.success,
            kind,
            parent: None,
            children: Vec::new(),
        })
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_document(&self) -> bool {
        self.kind.is_document()
    }

    /// Human-readable modification time for the presentation layer
    pub fn modified_str(&self) -> String {
        self.modified_client.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// The materialized hierarchy
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Item>,
    index: HashMap<String, NodeId>,
}

impl Tree {
    /// The synthetic root is always the first arena slot
    pub const ROOT: NodeId = NodeId(0);

    fn with_root() -> Self {
        let mut index = HashMap::new();
        index.insert(String::new(), Self::ROOT);
        Self {
            nodes: vec![Item::root()],
            index,
        }
    }

    /// Build a tree from the flat record listing.
    ///
    /// Never fails because of repairable input (orphans, cycles, skipped
    /// records); see the module docs for the repair rules.
    pub fn build(records: &[Record]) -> Result<Self> {
        let mut tree = Self::with_root();

        let lookup: HashMap<&str, usize> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.id.is_empty())
            .map(|(i, record)| (record.id.as_str(), i))
            .collect();

        let mut in_progress = HashSet::new();

        for i in 0..records.len() {
            if let Err(err) = Self::materialize(&mut tree, records, i, &lookup, &mut in_progress) {
                tracing::error!(
                    id = %records[i].id,
                    name = %records[i].visible_name,
                    error = %err,
                    "skipping record"
                );
            }
        }

        debug!(nodes = tree.len(), "tree materialized");
        Ok(tree)
    }

    fn materialize(
        tree: &mut Self,
        records: &[Record],
        i: usize,
        lookup: &HashMap<&str, usize>,
        in_progress: &mut HashSet<String>,
    ) -> Result<NodeId> {
        let record = &records[i];

        if let Some(&existing) = tree.index.get(&record.id) {
            return Ok(existing);
        }

        // Validates the record before any parent work happens
        let item = Item::from_record(record)?;

        if !record.success {
            warn!(id = %record.id, name = %record.visible_name, "listing reported failure for item");
        }

        in_progress.insert(record.id.clone());

        let parent = if record.parent.is_empty() {
            Self::ROOT
        } else if let Some(&node) = tree.index.get(&record.parent) {
            node
        } else if in_progress.contains(&record.parent) {
            warn!(
                id = %record.id,
                parent = %record.parent,
                "parent chain forms a cycle, attaching to root"
            );
            Self::ROOT
        } else if let Some(&parent_index) = lookup.get(record.parent.as_str()) {
            match Self::materialize(tree, records, parent_index, lookup, in_progress) {
                Ok(node) => node,
                Err(err) => {
                    warn!(
                        id = %record.id,
                        parent = %record.parent,
                        error = %err,
                        "parent failed to materialize, attaching to root"
                    );
                    Self::ROOT
                }
            }
        } else {
            warn!(
                id = %record.id,
                name = %record.visible_name,
                parent = %record.parent,
                "no parent for item, attaching to root"
            );
            Self::ROOT
        };

        in_progress.remove(&record.id);
        Ok(tree.attach(parent, item))
    }

    fn attach(&mut self, parent: NodeId, mut item: Item) -> NodeId {
        let id = NodeId(self.nodes.len());
        item.parent = Some(parent);
        self.index.insert(item.id.clone(), id);
        self.nodes.push(item);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Look up a node by item UUID. The empty id resolves to the root.
    pub fn get(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn root(&self) -> &Item {
        &self.nodes[Self::ROOT.0]
    }

    pub fn node(&self, id: NodeId) -> &Item {
        &self.nodes[id.0]
    }

    /// Total node count, including the synthetic root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// All nodes with their ids, in arena order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Item)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, item)| (NodeId(i), item))
    }

    /// Document nodes only
    pub fn documents(&self) -> impl Iterator<Item = (NodeId, &Item)> {
        self.iter().filter(|(_, item)| item.is_document())
    }

    /// Depth-first preorder walk of the subtree below `id` (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
        }
        out
    }

    /// Whether `candidate` lies in the subtree below `ancestor`.
    ///
    /// Documents own no subtree, so they are never a parent of anything.
    pub fn is_parent_of(&self, ancestor: NodeId, candidate: NodeId) -> bool {
        let mut cursor = self.nodes[candidate.0].parent;
        while let Some(parent) = cursor {
            if parent == ancestor {
                return true;
            }
            cursor = self.nodes[parent.0].parent;
        }
        false
    }
}
