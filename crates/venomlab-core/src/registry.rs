//! Host-side node registry
//!
//! Holds node instances (local or client proxies) keyed by the identifier the
//! host binds at registration. The registry does not order, schedule or
//! connect nodes.
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = NodeRegistry::new();
//! registry.register("encoder", Box::new(XorEncoderNode::new()))?;
//! registry.register("remote", Box::new(NodeClient::new(config.client)?))?;
//!
//! let node = registry.get_mut("encoder").unwrap();
//! node.configure(params).await?;
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::descriptor::NodeMetadata;
use crate::error::{NodeError, Result};
use crate::node::Node;
use crate::types::NodeFamily;

/// Registry of node instances by identifier
#[derive(Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, Box<dyn Node>>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id` to the node and store it.
    ///
    /// Fails if the identifier is taken or the node was already bound.
    pub fn register(&mut self, id: impl Into<String>, mut node: Box<dyn Node>) -> Result<()> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(NodeError::DuplicateId(id));
        }
        node.bind_id(id.clone())?;
        log::info!("Registered node '{}'", id);
        self.nodes.insert(id, node);
        Ok(())
    }

    /// Remove a node, returning it to the caller
    pub fn unregister(&mut self, id: &str) -> Option<Box<dyn Node>> {
        self.nodes.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Node> {
        self.nodes.get(id).map(|n| n.as_ref())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn Node + 'static)> {
        self.nodes.get_mut(id).map(|n| n.as_mut())
    }

    /// Check if an identifier is registered
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// List registered identifiers
    pub fn ids(&self) -> Vec<&str> {
        self.nodes.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Collect metadata of every node, grouped by family.
    ///
    /// Identifiers inside a family are sorted for stable output.
    pub async fn metadata_by_family(&self) -> BTreeMap<NodeFamily, Vec<(String, NodeMetadata)>> {
        let mut grouped: BTreeMap<NodeFamily, Vec<(String, NodeMetadata)>> = BTreeMap::new();
        for (id, node) in &self.nodes {
            let metadata = node.metadata().await;
            grouped
                .entry(metadata.family.clone())
                .or_default()
                .push((id.clone(), metadata));
        }
        for entries in grouped.values_mut() {
            entries.sort_by(|a, b| a.0.cmp(&b.0));
        }
        grouped
    }
}
