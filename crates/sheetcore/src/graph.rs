use crate::spec::{OutputSpec, ValidationPolicy};
use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One compiled node: created from a single tabular row, immutable after
/// compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeModel {
    pub name: String,
    pub agent_type: String,
    pub prompt: String,
    pub context: Value,
    pub inputs: Vec<String>,
    pub outputs: OutputSpec,
    pub successor: Option<String>,
    pub policy: ValidationPolicy,
    pub extra: Value,
}

impl NodeModel {
    /// Dynamic-routing nodes carry no static edge; whether this node is a
    /// terminal or a router is decided by the agent bound to it.
    pub fn is_terminal_or_dynamic(&self) -> bool {
        self.successor.is_none()
    }
}

/// A compiled graph: node map plus the row order the sheet declared.
/// The first row's node is the entry node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphModel {
    name: String,
    nodes: HashMap<String, NodeModel>,
    order: Vec<String>,
}

impl GraphModel {
    pub(crate) fn new(name: String, nodes: HashMap<String, NodeModel>, order: Vec<String>) -> Self {
        Self { name, nodes, order }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self, name: &str) -> Option<&NodeModel> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn entry(&self) -> Option<&NodeModel> {
        self.order.first().and_then(|name| self.nodes.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node names in sheet row order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Nodes in sheet row order
    pub fn iter(&self) -> impl Iterator<Item = &NodeModel> {
        self.order.iter().filter_map(|name| self.nodes.get(name))
    }
}
