//! Graph description shared by the layout engine and the validator.
//!
//! A [`GraphDescription`] is a plain value: every change produces a new one (with a bumped
//! `version`) and both consumers rebuild their state from it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Role of a node in the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NodeKind {
    /// A leaf box. `size: None` lets the layout derive the size from the label.
    Plain {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<Size>,
    },
    /// A sub-graph; its size is always computed from its children.
    Group,
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Plain { size: None }
    }
}

impl NodeKind {
    pub fn is_group(&self) -> bool {
        matches!(self, NodeKind::Group)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub label: String,
    /// Name of the action template the node runs, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl GraphNode {
    pub fn plain(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Plain { size: None },
            parent: None,
            label: label.into(),
            action: None,
        }
    }

    pub fn group(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Group,
            parent: None,
            label: label.into(),
            action: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Fixes the size of a plain node. Ignored for groups.
    pub fn with_size(mut self, size: Size) -> Self {
        if let NodeKind::Plain { size: slot } = &mut self.kind {
            *slot = Some(size);
        }
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn is_group(&self) -> bool {
        self.kind.is_group()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Node-level dependency (`previous_nodes`, `previous_steps`).
    #[default]
    Flow,
    /// Dependency on a sub-DAG or sub-task (`previous_dags`, `previous_tasks`).
    SubGraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub kind: EdgeKind,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Flow,
        }
    }

    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDescription {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl GraphDescription {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Direct children of `parent`, in declaration order.
    pub fn children<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.parent.as_deref() == Some(parent))
    }

    pub fn from_json(text: &str) -> crate::Result<Self> {
        let description: Self = serde_json::from_str(text)?;
        crate::builder::check(&description.nodes)?;
        Ok(description)
    }
}
