//! The document behind the DAG editor.
//!
//! [`AuthoringGraph`] holds the placed nodes, their interfaces and adapters, the connections and
//! the action catalog. Every successful change bumps `version`; a rejected change leaves the
//! document untouched. Connections are validated when proposed, and re-validated as a whole by
//! [`AuthoringGraph::edge_statuses`]: edges that became invalid after an interface edit are
//! reported, not removed.

use crate::action::{self, ActionTemplate};
use crate::adapter::{AdapterIssue, AdapterMap, check_adapters};
use crate::interface::NodeInterface;
use crate::model::{GraphDescription, GraphEdge, GraphNode};
use crate::record::{DagComponent, DagComponentKind, DagRecord};
use crate::validate::{EdgeVerdict, Interfaces, ValidationOptions, Verdict, validate_all, validate_edge};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthoringGraph {
    pub version: u64,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub interfaces: Interfaces,
    pub adapters: IndexMap<String, AdapterMap>,
    pub actions: Vec<ActionTemplate>,
    pub options: ValidationOptions,
}

impl AuthoringGraph {
    pub fn new(actions: Vec<ActionTemplate>) -> Self {
        Self {
            actions,
            ..Default::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let graph: Self = serde_json::from_str(text)?;
        crate::builder::check(&graph.nodes)?;
        Ok(graph)
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn action(&self, name: &str) -> Option<&ActionTemplate> {
        action::find(&self.actions, name)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn require_node(&self, id: &str) -> Result<&GraphNode> {
        self.node(id).ok_or_else(|| Error::UnknownNode { id: id.to_string() })
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    /// Places a node running `action` and returns its id.
    ///
    /// Ids are `node-<n>` with `n` one past the current node count, skipping ids in use. The
    /// node's interface starts as a copy of the action's port definitions.
    pub fn add_node(&mut self, action: &str) -> Result<String> {
        let template = self.action(action).ok_or_else(|| Error::UnknownAction {
            name: action.to_string(),
        })?;
        let label = template.node_label();
        let interface = template.interface();

        let mut n = self.nodes.len() + 1;
        let id = loop {
            let candidate = format!("node-{n}");
            if self.node(&candidate).is_none() {
                break candidate;
            }
            n += 1;
        };

        self.nodes
            .push(GraphNode::plain(id.clone(), label).with_action(action));
        self.interfaces.insert(id.clone(), interface);
        self.bump();
        tracing::debug!(node = %id, action, version = self.version, "added node");
        Ok(id)
    }

    pub fn set_interface(&mut self, node: &str, interface: NodeInterface) -> Result<()> {
        self.require_node(node)?;
        self.interfaces.insert(node.to_string(), interface);
        self.bump();
        Ok(())
    }

    pub fn set_adapters(&mut self, node: &str, adapters: AdapterMap) -> Result<()> {
        self.require_node(node)?;
        self.adapters.insert(node.to_string(), adapters);
        self.bump();
        Ok(())
    }

    /// Removes a node with its incident connections, interface and adapters.
    pub fn remove_node(&mut self, node: &str) -> Result<()> {
        self.require_node(node)?;
        self.nodes.retain(|n| n.id != node);
        self.edges.retain(|e| e.source != node && e.target != node);
        self.interfaces.shift_remove(node);
        self.adapters.shift_remove(node);
        self.bump();
        Ok(())
    }

    /// Checks a proposed connection without applying it.
    pub fn check_connection(&self, source: &str, target: &str) -> Verdict {
        let edge = GraphEdge::new(source, target);
        validate_edge(
            &edge,
            &self.nodes,
            &self.edges,
            &self.interfaces,
            &self.actions,
            self.options,
        )
    }

    /// Adds the connection `source -> target` if it passes validation.
    ///
    /// Returns `Ok(false)` when the connection already exists.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<bool> {
        self.require_node(source)?;
        self.require_node(target)?;
        if source == target {
            return Err(Error::ConnectionRejected {
                from: source.to_string(),
                to: target.to_string(),
                reason: "a node cannot be connected to itself".to_string(),
            });
        }
        if self
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return Ok(false);
        }
        if let Verdict::Invalid { reason } = self.check_connection(source, target) {
            tracing::debug!(source, target, %reason, "connection rejected");
            return Err(Error::ConnectionRejected {
                from: source.to_string(),
                to: target.to_string(),
                reason,
            });
        }
        self.edges.push(GraphEdge::new(source, target));
        self.bump();
        Ok(true)
    }

    /// Removes the connection `source -> target`; returns whether one existed.
    pub fn disconnect(&mut self, source: &str, target: &str) -> bool {
        let before = self.edges.len();
        self.edges
            .retain(|e| !(e.source == source && e.target == target));
        let removed = self.edges.len() != before;
        if removed {
            self.bump();
        }
        removed
    }

    /// Current verdict for every connection, in insertion order.
    pub fn edge_statuses(&self) -> Vec<EdgeVerdict> {
        validate_all(
            &self.nodes,
            &self.edges,
            &self.interfaces,
            &self.actions,
            self.options,
        )
    }

    /// Adapter issues per node, skipping nodes without issues.
    pub fn adapter_issues(&self) -> IndexMap<String, Vec<AdapterIssue>> {
        let empty_interface = NodeInterface::default();
        let empty_adapters = AdapterMap::default();
        let mut out = IndexMap::new();
        for node in &self.nodes {
            let interface = self.interfaces.get(&node.id).unwrap_or(&empty_interface);
            let adapters = self.adapters.get(&node.id).unwrap_or(&empty_adapters);
            let action = node.action.as_deref().and_then(|a| self.action(a));
            let issues = check_adapters(interface, adapters, action);
            if !issues.is_empty() {
                out.insert(node.id.clone(), issues);
            }
        }
        out
    }

    pub fn description(&self) -> GraphDescription {
        GraphDescription {
            version: self.version,
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Exports the document as a create-DAG payload.
    ///
    /// Refused while any connection is invalid. An empty `title` falls back to `name`.
    pub fn to_dag_definition(&self, name: &str, title: &str) -> Result<DagRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MissingDagName);
        }
        let invalid = self
            .edge_statuses()
            .iter()
            .filter(|s| !s.verdict.is_valid())
            .count();
        if invalid > 0 {
            return Err(Error::InvalidConnections { count: invalid });
        }

        let components = self
            .nodes
            .iter()
            .map(|node| {
                let interface = self.interfaces.get(&node.id).cloned().unwrap_or_default();
                let adapters = self.adapters.get(&node.id).cloned().unwrap_or_default();
                DagComponent {
                    identifier: node.id.clone(),
                    kind: DagComponentKind::Node,
                    name: format!("{name}_{}", node.id),
                    title: node.label.clone(),
                    action: node.action.clone(),
                    previous_nodes: self
                        .edges
                        .iter()
                        .filter(|e| e.target == node.id)
                        .map(|e| e.source.clone())
                        .collect(),
                    input_adapter: adapters.input,
                    output_adapter: adapters.output,
                    input_def: Some(interface.inputs),
                    output_def: Some(interface.outputs),
                    ..Default::default()
                }
            })
            .collect();

        Ok(DagRecord {
            identifier: format!("dag-{name}"),
            name: name.to_string(),
            title: if title.trim().is_empty() {
                name.to_string()
            } else {
                title.to_string()
            },
            components,
        })
    }
}
