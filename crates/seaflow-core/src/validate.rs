//! Port-compatibility validation of connections.
//!
//! A connection `S -> T` is valid when every required input of `T` is provided, by name, among
//! the outputs of `S`. When `S` declares no outputs the outputs of its action template are used
//! instead. Each edge is judged on its own: outputs of several predecessors are never merged.

use crate::action::{self, ActionTemplate};
use crate::interface::{NodeInterface, OutputPort, PortType};
use crate::model::{GraphEdge, GraphNode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Interfaces keyed by node id.
pub type Interfaces = IndexMap<String, NodeInterface>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ValidationOptions {
    /// Also require the matched output's type to equal the input's type.
    pub match_types: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "kebab-case")]
pub enum Verdict {
    Valid,
    Invalid { reason: String },
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid { reason } => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeVerdict {
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Judges one proposed or existing connection.
///
/// The current edge set is taken for callers that hand over the whole graph; the verdict only
/// ever depends on `edge` itself.
pub fn validate_edge(
    edge: &GraphEdge,
    nodes: &[GraphNode],
    _all_edges: &[GraphEdge],
    interfaces: &Interfaces,
    actions: &[ActionTemplate],
    options: ValidationOptions,
) -> Verdict {
    let source = nodes.iter().find(|n| n.id == edge.source);
    let target = nodes.iter().find(|n| n.id == edge.target);
    let (Some(source), Some(target)) = (source, target) else {
        return Verdict::Valid;
    };

    let Some(target_interface) = interfaces.get(&target.id) else {
        return Verdict::Valid;
    };
    let available = source_outputs(source, interfaces, actions);

    for (name, input) in target_interface.required_inputs() {
        let Some(output) = available.get(name) else {
            let provided: Vec<&str> = available.keys().map(String::as_str).collect();
            return Verdict::Invalid {
                reason: format!(
                    "Target requires input '{name}', but Source only provides: {}",
                    provided.join(", ")
                ),
            };
        };
        if options.match_types && output.ty != input.ty {
            return Verdict::Invalid {
                reason: type_mismatch(name, input.ty, output.ty),
            };
        }
    }
    Verdict::Valid
}

fn type_mismatch(name: &str, expected: PortType, provided: PortType) -> String {
    format!("Target input '{name}' expects {expected}, but Source provides {provided}")
}

fn source_outputs(
    source: &GraphNode,
    interfaces: &Interfaces,
    actions: &[ActionTemplate],
) -> IndexMap<String, OutputPort> {
    if let Some(interface) = interfaces.get(&source.id) {
        if !interface.outputs.is_empty() {
            return interface.outputs.clone();
        }
    }
    source
        .action
        .as_deref()
        .and_then(|name| action::find(actions, name))
        .map(|a| a.output_def.clone())
        .unwrap_or_default()
}

/// Re-validates every edge. Invalid edges are reported, never dropped.
pub fn validate_all(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    interfaces: &Interfaces,
    actions: &[ActionTemplate],
    options: ValidationOptions,
) -> Vec<EdgeVerdict> {
    let verdicts: Vec<EdgeVerdict> = edges
        .iter()
        .map(|edge| EdgeVerdict {
            source: edge.source.clone(),
            target: edge.target.clone(),
            verdict: validate_edge(edge, nodes, edges, interfaces, actions, options),
        })
        .collect();
    tracing::debug!(
        edges = verdicts.len(),
        invalid = verdicts.iter().filter(|v| !v.verdict.is_valid()).count(),
        "validated connections"
    );
    verdicts
}
