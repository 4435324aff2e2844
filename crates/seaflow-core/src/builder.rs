use crate::{Error, GraphDescription, GraphEdge, GraphNode, Result};
use std::collections::{HashMap, HashSet};

/// Collects nodes and edges and checks the containment invariants on [`build`].
///
/// [`build`]: GraphDescriptionBuilder::build
#[derive(Debug, Clone, Default)]
pub struct GraphDescriptionBuilder {
    version: u64,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl GraphDescriptionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn node(mut self, node: GraphNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn edge(mut self, edge: GraphEdge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn push_node(&mut self, node: GraphNode) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn push_edge(&mut self, edge: GraphEdge) -> &mut Self {
        self.edges.push(edge);
        self
    }

    pub fn build(self) -> Result<GraphDescription> {
        check(&self.nodes)?;
        Ok(GraphDescription {
            version: self.version,
            nodes: self.nodes,
            edges: self.edges,
        })
    }
}

/// Rejects duplicate ids, unknown or non-group parents and containment cycles.
///
/// Edges are not checked: dangling endpoints are tolerated downstream.
pub(crate) fn check(nodes: &[GraphNode]) -> Result<()> {
    let mut by_id: HashMap<&str, &GraphNode> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        if by_id.insert(node.id.as_str(), node).is_some() {
            return Err(Error::DuplicateNode {
                id: node.id.clone(),
            });
        }
    }

    for node in nodes {
        let Some(parent) = node.parent.as_deref() else {
            continue;
        };
        let Some(parent_node) = by_id.get(parent) else {
            return Err(Error::UnknownParent {
                id: node.id.clone(),
                parent: parent.to_string(),
            });
        };
        if !parent_node.is_group() {
            return Err(Error::ParentNotGroup {
                id: node.id.clone(),
                parent: parent.to_string(),
            });
        }
    }

    for node in nodes {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if !seen.insert(current.id.as_str()) {
                return Err(Error::ContainmentCycle {
                    id: node.id.clone(),
                });
            }
            cursor = current
                .parent
                .as_deref()
                .and_then(|p| by_id.get(p).copied());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parents_may_be_declared_after_their_children() {
        let description = GraphDescriptionBuilder::new()
            .node(GraphNode::plain("a", "A").with_parent("g"))
            .node(GraphNode::group("g", "G"))
            .build()
            .unwrap();
        assert_eq!(description.children("g").count(), 1);
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let err = GraphDescriptionBuilder::new()
            .node(GraphNode::group("g", "G").with_parent("g"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ContainmentCycle { .. }));
    }
}
