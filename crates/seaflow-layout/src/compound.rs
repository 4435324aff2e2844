//! Two-phase layout of graphs with groups.
//!
//! Phase one walks the containment forest in post-order. Each group lays out its direct children
//! with the layered engine (deeper groups are already resolved and act as fixed-size boxes),
//! wraps them in their bounding box plus padding and stores their positions relative to itself.
//! Phase two lays out the top-level nodes the same way, with every edge lifted to the top-level
//! ancestors of its endpoints.

use crate::config::LayoutConfig;
use crate::result::{HandleSide, LayoutResult, NodeLayout};
use crate::sizing::plain_size;
use seaflow_core::{GraphEdge, GraphNode, Size};
use seaflow_layered::graphlib::GraphOptions;
use seaflow_layered::{GraphLabel, LayoutGraph, NodeLabel};
use std::collections::{HashMap, HashSet};

/// Positions every node of `nodes`. Never fails: dangling edges, self-loops, unknown or
/// non-group parents and containment cycles are tolerated.
pub fn layout(nodes: &[GraphNode], edges: &[GraphEdge], config: &LayoutConfig) -> LayoutResult {
    let scene = Scene::new(nodes, edges);
    tracing::debug!(
        nodes = scene.order.len(),
        edges = scene.edges.len(),
        groups = scene.order.iter().filter(|id| scene.is_group(id)).count(),
        "compound layout"
    );

    let mut sizes: HashMap<&str, Size> = HashMap::new();
    let mut relative: HashMap<&str, (f64, f64)> = HashMap::new();

    for group in scene.groups_post_order() {
        let members = scene.children_of(Some(group));
        let size = if members.is_empty() {
            Size::new(
                config.node_width + config.padding,
                config.node_height + config.padding,
            )
        } else {
            let placed = place(&scene, Some(group), &members, &sizes, config);
            for (id, (x, y)) in placed.positions {
                relative.insert(id, (x + config.padding, y + config.padding));
            }
            Size::new(
                placed.width + 2.0 * config.padding,
                placed.height + 2.0 * config.padding,
            )
        };
        tracing::trace!(group, width = size.width, height = size.height, "group resolved");
        sizes.insert(group, size);
    }

    let top_level = scene.children_of(None);
    let placed = place(&scene, None, &top_level, &sizes, config);
    for (id, pos) in placed.positions {
        relative.insert(id, pos);
    }

    let (source_side, target_side) = HandleSide::for_rankdir(config.rankdir);
    let nodes = scene
        .order
        .iter()
        .map(|&id| {
            let size = scene.size_of(id, &sizes, config);
            let (x, y) = relative.get(id).copied().unwrap_or((0.0, 0.0));
            NodeLayout {
                id: id.to_string(),
                x,
                y,
                width: size.width,
                height: size.height,
                parent: scene.parent.get(id).map(|p| p.to_string()),
                source_side,
                target_side,
            }
        })
        .collect();

    LayoutResult {
        width: placed.width,
        height: placed.height,
        nodes,
    }
}

/// Resolved view over the input: deduplicated nodes, effective parents and usable edges.
struct Scene<'a> {
    order: Vec<&'a str>,
    by_id: HashMap<&'a str, &'a GraphNode>,
    parent: HashMap<&'a str, &'a str>,
    edges: Vec<(&'a str, &'a str)>,
}

impl<'a> Scene<'a> {
    fn new(nodes: &'a [GraphNode], edges: &'a [GraphEdge]) -> Self {
        let mut order = Vec::with_capacity(nodes.len());
        let mut by_id: HashMap<&str, &GraphNode> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if by_id.contains_key(node.id.as_str()) {
                tracing::debug!(node = %node.id, "duplicate node id ignored");
                continue;
            }
            by_id.insert(node.id.as_str(), node);
            order.push(node.id.as_str());
        }

        let mut parent: HashMap<&str, &str> = HashMap::new();
        for &id in &order {
            let Some(p) = by_id[id].parent.as_deref() else {
                continue;
            };
            match by_id.get(p) {
                Some(pn) if pn.is_group() => {
                    parent.insert(id, pn.id.as_str());
                }
                _ => tracing::debug!(node = id, parent = p, "parent missing or not a group"),
            }
        }

        // Break containment cycles by detaching the node that closes the loop.
        for &id in &order {
            let mut seen: HashSet<&str> = HashSet::new();
            seen.insert(id);
            let mut cursor = parent.get(id).copied();
            while let Some(p) = cursor {
                if !seen.insert(p) {
                    break;
                }
                cursor = parent.get(p).copied();
            }
            if cursor == Some(id) {
                tracing::debug!(node = id, "containment cycle broken");
                parent.remove(id);
            }
        }

        let mut usable = Vec::with_capacity(edges.len());
        for edge in edges {
            let (s, t) = (edge.source.as_str(), edge.target.as_str());
            if !by_id.contains_key(s) || !by_id.contains_key(t) {
                tracing::debug!(source = s, target = t, "dangling edge dropped");
                continue;
            }
            if edge.is_self_loop() {
                continue;
            }
            usable.push((s, t));
        }

        Self {
            order,
            by_id,
            parent,
            edges: usable,
        }
    }

    fn is_group(&self, id: &str) -> bool {
        self.by_id.get(id).is_some_and(|n| n.is_group())
    }

    fn children_of(&self, container: Option<&str>) -> Vec<&'a str> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.parent.get(id).copied() == container)
            .collect()
    }

    /// Groups ordered so that every group comes after all groups nested inside it.
    fn groups_post_order(&self) -> Vec<&'a str> {
        fn visit<'a>(scene: &Scene<'a>, id: &'a str, out: &mut Vec<&'a str>) {
            for child in scene.children_of(Some(id)) {
                if scene.is_group(child) {
                    visit(scene, child, out);
                }
            }
            out.push(id);
        }

        let mut out = Vec::new();
        for id in self.children_of(None) {
            if self.is_group(id) {
                visit(self, id, &mut out);
            }
        }
        out
    }

    /// The ancestor of `id` (or `id` itself) whose parent is `container`.
    fn lift(&self, id: &'a str, container: Option<&str>) -> Option<&'a str> {
        let mut current = id;
        for _ in 0..=self.order.len() {
            let parent = self.parent.get(current).copied();
            if parent == container {
                return Some(current);
            }
            current = parent?;
        }
        None
    }

    fn size_of(&self, id: &str, groups: &HashMap<&str, Size>, config: &LayoutConfig) -> Size {
        if let Some(size) = groups.get(id) {
            return *size;
        }
        self.by_id
            .get(id)
            .and_then(|n| plain_size(n, config))
            .unwrap_or(Size::new(config.node_width, config.node_height))
    }
}

struct Placement<'a> {
    /// Top-left corners relative to the bounding box of the placed nodes.
    positions: Vec<(&'a str, (f64, f64))>,
    width: f64,
    height: f64,
}

/// Runs the layered engine over `members`, the direct children of `container`.
fn place<'a>(
    scene: &Scene<'a>,
    container: Option<&str>,
    members: &[&'a str],
    sizes: &HashMap<&str, Size>,
    config: &LayoutConfig,
) -> Placement<'a> {
    let mut g = LayoutGraph::new(GraphOptions { multigraph: true });
    g.set_graph(GraphLabel {
        rankdir: config.rankdir,
        nodesep: config.nodesep,
        ranksep: config.ranksep,
        ..Default::default()
    });
    for &id in members {
        let size = scene.size_of(id, sizes, config);
        g.set_node(
            id,
            NodeLabel {
                width: size.width,
                height: size.height,
                ..Default::default()
            },
        );
    }

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for &(s, t) in &scene.edges {
        let (Some(ls), Some(lt)) = (scene.lift(s, container), scene.lift(t, container)) else {
            continue;
        };
        if ls == lt || !seen.insert((ls, lt)) {
            continue;
        }
        g.set_edge(ls, lt);
    }

    seaflow_layered::layout(&mut g);

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut corners = Vec::with_capacity(members.len());
    for &id in members {
        let Some(n) = g.node(id) else {
            continue;
        };
        let (x, y) = (n.x.unwrap_or(0.0), n.y.unwrap_or(0.0));
        let (left, top) = (x - n.width / 2.0, y - n.height / 2.0);
        min_x = min_x.min(left);
        min_y = min_y.min(top);
        max_x = max_x.max(left + n.width);
        max_y = max_y.max(top + n.height);
        corners.push((id, (left, top)));
    }
    if corners.is_empty() {
        return Placement {
            positions: Vec::new(),
            width: 0.0,
            height: 0.0,
        };
    }

    Placement {
        positions: corners
            .into_iter()
            .map(|(id, (x, y))| (id, (x - min_x, y - min_y)))
            .collect(),
        width: max_x - min_x,
        height: max_y - min_y,
    }
}
