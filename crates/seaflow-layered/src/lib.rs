#![forbid(unsafe_code)]

//! Layered placement of directed graphs.
//!
//! [`layout`] runs the whole pipeline on a [`LayoutGraph`]: cycle removal, ranking, long-edge
//! normalization, crossing reduction, coordinate assignment and the rank-direction transform.
//! On return every node carries a center `x`/`y`, every edge its bend points and the graph label
//! the overall `width`/`height`.

pub mod acyclic;
pub mod coordinate_system;
mod model;
pub mod normalize;
pub mod order;
pub mod position;
pub mod rank;
pub mod util;

pub use model::{EdgeLabel, GraphLabel, NodeLabel, Point, RankDir, Rect};
pub use seaflow_graphlib as graphlib;

use seaflow_graphlib::{EdgeKey, Graph};

pub type LayoutGraph = Graph<NodeLabel, EdgeLabel, GraphLabel>;

/// Lays out `g` in place.
///
/// The graph should be a multigraph when it may contain opposing edges (`a -> b` and `b -> a`):
/// cycle removal reverses one of them and needs a distinct name to keep both.
pub fn layout(g: &mut LayoutGraph) {
    tracing::debug!(
        nodes = g.node_count(),
        edges = g.edge_count(),
        rankdir = ?g.graph().rankdir,
        "layered layout"
    );

    let self_loops = remove_self_loops(g);
    coordinate_system::adjust(g);
    acyclic::run(g);
    rank::rank(g);
    normalize::run(g);
    order::order(g);
    position::position(g);
    normalize::undo(g);
    coordinate_system::undo(g);
    translate(g);
    assign_node_intersects(g);
    acyclic::undo(g);

    for (key, label) in self_loops {
        g.set_edge_key(key, label);
    }
}

fn remove_self_loops(g: &mut LayoutGraph) -> Vec<(EdgeKey, EdgeLabel)> {
    let mut out = Vec::new();
    for key in g.edge_keys() {
        if !key.is_self_loop() {
            continue;
        }
        if let Some(mut label) = g.edge_by_key(&key).cloned() {
            label.points.clear();
            g.remove_edge_key(&key);
            out.push((key, label));
        }
    }
    out
}

fn translate(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    g.for_each_node(|_, n| {
        let (Some(x), Some(y)) = (n.x, n.y) else {
            return;
        };
        min_x = min_x.min(x - n.width / 2.0);
        max_x = max_x.max(x + n.width / 2.0);
        min_y = min_y.min(y - n.height / 2.0);
        max_y = max_y.max(y + n.height / 2.0);
    });
    for e in g.edges() {
        let Some(label) = g.edge_by_key(e) else {
            continue;
        };
        for p in &label.points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
    }

    let marginx = g.graph().marginx;
    let marginy = g.graph().marginy;
    if !min_x.is_finite() {
        let graph = g.graph_mut();
        graph.width = 2.0 * marginx;
        graph.height = 2.0 * marginy;
        return;
    }

    let dx = marginx - min_x;
    let dy = marginy - min_y;
    g.for_each_node_mut(|_, n| {
        if let (Some(x), Some(y)) = (n.x, n.y) {
            n.x = Some(x + dx);
            n.y = Some(y + dy);
        }
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            p.x += dx;
            p.y += dy;
        }
    });

    let graph = g.graph_mut();
    graph.width = max_x - min_x + 2.0 * marginx;
    graph.height = max_y - min_y + 2.0 * marginy;
}

fn node_rect(g: &LayoutGraph, v: &str) -> Option<Rect> {
    let n = g.node(v)?;
    Some(Rect {
        x: n.x?,
        y: n.y?,
        width: n.width,
        height: n.height,
    })
}

fn assign_node_intersects(g: &mut LayoutGraph) {
    for key in g.edge_keys() {
        let (Some(v_rect), Some(w_rect)) = (node_rect(g, &key.v), node_rect(g, &key.w)) else {
            continue;
        };
        let Some(label) = g.edge_mut_by_key(&key) else {
            continue;
        };

        let toward_v = label.points.first().copied().unwrap_or(Point {
            x: w_rect.x,
            y: w_rect.y,
        });
        let toward_w = label.points.last().copied().unwrap_or(Point {
            x: v_rect.x,
            y: v_rect.y,
        });
        label.points.insert(0, util::intersect_rect(v_rect, toward_v));
        label.points.push(util::intersect_rect(w_rect, toward_w));
    }
}
