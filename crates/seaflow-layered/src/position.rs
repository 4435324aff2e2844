//! Coordinate assignment in the top-to-bottom frame.
//!
//! Ranks are stacked vertically, each as tall as its tallest node, with `ranksep` between them.
//! Within a rank nodes are placed left to right: each one aims for the mean `x` of its
//! predecessors but never closer to its left neighbour than half both widths plus the separation
//! (`nodesep`, or `edgesep` next to a dummy). The first rank is simply packed.
//!
//! `x` placement is a single greedy pass over the ranks, deliberately simpler than Brandes-Köpf
//! positioning: there are no alignment candidates to balance, and a node pushed right by its
//! neighbour never pulls earlier nodes along.

use crate::LayoutGraph;
use crate::util::build_layer_matrix;

pub fn position(g: &mut LayoutGraph) {
    let layering = build_layer_matrix(g);
    position_y(g, &layering);
    position_x(g, &layering);
}

fn position_y(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    let ranksep = g.graph().ranksep;
    let mut y = 0.0;
    for layer in layering {
        let height = layer
            .iter()
            .filter_map(|v| g.node(v))
            .map(|n| n.height)
            .fold(0.0, f64::max);
        for v in layer {
            if let Some(n) = g.node_mut(v) {
                n.y = Some(y + height / 2.0);
            }
        }
        y += height + ranksep;
    }
}

fn position_x(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    let nodesep = g.graph().nodesep;
    let edgesep = g.graph().edgesep;

    for layer in layering {
        // (x, width, dummy) of the node placed just before.
        let mut prev: Option<(f64, f64, bool)> = None;
        for v in layer {
            let Some(node) = g.node(v) else {
                continue;
            };
            let (width, dummy) = (node.width, node.dummy);

            let min_x = prev.map(|(px, pw, pdummy)| {
                let sep = if pdummy || dummy { edgesep } else { nodesep };
                px + pw / 2.0 + sep + width / 2.0
            });
            let desired = predecessor_mean_x(g, v);
            let x = match (desired, min_x) {
                (Some(d), Some(m)) => d.max(m),
                (Some(d), None) => d,
                (None, Some(m)) => m,
                (None, None) => width / 2.0,
            };

            if let Some(n) = g.node_mut(v) {
                n.x = Some(x);
            }
            prev = Some((x, width, dummy));
        }
    }
}

fn predecessor_mean_x(g: &LayoutGraph, v: &str) -> Option<f64> {
    let xs: Vec<f64> = g
        .predecessors(v)
        .into_iter()
        .filter(|u| *u != v)
        .filter_map(|u| g.node(u).and_then(|n| n.x))
        .collect();
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}
