//! Long-edge normalization.
//!
//! Edges spanning more than one rank are split into chains of zero-size dummy nodes, one per
//! intermediate rank, so ordering and positioning only ever see unit-length edges. [`undo`]
//! collapses the chains again and turns the dummy positions into the edge's bend points.

use crate::{EdgeLabel, LayoutGraph, NodeLabel, Point};
use seaflow_graphlib::EdgeKey;

pub fn run(g: &mut LayoutGraph) {
    g.graph_mut().dummy_chains.clear();
    for e in g.edge_keys() {
        normalize_edge(g, e);
    }
}

fn normalize_edge(g: &mut LayoutGraph, e: EdgeKey) {
    let (Some(v_rank), Some(w_rank)) = (
        g.node(&e.v).and_then(|n| n.rank),
        g.node(&e.w).and_then(|n| n.rank),
    ) else {
        return;
    };
    if w_rank <= v_rank + 1 {
        return;
    }
    let Some(edge_label) = g.edge_by_key(&e).cloned() else {
        return;
    };
    g.remove_edge_key(&e);

    let mut prev = e.v.clone();
    let mut first = true;
    for r in (v_rank + 1)..w_rank {
        let dummy = add_dummy_node(
            g,
            NodeLabel {
                rank: Some(r),
                dummy: true,
                edge_label: Some(edge_label.clone()),
                edge_obj: Some(e.clone()),
                ..Default::default()
            },
        );
        if first {
            g.graph_mut().dummy_chains.push(dummy.clone());
            first = false;
        }
        g.set_edge_named(
            prev,
            dummy.clone(),
            e.name.clone(),
            Some(EdgeLabel {
                weight: edge_label.weight,
                ..Default::default()
            }),
        );
        prev = dummy;
    }
    g.set_edge_named(
        prev,
        e.w.clone(),
        e.name.clone(),
        Some(EdgeLabel {
            weight: edge_label.weight,
            ..Default::default()
        }),
    );
}

fn add_dummy_node(g: &mut LayoutGraph, label: NodeLabel) -> String {
    let mut i = g.node_count();
    loop {
        let id = format!("_d{i}");
        if !g.has_node(&id) {
            g.set_node(id.clone(), label);
            return id;
        }
        i += 1;
    }
}

pub fn undo(g: &mut LayoutGraph) {
    let chains = std::mem::take(&mut g.graph_mut().dummy_chains);
    for start in chains {
        let Some(head) = g.node(&start) else {
            continue;
        };
        let (Some(mut label), Some(edge_obj)) = (head.edge_label.clone(), head.edge_obj.clone())
        else {
            continue;
        };
        label.points.clear();

        let mut v = start;
        loop {
            let Some(node) = g.node(&v) else {
                break;
            };
            if !node.dummy {
                break;
            }
            if let (Some(x), Some(y)) = (node.x, node.y) {
                label.points.push(Point { x, y });
            }
            let next = g.successors(&v).first().map(|s| s.to_string());
            g.remove_node(&v);
            match next {
                Some(w) => v = w,
                None => break,
            }
        }

        g.set_edge_key(edge_obj, label);
    }
}
