//! Cycle removal.
//!
//! A depth-first search over nodes in insertion order collects every edge that points back into
//! the active DFS stack. Those edges are reversed for the rest of the pipeline and flipped back by
//! [`undo`], with their bend points reversed so they still run source to target.

use crate::LayoutGraph;
use rustc_hash::FxHashSet as HashSet;
use seaflow_graphlib::EdgeKey;

pub fn run(g: &mut LayoutGraph) {
    let fas = dfs_fas(g);
    tracing::trace!(reversed = fas.len(), "acyclic: feedback arc set");

    for e in fas {
        let Some(mut label) = g.edge_by_key(&e).cloned() else {
            continue;
        };
        g.remove_edge_key(&e);

        label.forward_name = e.name.clone();
        label.reversed = true;
        let name = unique_rev_name(g, &e.w, &e.v);
        g.set_edge_key(e.flipped(Some(name)), label);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let Some(label) = g.edge_by_key(&e) else {
            continue;
        };
        if !label.reversed {
            continue;
        }
        let mut label = label.clone();
        g.remove_edge_key(&e);

        let forward_name = label.forward_name.take();
        label.reversed = false;
        label.points.reverse();
        g.set_edge_key(e.flipped(forward_name), label);
    }
}

fn unique_rev_name(g: &LayoutGraph, v: &str, w: &str) -> String {
    let mut i = 1usize;
    loop {
        let candidate = format!("rev{i}");
        if !g.has_edge(v, w, Some(&candidate)) {
            return candidate;
        }
        i += 1;
    }
}

fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    fn dfs(
        g: &LayoutGraph,
        v: &str,
        visited: &mut HashSet<String>,
        stack: &mut HashSet<String>,
        fas: &mut Vec<EdgeKey>,
    ) {
        if !visited.insert(v.to_string()) {
            return;
        }
        stack.insert(v.to_string());
        for e in g.out_edges(v, None) {
            if e.is_self_loop() {
                continue;
            }
            if stack.contains(e.w.as_str()) {
                fas.push(e);
            } else {
                dfs(g, &e.w, visited, stack, fas);
            }
        }
        stack.remove(v);
    }

    let mut fas = Vec::new();
    let mut visited = HashSet::default();
    let mut stack = HashSet::default();
    for v in g.nodes() {
        dfs(g, v, &mut visited, &mut stack, &mut fas);
    }
    fas
}

#[cfg(test)]
mod tests {
    use super::*;
    use seaflow_graphlib::{Graph, GraphOptions};

    fn multigraph() -> LayoutGraph {
        Graph::new(GraphOptions { multigraph: true })
    }

    fn is_acyclic(g: &LayoutGraph) -> bool {
        let mut indeg: Vec<(String, usize)> = g
            .nodes()
            .map(|v| (v.to_string(), g.predecessors(v).len()))
            .collect();
        let mut removed = 0;
        loop {
            let Some(pos) = indeg.iter().position(|(_, d)| *d == 0) else {
                break;
            };
            let (v, _) = indeg.remove(pos);
            removed += 1;
            for w in g.successors(&v) {
                if let Some(entry) = indeg.iter_mut().find(|(id, _)| id == w) {
                    entry.1 -= 1;
                }
            }
        }
        removed == g.node_count()
    }

    #[test]
    fn breaks_a_three_cycle_and_restores_it() {
        let mut g = multigraph();
        g.set_path(&["a", "b", "c", "a"]);

        run(&mut g);
        assert!(is_acyclic(&g));
        assert_eq!(g.edge_count(), 3);

        undo(&mut g);
        assert!(g.has_edge("a", "b", None));
        assert!(g.has_edge("b", "c", None));
        assert!(g.has_edge("c", "a", None));
    }

    #[test]
    fn two_cycle_keeps_both_edges_apart() {
        let mut g = multigraph();
        g.set_edge("a", "b");
        g.set_edge("b", "a");

        run(&mut g);
        assert!(is_acyclic(&g));
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.out_edges("a", Some("b")).len(), 2);

        undo(&mut g);
        assert!(g.has_edge("a", "b", None));
        assert!(g.has_edge("b", "a", None));
    }

    #[test]
    fn leaves_dags_untouched() {
        let mut g = multigraph();
        g.set_path(&["a", "b", "c"]);
        g.set_edge("a", "c");
        run(&mut g);
        assert!(g.edges().all(|e| !g.edge_by_key(e).is_some_and(|l| l.reversed)));
    }
}
