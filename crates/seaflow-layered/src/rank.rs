//! Rank assignment.
//!
//! Longest-path ranking in topological order: every node sits `minlen` ranks below its deepest
//! predecessor. Sources that feed into deeper parts of the graph are then pulled down next to
//! their nearest successor so that short side branches do not produce long edges. Ranks are
//! normalized so the smallest is `0`.
//!
//! The graph must be acyclic (see [`crate::acyclic`]).

use crate::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;

pub fn rank(g: &mut LayoutGraph) {
    let ranks = longest_path(g);
    for (v, r) in ranks {
        if let Some(n) = g.node_mut(&v) {
            n.rank = Some(r);
        }
    }
    tighten_sources(g);
    normalize_ranks(g);
}

fn minlen(g: &LayoutGraph, e: &seaflow_graphlib::EdgeKey) -> i32 {
    g.edge_by_key(e)
        .map(|l| l.minlen.max(1))
        .unwrap_or(1)
        .try_into()
        .unwrap_or(i32::MAX)
}

fn longest_path(g: &LayoutGraph) -> Vec<(String, i32)> {
    let mut indegree: HashMap<&str, usize> = g.nodes().map(|v| (v, 0)).collect();
    for e in g.edges().filter(|e| !e.is_self_loop()) {
        if let Some(d) = indegree.get_mut(e.w.as_str()) {
            *d += 1;
        }
    }

    let mut queue: VecDeque<&str> = g
        .nodes()
        .filter(|v| indegree.get(v).copied() == Some(0))
        .collect();
    let mut rank: HashMap<&str, i32> = HashMap::default();
    let mut order: Vec<&str> = Vec::with_capacity(g.node_count());

    while let Some(v) = queue.pop_front() {
        let rv = *rank.entry(v).or_insert(0);
        order.push(v);
        for w in g.successors(v) {
            if w == v {
                continue;
            }
            let len = g
                .out_edges(v, Some(w))
                .iter()
                .map(|e| minlen(g, e))
                .max()
                .unwrap_or(1);
            let rw = rank.entry(w).or_insert(0);
            *rw = (*rw).max(rv.saturating_add(len));

            let Some(d) = indegree.get_mut(w) else {
                continue;
            };
            *d -= 1;
            if *d == 0 {
                queue.push_back(w);
            }
        }
    }

    // Anything left over sits on a cycle the acyclic pass did not see; keep it at rank 0.
    for v in g.nodes() {
        if !rank.contains_key(v) {
            tracing::warn!(node = v, "rank: node not reached in topological order");
            order.push(v);
        }
    }

    order
        .into_iter()
        .map(|v| (v.to_string(), rank.get(v).copied().unwrap_or(0)))
        .collect()
}

fn tighten_sources(g: &mut LayoutGraph) {
    let sources: Vec<String> = g.sources().into_iter().map(str::to_string).collect();
    for v in sources {
        let mut best: Option<i32> = None;
        for e in g.out_edges(&v, None) {
            if e.is_self_loop() {
                continue;
            }
            let Some(rw) = g.node(&e.w).and_then(|n| n.rank) else {
                continue;
            };
            let candidate = rw - minlen(g, &e);
            best = Some(best.map_or(candidate, |b| b.min(candidate)));
        }
        let Some(best) = best else {
            continue;
        };
        if let Some(n) = g.node_mut(&v) {
            if n.rank.is_some_and(|r| best > r) {
                n.rank = Some(best);
            }
        }
    }
}

pub(crate) fn normalize_ranks(g: &mut LayoutGraph) {
    let mut min_rank = i32::MAX;
    g.for_each_node(|_, n| {
        if let Some(r) = n.rank {
            min_rank = min_rank.min(r);
        }
    });
    if min_rank == i32::MAX || min_rank == 0 {
        return;
    }
    g.for_each_node_mut(|_, n| {
        if let Some(r) = n.rank.as_mut() {
            *r -= min_rank;
        }
    });
}
