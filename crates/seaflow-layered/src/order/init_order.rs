use crate::LayoutGraph;
use rustc_hash::FxHashSet as HashSet;

/// Initial layering: nodes are visited by ascending rank (insertion order breaks ties) and each
/// visit walks its successors depth-first, appending every newly reached node to its rank.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut starts: Vec<(i32, &str)> = g
        .nodes()
        .filter_map(|v| g.node(v).and_then(|n| n.rank).map(|r| (r, v)))
        .collect();
    let Some(max_rank) = starts.iter().map(|(r, _)| *r).max() else {
        return Vec::new();
    };
    starts.sort_by_key(|(r, _)| *r);

    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];
    let mut visited: HashSet<&str> = HashSet::default();

    fn dfs<'g>(
        g: &'g LayoutGraph,
        v: &'g str,
        visited: &mut HashSet<&'g str>,
        layers: &mut [Vec<String>],
    ) {
        if !visited.insert(v) {
            return;
        }
        if let Some(rank) = g.node(v).and_then(|n| n.rank) {
            if let Some(layer) = layers.get_mut(rank.max(0) as usize) {
                layer.push(v.to_string());
            }
        }
        for w in g.successors(v) {
            dfs(g, w, visited, layers);
        }
    }

    for (_, v) in starts {
        dfs(g, v, &mut visited, &mut layers);
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeLabel;

    fn node(rank: i32) -> NodeLabel {
        NodeLabel {
            rank: Some(rank),
            ..Default::default()
        }
    }

    #[test]
    fn follows_successors_depth_first() {
        let mut g = LayoutGraph::default();
        g.set_node("a", node(0));
        g.set_node("b", node(1));
        g.set_node("c", node(1));
        g.set_node("d", node(2));
        g.set_edge("a", "c");
        g.set_edge("c", "d");
        g.set_edge("a", "b");

        let layers = init_order(&g);
        assert_eq!(
            layers,
            vec![
                vec!["a".to_string()],
                vec!["c".to_string(), "b".to_string()],
                vec!["d".to_string()],
            ]
        );
    }

    #[test]
    fn empty_graph_has_no_layers() {
        assert!(init_order(&LayoutGraph::default()).is_empty());
    }
}
