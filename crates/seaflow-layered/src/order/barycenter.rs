use crate::LayoutGraph;

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    /// `None` when the node has no neighbour on the fixed side.
    pub barycenter: Option<f64>,
    pub weight: f64,
}

/// Weighted mean `order` of each node's neighbours on the fixed layer: predecessors for a
/// downward sweep, successors for an upward one.
pub fn barycenter(g: &LayoutGraph, layer: &[String], downward: bool) -> Vec<BarycenterEntry> {
    layer
        .iter()
        .map(|v| {
            let edges = if downward {
                g.in_edges(v, None)
            } else {
                g.out_edges(v, None)
            };
            let mut sum = 0.0;
            let mut weight = 0.0;
            for e in &edges {
                let neighbour = if downward { &e.v } else { &e.w };
                let w = g.edge_by_key(e).map_or(0.0, |l| l.weight);
                let order = g.node(neighbour).and_then(|n| n.order).unwrap_or(0) as f64;
                sum += w * order;
                weight += w;
            }
            BarycenterEntry {
                v: v.clone(),
                barycenter: (weight > 0.0).then(|| sum / weight),
                weight,
            }
        })
        .collect()
}

/// Orders a layer by barycenter. Nodes without a barycenter keep their current index; the rest
/// fill the remaining slots in ascending barycenter order. Ties keep the current relative order,
/// or reverse it when `bias_right` is set.
pub fn sort_by_barycenter(entries: Vec<BarycenterEntry>, bias_right: bool) -> Vec<String> {
    let n = entries.len();
    let mut fixed: Vec<Option<String>> = vec![None; n];
    let mut sortable: Vec<(usize, f64, String)> = Vec::new();
    for (i, entry) in entries.into_iter().enumerate() {
        match entry.barycenter {
            Some(bc) => sortable.push((i, bc, entry.v)),
            None => fixed[i] = Some(entry.v),
        }
    }

    sortable.sort_by(|a, b| {
        a.1.total_cmp(&b.1).then_with(|| {
            if bias_right {
                b.0.cmp(&a.0)
            } else {
                a.0.cmp(&b.0)
            }
        })
    });

    let mut sorted = sortable.into_iter().map(|(_, _, v)| v);
    let mut out = Vec::with_capacity(n);
    for slot in fixed {
        match slot {
            Some(v) => out.push(v),
            None => {
                if let Some(v) = sorted.next() {
                    out.push(v);
                }
            }
        }
    }
    out
}
