use crate::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;

/// Weighted number of edge crossings between each pair of adjacent layers.
pub fn cross_count(g: &LayoutGraph, layering: &[Vec<String>]) -> f64 {
    layering
        .windows(2)
        .map(|pair| two_layer_cross_count(g, &pair[0], &pair[1]))
        .sum()
}

// Accumulator tree over south positions (Barth, Jünger & Mutzel).
fn two_layer_cross_count(g: &LayoutGraph, north: &[String], south: &[String]) -> f64 {
    if south.is_empty() {
        return 0.0;
    }

    let south_pos: HashMap<&str, usize> = south
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    let mut south_entries: Vec<(usize, f64)> = Vec::new();
    for v in north {
        let mut entries: Vec<(usize, f64)> = g
            .out_edges(v, None)
            .into_iter()
            .filter_map(|e| {
                let pos = *south_pos.get(e.w.as_str())?;
                let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
                Some((pos, weight))
            })
            .collect();
        entries.sort_by_key(|(pos, _)| *pos);
        south_entries.extend(entries);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let mut tree = vec![0.0f64; 2 * first_index - 1];
    first_index -= 1;

    let mut cc = 0.0;
    for (pos, weight) in south_entries {
        let mut index = pos + first_index;
        tree[index] += weight;
        let mut weight_sum = 0.0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += weight;
        }
        cc += weight * weight_sum;
    }
    cc
}
