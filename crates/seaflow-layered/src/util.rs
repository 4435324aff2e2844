use crate::{LayoutGraph, Point, Rect};

/// Point where the segment from the center of `rect` towards `point` leaves the rectangle.
pub fn intersect_rect(rect: Rect, point: Point) -> Point {
    let dx = point.x - rect.x;
    let dy = point.y - rect.y;
    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;

    // Degenerate direction: pick the middle of the right border.
    if dx == 0.0 && dy == 0.0 {
        return Point {
            x: rect.x + w,
            y: rect.y,
        };
    }

    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };

    Point {
        x: rect.x + sx,
        y: rect.y + sy,
    }
}

/// Node ids grouped by rank, each rank sorted by `order`.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut entries: Vec<(i32, usize, &str)> = Vec::new();
    for v in g.nodes() {
        let Some(node) = g.node(v) else {
            continue;
        };
        let Some(rank) = node.rank else {
            continue;
        };
        entries.push((rank, node.order.unwrap_or(0), v));
    }
    let Some(max_rank) = entries.iter().map(|(r, _, _)| *r).max() else {
        return Vec::new();
    };

    let mut layers: Vec<Vec<(usize, &str)>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];
    for (rank, order, v) in entries {
        if let Some(layer) = layers.get_mut(rank.max(0) as usize) {
            layer.push((order, v));
        }
    }
    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|(o, _)| *o);
            layer.into_iter().map(|(_, v)| v.to_string()).collect()
        })
        .collect()
}
