//! Rank-direction transforms.
//!
//! Ranking and positioning always work top to bottom. For `LR`/`RL` node boxes are rotated
//! before layout and the axes swapped back afterwards; `BT`/`RL` additionally mirror the rank
//! axis.

use crate::{LayoutGraph, RankDir};

pub fn adjust(g: &mut LayoutGraph) {
    if g.graph().rankdir.is_horizontal() {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        (n.width, n.height) = (n.height, n.width);
    });
}

fn reverse_y(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        if let Some(y) = n.y {
            n.y = Some(-y);
        }
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            p.y = -p.y;
        }
    });
}

fn swap_xy(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        if let (Some(x), Some(y)) = (n.x, n.y) {
            n.x = Some(y);
            n.y = Some(x);
        }
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            (p.x, p.y) = (p.y, p.x);
        }
    });
}
