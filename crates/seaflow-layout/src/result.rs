use seaflow_layered::RankDir;
use serde::{Deserialize, Serialize};

/// Side of a box where connection handles sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandleSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl HandleSide {
    /// `(source, target)` sides for edges flowing in `rankdir`.
    pub fn for_rankdir(rankdir: RankDir) -> (Self, Self) {
        match rankdir {
            RankDir::LR => (HandleSide::Right, HandleSide::Left),
            RankDir::RL => (HandleSide::Left, HandleSide::Right),
            RankDir::TB => (HandleSide::Bottom, HandleSide::Top),
            RankDir::BT => (HandleSide::Top, HandleSide::Bottom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub id: String,
    /// Top-left corner, relative to `parent` when set, canvas-global otherwise.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub source_side: HandleSide,
    pub target_side: HandleSide,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeLayout>,
}

impl LayoutResult {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Canvas-global top-left corner: the node's position plus those of all its ancestors.
    pub fn absolute_position(&self, id: &str) -> Option<(f64, f64)> {
        let mut node = self.node(id)?;
        let (mut x, mut y) = (node.x, node.y);
        // Bounded so a malformed parent chain cannot loop.
        for _ in 0..self.nodes.len() {
            let Some(parent) = node.parent.as_deref() else {
                return Some((x, y));
            };
            node = self.node(parent)?;
            x += node.x;
            y += node.y;
        }
        Some((x, y))
    }
}
