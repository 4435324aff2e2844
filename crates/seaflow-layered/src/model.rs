//! Label types carried by the layout graph, plus small geometry primitives.

use seaflow_graphlib::EdgeKey;
use serde::{Deserialize, Serialize};

/// Direction in which ranks advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn is_horizontal(self) -> bool {
        matches!(self, RankDir::LR | RankDir::RL)
    }
}

impl std::str::FromStr for RankDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" | "TD" => Ok(RankDir::TB),
            "BT" => Ok(RankDir::BT),
            "LR" => Ok(RankDir::LR),
            "RL" => Ok(RankDir::RL),
            other => Err(format!("unknown rank direction `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    /// Gap between adjacent nodes of the same rank.
    pub nodesep: f64,
    /// Gap between adjacent ranks.
    pub ranksep: f64,
    /// Gap used when at least one of two neighbours is an edge dummy.
    pub edgesep: f64,
    pub marginx: f64,
    pub marginy: f64,
    /// Filled by [`crate::layout`].
    pub width: f64,
    pub height: f64,
    /// Heads of dummy chains created by normalization; empty outside of a layout run.
    pub dummy_chains: Vec<String>,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            nodesep: 50.0,
            ranksep: 50.0,
            edgesep: 20.0,
            marginx: 0.0,
            marginy: 0.0,
            width: 0.0,
            height: 0.0,
            dummy_chains: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    /// Center x, set by layout.
    pub x: Option<f64>,
    /// Center y, set by layout.
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    pub dummy: bool,
    pub edge_label: Option<EdgeLabel>,
    pub edge_obj: Option<EdgeKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    /// Minimum number of ranks between the endpoints.
    pub minlen: usize,
    pub weight: f64,
    /// Bend points, source side first, clipped to the endpoint boxes.
    pub points: Vec<Point>,
    pub reversed: bool,
    pub forward_name: Option<String>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            points: Vec::new(),
            reversed: false,
            forward_name: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned box given by its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
