//! Layout knobs and the two viewer presets.

use crate::{Error, Result};
use seaflow_layered::RankDir;
use serde::{Deserialize, Serialize};

/// How plain nodes without an explicit size are sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizingPolicy {
    /// Every node is `node_width x node_height`.
    #[default]
    Fixed,
    /// The height grows with the number of wrapped label lines.
    EstimateFromLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    pub rankdir: RankDir,
    pub nodesep: f64,
    pub ranksep: f64,
    /// Space between a group's border and its children, on every side.
    pub padding: f64,
    pub node_width: f64,
    pub node_height: f64,
    pub sizing: SizingPolicy,
    pub chars_per_line: usize,
    pub line_height: f64,
    pub base_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::dag_viewer()
    }
}

impl LayoutConfig {
    /// DAG definitions: fixed 172 x 36 boxes, left to right.
    pub fn dag_viewer() -> Self {
        Self {
            rankdir: RankDir::LR,
            nodesep: 50.0,
            ranksep: 100.0,
            padding: 40.0,
            node_width: 172.0,
            node_height: 36.0,
            sizing: SizingPolicy::Fixed,
            chars_per_line: 18,
            line_height: 20.0,
            base_height: 46.0,
        }
    }

    /// Task executions: 180 wide, height estimated from the label.
    pub fn task_viewer() -> Self {
        Self {
            node_width: 180.0,
            sizing: SizingPolicy::EstimateFromLabel,
            ..Self::dag_viewer()
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("nodesep", self.nodesep),
            ("ranksep", self.ranksep),
            ("padding", self.padding),
            ("line-height", self.line_height),
            ("base-height", self.base_height),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config {
                    message: format!("{name} must be a non-negative number, got {value}"),
                });
            }
        }
        for (name, value) in [("node-width", self.node_width), ("node-height", self.node_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config {
                    message: format!("{name} must be a positive number, got {value}"),
                });
            }
        }
        if self.chars_per_line == 0 {
            return Err(Error::Config {
                message: "chars-per-line must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = LayoutConfig::from_json(r#"{"rankdir": "TB", "node-width": 200}"#).unwrap();
        assert_eq!(config.rankdir, RankDir::TB);
        assert_eq!(config.node_width, 200.0);
        assert_eq!(config.ranksep, 100.0);
        assert_eq!(config.sizing, SizingPolicy::Fixed);
    }

    #[test]
    fn sizing_uses_kebab_case() {
        let config = LayoutConfig::from_json(r#"{"sizing": "estimate-from-label"}"#).unwrap();
        assert_eq!(config.sizing, SizingPolicy::EstimateFromLabel);
    }

    #[test]
    fn rejects_negative_spacing() {
        let err = LayoutConfig::from_json(r#"{"nodesep": -1}"#).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
