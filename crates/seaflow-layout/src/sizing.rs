use crate::config::{LayoutConfig, SizingPolicy};
use seaflow_core::{GraphNode, NodeKind, Size};

/// Height of a box showing `label`, wrapped at `chars_per_line` characters.
///
/// `max(node_height, base_height + (lines - 1) * line_height)`; empty labels get `node_height`.
pub fn estimate_height(label: &str, config: &LayoutConfig) -> f64 {
    let chars = label.chars().count();
    if chars == 0 {
        return config.node_height;
    }
    let lines = chars.div_ceil(config.chars_per_line.max(1));
    let estimate = config.base_height + (lines as f64 - 1.0) * config.line_height;
    config.node_height.max(estimate)
}

/// Size of a plain node: its own size hint, else the configured policy. Groups are sized by
/// their children and yield `None`.
pub fn plain_size(node: &GraphNode, config: &LayoutConfig) -> Option<Size> {
    match &node.kind {
        NodeKind::Group => None,
        NodeKind::Plain { size: Some(size) } => Some(*size),
        NodeKind::Plain { size: None } => Some(match config.sizing {
            SizingPolicy::Fixed => Size::new(config.node_width, config.node_height),
            SizingPolicy::EstimateFromLabel => {
                Size::new(config.node_width, estimate_height(&node.label, config))
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_follows_the_line_formula() {
        let config = LayoutConfig::task_viewer();
        assert_eq!(estimate_height("", &config), 36.0);
        assert_eq!(estimate_height("short", &config), 46.0);
        assert_eq!(estimate_height(&"x".repeat(18), &config), 46.0);
        assert_eq!(estimate_height(&"x".repeat(19), &config), 66.0);
        assert_eq!(estimate_height(&"x".repeat(37), &config), 86.0);
    }

    #[test]
    fn explicit_sizes_win() {
        let config = LayoutConfig::task_viewer();
        let node = GraphNode::plain("a", "a long label that would wrap").with_size(Size::new(10.0, 20.0));
        assert_eq!(plain_size(&node, &config), Some(Size::new(10.0, 20.0)));
        assert_eq!(plain_size(&GraphNode::group("g", "G"), &config), None);
    }
}
