#![forbid(unsafe_code)]

//! Layout of Seaflow diagrams.
//!
//! [`layout`] positions plain nodes and nested groups: groups are resolved bottom-up and then
//! treated as fixed-size boxes by their parent. Results are deterministic for a given input.

mod compound;
pub mod config;
mod error;
pub mod result;
pub mod sizing;

pub use compound::layout;
pub use config::{LayoutConfig, SizingPolicy};
pub use error::{Error, Result};
pub use result::{HandleSide, LayoutResult, NodeLayout};
pub use seaflow_layered::RankDir;

use seaflow_core::GraphDescription;

pub fn layout_description(description: &GraphDescription, config: &LayoutConfig) -> LayoutResult {
    tracing::debug!(version = description.version, "laying out description");
    layout(&description.nodes, &description.edges, config)
}
