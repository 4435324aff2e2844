#![forbid(unsafe_code)]

//! Seaflow diagram model and connection validation.
//!
//! The layout engine (`seaflow-layout`) and the validator in this crate share only the types of
//! [`model`]. Everything here is synchronous and side-effect free apart from `tracing` events.

pub mod action;
pub mod adapter;
pub mod authoring;
mod builder;
pub mod error;
pub mod interface;
pub mod model;
pub mod record;
mod serde_util;
pub mod validate;

pub use action::{ActionKind, ActionTemplate};
pub use adapter::{AdapterIssue, AdapterMap, ParamRef, check_adapters};
pub use authoring::AuthoringGraph;
pub use builder::GraphDescriptionBuilder;
pub use error::{Error, Result};
pub use interface::{InputPort, NodeInterface, OutputPort, PortType};
pub use model::{EdgeKind, GraphDescription, GraphEdge, GraphNode, NodeKind, Size};
pub use record::{DagRecord, DagView, StepState, TaskRecord, TaskView};
pub use validate::{
    EdgeVerdict, Interfaces, ValidationOptions, Verdict, validate_all, validate_edge,
};
