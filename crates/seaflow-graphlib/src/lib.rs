#![forbid(unsafe_code)]

//! Graph container APIs used by `seaflow-layered` and `seaflow-layout`.
//!
//! The container is a directed graph, optionally a multigraph with named parallel edges. Nodes
//! and edges are kept in insertion order so every algorithm built on top of it is deterministic
//! for a given input order.

mod graph;

pub use graph::{EdgeKey, Graph, GraphOptions};
