//! Graph representation module

pub mod compressed;
pub mod builder;

pub use compressed::{CompressedGraph, Edge, Node};
pub use builder::GraphBuilder;
