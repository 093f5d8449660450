//! Error types for graph loading and hierarchy construction

use thiserror::Error;

/// Errors raised while building the graph model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("duplicate node id {id}")]
    DuplicateNodeId { id: String },

    #[error("link {position} references unknown node id {id}")]
    UnknownEndpoint { position: usize, id: String },

    #[error("node {node} is out of range for a graph with {node_count} nodes")]
    NodeOutOfRange { node: u32, node_count: usize },
}

/// Errors raised while turning a partition sequence into a cluster tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("partition at level {level} covers {got} nodes, expected {expected}")]
    PartitionLengthMismatch { level: usize, expected: usize, got: usize },

    #[error("level {level} does not exist ({num_levels} levels)")]
    UnknownLevel { level: usize, num_levels: usize },

    #[error("local cluster {local_id} does not appear at level {level}")]
    UnknownCluster { level: usize, local_id: u32 },

    /// A cluster at `level` contains nodes that disagree on their cluster at `level + 1`
    #[error(
        "cluster {cluster} at level {level} is split between clusters {first_parent} and {second_parent} at the next level"
    )]
    NestingViolation {
        level: usize,
        cluster: u32,
        first_parent: u32,
        second_parent: u32,
    },
}
