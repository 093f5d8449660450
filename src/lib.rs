//! Hierarchical cluster index construction for node-link graphs

pub mod config;
pub mod error;
pub mod data;
pub mod graph;
pub mod cluster;
pub mod hierarchy;
pub mod storage;
pub mod pipeline;

pub use anyhow::{Result, anyhow};
pub use cluster::{ClusterRecord, Partition, PartitionSequence};
pub use error::{GraphError, HierarchyError};
pub use hierarchy::{AssemblyOptions, ClusterTree};
