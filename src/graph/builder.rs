//! Graph construction module

use crate::error::GraphError;
use crate::graph::compressed::{CompressedGraph, Edge};

/// Builder for incrementally constructing a CompressedGraph
pub struct GraphBuilder {
    /// Node labels, indexed by the dense id assigned on insertion
    labels: Vec<String>,

    /// Adjacency lists for each node
    adjacency_lists: Vec<Vec<u32>>,

    /// Edges in insertion order
    edges: Vec<Edge>,
}

impl GraphBuilder {
    /// Create a new graph builder with the given node capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
            edges: Vec::new(),
        }
    }

    /// Number of nodes added so far
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Add a node and return its dense id
    pub fn add_node(&mut self, label: impl Into<String>) -> u32 {
        let idx = self.labels.len() as u32;
        self.labels.push(label.into());
        self.adjacency_lists.push(Vec::new());
        idx
    }

    /// Add an undirected edge between two existing nodes
    pub fn add_edge(&mut self, a: u32, b: u32) -> Result<(), GraphError> {
        let node_count = self.node_count();
        for endpoint in [a, b] {
            if endpoint as usize >= node_count {
                return Err(GraphError::NodeOutOfRange { node: endpoint, node_count });
            }
        }

        self.edges.push(Edge { a, b });
        self.adjacency_lists[a as usize].push(b);
        if a != b {
            self.adjacency_lists[b as usize].push(a);
        }

        Ok(())
    }

    /// Build the compressed graph
    pub fn build(mut self) -> CompressedGraph {
        let node_count = self.labels.len();
        let mut graph = CompressedGraph::with_capacity(node_count, self.edges.len());

        // Create offsets and neighbor arrays
        graph.offsets.push(0);
        let mut offset = 0;
        for list in &mut self.adjacency_lists {
            // Sort for binary search, drop parallel edges
            list.sort_unstable();
            list.dedup();
            offset += list.len() as u32;
            graph.offsets.push(offset);
            graph.neighbors.extend_from_slice(list);
        }

        graph.node_count = node_count;
        graph.edges = self.edges;
        graph.labels = self.labels;

        graph
    }
}
