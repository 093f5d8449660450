//! Memory-efficient undirected graph representation

use std::mem;
use serde::{Serialize, Deserialize};

/// A graph node with its dense index and display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: u32,
    pub label: String,
}

/// An undirected edge between two node indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
}

/// Compressed sparse representation of an undirected graph
///
/// Every edge is stored in both endpoint adjacency lists. The original edge
/// list is kept alongside, duplicates included, so the graph can be written
/// back out exactly as it was read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: index where each node's neighbors begin
    /// offsets[i] to offsets[i+1] defines the neighbor range for node i
    pub offsets: Vec<u32>,

    /// Neighbor array: concatenated, sorted, deduplicated neighbor lists
    pub neighbors: Vec<u32>,

    /// Edges in input order
    pub edges: Vec<Edge>,

    /// Node labels indexed by node id
    pub labels: Vec<String>,
}

impl CompressedGraph {
    /// Create an empty graph with pre-allocated capacity
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            node_count: 0,
            offsets: Vec::with_capacity(node_count + 1),
            neighbors: Vec::with_capacity(edge_count * 2),
            edges: Vec::with_capacity(edge_count),
            labels: Vec::with_capacity(node_count),
        }
    }

    /// Get the neighbors of a node
    pub fn neighbors(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.neighbors[start..end]
    }

    /// Check if there's an edge between two nodes
    pub fn has_edge(&self, a: usize, b: u32) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Number of distinct neighbors, with a self-loop counted twice
    pub fn degree(&self, node: usize) -> usize {
        let neighbors = self.neighbors(node);
        let self_loop = neighbors.binary_search(&(node as u32)).is_ok();
        neighbors.len() + usize::from(self_loop)
    }

    /// Number of distinct undirected edges, self-loops included
    pub fn distinct_edge_count(&self) -> usize {
        (0..self.node_count)
            .map(|node| {
                self.neighbors(node)
                    .iter()
                    .filter(|&&other| other as usize >= node)
                    .count()
            })
            .sum()
    }

    /// Iterate nodes with their labels
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.labels.iter().enumerate().map(|(id, label)| Node {
            id: id as u32,
            label: label.clone(),
        })
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let neighbors = self.neighbors.capacity() * mem::size_of::<u32>();
        let edges = self.edges.capacity() * mem::size_of::<Edge>();
        let labels = self.labels.iter().map(|s| s.capacity()).sum::<usize>();

        base + offsets + neighbors + edges + labels
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::builder::GraphBuilder;

    #[test]
    fn adjacency_is_symmetric_and_deduplicated() {
        let mut builder = GraphBuilder::with_capacity(3);
        for label in ["a", "b", "c"] {
            builder.add_node(label);
        }
        builder.add_edge(0, 1).unwrap();
        builder.add_edge(1, 0).unwrap();
        builder.add_edge(1, 2).unwrap();
        let graph = builder.build();

        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert!(graph.has_edge(2, 1));
        assert!(!graph.has_edge(0, 2));
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.distinct_edge_count(), 2);
    }

    #[test]
    fn self_loop_counts_twice_toward_degree() {
        let mut builder = GraphBuilder::with_capacity(2);
        builder.add_node("a");
        builder.add_node("b");
        builder.add_edge(0, 0).unwrap();
        builder.add_edge(0, 1).unwrap();
        let graph = builder.build();

        assert_eq!(graph.degree(0), 3);
        assert_eq!(graph.degree(1), 1);
        assert_eq!(graph.distinct_edge_count(), 2);
    }
}
