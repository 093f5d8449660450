//! Multi-level Louvain community detection
//!
//! Each pass moves nodes greedily between neighboring communities while
//! modularity improves, then collapses every community into a single node of
//! a weighted induced graph. The community assignment found at every pass is
//! one level of the returned [`Dendrogram`], finest first.
//!
//! The modularity gain for moving node `i` into community `C` is
//!
//! ```text
//! k_i,in(C) - resolution * Σ_tot(C) * k_i / 2m
//! ```
//!
//! where `k_i,in(C)` is the weight of edges from `i` into `C`, `Σ_tot(C)` is
//! the total degree of `C` and `m` the total edge weight.

use std::collections::BTreeMap;

use crate::cluster::{Partition, PartitionSequence};
use crate::error::HierarchyError;
use crate::graph::CompressedGraph;

/// Passes stop once modularity improves by less than this
pub const MIN_MODULARITY_GAIN: f64 = 1e-7;

/// Nested community assignments produced by [`generate_dendrogram`]
///
/// Level 0 maps original nodes to communities; level `k` maps the
/// communities of level `k - 1` to communities of level `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dendrogram {
    node_count: usize,
    levels: Vec<Vec<u32>>,
}

impl Dendrogram {
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Community of every original node at `level`, or `None` past the top
    pub fn partition_at_level(&self, level: usize) -> Option<Partition> {
        let (first, rest) = self.levels.split_first()?;
        if level >= self.levels.len() {
            return None;
        }

        let mut assignments = first.clone();
        for step in &rest[..level] {
            for community in &mut assignments {
                *community = step[*community as usize];
            }
        }

        Some(Partition::new(assignments))
    }

    /// All levels composed down to the original nodes
    pub fn partitions(&self) -> Result<PartitionSequence, HierarchyError> {
        let levels = (0..self.levels.len())
            .filter_map(|level| self.partition_at_level(level))
            .collect();

        PartitionSequence::new(self.node_count, levels)
    }
}

/// Weighted graph for one Louvain pass
#[derive(Debug, Clone)]
struct LevelGraph {
    /// Neighbor lists without self-loops, sorted by neighbor
    adjacency: Vec<Vec<(usize, f64)>>,

    /// Self-loop weight per node
    loops: Vec<f64>,

    /// Sum of all edge weights, self-loops counted once
    total_weight: f64,
}

impl LevelGraph {
    fn from_graph(graph: &CompressedGraph) -> Self {
        let mut adjacency = vec![Vec::new(); graph.node_count];
        let mut loops = vec![0.0; graph.node_count];

        for node in 0..graph.node_count {
            for &neighbor in graph.neighbors(node) {
                let neighbor = neighbor as usize;
                if neighbor == node {
                    loops[node] += 1.0;
                } else {
                    adjacency[node].push((neighbor, 1.0));
                }
            }
        }

        Self {
            adjacency,
            loops,
            total_weight: graph.distinct_edge_count() as f64,
        }
    }

    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn degree(&self, node: usize) -> f64 {
        let edges: f64 = self.adjacency[node].iter().map(|&(_, weight)| weight).sum();
        edges + 2.0 * self.loops[node]
    }

    /// Collapse each community into one node
    fn induced(&self, communities: &[u32], community_count: usize) -> Self {
        let mut merged: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); community_count];
        let mut loops = vec![0.0; community_count];

        for node in 0..self.node_count() {
            let from = communities[node] as usize;
            loops[from] += self.loops[node];

            for &(neighbor, weight) in &self.adjacency[node] {
                // Visit each undirected edge once
                if neighbor < node {
                    continue;
                }
                let to = communities[neighbor] as usize;
                if from == to {
                    loops[from] += weight;
                } else {
                    *merged[from].entry(to).or_insert(0.0) += weight;
                    *merged[to].entry(from).or_insert(0.0) += weight;
                }
            }
        }

        Self {
            adjacency: merged.into_iter().map(|map| map.into_iter().collect()).collect(),
            loops,
            total_weight: self.total_weight,
        }
    }
}

/// Community bookkeeping for one pass
struct Status {
    node_to_community: Vec<usize>,
    node_degrees: Vec<f64>,
    node_loops: Vec<f64>,

    /// Weight of edges inside each community
    internals: Vec<f64>,

    /// Total degree of each community
    totals: Vec<f64>,

    total_weight: f64,
}

impl Status {
    fn new(graph: &LevelGraph) -> Self {
        let node_count = graph.node_count();
        let node_degrees: Vec<f64> = (0..node_count).map(|node| graph.degree(node)).collect();

        Self {
            node_to_community: (0..node_count).collect(),
            totals: node_degrees.clone(),
            node_degrees,
            node_loops: graph.loops.clone(),
            internals: graph.loops.clone(),
            total_weight: graph.total_weight,
        }
    }

    fn remove(&mut self, node: usize, community: usize, weight_in: f64) {
        self.totals[community] -= self.node_degrees[node];
        self.internals[community] -= weight_in + self.node_loops[node];
    }

    fn insert(&mut self, node: usize, community: usize, weight_in: f64) {
        self.node_to_community[node] = community;
        self.totals[community] += self.node_degrees[node];
        self.internals[community] += weight_in + self.node_loops[node];
    }

    fn modularity(&self, resolution: f64) -> f64 {
        let links = self.total_weight;
        if links <= 0.0 {
            return 0.0;
        }

        self.internals
            .iter()
            .zip(&self.totals)
            .map(|(&internal, &total)| {
                internal / links - resolution * (total / (2.0 * links)).powi(2)
            })
            .sum()
    }
}

/// Scratch space for summing edge weights per neighboring community
struct NeighborWeights {
    weights: Vec<f64>,
    touched: Vec<usize>,
}

impl NeighborWeights {
    fn new(capacity: usize) -> Self {
        Self {
            weights: vec![0.0; capacity],
            touched: Vec::new(),
        }
    }

    /// Collect communities adjacent to `node` in first-seen order
    fn gather(&mut self, graph: &LevelGraph, status: &Status, node: usize) {
        for &community in &self.touched {
            self.weights[community] = 0.0;
        }
        self.touched.clear();

        // Edge weights are positive, so a zero entry has not been seen yet
        for &(neighbor, weight) in &graph.adjacency[node] {
            let community = status.node_to_community[neighbor];
            if self.weights[community] == 0.0 {
                self.touched.push(community);
            }
            self.weights[community] += weight;
        }
    }

    fn weight(&self, community: usize) -> f64 {
        self.weights[community]
    }
}

/// Greedily move nodes between communities until modularity stops improving
fn one_level(graph: &LevelGraph, status: &mut Status, resolution: f64) {
    let mut scratch = NeighborWeights::new(graph.node_count());
    let mut current = status.modularity(resolution);

    loop {
        let mut modified = false;

        for node in 0..graph.node_count() {
            let community = status.node_to_community[node];
            let degree_ratio = status.node_degrees[node] / (2.0 * status.total_weight);
            scratch.gather(graph, status, node);

            let weight_in_own = scratch.weight(community);
            let remove_cost = -weight_in_own
                + resolution * (status.totals[community] - status.node_degrees[node]) * degree_ratio;
            status.remove(node, community, weight_in_own);

            let mut best = community;
            let mut best_increase = 0.0;
            for &candidate in &scratch.touched {
                let increase = remove_cost + scratch.weight(candidate)
                    - resolution * status.totals[candidate] * degree_ratio;
                if increase > best_increase {
                    best_increase = increase;
                    best = candidate;
                }
            }

            status.insert(node, best, scratch.weight(best));
            if best != community {
                modified = true;
            }
        }

        let next = status.modularity(resolution);
        if !modified || next - current < MIN_MODULARITY_GAIN {
            break;
        }
        current = next;
    }
}

/// Relabel communities densely in order of first appearance
fn renumber(node_to_community: &[usize]) -> (Vec<u32>, usize) {
    let mut labels = vec![u32::MAX; node_to_community.len()];
    let mut next = 0u32;

    let renumbered = node_to_community
        .iter()
        .map(|&community| {
            if labels[community] == u32::MAX {
                labels[community] = next;
                next += 1;
            }
            labels[community]
        })
        .collect();

    (renumbered, next as usize)
}

/// Build the Louvain dendrogram of an undirected graph
///
/// A graph without edges yields a single level with every node in its own
/// community.
pub fn generate_dendrogram(graph: &CompressedGraph, resolution: f64) -> Dendrogram {
    let node_count = graph.node_count;

    if graph.distinct_edge_count() == 0 {
        log::debug!("Graph has no edges, every node is its own community");
        return Dendrogram {
            node_count,
            levels: vec![(0..node_count as u32).collect()],
        };
    }

    let mut current = LevelGraph::from_graph(graph);
    let mut levels = Vec::new();
    let mut modularity = f64::NEG_INFINITY;

    loop {
        let mut status = Status::new(&current);
        one_level(&current, &mut status, resolution);
        let next = status.modularity(resolution);

        if !levels.is_empty() && next - modularity < MIN_MODULARITY_GAIN {
            break;
        }

        let (communities, community_count) = renumber(&status.node_to_community);
        log::debug!(
            "Louvain level {}: {} communities, modularity {:.6}",
            levels.len(),
            community_count,
            next
        );

        current = current.induced(&communities, community_count);
        levels.push(communities);
        modularity = next;
    }

    Dendrogram { node_count, levels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn graph(node_count: usize, edges: &[(u32, u32)]) -> CompressedGraph {
        let mut builder = GraphBuilder::with_capacity(node_count);
        for node in 0..node_count {
            builder.add_node(node.to_string());
        }
        for &(a, b) in edges {
            builder.add_edge(a, b).unwrap();
        }
        builder.build()
    }

    fn two_triangles() -> CompressedGraph {
        graph(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)])
    }

    #[test]
    fn separates_disconnected_triangles() {
        let dendrogram = generate_dendrogram(&two_triangles(), 1.0);
        let top = dendrogram.partition_at_level(dendrogram.num_levels() - 1).unwrap();

        assert_eq!(top.cluster_of(0), top.cluster_of(1));
        assert_eq!(top.cluster_of(1), top.cluster_of(2));
        assert_eq!(top.cluster_of(3), top.cluster_of(4));
        assert_eq!(top.cluster_of(4), top.cluster_of(5));
        assert_ne!(top.cluster_of(0), top.cluster_of(3));
    }

    #[test]
    fn edgeless_graph_gives_singletons() {
        let dendrogram = generate_dendrogram(&graph(3, &[]), 1.0);

        assert_eq!(dendrogram.num_levels(), 1);
        assert_eq!(dendrogram.partition_at_level(0), Some(Partition::new(vec![0, 1, 2])));
        assert_eq!(dendrogram.partition_at_level(1), None);
    }

    #[test]
    fn empty_graph_gives_one_empty_level() {
        let dendrogram = generate_dendrogram(&graph(0, &[]), 1.0);
        let partitions = dendrogram.partitions().unwrap();

        assert_eq!(partitions.num_levels(), 1);
        assert_eq!(partitions.node_count(), 0);
    }

    #[test]
    fn composed_levels_are_nested() {
        // Two dense clusters joined by a path, plus a pendant chain
        let dendrogram = generate_dendrogram(
            &graph(
                10,
                &[
                    (0, 1), (0, 2), (1, 2), (2, 3), (3, 4), (4, 5),
                    (5, 6), (4, 6), (6, 7), (7, 8), (8, 9), (9, 7),
                ],
            ),
            1.0,
        );

        let partitions = dendrogram.partitions().unwrap();
        assert_eq!(partitions.num_levels(), dendrogram.num_levels());
        assert!(partitions.validate_nesting().is_ok());
    }

    #[test]
    fn renumbering_follows_first_appearance() {
        let (labels, count) = renumber(&[4, 4, 1, 4, 0]);
        assert_eq!(labels, vec![0, 0, 1, 0, 2]);
        assert_eq!(count, 3);
    }

    #[test]
    fn induced_graph_keeps_total_weight() {
        let level = LevelGraph::from_graph(&two_triangles());
        let induced = level.induced(&[0, 0, 0, 1, 1, 1], 2);

        assert_eq!(induced.total_weight, 6.0);
        assert_eq!(induced.loops, vec![3.0, 3.0]);
        assert!(induced.adjacency.iter().all(Vec::is_empty));
        assert_eq!(induced.degree(0), 6.0);
    }
}
