//! Partition quality metrics

use std::collections::HashMap;

use crate::cluster::Partition;
use crate::graph::CompressedGraph;

/// Modularity of a partition of the original graph
///
/// `Q = Σ_c [ in_c / m - resolution * (tot_c / 2m)^2 ]`, with duplicate edges
/// counted once and self-loops adding twice to a node's degree. A graph
/// without edges has modularity 0.
pub fn modularity(graph: &CompressedGraph, partition: &Partition, resolution: f64) -> f64 {
    let links = graph.distinct_edge_count() as f64;
    if links == 0.0 {
        return 0.0;
    }

    let mut internals: HashMap<u32, f64> = HashMap::new();
    let mut totals: HashMap<u32, f64> = HashMap::new();

    for node in 0..graph.node_count {
        let community = partition.cluster_of(node);
        *totals.entry(community).or_insert(0.0) += graph.degree(node) as f64;

        for &neighbor in graph.neighbors(node) {
            let neighbor = neighbor as usize;
            if neighbor >= node && partition.cluster_of(neighbor) == community {
                *internals.entry(community).or_insert(0.0) += 1.0;
            }
        }
    }

    totals
        .iter()
        .map(|(community, &total)| {
            let internal = internals.get(community).copied().unwrap_or(0.0);
            internal / links - resolution * (total / (2.0 * links)).powi(2)
        })
        .sum()
}

/// Number of nodes in each community of a partition
pub fn community_sizes(partition: &Partition) -> HashMap<u32, usize> {
    let mut sizes = HashMap::new();
    for &community in partition.assignments() {
        *sizes.entry(community).or_insert(0) += 1;
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::louvain::generate_dendrogram;
    use crate::graph::GraphBuilder;

    fn two_triangles_with_bridge() -> CompressedGraph {
        let mut builder = GraphBuilder::with_capacity(6);
        for node in 0..6 {
            builder.add_node(node.to_string());
        }
        for (a, b) in [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)] {
            builder.add_edge(a, b).unwrap();
        }
        builder.build()
    }

    #[test]
    fn single_community_has_zero_modularity() {
        let graph = two_triangles_with_bridge();
        let q = modularity(&graph, &Partition::new(vec![0; 6]), 1.0);
        assert!(q.abs() < 1e-12);
    }

    #[test]
    fn triangles_split_is_positive() {
        let graph = two_triangles_with_bridge();
        let q = modularity(&graph, &Partition::new(vec![0, 0, 0, 1, 1, 1]), 1.0);

        // in = 3 + 3 over m = 7, tot = 7 + 7
        let expected = 6.0 / 7.0 - 2.0 * (7.0 / 14.0_f64).powi(2);
        assert!((q - expected).abs() < 1e-12);
    }

    #[test]
    fn louvain_top_level_is_not_worse_than_singletons() {
        let graph = two_triangles_with_bridge();
        let dendrogram = generate_dendrogram(&graph, 1.0);
        let top = dendrogram.partition_at_level(dendrogram.num_levels() - 1).unwrap();
        let singletons = Partition::new((0..6).collect());

        assert!(modularity(&graph, &top, 1.0) > modularity(&graph, &singletons, 1.0));
    }

    #[test]
    fn counts_members() {
        let sizes = community_sizes(&Partition::new(vec![2, 2, 5]));
        assert_eq!(sizes.get(&2), Some(&2));
        assert_eq!(sizes.get(&5), Some(&1));
    }
}
