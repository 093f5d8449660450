//! Per-node ancestor chains in global index space

use rayon::prelude::*;

use crate::cluster::PartitionSequence;
use crate::error::HierarchyError;
use crate::hierarchy::allocator::IndexAllocator;

/// For every node, the global index of its cluster at each level
///
/// Chains are stored back to back, `num_levels` entries per node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorChains {
    node_count: usize,
    num_levels: usize,
    chains: Vec<usize>,
}

impl AncestorChains {
    pub fn build(
        allocator: &IndexAllocator,
        partitions: &PartitionSequence,
    ) -> Result<Self, HierarchyError> {
        let num_levels = partitions.num_levels();

        let per_node: Vec<Vec<usize>> = (0..partitions.node_count())
            .into_par_iter()
            .map(|node| {
                partitions
                    .levels()
                    .iter()
                    .enumerate()
                    .map(|(level, partition)| {
                        allocator.global_index(level, partition.cluster_of(node))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            node_count: partitions.node_count(),
            num_levels,
            chains: per_node.concat(),
        })
    }

    pub fn num_levels(&self) -> usize {
        self.num_levels
    }

    /// Number of nodes with a chain, empty chains included
    pub fn len(&self) -> usize {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Ancestors of a node, finest level first
    pub fn of(&self, node: usize) -> &[usize] {
        let start = node * self.num_levels;
        &self.chains[start..start + self.num_levels]
    }
}
