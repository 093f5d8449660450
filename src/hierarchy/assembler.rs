//! Assembly of the flat cluster tree

use crate::cluster::{ClusterRecord, PartitionSequence};
use crate::error::HierarchyError;
use crate::hierarchy::allocator::IndexAllocator;
use crate::hierarchy::ancestors::AncestorChains;

/// Options controlling tree assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Reject partition sequences whose levels do not nest
    pub check_nesting: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self { check_nesting: true }
    }
}

/// Flat hierarchy of leaves, per-level clusters and a single root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTree {
    records: Vec<ClusterRecord>,
    allocator: IndexAllocator,
    ancestors: AncestorChains,
}

impl ClusterTree {
    /// Build the tree for a partition sequence
    ///
    /// Runs leaf emission, internal emission, parent linking and root
    /// synthesis in that order. With no levels every leaf hangs directly off
    /// the root.
    pub fn assemble(
        partitions: &PartitionSequence,
        options: AssemblyOptions,
    ) -> Result<Self, HierarchyError> {
        if options.check_nesting {
            partitions.validate_nesting()?;
        }

        let allocator = IndexAllocator::new(partitions);
        let ancestors = AncestorChains::build(&allocator, partitions)?;
        let root_idx = allocator.root_idx();
        let num_levels = allocator.num_levels();

        let mut records = Vec::with_capacity(allocator.total_len());

        // Leaves
        for node in 0..allocator.node_count() {
            let parent = ancestors.of(node).first().copied().unwrap_or(root_idx);
            records.push(ClusterRecord::leaf(node, parent));
        }

        // Internal clusters, parents linked below
        for (level, index) in allocator.levels().iter().enumerate() {
            for idx in index.global_range() {
                debug_assert_eq!(idx, records.len());
                records.push(ClusterRecord::internal(idx, level + 1));
            }
        }

        // One link per cluster: the first node seen in a cluster decides its
        // parent. Nesting guarantees every other member agrees.
        for level in 0..num_levels.saturating_sub(1) {
            for node in 0..allocator.node_count() {
                let chain = ancestors.of(node);
                let record = &mut records[chain[level]];
                if record.parent_idx.is_none() {
                    record.parent_idx = Some(chain[level + 1]);
                }
            }
        }

        // Root
        debug_assert_eq!(root_idx, records.len());
        records.push(ClusterRecord::internal(root_idx, num_levels + 1));
        if let Some(coarsest) = allocator.levels().last() {
            for idx in coarsest.global_range() {
                records[idx].parent_idx = Some(root_idx);
            }
        }

        log::debug!(
            "Assembled cluster tree with {} records over {} levels",
            records.len(),
            num_levels
        );

        Ok(Self {
            records,
            allocator,
            ancestors,
        })
    }

    pub fn records(&self) -> &[ClusterRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ClusterRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.allocator.node_count()
    }

    pub fn num_levels(&self) -> usize {
        self.allocator.num_levels()
    }

    pub fn root_idx(&self) -> usize {
        self.allocator.root_idx()
    }

    /// Number of distinct clusters per level, finest first
    pub fn cluster_counts(&self) -> Vec<usize> {
        self.allocator.levels().iter().map(|level| level.cluster_count()).collect()
    }

    pub fn allocator(&self) -> &IndexAllocator {
        &self.allocator
    }

    pub fn ancestors(&self) -> &AncestorChains {
        &self.ancestors
    }

    /// Follow parent links from `idx` up to the root
    ///
    /// The returned path excludes `idx` itself and ends with the root.
    pub fn path_to_root(&self, idx: usize) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.num_levels() + 1);
        let mut current = self.records.get(idx).and_then(|record| record.parent_idx);

        // A well-formed tree reaches the root in at most num_levels + 1 hops
        while let Some(parent) = current {
            if path.len() > self.num_levels() {
                break;
            }
            path.push(parent);
            current = self.records.get(parent).and_then(|record| record.parent_idx);
        }

        path
    }
}
