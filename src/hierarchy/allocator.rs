//! Global index allocation for per-level clusters

use itertools::Itertools;

use crate::cluster::{Partition, PartitionSequence};
use crate::error::HierarchyError;

/// Rank table for the clusters of one partition level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelIndex {
    /// Global index of the first cluster at this level
    offset: usize,

    /// Distinct local ids, sorted; the position of an id is its rank
    cluster_ids: Vec<u32>,
}

impl LevelIndex {
    fn from_partition(offset: usize, partition: &Partition) -> Self {
        let cluster_ids = partition
            .assignments()
            .iter()
            .copied()
            .sorted_unstable()
            .dedup()
            .collect();

        Self { offset, cluster_ids }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn cluster_count(&self) -> usize {
        self.cluster_ids.len()
    }

    /// Distinct local ids in rank order
    pub fn cluster_ids(&self) -> &[u32] {
        &self.cluster_ids
    }

    /// Global indices covered by this level
    pub fn global_range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.cluster_ids.len()
    }

    /// Rank of a local id, if it occurs at this level
    pub fn rank(&self, local_id: u32) -> Option<usize> {
        self.cluster_ids.binary_search(&local_id).ok()
    }
}

/// Maps `(level, local cluster id)` pairs into the global index space
///
/// Leaves take `0..node_count`; each level's clusters follow in level order
/// and the root takes the last slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexAllocator {
    node_count: usize,
    levels: Vec<LevelIndex>,
}

impl IndexAllocator {
    pub fn new(partitions: &PartitionSequence) -> Self {
        let mut offset = partitions.node_count();
        let levels = partitions
            .levels()
            .iter()
            .map(|partition| {
                let level = LevelIndex::from_partition(offset, partition);
                offset += level.cluster_count();
                level
            })
            .collect();

        Self {
            node_count: partitions.node_count(),
            levels,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, level: usize) -> Result<&LevelIndex, HierarchyError> {
        self.levels.get(level).ok_or(HierarchyError::UnknownLevel {
            level,
            num_levels: self.levels.len(),
        })
    }

    pub fn levels(&self) -> &[LevelIndex] {
        &self.levels
    }

    /// Global index of the first cluster at `level`
    pub fn offset(&self, level: usize) -> Result<usize, HierarchyError> {
        self.level(level).map(LevelIndex::offset)
    }

    pub fn cluster_count(&self, level: usize) -> Result<usize, HierarchyError> {
        self.level(level).map(LevelIndex::cluster_count)
    }

    /// Global index of a local cluster id at `level`
    pub fn global_index(&self, level: usize, local_id: u32) -> Result<usize, HierarchyError> {
        let index = self.level(level)?;
        index
            .rank(local_id)
            .map(|rank| index.offset + rank)
            .ok_or(HierarchyError::UnknownCluster { level, local_id })
    }

    /// Slot of the synthetic root, directly after the coarsest level
    pub fn root_idx(&self) -> usize {
        self.levels
            .last()
            .map_or(self.node_count, |level| level.global_range().end)
    }

    /// Size of the whole index space, root included
    pub fn total_len(&self) -> usize {
        self.root_idx() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(node_count: usize, levels: &[&[u32]]) -> PartitionSequence {
        let levels = levels.iter().map(|ids| Partition::new(ids.to_vec())).collect();
        PartitionSequence::new(node_count, levels).unwrap()
    }

    #[test]
    fn offsets_accumulate_cluster_counts() {
        let allocator = IndexAllocator::new(&sequence(
            5,
            &[&[0, 0, 1, 2, 2], &[0, 0, 0, 1, 1], &[3, 3, 3, 3, 3]],
        ));

        assert_eq!(allocator.offset(0), Ok(5));
        assert_eq!(allocator.offset(1), Ok(8));
        assert_eq!(allocator.offset(2), Ok(10));
        assert_eq!(allocator.root_idx(), 11);
        assert_eq!(allocator.total_len(), 12);
    }

    #[test]
    fn sparse_ids_are_ranked() {
        let allocator = IndexAllocator::new(&sequence(4, &[&[40, 7, 40, 19]]));

        assert_eq!(allocator.level(0).unwrap().cluster_ids(), &[7, 19, 40]);
        assert_eq!(allocator.global_index(0, 7), Ok(4));
        assert_eq!(allocator.global_index(0, 19), Ok(5));
        assert_eq!(allocator.global_index(0, 40), Ok(6));
        assert_eq!(allocator.level(0).unwrap().rank(19), Some(1));
        assert_eq!(allocator.level(0).unwrap().rank(20), None);
    }

    #[test]
    fn dense_ids_map_to_offset_plus_id() {
        let allocator = IndexAllocator::new(&sequence(4, &[&[1, 0, 1, 2]]));
        for id in 0..3 {
            assert_eq!(allocator.global_index(0, id), Ok(4 + id as usize));
        }
    }

    #[test]
    fn unknown_ids_fail() {
        let allocator = IndexAllocator::new(&sequence(2, &[&[0, 1]]));

        assert_eq!(
            allocator.global_index(0, 9),
            Err(HierarchyError::UnknownCluster { level: 0, local_id: 9 })
        );
        assert_eq!(
            allocator.global_index(1, 0),
            Err(HierarchyError::UnknownLevel { level: 1, num_levels: 1 })
        );
    }

    #[test]
    fn no_levels_puts_root_after_leaves() {
        let allocator = IndexAllocator::new(&PartitionSequence::empty(3));
        assert_eq!(allocator.num_levels(), 0);
        assert_eq!(allocator.root_idx(), 3);
        assert_eq!(allocator.total_len(), 4);
    }
}
