//! Per-level node to community assignments

use std::collections::HashMap;

use crate::error::HierarchyError;

/// Assignment of every node to a community id local to one level
///
/// Local ids are only unique within their level and need not be dense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    assignments: Vec<u32>,
}

impl Partition {
    pub fn new(assignments: Vec<u32>) -> Self {
        Self { assignments }
    }

    /// Community of a node
    pub fn cluster_of(&self, node: usize) -> u32 {
        self.assignments[node]
    }

    pub fn assignments(&self) -> &[u32] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl From<Vec<u32>> for Partition {
    fn from(assignments: Vec<u32>) -> Self {
        Self::new(assignments)
    }
}

/// Ordered partitions from finest (level 0) to coarsest
///
/// Every partition covers the same node set. Each level is expected to nest
/// inside the next one; [`PartitionSequence::validate_nesting`] checks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSequence {
    node_count: usize,
    levels: Vec<Partition>,
}

impl PartitionSequence {
    /// Wrap partitions, checking that each one covers exactly `node_count` nodes
    pub fn new(node_count: usize, levels: Vec<Partition>) -> Result<Self, HierarchyError> {
        for (level, partition) in levels.iter().enumerate() {
            if partition.len() != node_count {
                return Err(HierarchyError::PartitionLengthMismatch {
                    level,
                    expected: node_count,
                    got: partition.len(),
                });
            }
        }

        Ok(Self { node_count, levels })
    }

    /// Sequence with no levels at all
    pub fn empty(node_count: usize) -> Self {
        Self { node_count, levels: Vec::new() }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, level: usize) -> Option<&Partition> {
        self.levels.get(level)
    }

    pub fn levels(&self) -> &[Partition] {
        &self.levels
    }

    /// Check that nodes sharing a cluster at one level share one at the next
    pub fn validate_nesting(&self) -> Result<(), HierarchyError> {
        for (level, pair) in self.levels.windows(2).enumerate() {
            let (fine, coarse) = (&pair[0], &pair[1]);
            let mut parents: HashMap<u32, u32> = HashMap::new();

            for node in 0..self.node_count {
                let cluster = fine.cluster_of(node);
                let parent = coarse.cluster_of(node);
                let first_parent = *parents.entry(cluster).or_insert(parent);
                if first_parent != parent {
                    return Err(HierarchyError::NestingViolation {
                        level,
                        cluster,
                        first_parent,
                        second_parent: parent,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(ids: &[u32]) -> Partition {
        Partition::new(ids.to_vec())
    }

    #[test]
    fn rejects_partition_of_wrong_length() {
        let err = PartitionSequence::new(3, vec![p(&[0, 0, 1]), p(&[0, 0])]).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::PartitionLengthMismatch { level: 1, expected: 3, got: 2 }
        );
    }

    #[test]
    fn nested_levels_validate() {
        let sequence = PartitionSequence::new(
            4,
            vec![p(&[7, 7, 3, 9]), p(&[1, 1, 0, 0]), p(&[5, 5, 5, 5])],
        )
        .unwrap();

        assert_eq!(sequence.num_levels(), 3);
        assert!(sequence.validate_nesting().is_ok());
    }

    #[test]
    fn split_cluster_is_a_nesting_violation() {
        let sequence =
            PartitionSequence::new(3, vec![p(&[0, 0, 1]), p(&[4, 2, 2])]).unwrap();

        assert_eq!(
            sequence.validate_nesting(),
            Err(HierarchyError::NestingViolation {
                level: 0,
                cluster: 0,
                first_parent: 4,
                second_parent: 2,
            })
        );
    }

    #[test]
    fn empty_sequence_has_no_levels() {
        let sequence = PartitionSequence::empty(5);
        assert_eq!(sequence.num_levels(), 0);
        assert_eq!(sequence.node_count(), 5);
        assert!(sequence.level(0).is_none());
        assert!(sequence.validate_nesting().is_ok());
    }
}
