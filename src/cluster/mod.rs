//! Community detection and cluster records

pub mod louvain;
pub mod metrics;
pub mod partition;

use serde::{Serialize, Deserialize};

pub use partition::{Partition, PartitionSequence};

/// One entry of the flat, globally indexed cluster tree
///
/// Leaves (`height == 0`) stand for original graph nodes and carry `node_idx`.
/// Internal records stand for a community at partition level `height - 1`.
/// The single root has neither `node_idx` nor `parent_idx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    /// Position of this record in the global index space
    pub idx: usize,

    /// Graph node represented by a leaf
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_idx: Option<usize>,

    /// Enclosing cluster, absent only on the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_idx: Option<usize>,

    /// Distance from the leaves
    pub height: usize,
}

impl ClusterRecord {
    /// Leaf record for a graph node
    pub fn leaf(node: usize, parent_idx: usize) -> Self {
        Self {
            idx: node,
            node_idx: Some(node),
            parent_idx: Some(parent_idx),
            height: 0,
        }
    }

    /// Internal record whose parent is linked later
    pub fn internal(idx: usize, height: usize) -> Self {
        Self {
            idx,
            node_idx: None,
            parent_idx: None,
            height,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_are_omitted() {
        let root = ClusterRecord::internal(6, 1);
        assert_eq!(serde_json::to_value(&root).unwrap(), json!({"idx": 6, "height": 1}));

        let leaf = ClusterRecord::leaf(2, 5);
        assert_eq!(
            serde_json::to_value(&leaf).unwrap(),
            json!({"idx": 2, "nodeIdx": 2, "parentIdx": 5, "height": 0})
        );
    }

    #[test]
    fn reads_records_without_optional_fields() {
        let record: ClusterRecord = serde_json::from_value(json!({"idx": 4, "height": 2})).unwrap();
        assert_eq!(record, ClusterRecord::internal(4, 2));
        assert!(!record.is_leaf());
    }
}
