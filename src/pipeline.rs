//! End-to-end run: load, detect communities, build the tree, save

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::cluster::louvain::generate_dendrogram;
use crate::cluster::metrics;
use crate::cluster::PartitionSequence;
use crate::config::Config;
use crate::data::load_node_link;
use crate::graph::CompressedGraph;
use crate::hierarchy::{AssemblyOptions, ClusterTree};
use crate::storage;

/// Detect communities in `graph` and assemble its cluster tree
pub fn cluster_graph(graph: &CompressedGraph, config: &Config) -> Result<ClusterTree> {
    if !config.resolution.is_finite() || config.resolution <= 0.0 {
        bail!("resolution must be a positive number, got {}", config.resolution);
    }

    let dendrogram = generate_dendrogram(graph, config.resolution);
    let partitions: PartitionSequence = dendrogram.partitions()?;

    for (level, partition) in partitions.levels().iter().enumerate() {
        let largest = metrics::community_sizes(partition).into_values().max().unwrap_or(0);
        log::debug!(
            "Level {}: modularity {:.6}, largest community {} nodes",
            level,
            metrics::modularity(graph, partition, config.resolution),
            largest
        );
    }

    let options = AssemblyOptions {
        check_nesting: config.check_nesting,
    };
    let tree = ClusterTree::assemble(&partitions, options)?;

    for (level, count) in tree.cluster_counts().iter().enumerate() {
        log::info!("Clusters at level {}: {}", level, count);
    }

    Ok(tree)
}

/// Process one input file and return the path written
pub fn run(input: &Path, config: &Config) -> Result<PathBuf> {
    // 1. Load graph
    let graph = load_node_link(input)?;
    log::info!(
        "Loaded graph with {} nodes and {} edges (~{} bytes)",
        graph.node_count,
        graph.edges.len(),
        graph.memory_usage()
    );

    // 2. Build hierarchy
    let tree = cluster_graph(&graph, config)?;
    log::info!(
        "Built cluster tree with {} records and {} levels",
        tree.len(),
        tree.num_levels()
    );

    // 3. Save results
    let output = storage::output_path(input, &config.output_dir);
    storage::save_graph(&output, &graph, tree.records())?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn rejects_non_positive_resolution() {
        let graph = crate::graph::GraphBuilder::with_capacity(0).build();
        let config = Config {
            resolution: 0.0,
            ..Config::default()
        };

        assert!(cluster_graph(&graph, &config).is_err());
    }

    #[test]
    fn run_writes_output_next_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pairs.json");
        fs::write(
            &input,
            r#"{"nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}, {"id": "D"}],
                "links": [{"source": "A", "target": "B"}, {"source": "C", "target": "D"}]}"#,
        )
        .unwrap();
        let config = Config::new(1.0, dir.path().join("out"), 1, true);

        let output = run(&input, &config).unwrap();

        assert_eq!(output, dir.path().join("out").join("pairs.igv.json"));
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["nodes"].as_array().map(Vec::len), Some(4));
        assert_eq!(written["clusters"].as_array().map(Vec::len), Some(7));
    }
}
