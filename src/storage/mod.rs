//! Results persistence module

use anyhow::{Context, Result};
use crate::cluster::ClusterRecord;
use crate::graph::CompressedGraph;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to the input's file stem to name the output
pub const OUTPUT_SUFFIX: &str = ".igv.json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeEntry {
    idx: u32,
    label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkEntry {
    source_idx: u32,
    target_idx: u32,
}

/// Serialized form of a clustered graph
#[derive(Debug, Serialize)]
struct ClusteredGraph<'a> {
    nodes: Vec<NodeEntry>,
    links: Vec<LinkEntry>,
    clusters: &'a [ClusterRecord],
}

impl<'a> ClusteredGraph<'a> {
    fn new(graph: &'a CompressedGraph, clusters: &'a [ClusterRecord]) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| NodeEntry {
                idx: node.id,
                label: node.label,
            })
            .collect();

        let links = graph
            .edges
            .iter()
            .map(|edge| LinkEntry {
                source_idx: edge.a,
                target_idx: edge.b,
            })
            .collect();

        Self { nodes, links, clusters }
    }
}

/// Output file for an input path: `<output_dir>/<input stem>.igv.json`
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    output_dir.join(format!("{}{}", stem, OUTPUT_SUFFIX))
}

/// Write the clustered graph envelope to any writer
pub fn write_graph(
    writer: impl Write,
    graph: &CompressedGraph,
    clusters: &[ClusterRecord],
) -> Result<()> {
    serde_json::to_writer(writer, &ClusteredGraph::new(graph, clusters))?;
    Ok(())
}

/// Save the graph and its cluster tree to `path`
pub fn save_graph(path: &Path, graph: &CompressedGraph, clusters: &[ClusterRecord]) -> Result<()> {
    log::info!("Saving {}", path.display());

    // Ensure output directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_graph(&mut writer, graph, clusters)?;
    writer.flush()?;

    let internal = clusters.iter().filter(|record| !record.is_leaf()).count();
    log::info!(
        "Saved {} nodes, {} links and {} cluster records ({} internal)",
        graph.node_count,
        graph.edges.len(),
        clusters.len(),
        internal
    );

    Ok(())
}
