//! Node-link JSON graph input

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::error::GraphError;
use crate::graph::{CompressedGraph, GraphBuilder};

#[derive(Debug, Deserialize)]
struct NodeLinkDocument {
    nodes: Vec<NodeEntry>,

    #[serde(default)]
    links: Vec<LinkEntry>,
}

#[derive(Debug, Deserialize)]
struct NodeEntry {
    id: Value,
}

#[derive(Debug, Deserialize)]
struct LinkEntry {
    source: Value,
    target: Value,
}

/// Largest magnitude at which every integer is exact in an `f64`
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Stable lookup key for a JSON node id, so that `1` and `"1"` stay distinct
///
/// Integral floats share the key of the matching integer (`1.0` finds `1`).
fn id_key(id: &Value) -> String {
    match id {
        Value::Number(number) if number.is_f64() => match number.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INT => (f as i64).to_string(),
            _ => id.to_string(),
        },
        _ => id.to_string(),
    }
}

/// Display label for a node id: strings as-is, anything else as JSON text
fn id_label(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Load a node-link JSON file into a graph
pub fn load_node_link(path: &Path) -> Result<CompressedGraph> {
    log::info!("Reading {}", path.display());

    if !path.exists() {
        return Err(anyhow::anyhow!("File not found: {}", path.display()));
    }

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_node_link(BufReader::new(file))
        .with_context(|| format!("failed to load graph from {}", path.display()))
}

/// Parse a node-link JSON document
///
/// Node order assigns dense ids; links are resolved against node ids.
pub fn parse_node_link(reader: impl Read) -> Result<CompressedGraph> {
    let document: NodeLinkDocument =
        serde_json::from_reader(reader).context("invalid node-link JSON")?;

    Ok(build_graph(&document)?)
}

fn build_graph(document: &NodeLinkDocument) -> Result<CompressedGraph, GraphError> {
    let mut builder = GraphBuilder::with_capacity(document.nodes.len());
    let mut id_to_index: HashMap<String, u32> = HashMap::with_capacity(document.nodes.len());

    for node in &document.nodes {
        let key = id_key(&node.id);
        if id_to_index.contains_key(&key) {
            return Err(GraphError::DuplicateNodeId { id: key });
        }
        let idx = builder.add_node(id_label(&node.id));
        id_to_index.insert(key, idx);
    }

    let resolve = |position: usize, id: &Value| {
        let key = id_key(id);
        id_to_index
            .get(&key)
            .copied()
            .ok_or(GraphError::UnknownEndpoint { position, id: key })
    };

    for (position, link) in document.links.iter().enumerate() {
        let source = resolve(position, &link.source)?;
        let target = resolve(position, &link.target)?;
        builder.add_edge(source, target)?;
    }

    Ok(builder.build())
}
