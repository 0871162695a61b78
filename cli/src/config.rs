use std::path::Path;

use anyhow::{Context, Result};
use graph_reach_core::Graph;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Node capacity used when a description does not set one.
pub const DEFAULT_CAPACITY: usize = 8;

/// JSON description of a graph to load.
///
/// ```json
/// { "capacity": 8, "nodes": ["UME", "BMA"], "edges": [["UME", "BMA"]] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphSpec {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl GraphSpec {
    /// The built-in airport network.
    pub fn airports() -> Self {
        let pairs = [("UME", "BMA"), ("BMA", "MMX"), ("BMA", "GOT"), ("LLA", "PJA")];
        Self {
            capacity: DEFAULT_CAPACITY,
            nodes: ["UME", "BMA", "MMX", "GOT", "PJA", "LLA"]
                .into_iter()
                .map(String::from)
                .collect(),
            edges: pairs
                .into_iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid graph description")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read graph file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Build the graph. `capacity` overrides the description's own.
    ///
    /// Entries the graph rejects (duplicates, names over the limit, nodes
    /// past capacity, edges to unknown nodes) are logged and skipped.
    pub fn build(&self, capacity: Option<usize>) -> Result<Graph> {
        let capacity = capacity.unwrap_or(self.capacity);
        let mut graph = Graph::new(capacity).context("cannot create graph")?;

        for name in &self.nodes {
            if let Err(e) = graph.insert_node(name) {
                warn!(node = %name, error = %e, "skipping node");
            }
        }
        for (a, b) in &self.edges {
            match graph.connect(a, b) {
                Ok(()) => {}
                Err(e) if e.is_benign() => debug!(from = %a, to = %b, "duplicate edge ignored"),
                Err(e) => warn!(from = %a, to = %b, error = %e, "skipping edge"),
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            capacity,
            "graph built"
        );
        Ok(graph)
    }
}
