//! Loader for prepared network datasets.
//!
//! Ingestion of raw route and port data (flat files, GeoJSON, proximity
//! matching) happens upstream; this module only consumes the already-built
//! node and edge lists the ingestion pipeline emits as a single JSON
//! document.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::network::{EdgeRecord, Network, NodeRecord};

/// Prepared dataset document: `{ "nodes": [...], "edges": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDataset {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// Load and validate a prepared network dataset.
///
/// Any failure here is fatal to initialization: the caller must not serve
/// queries against a partially constructed network.
pub fn load_network(path: &Path) -> Result<Network> {
    if !path.exists() {
        return Err(Error::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let raw = fs::read_to_string(path)?;
    let dataset: NetworkDataset =
        serde_json::from_str(&raw).map_err(|err| Error::DatasetParse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    let network =
        Network::from_records(dataset.nodes, dataset.edges).map_err(|err| match err {
            Error::DatasetParse { message, .. } => Error::DatasetParse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;

    info!(
        nodes = network.node_count(),
        edges = network.edge_count(),
        path = %path.display(),
        "loaded network dataset"
    );

    Ok(network)
}
