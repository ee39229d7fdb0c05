//! Static network topology: the node registry and the directed edge set.
//!
//! The `Network` is immutable after construction. All mutable disruption
//! state (delays, blocks, weather) lives in [`crate::disruption`] and is
//! merged with this topology by the effective-graph builder.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo;

/// Index of a node within the registry. Registry order is stable for the
/// process lifetime and doubles as the deterministic tie-break order for
/// equal-weight routes.
pub type NodeIdx = usize;

/// Index of an edge within the edge set.
pub type EdgeIdx = usize;

/// Category of a network location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Airport,
    Seaport,
}

/// Transport mode of a network leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Flight,
    Ship,
}

/// A location in the transport network.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub kind: NodeKind,
    pub country: Option<String>,
    /// Number of adjacent edges, recomputed whenever the edge set is built.
    pub connection_count: usize,
}

/// A directed transport leg between two registered nodes.
///
/// Base attributes are immutable; weather-adjusted values are derived per
/// rebuild by the effective-graph builder.
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub source: NodeIdx,
    pub target: NodeIdx,
    pub mode: TransportMode,
    /// Base duration in hours, strictly positive.
    pub base_duration: f64,
    /// Base emissions in tonnes of CO2, strictly positive.
    pub base_emissions: f64,
    /// Base cost in currency units, strictly positive.
    pub base_cost: f64,
}

/// Raw node record as produced by the external ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub country: Option<String>,
}

/// Raw edge record as produced by the external ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub mode: TransportMode,
    pub duration: f64,
    pub emissions: f64,
    pub cost: f64,
}

/// Immutable network topology with an id lookup and per-node adjacency.
#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<Node>,
    index: HashMap<String, NodeIdx>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<EdgeIdx>>,
}

impl Network {
    /// Assemble a network from prepared node and edge records.
    ///
    /// Rejects duplicate node ids, out-of-range coordinates, edges with
    /// unknown endpoints, and non-positive edge attributes. A failed
    /// construction never yields a partially usable network.
    pub fn from_records(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Result<Self> {
        let mut index: HashMap<String, NodeIdx> = HashMap::with_capacity(nodes.len());
        let mut registry: Vec<Node> = Vec::with_capacity(nodes.len());

        for record in nodes {
            if !geo::coordinates_in_range(record.lat, record.lon) {
                return Err(invalid(format!(
                    "node {} has out-of-range coordinates ({}, {})",
                    record.id, record.lat, record.lon
                )));
            }
            if index.insert(record.id.clone(), registry.len()).is_some() {
                return Err(invalid(format!("duplicate node id: {}", record.id)));
            }
            registry.push(Node {
                id: record.id,
                lat: record.lat,
                lon: record.lon,
                name: record.name,
                kind: record.kind,
                country: record.country,
                connection_count: 0,
            });
        }

        let mut edge_set: Vec<Edge> = Vec::with_capacity(edges.len());
        let mut outgoing: Vec<Vec<EdgeIdx>> = vec![Vec::new(); registry.len()];

        for record in edges {
            let source = *index.get(&record.source).ok_or_else(|| {
                invalid(format!("edge references unknown source: {}", record.source))
            })?;
            let target = *index.get(&record.target).ok_or_else(|| {
                invalid(format!("edge references unknown target: {}", record.target))
            })?;
            if !(record.duration > 0.0 && record.emissions > 0.0 && record.cost > 0.0) {
                return Err(invalid(format!(
                    "edge {} -> {} has non-positive attributes",
                    record.source, record.target
                )));
            }

            outgoing[source].push(edge_set.len());
            edge_set.push(Edge {
                source,
                target,
                mode: record.mode,
                base_duration: record.duration,
                base_emissions: record.emissions,
                base_cost: record.cost,
            });
        }

        // Denormalized adjacency count, mirroring what upstream data carries.
        for edge in &edge_set {
            registry[edge.source].connection_count += 1;
            registry[edge.target].connection_count += 1;
        }

        Ok(Self {
            nodes: registry,
            index,
            edges: edge_set,
            outgoing,
        })
    }

    /// Resolve a node id to its registry index.
    pub fn node_idx(&self, id: &str) -> Option<NodeIdx> {
        self.index.get(id).copied()
    }

    /// Resolve a node id, surfacing `UnknownNode` for absent ids.
    pub fn resolve(&self, id: &str) -> Result<NodeIdx> {
        self.node_idx(id).ok_or_else(|| Error::UnknownNode {
            id: id.to_string(),
        })
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge(&self, idx: EdgeIdx) -> &Edge {
        &self.edges[idx]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing edge indices for a node.
    pub fn outgoing(&self, idx: NodeIdx) -> &[EdgeIdx] {
        &self.outgoing[idx]
    }

    /// Midpoint of an edge in decimal degrees, used for weather sampling.
    pub fn edge_midpoint(&self, edge: &Edge) -> (f64, f64) {
        let source = self.node(edge.source);
        let target = self.node(edge.target);
        geo::midpoint(source.lat, source.lon, target.lat, target.lon)
    }
}

fn invalid(message: String) -> Error {
    Error::DatasetParse {
        path: Default::default(),
        message,
    }
}
