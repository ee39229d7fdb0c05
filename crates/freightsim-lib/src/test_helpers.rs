//! Test-only helpers for building in-memory fixture networks.

use crate::network::{EdgeRecord, Network, NodeKind, NodeRecord, TransportMode};

/// Builder for small fixture networks used across unit, integration, and
/// bench code.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

impl NetworkBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a seaport node at the given coordinates.
    pub fn seaport(self, id: &str, lat: f64, lon: f64) -> Self {
        self.node(id, lat, lon, NodeKind::Seaport)
    }

    /// Add an airport node at the given coordinates.
    pub fn airport(self, id: &str, lat: f64, lon: f64) -> Self {
        self.node(id, lat, lon, NodeKind::Airport)
    }

    pub fn node(mut self, id: &str, lat: f64, lon: f64, kind: NodeKind) -> Self {
        self.nodes.push(NodeRecord {
            id: id.to_string(),
            lat,
            lon,
            name: format!("Node {id}"),
            kind,
            country: None,
        });
        self
    }

    /// Add a directed ship edge with unit attributes.
    pub fn leg(self, source: &str, target: &str) -> Self {
        self.edge(source, target, TransportMode::Ship, 1.0, 1.0, 1.0)
    }

    pub fn edge(
        mut self,
        source: &str,
        target: &str,
        mode: TransportMode,
        duration: f64,
        emissions: f64,
        cost: f64,
    ) -> Self {
        self.edges.push(EdgeRecord {
            source: source.to_string(),
            target: target.to_string(),
            mode,
            duration,
            emissions,
            cost,
        });
        self
    }

    pub fn build(self) -> Network {
        Network::from_records(self.nodes, self.edges).expect("fixture network builds")
    }
}
