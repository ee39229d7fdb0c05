//! The shared routing engine instance.
//!
//! A `FreightEngine` owns the immutable network topology plus every piece
//! of mutable state: the disruption overlay, the objective weights, the
//! derived effective graph, and the cached current route. All of that
//! mutable state sits behind a single `RwLock`, so a rebuild and a path
//! query can never observe each other's intermediate state. Every mutating
//! operation rebuilds the effective graph before releasing the write lock.

use std::path::Path;
use std::sync::RwLock;

use serde::Serialize;
use tracing::{debug, info};

use crate::dataset;
use crate::disruption::{DisruptionState, PainPoint};
use crate::error::Result;
use crate::graph::{weather_adjusted, EffectiveGraph, ObjectiveWeights};
use crate::network::{Network, NodeIdx, NodeKind, TransportMode};
use crate::path::dijkstra;
use crate::routing::{assemble_route, Route};
use crate::weather::WeatherSnapshot;

/// Node as exposed to consumers: static attributes merged with the current
/// operational state.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub kind: NodeKind,
    pub country: Option<String>,
    pub connections: usize,
    pub delay: f64,
    pub blocked: bool,
}

/// Edge as exposed to consumers, with weather-adjusted current metrics.
/// Node delay is a traversal-time cost and is not folded in here.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    pub mode: TransportMode,
    pub duration: f64,
    pub emissions: f64,
    pub cost: f64,
    pub weather_impact: f64,
}

/// Pain point as exposed to consumers, keyed by list index for removal.
#[derive(Debug, Clone, Serialize)]
pub struct PainPointView {
    pub index: usize,
    pub node_id: String,
    pub category: String,
    pub name: String,
    pub delay_increase: f64,
    pub blocked: bool,
}

/// Paginated slice of a snapshot listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

struct EngineState {
    disruption: DisruptionState,
    weights: ObjectiveWeights,
    effective: EffectiveGraph,
    current_route: Option<Route>,
}

/// Shared multi-modal routing engine.
pub struct FreightEngine {
    network: Network,
    state: RwLock<EngineState>,
}

impl FreightEngine {
    /// Build an engine over an already-constructed network, with a clear
    /// disruption overlay and default objective weights.
    pub fn new(network: Network) -> Self {
        let disruption = DisruptionState::new(network.node_count());
        let weights = ObjectiveWeights::default();
        let effective = EffectiveGraph::build(&network, &disruption, &weights);

        info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "freight engine initialized"
        );

        Self {
            network,
            state: RwLock::new(EngineState {
                disruption,
                weights,
                effective,
                current_route: None,
            }),
        }
    }

    /// Load a prepared dataset and build an engine from it. Failures are
    /// fatal: no engine exists until the full network has been validated.
    pub fn from_dataset(path: &Path) -> Result<Self> {
        Ok(Self::new(dataset::load_network(path)?))
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    fn resolve(&self, id: &str) -> Result<NodeIdx> {
        self.network.resolve(id)
    }

    /// Apply a mutation and rebuild the effective graph under one write
    /// lock acquisition, so no query can see the overlay and the graph out
    /// of sync.
    fn mutate<T>(&self, apply: impl FnOnce(&mut EngineState) -> Result<T>) -> Result<T> {
        let mut state = self.state.write().expect("engine lock poisoned");
        let value = apply(&mut state)?;
        state.effective = EffectiveGraph::build(&self.network, &state.disruption, &state.weights);
        debug!(
            traversable_edges = state.effective.edge_count(),
            "effective graph rebuilt"
        );
        Ok(value)
    }

    // Disruption overlay -------------------------------------------------

    /// Upsert weather severity for the grid block containing `(lat, lon)`.
    pub fn set_severity(&self, lat: f64, lon: f64, severity: f64) -> Result<()> {
        self.mutate(|state| state.disruption.set_severity(lat, lon, severity))
    }

    /// Severity of the block containing `(lat, lon)`, 0 when unset.
    pub fn severity_at(&self, lat: f64, lon: f64) -> f64 {
        let state = self.state.read().expect("engine lock poisoned");
        state.disruption.severity_at(lat, lon)
    }

    pub fn weather_snapshot(&self) -> WeatherSnapshot {
        let state = self.state.read().expect("engine lock poisoned");
        state.disruption.weather().snapshot()
    }

    /// Set a node's base delay, clamped to the configured ceiling. Returns
    /// the stored value.
    pub fn set_node_delay(&self, node_id: &str, hours: f64) -> Result<f64> {
        let idx = self.resolve(node_id)?;
        self.mutate(|state| Ok(state.disruption.set_base_delay(idx, hours)))
    }

    /// Append a pain point to a node. Returns the index of the new entry.
    pub fn add_pain_point(
        &self,
        node_id: &str,
        category: &str,
        name: &str,
        delay_increase: f64,
        blocked: bool,
    ) -> Result<usize> {
        let idx = self.resolve(node_id)?;
        self.mutate(|state| {
            Ok(state.disruption.add_pain_point(PainPoint {
                node: idx,
                category: category.to_string(),
                name: name.to_string(),
                delay_increase,
                blocked,
            }))
        })
    }

    /// Remove a pain point by index, reversing its effects.
    pub fn remove_pain_point(&self, index: usize) -> Result<PainPointView> {
        let removed = self.mutate(|state| state.disruption.remove_pain_point(index))?;
        Ok(self.pain_point_view(index, &removed))
    }

    pub fn pain_points(&self) -> Vec<PainPointView> {
        let state = self.state.read().expect("engine lock poisoned");
        state
            .disruption
            .pain_points()
            .iter()
            .enumerate()
            .map(|(index, pp)| self.pain_point_view(index, pp))
            .collect()
    }

    fn pain_point_view(&self, index: usize, pain_point: &PainPoint) -> PainPointView {
        PainPointView {
            index,
            node_id: self.network.node(pain_point.node).id.clone(),
            category: pain_point.category.clone(),
            name: pain_point.name.clone(),
            delay_increase: pain_point.delay_increase,
            blocked: pain_point.blocked,
        }
    }

    // Objective weights --------------------------------------------------

    /// Update the objective weights, leaving omitted components at their
    /// previous value. The triple is validated before any state changes and
    /// renormalized to sum to 1. Returns the normalized weights.
    pub fn set_weights(
        &self,
        duration: Option<f64>,
        emissions: Option<f64>,
        cost: Option<f64>,
    ) -> Result<ObjectiveWeights> {
        self.mutate(|state| {
            let updated = ObjectiveWeights::new(
                duration.unwrap_or_else(|| state.weights.duration()),
                emissions.unwrap_or_else(|| state.weights.emissions()),
                cost.unwrap_or_else(|| state.weights.cost()),
            )?;
            state.weights = updated;
            Ok(updated)
        })
    }

    pub fn weights(&self) -> ObjectiveWeights {
        let state = self.state.read().expect("engine lock poisoned");
        state.weights
    }

    // Routing ------------------------------------------------------------

    /// Find the optimal route between two node ids under the current
    /// disruption state and objective weights.
    ///
    /// Unknown ids are client errors; an unreachable target or a blocked
    /// endpoint is the regular `Ok(None)` no-route outcome. A successful
    /// result is cached as the current route. Takes the write lock so the
    /// cache always matches the graph the search ran against.
    pub fn find_shortest_path(&self, source_id: &str, target_id: &str) -> Result<Option<Route>> {
        let source = self.resolve(source_id)?;
        let target = self.resolve(target_id)?;

        let mut state = self.state.write().expect("engine lock poisoned");

        if state.disruption.status(source).is_blocked()
            || state.disruption.status(target).is_blocked()
        {
            debug!(source = source_id, target = target_id, "endpoint blocked");
            return Ok(None);
        }

        let Some(steps) = dijkstra(&state.effective, source, target) else {
            debug!(source = source_id, target = target_id, "no route found");
            return Ok(None);
        };

        let route = assemble_route(&self.network, &state.effective, &steps);
        info!(
            source = source_id,
            target = target_id,
            hops = route.legs.len(),
            duration = route.metrics.duration,
            "route computed"
        );
        state.current_route = Some(route.clone());
        Ok(Some(route))
    }

    /// Last successfully computed route, if any.
    pub fn current_route(&self) -> Option<Route> {
        let state = self.state.read().expect("engine lock poisoned");
        state.current_route.clone()
    }

    // Snapshot queries ---------------------------------------------------

    /// Nodes with their current operational state, optionally filtered by
    /// kind and paginated. `total` counts the filtered set before paging.
    pub fn nodes(
        &self,
        kind: Option<NodeKind>,
        offset: usize,
        limit: Option<usize>,
    ) -> Page<NodeView> {
        let state = self.state.read().expect("engine lock poisoned");
        let filtered: Vec<NodeView> = self
            .network
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| kind.is_none_or(|k| node.kind == k))
            .map(|(idx, node)| {
                let status = state.disruption.status(idx);
                NodeView {
                    id: node.id.clone(),
                    lat: node.lat,
                    lon: node.lon,
                    name: node.name.clone(),
                    kind: node.kind,
                    country: node.country.clone(),
                    connections: node.connection_count,
                    delay: status.current_delay(),
                    blocked: status.is_blocked(),
                }
            })
            .collect();

        paginate(filtered, offset, limit)
    }

    /// Edges with weather-adjusted current metrics, paginated. Blocked
    /// endpoints do not hide an edge from this listing; exclusion only
    /// applies to the traversable effective graph.
    pub fn edges(&self, offset: usize, limit: Option<usize>) -> Page<EdgeView> {
        let state = self.state.read().expect("engine lock poisoned");
        let views: Vec<EdgeView> = self
            .network
            .edges()
            .iter()
            .map(|edge| {
                let (mid_lat, mid_lon) = self.network.edge_midpoint(edge);
                let impact = state.disruption.severity_at(mid_lat, mid_lon);
                let (duration, emissions, cost) = weather_adjusted(edge, impact);
                EdgeView {
                    source: self.network.node(edge.source).id.clone(),
                    target: self.network.node(edge.target).id.clone(),
                    mode: edge.mode,
                    duration,
                    emissions,
                    cost,
                    weather_impact: impact,
                }
            })
            .collect();

        paginate(views, offset, limit)
    }

    /// Current delay and blocked state of one node.
    pub fn node_status(&self, node_id: &str) -> Result<(f64, bool)> {
        let idx = self.resolve(node_id)?;
        let state = self.state.read().expect("engine lock poisoned");
        let status = state.disruption.status(idx);
        Ok((status.current_delay(), status.is_blocked()))
    }
}

fn paginate<T>(items: Vec<T>, offset: usize, limit: Option<usize>) -> Page<T> {
    let total = items.len();
    let items: Vec<T> = match limit {
        Some(limit) => items.into_iter().skip(offset).take(limit).collect(),
        None => items.into_iter().skip(offset).collect(),
    };
    Page { items, total }
}
