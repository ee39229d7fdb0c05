//! Mutable disruption overlay: weather severity, per-node delays, and named
//! pain-point events.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::network::NodeIdx;
use crate::weather::WeatherGrid;

/// Ceiling applied to a node's directly-set base delay and to its combined
/// current delay, in hours.
pub const MAX_NODE_DELAY_HOURS: f64 = 24.0;

/// A named disruption event attached to a node.
#[derive(Debug, Clone, Serialize)]
pub struct PainPoint {
    pub node: NodeIdx,
    /// Free-form event label, e.g. `strike` or `congestion`.
    pub category: String,
    pub name: String,
    /// Additional delay contributed to the node, in hours.
    pub delay_increase: f64,
    /// Whether this event blocks the node entirely.
    pub blocked: bool,
}

/// Mutable operational state of a single node.
///
/// The directly-set base delay and the pain-point-contributed delay are
/// tracked separately so removing an event never disturbs an operator-set
/// delay, and vice versa.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeStatus {
    base_delay: f64,
    event_delay: f64,
    blocked: bool,
}

impl NodeStatus {
    /// Combined current delay in hours, clamped to `[0, MAX_NODE_DELAY_HOURS]`.
    pub fn current_delay(&self) -> f64 {
        (self.base_delay + self.event_delay).clamp(0.0, MAX_NODE_DELAY_HOURS)
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }
}

/// Disruption overlay covering every registered node.
#[derive(Debug, Clone)]
pub struct DisruptionState {
    weather: WeatherGrid,
    pain_points: Vec<PainPoint>,
    statuses: Vec<NodeStatus>,
}

impl DisruptionState {
    /// Fresh overlay for a registry of `node_count` nodes: clear weather, no
    /// pain points, no delays.
    pub fn new(node_count: usize) -> Self {
        Self {
            weather: WeatherGrid::new(),
            pain_points: Vec::new(),
            statuses: vec![NodeStatus::default(); node_count],
        }
    }

    pub fn weather(&self) -> &WeatherGrid {
        &self.weather
    }

    pub fn set_severity(&mut self, lat: f64, lon: f64, severity: f64) -> Result<()> {
        self.weather.set_severity(lat, lon, severity)
    }

    pub fn severity_at(&self, lat: f64, lon: f64) -> f64 {
        self.weather.severity_at(lat, lon)
    }

    pub fn status(&self, node: NodeIdx) -> &NodeStatus {
        &self.statuses[node]
    }

    /// Set the operator-controlled base delay for a node, clamped to
    /// `[0, MAX_NODE_DELAY_HOURS]`. Returns the stored value.
    pub fn set_base_delay(&mut self, node: NodeIdx, hours: f64) -> f64 {
        let clamped = hours.clamp(0.0, MAX_NODE_DELAY_HOURS);
        self.statuses[node].base_delay = clamped;
        clamped
    }

    /// Append a pain point and apply its effects to the referenced node.
    /// Returns the index of the new entry.
    pub fn add_pain_point(&mut self, pain_point: PainPoint) -> usize {
        let status = &mut self.statuses[pain_point.node];
        status.event_delay = (status.event_delay + pain_point.delay_increase).max(0.0);
        status.blocked = status.blocked || pain_point.blocked;
        self.pain_points.push(pain_point);
        self.pain_points.len() - 1
    }

    /// Remove a pain point by index, reversing its delay contribution and
    /// recomputing the node's blocked flag as the OR over the remaining
    /// events on that node.
    pub fn remove_pain_point(&mut self, index: usize) -> Result<PainPoint> {
        if index >= self.pain_points.len() {
            return Err(Error::PainPointOutOfRange {
                index,
                len: self.pain_points.len(),
            });
        }

        let removed = self.pain_points.remove(index);
        let status = &mut self.statuses[removed.node];
        status.event_delay = (status.event_delay - removed.delay_increase).max(0.0);
        status.blocked = self
            .pain_points
            .iter()
            .any(|pp| pp.node == removed.node && pp.blocked);
        Ok(removed)
    }

    pub fn pain_points(&self) -> &[PainPoint] {
        &self.pain_points
    }
}
