//! Effective-graph builder: merges the static topology with the current
//! disruption overlay and objective weights into a weighted adjacency ready
//! for shortest-path queries.

use serde::Serialize;

use crate::disruption::DisruptionState;
use crate::error::{Error, Result};
use crate::network::{Edge, EdgeIdx, Network, NodeIdx, TransportMode};

/// Normalization maxima that bring the three objectives onto a comparable
/// 0..~1 scale. Edges exceeding these simply produce a term above 1.
pub const DURATION_NORM_HOURS: f64 = 100.0;
pub const EMISSIONS_NORM_TONNES: f64 = 1000.0;
pub const COST_NORM_UNITS: f64 = 5000.0;

/// Weather severity multipliers: duration and emissions scale by
/// `1 + 2 * severity`, cost by `1 + 1.5 * severity`.
const WEATHER_TIME_FACTOR: f64 = 2.0;
const WEATHER_COST_FACTOR: f64 = 1.5;

/// Normalized tradeoff coefficients between duration, emissions, and cost.
///
/// Always sums to 1; construction rejects negative, non-finite, and
/// zero-sum inputs before renormalizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectiveWeights {
    duration: f64,
    emissions: f64,
    cost: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            duration: 0.4,
            emissions: 0.3,
            cost: 0.3,
        }
    }
}

impl ObjectiveWeights {
    pub fn new(duration: f64, emissions: f64, cost: f64) -> Result<Self> {
        for value in [duration, emissions, cost] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidWeights {
                    message: format!("weights must be non-negative finite numbers, got {value}"),
                });
            }
        }
        let total = duration + emissions + cost;
        if total <= 0.0 {
            return Err(Error::InvalidWeights {
                message: "weights must not all be zero".to_string(),
            });
        }
        Ok(Self {
            duration: duration / total,
            emissions: emissions / total,
            cost: cost / total,
        })
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn emissions(&self) -> f64 {
        self.emissions
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Scalarize one edge's effective metrics into a single non-negative
    /// search weight.
    pub fn scalarize(&self, duration: f64, emissions: f64, cost: f64) -> f64 {
        self.duration * (duration / DURATION_NORM_HOURS)
            + self.emissions * (emissions / EMISSIONS_NORM_TONNES)
            + self.cost * (cost / COST_NORM_UNITS)
    }
}

/// Weather-adjusted `(duration, emissions, cost)` for one edge, before the
/// source node's delay is applied.
pub fn weather_adjusted(edge: &Edge, impact: f64) -> (f64, f64, f64) {
    let time_factor = 1.0 + impact * WEATHER_TIME_FACTOR;
    let cost_factor = 1.0 + impact * WEATHER_COST_FACTOR;
    (
        edge.base_duration * time_factor,
        edge.base_emissions * time_factor,
        edge.base_cost * cost_factor,
    )
}

/// A traversable edge in the effective graph, with disruption-adjusted
/// metrics and the precomputed scalar search weight.
#[derive(Debug, Clone)]
pub struct EffectiveEdge {
    pub edge: EdgeIdx,
    pub target: NodeIdx,
    pub mode: TransportMode,
    /// Weather-scaled duration plus the source node's current delay, hours.
    pub duration: f64,
    pub emissions: f64,
    pub cost: f64,
    pub weather_impact: f64,
    pub weight: f64,
}

/// Derived, currently-traversable graph. Fully rebuilt after every
/// disruption or weight mutation, never patched incrementally.
#[derive(Debug, Clone, Default)]
pub struct EffectiveGraph {
    adjacency: Vec<Vec<EffectiveEdge>>,
}

impl EffectiveGraph {
    /// Build the effective graph in a single pass over the edge set.
    ///
    /// Pure function of its inputs: identical snapshots always produce an
    /// identical graph, including exclusion decisions. Edges incident to a
    /// blocked node are dropped entirely rather than weighted to infinity.
    pub fn build(
        network: &Network,
        disruption: &DisruptionState,
        weights: &ObjectiveWeights,
    ) -> Self {
        let mut adjacency: Vec<Vec<EffectiveEdge>> = vec![Vec::new(); network.node_count()];

        for (idx, edge) in network.edges().iter().enumerate() {
            if disruption.status(edge.source).is_blocked()
                || disruption.status(edge.target).is_blocked()
            {
                continue;
            }

            let (mid_lat, mid_lon) = network.edge_midpoint(edge);
            let impact = disruption.severity_at(mid_lat, mid_lon);

            let (base_duration, emissions, cost) = weather_adjusted(edge, impact);
            let duration = base_duration + disruption.status(edge.source).current_delay();

            adjacency[edge.source].push(EffectiveEdge {
                edge: idx,
                target: edge.target,
                mode: edge.mode,
                duration,
                emissions,
                cost,
                weather_impact: impact,
                weight: weights.scalarize(duration, emissions, cost),
            });
        }

        Self { adjacency }
    }

    /// Traversable edges leaving a node.
    pub fn neighbours(&self, node: NodeIdx) -> &[EffectiveEdge] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of traversable edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Number of nodes the adjacency covers (the full registry, blocked or
    /// not; blocked nodes simply have no incident edges).
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let weights = ObjectiveWeights::default();
        let total = weights.duration() + weights.emissions() + weights.cost();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weights_renormalize_arbitrary_magnitudes() {
        let weights = ObjectiveWeights::new(2.0, 3.0, 5.0).unwrap();
        assert!((weights.duration() - 0.2).abs() < 1e-9);
        assert!((weights.emissions() - 0.3).abs() < 1e-9);
        assert!((weights.cost() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn weights_reject_negative_and_zero_sum() {
        assert!(ObjectiveWeights::new(-1.0, 1.0, 1.0).is_err());
        assert!(ObjectiveWeights::new(f64::NAN, 1.0, 1.0).is_err());
        assert!(ObjectiveWeights::new(0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn scalar_weight_is_non_negative() {
        let weights = ObjectiveWeights::default();
        assert!(weights.scalarize(0.0, 0.0, 0.0) >= 0.0);
        assert!(weights.scalarize(250.0, 2000.0, 9000.0) > 1.0);
    }
}
