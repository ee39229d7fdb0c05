//! Route assembly: turns a node-index path into a serializable route with
//! per-leg metrics and aggregated totals.

use serde::Serialize;

use crate::graph::EffectiveGraph;
use crate::network::{Network, NodeIdx, TransportMode};

/// One traversed leg of a planned route, with disruption-adjusted metrics.
/// `duration` includes the departure node's current delay.
#[derive(Debug, Clone, Serialize)]
pub struct RouteLeg {
    pub source: String,
    pub target: String,
    pub mode: TransportMode,
    pub duration: f64,
    pub emissions: f64,
    pub cost: f64,
    pub weather_impact: f64,
}

/// Aggregated totals over a route.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteMetrics {
    pub duration: f64,
    pub emissions: f64,
    pub cost: f64,
    pub total_nodes: usize,
}

/// A planned route: the node-id sequence, the traversed legs, and the
/// aggregated totals.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub path: Vec<String>,
    pub legs: Vec<RouteLeg>,
    pub metrics: RouteMetrics,
}

/// Assemble a route from a node-index path over the effective graph.
///
/// When parallel edges of different modes connect the same pair, the leg
/// reports the one the search would have taken: the lowest scalar weight.
pub fn assemble_route(network: &Network, graph: &EffectiveGraph, steps: &[NodeIdx]) -> Route {
    let path: Vec<String> = steps
        .iter()
        .map(|&idx| network.node(idx).id.clone())
        .collect();

    let mut legs = Vec::with_capacity(steps.len().saturating_sub(1));
    let mut metrics = RouteMetrics {
        total_nodes: steps.len(),
        ..RouteMetrics::default()
    };

    for pair in steps.windows(2) {
        let (u, v) = (pair[0], pair[1]);
        let Some(edge) = graph
            .neighbours(u)
            .iter()
            .filter(|e| e.target == v)
            .min_by(|a, b| a.weight.total_cmp(&b.weight))
        else {
            continue;
        };

        metrics.duration += edge.duration;
        metrics.emissions += edge.emissions;
        metrics.cost += edge.cost;

        legs.push(RouteLeg {
            source: network.node(u).id.clone(),
            target: network.node(v).id.clone(),
            mode: edge.mode,
            duration: edge.duration,
            emissions: edge.emissions,
            cost: edge.cost,
            weather_impact: edge.weather_impact,
        });
    }

    Route {
        path,
        legs,
        metrics,
    }
}
