//! Dijkstra shortest-path search over the effective graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::EffectiveGraph;
use crate::network::NodeIdx;

/// Run Dijkstra's algorithm over the effective graph using the precomputed
/// scalar edge weights.
///
/// Returns the node-index sequence of the lowest-weight path, or `None`
/// when the goal is unreachable. `start == goal` short-circuits to the
/// trivial single-node path. Ties between equal-weight paths resolve
/// towards the smaller node index, so results are deterministic.
pub fn dijkstra(graph: &EffectiveGraph, start: NodeIdx, goal: NodeIdx) -> Option<Vec<NodeIdx>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut distances: Vec<f64> = vec![f64::INFINITY; graph.node_count()];
    let mut parents: Vec<Option<NodeIdx>> = vec![None; distances.len()];
    let mut queue = BinaryHeap::new();

    distances[start] = 0.0;
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        if entry.cost.0 > distances[entry.node] {
            continue; // Stale entry superseded by a cheaper path.
        }

        if entry.node == goal {
            return Some(reconstruct_path(&parents, start, goal));
        }

        for edge in graph.neighbours(entry.node) {
            debug_assert!(edge.weight >= 0.0, "edge weights must be non-negative");
            let next = edge.target;
            let next_cost = entry.cost.0 + edge.weight;
            if next_cost < distances[next] {
                distances[next] = next_cost;
                parents[next] = Some(entry.node);
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    None
}

fn reconstruct_path(parents: &[Option<NodeIdx>], start: NodeIdx, goal: NodeIdx) -> Vec<NodeIdx> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents[node];
    }
    path.reverse();
    path
}

/// Total-ordered wrapper so `f64` costs can live in a `BinaryHeap`.
#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeIdx,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeIdx, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost, with
        // the smaller node index winning ties.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
