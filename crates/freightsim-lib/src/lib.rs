//! Freightsim library entry points.
//!
//! This crate models a global multi-modal freight network (airports and
//! seaports connected by flight and shipping legs) and answers best-route
//! queries under a live disruption overlay (weather severity, per-node
//! delays, full blockages) with a user-tunable multi-objective cost.
//! Higher-level consumers (CLI, HTTP service) should only depend on the
//! functions exported here instead of reimplementing behavior.

#![deny(warnings)]

pub mod dataset;
pub mod disruption;
pub mod engine;
pub mod error;
pub mod geo;
pub mod graph;
pub mod network;
pub mod path;
pub mod routing;
pub mod test_helpers;
pub mod weather;

pub use dataset::{load_network, NetworkDataset};
pub use disruption::{DisruptionState, PainPoint, MAX_NODE_DELAY_HOURS};
pub use engine::{EdgeView, FreightEngine, NodeView, Page, PainPointView};
pub use error::{Error, Result};
pub use graph::{EffectiveGraph, ObjectiveWeights};
pub use network::{Edge, Network, Node, NodeKind, TransportMode};
pub use routing::{Route, RouteLeg, RouteMetrics};
pub use weather::{WeatherGrid, WeatherSnapshot, GRID_SIZE_DEG};
