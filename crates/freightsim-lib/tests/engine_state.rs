use freightsim_lib::disruption::DisruptionState;
use freightsim_lib::test_helpers::NetworkBuilder;
use freightsim_lib::{
    EffectiveGraph, Error, FreightEngine, Network, NodeKind, ObjectiveWeights,
    MAX_NODE_DELAY_HOURS,
};

fn mixed_network() -> Network {
    NetworkBuilder::new()
        .airport("LHR", 51.47, -0.45)
        .airport("JFK", 40.64, -73.78)
        .seaport("RTM", 51.95, 4.14)
        .seaport("SHA", 31.23, 121.49)
        .leg("LHR", "JFK")
        .leg("RTM", "SHA")
        .leg("LHR", "RTM")
        .build()
}

#[test]
fn node_listing_filters_and_paginates() {
    let engine = FreightEngine::new(mixed_network());

    let all = engine.nodes(None, 0, None);
    assert_eq!(all.total, 4);
    assert_eq!(all.items.len(), 4);

    let seaports = engine.nodes(Some(NodeKind::Seaport), 0, None);
    assert_eq!(seaports.total, 2);
    assert!(seaports.items.iter().all(|n| n.kind == NodeKind::Seaport));

    let page = engine.nodes(None, 3, Some(10));
    assert_eq!(page.total, 4);
    assert_eq!(page.items.len(), 1);

    let beyond = engine.nodes(None, 10, Some(5));
    assert_eq!(beyond.total, 4);
    assert!(beyond.items.is_empty());
}

#[test]
fn node_listing_reflects_disruption_state() {
    let engine = FreightEngine::new(mixed_network());
    engine.set_node_delay("RTM", 6.0).unwrap();
    engine
        .add_pain_point("SHA", "congestion", "Terminal backlog", 2.0, true)
        .unwrap();

    let nodes = engine.nodes(None, 0, None);
    let rtm = nodes.items.iter().find(|n| n.id == "RTM").unwrap();
    let sha = nodes.items.iter().find(|n| n.id == "SHA").unwrap();
    assert_eq!(rtm.delay, 6.0);
    assert!(!rtm.blocked);
    assert_eq!(sha.delay, 2.0);
    assert!(sha.blocked);
}

#[test]
fn edge_listing_reports_weather_adjusted_metrics() {
    let engine = FreightEngine::new(
        NetworkBuilder::new()
            .seaport("A", 0.0, 0.0)
            .seaport("B", 0.0, 2.0)
            .leg("A", "B")
            .build(),
    );

    engine.set_severity(0.0, 1.0, 1.0).unwrap();
    let edges = engine.edges(0, None);
    assert_eq!(edges.total, 1);
    let edge = &edges.items[0];
    assert_eq!(edge.duration, 3.0);
    assert_eq!(edge.emissions, 3.0);
    assert_eq!(edge.cost, 2.5);
    assert_eq!(edge.weather_impact, 1.0);
}

#[test]
fn weather_snapshot_round_trips_through_engine() {
    let engine = FreightEngine::new(mixed_network());
    engine.set_severity(7.0, -12.0, 0.9).unwrap();
    engine.set_severity(7.0, -11.0, 0.4).unwrap(); // same block, overwrites

    assert_eq!(engine.severity_at(9.9, -10.1), 0.4);
    let snapshot = engine.weather_snapshot();
    assert_eq!(snapshot.grid.len(), 1);
    assert_eq!(snapshot.grid.get("5,-15"), Some(&0.4));
}

#[test]
fn invalid_severity_leaves_engine_state_untouched() {
    let engine = FreightEngine::new(mixed_network());
    engine.set_severity(0.0, 0.0, 0.8).unwrap();

    let err = engine.set_severity(0.0, 0.0, 1.5).expect_err("rejected");
    assert!(matches!(err, Error::InvalidSeverity { .. }));
    assert_eq!(engine.severity_at(0.0, 0.0), 0.8);
}

#[test]
fn weights_stay_normalized_through_partial_updates() {
    let engine = FreightEngine::new(mixed_network());

    engine.set_weights(Some(8.0), None, None).unwrap();
    let weights = engine.weights();
    let total = weights.duration() + weights.emissions() + weights.cost();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(weights.duration() > 0.9);

    let err = engine
        .set_weights(Some(0.0), Some(0.0), Some(0.0))
        .expect_err("zero-sum rejected");
    assert!(matches!(err, Error::InvalidWeights { .. }));

    // Rejected update left the previous normalized weights in place.
    assert_eq!(engine.weights(), weights);
}

#[test]
fn delay_is_clamped_through_every_mutation_path() {
    let engine = FreightEngine::new(mixed_network());

    assert_eq!(
        engine.set_node_delay("LHR", 99.0).unwrap(),
        MAX_NODE_DELAY_HOURS
    );
    engine
        .add_pain_point("LHR", "weather", "Fog bank", 12.0, false)
        .unwrap();
    let (delay, blocked) = engine.node_status("LHR").unwrap();
    assert_eq!(delay, MAX_NODE_DELAY_HOURS);
    assert!(!blocked);

    engine.remove_pain_point(0).unwrap();
    assert_eq!(engine.node_status("LHR").unwrap().0, MAX_NODE_DELAY_HOURS);
    assert_eq!(engine.set_node_delay("LHR", -2.0).unwrap(), 0.0);
}

#[test]
fn unknown_node_rejected_before_any_mutation() {
    let engine = FreightEngine::new(mixed_network());
    assert!(matches!(
        engine.set_node_delay("XXX", 1.0),
        Err(Error::UnknownNode { .. })
    ));
    assert!(matches!(
        engine.add_pain_point("XXX", "strike", "Strike", 0.0, true),
        Err(Error::UnknownNode { .. })
    ));
    assert!(engine.pain_points().is_empty());
}

#[test]
fn pain_point_listing_and_indexed_removal() {
    let engine = FreightEngine::new(mixed_network());
    engine
        .add_pain_point("LHR", "strike", "Ground crew strike", 4.0, false)
        .unwrap();
    engine
        .add_pain_point("RTM", "congestion", "Berth queue", 2.0, true)
        .unwrap();

    let points = engine.pain_points();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].node_id, "LHR");
    assert_eq!(points[1].index, 1);

    let removed = engine.remove_pain_point(0).unwrap();
    assert_eq!(removed.node_id, "LHR");
    assert_eq!(engine.pain_points().len(), 1);

    let err = engine.remove_pain_point(5).expect_err("out of range");
    assert!(matches!(err, Error::PainPointOutOfRange { .. }));
}

#[test]
fn current_route_caches_last_success_only() {
    let engine = FreightEngine::new(mixed_network());
    assert!(engine.current_route().is_none());

    let route = engine.find_shortest_path("LHR", "SHA").unwrap().unwrap();
    let cached = engine.current_route().expect("cached");
    assert_eq!(cached.path, route.path);

    // A failed query leaves the cache untouched.
    engine
        .add_pain_point("SHA", "strike", "Port strike", 0.0, true)
        .unwrap();
    assert!(engine.find_shortest_path("LHR", "SHA").unwrap().is_none());
    assert_eq!(engine.current_route().unwrap().path, route.path);
}

#[test]
fn effective_graph_excludes_edges_at_blocked_nodes() {
    let network = mixed_network();
    let mut disruption = DisruptionState::new(network.node_count());
    let weights = ObjectiveWeights::default();

    let baseline = EffectiveGraph::build(&network, &disruption, &weights);
    assert_eq!(baseline.edge_count(), network.edge_count());

    let rtm = network.node_idx("RTM").unwrap();
    disruption.add_pain_point(freightsim_lib::PainPoint {
        node: rtm,
        category: "strike".to_string(),
        name: "Dock strike".to_string(),
        delay_increase: 0.0,
        blocked: true,
    });

    let blocked = EffectiveGraph::build(&network, &disruption, &weights);
    // RTM -> SHA and LHR -> RTM both disappear.
    assert_eq!(blocked.edge_count(), network.edge_count() - 2);
    assert!(blocked.neighbours(rtm).is_empty());
    for node in 0..network.node_count() {
        assert!(blocked.neighbours(node).iter().all(|e| e.target != rtm));
    }
}

#[test]
fn effective_graph_build_is_deterministic() {
    let network = mixed_network();
    let mut disruption = DisruptionState::new(network.node_count());
    disruption.set_severity(45.0, -40.0, 0.6).unwrap();
    disruption.set_base_delay(0, 3.0);
    let weights = ObjectiveWeights::new(2.0, 1.0, 1.0).unwrap();

    let first = EffectiveGraph::build(&network, &disruption, &weights);
    let second = EffectiveGraph::build(&network, &disruption, &weights);

    assert_eq!(first.edge_count(), second.edge_count());
    for node in 0..network.node_count() {
        let (a, b) = (first.neighbours(node), second.neighbours(node));
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert_eq!(x.target, y.target);
            assert_eq!(x.weight, y.weight);
            assert_eq!(x.duration, y.duration);
        }
    }
}
