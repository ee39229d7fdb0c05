use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;

use freightsim_lib::disruption::DisruptionState;
use freightsim_lib::test_helpers::NetworkBuilder;
use freightsim_lib::{EffectiveGraph, FreightEngine, Network, ObjectiveWeights};

const GRID: usize = 20;

/// Synthetic GRID x GRID lattice of seaports with bidirectional legs.
fn lattice() -> Network {
    let mut builder = NetworkBuilder::new();
    for row in 0..GRID {
        for col in 0..GRID {
            builder = builder.seaport(&format!("n{row}x{col}"), row as f64, col as f64);
        }
    }
    for row in 0..GRID {
        for col in 0..GRID {
            let here = format!("n{row}x{col}");
            if col + 1 < GRID {
                let east = format!("n{row}x{}", col + 1);
                builder = builder.leg(&here, &east).leg(&east, &here);
            }
            if row + 1 < GRID {
                let south = format!("n{}x{col}", row + 1);
                builder = builder.leg(&here, &south).leg(&south, &here);
            }
        }
    }
    builder.build()
}

static NETWORK: Lazy<Network> = Lazy::new(lattice);
static ENGINE: Lazy<FreightEngine> = Lazy::new(|| FreightEngine::new(lattice()));

fn benchmark_routing(c: &mut Criterion) {
    c.bench_function("effective_graph_rebuild", |b| {
        let network = &*NETWORK;
        let mut disruption = DisruptionState::new(network.node_count());
        disruption.set_severity(5.0, 5.0, 0.8).unwrap();
        let weights = ObjectiveWeights::default();
        b.iter(|| {
            let graph = EffectiveGraph::build(network, &disruption, &weights);
            black_box(graph.edge_count())
        });
    });

    c.bench_function("shortest_path_corner_to_corner", |b| {
        let engine = &*ENGINE;
        let goal = format!("n{0}x{0}", GRID - 1);
        b.iter(|| {
            let route = engine
                .find_shortest_path("n0x0", &goal)
                .expect("valid ids")
                .expect("route exists");
            black_box(route.metrics.duration)
        });
    });

    c.bench_function("mutation_with_synchronous_rebuild", |b| {
        let engine = &*ENGINE;
        b.iter(|| {
            engine.set_severity(10.0, 10.0, 0.5).expect("valid severity");
            black_box(engine.severity_at(10.0, 10.0))
        });
    });
}

criterion_group!(benches, benchmark_routing);
criterion_main!(benches);
