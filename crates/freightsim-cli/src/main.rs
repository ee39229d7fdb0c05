use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use freightsim_lib::{FreightEngine, NodeKind};

#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-modal freight network utilities")]
struct Cli {
    /// Path to the prepared network dataset (JSON with nodes and edges).
    #[arg(long)]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List network nodes, optionally filtered by kind.
    Nodes {
        /// Restrict the listing to airports or seaports.
        #[arg(long, value_enum)]
        kind: Option<CliNodeKind>,
        /// Maximum number of nodes to print.
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Compute the optimal route between two node ids.
    Route {
        /// Source node id.
        #[arg(long = "from")]
        from: String,
        /// Target node id.
        #[arg(long = "to")]
        to: String,
        /// Relative weight of total duration.
        #[arg(long)]
        duration_weight: Option<f64>,
        /// Relative weight of total emissions.
        #[arg(long)]
        emissions_weight: Option<f64>,
        /// Relative weight of total cost.
        #[arg(long)]
        cost_weight: Option<f64>,
        /// Print the route as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CliNodeKind {
    Airport,
    Seaport,
}

impl From<CliNodeKind> for NodeKind {
    fn from(kind: CliNodeKind) -> Self {
        match kind {
            CliNodeKind::Airport => NodeKind::Airport,
            CliNodeKind::Seaport => NodeKind::Seaport,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let engine = FreightEngine::from_dataset(&cli.data).with_context(|| {
        format!("failed to load network dataset from {}", cli.data.display())
    })?;

    match cli.command {
        Command::Nodes { kind, limit } => handle_nodes(&engine, kind.map(Into::into), limit),
        Command::Route {
            from,
            to,
            duration_weight,
            emissions_weight,
            cost_weight,
            json,
        } => handle_route(
            &engine,
            &from,
            &to,
            duration_weight,
            emissions_weight,
            cost_weight,
            json,
        ),
    }
}

fn handle_nodes(engine: &FreightEngine, kind: Option<NodeKind>, limit: usize) -> Result<()> {
    let page = engine.nodes(kind, 0, Some(limit));
    for node in &page.items {
        println!(
            "{} [{}] {} ({:.4}, {:.4}) connections={}",
            node.id,
            match node.kind {
                NodeKind::Airport => "airport",
                NodeKind::Seaport => "seaport",
            },
            node.name,
            node.lat,
            node.lon,
            node.connections
        );
    }
    println!("{} of {} nodes", page.items.len(), page.total);
    Ok(())
}

fn handle_route(
    engine: &FreightEngine,
    from: &str,
    to: &str,
    duration_weight: Option<f64>,
    emissions_weight: Option<f64>,
    cost_weight: Option<f64>,
    json: bool,
) -> Result<()> {
    if duration_weight.is_some() || emissions_weight.is_some() || cost_weight.is_some() {
        engine
            .set_weights(duration_weight, emissions_weight, cost_weight)
            .context("invalid objective weights")?;
    }

    let route = engine
        .find_shortest_path(from, to)
        .context("route query failed")?;

    let Some(route) = route else {
        println!("No route between {from} and {to} under the current disruption state.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&route)?);
        return Ok(());
    }

    println!("Route ({} nodes):", route.metrics.total_nodes);
    for leg in &route.legs {
        println!(
            "- {} -> {} [{:?}] {:.1}h, {:.2}t CO2, {:.2}",
            leg.source, leg.target, leg.mode, leg.duration, leg.emissions, leg.cost
        );
    }
    println!(
        "Totals: {:.1}h, {:.2}t CO2, cost {:.2}",
        route.metrics.duration, route.metrics.emissions, route.metrics.cost
    );
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
