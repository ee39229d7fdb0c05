//! Freight routing HTTP microservice.
//!
//! Thin-handler pattern: all business logic lives in `freightsim-lib`;
//! this binary only parses requests, calls the engine, and formats
//! responses.
//!
//! # Endpoints
//!
//! - `GET    /api/v1/graph` - Node/edge snapshot with filtering and pagination
//! - `GET    /api/v1/weather` - Weather grid snapshot
//! - `POST   /api/v1/weather` - Set weather severity at a coordinate
//! - `POST   /api/v1/delay` - Set a node's base delay
//! - `GET    /api/v1/pain-points` - List active pain points
//! - `POST   /api/v1/pain-points` - Add a pain point
//! - `DELETE /api/v1/pain-points/{index}` - Remove a pain point
//! - `POST   /api/v1/weights` - Update objective weights
//! - `POST   /api/v1/route` - Compute the optimal route between two nodes
//! - `GET    /api/v1/route/current` - Last successfully computed route
//! - `GET    /health/live`, `GET /health/ready` - Probes
//!
//! # Configuration
//!
//! - `FREIGHTSIM_DATA_PATH` - Path to the prepared network dataset (required)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use freightsim_lib::{Error as LibError, FreightEngine, NodeKind, Route};

type AppState = Arc<FreightEngine>;

/// JSON error body paired with an HTTP status.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<LibError> for ApiError {
    fn from(err: LibError) -> Self {
        let status = match err {
            LibError::UnknownNode { .. } => StatusCode::NOT_FOUND,
            LibError::InvalidSeverity { .. }
            | LibError::InvalidWeights { .. }
            | LibError::PainPointOutOfRange { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let data_path: PathBuf = env::var("FREIGHTSIM_DATA_PATH")
        .unwrap_or_else(|_| "/data/network.json".to_string())
        .into();
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(data_path = %data_path.display(), port, "starting freight routing service");

    let engine = FreightEngine::from_dataset(&data_path).map_err(|e| {
        error!(error = %e, path = %data_path.display(), "failed to load network dataset");
        e
    })?;

    let state: AppState = Arc::new(engine);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/graph", get(graph_handler))
        .route("/api/v1/weather", get(weather_handler).post(set_weather_handler))
        .route("/api/v1/delay", post(set_delay_handler))
        .route(
            "/api/v1/pain-points",
            get(pain_points_handler).post(add_pain_point_handler),
        )
        .route("/api/v1/pain-points/{index}", delete(remove_pain_point_handler))
        .route("/api/v1/weights", post(set_weights_handler))
        .route("/api/v1/route", post(route_handler))
        .route("/api/v1/route/current", get(current_route_handler))
        .route("/health/live", get(health_handler))
        .route("/health/ready", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}

// Graph snapshot ---------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GraphParams {
    kind: Option<NodeKind>,
    #[serde(default)]
    offset: usize,
    limit: Option<usize>,
    #[serde(default)]
    include_edges: bool,
}

#[derive(Debug, Serialize)]
struct GraphResponse {
    nodes: Vec<freightsim_lib::NodeView>,
    edges: Vec<freightsim_lib::EdgeView>,
    total_nodes: usize,
    total_edges: usize,
}

async fn graph_handler(
    State(engine): State<AppState>,
    Query(params): Query<GraphParams>,
) -> Json<GraphResponse> {
    let nodes = engine.nodes(params.kind, params.offset, params.limit);
    let total_edges = engine.network().edge_count();
    let edges = if params.include_edges {
        engine.edges(params.offset, params.limit).items
    } else {
        Vec::new()
    };

    Json(GraphResponse {
        nodes: nodes.items,
        edges,
        total_nodes: nodes.total,
        total_edges,
    })
}

// Weather ----------------------------------------------------------------

async fn weather_handler(State(engine): State<AppState>) -> Json<freightsim_lib::WeatherSnapshot> {
    Json(engine.weather_snapshot())
}

#[derive(Debug, Deserialize)]
struct SetWeatherRequest {
    lat: f64,
    lon: f64,
    severity: f64,
}

async fn set_weather_handler(
    State(engine): State<AppState>,
    Json(request): Json<SetWeatherRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    engine.set_severity(request.lat, request.lon, request.severity)?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "severity": engine.severity_at(request.lat, request.lon),
    })))
}

// Node delay -------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SetDelayRequest {
    node_id: String,
    delay_hours: f64,
}

async fn set_delay_handler(
    State(engine): State<AppState>,
    Json(request): Json<SetDelayRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let applied = engine.set_node_delay(&request.node_id, request.delay_hours)?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "node_id": request.node_id,
        "delay": applied,
    })))
}

// Pain points ------------------------------------------------------------

async fn pain_points_handler(
    State(engine): State<AppState>,
) -> Json<Vec<freightsim_lib::PainPointView>> {
    Json(engine.pain_points())
}

#[derive(Debug, Deserialize)]
struct AddPainPointRequest {
    node_id: String,
    category: String,
    name: String,
    #[serde(default)]
    delay_increase: f64,
    #[serde(default)]
    blocked: bool,
}

async fn add_pain_point_handler(
    State(engine): State<AppState>,
    Json(request): Json<AddPainPointRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let index = engine.add_pain_point(
        &request.node_id,
        &request.category,
        &request.name,
        request.delay_increase,
        request.blocked,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "status": "ok", "index": index })),
    ))
}

async fn remove_pain_point_handler(
    State(engine): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<freightsim_lib::PainPointView>> {
    Ok(Json(engine.remove_pain_point(index)?))
}

// Objective weights ------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SetWeightsRequest {
    duration: Option<f64>,
    emissions: Option<f64>,
    cost: Option<f64>,
}

async fn set_weights_handler(
    State(engine): State<AppState>,
    Json(request): Json<SetWeightsRequest>,
) -> ApiResult<Json<freightsim_lib::ObjectiveWeights>> {
    let weights = engine.set_weights(request.duration, request.emissions, request.cost)?;
    Ok(Json(weights))
}

// Routing ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RouteRequest {
    source_id: String,
    target_id: String,
}

async fn route_handler(
    State(engine): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> ApiResult<Json<Route>> {
    let route = engine
        .find_shortest_path(&request.source_id, &request.target_id)?
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "no route found between {} and {}",
                request.source_id, request.target_id
            ))
        })?;
    Ok(Json(route))
}

async fn current_route_handler(State(engine): State<AppState>) -> ApiResult<Json<Route>> {
    engine
        .current_route()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("no route has been computed yet"))
}

// Health -----------------------------------------------------------------

async fn health_handler() -> Json<serde_json::Value> {
    // The engine is fully constructed before the router starts serving, so
    // a responsive process is both live and ready.
    Json(serde_json::json!({ "status": "ok" }))
}
