//! HTTP surface.
//!
//! | Method | Path               | Handler             |
//! |--------|--------------------|---------------------|
//! | GET    | `/`                | [`root`]            |
//! | GET    | `/health`          | [`health`]          |
//! | POST   | `/calculate_route` | [`calculate_route`] |
//!
//! Route failures map to a status code per [`RouteError`] kind and a JSON
//! body `{"detail": "..."}`.  Unreadable request bodies use the same shape.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ts_route::{RouteError, RouteFeature, RoutePlanner, RouteRequest, SensorMap};

// ── State ─────────────────────────────────────────────────────────────────────

/// Shared, read-only per-process state.  Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub planner:         Arc<RoutePlanner>,
    pub sensors:         Arc<SensorMap>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(planner: RoutePlanner, sensors: SensorMap, request_timeout: Duration) -> Self {
        Self { planner: Arc::new(planner), sensors: Arc::new(sensors), request_timeout }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/calculate_route", post(calculate_route))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Status endpoints ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub message:      &'static str,
    pub version:      &'static str,
    pub status:       &'static str,
    pub data_loaded:  bool,
    pub graph_loaded: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status:          &'static str,
    pub traffic_records: usize,
    pub graph_nodes:     usize,
    pub graph_edges:     usize,
    pub sensors:         usize,
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        message:      "TaipeiSim API is running",
        version:      env!("CARGO_PKG_VERSION"),
        status:       "operational",
        data_loaded:  state.planner.dataset().is_some(),
        graph_loaded: state.planner.graph().is_some(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let graph = state.planner.graph();
    Json(HealthStatus {
        status:          "healthy",
        traffic_records: state.planner.dataset().map_or(0, |d| d.len()),
        graph_nodes:     graph.map_or(0, |g| g.node_count()),
        graph_edges:     graph.map_or(0, |g| g.edge_count()),
        sensors:         state.sensors.len(),
    })
}

// ── Route endpoint ────────────────────────────────────────────────────────────

/// Plan on the blocking pool, bounded by `request_timeout`.
///
/// On timeout the blocking task is left to finish on its own; the planner's
/// search budget keeps that bounded.
pub async fn calculate_route(
    State(state): State<AppState>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<RouteFeature>, ApiError> {
    let Json(req) = payload?;
    let planner = Arc::clone(&state.planner);
    let job = req.clone();
    let task = tokio::task::spawn_blocking(move || planner.plan(&job));

    let outcome = match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join)) => {
            tracing::error!(
                start = ?(req.start_lat, req.start_lng),
                end = ?(req.end_lat, req.end_lng),
                departure = %req.departure_time,
                stage = "planner task",
                error = %join,
                "route planning panicked"
            );
            return Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"));
        }
        Err(_) => Err(RouteError::Timeout(state.request_timeout)),
    };

    match outcome {
        Ok(summary) => Ok(Json(summary.to_feature())),
        Err(err) => {
            log_failure(&err, &req);
            Err(ApiError::from(err))
        }
    }
}

/// HTTP status for each failure kind.
pub fn status_for(err: &RouteError) -> StatusCode {
    match err {
        RouteError::Validation(_)   => StatusCode::BAD_REQUEST,
        RouteError::Unavailable(_)  => StatusCode::SERVICE_UNAVAILABLE,
        RouteError::NoRoute { .. }  => StatusCode::NOT_FOUND,
        RouteError::Timeout(_)      => StatusCode::GATEWAY_TIMEOUT,
        RouteError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_failure(err: &RouteError, req: &RouteRequest) {
    let start = (req.start_lat, req.start_lng);
    let end = (req.end_lat, req.end_lng);
    let departure = req.departure_time.as_str();
    match err {
        RouteError::Validation(e) => tracing::debug!(error = %e, "rejected route request"),
        RouteError::NoRoute { .. } => tracing::info!(?start, ?end, "{err}"),
        RouteError::Unavailable(_) | RouteError::Timeout(_) => {
            tracing::warn!(?start, ?end, departure, kind = err.kind(), "{err}");
        }
        RouteError::Internal { stage, .. } => {
            tracing::error!(?start, ?end, departure, stage, error = %err, "route planning failed");
        }
    }
}

// ── Error responses ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }
}

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        let status = status_for(&err);
        let detail = match &err {
            RouteError::Internal { .. } => format!("Internal server error: {err}"),
            _ => err.to_string(),
        };
        Self { status, detail }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected route request body");
        Self { status: rejection.status(), detail: rejection.body_text() }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}
