//! HTTP API handlers

use crate::error::Error;
use crate::proxy::{BulkOutcome, RelayOutcome, RelayProxy, StatusReport};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use relay_types::{Relay, RelayCommand, RelayState};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<RelayProxy>,
    started: Instant,
}

impl AppState {
    pub fn new(proxy: RelayProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
            started: Instant::now(),
        }
    }
}

/// All routes, without middleware layers
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route(
            "/api/config/endpoint",
            get(get_endpoint_handler).post(set_endpoint_handler),
        )
        .route("/api/relays", get(relays_handler))
        .route("/api/relays/{gpio}", get(relay_handler))
        .route("/api/status", get(controller_status_handler))
        .route("/api/relay", post(set_relay_handler))
        .route("/api/relay/all_on", post(all_on_handler))
        .route("/api/relay/all_off", post(all_off_handler))
        .with_state(state)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self {
            Error::Validation {
                message,
                details: Some(details),
            } => json!({ "error": message, "details": details }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// General status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

/// GET /status - Service health check
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: "relay-dashboard",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
pub struct EndpointResponse {
    pub endpoint: String,
}

#[derive(Serialize)]
pub struct EndpointUpdated {
    pub success: bool,
    pub endpoint: String,
}

/// GET /api/config/endpoint - Current controller base URL ("" when unset)
pub async fn get_endpoint_handler(State(state): State<AppState>) -> Json<EndpointResponse> {
    Json(EndpointResponse {
        endpoint: state.proxy.endpoint().await.unwrap_or_default(),
    })
}

/// POST /api/config/endpoint - Point the proxy at another controller
pub async fn set_endpoint_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EndpointUpdated>, Error> {
    let endpoint = payload
        .ok()
        .and_then(|Json(body)| {
            body.get("endpoint")
                .and_then(|v| v.as_str())
                .map(|s| s.trim().to_string())
        })
        .filter(|e| is_http_url(e))
        .ok_or_else(|| Error::validation("Invalid endpoint"))?;

    state.proxy.set_endpoint(endpoint.clone()).await;
    Ok(Json(EndpointUpdated {
        success: true,
        endpoint,
    }))
}

fn is_http_url(candidate: &str) -> bool {
    match url::Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// GET /api/relays - Cached relay states (never calls the controller)
pub async fn relays_handler(State(state): State<AppState>) -> Json<Vec<Relay>> {
    Json(state.proxy.relays().list().await)
}

/// GET /api/relays/{gpio} - One cached relay
pub async fn relay_handler(
    State(state): State<AppState>,
    gpio: Result<Path<u32>, PathRejection>,
) -> Result<Json<Relay>, Error> {
    let Path(gpio) = gpio.map_err(|e| Error::Validation {
        message: "Invalid GPIO".to_string(),
        details: Some(e.body_text()),
    })?;

    state
        .proxy
        .relays()
        .get(gpio)
        .await
        .map(Json)
        .ok_or(Error::NotFound { gpio })
}

/// GET /api/status - Probe the controller
pub async fn controller_status_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<StatusReport>) {
    let report = state.proxy.status().await;
    let code = if report.connected {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (code, Json(report))
}

/// POST /api/relay - Switch one relay
pub async fn set_relay_handler(
    State(state): State<AppState>,
    payload: Result<Json<RelayCommand>, JsonRejection>,
) -> Result<Json<RelayOutcome>, Error> {
    let Json(command) = payload.map_err(|e| Error::Validation {
        message: "Invalid request data".to_string(),
        details: Some(e.body_text()),
    })?;

    Ok(Json(state.proxy.set_relay(command).await?))
}

/// POST /api/relay/all_on
pub async fn all_on_handler(State(state): State<AppState>) -> Result<Json<BulkOutcome>, Error> {
    Ok(Json(state.proxy.set_all(RelayState::On).await?))
}

/// POST /api/relay/all_off
pub async fn all_off_handler(State(state): State<AppState>) -> Result<Json<BulkOutcome>, Error> {
    Ok(Json(state.proxy.set_all(RelayState::Off).await?))
}
