use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::collections::HashMap;

use crate::core::metrics;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::{HealthResponse, RootResponse};

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let api = state.settings().api();
    let response = RootResponse {
        message: format!("{} is running", api.project_name),
        version: api.version.clone(),
    };

    Json(response)
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut status = "healthy".to_string();
    let mut components = HashMap::new();
    let backend = state.store().backend();

    match repositories::health::ping(state.store()).await {
        Ok(()) => {
            components.insert("store".to_string(), format!("{backend}: healthy"));
        }
        Err(err) => {
            components.insert("store".to_string(), format!("{backend}: unhealthy: {err}"));
            status = "unhealthy".to_string();
        }
    }

    let omr = state.settings().omr();
    let fallback = if omr.synthetic_fallback { "enabled" } else { "disabled" };
    components.insert("omr_synthetic_fallback".to_string(), fallback.to_string());

    Json(HealthResponse { service: "examflow-api".to_string(), status, components })
}

pub(crate) async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    if !state.settings().telemetry().prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match metrics::render() {
        Some(body) => ([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
