use crate::dtos::DiagnosticsResponse;
use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Collections listed by the diagnostics report.
const MAX_REPORTED_COLLECTIONS: usize = 10;

/// Liveness probe. Always 200; the store state is informational.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.store {
        None => "not configured",
        Some(store) => match store.ping().await {
            Ok(()) => "connected",
            Err(_) => "unavailable",
        },
    };

    Json(json!({
        "status": "ok",
        "service": "portfolio-service",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database
    }))
}

/// Readiness probe: ready only when the store answers.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match &state.store {
        Some(store) => match store.ping().await {
            Ok(()) => StatusCode::OK,
            Err(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
        None => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Reports configuration and connection state without failing.
///
/// GET /test
pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let database_config = &state.config.database;
    let database_url = if database_config.url.is_some() {
        "set"
    } else {
        "not set"
    };

    let mut report = DiagnosticsResponse {
        backend: "running".to_string(),
        database: "not available".to_string(),
        database_url: database_url.to_string(),
        database_name: database_config.name.clone(),
        connection_status: "not connected".to_string(),
        collections: Vec::new(),
    };

    if let Some(store) = &state.store {
        report.connection_status = "connected".to_string();

        match store.collection_names().await {
            Ok(mut names) => {
                names.truncate(MAX_REPORTED_COLLECTIONS);
                report.collections = names;
                report.database = format!("connected ({})", store.backend());
            }
            Err(e) => {
                tracing::warn!("Diagnostics could not list collections: {}", e);
                report.database = format!("connected but error: {}", e);
            }
        }
    }

    Json(report)
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
