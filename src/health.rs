use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database_connection: &'static str,
}

/// Liveness plus a store round trip.
pub async fn healthz(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<Value>)> {
    match state.store.ping().await {
        Ok(()) => Ok(Json(HealthResponse {
            status: "ok",
            database_connection: "successful",
        })),
        Err(e) => {
            error!(error = %e, "health check: database unreachable");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Database connection failed" })),
            ))
        }
    }
}
