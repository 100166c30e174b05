//! Health check handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub store: &'static str,
}

/// Liveness probe - always returns OK if the service is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe - checks store connectivity
pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>, StatusCode> {
    let Some(pool) = state.pool.as_ref() else {
        // The in-memory store has nothing to probe
        return Ok(Json(ReadyResponse {
            status: "ready",
            store: "in-memory",
        }));
    };

    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => Ok(Json(ReadyResponse {
            status: "ready",
            store: "connected",
        })),
        Err(e) => {
            tracing::error!(error = ?e, "Database readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
