//! Welcome and status handlers

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// GET /
pub async fn get_home() -> &'static str {
    "Welcome to Munch! API is up."
}

/// GET /status
pub async fn get_status() -> Json<StatusResponse> {
    Json(StatusResponse { status: "online" })
}
