//! Visit handlers
//!
//! Recording a visit is the only write path that touches ratings: the user
//! collects reward points and the restaurant's running mean is refreshed.
//! The listing endpoints are scoped by the path user's existence, not by the
//! caller's identity.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use munch_social_core::RecordVisit;
use munch_types::{Page, Paged, RestaurantId, UserId, Visit, VisitId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct VisitListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct VisitPayload {
    pub id: VisitId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub rating: f64,
    pub date: DateTime<Utc>,
}

impl From<Visit> for VisitPayload {
    fn from(visit: Visit) -> Self {
        Self {
            id: visit.id,
            user_id: visit.user_id,
            restaurant_id: visit.restaurant_id,
            comment: visit.comment,
            rating: visit.rating,
            date: visit.date,
        }
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::parse(raw).map_err(|_| ApiError::UserNotFound { id: raw.to_string() })
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /users/{id}/restaurants/visits
#[instrument(skip(state, req), fields(user_id = %id))]
pub async fn record_visit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RecordVisit>,
) -> ApiResult<(StatusCode, Json<VisitPayload>)> {
    let user_id = parse_user_id(&id)?;

    let visit = state.tracker.record(user_id, req).await?;
    Ok((StatusCode::CREATED, Json(VisitPayload::from(visit))))
}

/// GET /users/{id}/restaurants/visits
pub async fn list_visits(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<VisitListQuery>,
) -> ApiResult<Json<Paged<VisitPayload>>> {
    let user_id = parse_user_id(&id)?;
    let page = Page::new(query.page, query.limit);

    let visits = state.tracker.list_for_user(user_id, page).await?;
    Ok(Json(visits.map(VisitPayload::from)))
}

/// GET /users/{id}/restaurants/visits/{visit_id}
pub async fn find_visit(
    State(state): State<AppState>,
    Path((id, visit_id)): Path<(String, String)>,
) -> ApiResult<Json<VisitPayload>> {
    let user_id = parse_user_id(&id)?;

    let visit = state.tracker.find_visit(user_id, &visit_id).await?;
    Ok(Json(VisitPayload::from(visit)))
}

/// GET /users/{id}/restaurants/{restaurant_id}/visits
pub async fn list_restaurant_visits(
    State(state): State<AppState>,
    Path((id, restaurant_id)): Path<(String, String)>,
    Query(query): Query<VisitListQuery>,
) -> ApiResult<Json<Paged<VisitPayload>>> {
    let user_id = parse_user_id(&id)?;
    let page = Page::new(query.page, query.limit);

    let visits = state
        .tracker
        .list_for_restaurant(user_id, &restaurant_id, page)
        .await?;
    Ok(Json(visits.map(VisitPayload::from)))
}
