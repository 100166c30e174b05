//! User directory and follow graph handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use munch_db::UserFilter;
use munch_types::{Page, Paged, User, UserId, UserSummary};

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    /// Case-insensitive name substring
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub id: Option<String>,
}

/// Directory entry, without the follow edges
#[derive(Debug, Serialize)]
pub struct UserItem {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub rating: f64,
}

impl From<User> for UserItem {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            rating: user.rating,
        }
    }
}

/// Full profile with both sides of the follow graph
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub rating: f64,
    pub following: Vec<UserSummary>,
    pub followers: Vec<UserSummary>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            rating: user.rating,
            following: user.following,
            followers: user.followers,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Paged<UserItem>>> {
    let filter = UserFilter {
        name_contains: query.q,
    };
    let page = Page::new(query.page, query.limit);

    let users = state.repos.users.search(&filter, page).await?;
    Ok(Json(users.map(UserItem::from)))
}

/// GET /users/{id}
pub async fn find_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let not_found = || ApiError::UserNotFound { id: id.clone() };

    let user_id = UserId::parse(&id).map_err(|_| not_found())?;
    let user = state
        .repos
        .users
        .find_by_id(user_id.0)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(UserProfile::from(user)))
}

/// POST /follow
#[instrument(skip(state, actor, req), fields(actor_id = %actor.id))]
pub async fn follow(
    State(state): State<AppState>,
    Principal(actor): Principal,
    Json(req): Json<FollowRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let Some(target_id) = req.id.as_deref().filter(|id| !id.is_empty()) else {
        return Err(ApiError::BadRequest(
            "Missing parameters. A user ID must be specified.".into(),
        ));
    };

    let actor = state.graph.follow(&actor, target_id).await?;
    Ok((StatusCode::CREATED, Json(UserProfile::from(actor))))
}

/// DELETE /follow/{id}
#[instrument(skip(state, actor), fields(actor_id = %actor.id))]
pub async fn unfollow(
    State(state): State<AppState>,
    Principal(actor): Principal,
    Path(id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let actor = state.graph.unfollow(&actor, &id).await?;
    Ok(Json(UserProfile::from(actor)))
}
