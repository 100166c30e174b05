//! Favorite list handlers
//!
//! Plain CRUD over the store. Lists embed full copies of catalog entries at
//! the time they were added; a later rating change does not rewrite them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use munch_db::{CreateFavoriteList, DbError};
use munch_types::{
    FavoriteList, FavoriteListId, Page, Paged, Restaurant, RestaurantId, UserId, UserSummary,
};

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FavoriteListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameListRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddRestaurantRequest {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteListPayload {
    pub id: FavoriteListId,
    pub name: String,
    pub owner: UserSummary,
    pub restaurants: Vec<Restaurant>,
}

impl From<FavoriteList> for FavoriteListPayload {
    fn from(list: FavoriteList) -> Self {
        Self {
            id: list.id,
            name: list.name,
            owner: list.owner,
            restaurants: list.restaurants,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

fn missing_name() -> ApiError {
    ApiError::BadRequest("Missing parameters. A name must be specified.".into())
}

/// Load a list by its raw path id; unparseable ids read as absent
async fn load_list(state: &AppState, raw_id: &str) -> ApiResult<FavoriteList> {
    let not_found = || ApiError::FavoriteListNotFound {
        id: raw_id.to_string(),
    };

    let list_id = FavoriteListId::parse(raw_id).map_err(|_| not_found())?;
    state
        .repos
        .favorites
        .find_by_id(list_id.0)
        .await?
        .ok_or_else(not_found)
}

/// Persist a whole list, reporting a vanished row as the list's 404
async fn save_list(state: &AppState, raw_id: &str, list: &FavoriteList) -> ApiResult<()> {
    state.repos.favorites.update(list).await.map_err(|err| match err {
        DbError::NotFound => ApiError::FavoriteListNotFound {
            id: raw_id.to_string(),
        },
        other => ApiError::Database(other),
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    Query(query): Query<FavoriteListQuery>,
) -> ApiResult<Json<Paged<FavoriteListPayload>>> {
    let page = Page::new(query.page, query.limit);

    let lists = state.repos.favorites.find_all(page).await?;
    Ok(Json(lists.map(FavoriteListPayload::from)))
}

/// POST /favorites
#[instrument(skip(state, owner, req), fields(owner_id = %owner.id))]
pub async fn create_favorite_list(
    State(state): State<AppState>,
    Principal(owner): Principal,
    Json(req): Json<CreateListRequest>,
) -> ApiResult<(StatusCode, Json<FavoriteListPayload>)> {
    let name = req
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(missing_name)?;

    let list = state
        .repos
        .favorites
        .create(CreateFavoriteList {
            id: Uuid::new_v4(),
            name,
            owner: owner.summary(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(FavoriteListPayload::from(list))))
}

/// GET /favorites/{id}
pub async fn find_favorite_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FavoriteListPayload>> {
    let list = load_list(&state, &id).await?;
    Ok(Json(FavoriteListPayload::from(list)))
}

/// PUT /favorites/{id}
pub async fn rename_favorite_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenameListRequest>,
) -> ApiResult<Json<FavoriteListPayload>> {
    let mut list = load_list(&state, &id).await?;

    list.name = req
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(missing_name)?;

    save_list(&state, &id, &list).await?;
    Ok(Json(FavoriteListPayload::from(list)))
}

/// DELETE /favorites/{id}
#[instrument(skip(state, caller), fields(caller_id = %caller.id))]
pub async fn delete_favorite_list(
    State(state): State<AppState>,
    Principal(caller): Principal,
    Path(id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    let list = load_list(&state, &id).await?;

    if !list.is_owned_by(caller.id) {
        return Err(ApiError::NotListOwner);
    }

    state.repos.favorites.delete(list.id.0).await?;
    Ok(Json(DeletedResponse {
        message: format!("Favorite list {id} deleted successfully"),
    }))
}

/// POST /favorites/{id}/restaurants
pub async fn add_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddRestaurantRequest>,
) -> ApiResult<Json<FavoriteListPayload>> {
    let Some(raw_restaurant_id) = req.id.as_deref().filter(|id| !id.is_empty()) else {
        return Err(ApiError::BadRequest(
            "Missing parameters. A restaurant ID must be specified.".into(),
        ));
    };

    let mut list = load_list(&state, &id).await?;

    let restaurant_missing = || ApiError::RestaurantNotFound {
        id: raw_restaurant_id.to_string(),
    };
    let restaurant_id =
        RestaurantId::parse(raw_restaurant_id).map_err(|_| restaurant_missing())?;
    let restaurant = state
        .repos
        .restaurants
        .find_by_id(restaurant_id.0)
        .await?
        .ok_or_else(restaurant_missing)?;

    // The stored catalog entry is embedded as-is; adding the same
    // restaurant twice embeds it twice.
    list.restaurants.push(restaurant);

    save_list(&state, &id, &list).await?;
    Ok(Json(FavoriteListPayload::from(list)))
}

/// DELETE /favorites/{id}/restaurants/{restaurant_id}
pub async fn remove_restaurant(
    State(state): State<AppState>,
    Path((id, restaurant_id)): Path<(String, String)>,
) -> ApiResult<Json<FavoriteListPayload>> {
    let mut list = load_list(&state, &id).await?;

    // Embedded entries are matched textually against the path segment, so a
    // malformed id simply matches nothing. Duplicates go one at a time.
    let position = list
        .restaurants
        .iter()
        .rposition(|restaurant| restaurant.id.to_string() == restaurant_id)
        .ok_or(ApiError::RestaurantNotFound {
            id: restaurant_id.clone(),
        })?;
    list.restaurants.remove(position);

    save_list(&state, &id, &list).await?;
    Ok(Json(FavoriteListPayload::from(list)))
}

/// GET /users/{id}/favorites
pub async fn user_favorite_lists(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FavoriteListQuery>,
) -> ApiResult<Json<Paged<FavoriteListPayload>>> {
    let not_found = || ApiError::UserNotFound { id: id.clone() };

    let user_id = UserId::parse(&id).map_err(|_| not_found())?;
    let owner = state
        .repos
        .users
        .find_by_id(user_id.0)
        .await?
        .ok_or_else(not_found)?;

    let page = Page::new(query.page, query.limit);
    let lists = state.repos.favorites.find_by_owner(owner.id.0, page).await?;
    Ok(Json(lists.map(FavoriteListPayload::from)))
}
