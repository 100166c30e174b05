//! Session handlers - signup, login, logout, and token introspection

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use munch_types::{User, UserId};

use crate::auth::{Principal, TokenCandidate};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The principal as the session endpoints report it.
///
/// `token` is present after login and on token lookups; signup does not mint
/// one, so it is omitted there.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            rating: user.rating,
            token: user.token,
        }
    }
}

/// Blank strings count as absent, like the form fields they come from
fn present(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.is_empty())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login
#[instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<SessionUser>> {
    let (Some(email), Some(password)) = (present(req.email.as_deref()), present(req.password.as_deref()))
    else {
        return Err(ApiError::BadRequest("Missing credentials".into()));
    };

    let user = state.auth.login(email, password).await?;
    Ok(Json(SessionUser::from(user)))
}

/// POST /signup
#[instrument(skip(state, req))]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<SessionUser>> {
    let (Some(email), Some(password)) = (present(req.email.as_deref()), present(req.password.as_deref()))
    else {
        return Err(ApiError::BadRequest("Missing credentials".into()));
    };

    // Name validation (blank rejected) lives in the auth service
    let name = req.name.as_deref().unwrap_or_default();
    let user = state.auth.signup(name, email, password).await?;
    Ok(Json(SessionUser::from(user)))
}

/// GET /token
///
/// Public variant of token introspection: any failure with a token present
/// collapses to a single coarse 401.
pub async fn get_token(
    State(state): State<AppState>,
    candidate: TokenCandidate,
) -> ApiResult<Json<SessionUser>> {
    let user = state.auth.get_token(candidate.0.as_deref()).await?;
    Ok(Json(SessionUser::from(user)))
}

/// GET /tokenInfo
///
/// Runs behind the verification middleware, so the fine-grained 401s
/// (missing/malformed/expired/unknown) have already been issued.
pub async fn token_info(Principal(user): Principal) -> Json<SessionUser> {
    Json(SessionUser::from(user))
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    candidate: TokenCandidate,
) -> ApiResult<StatusCode> {
    state.auth.logout(candidate.0.as_deref()).await?;
    Ok(StatusCode::OK)
}
