//! Error types for the Munch API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use munch_auth_core::AuthError;
use munch_social_core::SocialError;

/// Wire shape of every failure: flat `{errorCode, message}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_code: String,
    pub message: String,
}

/// API error type
///
/// Auth and social errors carry their own status and code mappings; the
/// variants below cover the handlers that talk to the stores directly.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Social(#[from] SocialError),

    #[error("User {id} was not found")]
    UserNotFound { id: String },

    #[error("Restaurant {id} was not found")]
    RestaurantNotFound { id: String },

    #[error("Favorite list {id} was not found")]
    FavoriteListNotFound { id: String },

    #[error("Favorite list can only be deleted by their owner")]
    NotListOwner,

    #[error("{0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(#[from] munch_db::DbError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(err) => from_u16(err.status_code()),
            Self::Social(err) => from_u16(err.status_code()),
            Self::UserNotFound { .. }
            | Self::RestaurantNotFound { .. }
            | Self::FavoriteListNotFound { .. } => StatusCode::NOT_FOUND,
            Self::NotListOwner | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Auth(err) => err.error_code(),
            Self::Social(err) => err.error_code(),
            Self::UserNotFound { .. } => "USER_NOT_FOUND",
            Self::RestaurantNotFound { .. } => "RESTAURANT_NOT_FOUND",
            Self::FavoriteListNotFound { .. } => "FAVORITE_LIST_NOT_FOUND",
            Self::NotListOwner => "NOT_FAVORITE_LIST_OWNER",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Database(_) => "INTERNAL_ERROR",
        }
    }
}

fn from_u16(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, "Internal API error");
        }

        let body = ErrorBody {
            error_code: self.error_code().to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
