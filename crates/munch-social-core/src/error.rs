use thiserror::Error;

/// Errors produced by the follow graph and the visit tracker.
///
/// Display strings are the exact messages returned to API clients, so
/// changing one here changes the wire contract.
#[derive(Error, Debug)]
pub enum SocialError {
    #[error("You cannot follow yourself")]
    CannotFollowSelf,

    #[error("You already follow user {id}")]
    AlreadyFollowing { id: String },

    /// The user named in a follow request body does not exist.
    #[error("User with id {id} was not found")]
    FollowTargetNotFound { id: String },

    #[error("User does not follow user with id {id}")]
    NotFollowing { id: String },

    #[error("User {id} was not found")]
    UserNotFound { id: String },

    #[error("Restaurant {id} was not found")]
    RestaurantNotFound { id: String },

    #[error("Visit {id} was not found")]
    VisitNotFound { id: String },

    #[error("Missing parameters. A restaurant ID and a rating must be specified.")]
    MissingVisitParams,

    #[error("database error: {0}")]
    Database(String),
}

impl SocialError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            SocialError::CannotFollowSelf | SocialError::MissingVisitParams => 400,
            SocialError::AlreadyFollowing { .. } => 412,
            SocialError::FollowTargetNotFound { .. }
            | SocialError::NotFollowing { .. }
            | SocialError::UserNotFound { .. }
            | SocialError::RestaurantNotFound { .. }
            | SocialError::VisitNotFound { .. } => 404,
            SocialError::Database(_) => 500,
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            SocialError::CannotFollowSelf => "CANNOT_FOLLOW_USER",
            SocialError::AlreadyFollowing { .. } => "ALREADY_FOLLOWING_USER",
            SocialError::FollowTargetNotFound { .. }
            | SocialError::NotFollowing { .. }
            | SocialError::UserNotFound { .. } => "USER_NOT_FOUND",
            SocialError::RestaurantNotFound { .. } => "RESTAURANT_NOT_FOUND",
            SocialError::VisitNotFound { .. } => "VISIT_NOT_FOUND",
            SocialError::MissingVisitParams => "BAD_REQUEST",
            SocialError::Database(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<munch_db::DbError> for SocialError {
    fn from(err: munch_db::DbError) -> Self {
        tracing::error!(error = %err, "database error in social flow");
        SocialError::Database(err.to_string())
    }
}
