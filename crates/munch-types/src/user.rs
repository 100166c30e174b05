//! User types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create a new random user ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Denormalized user summary embedded in follow edges and owner fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

/// A user account.
///
/// `following` and `followers` are denormalized edge lists kept in the user
/// document itself; both sides of an edge live in different documents and are
/// written independently (see the follow graph service for the consistency
/// caveats).
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Reward score, bumped by 10 for every recorded visit. Never decreases.
    pub rating: f64,
    /// Most recently issued bearer token, if any. Cleared on logout.
    pub token: Option<String>,
    pub following: Vec<UserSummary>,
    pub followers: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Linear membership test over the follow list. The list is expected to
    /// stay small; no index is kept.
    pub fn is_following(&self, target: UserId) -> bool {
        self.following.iter().any(|entry| entry.id == target)
    }

    /// Project the denormalized summary embedded into other documents
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}
