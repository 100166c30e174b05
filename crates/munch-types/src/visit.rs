//! Visit types

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::restaurant::RestaurantId;
use crate::user::UserId;

/// Unique visit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct VisitId(pub Uuid);

impl VisitId {
    /// Create a new random visit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a visit ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for VisitId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VisitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for VisitId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A recorded restaurant visit. Immutable once created; there is no update
/// or delete operation anywhere in the system.
#[derive(Debug, Clone)]
pub struct Visit {
    pub id: VisitId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub comment: Option<String>,
    pub rating: f64,
    pub date: DateTime<Utc>,
}
