//! Favorite list types

use uuid::Uuid;

use crate::restaurant::Restaurant;
use crate::user::UserSummary;

/// Unique favorite list identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FavoriteListId(pub Uuid);

impl FavoriteListId {
    /// Create a new random favorite list ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a favorite list ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for FavoriteListId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FavoriteListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for FavoriteListId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A named list of restaurants kept by one user.
///
/// Restaurants are embedded as full copies of the catalog entry at the time
/// they were added; they do not track later catalog changes.
#[derive(Debug, Clone)]
pub struct FavoriteList {
    pub id: FavoriteListId,
    pub name: String,
    pub owner: UserSummary,
    pub restaurants: Vec<Restaurant>,
}

impl FavoriteList {
    /// Whether the given user owns this list
    pub fn is_owned_by(&self, user_id: crate::user::UserId) -> bool {
        self.owner.id == user_id
    }
}
