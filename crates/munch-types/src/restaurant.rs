//! Restaurant catalog types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique restaurant identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestaurantId(pub Uuid);

impl RestaurantId {
    /// Create a new random restaurant ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a restaurant ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for RestaurantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RestaurantId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Weekly opening hours, one "HH:MM-HH:MM" range per day (None = closed)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub monday: Option<String>,
    pub tuesday: Option<String>,
    pub wednesday: Option<String>,
    pub thursday: Option<String>,
    pub friday: Option<String>,
    pub saturday: Option<String>,
    pub sunday: Option<String>,
}

/// A restaurant catalog entry.
///
/// Catalog fields are owned by the external seeding process; the service only
/// ever mutates `rating`, as a running mean over recorded visit ratings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub place_id: Option<String>,
    pub address: String,
    pub tel: Option<String>,
    pub location: Location,
    pub opening_hours: OpeningHours,
    pub pictures: Vec<String>,
    pub genres: Vec<String>,
    pub price_range: i32,
    pub rating: f64,
}

impl Restaurant {
    /// Lower bound of the rating scale
    pub const MIN_RATING: f64 = 0.0;
    /// Upper bound of the rating scale
    pub const MAX_RATING: f64 = 5.0;

    /// Recompute the running mean after one more visit.
    ///
    /// `prior_visits` is the number of visits already on record, excluding
    /// the one being folded in. The first visit sets the rating outright,
    /// discarding any seeded score. Result is clamped to [0, 5].
    pub fn rating_after_visit(&self, prior_visits: u64, visit_rating: f64) -> f64 {
        let next = if prior_visits == 0 {
            visit_rating
        } else {
            let n = prior_visits as f64;
            (self.rating * n + visit_rating) / (n + 1.0)
        };
        next.clamp(Self::MIN_RATING, Self::MAX_RATING)
    }
}
