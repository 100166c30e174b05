//! Visit tracking
//!
//! Recording a visit drives two side effects: the visiting user earns
//! reward points and the restaurant's running mean rating is folded
//! forward. The fold reads the visit count back from the store after the
//! insert, so the count always includes the visit just recorded.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use munch_db::{CreateVisit, RestaurantRepository, UserRepository, VisitRepository};
use munch_types::{Page, Paged, RestaurantId, User, UserId, Visit, VisitId};

use crate::error::SocialError;

/// Points added to a user's score for every recorded visit.
pub const VISIT_REWARD_POINTS: f64 = 10.0;

/// Client input for recording a visit. Everything is optional at the wire
/// level; [`VisitTracker::record`] decides what is actually required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordVisit {
    pub restaurant_id: Option<String>,
    pub comment: Option<String>,
    pub rating: Option<f64>,
    /// Defaults to the current time when absent.
    pub date: Option<DateTime<Utc>>,
}

/// Records visits and applies their side effects.
pub struct VisitTracker<U, R, V>
where
    U: UserRepository + ?Sized,
    R: RestaurantRepository + ?Sized,
    V: VisitRepository + ?Sized,
{
    users: Arc<U>,
    restaurants: Arc<R>,
    visits: Arc<V>,
}

impl<U, R, V> VisitTracker<U, R, V>
where
    U: UserRepository + ?Sized,
    R: RestaurantRepository + ?Sized,
    V: VisitRepository + ?Sized,
{
    pub fn new(users: Arc<U>, restaurants: Arc<R>, visits: Arc<V>) -> Self {
        Self {
            users,
            restaurants,
            visits,
        }
    }

    /// Record a visit for `user_id` and apply both side effects.
    ///
    /// Check order is part of the contract: unknown user first, then the
    /// parameter presence check, then the restaurant lookup. The rating
    /// fold is read-then-write without any transaction; concurrent visits
    /// to the same restaurant can lose an update, which is accepted.
    #[instrument(skip(self, input), fields(user_id = %user_id))]
    pub async fn record(&self, user_id: UserId, input: RecordVisit) -> Result<Visit, SocialError> {
        let user = self.ensure_user(user_id).await?;

        let (raw_restaurant_id, rating) = match (
            input.restaurant_id.as_deref().filter(|s| !s.is_empty()),
            input.rating,
        ) {
            (Some(id), Some(rating)) => (id, rating),
            _ => return Err(SocialError::MissingVisitParams),
        };
        let restaurant_id =
            RestaurantId::parse(raw_restaurant_id).map_err(|_| SocialError::RestaurantNotFound {
                id: raw_restaurant_id.to_string(),
            })?;
        let restaurant = self
            .restaurants
            .find_by_id(restaurant_id.0)
            .await?
            .ok_or_else(|| SocialError::RestaurantNotFound {
                id: raw_restaurant_id.to_string(),
            })?;

        let visit = self
            .visits
            .create(CreateVisit {
                id: Uuid::new_v4(),
                user_id: user.id.0,
                restaurant_id: restaurant_id.0,
                comment: input.comment,
                rating,
                date: input.date.unwrap_or_else(Utc::now),
            })
            .await?;

        self.users.add_points(user.id.0, VISIT_REWARD_POINTS).await?;

        // The count is taken after the insert, so it includes this visit.
        let on_record = self.visits.count_for_restaurant(restaurant_id.0).await?;
        let new_rating = restaurant.rating_after_visit(on_record.saturating_sub(1), rating);
        self.restaurants.set_rating(restaurant_id.0, new_rating).await?;

        Ok(visit)
    }

    /// All visits recorded by one user, newest first.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Paged<Visit>, SocialError> {
        self.ensure_user(user_id).await?;
        Ok(self.visits.find_by_user(user_id.0, page).await?)
    }

    /// One user's visits at one restaurant, newest first.
    ///
    /// The restaurant id is only used to filter; an unparseable or unknown
    /// id yields an empty page rather than an error.
    pub async fn list_for_restaurant(
        &self,
        user_id: UserId,
        restaurant_id: &str,
        page: Page,
    ) -> Result<Paged<Visit>, SocialError> {
        self.ensure_user(user_id).await?;
        let Ok(parsed) = RestaurantId::parse(restaurant_id) else {
            return Ok(Paged {
                items: Vec::new(),
                total: 0,
            });
        };
        Ok(self
            .visits
            .find_by_user_and_restaurant(user_id.0, parsed.0, page)
            .await?)
    }

    /// Fetch one visit by id.
    ///
    /// The path user must exist, but the visit is not checked for
    /// ownership; any user's visit can be read through any valid user path.
    pub async fn find_visit(&self, user_id: UserId, visit_id: &str) -> Result<Visit, SocialError> {
        self.ensure_user(user_id).await?;
        let not_found = || SocialError::VisitNotFound {
            id: visit_id.to_string(),
        };
        let parsed = VisitId::parse(visit_id).map_err(|_| not_found())?;
        self.visits
            .find_by_id(parsed.0)
            .await?
            .ok_or_else(not_found)
    }

    async fn ensure_user(&self, user_id: UserId) -> Result<User, SocialError> {
        self.users
            .find_by_id(user_id.0)
            .await?
            .ok_or_else(|| SocialError::UserNotFound {
                id: user_id.to_string(),
            })
    }
}

impl<U, R, V> std::fmt::Debug for VisitTracker<U, R, V>
where
    U: UserRepository + ?Sized,
    R: RestaurantRepository + ?Sized,
    V: VisitRepository + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitTracker").finish_non_exhaustive()
    }
}
