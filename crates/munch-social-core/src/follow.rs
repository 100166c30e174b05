//! Follow graph service
//!
//! Follow edges are denormalized: the actor's `following` list and the
//! target's `followers` list live in separate user documents and are
//! written one after the other, so the two sides can briefly (or, after a
//! partial failure, durably) disagree. Uniqueness of the actor-side edge
//! is guaranteed by the store's atomic check-and-append; everything else
//! here is ordering and error mapping.

use std::sync::Arc;

use tracing::instrument;

use munch_db::UserRepository;
use munch_types::{User, UserId};

use crate::error::SocialError;

/// Manages follow and unfollow flows between users.
pub struct FollowGraph<U: UserRepository + ?Sized> {
    users: Arc<U>,
}

impl<U: UserRepository + ?Sized> FollowGraph<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Make `actor` follow the user named by `target_id`.
    ///
    /// `target_id` is the raw client-supplied string; an unparseable id is
    /// reported the same way as an unknown one. On success returns the
    /// actor's refreshed profile, new edge included.
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn follow(&self, actor: &User, target_id: &str) -> Result<User, SocialError> {
        let parsed = UserId::parse(target_id).map_err(|_| SocialError::FollowTargetNotFound {
            id: target_id.to_string(),
        })?;
        if parsed == actor.id {
            return Err(SocialError::CannotFollowSelf);
        }

        let target = self
            .users
            .find_by_id(parsed.0)
            .await?
            .ok_or_else(|| SocialError::FollowTargetNotFound {
                id: target_id.to_string(),
            })?;

        // Atomic on the actor document: if the edge already exists nothing
        // is written and neither side of the graph changes.
        let appended = self.users.add_following(actor.id.0, &target.summary()).await?;
        if !appended {
            return Err(SocialError::AlreadyFollowing {
                id: target_id.to_string(),
            });
        }

        // Reciprocal side. The append is skipped by the store if a stale
        // entry is already present.
        self.users.add_follower(target.id.0, &actor.summary()).await?;

        self.refreshed(actor.id).await
    }

    /// Make `actor` stop following the user named by `target_id`.
    ///
    /// The actor-side edge must exist; the target-side cleanup is best
    /// effort and is a no-op when the target account no longer exists.
    /// Returns the actor's refreshed profile.
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn unfollow(&self, actor: &User, target_id: &str) -> Result<User, SocialError> {
        // An unparseable id can never appear in the follow list, so it gets
        // the same answer as a user the actor simply does not follow.
        let not_following = || SocialError::NotFollowing {
            id: target_id.to_string(),
        };
        let parsed = UserId::parse(target_id).map_err(|_| not_following())?;
        if !actor.is_following(parsed) {
            return Err(not_following());
        }

        self.users.remove_following(actor.id.0, parsed.0).await?;
        self.users.remove_follower(parsed.0, actor.id.0).await?;

        self.refreshed(actor.id).await
    }

    async fn refreshed(&self, id: UserId) -> Result<User, SocialError> {
        self.users
            .find_by_id(id.0)
            .await?
            .ok_or_else(|| SocialError::UserNotFound { id: id.to_string() })
    }
}

impl<U: UserRepository + ?Sized> std::fmt::Debug for FollowGraph<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FollowGraph").finish_non_exhaustive()
    }
}
