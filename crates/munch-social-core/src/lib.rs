//! Social features shared by the Munch services: the follow graph
//! between users and the visit log that feeds gamification points and
//! restaurant ratings.
//!
//! Handlers stay thin; the flows in [`follow::FollowGraph`] and
//! [`visits::VisitTracker`] own the ordering of lookups, writes and
//! error mapping so the HTTP layer only translates errors to responses.

pub mod error;
pub mod follow;
pub mod visits;

pub use error::SocialError;
pub use follow::FollowGraph;
pub use visits::{RecordVisit, VisitTracker, VISIT_REWARD_POINTS};
