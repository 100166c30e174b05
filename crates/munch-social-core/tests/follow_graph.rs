//! Integration tests for the follow graph
//!
//! These run the real service against the in-memory user store.

use std::sync::Arc;

use munch_db::memory::MemoryUserRepository;
use munch_db::{CreateUser, UserRepository};
use munch_social_core::{FollowGraph, SocialError};
use munch_types::{User, UserId};
use uuid::Uuid;

fn graph() -> (FollowGraph<MemoryUserRepository>, MemoryUserRepository) {
    let users = MemoryUserRepository::new();
    let graph = FollowGraph::new(Arc::new(users.clone()));
    (graph, users)
}

async fn seed(users: &MemoryUserRepository, name: &str, email: &str) -> User {
    users
        .create(CreateUser {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap()
}

async fn stored(users: &MemoryUserRepository, id: UserId) -> User {
    users.find_by_id(id.0).await.unwrap().unwrap()
}

// ============================================================================
// Follow
// ============================================================================

#[tokio::test]
async fn test_follow_writes_both_edge_sides() {
    let (graph, users) = graph();
    let ana = seed(&users, "Ana", "ana@example.com").await;
    let bob = seed(&users, "Bob", "bob@example.com").await;

    let refreshed = graph.follow(&ana, &bob.id.to_string()).await.unwrap();

    assert_eq!(refreshed.id, ana.id);
    assert_eq!(refreshed.following.len(), 1);
    assert_eq!(refreshed.following[0].id, bob.id);
    assert_eq!(refreshed.following[0].name, "Bob");
    assert_eq!(refreshed.following[0].email, "bob@example.com");

    let bob_now = stored(&users, bob.id).await;
    assert_eq!(bob_now.followers.len(), 1);
    assert_eq!(bob_now.followers[0].id, ana.id);
}

#[tokio::test]
async fn test_follow_is_one_way() {
    let (graph, users) = graph();
    let ana = seed(&users, "Ana", "ana@example.com").await;
    let bob = seed(&users, "Bob", "bob@example.com").await;

    graph.follow(&ana, &bob.id.to_string()).await.unwrap();

    let bob_now = stored(&users, bob.id).await;
    let ana_now = stored(&users, ana.id).await;
    assert!(bob_now.following.is_empty(), "target must not follow back");
    assert!(ana_now.followers.is_empty());
}

#[tokio::test]
async fn test_follow_self_is_rejected() {
    let (graph, users) = graph();
    let ana = seed(&users, "Ana", "ana@example.com").await;

    let err = graph.follow(&ana, &ana.id.to_string()).await.unwrap_err();

    assert!(matches!(err, SocialError::CannotFollowSelf));
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.error_code(), "CANNOT_FOLLOW_USER");
    assert_eq!(err.to_string(), "You cannot follow yourself");
}

#[tokio::test]
async fn test_follow_unknown_target_is_not_found() {
    let (graph, users) = graph();
    let ana = seed(&users, "Ana", "ana@example.com").await;
    let ghost = Uuid::new_v4();

    let err = graph.follow(&ana, &ghost.to_string()).await.unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert_eq!(err.error_code(), "USER_NOT_FOUND");
    assert_eq!(err.to_string(), format!("User with id {ghost} was not found"));
}

#[tokio::test]
async fn test_follow_malformed_target_id_reads_as_unknown() {
    let (graph, users) = graph();
    let ana = seed(&users, "Ana", "ana@example.com").await;

    let err = graph.follow(&ana, "not-a-uuid").await.unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert_eq!(err.to_string(), "User with id not-a-uuid was not found");
}

#[tokio::test]
async fn test_follow_twice_fails_and_leaves_graph_unchanged() {
    let (graph, users) = graph();
    let ana = seed(&users, "Ana", "ana@example.com").await;
    let bob = seed(&users, "Bob", "bob@example.com").await;

    graph.follow(&ana, &bob.id.to_string()).await.unwrap();
    // Deliberately replay with the stale pre-follow snapshot; the duplicate
    // check lives in the store, not in the snapshot.
    let err = graph.follow(&ana, &bob.id.to_string()).await.unwrap_err();

    assert_eq!(err.status_code(), 412);
    assert_eq!(err.error_code(), "ALREADY_FOLLOWING_USER");
    assert_eq!(err.to_string(), format!("You already follow user {}", bob.id));

    let ana_now = stored(&users, ana.id).await;
    let bob_now = stored(&users, bob.id).await;
    assert_eq!(ana_now.following.len(), 1);
    assert_eq!(bob_now.followers.len(), 1);
}

// ============================================================================
// Unfollow
// ============================================================================

#[tokio::test]
async fn test_unfollow_removes_both_edge_sides() {
    let (graph, users) = graph();
    let ana = seed(&users, "Ana", "ana@example.com").await;
    let bob = seed(&users, "Bob", "bob@example.com").await;

    let ana = graph.follow(&ana, &bob.id.to_string()).await.unwrap();
    let refreshed = graph.unfollow(&ana, &bob.id.to_string()).await.unwrap();

    assert!(refreshed.following.is_empty());
    let bob_now = stored(&users, bob.id).await;
    assert!(bob_now.followers.is_empty());
}

#[tokio::test]
async fn test_unfollow_without_edge_is_not_found() {
    let (graph, users) = graph();
    let ana = seed(&users, "Ana", "ana@example.com").await;
    let bob = seed(&users, "Bob", "bob@example.com").await;

    let err = graph.unfollow(&ana, &bob.id.to_string()).await.unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert_eq!(err.error_code(), "USER_NOT_FOUND");
    assert_eq!(
        err.to_string(),
        format!("User does not follow user with id {}", bob.id)
    );
}

#[tokio::test]
async fn test_unfollow_malformed_id_reads_as_no_edge() {
    let (graph, users) = graph();
    let ana = seed(&users, "Ana", "ana@example.com").await;

    let err = graph.unfollow(&ana, "garbage").await.unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert_eq!(err.to_string(), "User does not follow user with id garbage");
}

#[tokio::test]
async fn test_unfollow_survives_vanished_target() {
    let (graph, users) = graph();
    let ana = seed(&users, "Ana", "ana@example.com").await;
    let bob = seed(&users, "Bob", "bob@example.com").await;

    let ana = graph.follow(&ana, &bob.id.to_string()).await.unwrap();
    users.remove(bob.id.0);

    // Follower-side cleanup has nowhere to write; the actor-side edge must
    // still be removed.
    let refreshed = graph.unfollow(&ana, &bob.id.to_string()).await.unwrap();
    assert!(refreshed.following.is_empty());
}
