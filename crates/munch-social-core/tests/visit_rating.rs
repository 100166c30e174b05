//! Integration tests for visit recording and its side effects
//!
//! These run the real tracker against the in-memory stores.

use std::sync::Arc;

use chrono::{Duration, Utc};
use munch_db::memory::{
    MemoryRestaurantRepository, MemoryUserRepository, MemoryVisitRepository,
};
use munch_db::{CreateUser, RestaurantRepository, UserRepository, VisitRepository};
use munch_social_core::{RecordVisit, SocialError, VisitTracker, VISIT_REWARD_POINTS};
use munch_types::{
    Location, OpeningHours, Page, Restaurant, RestaurantId, User, UserId,
};
use uuid::Uuid;

struct Harness {
    tracker: VisitTracker<MemoryUserRepository, MemoryRestaurantRepository, MemoryVisitRepository>,
    users: MemoryUserRepository,
    restaurants: MemoryRestaurantRepository,
    visits: MemoryVisitRepository,
}

fn harness() -> Harness {
    let users = MemoryUserRepository::new();
    let restaurants = MemoryRestaurantRepository::new();
    let visits = MemoryVisitRepository::new();
    let tracker = VisitTracker::new(
        Arc::new(users.clone()),
        Arc::new(restaurants.clone()),
        Arc::new(visits.clone()),
    );
    Harness {
        tracker,
        users,
        restaurants,
        visits,
    }
}

async fn seed_user(users: &MemoryUserRepository, name: &str, email: &str) -> User {
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

async fn seed_restaurant(
    restaurants: &MemoryRestaurantRepository,
    name: &str,
    seeded_rating: f64,
) -> Restaurant {
    restaurants
        .create(Restaurant {
            id: RestaurantId::new(),
            name: name.to_string(),
            place_id: None,
            address: "42 Grande Allee".to_string(),
            tel: None,
            location: Location {
                latitude: 46.81,
                longitude: -71.23,
            },
            opening_hours: OpeningHours::default(),
            pictures: Vec::new(),
            genres: vec!["italian".to_string()],
            price_range: 2,
            rating: seeded_rating,
        })
        .await
        .unwrap()
}

fn visit_at(restaurant: &Restaurant, rating: f64) -> RecordVisit {
    RecordVisit {
        restaurant_id: Some(restaurant.id.to_string()),
        rating: Some(rating),
        ..Default::default()
    }
}

// ============================================================================
// Recording
// ============================================================================

#[tokio::test]
async fn test_record_fills_defaults() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let rita = seed_restaurant(&h.restaurants, "Chez Rita", 0.0).await;

    let before = Utc::now();
    let visit = h.tracker.record(ana.id, visit_at(&rita, 4.0)).await.unwrap();

    assert_eq!(visit.user_id, ana.id);
    assert_eq!(visit.restaurant_id, rita.id);
    assert_eq!(visit.rating, 4.0);
    assert!(visit.comment.is_none());
    assert!(visit.date >= before && visit.date <= Utc::now());
}

#[tokio::test]
async fn test_record_awards_reward_points() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let rita = seed_restaurant(&h.restaurants, "Chez Rita", 0.0).await;

    h.tracker.record(ana.id, visit_at(&rita, 4.0)).await.unwrap();
    h.tracker.record(ana.id, visit_at(&rita, 5.0)).await.unwrap();

    let stored = h.users.find_by_id(ana.id.0).await.unwrap().unwrap();
    assert_eq!(stored.rating, 2.0 * VISIT_REWARD_POINTS);
}

#[tokio::test]
async fn test_first_visit_discards_seeded_rating() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let rita = seed_restaurant(&h.restaurants, "Chez Rita", 4.7).await;

    h.tracker.record(ana.id, visit_at(&rita, 2.0)).await.unwrap();

    let stored = h.restaurants.find_by_id(rita.id.0).await.unwrap().unwrap();
    assert_eq!(stored.rating, 2.0);
}

#[tokio::test]
async fn test_rating_folds_running_mean() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let rita = seed_restaurant(&h.restaurants, "Chez Rita", 0.0).await;

    h.tracker.record(ana.id, visit_at(&rita, 4.0)).await.unwrap();
    h.tracker.record(ana.id, visit_at(&rita, 2.0)).await.unwrap();

    let stored = h.restaurants.find_by_id(rita.id.0).await.unwrap().unwrap();
    assert_eq!(stored.rating, 3.0);
}

#[tokio::test]
async fn test_rating_mean_spans_all_users() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let bob = seed_user(&h.users, "Bob", "bob@example.com").await;
    let rita = seed_restaurant(&h.restaurants, "Chez Rita", 0.0).await;

    h.tracker.record(ana.id, visit_at(&rita, 5.0)).await.unwrap();
    h.tracker.record(bob.id, visit_at(&rita, 1.0)).await.unwrap();

    let stored = h.restaurants.find_by_id(rita.id.0).await.unwrap().unwrap();
    assert_eq!(stored.rating, 3.0);
}

#[tokio::test]
async fn test_record_unknown_user_checked_first() {
    let h = harness();
    let ghost = UserId::new();

    // Parameters are missing too; the user check must win.
    let err = h.tracker.record(ghost, RecordVisit::default()).await.unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert_eq!(err.error_code(), "USER_NOT_FOUND");
    assert_eq!(err.to_string(), format!("User {ghost} was not found"));
}

#[tokio::test]
async fn test_record_requires_restaurant_and_rating() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let rita = seed_restaurant(&h.restaurants, "Chez Rita", 0.0).await;

    let missing_both = RecordVisit::default();
    let missing_rating = RecordVisit {
        restaurant_id: Some(rita.id.to_string()),
        ..Default::default()
    };
    let missing_restaurant = RecordVisit {
        rating: Some(4.0),
        ..Default::default()
    };
    let blank_restaurant = RecordVisit {
        restaurant_id: Some(String::new()),
        rating: Some(4.0),
        ..Default::default()
    };

    for input in [missing_both, missing_rating, missing_restaurant, blank_restaurant] {
        let err = h.tracker.record(ana.id, input).await.unwrap_err();
        assert!(matches!(err, SocialError::MissingVisitParams));
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "Missing parameters. A restaurant ID and a rating must be specified."
        );
    }
}

#[tokio::test]
async fn test_record_unknown_restaurant() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let ghost = RestaurantId::new();

    let input = RecordVisit {
        restaurant_id: Some(ghost.to_string()),
        rating: Some(4.0),
        ..Default::default()
    };
    let err = h.tracker.record(ana.id, input).await.unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert_eq!(err.error_code(), "RESTAURANT_NOT_FOUND");
    assert_eq!(err.to_string(), format!("Restaurant {ghost} was not found"));
}

#[tokio::test]
async fn test_record_malformed_restaurant_id_reads_as_unknown() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;

    let input = RecordVisit {
        restaurant_id: Some("pizza".to_string()),
        rating: Some(4.0),
        ..Default::default()
    };
    let err = h.tracker.record(ana.id, input).await.unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert_eq!(err.to_string(), "Restaurant pizza was not found");
}

#[tokio::test]
async fn test_failed_record_leaves_no_side_effects() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;

    let input = RecordVisit {
        restaurant_id: Some(RestaurantId::new().to_string()),
        rating: Some(4.0),
        ..Default::default()
    };
    h.tracker.record(ana.id, input).await.unwrap_err();

    let stored = h.users.find_by_id(ana.id.0).await.unwrap().unwrap();
    assert_eq!(stored.rating, 0.0, "no points for a rejected visit");
    let listed = h.visits.find_by_user(ana.id.0, Page::default()).await.unwrap();
    assert_eq!(listed.total, 0);
}

// ============================================================================
// Listing and Fetching
// ============================================================================

#[tokio::test]
async fn test_list_for_user_newest_first_and_windowed() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let rita = seed_restaurant(&h.restaurants, "Chez Rita", 0.0).await;

    let now = Utc::now();
    for (hours_ago, rating) in [(3, 2.0), (1, 4.0), (2, 3.0)] {
        let input = RecordVisit {
            restaurant_id: Some(rita.id.to_string()),
            rating: Some(rating),
            date: Some(now - Duration::hours(hours_ago)),
            ..Default::default()
        };
        h.tracker.record(ana.id, input).await.unwrap();
    }

    let page = h
        .tracker
        .list_for_user(ana.id, Page::new(Some(0), Some(2)))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].rating, 4.0, "newest visit first");
    assert_eq!(page.items[1].rating, 3.0);
}

#[tokio::test]
async fn test_list_for_user_unknown_user() {
    let h = harness();
    let ghost = UserId::new();

    let err = h
        .tracker
        .list_for_user(ghost, Page::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), format!("User {ghost} was not found"));
}

#[tokio::test]
async fn test_list_for_restaurant_filters_to_that_restaurant() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let rita = seed_restaurant(&h.restaurants, "Chez Rita", 0.0).await;
    let momo = seed_restaurant(&h.restaurants, "Momo Ramen", 0.0).await;

    h.tracker.record(ana.id, visit_at(&rita, 4.0)).await.unwrap();
    h.tracker.record(ana.id, visit_at(&momo, 5.0)).await.unwrap();

    let page = h
        .tracker
        .list_for_restaurant(ana.id, &rita.id.to_string(), Page::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].restaurant_id, rita.id);
}

#[tokio::test]
async fn test_list_for_restaurant_unmatched_id_is_empty_not_an_error() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;

    let malformed = h
        .tracker
        .list_for_restaurant(ana.id, "not-a-uuid", Page::default())
        .await
        .unwrap();
    assert_eq!(malformed.total, 0);
    assert!(malformed.items.is_empty());

    let unknown = h
        .tracker
        .list_for_restaurant(ana.id, &RestaurantId::new().to_string(), Page::default())
        .await
        .unwrap();
    assert_eq!(unknown.total, 0);
}

#[tokio::test]
async fn test_find_visit_roundtrip() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let rita = seed_restaurant(&h.restaurants, "Chez Rita", 0.0).await;

    let recorded = h.tracker.record(ana.id, visit_at(&rita, 4.0)).await.unwrap();
    let fetched = h
        .tracker
        .find_visit(ana.id, &recorded.id.to_string())
        .await
        .unwrap();

    assert_eq!(fetched.id, recorded.id);
    assert_eq!(fetched.rating, 4.0);
}

#[tokio::test]
async fn test_find_visit_unknown_or_malformed_id() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let ghost = Uuid::new_v4();

    let err = h
        .tracker
        .find_visit(ana.id, &ghost.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.error_code(), "VISIT_NOT_FOUND");
    assert_eq!(err.to_string(), format!("Visit {ghost} was not found"));

    let err = h.tracker.find_visit(ana.id, "nope").await.unwrap_err();
    assert_eq!(err.to_string(), "Visit nope was not found");
}

#[tokio::test]
async fn test_find_visit_user_check_wins_over_visit_check() {
    let h = harness();
    let ghost = UserId::new();

    let err = h.tracker.find_visit(ghost, "nope").await.unwrap_err();
    assert_eq!(err.error_code(), "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_find_visit_is_not_scoped_to_owner() {
    let h = harness();
    let ana = seed_user(&h.users, "Ana", "ana@example.com").await;
    let bob = seed_user(&h.users, "Bob", "bob@example.com").await;
    let rita = seed_restaurant(&h.restaurants, "Chez Rita", 0.0).await;

    let recorded = h.tracker.record(ana.id, visit_at(&rita, 4.0)).await.unwrap();

    // Any existing user path can read any visit; only the user's existence
    // is checked.
    let fetched = h
        .tracker
        .find_visit(bob.id, &recorded.id.to_string())
        .await
        .unwrap();
    assert_eq!(fetched.user_id, ana.id);
}
