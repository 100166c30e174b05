//! Property-based tests for the running mean rating fold

use proptest::prelude::*;

use munch_types::{Location, OpeningHours, Restaurant, RestaurantId};

fn restaurant_rated(rating: f64) -> Restaurant {
    Restaurant {
        id: RestaurantId::new(),
        name: "Chez Rita".to_string(),
        place_id: None,
        address: "42 Grande Allee".to_string(),
        tel: None,
        location: Location {
            latitude: 46.81,
            longitude: -71.23,
        },
        opening_hours: OpeningHours::default(),
        pictures: Vec::new(),
        genres: Vec::new(),
        price_range: 2,
        rating,
    }
}

/// Fold a sequence of visit ratings the way the tracker does: one
/// read-modify-write per visit, count taken after each insert.
fn fold_ratings(seed: f64, ratings: &[f64]) -> f64 {
    let mut restaurant = restaurant_rated(seed);
    for (already_recorded, rating) in ratings.iter().enumerate() {
        restaurant.rating = restaurant.rating_after_visit(already_recorded as u64, *rating);
    }
    restaurant.rating
}

// ============================================================================
// Strategies
// ============================================================================

fn arb_visit_rating() -> impl Strategy<Value = f64> {
    1.0..=5.0f64
}

fn arb_wild_rating() -> impl Strategy<Value = f64> {
    -50.0..=50.0f64
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_rating_stays_bounded_for_any_input(
        seed in -50.0..=50.0f64,
        ratings in prop::collection::vec(arb_wild_rating(), 1..40),
    ) {
        let mut restaurant = restaurant_rated(seed);
        for (already_recorded, rating) in ratings.iter().enumerate() {
            restaurant.rating = restaurant.rating_after_visit(already_recorded as u64, *rating);
            prop_assert!(
                (Restaurant::MIN_RATING..=Restaurant::MAX_RATING).contains(&restaurant.rating),
                "rating {} escaped the scale", restaurant.rating
            );
        }
    }

    #[test]
    fn prop_first_visit_replaces_any_seed(
        seed in -50.0..=50.0f64,
        rating in arb_visit_rating(),
    ) {
        let restaurant = restaurant_rated(seed);
        prop_assert_eq!(restaurant.rating_after_visit(0, rating), rating);
    }

    #[test]
    fn prop_fold_equals_arithmetic_mean(
        seed in 0.0..=5.0f64,
        ratings in prop::collection::vec(arb_visit_rating(), 1..40),
    ) {
        let folded = fold_ratings(seed, &ratings);
        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        // The first visit discards the seed, so the fold is exactly the
        // mean of the visits, up to float accumulation error.
        prop_assert!((folded - mean).abs() < 1e-6, "folded {folded}, mean {mean}");
    }

    #[test]
    fn prop_identical_ratings_are_a_fixed_point(
        rating in arb_visit_rating(),
        count in 1usize..30,
    ) {
        let folded = fold_ratings(0.0, &vec![rating; count]);
        prop_assert!((folded - rating).abs() < 1e-9);
    }
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_out_of_scale_visit_is_clamped() {
    let restaurant = restaurant_rated(0.0);
    assert_eq!(restaurant.rating_after_visit(0, 100.0), Restaurant::MAX_RATING);
    assert_eq!(restaurant.rating_after_visit(0, -3.0), Restaurant::MIN_RATING);
}

#[test]
fn test_clamped_history_keeps_later_means_in_scale() {
    // A wildly rated first visit saturates at 5; later ordinary visits pull
    // the mean back inside the scale instead of inheriting the excess.
    let folded = fold_ratings(0.0, &[100.0, 1.0]);
    assert_eq!(folded, 3.0);
}
