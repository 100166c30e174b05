//! Restaurant catalog handlers
//!
//! The catalog is read-only here; ratings change only through recorded
//! visits.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use munch_db::RestaurantFilter;
use munch_types::{Location, Page, Paged, Restaurant, RestaurantId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RestaurantListQuery {
    /// Case-insensitive name substring
    pub q: Option<String>,
    /// Comma-separated genres, any-of
    pub genres: Option<String>,
    /// Comma-separated price ranges, any-of
    pub price_range: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl RestaurantListQuery {
    fn into_filter(self) -> RestaurantFilter {
        let genres = self.genres.map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|genre| !genre.is_empty())
                .map(str::to_string)
                .collect()
        });
        let price_ranges = self.price_range.map(|raw| {
            raw.split(',')
                .filter_map(|range| range.trim().parse::<i32>().ok())
                .collect()
        });
        // The bounding box needs both coordinates; a lone one is ignored
        let near = match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Some(Location {
                latitude,
                longitude,
            }),
            _ => None,
        };

        RestaurantFilter {
            name_contains: self.q,
            genres,
            price_ranges,
            near,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /restaurants
pub async fn list_restaurants(
    State(state): State<AppState>,
    Query(query): Query<RestaurantListQuery>,
) -> ApiResult<Json<Paged<Restaurant>>> {
    let page = Page::new(query.page, query.limit);
    let filter = query.into_filter();

    let restaurants = state.repos.restaurants.search(&filter, page).await?;
    Ok(Json(restaurants))
}

/// GET /restaurants/{id}
pub async fn find_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Restaurant>> {
    let not_found = || ApiError::RestaurantNotFound { id: id.clone() };

    let restaurant_id = RestaurantId::parse(&id).map_err(|_| not_found())?;
    let restaurant = state
        .repos
        .restaurants
        .find_by_id(restaurant_id.0)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(restaurant))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> RestaurantListQuery {
        RestaurantListQuery {
            q: None,
            genres: None,
            price_range: None,
            lon: None,
            lat: None,
            page: None,
            limit: None,
        }
    }

    #[test]
    fn test_csv_filters_parse() {
        let filter = RestaurantListQuery {
            genres: Some("italian, sushi,,".to_string()),
            price_range: Some("1,2,cheap,3".to_string()),
            ..query()
        }
        .into_filter();

        assert_eq!(
            filter.genres,
            Some(vec!["italian".to_string(), "sushi".to_string()])
        );
        assert_eq!(filter.price_ranges, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_bounding_box_needs_both_coordinates() {
        let lone = RestaurantListQuery {
            lat: Some(46.8),
            ..query()
        }
        .into_filter();
        assert!(lone.near.is_none());

        let both = RestaurantListQuery {
            lat: Some(46.8),
            lon: Some(-71.2),
            ..query()
        }
        .into_filter();
        let near = both.near.unwrap();
        assert_eq!(near.latitude, 46.8);
        assert_eq!(near.longitude, -71.2);
    }
}
