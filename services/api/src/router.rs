//! Router assembly
//!
//! Two route groups share one middleware stack: the public session surface
//! and everything behind the token verification middleware. Health routes
//! sit outside the stack so probes never wait on the request timeout.

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::auth;
use crate::handlers;
use crate::state::AppState;

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout();

    // Session surface. Token extraction still runs here, so /token and
    // /logout can see a candidate without requiring one.
    let public = Router::new()
        .route("/", get(handlers::get_home))
        .route("/status", get(handlers::get_status))
        .route("/login", post(handlers::login))
        .route("/signup", post(handlers::signup))
        .route("/logout", post(handlers::logout))
        .route("/token", get(handlers::get_token));

    // Everything else resolves a principal first
    let protected = Router::new()
        .route("/tokenInfo", get(handlers::token_info))
        // User directory and follow graph
        .route("/users", get(handlers::list_users))
        .route("/users/{id}", get(handlers::find_user))
        .route("/follow", post(handlers::follow))
        .route("/follow/{id}", delete(handlers::unfollow))
        // Visits
        .route(
            "/users/{id}/restaurants/visits",
            get(handlers::list_visits).post(handlers::record_visit),
        )
        .route(
            "/users/{id}/restaurants/visits/{visit_id}",
            get(handlers::find_visit),
        )
        .route(
            "/users/{id}/restaurants/{restaurant_id}/visits",
            get(handlers::list_restaurant_visits),
        )
        // Restaurant catalog
        .route("/restaurants", get(handlers::list_restaurants))
        .route("/restaurants/{id}", get(handlers::find_restaurant))
        // Favorite lists
        .route(
            "/favorites",
            get(handlers::list_favorites).post(handlers::create_favorite_list),
        )
        .route(
            "/favorites/{id}",
            get(handlers::find_favorite_list)
                .put(handlers::rename_favorite_list)
                .delete(handlers::delete_favorite_list),
        )
        .route(
            "/favorites/{id}/restaurants",
            post(handlers::add_restaurant),
        )
        .route(
            "/favorites/{id}/restaurants/{restaurant_id}",
            delete(handlers::remove_restaurant),
        )
        .route("/users/{id}/favorites", get(handlers::user_favorite_lists))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready));

    // Build middleware stack (order matters - outermost first)
    let middleware_stack = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout
        .layer(TimeoutLayer::new(request_timeout))
        // Token extraction (innermost - every route sees the candidate)
        .layer(middleware::from_fn(auth::attach_token));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(middleware_stack)
        .merge(health_routes) // Health routes without timeout
        .with_state(state)
}
