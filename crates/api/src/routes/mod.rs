pub mod health;
pub mod movies;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /producers/intervals    min/max win-interval aggregation (GET)
/// /upload                 replace the store from an uploaded CSV (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(movies::router())
}
