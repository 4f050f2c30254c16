//! Route definitions for idea categories.

use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /                  -> list_categories
/// POST   /                  -> create_category
/// GET    /{id}              -> get_category
/// PUT    /{id}              -> update_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/{id}",
            get(categories::get_category).put(categories::update_category),
        )
}
