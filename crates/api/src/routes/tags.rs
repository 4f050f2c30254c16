//! Route definitions for tags.

use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/tags`.
///
/// ```text
/// GET    /                  -> list_tags
/// POST   /                  -> create_tag
/// GET    /{id}              -> get_tag
/// PUT    /{id}              -> rename_tag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_tags).post(tags::create_tag))
        .route("/{id}", get(tags::get_tag).put(tags::rename_tag))
}
