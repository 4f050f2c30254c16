//! Route definitions for ideas and their comments and votes.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::{comments, ideas, stats, votes};
use crate::state::AppState;

/// Routes mounted at `/ideas`.
///
/// ```text
/// GET    /                          -> list_ideas
/// POST   /                          -> create_idea
/// GET    /stats                     -> idea_stats
/// GET    /{id}                      -> get_idea
/// PUT    /{id}                      -> update_idea
/// DELETE /{id}                      -> delete_idea
/// PUT    /{id}/analysis             -> record_analysis
/// GET    /{id}/comments             -> list_comments
/// POST   /{id}/comments             -> create_comment
/// GET    /{id}/votes                -> list_votes
/// POST   /{id}/votes                -> cast_vote
/// DELETE /{id}/votes/{user_id}      -> retract_vote
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ideas::list_ideas).post(ideas::create_idea))
        .route("/stats", get(stats::idea_stats))
        .route(
            "/{id}",
            get(ideas::get_idea)
                .put(ideas::update_idea)
                .delete(ideas::delete_idea),
        )
        .route("/{id}/analysis", put(ideas::record_analysis))
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/{id}/votes", get(votes::list_votes).post(votes::cast_vote))
        .route("/{id}/votes/{user_id}", delete(votes::retract_vote))
}
