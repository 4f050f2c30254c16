//! Route definitions for cross-idea vote reporting.

use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes mounted at `/votes`.
///
/// ```text
/// GET    /stats             -> vote_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats::vote_stats))
}
