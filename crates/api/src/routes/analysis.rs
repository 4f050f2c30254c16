//! Route definitions for the service-mapping overview.

use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes mounted at `/analysis`.
///
/// ```text
/// GET    /overview          -> analysis_overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/overview", get(stats::analysis_overview))
}
