use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use hub_db::SchemaStatus;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable or behind the
    /// embedded migrations.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Absent when the database could not be queried.
    pub schema: Option<SchemaStatus>,
}

/// GET /health -- service, database and schema health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let schema = match hub_db::schema_status(&state.pool).await {
        Ok(schema) => Some(schema),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not read schema status");
            None
        }
    };
    let db_healthy = schema.is_some();
    let up_to_date = schema.as_ref().is_some_and(|s| s.up_to_date);

    Json(HealthResponse {
        status: if db_healthy && up_to_date { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        schema,
    })
}

/// Mount health check routes at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
