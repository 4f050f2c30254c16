use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hub_core::error::CoreError;
use hub_core::types::DbId;
use hub_db::models::vote::CastVote;
use hub_db::repositories::VoteRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::ensure_idea_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/ideas/{id}/votes
pub async fn list_votes(
    State(state): State<AppState>,
    Path(idea_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_idea_exists(&state.pool, idea_id).await?;
    let votes = VoteRepo::list_for_idea(&state.pool, idea_id).await?;
    Ok(Json(DataResponse { data: votes }))
}

/// POST /api/v1/ideas/{id}/votes
///
/// One vote per user and idea; a repeat vote is a 409 and leaves the
/// counter unchanged.
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(idea_id): Path<DbId>,
    Json(input): Json<CastVote>,
) -> AppResult<impl IntoResponse> {
    let vote = VoteRepo::cast(&state.pool, idea_id, input.user_id).await?;

    tracing::info!(idea_id, user_id = input.user_id, "Vote cast");

    Ok((StatusCode::CREATED, Json(DataResponse { data: vote })))
}

/// DELETE /api/v1/ideas/{id}/votes/{user_id}
pub async fn retract_vote(
    State(state): State<AppState>,
    Path((idea_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !VoteRepo::retract(&state.pool, idea_id, user_id).await? {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Vote",
            key: format!("idea {idea_id}, user {user_id}"),
        }));
    }

    tracing::info!(idea_id, user_id, "Vote retracted");

    Ok(StatusCode::NO_CONTENT)
}
