use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hub_core::error::CoreError;
use hub_core::types::DbId;
use hub_core::validation::validate_input;
use hub_db::models::comment::{CommentResponse, CreateComment};
use hub_db::repositories::CommentRepo;

use crate::error::AppResult;
use crate::handlers::ensure_idea_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/ideas/{id}/comments
///
/// Oldest first, each with its author.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(idea_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_idea_exists(&state.pool, idea_id).await?;
    let comments: Vec<CommentResponse> = CommentRepo::list_for_idea(&state.pool, idea_id)
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/ideas/{id}/comments
///
/// An unknown `author_id` is a 404.
pub async fn create_comment(
    State(state): State<AppState>,
    Path(idea_id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    ensure_idea_exists(&state.pool, idea_id).await?;

    let comment = CommentRepo::create(&state.pool, idea_id, &input).await?;
    let resolved = CommentRepo::find_with_author(&state.pool, comment.id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Comment",
            id: comment.id,
        })?;

    tracing::info!(comment_id = comment.id, idea_id, author_id = input.author_id, "Comment added");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CommentResponse::from(resolved),
        }),
    ))
}
