//! Handlers for the idea resource.
//!
//! Every response carries the fully resolved idea: submitter, category,
//! tags and comments with their authors.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hub_core::error::CoreError;
use hub_core::types::DbId;
use hub_core::validation::{validate_input, validate_tag_names};
use hub_db::models::idea::{CreateIdea, IdeaFilter, IdeaResponse, RecordAnalysis, UpdateIdea};
use hub_db::repositories::IdeaRepo;
use hub_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/ideas
///
/// Filters: `status`, `type`, `priority`, `target_group`, `category_id`,
/// `submitter_id`, `tag`, `search`. Pagination: `skip`, `limit`.
pub async fn list_ideas(
    State(state): State<AppState>,
    Query(filter): Query<IdeaFilter>,
) -> AppResult<impl IntoResponse> {
    validate_input(&filter)?;
    let ideas = IdeaRepo::list(&state.pool, &filter).await?;
    let data = IdeaRepo::load_details(&state.pool, ideas).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/ideas
///
/// The submitter is looked up by `submitter_email`; an unknown email is a
/// 404. New ideas always start in status `new`.
pub async fn create_idea(
    State(state): State<AppState>,
    Json(input): Json<CreateIdea>,
) -> AppResult<impl IntoResponse> {
    merge_violations(validate_input(&input), validate_tag_names(&input.tags))?;

    let idea = IdeaRepo::create(&state.pool, &input).await?;

    tracing::info!(
        idea_id = idea.id,
        submitter_id = idea.submitter_id,
        idea_type = %idea.idea_type,
        "Idea submitted",
    );

    let detail = resolved(&state.pool, idea.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/ideas/{id}
pub async fn get_idea(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = resolved(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/ideas/{id}
///
/// Partial update. A status change must follow the review lifecycle;
/// `tags`, when present, replaces the tag set.
pub async fn update_idea(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIdea>,
) -> AppResult<impl IntoResponse> {
    let tags = input.tags.as_deref().unwrap_or_default();
    merge_violations(validate_input(&input), validate_tag_names(tags))?;

    IdeaRepo::update(&state.pool, id, &input).await?;

    let detail = resolved(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/ideas/{id}
///
/// Votes, comments and tag attachments are removed with the idea.
pub async fn delete_idea(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !IdeaRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Idea", id }));
    }

    tracing::info!(idea_id = id, "Idea deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/ideas/{id}/analysis
///
/// Written by the AI pipeline. Confidences must lie in `[0, 1]`.
pub async fn record_analysis(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RecordAnalysis>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    IdeaRepo::record_analysis(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Idea", id })?;

    tracing::debug!(idea_id = id, "Analysis recorded");

    let detail = resolved(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

async fn resolved(pool: &DbPool, id: DbId) -> AppResult<IdeaResponse> {
    IdeaRepo::find_detail(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Idea", id }))
}

/// Combine two validation results so the caller sees every violation at once.
fn merge_violations(
    first: Result<(), CoreError>,
    second: Result<(), CoreError>,
) -> Result<(), CoreError> {
    match (first, second) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(CoreError::InvalidFields(mut a)), Err(CoreError::InvalidFields(b))) => {
            a.extend(b);
            Err(CoreError::InvalidFields(a))
        }
        (Err(e), _) | (Ok(()), Err(e)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use hub_core::validation::FieldViolation;

    fn invalid(field: &str) -> Result<(), CoreError> {
        Err(CoreError::InvalidFields(vec![FieldViolation::new(
            field, "length", "too short",
        )]))
    }

    #[test]
    fn merge_keeps_every_violation() {
        let merged = merge_violations(invalid("title"), invalid("tags[0]"));
        let fields = assert_matches!(merged, Err(CoreError::InvalidFields(v)) => v);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].field, "tags[0]");
    }

    #[test]
    fn merge_passes_single_failure_through() {
        assert!(merge_violations(Ok(()), Ok(())).is_ok());
        assert_matches!(merge_violations(Ok(()), invalid("tags[1]")), Err(_));
    }
}
