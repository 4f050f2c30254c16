use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hub_core::error::CoreError;
use hub_core::types::DbId;
use hub_core::validation::validate_tag_name;
use hub_db::models::tag::{CreateTag, RenameTag};
use hub_db::repositories::TagRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tags
pub async fn list_tags(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// POST /api/v1/tags
///
/// Idempotent: returns the existing tag when the normalized name is taken.
pub async fn create_tag(
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    validate_tag_name(&input.name)?;
    let tag = TagRepo::create_or_get(&state.pool, &input.name).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// GET /api/v1/tags/{id}
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Tag", id })?;
    Ok(Json(DataResponse { data: tag }))
}

/// PUT /api/v1/tags/{id}
pub async fn rename_tag(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RenameTag>,
) -> AppResult<impl IntoResponse> {
    validate_tag_name(&input.name)?;
    let tag = TagRepo::rename(&state.pool, id, &input.name)
        .await?
        .ok_or(CoreError::NotFound { entity: "Tag", id })?;

    tracing::info!(tag_id = id, name = %tag.name, "Tag renamed");

    Ok(Json(DataResponse { data: tag }))
}
