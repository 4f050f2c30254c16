//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers validate input, delegate to the corresponding repository in
//! `hub_db` and map errors via [`AppError`](crate::error::AppError).

pub mod categories;
pub mod comments;
pub mod ideas;
pub mod stats;
pub mod tags;
pub mod users;
pub mod votes;

use hub_core::error::CoreError;
use hub_core::types::DbId;
use hub_db::repositories::IdeaRepo;
use hub_db::DbPool;

use crate::error::AppResult;

/// Fail with 404 unless the idea exists. Used by nested idea resources.
pub(crate) async fn ensure_idea_exists(pool: &DbPool, idea_id: DbId) -> AppResult<()> {
    IdeaRepo::find_by_id(pool, idea_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Idea",
            id: idea_id,
        })?;
    Ok(())
}
