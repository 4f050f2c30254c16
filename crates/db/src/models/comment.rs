//! Comment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use hub_core::types::{DbId, Timestamp};

use crate::models::user::User;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub content: String,
    pub idea_id: DbId,
    pub author_id: DbId,
    pub created_at: Timestamp,
}

/// A comment joined with its author's columns (prefixed `author_`).
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthorRow {
    pub id: DbId,
    pub content: String,
    pub idea_id: DbId,
    pub created_at: Timestamp,
    pub author_id: DbId,
    pub author_email: String,
    pub author_name: String,
    pub author_department: Option<String>,
    pub author_created_at: Timestamp,
}

/// DTO for commenting on an idea. The idea comes from the path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 3, max = 1000))]
    pub content: String,
    pub author_id: DbId,
}

/// A comment with its author resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: DbId,
    pub content: String,
    pub idea_id: DbId,
    pub author: User,
    pub created_at: Timestamp,
}

impl From<CommentWithAuthorRow> for CommentResponse {
    fn from(row: CommentWithAuthorRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            idea_id: row.idea_id,
            author: User {
                id: row.author_id,
                email: row.author_email,
                name: row.author_name,
                department: row.author_department,
                created_at: row.author_created_at,
            },
            created_at: row.created_at,
        }
    }
}
