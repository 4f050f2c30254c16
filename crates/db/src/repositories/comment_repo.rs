//! Repository for the `comments` table.

use sqlx::PgPool;
use hub_core::types::DbId;

use crate::models::comment::{Comment, CommentWithAuthorRow, CreateComment};

/// Column list for `comments` queries.
const COLUMNS: &str = "id, content, idea_id, author_id, created_at";

/// Comment columns joined with the author (`c` and `u` aliases).
const WITH_AUTHOR_COLUMNS: &str = "\
    c.id, c.content, c.idea_id, c.created_at, \
    u.id AS author_id, u.email AS author_email, u.name AS author_name, \
    u.department AS author_department, u.created_at AS author_created_at";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment. An unknown idea or author violates a foreign key.
    pub async fn create(
        pool: &PgPool,
        idea_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (content, idea_id, author_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(&input.content)
            .bind(idea_id)
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    /// Find a comment with its author by comment ID.
    pub async fn find_with_author(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CommentWithAuthorRow>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_AUTHOR_COLUMNS} \
             FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.id = $1"
        );
        sqlx::query_as::<_, CommentWithAuthorRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the comments on an idea, oldest first.
    pub async fn list_for_idea(
        pool: &PgPool,
        idea_id: DbId,
    ) -> Result<Vec<CommentWithAuthorRow>, sqlx::Error> {
        Self::comments_for_ideas(pool, &[idea_id]).await
    }

    /// Batch-load the comments of several ideas, oldest first per idea.
    pub async fn comments_for_ideas(
        pool: &PgPool,
        idea_ids: &[DbId],
    ) -> Result<Vec<CommentWithAuthorRow>, sqlx::Error> {
        if idea_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {WITH_AUTHOR_COLUMNS} \
             FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.idea_id = ANY($1) \
             ORDER BY c.idea_id, c.created_at, c.id"
        );
        sqlx::query_as::<_, CommentWithAuthorRow>(&query)
            .bind(idea_ids)
            .fetch_all(pool)
            .await
    }
}
