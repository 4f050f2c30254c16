//! Repository for the `tags` and `idea_tags` tables.
//!
//! Tag names are normalized (trimmed, lowercased) before every write and
//! lookup, so `"Park "` and `"park"` are the same tag.

use sqlx::{PgPool, Postgres, Transaction};
use hub_core::types::DbId;
use hub_core::validation::{dedup_tag_names, normalize_tag_name};

use crate::models::tag::{IdeaTagRow, Tag};

/// Column list for `tags` queries.
const COLUMNS: &str = "id, name, created_at";

/// Provides CRUD operations for tags and idea-tag associations.
pub struct TagRepo;

impl TagRepo {
    /// Create a tag or return the existing one with the same normalized name.
    pub async fn create_or_get(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let tag = Self::create_or_get_in(&mut tx, name).await?;
        tx.commit().await?;
        Ok(tag)
    }

    /// Transactional variant of [`create_or_get`](Self::create_or_get).
    ///
    /// The no-op `DO UPDATE` makes `RETURNING` yield the existing row on
    /// conflict.
    pub async fn create_or_get_in(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(normalize_tag_name(name))
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a tag by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tags alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags ORDER BY name");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Rename a tag. Returns `None` if the tag does not exist; renaming onto
    /// an existing name violates `uq_tags_name`.
    pub async fn rename(pool: &PgPool, id: DbId, name: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("UPDATE tags SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(normalize_tag_name(name))
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Idea associations
    // -----------------------------------------------------------------------

    /// Load the tags of several ideas at once, ordered by idea then name.
    pub async fn tags_for_ideas(
        pool: &PgPool,
        idea_ids: &[DbId],
    ) -> Result<Vec<IdeaTagRow>, sqlx::Error> {
        if idea_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, IdeaTagRow>(
            "SELECT it.idea_id, t.id, t.name, t.created_at \
             FROM idea_tags it \
             JOIN tags t ON t.id = it.tag_id \
             WHERE it.idea_id = ANY($1) \
             ORDER BY it.idea_id, t.name",
        )
        .bind(idea_ids)
        .fetch_all(pool)
        .await
    }

    /// Replace the full tag set of an idea, creating tags on first use.
    ///
    /// Names are deduplicated after normalization. Returns the attached tags
    /// in the order given.
    pub async fn replace_idea_tags(
        tx: &mut Transaction<'_, Postgres>,
        idea_id: DbId,
        names: &[String],
    ) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query("DELETE FROM idea_tags WHERE idea_id = $1")
            .bind(idea_id)
            .execute(&mut **tx)
            .await?;

        let mut tags = Vec::new();
        for name in dedup_tag_names(names) {
            let tag = Self::create_or_get_in(tx, &name).await?;
            sqlx::query("INSERT INTO idea_tags (idea_id, tag_id) VALUES ($1, $2)")
                .bind(idea_id)
                .bind(tag.id)
                .execute(&mut **tx)
                .await?;
            tags.push(tag);
        }
        Ok(tags)
    }
}
