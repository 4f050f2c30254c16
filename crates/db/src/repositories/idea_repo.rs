//! Repository for the `ideas` table.
//!
//! Creation and editing touch several tables (tags, the idea-tag junction)
//! and enforce lifecycle rules, so those methods run in one transaction and
//! return [`RepoError`].

use std::collections::HashMap;

use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use hub_core::error::CoreError;
use hub_core::idea::{validate_status_transition, IdeaStatus};
use hub_core::types::DbId;

use crate::error::RepoError;
use crate::models::comment::CommentResponse;
use crate::models::idea::{
    clamp_limit, CreateIdea, Idea, IdeaFilter, IdeaResponse, RecordAnalysis, UpdateIdea,
};
use crate::models::tag::Tag;
use crate::repositories::{CategoryRepo, CommentRepo, TagRepo, UserRepo};

/// Column list for `ideas` queries.
pub(crate) const COLUMNS: &str = "\
    id, title, description, type, status, priority, target_group, \
    ai_sentiment, ai_confidence, ai_analysis_notes, \
    service_recommendation, service_confidence, service_reasoning, \
    matching_services, development_impact, \
    vote_count, submitter_id, category_id, created_at, updated_at";

/// Provides CRUD operations for ideas.
pub struct IdeaRepo;

impl IdeaRepo {
    /// Submit a new idea.
    ///
    /// The submitter is resolved by email and the category, when given, must
    /// exist. Tags are created on first use and attached in the same
    /// transaction, so a failure leaves nothing behind.
    pub async fn create(pool: &PgPool, input: &CreateIdea) -> Result<Idea, RepoError> {
        let mut tx = pool.begin().await?;

        let email = input.submitter_email.trim();
        let submitter_id: Option<DbId> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *tx)
            .await?;
        let submitter_id = submitter_id.ok_or_else(|| CoreError::NotFoundByKey {
            entity: "User",
            key: email.to_string(),
        })?;

        if let Some(category_id) = input.category_id {
            ensure_category_exists(&mut tx, category_id).await?;
        }

        let query = format!(
            "INSERT INTO ideas \
                (title, description, type, status, priority, target_group, \
                 submitter_id, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let idea = sqlx::query_as::<_, Idea>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.idea_type)
            .bind(IdeaStatus::default())
            .bind(input.priority.unwrap_or_default())
            .bind(input.target_group)
            .bind(submitter_id)
            .bind(input.category_id)
            .fetch_one(&mut *tx)
            .await?;

        if !input.tags.is_empty() {
            TagRepo::replace_idea_tags(&mut tx, idea.id, &input.tags).await?;
        }

        tx.commit().await?;
        tracing::debug!(idea_id = idea.id, submitter_id, "Idea created");
        Ok(idea)
    }

    /// Find an idea by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ideas WHERE id = $1");
        sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List ideas matching `filter`, newest first.
    ///
    /// Every filter is optional; `search` is a case-insensitive substring
    /// match on title or description with LIKE wildcards escaped.
    pub async fn list(pool: &PgPool, filter: &IdeaFilter) -> Result<Vec<Idea>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ideas \
             WHERE ($1::text IS NULL OR status = $1) \
               AND ($2::text IS NULL OR type = $2) \
               AND ($3::text IS NULL OR priority = $3) \
               AND ($4::text IS NULL OR target_group = $4) \
               AND ($5::bigint IS NULL OR category_id = $5) \
               AND ($6::bigint IS NULL OR submitter_id = $6) \
               AND ($7::text IS NULL OR EXISTS ( \
                    SELECT 1 FROM idea_tags it JOIN tags t ON t.id = it.tag_id \
                    WHERE it.idea_id = ideas.id AND t.name = $7)) \
               AND ($8::text IS NULL OR title ILIKE $8 OR description ILIKE $8) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $9 OFFSET $10"
        );
        let tag = filter
            .tag
            .as_deref()
            .map(hub_core::validation::normalize_tag_name);
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        sqlx::query_as::<_, Idea>(&query)
            .bind(filter.status)
            .bind(filter.idea_type)
            .bind(filter.priority)
            .bind(filter.target_group)
            .bind(filter.category_id)
            .bind(filter.submitter_id)
            .bind(tag)
            .bind(search)
            .bind(clamp_limit(filter.limit))
            .bind(filter.skip.max(0))
            .fetch_all(pool)
            .await
    }

    /// Edit an idea. Only non-`None` fields in `input` are applied and
    /// `updated_at` is stamped.
    ///
    /// The row is locked while a status change is checked against the
    /// current status. `tags`, when present, replaces the tag set.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateIdea) -> Result<Idea, RepoError> {
        let mut tx = pool.begin().await?;

        let current: Option<IdeaStatus> =
            sqlx::query_scalar("SELECT status FROM ideas WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let current = current.ok_or(CoreError::NotFound { entity: "Idea", id })?;

        if let Some(target) = input.status {
            validate_status_transition(current, target)?;
        }
        if let Some(category_id) = input.category_id {
            ensure_category_exists(&mut tx, category_id).await?;
        }

        let query = format!(
            "UPDATE ideas SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                type = COALESCE($4, type), \
                status = COALESCE($5, status), \
                priority = COALESCE($6, priority), \
                target_group = COALESCE($7, target_group), \
                category_id = COALESCE($8, category_id), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let idea = sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.idea_type)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.target_group)
            .bind(input.category_id)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(tags) = &input.tags {
            TagRepo::replace_idea_tags(&mut tx, id, tags).await?;
        }

        tx.commit().await?;
        if input.status.is_some_and(|s| s != current) {
            tracing::info!(idea_id = id, from = %current, to = %idea.status, "Idea status changed");
        }
        Ok(idea)
    }

    /// Store AI analysis and service-mapping results. Only the fields
    /// present are overwritten.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn record_analysis(
        pool: &PgPool,
        id: DbId,
        input: &RecordAnalysis,
    ) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!(
            "UPDATE ideas SET \
                ai_sentiment = COALESCE($2, ai_sentiment), \
                ai_confidence = COALESCE($3, ai_confidence), \
                ai_analysis_notes = COALESCE($4, ai_analysis_notes), \
                service_recommendation = COALESCE($5, service_recommendation), \
                service_confidence = COALESCE($6, service_confidence), \
                service_reasoning = COALESCE($7, service_reasoning), \
                matching_services = COALESCE($8, matching_services), \
                development_impact = COALESCE($9, development_impact), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .bind(&input.ai_sentiment)
            .bind(input.ai_confidence)
            .bind(&input.ai_analysis_notes)
            .bind(input.service_recommendation)
            .bind(input.service_confidence)
            .bind(&input.service_reasoning)
            .bind(input.matching_services.clone().map(Json))
            .bind(input.development_impact)
            .fetch_optional(pool)
            .await
    }

    /// Delete an idea. Votes, comments and tag attachments go with it
    /// through `ON DELETE CASCADE`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ideas WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of ideas.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM ideas")
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Resolved responses
    // -----------------------------------------------------------------------

    /// Find an idea and resolve all of its relations.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<IdeaResponse>, RepoError> {
        let Some(idea) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        Ok(Self::load_details(pool, vec![idea]).await?.pop())
    }

    /// Resolve submitters, categories, tags and comments for a page of
    /// ideas with one query per relation. Order is preserved.
    pub async fn load_details(
        pool: &PgPool,
        ideas: Vec<Idea>,
    ) -> Result<Vec<IdeaResponse>, RepoError> {
        if ideas.is_empty() {
            return Ok(Vec::new());
        }

        let idea_ids: Vec<DbId> = ideas.iter().map(|i| i.id).collect();
        let mut submitter_ids: Vec<DbId> = ideas.iter().map(|i| i.submitter_id).collect();
        submitter_ids.sort_unstable();
        submitter_ids.dedup();
        let mut category_ids: Vec<DbId> = ideas.iter().filter_map(|i| i.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let users: HashMap<_, _> = UserRepo::find_by_ids(pool, &submitter_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let categories: HashMap<_, _> = CategoryRepo::find_by_ids(pool, &category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut tags: HashMap<DbId, Vec<Tag>> = HashMap::new();
        for row in TagRepo::tags_for_ideas(pool, &idea_ids).await? {
            tags.entry(row.idea_id).or_default().push(row.into());
        }

        let mut comments: HashMap<DbId, Vec<CommentResponse>> = HashMap::new();
        for row in CommentRepo::comments_for_ideas(pool, &idea_ids).await? {
            comments.entry(row.idea_id).or_default().push(row.into());
        }

        ideas
            .into_iter()
            .map(|idea| {
                let submitter = users.get(&idea.submitter_id).cloned().ok_or_else(|| {
                    CoreError::Internal(format!(
                        "Submitter {} of idea {} is missing",
                        idea.submitter_id, idea.id
                    ))
                })?;
                let category = idea.category_id.and_then(|id| categories.get(&id).cloned());
                let idea_tags = tags.remove(&idea.id).unwrap_or_default();
                let idea_comments = comments.remove(&idea.id).unwrap_or_default();
                Ok(IdeaResponse::assemble(
                    idea,
                    submitter,
                    category,
                    idea_tags,
                    idea_comments,
                ))
            })
            .collect()
    }
}

async fn ensure_category_exists(
    tx: &mut Transaction<'_, Postgres>,
    category_id: DbId,
) -> Result<(), RepoError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(category_id)
        .fetch_one(&mut **tx)
        .await?;
    if exists {
        Ok(())
    } else {
        Err(CoreError::NotFound {
            entity: "Category",
            id: category_id,
        }
        .into())
    }
}

/// Escape `%`, `_` and the escape character itself for use in a LIKE pattern.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
