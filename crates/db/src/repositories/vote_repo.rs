//! Repository for the `votes` table.
//!
//! Every insert or delete of a vote row adjusts `ideas.vote_count` in the
//! same transaction, with the idea row locked, so the stored counter always
//! equals the number of vote rows.

use sqlx::{PgExecutor, PgPool};
use hub_core::error::CoreError;
use hub_core::types::DbId;
use hub_core::vote_stats::{build_vote_report, IdeaTally, VoteRecord, VoteReport};

use crate::error::RepoError;
use crate::models::vote::{Vote, VoteListingRow};

/// Column list for `votes` queries.
const COLUMNS: &str = "id, idea_id, user_id, created_at";

/// Provides vote casting, retraction and listing.
pub struct VoteRepo;

impl VoteRepo {
    /// Cast a vote by `user_id` on `idea_id`.
    ///
    /// Fails with `NotFound` for an unknown idea or user and with `Conflict`
    /// if the user has already voted on the idea; in both cases the counter
    /// is untouched.
    pub async fn cast(pool: &PgPool, idea_id: DbId, user_id: DbId) -> Result<Vote, RepoError> {
        let mut tx = pool.begin().await?;

        let idea: Option<DbId> = sqlx::query_scalar("SELECT id FROM ideas WHERE id = $1 FOR UPDATE")
            .bind(idea_id)
            .fetch_optional(&mut *tx)
            .await?;
        if idea.is_none() {
            return Err(CoreError::NotFound { entity: "Idea", id: idea_id }.into());
        }

        let user_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        if !user_exists {
            return Err(CoreError::NotFound { entity: "User", id: user_id }.into());
        }

        let query = format!(
            "INSERT INTO votes (idea_id, user_id) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_votes_idea_user DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let vote = sqlx::query_as::<_, Vote>(&query)
            .bind(idea_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict(format!("User {user_id} has already voted on idea {idea_id}"))
            })?;

        sqlx::query("UPDATE ideas SET vote_count = vote_count + 1 WHERE id = $1")
            .bind(idea_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(idea_id, user_id, "Vote cast");
        Ok(vote)
    }

    /// Retract the vote of `user_id` on `idea_id`.
    ///
    /// Returns `false` (and leaves the counter alone) if there was no such
    /// vote.
    pub async fn retract(pool: &PgPool, idea_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM ideas WHERE id = $1 FOR UPDATE")
            .bind(idea_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM votes WHERE idea_id = $1 AND user_id = $2")
            .bind(idea_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted > 0 {
            sqlx::query("UPDATE ideas SET vote_count = vote_count - $2 WHERE id = $1")
                .bind(idea_id)
                .bind(deleted as i32)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(deleted > 0)
    }

    /// List the votes on an idea, oldest first.
    pub async fn list_for_idea(pool: &PgPool, idea_id: DbId) -> Result<Vec<Vote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM votes WHERE idea_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Vote>(&query)
            .bind(idea_id)
            .fetch_all(pool)
            .await
    }

    /// Every vote joined with its idea title, oldest first.
    pub async fn list_all_with_titles<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<VoteRecord>, sqlx::Error> {
        let rows = sqlx::query_as::<_, VoteListingRow>(
            "SELECT v.id AS vote_id, v.idea_id, v.user_id, i.title AS idea_title, v.created_at \
             FROM votes v JOIN ideas i ON i.id = v.idea_id \
             ORDER BY v.created_at, v.id",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().map(VoteRecord::from).collect())
    }

    /// Stored vote counters of every idea.
    pub async fn tallies<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<IdeaTally>, sqlx::Error> {
        let rows: Vec<(DbId, String, i32)> =
            sqlx::query_as("SELECT id, title, vote_count FROM ideas ORDER BY id")
                .fetch_all(executor)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(idea_id, title, vote_count)| IdeaTally {
                idea_id,
                title,
                vote_count,
            })
            .collect())
    }

    /// Total number of vote rows.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM votes")
            .fetch_one(pool)
            .await
    }

    /// Build the vote statistics report from the current tables.
    ///
    /// Both reads share one snapshot so a concurrent vote cannot show up as
    /// counter drift.
    pub async fn report(pool: &PgPool) -> Result<VoteReport, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        let votes = Self::list_all_with_titles(&mut *tx).await?;
        let tallies = Self::tallies(&mut *tx).await?;
        tx.commit().await?;

        let report = build_vote_report(votes, tallies);
        if !report.inconsistent_ideas.is_empty() {
            tracing::warn!(
                ideas = ?report.inconsistent_ideas,
                "Stored vote counters disagree with vote rows",
            );
        }
        Ok(report)
    }
}
