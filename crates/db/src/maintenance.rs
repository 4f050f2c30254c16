//! Destructive database maintenance: reset, reseed and first-run setup.
//!
//! Every entry point runs in one transaction that first takes a
//! transaction-scoped advisory lock, so concurrent runs (two admin
//! invocations, or the API auto-setup racing the CLI) serialize. A second
//! caller blocks until the first commits and then sees its result.

use serde::Serialize;
use sqlx::{PgConnection, PgPool};

pub use crate::seed::{create_seed_data, SEED_IDEA_COUNT};

/// PostgreSQL advisory lock ID for maintenance operations.
pub const MAINTENANCE_LOCK_ID: i64 = 482_915_067;

/// Tables cleared by [`reset_database`], children before parents.
const RESET_ORDER: &[&str] = &[
    "votes",
    "comments",
    "idea_tags",
    "ideas",
    "users",
    "categories",
    "tags",
];

/// Result of [`setup_database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SetupOutcome {
    /// Ideas already existed; nothing was changed.
    AlreadyInitialized { idea_count: i64 },
    /// The database was empty and has been seeded.
    Seeded { idea_count: i64 },
}

impl SetupOutcome {
    pub fn idea_count(self) -> i64 {
        match self {
            Self::AlreadyInitialized { idea_count } | Self::Seeded { idea_count } => idea_count,
        }
    }
}

/// Delete every row of every table in dependency order.
///
/// Run inside a transaction: the first failing statement aborts the reset
/// and the caller's rollback restores the previous state.
pub async fn reset_database(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    for table in RESET_ORDER {
        let deleted = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *conn)
            .await?
            .rows_affected();
        tracing::debug!(table, deleted, "Table cleared");
    }
    tracing::info!("Database reset");
    Ok(())
}

/// Wipe all data and insert the baseline dataset, atomically.
pub async fn reset_and_seed(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    acquire_lock(&mut tx).await?;
    reset_database(&mut tx).await?;
    create_seed_data(&mut tx).await?;
    tx.commit().await?;
    Ok(())
}

/// Seed the database if it holds no ideas yet. Safe to call on every start.
pub async fn setup_database(pool: &PgPool) -> Result<SetupOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;
    acquire_lock(&mut tx).await?;

    let existing = count_ideas(&mut tx).await?;
    if existing > 0 {
        tx.commit().await?;
        tracing::info!(idea_count = existing, "Database already initialized");
        return Ok(SetupOutcome::AlreadyInitialized {
            idea_count: existing,
        });
    }

    reset_database(&mut tx).await?;
    create_seed_data(&mut tx).await?;
    let idea_count = count_ideas(&mut tx).await?;
    tx.commit().await?;

    tracing::info!(idea_count, "Database seeded");
    Ok(SetupOutcome::Seeded { idea_count })
}

async fn acquire_lock(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MAINTENANCE_LOCK_ID)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn count_ideas(conn: &mut PgConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM ideas")
        .fetch_one(&mut *conn)
        .await
}
