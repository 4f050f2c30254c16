//! PostgreSQL persistence for the innovation hub.
//!
//! Models and DTOs live in [`models`], per-table query code in
//! [`repositories`], and the destructive reset/seed tooling in
//! [`maintenance`].

use serde::Serialize;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod maintenance;
pub mod models;
pub mod repositories;
mod seed;

pub use error::RepoError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Migrations embedded from `db/migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../db/migrations");

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Applied schema version compared with the newest embedded migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaStatus {
    pub applied_version: Option<i64>,
    pub latest_version: Option<i64>,
    pub up_to_date: bool,
}

/// Read the migration bookkeeping table. A database that was never
/// migrated reports no applied version.
pub async fn schema_status(pool: &DbPool) -> Result<SchemaStatus, sqlx::Error> {
    let table_exists: bool =
        sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;
    let applied_version: Option<i64> = if table_exists {
        sqlx::query_scalar("SELECT MAX(version) FROM _sqlx_migrations WHERE success")
            .fetch_one(pool)
            .await?
    } else {
        None
    };
    let latest_version = MIGRATOR.iter().map(|m| m.version).max();
    Ok(SchemaStatus {
        applied_version,
        latest_version,
        up_to_date: applied_version == latest_version,
    })
}
