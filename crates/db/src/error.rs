use hub_core::error::CoreError;

/// Error from a repository operation that enforces domain rules on top of
/// plain SQL (reference checks, status transitions, duplicate votes).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
