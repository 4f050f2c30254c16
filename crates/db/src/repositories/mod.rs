//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Single-statement methods
//! return `sqlx::Error`; multi-step operations that enforce domain rules
//! return [`RepoError`](crate::RepoError).

pub mod category_repo;
pub mod comment_repo;
pub mod idea_repo;
pub mod stats_repo;
pub mod tag_repo;
pub mod user_repo;
pub mod vote_repo;

pub use category_repo::CategoryRepo;
pub use comment_repo::CommentRepo;
pub use idea_repo::IdeaRepo;
pub use stats_repo::StatsRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
pub use vote_repo::VoteRepo;
