//! Vote entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hub_core::types::{DbId, Timestamp};
use hub_core::vote_stats::VoteRecord;

/// A row from the `votes` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Vote {
    pub id: DbId,
    pub idea_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for casting a vote. The idea comes from the path.
#[derive(Debug, Clone, Deserialize)]
pub struct CastVote {
    pub user_id: DbId,
}

/// A vote joined with the title of its idea.
#[derive(Debug, Clone, FromRow)]
pub struct VoteListingRow {
    pub vote_id: DbId,
    pub idea_id: DbId,
    pub user_id: DbId,
    pub idea_title: String,
    pub created_at: Timestamp,
}

impl From<VoteListingRow> for VoteRecord {
    fn from(row: VoteListingRow) -> Self {
        Self {
            vote_id: row.vote_id,
            idea_id: row.idea_id,
            user_id: row.user_id,
            idea_title: row.idea_title,
            created_at: row.created_at,
        }
    }
}
