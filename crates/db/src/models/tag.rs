//! Tag and idea-tag models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use hub_core::types::{DbId, Timestamp};

/// A row from the `tags` table. `name` is stored trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// A tag joined through `idea_tags`, carrying the idea it is attached to.
#[derive(Debug, Clone, FromRow)]
pub struct IdeaTagRow {
    pub idea_id: DbId,
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

impl From<IdeaTagRow> for Tag {
    fn from(row: IdeaTagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

/// DTO for creating (or fetching) a tag by name.
///
/// The name is checked with `validate_tag_names` after normalization rather
/// than with a derive, so surrounding whitespace does not count.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
}

/// DTO for renaming a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct RenameTag {
    pub name: String,
}
