//! Category entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use hub_core::types::{DbId, Timestamp};
use hub_core::validation::{DEFAULT_CATEGORY_COLOR, HEX_COLOR};

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Hex display color, e.g. `#3498db`.
    pub color: String,
    pub created_at: Timestamp,
}

/// DTO for creating a category. `color` defaults to `#3498db`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 2, max = 50))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_color")]
    #[validate(regex(path = *HEX_COLOR))]
    pub color: String,
}

/// DTO for renaming or restyling a category. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 2, max = 50))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(regex(path = *HEX_COLOR))]
    pub color: Option<String>,
}

impl CreateCategory {
    /// Trim the name so length rules apply to what is stored.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

impl UpdateCategory {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|name| name.trim().to_string());
        self
    }
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}
