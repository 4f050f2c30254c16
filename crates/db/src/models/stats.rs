//! Aggregate statistics over ideas.

use serde::Serialize;

use hub_core::idea::{IdeaStatus, IdeaType};

use crate::models::idea::IdeaResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: IdeaStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub idea_type: IdeaType,
    pub count: i64,
}

/// Payload of `GET /api/v1/ideas/stats`.
///
/// Distributions list every status/type, including those with zero ideas,
/// in lifecycle order.
#[derive(Debug, Clone, Serialize)]
pub struct IdeaStats {
    pub total_ideas: i64,
    pub status_distribution: Vec<StatusCount>,
    pub type_distribution: Vec<TypeCount>,
    pub recent_ideas: Vec<IdeaResponse>,
}
