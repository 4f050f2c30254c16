//! Idea entity model, DTOs and the fully resolved response shape.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use hub_core::idea::{
    DevelopmentImpact, IdeaStatus, IdeaType, Priority, ServiceRecommendation, TargetGroup,
};
use hub_core::service_mapping::{AnalyzedIdea, MatchedService};
use hub_core::types::{DbId, Timestamp};
use hub_core::validation::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

use crate::models::category::Category;
use crate::models::comment::CommentResponse;
use crate::models::tag::Tag;
use crate::models::user::User;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `ideas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Idea {
    pub id: DbId,
    pub title: String,
    pub description: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub idea_type: IdeaType,
    pub status: IdeaStatus,
    pub priority: Priority,
    pub target_group: TargetGroup,

    pub ai_sentiment: Option<String>,
    pub ai_confidence: Option<f64>,
    pub ai_analysis_notes: Option<String>,

    pub service_recommendation: Option<ServiceRecommendation>,
    pub service_confidence: Option<f64>,
    pub service_reasoning: Option<String>,
    pub matching_services: Option<Json<Vec<MatchedService>>>,
    pub development_impact: Option<DevelopmentImpact>,

    /// Mirrors the number of `votes` rows; maintained by `VoteRepo`.
    pub vote_count: i32,

    pub submitter_id: DbId,
    pub category_id: Option<DbId>,

    pub created_at: Timestamp,
    /// Set on every explicit edit; `None` until the first one.
    pub updated_at: Option<Timestamp>,
}

impl Idea {
    /// Project the fields the service-mapping rollup needs.
    pub fn to_analyzed(&self, tags: Vec<String>) -> AnalyzedIdea {
        AnalyzedIdea {
            idea_id: self.id,
            title: self.title.clone(),
            priority: self.priority,
            ai_confidence: self.ai_confidence,
            service_recommendation: self.service_recommendation,
            service_confidence: self.service_confidence,
            development_impact: self.development_impact,
            matching_services: self
                .matching_services
                .as_ref()
                .map(|json| json.0.clone())
                .unwrap_or_default(),
            tags,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for submitting a new idea. The submitter is identified by email and
/// must already exist. Status always starts at `new`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateIdea {
    #[validate(length(min = 5, max = 200))]
    pub title: String,
    #[validate(length(min = 10, max = 5000))]
    pub description: String,
    #[serde(rename = "type")]
    pub idea_type: IdeaType,
    pub target_group: TargetGroup,
    #[validate(email)]
    pub submitter_email: String,
    /// Tag names; created on first use.
    #[serde(default)]
    pub tags: Vec<String>,
    pub category_id: Option<DbId>,
    /// Defaults to `medium`.
    pub priority: Option<Priority>,
}

/// DTO for editing an idea. Omitted fields are left unchanged; `tags`, when
/// present, replaces the full tag set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateIdea {
    #[validate(length(min = 5, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 5000))]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub idea_type: Option<IdeaType>,
    pub status: Option<IdeaStatus>,
    pub priority: Option<Priority>,
    pub target_group: Option<TargetGroup>,
    pub category_id: Option<DbId>,
    pub tags: Option<Vec<String>>,
}

/// DTO written by the AI pipeline after analysing an idea.
///
/// Partial like every update: only the fields present are overwritten.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecordAnalysis {
    pub ai_sentiment: Option<String>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub ai_confidence: Option<f64>,
    pub ai_analysis_notes: Option<String>,
    pub service_recommendation: Option<ServiceRecommendation>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub service_confidence: Option<f64>,
    pub service_reasoning: Option<String>,
    pub matching_services: Option<Vec<MatchedService>>,
    pub development_impact: Option<DevelopmentImpact>,
}

/// Query parameters for `GET /api/v1/ideas`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IdeaFilter {
    pub status: Option<IdeaStatus>,
    #[serde(rename = "type")]
    pub idea_type: Option<IdeaType>,
    pub priority: Option<Priority>,
    pub target_group: Option<TargetGroup>,
    pub category_id: Option<DbId>,
    pub submitter_id: Option<DbId>,
    /// Tag name (matched after normalization).
    pub tag: Option<String>,
    /// Case-insensitive substring searched in title and description.
    pub search: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
}

impl Default for IdeaFilter {
    fn default() -> Self {
        Self {
            status: None,
            idea_type: None,
            priority: None,
            target_group: None,
            category_id: None,
            submitter_id: None,
            tag: None,
            search: None,
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

/// Clamp a limit into the accepted range.
///
/// HTTP filters are already validated to this range; the clamp covers
/// filters built in code (`StatsRepo`, tests), which never
/// pass through `validate_input`.
pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_PAGE_LIMIT)
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// An idea with every relation resolved, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct IdeaResponse {
    pub id: DbId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub idea_type: IdeaType,
    pub status: IdeaStatus,
    pub priority: Priority,
    pub target_group: TargetGroup,

    pub submitter: User,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub comments: Vec<CommentResponse>,

    pub vote_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,

    pub ai_sentiment: Option<String>,
    pub ai_confidence: Option<f64>,
    pub ai_analysis_notes: Option<String>,
    pub service_recommendation: Option<ServiceRecommendation>,
    pub service_confidence: Option<f64>,
    pub service_reasoning: Option<String>,
    pub matching_services: Option<Vec<MatchedService>>,
    pub development_impact: Option<DevelopmentImpact>,
}

impl IdeaResponse {
    pub fn assemble(
        idea: Idea,
        submitter: User,
        category: Option<Category>,
        tags: Vec<Tag>,
        comments: Vec<CommentResponse>,
    ) -> Self {
        Self {
            id: idea.id,
            title: idea.title,
            description: idea.description,
            idea_type: idea.idea_type,
            status: idea.status,
            priority: idea.priority,
            target_group: idea.target_group,
            submitter,
            category,
            tags,
            comments,
            vote_count: idea.vote_count,
            created_at: idea.created_at,
            updated_at: idea.updated_at,
            ai_sentiment: idea.ai_sentiment,
            ai_confidence: idea.ai_confidence,
            ai_analysis_notes: idea.ai_analysis_notes,
            service_recommendation: idea.service_recommendation,
            service_confidence: idea.service_confidence,
            service_reasoning: idea.service_reasoning,
            matching_services: idea.matching_services.map(|json| json.0),
            development_impact: idea.development_impact,
        }
    }
}
