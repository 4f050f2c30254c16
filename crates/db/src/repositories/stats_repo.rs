//! Aggregate queries backing the statistics endpoints.

use std::collections::HashMap;

use sqlx::PgPool;
use hub_core::idea::{IdeaStatus, IdeaType};
use hub_core::service_mapping::{build_analysis_stats, AnalysisStats, AnalyzedIdea};
use hub_core::types::DbId;

use crate::error::RepoError;
use crate::models::idea::{Idea, IdeaFilter};
use crate::models::stats::{IdeaStats, StatusCount, TypeCount};
use crate::repositories::idea_repo::{IdeaRepo, COLUMNS};
use crate::repositories::tag_repo::TagRepo;

/// Number of ideas listed under `recent_ideas`.
const RECENT_IDEAS: i64 = 5;

/// Provides read-only aggregate queries.
pub struct StatsRepo;

impl StatsRepo {
    /// Totals and distributions over all ideas plus the newest few.
    pub async fn idea_stats(pool: &PgPool) -> Result<IdeaStats, RepoError> {
        let total_ideas = IdeaRepo::count(pool).await?;

        let by_status: HashMap<IdeaStatus, i64> =
            sqlx::query_as::<_, (IdeaStatus, i64)>("SELECT status, COUNT(*) FROM ideas GROUP BY status")
                .fetch_all(pool)
                .await?
                .into_iter()
                .collect();
        let by_type: HashMap<IdeaType, i64> =
            sqlx::query_as::<_, (IdeaType, i64)>("SELECT type, COUNT(*) FROM ideas GROUP BY type")
                .fetch_all(pool)
                .await?
                .into_iter()
                .collect();

        let status_distribution = IdeaStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                count: by_status.get(&status).copied().unwrap_or(0),
            })
            .collect();
        let type_distribution = IdeaType::ALL
            .iter()
            .map(|&idea_type| TypeCount {
                idea_type,
                count: by_type.get(&idea_type).copied().unwrap_or(0),
            })
            .collect();

        let recent = IdeaRepo::list(
            pool,
            &IdeaFilter {
                limit: RECENT_IDEAS,
                ..IdeaFilter::default()
            },
        )
        .await?;
        let recent_ideas = IdeaRepo::load_details(pool, recent).await?;

        Ok(IdeaStats {
            total_ideas,
            status_distribution,
            type_distribution,
            recent_ideas,
        })
    }

    /// Every idea projected to the fields the service-mapping rollup reads.
    pub async fn analysis_inputs(pool: &PgPool) -> Result<Vec<AnalyzedIdea>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ideas ORDER BY id");
        let ideas = sqlx::query_as::<_, Idea>(&query).fetch_all(pool).await?;

        let ids: Vec<DbId> = ideas.iter().map(|i| i.id).collect();
        let mut tags_by_idea: HashMap<DbId, Vec<String>> = HashMap::new();
        for row in TagRepo::tags_for_ideas(pool, &ids).await? {
            tags_by_idea.entry(row.idea_id).or_default().push(row.name);
        }

        Ok(ideas
            .iter()
            .map(|idea| idea.to_analyzed(tags_by_idea.remove(&idea.id).unwrap_or_default()))
            .collect())
    }

    /// Service-mapping overview across all ideas.
    pub async fn analysis_stats(
        pool: &PgPool,
        top_services: usize,
    ) -> Result<AnalysisStats, sqlx::Error> {
        let inputs = Self::analysis_inputs(pool).await?;
        Ok(build_analysis_stats(&inputs, top_services))
    }
}
