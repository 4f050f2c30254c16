//! Aggregation of service-mapping results written by the AI pipeline.
//!
//! The pipeline stores, per idea, a recommendation, a confidence and a list
//! of matched municipal services. This module rolls those up into the
//! analysis overview shown to case officers.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::idea::{DevelopmentImpact, Priority, ServiceRecommendation};
use crate::types::DbId;

/// Maximum number of sample ideas listed per matched service.
pub const MAX_SAMPLE_IDEAS: usize = 5;

/// Default length of the top matched services list.
pub const DEFAULT_TOP_SERVICES: usize = 10;

/// Minimum number of unmatched ideas before a tag area counts as a gap.
pub const MIN_GAP_IDEAS: usize = 2;

/// One existing service the pipeline matched an idea against.
///
/// Unknown keys written by the pipeline are kept in `extra` so they survive a
/// read-modify-write cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedService {
    pub service_name: String,
    #[serde(default)]
    pub service_category: Option<String>,
    #[serde(default)]
    pub match_score: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The slice of an idea the aggregation needs.
#[derive(Debug, Clone)]
pub struct AnalyzedIdea {
    pub idea_id: DbId,
    pub title: String,
    pub priority: Priority,
    pub ai_confidence: Option<f64>,
    pub service_recommendation: Option<ServiceRecommendation>,
    pub service_confidence: Option<f64>,
    pub development_impact: Option<DevelopmentImpact>,
    pub matching_services: Vec<MatchedService>,
    /// Normalized tag names.
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceMappingOverview {
    pub existing_service_count: i64,
    pub develop_existing_count: i64,
    pub new_service_count: i64,
    pub total_ideas_analyzed: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdeaMatchRef {
    pub idea_id: DbId,
    pub title: String,
    pub match_score: f64,
}

/// A service together with the ideas matched against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceMatch {
    pub service_name: String,
    pub service_category: Option<String>,
    pub idea_count: i64,
    pub avg_match_score: f64,
    pub ideas: Vec<IdeaMatchRef>,
}

/// An idea that needs an existing service developed or a new one built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentNeed {
    pub idea_id: DbId,
    pub title: String,
    pub priority: Priority,
    pub service_recommendation: ServiceRecommendation,
    pub match_score: f64,
    pub impact: Option<DevelopmentImpact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapIdea {
    pub idea_id: DbId,
    pub title: String,
    pub priority: Priority,
}

/// A tag area where several ideas matched no existing service.
///
/// Tags carried by exactly the same set of unmatched ideas are merged into
/// one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapArea {
    pub area_keywords: Vec<String>,
    pub idea_count: i64,
    pub sample_ideas: Vec<GapIdea>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisStats {
    pub overview: ServiceMappingOverview,
    pub top_matched_services: Vec<ServiceMatch>,
    pub development_needs: Vec<DevelopmentNeed>,
    pub gaps: Vec<GapArea>,
    /// Mean AI confidence over ideas that have one; `0.0` when none do.
    pub ai_confidence_avg: f64,
}

/// Roll up the service-mapping results of `ideas`.
pub fn build_analysis_stats(ideas: &[AnalyzedIdea], top_services: usize) -> AnalysisStats {
    AnalysisStats {
        overview: overview(ideas),
        top_matched_services: top_matched_services(ideas, top_services),
        development_needs: development_needs(ideas),
        gaps: gaps(ideas),
        ai_confidence_avg: mean(ideas.iter().filter_map(|i| i.ai_confidence)),
    }
}

fn overview(ideas: &[AnalyzedIdea]) -> ServiceMappingOverview {
    let mut out = ServiceMappingOverview::default();
    for rec in ideas.iter().filter_map(|i| i.service_recommendation) {
        match rec {
            ServiceRecommendation::ExistingService => out.existing_service_count += 1,
            ServiceRecommendation::DevelopExisting => out.develop_existing_count += 1,
            ServiceRecommendation::NewService => out.new_service_count += 1,
        }
        out.total_ideas_analyzed += 1;
    }
    out
}

fn top_matched_services(ideas: &[AnalyzedIdea], limit: usize) -> Vec<ServiceMatch> {
    let mut by_service: HashMap<&str, (Option<&str>, Vec<IdeaMatchRef>)> = HashMap::new();

    for idea in ideas {
        for service in &idea.matching_services {
            let entry = by_service
                .entry(service.service_name.as_str())
                .or_insert_with(|| (service.service_category.as_deref(), Vec::new()));
            if entry.0.is_none() {
                entry.0 = service.service_category.as_deref();
            }
            entry.1.push(IdeaMatchRef {
                idea_id: idea.idea_id,
                title: idea.title.clone(),
                match_score: service.match_score,
            });
        }
    }

    let mut services: Vec<ServiceMatch> = by_service
        .into_iter()
        .map(|(name, (category, mut refs))| {
            let avg = mean(refs.iter().map(|r| r.match_score));
            let idea_count = refs.len() as i64;
            refs.sort_by(|a, b| {
                b.match_score
                    .total_cmp(&a.match_score)
                    .then_with(|| a.idea_id.cmp(&b.idea_id))
            });
            refs.truncate(MAX_SAMPLE_IDEAS);
            ServiceMatch {
                service_name: name.to_string(),
                service_category: category.map(str::to_string),
                idea_count,
                avg_match_score: avg,
                ideas: refs,
            }
        })
        .collect();

    services.sort_by(|a, b| {
        b.idea_count
            .cmp(&a.idea_count)
            .then_with(|| b.avg_match_score.total_cmp(&a.avg_match_score))
            .then_with(|| a.service_name.cmp(&b.service_name))
    });
    services.truncate(limit);
    services
}

fn development_needs(ideas: &[AnalyzedIdea]) -> Vec<DevelopmentNeed> {
    let mut needs: Vec<DevelopmentNeed> = ideas
        .iter()
        .filter_map(|idea| {
            let rec = idea.service_recommendation?;
            if rec == ServiceRecommendation::ExistingService {
                return None;
            }
            Some(DevelopmentNeed {
                idea_id: idea.idea_id,
                title: idea.title.clone(),
                priority: idea.priority,
                service_recommendation: rec,
                match_score: best_match_score(idea),
                impact: idea.development_impact,
            })
        })
        .collect();

    needs.sort_by(|a, b| {
        b.priority
            .weight()
            .cmp(&a.priority.weight())
            .then_with(|| b.match_score.total_cmp(&a.match_score))
            .then_with(|| a.idea_id.cmp(&b.idea_id))
    });
    needs
}

fn gaps(ideas: &[AnalyzedIdea]) -> Vec<GapArea> {
    let mut ideas_by_tag: BTreeMap<&str, BTreeSet<usize>> = BTreeMap::new();
    for (idx, idea) in ideas.iter().enumerate() {
        if !idea.matching_services.is_empty() {
            continue;
        }
        for tag in &idea.tags {
            ideas_by_tag.entry(tag.as_str()).or_default().insert(idx);
        }
    }

    let mut tags_by_ideas: BTreeMap<BTreeSet<usize>, Vec<String>> = BTreeMap::new();
    for (tag, members) in ideas_by_tag {
        if members.len() >= MIN_GAP_IDEAS {
            tags_by_ideas.entry(members).or_default().push(tag.to_string());
        }
    }

    let mut areas: Vec<GapArea> = tags_by_ideas
        .into_iter()
        .map(|(members, area_keywords)| {
            let mut sample: Vec<&AnalyzedIdea> = members.iter().map(|&i| &ideas[i]).collect();
            sample.sort_by_key(|idea| idea.idea_id);
            GapArea {
                area_keywords,
                idea_count: members.len() as i64,
                sample_ideas: sample
                    .into_iter()
                    .take(MAX_SAMPLE_IDEAS)
                    .map(|idea| GapIdea {
                        idea_id: idea.idea_id,
                        title: idea.title.clone(),
                        priority: idea.priority,
                    })
                    .collect(),
            }
        })
        .collect();

    areas.sort_by(|a, b| {
        b.idea_count
            .cmp(&a.idea_count)
            .then_with(|| a.area_keywords.cmp(&b.area_keywords))
    });
    areas
}

/// Best matched-service score, falling back to the overall service
/// confidence and then to zero.
fn best_match_score(idea: &AnalyzedIdea) -> f64 {
    idea.matching_services
        .iter()
        .map(|s| s.match_score)
        .max_by(f64::total_cmp)
        .or(idea.service_confidence)
        .unwrap_or(0.0)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &str, score: f64) -> MatchedService {
        MatchedService {
            service_name: name.into(),
            service_category: Some("Stadsmiljö".into()),
            match_score: score,
            extra: Default::default(),
        }
    }

    fn idea(
        id: DbId,
        priority: Priority,
        rec: Option<ServiceRecommendation>,
        services: Vec<MatchedService>,
    ) -> AnalyzedIdea {
        AnalyzedIdea {
            idea_id: id,
            title: format!("Idea {id}"),
            priority,
            ai_confidence: None,
            service_recommendation: rec,
            service_confidence: None,
            development_impact: None,
            matching_services: services,
            tags: Vec::new(),
        }
    }

    fn tagged(id: DbId, tags: &[&str], services: Vec<MatchedService>) -> AnalyzedIdea {
        let mut idea = idea(id, Priority::Medium, None, services);
        idea.tags = tags.iter().map(|t| t.to_string()).collect();
        idea
    }

    #[test]
    fn empty_input() {
        let stats = build_analysis_stats(&[], DEFAULT_TOP_SERVICES);
        assert_eq!(stats.overview, ServiceMappingOverview::default());
        assert!(stats.top_matched_services.is_empty());
        assert!(stats.development_needs.is_empty());
        assert!(stats.gaps.is_empty());
        assert_eq!(stats.ai_confidence_avg, 0.0);
    }

    #[test]
    fn overview_counts_only_analyzed_ideas() {
        let ideas = vec![
            idea(1, Priority::Low, Some(ServiceRecommendation::ExistingService), vec![]),
            idea(2, Priority::Low, Some(ServiceRecommendation::NewService), vec![]),
            idea(3, Priority::Low, Some(ServiceRecommendation::NewService), vec![]),
            idea(4, Priority::Low, None, vec![]),
        ];
        let overview = build_analysis_stats(&ideas, 10).overview;
        assert_eq!(overview.existing_service_count, 1);
        assert_eq!(overview.develop_existing_count, 0);
        assert_eq!(overview.new_service_count, 2);
        assert_eq!(overview.total_ideas_analyzed, 3);
    }

    #[test]
    fn services_ranked_by_idea_count_then_score() {
        let ideas = vec![
            idea(1, Priority::Low, None, vec![service("Parkering", 0.9), service("Bibliotek", 0.4)]),
            idea(2, Priority::Low, None, vec![service("Bibliotek", 0.6)]),
            idea(3, Priority::Low, None, vec![service("Avfall", 0.95)]),
        ];
        let top = build_analysis_stats(&ideas, 10).top_matched_services;
        let names: Vec<_> = top.iter().map(|s| s.service_name.as_str()).collect();
        assert_eq!(names, vec!["Bibliotek", "Avfall", "Parkering"]);
        assert_eq!(top[0].idea_count, 2);
        assert!((top[0].avg_match_score - 0.5).abs() < 1e-9);
        assert_eq!(top[0].ideas[0].idea_id, 2);
    }

    #[test]
    fn top_services_truncated() {
        let ideas = vec![idea(
            1,
            Priority::Low,
            None,
            vec![service("A", 0.1), service("B", 0.2), service("C", 0.3)],
        )];
        assert_eq!(build_analysis_stats(&ideas, 2).top_matched_services.len(), 2);
    }

    #[test]
    fn development_needs_exclude_existing_service_and_sort_by_priority() {
        let ideas = vec![
            idea(1, Priority::Low, Some(ServiceRecommendation::NewService), vec![]),
            idea(2, Priority::High, Some(ServiceRecommendation::DevelopExisting), vec![service("X", 0.3)]),
            idea(3, Priority::High, Some(ServiceRecommendation::ExistingService), vec![]),
            idea(4, Priority::High, Some(ServiceRecommendation::NewService), vec![service("Y", 0.8)]),
        ];
        let needs = build_analysis_stats(&ideas, 10).development_needs;
        let ids: Vec<DbId> = needs.iter().map(|n| n.idea_id).collect();
        assert_eq!(ids, vec![4, 2, 1]);
        assert_eq!(needs[2].match_score, 0.0);
    }

    #[test]
    fn match_score_falls_back_to_service_confidence() {
        let mut only_confidence = idea(1, Priority::Medium, Some(ServiceRecommendation::NewService), vec![]);
        only_confidence.service_confidence = Some(0.42);
        let needs = build_analysis_stats(&[only_confidence], 10).development_needs;
        assert_eq!(needs[0].match_score, 0.42);
    }

    #[test]
    fn gaps_group_unmatched_ideas_by_tag() {
        let ideas = vec![
            tagged(1, &["cykel", "trafik"], vec![]),
            tagged(2, &["cykel", "trafik", "skola"], vec![]),
            tagged(3, &["belysning"], vec![]),
            tagged(4, &["belysning"], vec![]),
            tagged(5, &["belysning"], vec![]),
            // Matched ideas never count towards a gap.
            tagged(6, &["skola"], vec![service("Skolskjuts", 0.8)]),
            tagged(7, &["cykel"], vec![service("Cykelvägar", 0.9)]),
        ];
        let gaps = build_analysis_stats(&ideas, 10).gaps;

        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].area_keywords, vec!["belysning"]);
        assert_eq!(gaps[0].idea_count, 3);
        assert_eq!(gaps[1].area_keywords, vec!["cykel", "trafik"]);
        assert_eq!(gaps[1].idea_count, 2);
        let sample: Vec<DbId> = gaps[1].sample_ideas.iter().map(|i| i.idea_id).collect();
        assert_eq!(sample, vec![1, 2]);
    }

    #[test]
    fn single_unmatched_idea_is_not_a_gap() {
        let ideas = vec![tagged(1, &["park"], vec![]), tagged(2, &["lekplats"], vec![])];
        assert!(build_analysis_stats(&ideas, 10).gaps.is_empty());
    }

    #[test]
    fn gap_samples_are_capped() {
        let ideas: Vec<AnalyzedIdea> = (1..=8).map(|id| tagged(id, &["park"], vec![])).collect();
        let gaps = build_analysis_stats(&ideas, 10).gaps;
        assert_eq!(gaps[0].idea_count, 8);
        assert_eq!(gaps[0].sample_ideas.len(), MAX_SAMPLE_IDEAS);
    }

    #[test]
    fn ai_confidence_average_ignores_missing() {
        let mut a = idea(1, Priority::Low, None, vec![]);
        a.ai_confidence = Some(0.8);
        let mut b = idea(2, Priority::Low, None, vec![]);
        b.ai_confidence = Some(0.4);
        let c = idea(3, Priority::Low, None, vec![]);
        let avg = build_analysis_stats(&[a, b, c], 10).ai_confidence_avg;
        assert!((avg - 0.6).abs() < 1e-9);
    }

    #[test]
    fn matched_service_keeps_unknown_keys() {
        let json = serde_json::json!({
            "service_name": "Bygglov",
            "match_score": 0.7,
            "service_url": "https://example.org/bygglov"
        });
        let parsed: MatchedService = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(parsed.service_category, None);
        assert_eq!(parsed.extra["service_url"], "https://example.org/bygglov");
    }
}
