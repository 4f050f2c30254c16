//! Vote statistics report.
//!
//! Built from the full vote listing and the per-idea stored counters. The
//! computation is pure so the same report backs both the admin CLI and the
//! `/votes/stats` endpoint.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// One vote joined with the title of the idea it targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteRecord {
    pub vote_id: DbId,
    pub idea_id: DbId,
    pub user_id: DbId,
    pub idea_title: String,
    pub created_at: Timestamp,
}

/// An idea with its stored `vote_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdeaTally {
    pub idea_id: DbId,
    pub title: String,
    pub vote_count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteReport {
    pub total_votes: usize,
    pub unique_voters: usize,
    /// Ideas with at least one vote, most votes first, ties by ascending id.
    pub ranked_ideas: Vec<IdeaTally>,
    /// Every vote, oldest first.
    pub votes: Vec<VoteRecord>,
    /// Ideas whose stored counter disagrees with the number of vote rows.
    /// Empty unless the counter invariant has been broken out of band.
    pub inconsistent_ideas: Vec<DbId>,
}

/// Build the report. Empty inputs produce an all-zero report.
pub fn build_vote_report(mut votes: Vec<VoteRecord>, ideas: Vec<IdeaTally>) -> VoteReport {
    votes.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.vote_id.cmp(&b.vote_id))
    });

    let unique_voters = votes.iter().map(|v| v.user_id).collect::<HashSet<_>>().len();

    let mut rows_per_idea: BTreeMap<DbId, i64> = BTreeMap::new();
    for vote in &votes {
        *rows_per_idea.entry(vote.idea_id).or_default() += 1;
    }

    let inconsistent_ideas = ideas
        .iter()
        .filter(|idea| {
            let rows = rows_per_idea.get(&idea.idea_id).copied().unwrap_or(0);
            i64::from(idea.vote_count) != rows
        })
        .map(|idea| idea.idea_id)
        .collect();

    let mut ranked_ideas: Vec<IdeaTally> = ideas.into_iter().filter(|i| i.vote_count > 0).collect();
    ranked_ideas.sort_by(|a, b| {
        b.vote_count
            .cmp(&a.vote_count)
            .then_with(|| a.idea_id.cmp(&b.idea_id))
    });

    VoteReport {
        total_votes: votes.len(),
        unique_voters,
        ranked_ideas,
        votes,
        inconsistent_ideas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn vote(vote_id: DbId, idea_id: DbId, user_id: DbId, minutes: i64) -> VoteRecord {
        VoteRecord {
            vote_id,
            idea_id,
            user_id,
            idea_title: format!("Idea {idea_id}"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    fn tally(idea_id: DbId, vote_count: i32) -> IdeaTally {
        IdeaTally {
            idea_id,
            title: format!("Idea {idea_id}"),
            vote_count,
        }
    }

    #[test]
    fn empty_tables_give_zero_report() {
        let report = build_vote_report(vec![], vec![]);
        assert_eq!(report.total_votes, 0);
        assert_eq!(report.unique_voters, 0);
        assert!(report.ranked_ideas.is_empty());
        assert!(report.votes.is_empty());
        assert!(report.inconsistent_ideas.is_empty());
    }

    #[test]
    fn ideas_without_votes_are_not_ranked() {
        let report = build_vote_report(vec![], vec![tally(1, 0), tally(2, 0)]);
        assert!(report.ranked_ideas.is_empty());
    }

    #[test]
    fn most_voted_idea_ranks_first() {
        // (idea 1, user A), (idea 1, user B), (idea 2, user A)
        let votes = vec![vote(1, 1, 10, 0), vote(2, 1, 11, 1), vote(3, 2, 10, 2)];
        let report = build_vote_report(votes, vec![tally(2, 1), tally(1, 2), tally(3, 0)]);

        assert_eq!(report.total_votes, 3);
        assert_eq!(report.unique_voters, 2);
        let order: Vec<DbId> = report.ranked_ideas.iter().map(|i| i.idea_id).collect();
        assert_eq!(order, vec![1, 2]);
        assert!(report.inconsistent_ideas.is_empty());
    }

    #[test]
    fn ties_break_by_ascending_idea_id() {
        let report = build_vote_report(vec![], vec![tally(7, 3), tally(4, 3), tally(5, 5)]);
        let order: Vec<DbId> = report.ranked_ideas.iter().map(|i| i.idea_id).collect();
        assert_eq!(order, vec![5, 4, 7]);
    }

    #[test]
    fn votes_listed_oldest_first() {
        let votes = vec![vote(3, 1, 1, 5), vote(1, 1, 2, 0), vote(2, 2, 3, 5)];
        let report = build_vote_report(votes, vec![]);
        let ids: Vec<DbId> = report.votes.iter().map(|v| v.vote_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn counter_drift_is_reported() {
        let votes = vec![vote(1, 1, 10, 0)];
        let report = build_vote_report(votes, vec![tally(1, 2), tally(2, 0)]);
        assert_eq!(report.inconsistent_ideas, vec![1]);
    }
}
