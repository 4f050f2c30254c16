//! Console output and prompts for the admin commands.

use std::io::{self, BufRead, Write};

use hub_core::vote_stats::VoteReport;
use hub_db::maintenance::SetupOutcome;
use hub_rag::cleanup::{CleanupReport, FileOutcome};
use hub_rag::store::RagStats;

const RANKED_TITLE_WIDTH: usize = 50;
const VOTE_TITLE_WIDTH: usize = 40;

/// Ask on stdin whether to wipe the database.
pub fn confirm_reset() -> io::Result<bool> {
    print!("This deletes ALL users, ideas, comments and votes. Type 'yes' to continue: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_confirmation(&answer))
}

fn is_confirmation(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Cut `text` to at most `width` characters.
fn truncate_chars(text: &str, width: usize) -> &str {
    match text.char_indices().nth(width) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn print_setup_outcome(outcome: &SetupOutcome) {
    match outcome {
        SetupOutcome::AlreadyInitialized { idea_count } => {
            println!("Database already initialized ({idea_count} ideas).");
        }
        SetupOutcome::Seeded { idea_count } => {
            println!("Database seeded with {idea_count} ideas.");
        }
    }
}

pub fn print_vote_report(report: &VoteReport) {
    println!("Total votes:   {}", report.total_votes);
    println!("Unique voters: {}", report.unique_voters);

    println!();
    println!("Ideas by votes:");
    if report.ranked_ideas.is_empty() {
        println!("  (none)");
    }
    for idea in &report.ranked_ideas {
        println!(
            "  {:>4}  #{:<5} {}",
            idea.vote_count,
            idea.idea_id,
            truncate_chars(&idea.title, RANKED_TITLE_WIDTH)
        );
    }

    println!();
    println!("All votes:");
    if report.votes.is_empty() {
        println!("  (none)");
    }
    for vote in &report.votes {
        println!(
            "  {:<40}  user {:<5} idea {:<5} {}",
            truncate_chars(&vote.idea_title, VOTE_TITLE_WIDTH),
            vote.user_id,
            vote.idea_id,
            vote.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    if !report.inconsistent_ideas.is_empty() {
        println!();
        println!(
            "WARNING: stored vote counts disagree with vote rows for ideas {:?}",
            report.inconsistent_ideas
        );
    }
}

fn print_stats(label: &str, stats: &RagStats) {
    println!("{label}:");
    println!("  Total chunks:     {}", stats.total_chunks);
    println!("  Unique documents: {}", stats.unique_documents);
    for (file_type, count) in &stats.file_types {
        println!("  {file_type:<10} {count}");
    }
}

pub fn print_cleanup_report(report: &CleanupReport) {
    print_stats("RAG store", &report.stats_before);

    println!();
    if report.files.is_empty() {
        println!("No temporary documents found.");
        return;
    }

    println!("Temporary documents ({}):", report.files.len());
    for file in &report.files {
        match &file.outcome {
            FileOutcome::Deleted { chunks } => println!("  deleted    {} ({chunks} chunks)", file.filename),
            FileOutcome::NotFound => println!("  not found  {}", file.filename),
            FileOutcome::Failed { error } => println!("  FAILED     {}: {error}", file.filename),
            FileOutcome::Skipped => println!("  would delete {}", file.filename),
        }
    }

    if report.dry_run {
        println!();
        println!("Dry run: nothing was deleted.");
        return;
    }

    println!();
    println!("Deleted {} chunks.", report.chunks_deleted());
    print_stats("Updated RAG store", &report.stats_after);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_requires_yes() {
        assert!(is_confirmation("yes\n"));
        assert!(is_confirmation("  YES "));
        assert!(!is_confirmation("y"));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("yes please"));
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("Cykelbana", 4), "Cyke");
        assert_eq!(truncate_chars("Förskola", 3), "För");
        assert_eq!(truncate_chars("kort", 40), "kort");
    }
}
