//! Vote filtering by topic substring and parliamentary period.
//!
//! Filters operate on the vote index and return the surviving vote-id set;
//! callers retain ballots and tallies against that set. An empty result is
//! a valid empty output, not an error.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::records::VoteRecord;

/// Vote ids whose effective topics contain `topic`, case-insensitively.
pub fn votes_matching_topic(votes: &[VoteRecord], topic: &str) -> HashSet<u32> {
    let needle = topic.to_lowercase();
    votes
        .iter()
        .filter(|v| {
            v.effective_topics()
                .is_some_and(|t| t.to_lowercase().contains(&needle))
        })
        .map(|v| v.id)
        .collect()
}

/// Vote ids whose timestamps fall inside the inclusive date range.
pub fn votes_in_period(votes: &[VoteRecord], start: NaiveDate, end: NaiveDate) -> HashSet<u32> {
    votes
        .iter()
        .filter(|v| {
            let date = v.timestamp.date_naive();
            date >= start && date <= end
        })
        .map(|v| v.id)
        .collect()
}

/// Retain only rows whose vote id is in the set. Works for any record type
/// given a vote-id accessor; keeps relative order of survivors.
pub fn retain_votes<T>(rows: &mut Vec<T>, ids: &HashSet<u32>, vote_id: fn(&T) -> u32) {
    rows.retain(|row| ids.contains(&vote_id(row)));
}
