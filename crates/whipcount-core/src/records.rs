//! Flat record types for the roll-call dataset.
//!
//! One struct per table: group tallies and member ballots come in one row
//! per (vote, group) and (vote, legislator) respectively; vote records carry
//! the index metadata including raw and enriched topic labels. Scored and
//! aggregated rows are derived each run, never persisted as authoritative
//! state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::position::VotePosition;

/// Per-(vote, group) vote counts, one row per political group per vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTally {
    pub vote_id: u32,
    /// Political group code, e.g. "EPP", "GUE/NGL".
    pub code: String,
    pub count_for: u32,
    pub count_against: u32,
    pub count_abstentions: u32,
    pub count_did_not_vote: u32,
}

/// A single legislator's ballot on a single vote, immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberBallot {
    pub vote_id: u32,
    pub member_id: u32,
    pub first_name: String,
    pub last_name: String,
    /// Country code of the legislator, e.g. "FR".
    pub country: String,
    /// Political group code at the time of the vote.
    pub group: String,
    pub position: VotePosition,
}

/// Vote-index metadata with raw and enriched topic labels.
///
/// `topics` and `oeil_subjects` are comma-separated label strings as served
/// by the API; `topics_filled` is the enrichment output. The effective
/// topics are `topics` when present, otherwise `topics_filled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub id: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub topics: Option<String>,
    #[serde(default)]
    pub oeil_subjects: Option<String>,
    #[serde(default)]
    pub topics_filled: Option<String>,
}

impl VoteRecord {
    /// The topic string downstream filtering sees: raw topics when present,
    /// otherwise the enrichment fill. Never overwritten once non-empty.
    pub fn effective_topics(&self) -> Option<&str> {
        self.topics.as_deref().or(self.topics_filled.as_deref())
    }
}

/// A member ballot joined with its group's stance and scored, plus the
/// country-level stance derived from the ballots themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredBallot {
    pub ballot: MemberBallot,
    pub group_majority: VotePosition,
    pub agreement_index: f64,
    pub rebel_score: f64,
    pub country_majority: VotePosition,
    pub country_agreement_index: f64,
    pub country_rebel_score: f64,
}

/// Per-legislator aggregate, one row per distinct legislator observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberStats {
    pub member_id: u32,
    pub first_name: String,
    pub last_name: String,
    pub group: String,
    pub country: String,
    pub n_votes: usize,
    pub avg_rebel_score: f64,
    pub total_rebel_score: f64,
    pub group_avg_rebel: f64,
    pub z_score: f64,
    pub is_outlier: bool,
    pub avg_country_rebel_score: f64,
    pub country_avg_rebel: f64,
    pub country_z_score: f64,
    pub country_is_outlier: bool,
}

/// Per-group aggregate over the votes the group appears in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub group: String,
    pub avg_agreement_index: f64,
    pub n_votes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_topics_prefers_raw_over_filled() {
        let mut vote = VoteRecord {
            id: 1,
            timestamp: Utc::now(),
            title: None,
            topics: Some("Health".into()),
            oeil_subjects: None,
            topics_filled: Some("Transport".into()),
        };
        assert_eq!(vote.effective_topics(), Some("Health"));

        vote.topics = None;
        assert_eq!(vote.effective_topics(), Some("Transport"));

        vote.topics_filled = None;
        assert_eq!(vote.effective_topics(), None);
    }

    #[test]
    fn vote_record_tolerates_missing_optional_columns() {
        let json = r#"{"id": 7, "timestamp": "2024-09-17T12:00:00Z"}"#;
        let vote: VoteRecord = serde_json::from_str(json).unwrap();
        assert_eq!(vote.id, 7);
        assert!(vote.topics.is_none());
        assert!(vote.oeil_subjects.is_none());
    }

    #[test]
    fn vote_record_missing_required_column_names_the_field() {
        let json = r#"{"timestamp": "2024-09-17T12:00:00Z"}"#;
        let err = serde_json::from_str::<VoteRecord>(json).unwrap_err();
        assert!(err.to_string().contains("id"));
    }
}
