//! Wire shapes served by the roll-call API.
//!
//! Columns are taken exactly as the API serves them: member ballots arrive
//! flat with dotted column names and an integer `member_voted` code, group
//! tallies per (vote, group), and the paginated vote index with labelled
//! topic and subject lists.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use whipcount_core::{CoreError, GroupTally, MemberBallot, VotePosition, VoteRecord};

/// One page of the vote index.
#[derive(Debug, Deserialize)]
pub struct VoteIndexPage {
    pub results: Vec<VoteIndexEntry>,
    pub has_next: bool,
}

/// A labelled classification value (topic or subject).
#[derive(Debug, Deserialize)]
pub struct Label {
    pub label: String,
}

/// One vote in the index.
#[derive(Debug, Deserialize)]
pub struct VoteIndexEntry {
    pub id: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub display_title: Option<String>,
    #[serde(default)]
    pub topics: Vec<Label>,
    #[serde(default)]
    pub oeil_subjects: Vec<Label>,
}

impl VoteIndexEntry {
    /// Flatten into a vote record, joining label lists into the
    /// comma-separated form the rest of the pipeline speaks.
    pub fn into_record(self) -> VoteRecord {
        VoteRecord {
            id: self.id,
            timestamp: self.timestamp,
            title: self.display_title,
            topics: join_labels(self.topics),
            oeil_subjects: join_labels(self.oeil_subjects),
            topics_filled: None,
        }
    }
}

fn join_labels(labels: Vec<Label>) -> Option<String> {
    if labels.is_empty() {
        None
    } else {
        Some(
            labels
                .into_iter()
                .map(|l| l.label)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Per-group tally row for one vote.
#[derive(Debug, Deserialize)]
pub struct GroupTallyRow {
    pub code: String,
    pub count_for: u32,
    pub count_against: u32,
    pub count_abstentions: u32,
    pub count_did_not_vote: u32,
}

impl GroupTallyRow {
    pub fn into_tally(self, vote_id: u32) -> GroupTally {
        GroupTally {
            vote_id,
            code: self.code,
            count_for: self.count_for,
            count_against: self.count_against,
            count_abstentions: self.count_abstentions,
            count_did_not_vote: self.count_did_not_vote,
        }
    }
}

/// Per-member ballot row for one vote.
///
/// `member_voted` is the integer position code (0=AGAINST, 1=FOR,
/// 2=ABSTENTION, 3=DID_NOT_VOTE); anything else fails conversion.
#[derive(Debug, Deserialize)]
pub struct MemberBallotRow {
    #[serde(rename = "member.id")]
    pub member_id: u32,
    #[serde(rename = "member.first_name")]
    pub first_name: String,
    #[serde(rename = "member.last_name")]
    pub last_name: String,
    #[serde(rename = "member.country.code")]
    pub country: String,
    #[serde(rename = "member.group.code")]
    pub group: String,
    pub member_voted: u8,
}

impl MemberBallotRow {
    pub fn into_ballot(self, vote_id: u32) -> Result<MemberBallot, CoreError> {
        Ok(MemberBallot {
            vote_id,
            member_id: self.member_id,
            first_name: self.first_name,
            last_name: self.last_name,
            country: self.country,
            group: self.group,
            position: VotePosition::from_code(self.member_voted)?,
        })
    }
}
