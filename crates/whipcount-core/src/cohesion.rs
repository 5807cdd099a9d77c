//! Group cohesion scoring: majority position and Agreement Index.
//!
//! The Agreement Index (AI) is `(M - (total - M) / 2) / total` where `M` is
//! the winning count and `total` counts only cast positions (FOR, AGAINST,
//! ABSTENTION). AI is 1 for a unanimous group and falls towards 0 as the
//! split approaches an even three-way division. DID_NOT_VOTE never enters
//! the cohesion math.

use serde::{Deserialize, Serialize};

use crate::position::VotePosition;
use crate::records::GroupTally;

/// A group's computed stance on one vote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupStance {
    /// Majority position among AGAINST, FOR, ABSTENTION. Ties break in
    /// fixed priority order AGAINST > FOR > ABSTENTION so reruns are
    /// reproducible.
    pub majority: VotePosition,
    pub agreement_index: f64,
}

/// Score one per-(vote, group) tally.
pub fn score_tally(tally: &GroupTally) -> GroupStance {
    score_counts(tally.count_against, tally.count_for, tally.count_abstentions)
}

/// Score raw counts directly. Also used for the country-level stances
/// derived from ballots, so both rebellion axes share one definition.
pub fn score_counts(count_against: u32, count_for: u32, count_abstentions: u32) -> GroupStance {
    // Ordered scan, first strict maximum wins: AGAINST > FOR > ABSTENTION.
    let candidates = [
        (VotePosition::Against, count_against),
        (VotePosition::For, count_for),
        (VotePosition::Abstention, count_abstentions),
    ];
    let (mut majority, mut winning) = candidates[0];
    for &(position, count) in &candidates[1..] {
        if count > winning {
            majority = position;
            winning = count;
        }
    }

    let total = count_against + count_for + count_abstentions;
    let agreement_index = if total == 0 {
        0.0
    } else {
        let m = winning as f64;
        let total = total as f64;
        (m - (total - m) / 2.0) / total
    };

    GroupStance {
        majority,
        agreement_index,
    }
}
