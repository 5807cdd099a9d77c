//! Per-ballot rebel scoring.
//!
//! A ballot's rebel score is the group's Agreement Index when the legislator
//! cast a position different from the group majority, and 0 otherwise. A
//! defection from a cohesive group counts fully; defecting from an already
//! fractured group carries little signal and is down-weighted by the same
//! AI factor.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::cohesion::{GroupStance, score_counts, score_tally};
use crate::position::VotePosition;
use crate::records::{GroupTally, MemberBallot, ScoredBallot};

/// Cohesion-weighted deviation score for one ballot against its group's
/// stance. Always in [0, 1]; 0 for non-participation or majority votes.
pub fn rebel_score(position: VotePosition, stance: &GroupStance) -> f64 {
    if position.participated() && position != stance.majority {
        stance.agreement_index
    } else {
        0.0
    }
}

/// Join ballots with their group tallies and score each one.
///
/// Group stances come from the tallies; country stances are derived from
/// the ballots themselves by counting cast positions per (vote, country).
/// Ballots whose (vote, group) has no tally row are dropped, matching the
/// inner join the upstream data implies. Input order is irrelevant: the
/// output for each ballot depends only on that ballot and its two stances.
pub fn score_ballots(ballots: &[MemberBallot], tallies: &[GroupTally]) -> Vec<ScoredBallot> {
    let mut group_stances: HashMap<(u32, &str), GroupStance> = HashMap::new();
    for tally in tallies {
        group_stances.insert((tally.vote_id, tally.code.as_str()), score_tally(tally));
    }

    // Cast-position counts per (vote, country): (against, for, abstentions).
    let mut country_counts: HashMap<(u32, &str), (u32, u32, u32)> = HashMap::new();
    for ballot in ballots {
        let counts = country_counts
            .entry((ballot.vote_id, ballot.country.as_str()))
            .or_default();
        match ballot.position {
            VotePosition::Against => counts.0 += 1,
            VotePosition::For => counts.1 += 1,
            VotePosition::Abstention => counts.2 += 1,
            VotePosition::DidNotVote => {}
        }
    }
    let country_stances: HashMap<(u32, &str), GroupStance> = country_counts
        .into_iter()
        .map(|(key, (against, for_, abstentions))| (key, score_counts(against, for_, abstentions)))
        .collect();

    let mut scored = Vec::with_capacity(ballots.len());
    let mut unmatched = 0usize;
    for ballot in ballots {
        let Some(group_stance) = group_stances.get(&(ballot.vote_id, ballot.group.as_str()))
        else {
            debug!(
                vote_id = ballot.vote_id,
                group = %ballot.group,
                "no group tally for ballot, dropping"
            );
            unmatched += 1;
            continue;
        };
        // Country stance always exists: this ballot contributed to it.
        let country_stance = country_stances[&(ballot.vote_id, ballot.country.as_str())];

        scored.push(ScoredBallot {
            ballot: ballot.clone(),
            group_majority: group_stance.majority,
            agreement_index: group_stance.agreement_index,
            rebel_score: rebel_score(ballot.position, group_stance),
            country_majority: country_stance.majority,
            country_agreement_index: country_stance.agreement_index,
            country_rebel_score: rebel_score(ballot.position, &country_stance),
        });
    }

    if unmatched > 0 {
        warn!(unmatched, "ballots without a matching group tally were dropped");
    }
    scored
}
