//! Aggregation of scored ballots into per-legislator and per-group stats.
//!
//! Grouping is done with explicit first-seen key passes (a key vector plus
//! a HashMap accumulator) so result ordering is reproducible before the
//! final sort, and the output is identical regardless of input row order
//! up to tie ordering in the final stable sort.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::records::{GroupStats, MemberStats, ScoredBallot};

/// Aggregate scored ballots per legislator, attach within-group and
/// within-country z-scores, and sort by group z-score descending.
///
/// Group, country, and name are taken from the first-observed ballot for
/// each legislator. A legislator who changed affiliation mid-period keeps
/// the first-observed group for the whole run.
pub fn member_stats(scored: &[ScoredBallot]) -> Vec<MemberStats> {
    struct Acc {
        first: ScoredBallot,
        n: usize,
        rebel_sum: f64,
        country_rebel_sum: f64,
    }

    let mut order: Vec<u32> = Vec::new();
    let mut accs: HashMap<u32, Acc> = HashMap::new();
    for row in scored {
        let id = row.ballot.member_id;
        match accs.get_mut(&id) {
            Some(acc) => {
                acc.n += 1;
                acc.rebel_sum += row.rebel_score;
                acc.country_rebel_sum += row.country_rebel_score;
            }
            None => {
                order.push(id);
                accs.insert(
                    id,
                    Acc {
                        first: row.clone(),
                        n: 1,
                        rebel_sum: row.rebel_score,
                        country_rebel_sum: row.country_rebel_score,
                    },
                );
            }
        }
    }

    let mut stats: Vec<MemberStats> = order
        .into_iter()
        .map(|id| {
            let acc = &accs[&id];
            let n = acc.n as f64;
            MemberStats {
                member_id: id,
                first_name: acc.first.ballot.first_name.clone(),
                last_name: acc.first.ballot.last_name.clone(),
                group: acc.first.ballot.group.clone(),
                country: acc.first.ballot.country.clone(),
                n_votes: acc.n,
                avg_rebel_score: acc.rebel_sum / n,
                total_rebel_score: acc.rebel_sum,
                group_avg_rebel: 0.0,
                z_score: 0.0,
                is_outlier: false,
                avg_country_rebel_score: acc.country_rebel_sum / n,
                country_avg_rebel: 0.0,
                country_z_score: 0.0,
                country_is_outlier: false,
            }
        })
        .collect();

    zscore_pass(
        &mut stats,
        |s| s.group.as_str(),
        |s| s.avg_rebel_score,
        |s, mean, z| {
            s.group_avg_rebel = mean;
            s.z_score = z;
            s.is_outlier = z > 2.0;
        },
    );
    zscore_pass(
        &mut stats,
        |s| s.country.as_str(),
        |s| s.avg_country_rebel_score,
        |s, mean, z| {
            s.country_avg_rebel = mean;
            s.country_z_score = z;
            s.country_is_outlier = z > 2.0;
        },
    );

    sort_by_z(&mut stats);
    debug!(legislators = stats.len(), "aggregated member stats");
    stats
}

/// Stable sort by group z-score descending: biggest rebels first, equal
/// z-scores keep first-seen order.
fn sort_by_z(stats: &mut [MemberStats]) {
    stats.sort_by(|a, b| b.z_score.total_cmp(&a.z_score));
}

/// One z-score pass over one grouping key.
///
/// Uses the population standard deviation. When a key's variance is zero
/// every member shares the identical mean, so deviation is defined as none:
/// z = 0 for all of them, never NaN or infinite.
fn zscore_pass(
    stats: &mut [MemberStats],
    key: fn(&MemberStats) -> &str,
    value: fn(&MemberStats) -> f64,
    apply: fn(&mut MemberStats, mean: f64, z: f64),
) {
    let mut order: Vec<String> = Vec::new();
    let mut values: HashMap<String, Vec<f64>> = HashMap::new();
    for s in stats.iter() {
        let k = key(s);
        match values.get_mut(k) {
            Some(v) => v.push(value(s)),
            None => {
                order.push(k.to_string());
                values.insert(k.to_string(), vec![value(s)]);
            }
        }
    }

    let mut moments: HashMap<&str, (f64, f64)> = HashMap::new();
    for k in &order {
        let vals = &values[k];
        let mean = vals.iter().sum::<f64>() / vals.len() as f64;
        let variance = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / vals.len() as f64;
        moments.insert(k.as_str(), (mean, variance.sqrt()));
    }

    for s in stats.iter_mut() {
        let (mean, std) = moments[key(s)];
        let z = if std > 0.0 { (value(s) - mean) / std } else { 0.0 };
        apply(s, mean, z);
    }
}

/// Per-group mean Agreement Index over the group's distinct votes.
///
/// Every ballot of a (vote, group) carries the same AI, so each vote
/// contributes exactly once regardless of group size.
pub fn group_stats(scored: &[ScoredBallot]) -> Vec<GroupStats> {
    struct Acc {
        seen_votes: HashSet<u32>,
        ai_sum: f64,
    }

    let mut order: Vec<String> = Vec::new();
    let mut accs: HashMap<String, Acc> = HashMap::new();
    for row in scored {
        let group = row.ballot.group.as_str();
        if !accs.contains_key(group) {
            order.push(group.to_string());
        }
        let acc = accs.entry(group.to_string()).or_insert_with(|| Acc {
            seen_votes: HashSet::new(),
            ai_sum: 0.0,
        });
        if acc.seen_votes.insert(row.ballot.vote_id) {
            acc.ai_sum += row.agreement_index;
        }
    }

    order
        .into_iter()
        .map(|group| {
            let acc = &accs[&group];
            let n_votes = acc.seen_votes.len();
            GroupStats {
                group,
                avg_agreement_index: acc.ai_sum / n_votes as f64,
                n_votes,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::VotePosition;
    use crate::records::MemberBallot;

    fn scored(
        vote_id: u32,
        member_id: u32,
        group: &str,
        country: &str,
        agreement_index: f64,
        rebel_score: f64,
    ) -> ScoredBallot {
        ScoredBallot {
            ballot: MemberBallot {
                vote_id,
                member_id,
                first_name: "Ana".into(),
                last_name: format!("M{member_id}"),
                country: country.into(),
                group: group.into(),
                position: VotePosition::For,
            },
            group_majority: VotePosition::For,
            agreement_index,
            rebel_score,
            country_majority: VotePosition::For,
            country_agreement_index: agreement_index,
            country_rebel_score: rebel_score,
        }
    }

    #[test]
    fn empty_input_yields_empty_tables() {
        assert!(member_stats(&[]).is_empty());
        assert!(group_stats(&[]).is_empty());
    }

    #[test]
    fn means_sums_and_counts() {
        let rows = vec![
            scored(1, 1, "G", "FR", 0.7, 0.7),
            scored(2, 1, "G", "FR", 1.0, 0.0),
        ];
        let stats = member_stats(&rows);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].n_votes, 2);
        assert!((stats[0].avg_rebel_score - 0.35).abs() < 1e-12);
        assert!((stats[0].total_rebel_score - 0.7).abs() < 1e-12);
    }

    #[test]
    fn first_observed_group_and_country_win() {
        let rows = vec![
            scored(1, 1, "G", "FR", 1.0, 0.0),
            scored(2, 1, "H", "DE", 1.0, 0.0),
        ];
        let stats = member_stats(&rows);
        assert_eq!(stats[0].group, "G");
        assert_eq!(stats[0].country, "FR");
    }

    #[test]
    fn zero_variance_group_gets_zero_z_scores() {
        let rows = vec![
            scored(1, 1, "G", "FR", 1.0, 0.25),
            scored(1, 2, "G", "DE", 1.0, 0.25),
            scored(1, 3, "G", "IT", 1.0, 0.25),
        ];
        let stats = member_stats(&rows);
        for s in &stats {
            assert_eq!(s.z_score, 0.0);
            assert!(!s.is_outlier);
            assert!(s.z_score.is_finite());
            assert!((s.group_avg_rebel - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn lone_rebel_is_flagged_and_sorted_first() {
        // Ten conformists and one full rebel in the same group: the rebel's
        // z is (1 - 1/11) / popstd > 2, everyone else sits below zero.
        let mut rows: Vec<ScoredBallot> = (1..=10)
            .map(|id| scored(1, id, "G", "FR", 1.0, 0.0))
            .collect();
        rows.push(scored(1, 11, "G", "FR", 1.0, 1.0));

        let stats = member_stats(&rows);
        assert_eq!(stats[0].member_id, 11);
        assert!(stats[0].z_score > 2.0);
        assert!(stats[0].is_outlier);
        for s in &stats[1..] {
            assert!(s.z_score < 0.0);
            assert!(!s.is_outlier);
        }
        // Sorted descending by z.
        for pair in stats.windows(2) {
            assert!(pair[0].z_score >= pair[1].z_score);
        }
    }

    #[test]
    fn output_orders_by_z_descending() {
        let mut stats: Vec<MemberStats> = [2.5, -1.0, 3.1]
            .into_iter()
            .enumerate()
            .map(|(i, z)| {
                let rows = vec![scored(1, i as u32, "G", "FR", 1.0, 0.0)];
                let mut s = member_stats(&rows).remove(0);
                s.z_score = z;
                s.is_outlier = z > 2.0;
                s
            })
            .collect();
        sort_by_z(&mut stats);

        let zs: Vec<f64> = stats.iter().map(|s| s.z_score).collect();
        assert_eq!(zs, vec![3.1, 2.5, -1.0]);
        let flags: Vec<bool> = stats.iter().map(|s| s.is_outlier).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn sort_is_stable_on_equal_z() {
        // Two zero-variance groups: all z = 0, first-seen order preserved.
        let rows = vec![
            scored(1, 5, "G", "FR", 1.0, 0.0),
            scored(1, 3, "H", "DE", 1.0, 0.0),
            scored(1, 9, "G", "IT", 1.0, 0.0),
        ];
        let stats = member_stats(&rows);
        let ids: Vec<u32> = stats.iter().map(|s| s.member_id).collect();
        assert_eq!(ids, vec![5, 3, 9]);
    }

    #[test]
    fn reversed_input_changes_no_values() {
        let mut rows = vec![
            scored(1, 1, "G", "FR", 0.7, 0.7),
            scored(1, 2, "G", "DE", 0.7, 0.0),
            scored(2, 1, "G", "FR", 0.4, 0.0),
            scored(2, 3, "H", "IT", 0.9, 0.9),
        ];
        let forward = member_stats(&rows);
        rows.reverse();
        let backward = member_stats(&rows);
        for f in &forward {
            let b = backward
                .iter()
                .find(|b| b.member_id == f.member_id)
                .unwrap();
            assert_eq!(f, b);
        }
    }

    #[test]
    fn group_ai_mean_is_over_distinct_votes() {
        // Vote 1 has AI 0.7 (three members), vote 2 has AI 1.0 (one member):
        // the mean must be 0.85, not weighted by group size.
        let rows = vec![
            scored(1, 1, "G", "FR", 0.7, 0.0),
            scored(1, 2, "G", "DE", 0.7, 0.0),
            scored(1, 3, "G", "IT", 0.7, 0.7),
            scored(2, 1, "G", "FR", 1.0, 0.0),
        ];
        let stats = group_stats(&rows);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].n_votes, 2);
        assert!((stats[0].avg_agreement_index - 0.85).abs() < 1e-12);
    }
}
