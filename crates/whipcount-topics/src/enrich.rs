//! Two-stage topic enrichment for votes missing topic labels.
//!
//! For every vote with no raw topics but with subject tags, stage 1 scans
//! the ordered keyword rules (first match per subject phrase wins) and
//! stage 2 tests every contiguous word n-gram of each phrase against the
//! vocabulary (every match kept). The union, sorted and ", "-joined, fills
//! `topics_filled`. Votes that already carry topics are never touched, so
//! re-running over enriched data is a no-op.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::info;
use whipcount_core::VoteRecord;

use crate::rules::MAPPING_RULES;
use crate::vocabulary::TopicVocabulary;

const MAX_EXAMPLES: usize = 15;
const TOP_UNMATCHED: usize = 30;

/// One filled row kept for the diagnostic summary.
#[derive(Debug, Clone, Serialize)]
pub struct FillExample {
    pub vote_id: u32,
    pub subjects: Vec<String>,
    pub filled: String,
}

/// Diagnostic side-output of an enrichment pass. Informational only: the
/// filled topics live on the vote records themselves.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentReport {
    /// Subject phrases resolved by a keyword rule (one per phrase at most).
    pub mapping_hits: usize,
    /// N-gram matches against the vocabulary (every match counts).
    pub phrase_hits: usize,
    pub missing_before: usize,
    pub missing_after: usize,
    pub examples: Vec<FillExample>,
    /// Most common subject phrases among rows still unfilled, with counts.
    pub top_unmatched: Vec<(String, usize)>,
}

/// Fill missing topics in place and report what happened.
pub fn enrich_votes(votes: &mut [VoteRecord], vocab: &TopicVocabulary) -> EnrichmentReport {
    let missing_before = votes.iter().filter(|v| v.topics.is_none()).count();

    let mut mapping_hits = 0usize;
    let mut phrase_hits = 0usize;
    let mut examples = Vec::new();

    for vote in votes.iter_mut() {
        if let Some(topics) = &vote.topics {
            // Already labelled: mirror the raw topics, never re-derive.
            vote.topics_filled = Some(topics.clone());
            continue;
        }
        let Some(subjects) = vote.oeil_subjects.as_deref() else {
            vote.topics_filled = None;
            continue;
        };

        let phrases: Vec<&str> = subjects
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let mut matched: BTreeSet<&str> = BTreeSet::new();

        // Stage 1: ordered keyword rules, first match per phrase wins.
        for phrase in &phrases {
            let lower = phrase.to_lowercase();
            for &(keyword, topic) in MAPPING_RULES {
                if lower.contains(keyword) {
                    matched.insert(topic);
                    mapping_hits += 1;
                    break;
                }
            }
        }

        // Stage 2: every contiguous word n-gram, longest first, against the
        // vocabulary. Every match is kept; the set dedupes overlaps.
        for phrase in &phrases {
            let lower = phrase.to_lowercase();
            let words: Vec<&str> = lower.split_whitespace().collect();
            for len in (1..=words.len()).rev() {
                for start in 0..=words.len() - len {
                    let ngram = words[start..start + len].join(" ");
                    if let Some(topic) = vocab.resolve(&ngram) {
                        matched.insert(topic);
                        phrase_hits += 1;
                    }
                }
            }
        }

        if matched.is_empty() {
            vote.topics_filled = None;
        } else {
            let filled = matched.into_iter().collect::<Vec<_>>().join(", ");
            if examples.len() < MAX_EXAMPLES {
                examples.push(FillExample {
                    vote_id: vote.id,
                    subjects: phrases.iter().map(|s| s.to_string()).collect(),
                    filled: filled.clone(),
                });
            }
            vote.topics_filled = Some(filled);
        }
    }

    let missing_after = votes.iter().filter(|v| v.topics_filled.is_none()).count();
    let top_unmatched = unmatched_subject_counts(votes);

    info!(
        mapping_hits,
        phrase_hits, missing_before, missing_after, "topic enrichment pass complete"
    );
    EnrichmentReport {
        mapping_hits,
        phrase_hits,
        missing_before,
        missing_after,
        examples,
        top_unmatched,
    }
}

/// Frequency table of subject phrases on rows still unfilled, by count
/// descending with ties in first-seen order.
fn unmatched_subject_counts(votes: &[VoteRecord]) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for vote in votes {
        if vote.topics_filled.is_some() {
            continue;
        }
        let Some(subjects) = vote.oeil_subjects.as_deref() else {
            continue;
        };
        for phrase in subjects.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match counts.get_mut(phrase) {
                Some(c) => *c += 1,
                None => {
                    order.push(phrase.to_string());
                    counts.insert(phrase.to_string(), 1);
                }
            }
        }
    }

    let mut table: Vec<(String, usize)> = order
        .into_iter()
        .map(|phrase| {
            let count = counts[&phrase];
            (phrase, count)
        })
        .collect();
    table.sort_by(|a, b| b.1.cmp(&a.1));
    table.truncate(TOP_UNMATCHED);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn vote(id: u32, topics: Option<&str>, subjects: Option<&str>) -> VoteRecord {
        VoteRecord {
            id,
            timestamp: Utc.with_ymd_and_hms(2024, 9, 17, 12, 0, 0).unwrap(),
            title: None,
            topics: topics.map(String::from),
            oeil_subjects: subjects.map(String::from),
            topics_filled: None,
        }
    }

    fn vocab_from(topics: &[&str]) -> TopicVocabulary {
        let votes: Vec<VoteRecord> = topics
            .iter()
            .enumerate()
            .map(|(i, t)| vote(i as u32 + 1000, Some(t), None))
            .collect();
        TopicVocabulary::from_votes(&votes)
    }

    #[test]
    fn keyword_rule_fills_missing_topics() {
        let vocab = vocab_from(&[]);
        let mut votes = vec![vote(1, None, Some("protection of refugee families"))];
        let report = enrich_votes(&mut votes, &vocab);
        assert_eq!(votes[0].topics_filled.as_deref(), Some("Migration"));
        assert_eq!(report.mapping_hits, 1);
        assert_eq!(report.missing_after, 0);
    }

    #[test]
    fn first_rule_wins_within_a_phrase() {
        // "children" precedes "women" in the table; one phrase containing
        // both resolves to the earlier rule only.
        let vocab = vocab_from(&[]);
        let mut votes = vec![vote(1, None, Some("support for children and women"))];
        let report = enrich_votes(&mut votes, &vocab);
        assert_eq!(votes[0].topics_filled.as_deref(), Some("Youth and culture"));
        assert_eq!(report.mapping_hits, 1);
    }

    #[test]
    fn separate_phrases_are_scanned_independently() {
        let vocab = vocab_from(&[]);
        let mut votes = vec![vote(1, None, Some("rights of children, rights of women"))];
        let report = enrich_votes(&mut votes, &vocab);
        assert_eq!(
            votes[0].topics_filled.as_deref(),
            Some("Gender equality, Youth and culture")
        );
        assert_eq!(report.mapping_hits, 2);
    }

    #[test]
    fn ngram_stage_matches_vocabulary_phrases() {
        let vocab = vocab_from(&["Food and agriculture"]);
        let mut votes = vec![vote(1, None, Some("common food and agriculture framework"))];
        let report = enrich_votes(&mut votes, &vocab);
        assert_eq!(
            votes[0].topics_filled.as_deref(),
            Some("Food and agriculture")
        );
        assert_eq!(report.phrase_hits, 1);
        assert_eq!(report.mapping_hits, 0);
    }

    #[test]
    fn every_matching_ngram_is_counted() {
        // "transport" appears as a 1-gram twice; the fill dedupes but the
        // hit counter does not.
        let vocab = vocab_from(&[]);
        let mut votes = vec![vote(1, None, Some("transport of goods, rail transport"))];
        let report = enrich_votes(&mut votes, &vocab);
        assert_eq!(votes[0].topics_filled.as_deref(), Some("Transport"));
        assert_eq!(report.phrase_hits, 2);
    }

    #[test]
    fn labelled_votes_are_never_touched() {
        let vocab = vocab_from(&[]);
        let mut votes = vec![vote(1, Some("Health"), Some("rights of children"))];
        let report = enrich_votes(&mut votes, &vocab);
        assert_eq!(votes[0].topics.as_deref(), Some("Health"));
        assert_eq!(votes[0].topics_filled.as_deref(), Some("Health"));
        assert_eq!(votes[0].effective_topics(), Some("Health"));
        assert_eq!(report.mapping_hits, 0);
        assert_eq!(report.missing_before, 0);
    }

    #[test]
    fn enrichment_is_idempotent() {
        let vocab = vocab_from(&["Energy"]);
        let mut votes = vec![
            vote(1, None, Some("renewable energy targets")),
            vote(2, Some("Health"), None),
            vote(3, None, Some("unmappable subject")),
        ];
        enrich_votes(&mut votes, &vocab);
        let first: Vec<Option<String>> = votes
            .iter()
            .map(|v| v.effective_topics().map(String::from))
            .collect();

        enrich_votes(&mut votes, &vocab);
        let second: Vec<Option<String>> = votes
            .iter()
            .map(|v| v.effective_topics().map(String::from))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn unmatched_rows_stay_unfilled_and_are_counted() {
        let vocab = vocab_from(&[]);
        let mut votes = vec![
            vote(1, None, Some("arcane procedure, arcane procedure details")),
            vote(2, None, Some("arcane procedure")),
            vote(3, None, None),
        ];
        let report = enrich_votes(&mut votes, &vocab);
        assert!(votes[0].topics_filled.is_none());
        assert_eq!(report.missing_before, 3);
        assert_eq!(report.missing_after, 3);
        assert_eq!(report.top_unmatched[0], ("arcane procedure".to_string(), 2));
    }

    #[test]
    fn examples_are_capped() {
        let vocab = vocab_from(&[]);
        let mut votes: Vec<VoteRecord> = (0..20)
            .map(|i| vote(i, None, Some("rights of children")))
            .collect();
        let report = enrich_votes(&mut votes, &vocab);
        assert_eq!(report.examples.len(), MAX_EXAMPLES);
        assert_eq!(report.examples[0].filled, "Youth and culture");
    }
}
