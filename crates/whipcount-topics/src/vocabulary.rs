//! Canonical topic vocabulary inferred from labelled votes.
//!
//! The vocabulary is the set of distinct trimmed comma-separated tokens
//! across all non-empty `topics` values, plus the fixed supplemental list.
//! Lookups are case-insensitive; original casing is preserved for output.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use whipcount_core::VoteRecord;

use crate::rules::SUPPLEMENTAL_TOPICS;

/// Read-only topic vocabulary, built once per run.
#[derive(Debug, Clone)]
pub struct TopicVocabulary {
    /// lowercase form → original casing.
    canonical: BTreeMap<String, String>,
}

impl TopicVocabulary {
    /// Infer the vocabulary from already-labelled votes plus the
    /// supplemental topics. Tokens are inserted in sorted order, so when
    /// two casings share a lowercase form the lexicographically later one
    /// wins.
    pub fn from_votes(votes: &[VoteRecord]) -> Self {
        let mut originals: BTreeSet<String> = BTreeSet::new();
        for vote in votes {
            let Some(topics) = vote.topics.as_deref() else {
                continue;
            };
            for token in topics.split(',') {
                let token = token.trim();
                if !token.is_empty() {
                    originals.insert(token.to_string());
                }
            }
        }
        for topic in SUPPLEMENTAL_TOPICS {
            originals.insert((*topic).to_string());
        }

        let mut canonical = BTreeMap::new();
        for topic in originals {
            canonical.insert(topic.to_lowercase(), topic);
        }
        debug!(topics = canonical.len(), "built topic vocabulary");
        Self { canonical }
    }

    /// Resolve a lower-cased phrase to its canonical (original-cased) topic.
    pub fn resolve(&self, phrase_lower: &str) -> Option<&str> {
        self.canonical.get(phrase_lower).map(String::as_str)
    }

    /// Canonical topics in sorted order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.canonical.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn vote(id: u32, topics: Option<&str>) -> VoteRecord {
        VoteRecord {
            id,
            timestamp: Utc.with_ymd_and_hms(2024, 9, 17, 12, 0, 0).unwrap(),
            title: None,
            topics: topics.map(String::from),
            oeil_subjects: None,
            topics_filled: None,
        }
    }

    #[test]
    fn splits_and_trims_comma_tokens() {
        let votes = vec![
            vote(1, Some("Health, Climate and environment")),
            vote(2, Some(" Health ,Energy")),
            vote(3, None),
        ];
        let vocab = TopicVocabulary::from_votes(&votes);
        assert_eq!(vocab.resolve("health"), Some("Health"));
        assert_eq!(
            vocab.resolve("climate and environment"),
            Some("Climate and environment")
        );
        assert_eq!(vocab.resolve("energy"), Some("Energy"));
        assert_eq!(vocab.resolve("defence"), None);
    }

    #[test]
    fn supplemental_topics_are_always_present() {
        let vocab = TopicVocabulary::from_votes(&[]);
        assert_eq!(vocab.resolve("transport"), Some("Transport"));
        assert_eq!(vocab.resolve("human rights"), Some("Human rights"));
        assert_eq!(vocab.len(), SUPPLEMENTAL_TOPICS.len());
    }

    #[test]
    fn lookup_is_case_insensitive_with_original_casing_preserved() {
        let votes = vec![vote(1, Some("Food and agriculture"))];
        let vocab = TopicVocabulary::from_votes(&votes);
        assert_eq!(
            vocab.resolve("food and agriculture"),
            Some("Food and agriculture")
        );
        // The vocabulary key is the lowercase form only.
        assert_eq!(vocab.resolve("Food and agriculture"), None);
    }

    #[test]
    fn topics_iterate_sorted() {
        let votes = vec![vote(1, Some("Energy, Biodiversity"))];
        let vocab = TopicVocabulary::from_votes(&votes);
        let topics: Vec<&str> = vocab.topics().collect();
        let mut sorted = topics.clone();
        sorted.sort_unstable();
        assert_eq!(topics, sorted);
        assert!(topics.contains(&"Biodiversity"));
    }
}
