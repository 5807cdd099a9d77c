//! Per-period, per-topic JSON export for the frontend visualisation.
//!
//! Writes `periods/<id>/mep_data.json` (all topics) and
//! `periods/<id>/topics/<slug>.json` per export topic, plus a top-level
//! `config.json` describing topics and periods. Empty filtered sets are
//! skipped, never errors.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use whipcount_core::{
    MemberStats, ScoredBallot, VoteRecord, member_stats, score_ballots, votes_in_period,
    votes_matching_topic,
};

use crate::error::StoreError;
use crate::snapshot::{Snapshot, write_json};

/// Topics exported as individual frontend files.
pub const EXPORT_TOPICS: &[&str] = &[
    "Biodiversity",
    "Climate and environment",
    "Climate change",
    "Consumer protection",
    "Digital",
    "Economy and budget",
    "Education",
    "Energy",
    "Enlargement",
    "Food and agriculture",
    "Foreign affairs",
    "Gender equality",
    "Health",
    "International trade",
    "Migration",
    "Social protection",
    "Taxation",
    "Travel",
    "Worker’s rights",
    "Youth and culture",
];

/// A parliamentary term. Terms run July to June.
#[derive(Debug, Clone, Serialize)]
pub struct Period {
    pub id: &'static str,
    pub label: &'static str,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub is_default: bool,
}

/// The exported parliamentary periods, default first.
pub fn periods() -> Vec<Period> {
    vec![
        Period {
            id: "ep10",
            label: "EP10 (2024-2029)",
            start: NaiveDate::from_ymd_opt(2024, 7, 16).unwrap(),
            end: NaiveDate::from_ymd_opt(2029, 7, 15).unwrap(),
            is_default: true,
        },
        Period {
            id: "ep9",
            label: "EP9 (2019-2024)",
            start: NaiveDate::from_ymd_opt(2019, 7, 2).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            is_default: false,
        },
    ]
}

/// URL-safe filename for a topic label: lowercase, non-alphanumeric runs
/// collapsed to single dashes.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Serialize)]
struct ExportMeta {
    total_votes: usize,
    total_meps: usize,
}

#[derive(Serialize)]
struct MepEntry {
    #[serde(flatten)]
    stats: MemberStats,
    /// Union of effective topics over the votes in this slice.
    topics: Option<String>,
}

#[derive(Serialize)]
struct ExportFile {
    meta: ExportMeta,
    meps: Vec<MepEntry>,
}

#[derive(Serialize)]
struct ExportConfig<'a> {
    topics: BTreeMap<&'a str, String>,
    periods: &'a [Period],
    default_period: &'static str,
}

/// Export the full per-period, per-topic dataset under `out_dir`.
pub fn export_frontend_data(out_dir: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    let all_periods = periods();
    for period in &all_periods {
        let ids = votes_in_period(&snapshot.votes, period.start, period.end);
        if ids.is_empty() {
            info!(period = period.id, "no votes in period, skipping");
            continue;
        }
        let period_dir = out_dir.join("periods").join(period.id);
        fs::create_dir_all(period_dir.join("topics"))?;

        let written = export_slice(&period_dir.join("mep_data.json"), snapshot, &ids)?;
        info!(period = period.id, meps = written, "exported period data");

        for topic in EXPORT_TOPICS {
            let topic_ids: HashSet<u32> = votes_matching_topic(&snapshot.votes, topic)
                .intersection(&ids)
                .copied()
                .collect();
            if topic_ids.is_empty() {
                debug!(period = period.id, topic, "no votes for topic, skipping");
                continue;
            }
            let path = period_dir.join("topics").join(format!("{}.json", slugify(topic)));
            export_slice(&path, snapshot, &topic_ids)?;
        }
    }

    let default_period = all_periods
        .iter()
        .find(|p| p.is_default)
        .map(|p| p.id)
        .unwrap_or("ep10");
    let config = ExportConfig {
        topics: EXPORT_TOPICS.iter().map(|t| (*t, slugify(t))).collect(),
        periods: &all_periods,
        default_period,
    };
    write_json(&out_dir.join("config.json"), &config)?;
    info!(out_dir = %out_dir.display(), "frontend export complete");
    Ok(())
}

/// Score and aggregate the ballots of the given votes and write one export
/// file. Returns the number of legislators written.
fn export_slice(
    path: &Path,
    snapshot: &Snapshot,
    vote_ids: &HashSet<u32>,
) -> Result<usize, StoreError> {
    let ballots: Vec<_> = snapshot
        .ballots
        .iter()
        .filter(|b| vote_ids.contains(&b.vote_id))
        .cloned()
        .collect();
    let tallies: Vec<_> = snapshot
        .tallies
        .iter()
        .filter(|t| vote_ids.contains(&t.vote_id))
        .cloned()
        .collect();

    let scored = score_ballots(&ballots, &tallies);
    let total_votes = scored
        .iter()
        .map(|s| s.ballot.vote_id)
        .collect::<HashSet<_>>()
        .len();
    let stats = member_stats(&scored);
    let topics = member_topic_unions(&snapshot.votes, &scored);

    let meps: Vec<MepEntry> = stats
        .into_iter()
        .map(|stats| {
            let topics = topics.get(&stats.member_id).cloned();
            MepEntry { stats, topics }
        })
        .collect();

    let file = ExportFile {
        meta: ExportMeta {
            total_votes,
            total_meps: meps.len(),
        },
        meps,
    };
    write_json(path, &file)?;
    Ok(file.meta.total_meps)
}

/// Union of effective topics over the votes each legislator took part in.
fn member_topic_unions(
    votes: &[VoteRecord],
    scored: &[ScoredBallot],
) -> HashMap<u32, String> {
    let vote_topics: HashMap<u32, &str> = votes
        .iter()
        .filter_map(|v| v.effective_topics().map(|t| (v.id, t)))
        .collect();

    let mut unions: HashMap<u32, BTreeSet<&str>> = HashMap::new();
    for row in scored {
        let Some(topics) = vote_topics.get(&row.ballot.vote_id) else {
            continue;
        };
        let set = unions.entry(row.ballot.member_id).or_default();
        for token in topics.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            set.insert(token);
        }
    }

    unions
        .into_iter()
        .map(|(id, set)| (id, set.into_iter().collect::<Vec<_>>().join(", ")))
        .collect()
}
